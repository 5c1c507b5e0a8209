use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use chromium_fetcher::app::{self, App, RunOutcome};
use chromium_fetcher::cli::{Cli, Command, StoreAction};
use chromium_fetcher::config::{self, Settings};
use chromium_fetcher::download::Downloader;
use chromium_fetcher::logging::{self, LogOptions};
use chromium_fetcher::prompt::TerminalPrompt;
use chromium_fetcher::version::registries::snapshots::DEFAULT_STORAGE_URL;
use chromium_fetcher::version::registries::{ChromiumDashRegistry, SnapshotLocator};
use chromium_fetcher::version::resolver::TracingNotifier;
use chromium_fetcher::version::store::PersistentStore;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _log_guard = logging::init(
        LogOptions {
            verbosity: cli.verbose,
            json: cli.log_json,
            file: cli.log_file,
        },
        &config::log_path(),
    );

    let mut store = PersistentStore::open(&config::store_path());

    if let Some(action) = cli.store_action() {
        return run_store_action(action, &mut store);
    }

    let config = cli.config(&Settings::load(&config::settings_path()))?;

    let dashboard = ChromiumDashRegistry::default();
    let app = App::new(
        Arc::new(dashboard.clone()),
        Arc::new(SnapshotLocator::new(DEFAULT_STORAGE_URL, dashboard)),
        Arc::new(TerminalPrompt),
        Arc::new(TracingNotifier),
        Downloader::new(),
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Some(Command::List) => {
            let candidates = runtime.block_on(app.candidates(&config, &store))?;
            for line in app::format_candidates(&candidates) {
                println!("{line}");
            }
        }
        _ => match runtime.block_on(app.run(&config, &mut store))? {
            RunOutcome::Downloaded(path) => println!("{}", path.display()),
            RunOutcome::Url(url) => println!("{url}"),
            RunOutcome::Exhausted => eprintln!("No binary found"),
        },
    }

    Ok(())
}

fn run_store_action(action: &StoreAction, store: &mut PersistentStore) -> anyhow::Result<()> {
    match action {
        StoreAction::Path => println!("{}", store.path().display()),
        StoreAction::Export { file } => {
            if let Some(json) = app::export_store(store.store(), file.as_deref())? {
                println!("{json}");
            }
        }
        StoreAction::Import { file } => {
            let added = app::import_store(store, file)
                .with_context(|| format!("Failed to import {}", file.display()))?;
            println!("Imported {added} negative hits");
        }
        StoreAction::Clear => {
            store.clear()?;
            println!("Cleared {}", store.path().display());
        }
    }
    Ok(())
}
