//! End-to-end runs of the fetch, filter, resolve and download pipeline

mod helper;

use std::sync::Arc;

use mockito::Server;
use tempfile::TempDir;

use chromium_fetcher::app::{AppError, RunOutcome};
use chromium_fetcher::config::{Config, OnFail};
use chromium_fetcher::platform::{Arch, Os};
use chromium_fetcher::version::MappedEntry;
use chromium_fetcher::version::store::PersistentStore;

use helper::{
    FakeLocator, FakeReleases, RecordingNotifier, ScriptedPrompt, base_config, create_app, v,
};

const RELEASES: &[(&str, u64)] = &[("10.0.0.0", 100), ("30.0.0.0", 300), ("20.0.0.0", 200)];

async fn binary_server() -> (mockito::ServerGuard, mockito::Mock, String) {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/chrome-linux.zip")
        .with_status(200)
        .with_body("chromium")
        .create_async()
        .await;
    let url = format!("{}/chrome-linux.zip", server.url());
    (server, mock, url)
}

fn auto_search(config: Config) -> Config {
    Config {
        on_fail: OnFail::Decrease,
        interactive: false,
        ..config
    }
}

#[tokio::test]
async fn auto_search_walks_down_and_remembers_missing_builds() {
    let (_server, _mock, url) = binary_server().await;
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("store.json");
    let config = auto_search(base_config(temp_dir.path()));

    let locator = Arc::new(FakeLocator::default().with_binary(100, &url));
    let notifier = Arc::new(RecordingNotifier::default());
    let app = create_app(
        FakeReleases::new(RELEASES),
        locator.clone(),
        Arc::new(ScriptedPrompt::default()),
        notifier.clone(),
    );
    let mut store = PersistentStore::open(&store_path);

    let outcome = app.run(&config, &mut store).await.unwrap();

    let archive = temp_dir.path().join("chromium-10.0.0.0-linux-x64.zip");
    assert_eq!(outcome, RunOutcome::Downloaded(archive.clone()));
    assert_eq!(std::fs::read(&archive).unwrap(), b"chromium");
    assert_eq!(locator.checked(), vec![300, 200, 100]);
    assert_eq!(
        notifier.infos(),
        vec![
            "Auto-searching for a binary, starting with version 30.0.0.0",
            "Continuing with version 20.0.0.0",
            "Continuing with version 10.0.0.0",
        ]
    );

    let reopened = PersistentStore::open(&store_path);
    let bucket = reopened.store().bucket(Os::Linux, Arch::X64).unwrap();
    assert_eq!(
        bucket.iter().copied().collect::<Vec<_>>(),
        vec![v("20.0.0.0"), v("30.0.0.0")]
    );
}

#[tokio::test]
async fn second_run_skips_remembered_builds_without_remote_checks() {
    let (_server, _mock, url) = binary_server().await;
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("store.json");
    let config = auto_search(base_config(temp_dir.path()));
    {
        let mut store = PersistentStore::open(&store_path);
        let app = create_app(
            FakeReleases::new(RELEASES),
            Arc::new(FakeLocator::default().with_binary(100, &url)),
            Arc::new(ScriptedPrompt::default()),
            Arc::new(RecordingNotifier::default()),
        );
        app.run(&config, &mut store).await.unwrap();
    }

    let locator = Arc::new(FakeLocator::default().with_binary(100, &url));
    let notifier = Arc::new(RecordingNotifier::default());
    let app = create_app(
        FakeReleases::new(RELEASES),
        locator.clone(),
        Arc::new(ScriptedPrompt::default()),
        notifier.clone(),
    );
    let mut store = PersistentStore::open(&store_path);

    let candidates = app.candidates(&config, &store).await.unwrap();
    assert_eq!(
        candidates
            .iter()
            .map(|entry| entry.is_disabled())
            .collect::<Vec<_>>(),
        vec![true, true, false]
    );

    let outcome = app.run(&config, &mut store).await.unwrap();

    assert!(matches!(outcome, RunOutcome::Downloaded(_)));
    assert_eq!(locator.checked(), vec![100]);
    assert_eq!(
        notifier.infos(),
        vec![
            "Auto-searching for a binary, starting with version 30.0.0.0",
            "Continuing with version 10.0.0.0",
        ]
    );
}

#[tokio::test]
async fn interactive_run_reprompts_with_missing_build_disabled() {
    let (_server, _mock, url) = binary_server().await;
    let temp_dir = TempDir::new().unwrap();
    let config = base_config(temp_dir.path());

    let prompt = Arc::new(ScriptedPrompt::answering(&["20.0.0.0", "10.0.0.0"]));
    let app = create_app(
        FakeReleases::new(RELEASES),
        Arc::new(FakeLocator::default().with_binary(100, &url)),
        prompt.clone(),
        Arc::new(RecordingNotifier::default()),
    );
    let mut store = PersistentStore::open(&temp_dir.path().join("store.json"));

    let outcome = app.run(&config, &mut store).await.unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Downloaded(temp_dir.path().join("chromium-10.0.0.0-linux-x64.zip"))
    );
    let shown = prompt.shown();
    assert_eq!(shown.len(), 2);
    assert!(shown[0].iter().all(|entry| !entry.is_disabled()));
    assert_eq!(
        shown[1]
            .iter()
            .map(|entry| (entry.version(), entry.is_disabled()))
            .collect::<Vec<_>>(),
        vec![
            (v("30.0.0.0"), false),
            (v("20.0.0.0"), true),
            (v("10.0.0.0"), false),
        ]
    );
}

#[tokio::test]
async fn cancelled_prompt_ends_run_without_download() {
    let temp_dir = TempDir::new().unwrap();
    let config = base_config(temp_dir.path());
    let locator = Arc::new(FakeLocator::default());
    let app = create_app(
        FakeReleases::new(RELEASES),
        locator.clone(),
        Arc::new(ScriptedPrompt::default()),
        Arc::new(RecordingNotifier::default()),
    );
    let mut store = PersistentStore::open(&temp_dir.path().join("store.json"));

    let outcome = app.run(&config, &mut store).await.unwrap();

    assert_eq!(outcome, RunOutcome::Exhausted);
    assert!(locator.checked().is_empty());
}

#[tokio::test]
async fn unreachable_check_is_not_remembered() {
    let (_server, _mock, url) = binary_server().await;
    let temp_dir = TempDir::new().unwrap();
    let config = auto_search(base_config(temp_dir.path()));
    let notifier = Arc::new(RecordingNotifier::default());
    let app = create_app(
        FakeReleases::new(&[("20.0.0.0", 200), ("10.0.0.0", 100)]),
        Arc::new(
            FakeLocator::default()
                .with_unreachable(200)
                .with_binary(100, &url),
        ),
        Arc::new(ScriptedPrompt::default()),
        notifier.clone(),
    );
    let mut store = PersistentStore::open(&temp_dir.path().join("store.json"));

    let outcome = app.run(&config, &mut store).await.unwrap();

    assert!(matches!(outcome, RunOutcome::Downloaded(_)));
    assert_eq!(
        notifier.warnings(),
        vec!["Could not check version 20.0.0.0: Invalid response: timeout"]
    );
    assert!(store.store().is_empty());
}

#[tokio::test]
async fn single_version_without_binary_fails_and_is_remembered() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("store.json");
    let config = Config {
        single: Some(v("99.0.0.0")),
        ..base_config(temp_dir.path())
    };
    let app = create_app(
        FakeReleases::failing(),
        Arc::new(FakeLocator::default()),
        Arc::new(ScriptedPrompt::default()),
        Arc::new(RecordingNotifier::default()),
    );
    let mut store = PersistentStore::open(&store_path);

    let result = app.run(&config, &mut store).await;

    assert!(matches!(
        result,
        Err(AppError::NoBinaryForSingleVersion(version)) if version == v("99.0.0.0")
    ));
    assert!(
        PersistentStore::open(&store_path)
            .store()
            .has(Os::Linux, Arch::X64, &v("99.0.0.0"))
            .unwrap()
    );
}

#[tokio::test]
async fn failed_release_fetch_is_exhausted() {
    let temp_dir = TempDir::new().unwrap();
    let prompt = Arc::new(ScriptedPrompt::default());
    let app = create_app(
        FakeReleases::failing(),
        Arc::new(FakeLocator::default()),
        prompt.clone(),
        Arc::new(RecordingNotifier::default()),
    );
    let mut store = PersistentStore::open(&temp_dir.path().join("store.json"));

    let outcome = app
        .run(&base_config(temp_dir.path()), &mut store)
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::Exhausted);
    assert!(prompt.shown().is_empty());
}

#[tokio::test]
async fn listing_newest_majors_hides_remembered_builds() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = PersistentStore::open(&temp_dir.path().join("store.json"));
    let mut remembered = chromium_fetcher::version::store::Store::new();
    remembered
        .add(Os::Linux, Arch::X64, v("20.0.2.0"))
        .unwrap();
    store.import(&remembered).unwrap();

    let app = create_app(
        FakeReleases::new(&[
            ("20.0.1.0", 201),
            ("20.0.2.0", 202),
            ("10.0.1.0", 101),
            ("10.0.2.0", 102),
        ]),
        Arc::new(FakeLocator::default()),
        Arc::new(ScriptedPrompt::default()),
        Arc::new(RecordingNotifier::default()),
    );
    let config = Config {
        only_newest_major: true,
        hide_negative_hits: true,
        ..base_config(temp_dir.path())
    };

    let candidates = app.candidates(&config, &store).await.unwrap();

    assert_eq!(
        candidates,
        vec![
            MappedEntry::new(v("20.0.1.0")).with_branch_position(Some(201)),
            MappedEntry::new(v("10.0.2.0")).with_branch_position(Some(102)),
        ]
    );
}

#[tokio::test]
async fn unwritable_store_does_not_block_search() {
    let (_server, _mock, url) = binary_server().await;
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("not-a-dir");
    std::fs::write(&blocker, "").unwrap();
    let config = auto_search(base_config(temp_dir.path()));

    let locator = Arc::new(FakeLocator::default().with_binary(100, &url));
    let app = create_app(
        FakeReleases::new(&[("20.0.0.0", 200), ("10.0.0.0", 100)]),
        locator.clone(),
        Arc::new(ScriptedPrompt::default()),
        Arc::new(RecordingNotifier::default()),
    );
    let mut store = PersistentStore::open(&blocker.join("store.json"));

    let outcome = app.run(&config, &mut store).await.unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Downloaded(temp_dir.path().join("chromium-10.0.0.0-linux-x64.zip"))
    );
    assert_eq!(locator.checked(), vec![200, 100]);
}
