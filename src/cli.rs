//! Command-line surface

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::{Config, OnFail, Settings};
use crate::platform::{Arch, Os, Platform, UnsupportedCombination};
use crate::version::value::Version;

#[derive(Debug, Parser)]
#[command(name = "chromium-fetcher")]
#[command(version, about = "Find and download historical Chromium builds")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Skip downloading; print the binary URL instead
    #[arg(long, global = true)]
    pub no_download: bool,

    /// Keep the downloaded archive instead of extracting it
    #[arg(long, global = true)]
    pub no_unzip: bool,

    /// Folder the binary is downloaded into
    #[arg(long, global = true)]
    pub download_folder: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Also write logs to the data directory
    #[arg(long, global = true)]
    pub log_file: bool,
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Lowest version to consider (missing components are 0)
    #[arg(long, value_parser = parse_min, global = true)]
    pub min: Option<Version>,

    /// Highest version to consider (missing components match anything)
    #[arg(long, value_parser = parse_max, global = true)]
    pub max: Option<Version>,

    /// Number of candidates to offer
    #[arg(short, long, global = true)]
    pub results: Option<usize>,

    /// Target operating system (linux, win, mac)
    #[arg(long, global = true)]
    pub os: Option<Os>,

    /// Target architecture (x64, x86, arm)
    #[arg(long, global = true)]
    pub arch: Option<Arch>,

    /// Release channel to list
    #[arg(long, global = true)]
    pub channel: Option<String>,

    /// What to do when the selected version has no binary (nothing, increase, decrease)
    #[arg(long, global = true)]
    pub on_fail: Option<OnFail>,

    /// Never prompt
    #[arg(long, global = true)]
    pub non_interactive: bool,

    /// Offer only the newest version of each major
    #[arg(long, global = true)]
    pub only_newest_major: bool,

    /// Leave out versions known to have no binary
    #[arg(long, global = true)]
    pub hide_negative_hits: bool,

    /// List oldest versions first
    #[arg(long, global = true)]
    pub inverse: bool,

    /// Fetch exactly this version
    #[arg(long, value_parser = parse_exact, global = true)]
    pub single: Option<Version>,

    /// Do not remember versions without binary
    #[arg(long, global = true)]
    pub no_store: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the candidate list without downloading
    List,
    /// Maintain the negative-hit store
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum StoreAction {
    /// Print the store file location
    Path,
    /// Write the store as JSON to a file or stdout
    Export { file: Option<PathBuf> },
    /// Merge a store file into the local store
    Import { file: PathBuf },
    /// Remove every recorded negative hit
    Clear,
}

fn parse_min(input: &str) -> Result<Version, String> {
    Ok(Version::parse_with_fill(input, 0))
}

fn parse_max(input: &str) -> Result<Version, String> {
    Ok(Version::parse_with_fill(input, Version::COMPONENT_MAX))
}

fn parse_exact(input: &str) -> Result<Version, String> {
    Ok(Version::parse(input))
}

impl Cli {
    /// Store maintenance action, which needs no run configuration
    pub fn store_action(&self) -> Option<&StoreAction> {
        match &self.command {
            Some(Command::Store { action }) => Some(action),
            _ => None,
        }
    }

    /// Builds the run configuration; flags override the settings file
    pub fn config(&self, settings: &Settings) -> Result<Config, UnsupportedCombination> {
        let base = Config::default().with_settings(settings);
        let filter = &self.filter;

        let host = Platform::host();
        let platform = Platform::new(
            filter.os.unwrap_or(host.os()),
            filter.arch.unwrap_or(host.arch()),
        )?;

        Ok(Config {
            min: filter.min,
            max: filter.max,
            results: filter.results.or(base.results),
            platform,
            channel: filter.channel.clone().unwrap_or(base.channel),
            on_fail: filter.on_fail.unwrap_or(base.on_fail),
            interactive: !filter.non_interactive,
            only_newest_major: filter.only_newest_major,
            hide_negative_hits: filter.hide_negative_hits,
            inverse: filter.inverse,
            single: filter.single,
            store: base.store && !filter.no_store,
            download: !self.no_download,
            unzip: !self.no_unzip,
            download_folder: self
                .download_folder
                .clone()
                .unwrap_or(base.download_folder),
        })
    }
}
