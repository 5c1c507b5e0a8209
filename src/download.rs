//! Binary download with progress reporting

use std::path::{Path, PathBuf};

use futures::{Stream, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::config::FETCH_TIMEOUT;
use crate::platform::Platform;
use crate::version::value::Version;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected status {0} while downloading")]
    Status(reqwest::StatusCode),

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Extraction task failed: {0}")]
    Task(String),
}

pub struct Downloader {
    client: reqwest::Client,
    show_progress: bool,
}

impl Downloader {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("chromium-fetcher")
                .connect_timeout(FETCH_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            show_progress: true,
        }
    }

    /// Disables the terminal progress bar
    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Downloads the archive at `url` into `folder`
    ///
    /// Returns the extracted directory when `unzip` is set (the archive is
    /// removed afterwards), otherwise the archive path.
    pub async fn download(
        &self,
        url: &str,
        version: Version,
        platform: Platform,
        folder: &Path,
        unzip: bool,
    ) -> Result<PathBuf, DownloadError> {
        let stem = format!("chromium-{}-{}-{}", version, platform.os(), platform.arch());
        let archive_path = folder.join(format!("{stem}.zip"));

        tokio::fs::create_dir_all(folder).await?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status(status));
        }

        let progress = self.progress_bar(response.content_length());
        save_stream(response.bytes_stream(), &archive_path, &progress).await?;
        progress.finish_and_clear();
        info!("Downloaded {} to {:?}", version, archive_path);

        if !unzip {
            return Ok(archive_path);
        }

        let target = folder.join(&stem);
        extract(&archive_path, &target).await?;
        tokio::fs::remove_file(&archive_path).await?;
        info!("Extracted {} to {:?}", version, target);
        Ok(target)
    }

    fn progress_bar(&self, total: Option<u64>) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress = ProgressBar::new(total.unwrap_or(0));
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta})")
        {
            progress.set_style(style.progress_chars("#>-"));
        }
        progress
    }
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes the stream to `path`, removing the partial file on failure
async fn save_stream<St, B, E>(
    stream: St,
    path: &Path,
    progress: &ProgressBar,
) -> Result<(), DownloadError>
where
    St: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<DownloadError>,
{
    let written = write_stream(stream, path, progress).await;
    if written.is_err() {
        if let Err(e) = tokio::fs::remove_file(path).await {
            debug!("Could not remove partial download {:?}: {}", path, e);
        }
    }
    written
}

async fn write_stream<St, B, E>(
    stream: St,
    path: &Path,
    progress: &ProgressBar,
) -> Result<(), DownloadError>
where
    St: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<DownloadError>,
{
    let mut stream = std::pin::pin!(stream);
    let mut file = tokio::fs::File::create(path).await?;

    while let Some(chunk) = stream.next().await {
        let chunk: B = match chunk {
            Ok(chunk) => chunk,
            Err(e) => return Err(e.into()),
        };
        let bytes = chunk.as_ref();
        file.write_all(bytes).await?;
        progress.inc(bytes.len() as u64);
    }
    file.flush().await?;
    Ok(())
}

async fn extract(archive_path: &Path, target: &Path) -> Result<(), DownloadError> {
    let archive_path = archive_path.to_path_buf();
    let target = target.to_path_buf();
    debug!("Extracting {:?} into {:?}", archive_path, target);

    tokio::task::spawn_blocking(move || {
        let file = std::fs::File::open(&archive_path)?;
        let mut archive = zip::ZipArchive::new(file)?;
        std::fs::create_dir_all(&target)?;
        archive.extract(&target)?;
        Ok(())
    })
    .await
    .map_err(|e| DownloadError::Task(e.to_string()))?
}
