//! Sequential image batch downloader
//!
//! Fetches `1.ext` through `count.ext` below a base URL, one after another,
//! and stores them in a local directory with their index shifted by a fixed
//! amount.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use thiserror::Error;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

static NUMBERED_JPG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\.jpg").expect("static pattern"));

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Request for {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One batch of numbered images to fetch
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadJob {
    /// URL the numbered files live under, without a trailing slash
    pub base_url: String,
    pub dest: PathBuf,
    pub count: u32,
    /// Added to the number of each downloaded file
    pub start_index: i64,
    pub extension: String,
}

impl DownloadJob {
    pub fn new(base_url: impl Into<String>, dest: impl Into<PathBuf>, count: u32) -> Self {
        Self {
            base_url: base_url.into(),
            dest: dest.into(),
            count,
            start_index: 0,
            extension: "jpg".to_string(),
        }
    }

    pub fn with_start_index(mut self, start_index: i64) -> Self {
        self.start_index = start_index;
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Source URLs in download order
    pub fn urls(&self) -> impl Iterator<Item = String> + '_ {
        (1..=self.count).map(move |i| format!("{}/{}.{}", self.base_url, i, self.extension))
    }

    /// Local file name for a downloaded URL
    pub fn target_name(&self, url: &str) -> String {
        rename(file_name(url), self.start_index, &self.extension)
    }
}

/// Last path segment of a URL
pub fn file_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Shift the number of a `N.jpg` name by `start_index` and give it `extension`.
///
/// Names without a numbered `.jpg` part are kept unchanged.
pub fn rename(name: &str, start_index: i64, extension: &str) -> String {
    let number = NUMBERED_JPG
        .captures(name)
        .and_then(|caps| caps[1].parse::<i64>().ok());
    match number {
        Some(n) => format!("{}.{}", n + start_index, extension),
        None => name.to_string(),
    }
}

/// Download every file of `job` in order, stopping at the first failure.
///
/// Returns the paths written.
pub async fn download_batch(
    client: &Client,
    job: &DownloadJob,
) -> Result<Vec<PathBuf>, DownloadError> {
    let mut written = Vec::with_capacity(job.count as usize);
    if job.count == 0 {
        return Ok(written);
    }

    fs::create_dir_all(&job.dest)
        .await
        .map_err(|source| DownloadError::Io {
            path: job.dest.clone(),
            source,
        })?;

    for url in job.urls() {
        let path = job.dest.join(job.target_name(&url));
        download_one(client, &url, &path).await?;
        tracing::info!(%url, path = %path.display(), "downloaded");
        written.push(path);
    }
    Ok(written)
}

async fn download_one(client: &Client, url: &str, path: &Path) -> Result<(), DownloadError> {
    let http_err = |source: reqwest::Error| DownloadError::Http {
        url: url.to_string(),
        source,
    };
    let io_err = |source: std::io::Error| DownloadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(http_err)?;

    let mut file = File::create(path).await.map_err(io_err)?;
    while let Some(chunk) = response.chunk().await.map_err(http_err)? {
        file.write_all(&chunk).await.map_err(io_err)?;
    }
    file.flush().await.map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("https://host/a/b/12.jpg"), "12.jpg");
        assert_eq!(file_name("plain.jpg"), "plain.jpg");
        assert_eq!(file_name("https://host/dir/"), "");
    }

    #[test]
    fn test_rename_shifts_index() {
        assert_eq!(rename("3.jpg", 100, "jpg"), "103.jpg");
        assert_eq!(rename("3.jpg", 0, "webp"), "3.webp");
        assert_eq!(rename("img12.jpg", -2, "jpg"), "10.jpg");
    }

    #[test]
    fn test_rename_keeps_other_names() {
        assert_eq!(rename("3.png", 100, "png"), "3.png");
        assert_eq!(rename("cover.jpg", 5, "jpg"), "cover.jpg");
    }

    #[test]
    fn test_job_urls_and_targets() {
        let job = DownloadJob::new("https://cdn.example/book", "out", 3).with_start_index(10);
        let urls: Vec<String> = job.urls().collect();
        assert_eq!(
            urls,
            vec![
                "https://cdn.example/book/1.jpg",
                "https://cdn.example/book/2.jpg",
                "https://cdn.example/book/3.jpg",
            ]
        );
        assert_eq!(job.target_name(&urls[2]), "13.jpg");
    }

    #[tokio::test]
    async fn test_zero_count_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("never");
        let job = DownloadJob::new("http://127.0.0.1:9", &dest, 0);
        let written = download_batch(&Client::new(), &job).await.unwrap();
        assert!(written.is_empty());
        assert!(!dest.exists());
    }
}
