//! Download of command documentation
//!
//! Fills a documentation directory with one `<command>.md` file per completable
//! command, fetched from a mirror of the Redis command docs.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::file_name;
use crate::error::Result;
use crate::parser::vocabulary;

const USER_AGENT: &str = concat!("redis-lsp/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of a fetch run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FetchSummary {
    /// Number of files written
    pub written: usize,
    /// Commands whose documentation could not be fetched
    pub failed: Vec<String>,
}

/// Fetches documentation pages over HTTP into a directory
pub struct DocumentationFetcher {
    http: reqwest::Client,
    source_url: String,
    directory: PathBuf,
}

impl DocumentationFetcher {
    /// Create a fetcher
    ///
    /// # Arguments
    /// * `source_url` - Base URL holding `<name>.md` files
    /// * `directory` - Where the files are written, created when missing
    pub fn new(source_url: &str, directory: impl Into<PathBuf>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            source_url: source_url.trim_end_matches('/').to_string(),
            directory: directory.into(),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Fetch documentation for every command in the vocabulary
    pub async fn fetch_all(&self) -> Result<FetchSummary> {
        self.fetch(vocabulary::commands()).await
    }

    /// Fetch documentation for `labels`, one request each.
    ///
    /// A page that cannot be fetched is recorded in the summary and the run
    /// goes on. Only failing to create the directory aborts.
    pub async fn fetch(&self, labels: &[String]) -> Result<FetchSummary> {
        fs::create_dir_all(&self.directory)?;
        info!(
            commands = labels.len(),
            directory = %self.directory.display(),
            "fetching documentation"
        );

        let mut summary = FetchSummary::default();
        for label in labels {
            match self.fetch_one(label).await {
                Ok(path) => {
                    debug!(path = %path.display(), "wrote documentation");
                    summary.written += 1;
                }
                Err(e) => {
                    warn!(command = %label, error = %e, "could not fetch documentation");
                    summary.failed.push(label.clone());
                }
            }
        }

        info!(
            written = summary.written,
            failed = summary.failed.len(),
            "documentation fetch finished"
        );
        Ok(summary)
    }

    async fn fetch_one(&self, label: &str) -> Result<PathBuf> {
        let name = file_name(label)
            .ok_or_else(|| format!("'{label}' does not name a documentation file"))?;
        let url = format!("{}/{name}", self.source_url);

        let body = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let path = self.directory.join(name);
        fs::write(&path, body)?;
        Ok(path)
    }
}
