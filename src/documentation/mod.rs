//! Command documentation lookup
//!
//! Documentation lives in a directory of markdown files, one per command, named
//! after the command in lower case with spaces replaced by dashes
//! (`ACL GETUSER` → `acl-getuser.md`). The `docs fetch` subcommand fills that
//! directory through [`DocumentationFetcher`].

mod fetch;

pub use fetch::{DocumentationFetcher, FetchSummary};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;

/// Reads command documentation from disk
#[derive(Debug, Clone, Default)]
pub struct DocumentationStore {
    directory: Option<PathBuf>,
}

impl DocumentationStore {
    /// Create a store reading from `directory`, or a store that finds nothing
    pub fn new(directory: Option<PathBuf>) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Read the raw markdown for a completion label
    pub fn lookup(&self, label: &str) -> Result<String> {
        let directory = self.directory.as_ref().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "no documentation directory configured")
        })?;

        let name = file_name(label).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("no documentation file for label '{label}'"),
            )
        })?;

        let path = directory.join(name);
        debug!(path = %path.display(), "reading documentation");
        Ok(fs::read_to_string(path)?)
    }

    /// Documentation rendered as markdown under a `### <label>` heading
    pub fn markdown(&self, label: &str) -> Result<String> {
        let body = self.lookup(label)?;
        Ok(format!("### {label}\n\n{body}"))
    }
}

/// File name for a label, `None` when the label cannot name a file
fn file_name(label: &str) -> Option<String> {
    let name = label.trim().to_lowercase().replace(' ', "-");
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    valid.then(|| format!("{name}.md"))
}
