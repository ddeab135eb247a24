//! Local filesystem link log.
//!
//! Each harvest appends to a plain text file, one URL per line. The file is
//! opened, appended to and closed for every batch, and is never truncated.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::LinkRecord;
use crate::storage::LinkLog;

/// Append-only link file.
#[derive(Debug, Clone)]
pub struct LinkFile {
    path: PathBuf,
}

impl LinkFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Link file named `file_name` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>, file_name: &str) -> Self {
        Self::new(dir.as_ref().join(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl LinkLog for LinkFile {
    async fn append(&self, links: &[LinkRecord]) -> Result<()> {
        if links.is_empty() {
            return Ok(());
        }
        self.ensure_dir().await?;

        let mut buf = String::new();
        for link in links {
            buf.push_str(link.as_str());
            buf.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(buf.as_bytes()).await?;
        file.flush().await?;
        drop(file);

        log::debug!("Appended {} links to {}", links.len(), self.path.display());
        Ok(())
    }
}

/// Read a newline-delimited link file. Blank lines are skipped and entries
/// are trimmed; duplicates are kept.
pub async fn read_link_file(path: impl AsRef<Path>) -> Result<Vec<LinkRecord>> {
    let content = tokio::fs::read_to_string(path.as_ref()).await?;
    Ok(content.lines().filter_map(LinkRecord::parse).collect())
}
