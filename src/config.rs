use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Engine configuration.
///
/// Everything the engine touches lives under `root`: raw page bodies and
/// their git repositories under `content/`, page records under `records/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Root directory of the vault.
    pub root: PathBuf,
    /// Domain used to synthesize commit signature emails, since callers
    /// supply only a username.
    #[serde(default = "default_email_domain")]
    pub email_domain: String,
}

fn default_email_domain() -> String {
    "wiki.local".to_string()
}

impl VaultConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            email_domain: default_email_domain(),
        }
    }

    /// Read configuration from environment variables:
    /// - `WIKIVAULT_ROOT` (default `./wiki-data`) — the vault root
    /// - `WIKIVAULT_EMAIL_DOMAIN` (optional) — commit email domain
    pub fn from_env() -> Self {
        let root = std::env::var("WIKIVAULT_ROOT").unwrap_or_else(|_| "./wiki-data".to_string());
        let mut config = Self::new(root);
        if let Ok(domain) = std::env::var("WIKIVAULT_EMAIL_DOMAIN") {
            config.email_domain = domain;
        }
        config
    }

    /// Directory holding raw page content and per-course git repositories.
    pub fn content_dir(&self) -> PathBuf {
        self.root.join("content")
    }

    /// Directory holding the JSON page records, outside any git repository
    /// so record writes never appear in a page's version history.
    pub fn records_dir(&self) -> PathBuf {
        self.root.join("records")
    }

    /// Commit signature email for a username.
    pub fn commit_email(&self, author: &str) -> String {
        format!("{}@{}", author, self.email_domain)
    }
}
