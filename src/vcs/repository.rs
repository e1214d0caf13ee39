//! Version log for a course offering's content tree.
//!
//! One git repository per course offering, rooted at the offering's
//! content directory. The engine only ever snapshots the whole working
//! tree: exactly one commit per successful save, no retries, no merges.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use git2::{ErrorCode, IndexAddOption, Repository, Signature};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Opaque identifier of one commit in a page repository's version log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommitId(String);

impl CommitId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<git2::Oid> for CommitId {
    fn from(oid: git2::Oid) -> Self {
        CommitId(oid.to_string())
    }
}

/// Metadata of one commit, newest-first in [`PageRepo::history`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitEntry {
    pub id: CommitId,
    pub message: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
}

/// Wrapper around one course offering's git repository.
pub struct PageRepo {
    repo: Repository,
}

impl PageRepo {
    /// Open the repository at `root`, initializing it (and the directory)
    /// on first use.
    pub fn open_or_init(root: &Path) -> Result<Self, StoreError> {
        let repo = match Repository::open(root) {
            Ok(repo) => repo,
            Err(_) => Repository::init(root)?,
        };
        Ok(Self { repo })
    }

    /// Stage every change under the root and record exactly one commit.
    ///
    /// `author` is a username; the signature email is synthesized by the
    /// caller. A failure here leaves the working tree modified but
    /// uncommitted — that inconsistency window is surfaced through the
    /// returned error, never papered over.
    pub fn commit_all(
        &self,
        message: &str,
        author: &str,
        email: &str,
    ) -> Result<CommitId, StoreError> {
        let mut index = self.repo.index()?;
        index.add_all(["*"], IndexAddOption::DEFAULT, None)?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = Signature::now(author, email)?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if is_empty_repo(&e) => None,
            Err(e) => return Err(e.into()),
        };
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;
        Ok(oid.into())
    }

    /// Identifier of the most recent commit.
    ///
    /// Fails with `NoHistory` if nothing has ever been committed.
    pub fn head_commit(&self) -> Result<CommitId, StoreError> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if is_empty_repo(&e) => return Err(StoreError::NoHistory),
            Err(e) => return Err(e.into()),
        };
        Ok(head.peel_to_commit()?.id().into())
    }

    /// Commit metadata, newest first, at most `limit` entries.
    pub fn history(&self, limit: usize) -> Result<Vec<CommitEntry>, StoreError> {
        let mut walk = self.repo.revwalk()?;
        match walk.push_head() {
            Ok(()) => {}
            Err(e) if is_empty_repo(&e) => return Err(StoreError::NoHistory),
            Err(e) => return Err(e.into()),
        }

        let mut entries = Vec::new();
        for oid in walk.take(limit) {
            let commit = self.repo.find_commit(oid?)?;
            entries.push(CommitEntry {
                id: commit.id().into(),
                message: commit.message().unwrap_or("").trim_end().to_string(),
                author: commit.author().name().unwrap_or("unknown").to_string(),
                timestamp: DateTime::from_timestamp(commit.time().seconds(), 0)
                    .unwrap_or_default(),
            });
        }
        Ok(entries)
    }
}

fn is_empty_repo(e: &git2::Error) -> bool {
    matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound)
}
