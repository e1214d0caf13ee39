//! Save orchestration — separated from any presentation layer for
//! testability.
//!
//! Every operation here is synchronous and blocking; a save is a single
//! transaction from the caller's perspective, stepping through
//! resolve → render → persist record → write body → commit. There is no
//! locking: at most one writer per page is assumed, and concurrent saves
//! of the same page are last-write-wins. Saves of different pages touch
//! disjoint paths and version logs and are independent.

use std::collections::HashMap;
use std::ops::Range;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::VaultConfig;
use crate::db::record_store::{JsonRecordStore, PageRecordStore};
use crate::error::StoreError;
use crate::models::page::{CourseKey, Page};
use crate::rendering::markdown::{content_digest, render_markdown};
use crate::sections;
use crate::storage::{content_store, paths};
use crate::vcs::repository::{CommitEntry, CommitId, PageRepo};

/// The content engine: owns the vault layout and the record store, and
/// orchestrates path resolution, file storage, rendering and the version
/// log for every page operation.
pub struct Vault {
    config: VaultConfig,
    records: Arc<dyn PageRecordStore>,
}

impl Vault {
    /// Build a vault over an explicit record store (useful for tests/DI).
    pub fn new(config: VaultConfig, records: Arc<dyn PageRecordStore>) -> Self {
        Self { config, records }
    }

    /// Open a vault with the built-in JSON record store under the
    /// configured records directory.
    pub fn open(config: VaultConfig) -> Self {
        let records = Arc::new(JsonRecordStore::new(config.records_dir()));
        Self::new(config, records)
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn records(&self) -> &dyn PageRecordStore {
        self.records.as_ref()
    }

    /// Absolute path of a page's raw body file.
    pub fn filepath(&self, page: &Page) -> PathBuf {
        paths::content_path(&self.config, page)
    }

    /// Read a page's full raw body.
    pub fn load_content(&self, page: &Page) -> Result<String, StoreError> {
        content_store::load(&self.filepath(page))
    }

    /// Read the section of a page identified by `anchor`.
    ///
    /// Returns the section text (joined with `\n`, as handed to edit
    /// forms) together with the located line range, so the caller can
    /// pass the range back into [`Vault::save_section`].
    pub fn load_section_content(
        &self,
        page: &Page,
        anchor: &str,
    ) -> Result<(String, Range<usize>), StoreError> {
        let content = self.load_content(page)?;
        let lines: Vec<&str> = content.lines().collect();
        let range = sections::locate(&lines, anchor)?;
        let section = lines[range.clone()].join("\n");
        Ok((section, range))
    }

    /// Replace a page's entire raw body and record one commit.
    ///
    /// Pipeline: normalize the terminator, refresh the rendered cache,
    /// persist the record, write the body, commit. The record and the
    /// file are both updated before the commit is attempted, so the
    /// commit reflects exactly the new content — never a mix of old file
    /// and new metadata. Returns the new commit identifier.
    pub fn save_full(
        &self,
        page: &mut Page,
        content: &str,
        message: &str,
        author: &str,
    ) -> Result<CommitId, StoreError> {
        // 1. Normalize so the stored body ends with one terminator.
        let content = content_store::normalize_terminator(content);

        // 2. Refresh the rendered cache and its freshness digest.
        page.rendered_html = render_markdown(&content);
        page.content_digest = content_digest(&content);
        page.last_updated = chrono::Utc::now();

        // 3. Persist the page record.
        self.records
            .upsert(page)
            .map_err(|e| StoreError::during("persisting the page record", e))?;

        // 4. Write the raw body at the resolved path.
        let path = self.filepath(page);
        content_store::save(&path, &content)
            .map_err(|e| StoreError::during("writing content", e))?;

        // 5. Commit the working tree. A failure here leaves the tree
        //    dirty and uncommitted; it is reported as a failed save.
        let repo = PageRepo::open_or_init(&paths::course_dir(&self.config, &page.course))
            .map_err(|e| StoreError::during("opening the version log", e))?;
        let commit_id = repo
            .commit_all(message, author, &self.config.commit_email(author))
            .map_err(|e| StoreError::during("committing", e))?;

        tracing::info!(
            "Saved {} ({} bytes) as commit {}",
            paths::page_url(page),
            content.len(),
            commit_id
        );
        Ok(commit_id)
    }

    /// Replace a contiguous line range of a page's body and record one
    /// commit.
    ///
    /// With a valid range (`end > 0` and `end <=` current line count)
    /// only `[start, end)` is replaced by `content`. An out-of-bounds
    /// `end` falls back to replacing the whole document with `content`
    /// verbatim — see [`splice_lines`] for why that fallback exists.
    pub fn save_section(
        &self,
        page: &mut Page,
        content: &str,
        message: &str,
        author: &str,
        start: usize,
        end: usize,
    ) -> Result<CommitId, StoreError> {
        let merged = if end > 0 {
            let existing = self.load_content(page)?;
            splice_lines(&existing, content, start, end)
        } else {
            content.to_string()
        };

        self.save_full(page, &merged, message, author)
    }

    /// Copy the page kind's declared editable fields from `fields` into
    /// the record and persist it. Fields outside the declared set are
    /// ignored, never errors. The raw body file is untouched.
    pub fn edit(&self, page: &mut Page, fields: &HashMap<String, String>) -> Result<(), StoreError> {
        for field in page.kind.spec().editable_fields {
            if let Some(value) = fields.get(*field) {
                page.set_field(field, value);
            }
        }
        page.last_updated = chrono::Utc::now();
        self.records.upsert(page)
    }

    /// Identifier of the most recent commit in the page's version log.
    pub fn latest_commit(&self, page: &Page) -> Result<CommitId, StoreError> {
        let repo = PageRepo::open_or_init(&paths::course_dir(&self.config, &page.course))?;
        repo.head_commit()
    }

    /// Commit metadata for the page's course offering, newest first.
    pub fn history(&self, page: &Page, limit: usize) -> Result<Vec<CommitEntry>, StoreError> {
        let repo = PageRepo::open_or_init(&paths::course_dir(&self.config, &page.course))?;
        repo.history(limit)
    }

    /// A course offering's pages, as the given viewer may see them.
    pub fn visible_pages(
        &self,
        course: &CourseKey,
        viewer_is_staff: bool,
    ) -> Result<Vec<Page>, StoreError> {
        self.records.list_visible(course, viewer_is_staff)
    }
}

/// Replace lines `[start, end)` of `existing` with `replacement`.
///
/// When `end` exceeds the current line count the supplied range is
/// treated as invalid and the WHOLE document becomes `replacement`,
/// verbatim. That fallback is inherited behavior, kept as an explicit
/// code path so it stays visible and tested; a strict range error may be
/// the better long-term contract.
fn splice_lines(existing: &str, replacement: &str, start: usize, end: usize) -> String {
    let lines: Vec<&str> = existing.lines().collect();
    if end > lines.len() {
        return replacement.to_string();
    }

    let mut merged: Vec<&str> = Vec::with_capacity(lines.len());
    merged.extend(&lines[..start.min(lines.len())]);
    merged.extend(replacement.lines());
    merged.extend(&lines[end..]);
    merged.join(content_store::LINE_TERMINATOR)
}
