use tempfile::TempDir;

use wikivault::config::VaultConfig;
use wikivault::models::page::{CourseKey, Page, PageKind, Term};
use wikivault::vault::Vault;
use wikivault::vcs::repository::CommitId;

/// Builds a real engine on a temporary directory for integration tests.
///
/// The directory lives for as long as this struct does; on drop the
/// whole vault (content, repositories, records) is cleaned up.
pub struct TestEnv {
    _tmp: TempDir,
    pub vault: Vault,
}

impl TestEnv {
    pub fn start() -> Self {
        let tmp = TempDir::new().expect("Failed to create temp vault root");
        let vault = Vault::open(VaultConfig::new(tmp.path()));
        Self { _tmp: tmp, vault }
    }

    /// The course offering the tests write into.
    pub fn course(&self) -> CourseKey {
        CourseKey::new("MATH", 151, Term::Fall, 2011)
    }

    /// A fresh lecture-note page record owned by `alice`.
    pub fn page(&self, slug: &str) -> Page {
        Page::new(self.course(), PageKind::LectureNote, slug, "alice")
    }

    /// Create a page and save its initial body in one step.
    pub fn seeded_page(&self, slug: &str, content: &str) -> (Page, CommitId) {
        let mut page = self.page(slug);
        let commit = self
            .vault
            .save_full(&mut page, content, "Initial version", "alice")
            .expect("Failed to seed page");
        (page, commit)
    }
}
