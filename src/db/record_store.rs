use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::models::page::{CourseKey, ExternalPage, Page, PageKind};

/// Record persistence seam for page metadata.
///
/// The engine only needs upsert/find/list semantics; the backing record
/// store belongs to the surrounding application. Abstracted as a trait
/// so tests can mock the record layer.
#[cfg_attr(test, mockall::automock)]
pub trait PageRecordStore: Send + Sync {
    /// Insert or replace the record for a page (matched by identity).
    fn upsert(&self, page: &Page) -> Result<(), StoreError>;

    /// Find a page record by its full identity.
    fn find(
        &self,
        course: &CourseKey,
        kind: PageKind,
        slug: &str,
    ) -> Result<Option<Page>, StoreError>;

    /// List a course offering's pages, excluding hidden pages unless the
    /// viewer has staff privilege.
    fn list_visible(&self, course: &CourseKey, viewer_is_staff: bool)
        -> Result<Vec<Page>, StoreError>;

    /// Insert or replace an external page (matched by course, kind, link).
    fn upsert_external(&self, page: &ExternalPage) -> Result<(), StoreError>;

    fn list_external(&self, course: &CourseKey) -> Result<Vec<ExternalPage>, StoreError>;
}

/// All records of one course offering, as serialized to disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CourseRecords {
    #[serde(default)]
    pages: Vec<Page>,
    #[serde(default)]
    external: Vec<ExternalPage>,
}

/// File-backed implementation of [`PageRecordStore`].
///
/// One JSON file per course offering under the records directory, kept
/// outside the content tree so record writes never show up in a page's
/// version history.
pub struct JsonRecordStore {
    dir: PathBuf,
}

impl JsonRecordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn course_file(&self, course: &CourseKey) -> PathBuf {
        self.dir.join(format!(
            "{}-{}.json",
            course.course_dir_name(),
            course.offering_dir_name()
        ))
    }

    fn load_course(&self, course: &CourseKey) -> Result<CourseRecords, StoreError> {
        let path = self.course_file(course);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(CourseRecords::default())
            }
            Err(e) => return Err(StoreError::Io(e)),
        };
        serde_json::from_str(&content)
            .map_err(|e| StoreError::Record(format!("corrupt record file {}: {e}", path.display())))
    }

    fn save_course(&self, course: &CourseKey, records: &CourseRecords) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| StoreError::Record(format!("failed to encode records: {e}")))?;
        fs::write(self.course_file(course), json)?;
        Ok(())
    }
}

impl PageRecordStore for JsonRecordStore {
    fn upsert(&self, page: &Page) -> Result<(), StoreError> {
        let mut records = self.load_course(&page.course)?;
        // A slug names one page per course offering: replacing a page of
        // another kind under the same slug would silently retarget its
        // file path, so a cross-kind collision is rejected instead.
        match records.pages.iter_mut().find(|p| p.slug == page.slug) {
            Some(existing) if existing.kind == page.kind => *existing = page.clone(),
            Some(existing) => {
                return Err(StoreError::Record(format!(
                    "slug '{}' already used by a {} page in {}",
                    page.slug, existing.kind, page.course
                )))
            }
            None => records.pages.push(page.clone()),
        }
        self.save_course(&page.course, &records)
    }

    fn find(
        &self,
        course: &CourseKey,
        kind: PageKind,
        slug: &str,
    ) -> Result<Option<Page>, StoreError> {
        let records = self.load_course(course)?;
        Ok(records
            .pages
            .into_iter()
            .find(|p| p.kind == kind && p.slug == slug))
    }

    fn list_visible(
        &self,
        course: &CourseKey,
        viewer_is_staff: bool,
    ) -> Result<Vec<Page>, StoreError> {
        let records = self.load_course(course)?;
        Ok(records
            .pages
            .into_iter()
            .filter(|p| p.can_view(viewer_is_staff))
            .collect())
    }

    fn upsert_external(&self, page: &ExternalPage) -> Result<(), StoreError> {
        let mut records = self.load_course(&page.course)?;
        match records
            .external
            .iter_mut()
            .find(|p| p.kind == page.kind && p.link == page.link)
        {
            Some(existing) => *existing = page.clone(),
            None => records.external.push(page.clone()),
        }
        self.save_course(&page.course, &records)
    }

    fn list_external(&self, course: &CourseKey) -> Result<Vec<ExternalPage>, StoreError> {
        Ok(self.load_course(course)?.external)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::page::Term;

    fn sample_course() -> CourseKey {
        CourseKey::new("MATH", 151, Term::Fall, 2011)
    }

    fn store() -> (tempfile::TempDir, JsonRecordStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonRecordStore::new(dir.path().join("records"));
        (dir, store)
    }

    #[test]
    fn test_find_on_empty_store() {
        let (_dir, store) = store();
        let found = store
            .find(&sample_course(), PageKind::LectureNote, "lecture-1")
            .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_upsert_then_find() {
        let (_dir, store) = store();
        let mut page = Page::new(sample_course(), PageKind::LectureNote, "lecture-1", "alice");
        page.subject = Some("Limits".to_string());
        store.upsert(&page).unwrap();

        let found = store
            .find(&sample_course(), PageKind::LectureNote, "lecture-1")
            .unwrap()
            .unwrap();
        assert_eq!(found.subject.as_deref(), Some("Limits"));
        assert_eq!(found.maintainer, "alice");
    }

    #[test]
    fn test_upsert_replaces_by_identity() {
        let (_dir, store) = store();
        let mut page = Page::new(sample_course(), PageKind::LectureNote, "lecture-1", "alice");
        store.upsert(&page).unwrap();

        page.subject = Some("Continuity".to_string());
        store.upsert(&page).unwrap();

        let records = store.list_visible(&sample_course(), true).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].subject.as_deref(), Some("Continuity"));
    }

    #[test]
    fn test_slug_is_unique_across_kinds_within_a_course() {
        let (_dir, store) = store();
        store
            .upsert(&Page::new(sample_course(), PageKind::LectureNote, "week-1", "alice"))
            .unwrap();

        let err = store
            .upsert(&Page::new(sample_course(), PageKind::CourseQuiz, "week-1", "bob"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Record(_)));

        assert_eq!(store.list_visible(&sample_course(), true).unwrap().len(), 1);
    }

    #[test]
    fn test_list_visible_respects_hidden_flag() {
        let (_dir, store) = store();
        let mut hidden = Page::new(sample_course(), PageKind::LectureNote, "hidden", "alice");
        hidden.hidden = true;
        store.upsert(&hidden).unwrap();
        store
            .upsert(&Page::new(sample_course(), PageKind::LectureNote, "shown", "alice"))
            .unwrap();

        let public = store.list_visible(&sample_course(), false).unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].slug, "shown");

        let staff = store.list_visible(&sample_course(), true).unwrap();
        assert_eq!(staff.len(), 2);
    }

    #[test]
    fn test_courses_are_isolated() {
        let (_dir, store) = store();
        let other = CourseKey::new("POLI", 244, Term::Winter, 2012);
        store
            .upsert(&Page::new(sample_course(), PageKind::LectureNote, "l1", "alice"))
            .unwrap();

        assert!(store.list_visible(&other, true).unwrap().is_empty());
    }

    #[test]
    fn test_external_pages_round_trip() {
        let (_dir, store) = store();
        let ext = ExternalPage {
            course: sample_course(),
            kind: PageKind::External,
            link: "https://example.com/videos".to_string(),
            title: "Videos".to_string(),
            description: Some("Recorded lectures".to_string()),
            maintainer: Some("alice".to_string()),
        };
        store.upsert_external(&ext).unwrap();

        let listed = store.list_external(&sample_course()).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Videos");
    }

    #[test]
    fn test_corrupt_record_file_is_record_error() {
        let (_dir, store) = store();
        fs::create_dir_all(&store.dir).unwrap();
        fs::write(store.course_file(&sample_course()), "{ not json").unwrap();

        let err = store.find(&sample_course(), PageKind::LectureNote, "x").unwrap_err();
        assert!(matches!(err, StoreError::Record(_)));
    }
}
