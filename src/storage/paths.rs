//! Path and URL derivation from page identity.
//!
//! Both are pure functions of identity fields (course, kind, slug) and
//! never depend on page content. Ordinary content edits therefore never
//! move a backing file; only an identity change could, and the engine
//! does not perform such moves (see DESIGN.md).

use std::path::PathBuf;

use crate::config::VaultConfig;
use crate::models::page::{CourseKey, Page};

/// Fixed file name of a page's raw body inside its page directory.
pub const CONTENT_FILE: &str = "content.md";

/// Root of the course offering's content tree. This is also the git
/// repository root: one version log per course offering.
pub fn course_dir(config: &VaultConfig, course: &CourseKey) -> PathBuf {
    config
        .content_dir()
        .join(course.course_dir_name())
        .join(course.offering_dir_name())
}

/// Directory holding one page's files, `<course>/<kind>/<slug>/`.
pub fn page_dir(config: &VaultConfig, page: &Page) -> PathBuf {
    course_dir(config, &page.course)
        .join(page.kind.spec().segment)
        .join(&page.slug)
}

/// Full path of the page's raw body file.
pub fn content_path(config: &VaultConfig, page: &Page) -> PathBuf {
    page_dir(config, page).join(CONTENT_FILE)
}

/// Path of a page's content file relative to its repository root, as it
/// appears in the version log.
pub fn content_rel_path(page: &Page) -> PathBuf {
    PathBuf::from(page.kind.spec().segment)
        .join(&page.slug)
        .join(CONTENT_FILE)
}

/// Canonical URL path of the page view, consumed by the presentation
/// layer for link generation.
pub fn page_url(page: &Page) -> String {
    format!(
        "/{}/{}/{}/{}/{}/{}/",
        page.course.department.to_lowercase(),
        page.course.number,
        page.kind.spec().segment,
        page.course.term,
        page.course.year,
        page.slug
    )
}

pub fn edit_url(page: &Page) -> String {
    format!("{}edit/", page_url(page))
}

pub fn history_url(page: &Page) -> String {
    format!("{}history/", page_url(page))
}

pub fn print_url(page: &Page) -> String {
    format!("{}print/", page_url(page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::page::{PageKind, Term};

    fn sample_page() -> Page {
        Page::new(
            CourseKey::new("MATH", 151, Term::Fall, 2011),
            PageKind::LectureNote,
            "lecture-3",
            "alice",
        )
    }

    #[test]
    fn test_content_path_layout() {
        let config = VaultConfig::new("/srv/wiki");
        let path = content_path(&config, &sample_page());
        assert_eq!(
            path,
            PathBuf::from("/srv/wiki/content/math-151/fall-2011/lecture-notes/lecture-3/content.md")
        );
    }

    #[test]
    fn test_course_dir_is_repo_root_prefix() {
        let config = VaultConfig::new("/srv/wiki");
        let page = sample_page();
        assert!(content_path(&config, &page).starts_with(course_dir(&config, &page.course)));
    }

    #[test]
    fn test_rel_path_matches_layout() {
        assert_eq!(
            content_rel_path(&sample_page()),
            PathBuf::from("lecture-notes/lecture-3/content.md")
        );
    }

    #[test]
    fn test_path_ignores_content_fields() {
        let config = VaultConfig::new("/srv/wiki");
        let mut page = sample_page();
        let before = content_path(&config, &page);

        page.title = Some("Changed".to_string());
        page.rendered_html = "<p>changed</p>".to_string();
        assert_eq!(content_path(&config, &page), before);
    }

    #[test]
    fn test_urls() {
        let page = sample_page();
        assert_eq!(page_url(&page), "/math/151/lecture-notes/fall/2011/lecture-3/");
        assert_eq!(edit_url(&page), "/math/151/lecture-notes/fall/2011/lecture-3/edit/");
        assert_eq!(
            history_url(&page),
            "/math/151/lecture-notes/fall/2011/lecture-3/history/"
        );
        assert_eq!(print_url(&page), "/math/151/lecture-notes/fall/2011/lecture-3/print/");
    }
}
