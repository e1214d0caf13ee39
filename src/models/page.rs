use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Academic term of a course offering.
///
/// The lower-case string forms appear in file paths and URLs, so the
/// mapping must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    Fall,
    Winter,
    Summer,
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Fall => write!(f, "fall"),
            Term::Winter => write!(f, "winter"),
            Term::Summer => write!(f, "summer"),
        }
    }
}

impl Term {
    /// Parse a term from a string (case-insensitive).
    pub fn from_str_ci(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fall" => Some(Term::Fall),
            "winter" => Some(Term::Winter),
            "summer" => Some(Term::Summer),
            _ => None,
        }
    }
}

/// Identifies one course offering: a course in a specific term.
///
/// Together with a page kind and slug this forms a page's full identity;
/// every identity field participates in path and URL derivation, and none
/// may change without moving the backing file (which the engine does not
/// do — see DESIGN.md).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseKey {
    /// Department short name, e.g. `MATH`. Lower-cased for paths/URLs.
    pub department: String,
    /// Course number within the department.
    pub number: u16,
    pub term: Term,
    pub year: u16,
}

impl CourseKey {
    pub fn new(department: impl Into<String>, number: u16, term: Term, year: u16) -> Self {
        Self {
            department: department.into(),
            number,
            term,
            year,
        }
    }

    /// Directory name for the course, e.g. `math-151`.
    pub fn course_dir_name(&self) -> String {
        format!("{}-{}", self.department.to_lowercase(), self.number)
    }

    /// Directory name for the offering, e.g. `fall-2011`.
    pub fn offering_dir_name(&self) -> String {
        format!("{}-{}", self.term, self.year)
    }
}

impl fmt::Display for CourseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({} {})",
            self.department.to_uppercase(),
            self.number,
            self.term,
            self.year
        )
    }
}

/// Static capability descriptor for a page kind.
///
/// Field names refer to the optional attributes of [`Page`]; a kind's
/// `editable_fields` bound what [`crate::vault::Vault::edit`] will copy
/// from caller-supplied data, and `metadata_fields` what
/// [`Page::metadata`] will report.
#[derive(Debug)]
pub struct KindSpec {
    /// URL/path segment for this kind, e.g. `lecture-notes`.
    pub segment: &'static str,
    pub editable_fields: &'static [&'static str],
    pub metadata_fields: &'static [&'static str],
}

/// The closed set of page kinds.
///
/// Each kind resolves to a static [`KindSpec`]; there is deliberately no
/// runtime registry to mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageKind {
    LectureNote,
    PastExam,
    CourseQuiz,
    VocabQuiz,
    CourseSummary,
    External,
}

impl PageKind {
    pub fn spec(&self) -> &'static KindSpec {
        match self {
            PageKind::LectureNote => &KindSpec {
                segment: "lecture-notes",
                editable_fields: &["subject", "professor"],
                metadata_fields: &["subject", "professor"],
            },
            PageKind::PastExam => &KindSpec {
                segment: "past-exams",
                editable_fields: &["title", "link", "professor"],
                metadata_fields: &["professor", "link"],
            },
            PageKind::CourseQuiz => &KindSpec {
                segment: "course-quizzes",
                editable_fields: &["title", "subject"],
                metadata_fields: &["subject"],
            },
            PageKind::VocabQuiz => &KindSpec {
                segment: "vocab-quizzes",
                editable_fields: &["title", "subject"],
                metadata_fields: &["subject"],
            },
            PageKind::CourseSummary => &KindSpec {
                segment: "summaries",
                editable_fields: &["title", "subject"],
                metadata_fields: &["subject"],
            },
            PageKind::External => &KindSpec {
                segment: "external",
                editable_fields: &["title", "link"],
                metadata_fields: &["link"],
            },
        }
    }

    /// Parse a kind from its URL/path segment.
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "lecture-notes" => Some(PageKind::LectureNote),
            "past-exams" => Some(PageKind::PastExam),
            "course-quizzes" => Some(PageKind::CourseQuiz),
            "vocab-quizzes" => Some(PageKind::VocabQuiz),
            "summaries" => Some(PageKind::CourseSummary),
            "external" => Some(PageKind::External),
            _ => None,
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.spec().segment)
    }
}

/// A version-controlled wiki page.
///
/// The raw markdown body lives on disk at the path derived from
/// (course, kind, slug); `rendered_html` is a cache of `render(body)`,
/// valid iff `content_digest` matches the digest of the current body.
/// Both cache fields are recomputed on every save and are never
/// independently authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub course: CourseKey,
    pub kind: PageKind,
    /// URL-safe slug, unique within (course, kind).
    pub slug: String,
    /// Human-readable title; falls back to `subject` when absent.
    pub title: Option<String>,
    /// Topic covered; applicability depends on the page kind.
    #[serde(default)]
    pub subject: Option<String>,
    /// Related external link; applicability depends on the page kind.
    #[serde(default)]
    pub link: Option<String>,
    /// Professor the material is associated with.
    #[serde(default)]
    pub professor: Option<String>,
    /// Username of the owning user.
    pub maintainer: String,
    /// Hidden pages stay on disk and in history but are excluded from
    /// listings for non-staff viewers (used for takedown requests).
    #[serde(default)]
    pub hidden: bool,
    /// Cached rendered form of the raw body.
    #[serde(default)]
    pub rendered_html: String,
    /// SHA-256 digest of the raw body the cache was rendered from.
    #[serde(default)]
    pub content_digest: String,
    pub last_updated: DateTime<Utc>,
}

impl Page {
    /// Create a page record with empty optional fields and an unfilled
    /// render cache. The cache is populated by the first save.
    pub fn new(
        course: CourseKey,
        kind: PageKind,
        slug: impl Into<String>,
        maintainer: impl Into<String>,
    ) -> Self {
        Self {
            course,
            kind,
            slug: slug.into(),
            title: None,
            subject: None,
            link: None,
            professor: None,
            maintainer: maintainer.into(),
            hidden: false,
            rendered_html: String::new(),
            content_digest: String::new(),
            last_updated: Utc::now(),
        }
    }

    /// Display title: the explicit title when set, otherwise the subject,
    /// otherwise the slug.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.subject.as_deref())
            .unwrap_or(&self.slug)
    }

    /// Whether the given viewer may see this page.
    pub fn can_view(&self, viewer_is_staff: bool) -> bool {
        !self.hidden || viewer_is_staff
    }

    /// The kind's declared metadata fields that currently hold a
    /// non-empty value. Declared-but-empty fields are omitted.
    pub fn metadata(&self) -> BTreeMap<&'static str, String> {
        let mut out = BTreeMap::new();
        for field in self.kind.spec().metadata_fields {
            if let Some(value) = self.field(field) {
                if !value.is_empty() {
                    out.insert(*field, value.to_string());
                }
            }
        }
        out
    }

    /// Read an optional attribute by field name.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "title" => self.title.as_deref(),
            "subject" => self.subject.as_deref(),
            "link" => self.link.as_deref(),
            "professor" => self.professor.as_deref(),
            _ => None,
        }
    }

    /// Set an optional attribute by field name. Empty values clear the
    /// field. Unknown names are ignored, matching the edit contract.
    pub fn set_field(&mut self, name: &str, value: &str) {
        let slot = match name {
            "title" => &mut self.title,
            "subject" => &mut self.subject,
            "link" => &mut self.link,
            "professor" => &mut self.professor,
            _ => return,
        };
        *slot = if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        };
    }
}

/// A page whose content lives outside the store, e.g. a link to lecture
/// recordings. No file storage, no versioning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalPage {
    pub course: CourseKey,
    pub kind: PageKind,
    pub link: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub maintainer: Option<String>,
}

impl ExternalPage {
    /// External pages resolve straight to their target link.
    pub fn absolute_url(&self) -> &str {
        &self.link
    }
}
