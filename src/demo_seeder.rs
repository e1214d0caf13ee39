use std::collections::HashMap;

use crate::error::StoreError;
use crate::models::page::{CourseKey, Page, PageKind, Term};
use crate::vault::Vault;

/// Seed a demo course offering so a fresh vault has something to browse.
///
/// Pages that already exist are left alone, so seeding is safe to run on
/// every startup.
pub fn seed_demo_course(vault: &Vault) -> Result<CourseKey, StoreError> {
    tracing::info!("Starting demo course seeding...");

    let course = CourseKey::new("MATH", 151, Term::Fall, 2026);

    // Demo content is embedded directly into the binary.
    let demo_pages: Vec<(PageKind, &str, &str, &str)> = vec![
        (
            PageKind::LectureNote,
            "lecture-1",
            "Limits and continuity",
            include_str!("../demo_data/lecture_1.md"),
        ),
        (
            PageKind::LectureNote,
            "lecture-2",
            "Derivatives",
            include_str!("../demo_data/lecture_2.md"),
        ),
        (
            PageKind::CourseSummary,
            "midterm-review",
            "Midterm review",
            include_str!("../demo_data/midterm_review.md"),
        ),
    ];

    for (kind, slug, subject, content) in demo_pages {
        match vault.records().find(&course, kind, slug) {
            Ok(Some(_)) => {
                tracing::info!("Page '{}' already exists, skipping.", slug);
                continue;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!("Failed to check for existing page '{}': {}", slug, e);
                continue;
            }
        }

        let mut page = Page::new(course.clone(), kind, slug, "system");
        let mut fields = HashMap::new();
        fields.insert("subject".to_string(), subject.to_string());
        vault.edit(&mut page, &fields)?;

        match vault.save_full(&mut page, content, "Seed demo content", "system") {
            Ok(commit) => tracing::info!("Seeded '{}' as commit {}.", slug, commit),
            Err(e) => tracing::error!("Failed to seed '{}': {}", slug, e),
        }
    }

    tracing::info!("Demo course seeding completed.");
    Ok(course)
}
