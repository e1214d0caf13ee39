mod common;

use wikivault::error::StoreError;

#[test]
fn section_edit_round_trips() {
    let env = common::TestEnv::start();
    let (mut page, _) = env.seeded_page(
        "lecture-1",
        "## Overview\r\nold summary\r\n## Details\r\nfine print\r\n",
    );

    let (_, range) = env.vault.load_section_content(&page, "Overview").unwrap();
    env.vault
        .save_section(
            &mut page,
            "new summary",
            "Rewrite overview",
            "alice",
            range.start,
            range.end,
        )
        .unwrap();

    let (section, _) = env.vault.load_section_content(&page, "Overview").unwrap();
    assert_eq!(section, "new summary");

    // The sibling section is untouched.
    let (details, _) = env.vault.load_section_content(&page, "Details").unwrap();
    assert_eq!(details, "fine print");
}

#[test]
fn section_edit_replaces_exactly_the_range() {
    let env = common::TestEnv::start();
    let (mut page, first) = env.seeded_page("lecture-1", "# Intro\r\nhello\r\n");

    let commit = env
        .vault
        .save_section(&mut page, "world\r\n", "Fix greeting", "alice", 1, 2)
        .unwrap();

    assert_ne!(first, commit);
    assert_eq!(env.vault.load_content(&page).unwrap(), "# Intro\r\nworld\r\n");
    assert!(page.rendered_html.contains("world"));
}

#[test]
fn section_edit_with_out_of_bounds_end_replaces_whole_document() {
    let env = common::TestEnv::start();
    let (mut page, _) = env.seeded_page("lecture-1", "# Intro\r\nhello\r\n");

    // end beyond the line count: the documented fallback replaces the
    // entire body rather than corrupting it.
    env.vault
        .save_section(&mut page, "entirely new", "Bad range", "alice", 1, 99)
        .unwrap();

    assert_eq!(env.vault.load_content(&page).unwrap(), "entirely new\r\n");
}

#[test]
fn section_edit_with_zero_end_replaces_whole_document() {
    let env = common::TestEnv::start();
    let (mut page, _) = env.seeded_page("lecture-1", "# Intro\r\nhello\r\n");

    env.vault
        .save_section(&mut page, "full rewrite\r\n", "Rewrite", "alice", 0, 0)
        .unwrap();

    assert_eq!(env.vault.load_content(&page).unwrap(), "full rewrite\r\n");
}

#[test]
fn last_section_extends_to_end_of_document() {
    let env = common::TestEnv::start();
    let (page, _) = env.seeded_page(
        "lecture-1",
        "# First\r\none\r\n# Last\r\ntwo\r\nthree\r\n",
    );

    let (section, range) = env.vault.load_section_content(&page, "Last").unwrap();
    assert_eq!(section, "two\nthree");
    assert_eq!(range, 3..5);
}

#[test]
fn missing_anchor_is_section_not_found() {
    let env = common::TestEnv::start();
    let (page, _) = env.seeded_page("lecture-1", "# Intro\r\nhello\r\n");

    assert!(matches!(
        env.vault.load_section_content(&page, "Conclusion"),
        Err(StoreError::SectionNotFound(_))
    ));
}

#[test]
fn headingless_document_is_section_not_found() {
    let env = common::TestEnv::start();
    let (page, _) = env.seeded_page("lecture-1", "plain text\r\nno headings\r\n");

    assert!(matches!(
        env.vault.load_section_content(&page, "Intro"),
        Err(StoreError::SectionNotFound(_))
    ));
}

#[test]
fn anchors_match_slugified_headings() {
    let env = common::TestEnv::start();
    let (page, _) = env.seeded_page(
        "exam-review",
        "## Past exams\r\n2009 final\r\n2010 final\r\n",
    );

    let (section, _) = env.vault.load_section_content(&page, "past-exams").unwrap();
    assert_eq!(section, "2009 final\n2010 final");
}
