use pulldown_cmark::{html, Options, Parser};
use sha2::{Digest, Sha256};

/// Render a raw Markdown body to sanitized HTML.
///
/// Deterministic: the same raw input always yields the same output, which
/// is what makes the rendered form safe to cache on the page record.
/// Rendering an already-rendered string is NOT a fixpoint and is never
/// done by the engine.
///
/// Supports GitHub Flavored Markdown (GFM) features: tables, footnotes,
/// strikethrough, task lists, and smart punctuation. Output is run
/// through ammonia so user-authored HTML cannot carry scripts into the
/// cached form.
pub fn render_markdown(raw: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_SMART_PUNCTUATION;

    let parser = Parser::new_ext(raw, options);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    // Task-list checkboxes survive sanitization; everything else ammonia
    // considers unsafe (scripts, event handlers, inline styles) does not.
    ammonia::Builder::default()
        .add_tags(["input"])
        .add_tag_attributes("input", ["type", "checked", "disabled"])
        .clean(&html_output)
        .to_string()
}

/// SHA-256 digest of a raw body, hex-encoded.
///
/// Stored next to the rendered cache: the cache is valid iff this digest
/// matches the digest of the current raw body. Both are recomputed on
/// every save, so a successful save always leaves the cache fresh.
pub fn content_digest(raw: &str) -> String {
    let digest = Sha256::digest(raw.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
