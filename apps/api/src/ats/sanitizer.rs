//! ATS sanitizer: rewrites a CV fragment so the blocking checks no longer fire.
//!
//! Text content survives; only markup and layout styling change. Sanitizing an
//! already clean fragment returns it unchanged.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::validator::BULLET_GLYPHS;

/// Replacement for every decorative glyph.
pub const PLAIN_BULLET: char = '•';

/// Upper bound on full rewrite passes; image removal always runs last.
const MAX_PASSES: usize = 8;

static IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<img[^>]*>").expect("Should compile: IMAGE_RE"));
/// An opening tag, with quoted attribute values allowed to contain `>`.
static OPEN_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<[A-Za-z][^\s/>]*(?:[^>"']|"[^"]*"|'[^']*')*>"#)
        .expect("Should compile: OPEN_TAG_RE")
});
static STYLE_ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(\s)style\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("Should compile: STYLE_ATTR_RE")
});
static TABLE_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<(/?)(?:table|thead|tbody|tfoot|tr)\b[^>]*>")
        .expect("Should compile: TABLE_BLOCK_RE")
});
static TABLE_CELL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<(/?)(?:td|th)\b[^>]*>").expect("Should compile: TABLE_CELL_RE")
});

/// Strips images and layout CSS, normalizes bullets and flattens tables.
///
/// Removing markup can splice the surrounding text into a new tag, so the
/// passes repeat until the output is stable.
pub fn sanitize(fragment: &str) -> String {
    let mut current = fragment.to_string();
    for _ in 0..MAX_PASSES {
        let next = remove_images(&flatten_tables(&plain_bullets(&clean_styles(&current))));
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// Rewrites `style` attributes, looking only inside opening tags.
fn clean_styles(html: &str) -> Cow<'_, str> {
    OPEN_TAG_RE.replace_all(html, |tag: &Captures| {
        STYLE_ATTR_RE
            .replace_all(&tag[0], clean_style_attr)
            .into_owned()
    })
}

fn plain_bullets(html: &str) -> String {
    html.chars()
        .map(|c| if BULLET_GLYPHS.contains(&c) { PLAIN_BULLET } else { c })
        .collect()
}

fn flatten_tables(html: &str) -> String {
    let blocks = TABLE_BLOCK_RE.replace_all(html, "<${1}div>");
    TABLE_CELL_RE.replace_all(&blocks, "<${1}span>").into_owned()
}

/// Removes image tags until none match.
fn remove_images(html: &str) -> String {
    let mut current = html.to_string();
    while IMAGE_RE.is_match(&current) {
        current = IMAGE_RE.replace_all(&current, "").into_owned();
    }
    current
}

fn clean_style_attr(caps: &Captures) -> String {
    let lead = &caps[1];
    let (quote, body) = match (caps.get(2), caps.get(3)) {
        (Some(body), _) => ('"', body.as_str()),
        (None, Some(body)) => ('\'', body.as_str()),
        (None, None) => return caps[0].to_string(),
    };

    match strip_layout_declarations(body) {
        Cow::Borrowed(_) => caps[0].to_string(),
        Cow::Owned(kept) if kept.is_empty() => String::new(),
        Cow::Owned(kept) => format!("{lead}style={quote}{kept}{quote}"),
    }
}

/// Removes layout declarations from an inline style body, keeping the rest in
/// order. Borrows the input unchanged when nothing was removed.
pub fn strip_layout_declarations(style: &str) -> Cow<'_, str> {
    let declarations = split_declarations(style);
    if !declarations
        .iter()
        .any(|decl| is_layout_declaration(decl.trim()))
    {
        return Cow::Borrowed(style);
    }

    let kept: Vec<&str> = declarations
        .iter()
        .map(|decl| decl.trim())
        .filter(|decl| !decl.is_empty() && !is_layout_declaration(decl))
        .collect();

    if kept.is_empty() {
        Cow::Owned(String::new())
    } else {
        Cow::Owned(format!("{};", kept.join("; ")))
    }
}

/// Splits on `;` outside quotes and parentheses, so `url(data:...;base64,...)` stays whole.
fn split_declarations(style: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for (i, c) in style.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                parts.push(&style[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&style[start..]);
    parts
}

fn is_layout_declaration(decl: &str) -> bool {
    if decl.is_empty() {
        return false;
    }
    let (property, value) = match decl.split_once(':') {
        Some((property, value)) => (property.trim(), value.trim()),
        None => (decl, ""),
    };
    let property = property.to_ascii_lowercase();
    let value = value.to_ascii_lowercase();

    property == "position"
        || property == "float"
        || property.starts_with("transform")
        || value.split_whitespace().any(|v| v == "absolute" || v == "relative")
}
