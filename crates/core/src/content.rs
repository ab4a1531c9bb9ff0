//! Inline image markup in article bodies.
//!
//! Article bodies are stored as plain text with embedded `[IMG:<url>]` markers. This module
//! splits a body into [`ContentSegment`]s in reading order and renders them to HTML.
//!
//! Parsing is total: any string, including empty input and half-written markers, yields a
//! valid segment list. Image URLs are passed through untouched; whether they load is the
//! browser's problem.

use regex::Regex;
use serde::Serialize;
use std::fmt::Write as _;
use std::sync::OnceLock;

const MARKER_OPEN: &str = "[IMG:";
const MARKER_CLOSE: char = ']';

/// A unit of article content: literal text or an image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ContentSegment {
    Text { text: String },
    Image { url: String },
}

impl ContentSegment {
    pub fn text(text: impl Into<String>) -> Self {
        ContentSegment::Text { text: text.into() }
    }

    pub fn image(url: impl Into<String>) -> Self {
        ContentSegment::Image { url: url.into() }
    }

    /// The source text this segment was parsed from.
    pub fn to_markup(&self) -> String {
        match self {
            ContentSegment::Text { text } => text.clone(),
            ContentSegment::Image { url } => format!("{MARKER_OPEN}{url}{MARKER_CLOSE}"),
        }
    }
}

fn marker_regex() -> &'static Regex {
    static MARKER_REGEX: OnceLock<Regex> = OnceLock::new();
    // `[^\]]*` cannot cross a closing bracket, so matches never overlap or nest.
    MARKER_REGEX.get_or_init(|| Regex::new(r"\[IMG:([^\]]*)\]").expect("Invalid marker regex"))
}

/// Split an article body into text and image segments, preserving order.
///
/// Empty text between adjacent markers produces no segment, and an empty body produces no
/// segments at all.
pub fn parse_content(body: &str) -> Vec<ContentSegment> {
    let mut segments = Vec::new();
    let mut last_end = 0;

    for caps in marker_regex().captures_iter(body) {
        let (Some(whole), Some(url)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        if whole.start() > last_end {
            segments.push(ContentSegment::text(&body[last_end..whole.start()]));
        }
        segments.push(ContentSegment::image(url.as_str()));
        last_end = whole.end();
    }

    if last_end < body.len() {
        segments.push(ContentSegment::text(&body[last_end..]));
    }

    segments
}

/// Reassemble segments into the stored body form.
pub fn to_markup(segments: &[ContentSegment]) -> String {
    segments.iter().map(ContentSegment::to_markup).collect()
}

/// Render segments as HTML for the article page.
///
/// Text becomes an escaped `<span>`; the surrounding container is expected to use
/// `white-space: pre-wrap` so line breaks survive. Images become lazily loaded `<img>`
/// elements. Images with an empty URL are skipped.
pub fn render_html(segments: &[ContentSegment]) -> String {
    let mut out = String::new();

    for segment in segments {
        match segment {
            ContentSegment::Text { text } => {
                let _ = write!(
                    out,
                    "<span>{}</span>",
                    html_escape::encode_text(text.as_str())
                );
            }
            ContentSegment::Image { url } if url.is_empty() => {}
            ContentSegment::Image { url } => {
                let _ = write!(
                    out,
                    "<div class=\"article-image\"><img src=\"{}\" alt=\"Article image\" loading=\"lazy\"></div>",
                    html_escape::encode_double_quoted_attribute(url.as_str())
                );
            }
        }
    }

    out
}

/// Number of image markers in `body`.
pub fn image_count(body: &str) -> usize {
    parse_content(body)
        .iter()
        .filter(|s| matches!(s, ContentSegment::Image { .. }))
        .count()
}
