//! Content-source extraction
//!
//! Walks the parts of a message depth-first, left to right, and returns the
//! first resource locator worth handing to the processing backend:
//!
//! - a file part yields its `url`, whatever MIME type it declares;
//! - a text part yields the first URL ending in a media extension, or failing
//!   that the first `http(s)` URL it mentions;
//! - a data part is descended into.
//!
//! File parts are accepted regardless of `mimeType`. Callers routinely send
//! audio as `application/octet-stream` or with no type at all, so a MIME check
//! rejected valid input more often than it caught bad input.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::protocol::message::Part;

/// Extensions recognised as audio content in free text
pub const MEDIA_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "m4a", "flac"];

/// Data parts nested deeper than this are not descended into
pub const MAX_PART_DEPTH: usize = 32;

static ANY_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bhttps?://[^\s<>"'`]+"#).expect("URL pattern is valid")
});

/// Find the first processable resource locator in `parts`
///
/// Traversal short-circuits on the first hit.
pub fn extract_source(parts: &[Part]) -> Option<String> {
    let mut stack = vec![parts.iter()];

    while let Some(level) = stack.last_mut() {
        let Some(part) = level.next() else {
            stack.pop();
            continue;
        };

        match part {
            Part::File { url, .. } => {
                let url = url.trim();
                if !url.is_empty() {
                    return Some(url.to_string());
                }
            }
            Part::Text { text, .. } => {
                if let Some(url) = find_url(text) {
                    return Some(url);
                }
            }
            Part::Data { data, .. } => {
                if stack.len() < MAX_PART_DEPTH {
                    stack.push(data.iter());
                } else {
                    warn!(depth = stack.len(), "skipping data part nested too deeply");
                }
            }
        }
    }

    None
}

/// First URL in `text` whose path ends in a media extension, else the first
/// `http(s)` URL
///
/// Candidates are always whole URL tokens; a media extension in the middle of
/// a path does not make the URL a media URL.
pub fn find_url(text: &str) -> Option<String> {
    let mut fallback = None;

    for candidate in ANY_URL.find_iter(text) {
        let url = trim_trailing_punctuation(candidate.as_str());
        if url::Url::parse(&url).is_err() {
            continue;
        }
        if has_media_extension(&url) {
            return Some(url);
        }
        if fallback.is_none() {
            fallback = Some(url);
        }
    }

    fallback
}

/// Check if a locator names a file with a known media extension
pub fn has_media_extension(locator: &str) -> bool {
    media_extension(locator).is_some()
}

/// The lowercase media extension of a locator's path, if it has a known one
pub fn media_extension(locator: &str) -> Option<&'static str> {
    let path = locator.split(['?', '#']).next().unwrap_or(locator);
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    MEDIA_EXTENSIONS.iter().copied().find(|known| *known == ext)
}

fn trim_trailing_punctuation(url: &str) -> String {
    url.trim_end_matches(['.', ',', ';', ':', '!', '?', ')', ']', '}'])
        .to_string()
}
