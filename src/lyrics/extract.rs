//! Song page parsing
//!
//! Lyrics pages are not consistent across site versions, so the body is located with
//! three increasingly permissive strategies:
//!
//! 1. `data-lyrics-container` divs (current markup)
//! 2. a div with a legacy `lyrics` class
//! 3. the first long div that mentions a song structure marker
//!
//! The last tier will happily return long non-lyrics blocks. It only runs when the
//! page carries no recognizable container at all.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

pub const UNKNOWN_TITLE: &str = "unknown song";

const HEURISTIC_MIN_CHARS: usize = 200;
const SONG_MARKERS: &[&str] = &["verse", "chorus", "bridge", "куплет", "припев"];

static H1: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1").expect("BUG: hardcoded CSS selector 'h1' is invalid"));
static TITLE: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("title").expect("BUG: hardcoded CSS selector 'title' is invalid")
});
static DIV: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div").expect("BUG: hardcoded CSS selector 'div' is invalid"));
static LYRICS_CONTAINER: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"div[data-lyrics-container="true"]"#)
        .expect("BUG: hardcoded lyrics container selector is invalid")
});

static LEGACY_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"lyrics|Lyrics__Container").expect("Invalid legacy class regex"));
static BLANK_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n\s*\n+").expect("Invalid blank line regex"));

/// Title and cleaned lyrics body pulled from a song page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLyrics {
    pub title: String,
    pub lyrics: String,
}

/// Parse a raw song page and extract its lyrics.
///
/// The parsed document never leaves this function, so callers can stay `Send`
/// across awaits.
pub fn parse_song_page(html: &str) -> Option<ExtractedLyrics> {
    let doc = Html::parse_document(html);
    extract_lyrics(&doc)
}

pub fn extract_lyrics(doc: &Html) -> Option<ExtractedLyrics> {
    let raw = modern_containers(doc)
        .or_else(|| legacy_container(doc))
        .or_else(|| heuristic_scan(doc))?;

    let lyrics = clean_lyrics(&raw);
    if lyrics.is_empty() {
        return None;
    }

    Some(ExtractedLyrics {
        title: extract_title(doc),
        lyrics,
    })
}

pub fn extract_title(doc: &Html) -> String {
    [&*H1, &*TITLE]
        .into_iter()
        .filter_map(|sel| doc.select(sel).next())
        .map(|el| el.text().collect::<String>().trim().to_string())
        .find(|t| !t.is_empty())
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
}

/// Collapse runs of blank lines to a single blank line and trim the body.
pub fn clean_lyrics(raw: &str) -> String {
    BLANK_RUN.replace_all(raw, "\n\n").trim().to_string()
}

fn modern_containers(doc: &Html) -> Option<String> {
    let texts: Vec<String> = doc
        .select(&LYRICS_CONTAINER)
        .map(|container| {
            let mut text = String::new();
            push_container_text(container, &mut text);
            text
        })
        .collect();

    non_blank(texts.join("\n"))
}

/// Text of an element with `<br>` as a newline and a blank line after each `</p>`.
fn push_container_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(e) if e.name() == "br" => out.push('\n'),
            Node::Element(e) => {
                let is_paragraph = e.name() == "p";
                if let Some(child) = ElementRef::wrap(child) {
                    push_container_text(child, out);
                }
                if is_paragraph {
                    out.push_str("\n\n");
                }
            }
            _ => {}
        }
    }
}

fn legacy_container(doc: &Html) -> Option<String> {
    let div = doc.select(&DIV).find(|el| {
        el.value()
            .classes()
            .any(|class| LEGACY_CLASS.is_match(class))
    })?;
    non_blank(joined_text(div))
}

fn heuristic_scan(doc: &Html) -> Option<String> {
    doc.select(&DIV)
        .map(joined_text)
        .find(|text| text.chars().count() > HEURISTIC_MIN_CHARS && has_song_marker(text))
}

fn has_song_marker(text: &str) -> bool {
    let lower = text.to_lowercase();
    SONG_MARKERS.iter().any(|m| lower.contains(m))
}

/// Text nodes joined with newlines, whitespace left as-is.
fn joined_text(el: ElementRef<'_>) -> String {
    el.text().collect::<Vec<_>>().join("\n")
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
