//! Bookmark filter and sort pipeline.
//!
//! Pure functions from (bookmarks, query) to the ordered list the UI shows.
//! Inputs are never mutated and both sorts are stable, so repeated calls with
//! the same inputs give the same order.

use std::cmp::{Ordering, Reverse};

use chrono::{DateTime, NaiveDate, Utc};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::types::bookmark::Bookmark;
use crate::types::query::{BookmarkQuery, FolderFilter, SortKey};

/// Case-insensitive substring match against title, description and url.
/// An empty search matches everything.
pub fn matches_search(bookmark: &Bookmark, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    [bookmark.title.as_str(), bookmark.description_text(), bookmark.url.as_str()]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Exact, case-sensitive folder match.
pub fn matches_folder(bookmark: &Bookmark, folder: &FolderFilter) -> bool {
    match folder {
        FolderFilter::All => true,
        FolderFilter::Named(name) => bookmark.folder_name() == name,
    }
}

/// Exact tag-name match; no selected tag matches everything.
pub fn matches_tag(bookmark: &Bookmark, tag: Option<&str>) -> bool {
    tag.map_or(true, |name| bookmark.has_tag(name))
}

/// All three predicates together.
pub fn matches_query(bookmark: &Bookmark, query: &BookmarkQuery) -> bool {
    matches_search(bookmark, &query.search)
        && matches_folder(bookmark, &query.folder)
        && matches_tag(bookmark, query.tag.as_deref())
}

/// The bookmarks passing `query`, in input order.
pub fn filter_bookmarks<'a>(bookmarks: &'a [Bookmark], query: &BookmarkQuery) -> Vec<&'a Bookmark> {
    bookmarks.iter().filter(|b| matches_query(b, query)).collect()
}

/// Stable in-place sort.
pub fn sort_bookmarks(bookmarks: &mut [&Bookmark], sort: SortKey) {
    match sort {
        // Unparseable timestamps go last, in input order.
        SortKey::CreatedDesc => bookmarks.sort_by_cached_key(|b| {
            let instant = parse_instant(&b.created_at);
            (instant.is_none(), Reverse(instant))
        }),
        SortKey::TitleAsc => bookmarks.sort_by(|a, b| collate(&a.title, &b.title)),
    }
}

/// Filters then sorts, returning owned copies.
pub fn apply_query(bookmarks: &[Bookmark], query: &BookmarkQuery) -> Vec<Bookmark> {
    let mut visible = filter_bookmarks(bookmarks, query);
    sort_bookmarks(&mut visible, query.sort);
    visible.into_iter().cloned().collect()
}

/// Clicking the selected tag again clears the selection.
pub fn toggle_tag(selected: Option<&str>, clicked: &str) -> Option<String> {
    if selected == Some(clicked) {
        None
    } else {
        Some(clicked.to_string())
    }
}

/// Parses an RFC 3339 timestamp, or a bare `YYYY-MM-DD` date as midnight UTC.
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Title collation in three levels: base letters with accents stripped and
/// case folded, then accents (unaccented first), then case (lowercase first).
pub fn collate(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| accented(a).cmp(accented(b)))
        .then_with(|| case_order(a, b))
}

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().filter(|c| !is_combining_mark(*c)).flat_map(char::to_lowercase)
}

fn accented(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

fn case_order(a: &str, b: &str) -> Ordering {
    for (x, y) in a.nfd().zip(b.nfd()) {
        if x == y {
            continue;
        }
        return match (x.is_lowercase(), y.is_lowercase()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => x.cmp(&y),
        };
    }
    a.nfd().count().cmp(&b.nfd().count())
}
