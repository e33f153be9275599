//! Derives the displayed agent list from the canonical collection.
//!
//! Projection is a pure function of its inputs: search, status filter,
//! category filter, then a stable sort.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::domain::models::{
    AgentCategory, AgentRecord, CategoryFilter, SortKey, StatusFilter, ViewCriteria,
};

/// Filter and sort `records` according to `criteria`.
///
/// The input is never modified; ties keep their input order.
pub fn project(records: &[AgentRecord], criteria: &ViewCriteria) -> Vec<AgentRecord> {
    let search = SearchNeedle::new(&criteria.search_text);

    let mut projected: Vec<AgentRecord> = records
        .iter()
        .filter(|r| search.as_ref().is_none_or(|needle| needle.matches(r)))
        .filter(|r| matches_status(r, criteria.status_filter))
        .filter(|r| matches_category(r, criteria.category_filter))
        .cloned()
        .collect();

    sort_records(&mut projected, criteria.sort_key);
    projected
}

/// Lowercased search text; `None` when the text is blank.
struct SearchNeedle(String);

impl SearchNeedle {
    fn new(text: &str) -> Option<Self> {
        if text.trim().is_empty() {
            None
        } else {
            Some(Self(text.to_lowercase()))
        }
    }

    fn matches(&self, record: &AgentRecord) -> bool {
        let needle = self.0.as_str();
        record.name.to_lowercase().contains(needle)
            || record.description.to_lowercase().contains(needle)
            || record.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

fn matches_status(record: &AgentRecord, filter: StatusFilter) -> bool {
    match filter {
        StatusFilter::All => true,
        StatusFilter::Only(status) => record.effective_status() == status,
    }
}

fn matches_category(record: &AgentRecord, filter: CategoryFilter) -> bool {
    match filter {
        CategoryFilter::All => true,
        CategoryFilter::Only(category) => record.category == Some(category),
    }
}

fn sort_records(records: &mut [AgentRecord], key: SortKey) {
    match key {
        SortKey::MostRecentFirst => records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        SortKey::NameAscending => records.sort_by(|a, b| locale_compare(&a.name, &b.name)),
        SortKey::CategoryAscending => records.sort_by(|a, b| {
            locale_compare(category_key(a), category_key(b))
        }),
    }
}

fn category_key(record: &AgentRecord) -> &'static str {
    record.category.map_or("", AgentCategory::as_str)
}

/// Human-oriented string ordering.
///
/// Compares in three passes: base letters with accents and case folded away,
/// then accents (unaccented first), then case (lowercase first). `Émile`
/// therefore sorts between `eve` and `Zed` rather than after `z`.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| accented_letters(a).cmp(accented_letters(b)))
        // Reversed byte order puts lowercase ahead of uppercase.
        .then_with(|| b.cmp(a))
}

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn accented_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}
