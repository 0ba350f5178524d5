//! Search term and per-column filters.

use crate::record::Record;
use std::collections::BTreeMap;

/// Global search plus per-field substring filters.
///
/// Search is case-insensitive. Column filters use smart case: a query with
/// no uppercase letters matches case-insensitively, otherwise the match is
/// exact-case. This is the one place that departs from plain
/// case-insensitive filtering, so that `Active` keeps `Inactive` rows out
/// while `active` still matches both. Empty queries are never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    search: String,
    filters: BTreeMap<String, String>,
}

impl FilterState {
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Returns true when the stored term changed.
    pub fn set_search(&mut self, term: &str) -> bool {
        let term = term.to_lowercase();
        if term == self.search {
            return false;
        }
        self.search = term;
        true
    }

    pub fn filter(&self, field: &str) -> Option<&str> {
        self.filters.get(field).map(String::as_str)
    }

    pub fn active_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Sets or (for an empty query) removes a filter. Returns true when the
    /// filter state changed.
    pub fn set_filter(&mut self, field: &str, query: &str) -> bool {
        if query.is_empty() {
            return self.filters.remove(field).is_some();
        }
        if self.filters.get(field).map(String::as_str) == Some(query) {
            return false;
        }
        self.filters.insert(field.to_string(), query.to_string());
        true
    }

    pub fn clear_filters(&mut self) -> bool {
        let had_any = !self.filters.is_empty();
        self.filters.clear();
        had_any
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.filters.is_empty()
    }

    /// Any field contains the search term.
    pub fn matches_search(&self, record: &Record) -> bool {
        self.search.is_empty() || record.values().any(|v| v.contains_ci(&self.search))
    }

    /// Every active filter's field contains its query.
    pub fn matches_filters(&self, record: &Record) -> bool {
        self.filters
            .iter()
            .all(|(field, query)| filter_matches(&record.value(field).as_search_text(), query))
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.matches_search(record) && self.matches_filters(record)
    }
}

fn filter_matches(text: &str, query: &str) -> bool {
    if query.chars().any(char::is_uppercase) {
        text.contains(query)
    } else {
        text.to_lowercase().contains(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn pumps() -> Vec<Record> {
        vec![
            Record::new().with("name", "Pump A").with("status", "Active"),
            Record::new().with("name", "Pump B").with("status", "Inactive"),
            Record::new().with("name", "Valve C").with("status", "Active"),
        ]
    }

    #[test]
    fn search_is_or_across_fields() {
        let mut f = FilterState::default();
        f.set_search("ACTIVE");
        let hits = pumps().iter().filter(|r| f.matches(r)).count();
        // "Inactive" contains "active" too
        assert_eq!(hits, 3);
        f.set_search("valve");
        assert_eq!(pumps().iter().filter(|r| f.matches(r)).count(), 1);
    }

    #[test]
    fn filters_and_together_and_empty_removes() {
        let mut f = FilterState::default();
        assert!(f.set_filter("status", "inact"));
        assert!(f.set_filter("name", "pump"));
        let names: Vec<_> = pumps()
            .into_iter()
            .filter(|r| f.matches(r))
            .map(|r| r.value("name").to_string())
            .collect();
        assert_eq!(names, vec!["Pump B"]);

        assert!(!f.set_filter("status", "inact"));
        assert!(f.set_filter("status", ""));
        assert_eq!(f.filter("status"), None);
        assert!(!f.set_filter("status", ""));
    }

    #[test]
    fn filters_use_smart_case() {
        let mut f = FilterState::default();
        f.set_filter("status", "Active");
        let hits: Vec<_> = pumps().into_iter().filter(|r| f.matches(r)).collect();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|r| r.value("status") == &Value::from("Active")));

        f.set_filter("status", "active");
        assert_eq!(pumps().iter().filter(|r| f.matches(r)).count(), 3);
    }

    #[test]
    fn evaluation_order_does_not_change_result() {
        let mut f = FilterState::default();
        f.set_search("pump");
        f.set_filter("status", "active");
        let records = pumps();
        let a: Vec<_> = records
            .iter()
            .filter(|r| f.matches_search(r))
            .filter(|r| f.matches_filters(r))
            .collect();
        let b: Vec<_> = records
            .iter()
            .filter(|r| f.matches_filters(r))
            .filter(|r| f.matches_search(r))
            .collect();
        assert_eq!(a, b);
    }
}
