use crate::{record::Record, value::Value};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascend,
    Descend,
}

impl SortOrder {
    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Ascend => "Ascend",
            SortOrder::Descend => "Descend",
        }
    }
}

/// At most one active (field, order) pair. `None` keeps insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    active: Option<(String, SortOrder)>,
}

impl SortState {
    pub fn active(&self) -> Option<(&str, SortOrder)> {
        self.active.as_ref().map(|(f, o)| (f.as_str(), *o))
    }

    pub fn order_for(&self, field: &str) -> Option<SortOrder> {
        self.active
            .as_ref()
            .filter(|(f, _)| f == field)
            .map(|(_, o)| *o)
    }

    /// One header click: unsorted -> ascend -> descend -> unsorted. Clicking
    /// a different field starts over at ascend.
    pub fn cycle(&mut self, field: &str) {
        self.active = match self.order_for(field) {
            None => Some((field.to_string(), SortOrder::Ascend)),
            Some(SortOrder::Ascend) => Some((field.to_string(), SortOrder::Descend)),
            Some(SortOrder::Descend) => None,
        };
    }

    pub fn set(&mut self, field: &str, order: SortOrder) {
        self.active = Some((field.to_string(), order));
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Stable in-place sort of `rows`; a no-op without an active field.
    pub fn apply<T>(&self, rows: &mut [T], record_of: impl Fn(&T) -> &Record) {
        let Some((field, order)) = self.active() else {
            return;
        };
        rows.sort_by(|a, b| compare(record_of(a).value(field), record_of(b).value(field), order));
    }
}

pub fn compare(a: &Value, b: &Value, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Ascend => a.total_cmp(b),
        SortOrder::Descend => b.total_cmp(a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<Record> {
        [("a", 3.0), ("b", 1.0), ("c", 2.0), ("d", 1.0), ("e", 5.0)]
            .into_iter()
            .map(|(id, size)| Record::new().with("id", id).with("size", size))
            .collect()
    }

    fn ids(rows: &[Record]) -> Vec<String> {
        rows.iter().map(|r| r.value("id").to_string()).collect()
    }

    #[test]
    fn three_clicks_clear_the_sort() {
        let mut s = SortState::default();
        s.cycle("size");
        assert_eq!(s.active(), Some(("size", SortOrder::Ascend)));
        s.cycle("size");
        assert_eq!(s.active(), Some(("size", SortOrder::Descend)));
        s.cycle("size");
        assert_eq!(s.active(), None);
    }

    #[test]
    fn other_field_restarts_at_ascend() {
        let mut s = SortState::default();
        s.cycle("size");
        s.cycle("size");
        s.cycle("id");
        assert_eq!(s.active(), Some(("id", SortOrder::Ascend)));
    }

    #[test]
    fn sort_is_stable_both_ways() {
        let mut s = SortState::default();
        s.set("size", SortOrder::Ascend);
        let mut r = rows();
        s.apply(&mut r, |r| r);
        assert_eq!(ids(&r), ["b", "d", "c", "a", "e"]);

        s.set("size", SortOrder::Descend);
        let mut r = rows();
        s.apply(&mut r, |r| r);
        assert_eq!(ids(&r), ["e", "a", "c", "b", "d"]);
    }

    #[test]
    fn nulls_lead_ascending_and_trail_descending() {
        let mut r = rows();
        r[2].set("size", Value::Null);
        let mut s = SortState::default();
        s.set("size", SortOrder::Ascend);
        s.apply(&mut r, |r| r);
        assert_eq!(ids(&r)[0], "c");
        s.set("size", SortOrder::Descend);
        s.apply(&mut r, |r| r);
        assert_eq!(ids(&r)[4], "c");
    }
}
