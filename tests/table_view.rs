use assetdesk::{ColumnSpec, ExportOutcome, Record, TableEngine, TableHooks, Value};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

fn rbi_records() -> Vec<Record> {
    let rows = [
        ("P101", "Piping", "Naphtha", 3, "High"),
        ("V201", "Vessel", "Crude", 5, "Medium"),
        ("P102", "Piping", "Water", 1, "Low"),
        ("E301", "Exchanger", "Steam", 2, "Low"),
        ("V202", "Vessel", "Amine", 4, "High"),
    ];
    rows.into_iter()
        .map(|(tag, kind, service, pof, risk)| {
            Record::new()
                .with("tag", tag)
                .with("equipment_type", kind)
                .with("service", service)
                .with("pof", pof)
                .with("risk", risk)
        })
        .collect()
}

fn rbi_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("tag", "Tag"),
        ColumnSpec::new("equipment_type", "Type"),
        ColumnSpec::new("service", "Service"),
        ColumnSpec::new("pof", "PoF"),
        ColumnSpec::new("risk", "Risk"),
    ]
}

#[test]
fn csv_round_trips_by_naive_split() {
    let mut table = TableEngine::new(rbi_records(), rbi_columns());
    table.toggle_column_visibility("service");
    let ExportOutcome::Csv(csv) = table.export_csv() else {
        panic!("no export hook installed");
    };

    let mut lines = csv.lines();
    let header: Vec<_> = lines.next().unwrap().split(',').collect();
    assert_eq!(header, ["Tag", "Type", "PoF", "Risk"]);

    let visible = table.visible_columns();
    for (line, record) in lines.zip(rbi_records()) {
        let cells: Vec<_> = line.split(',').map(|c| c.trim_matches('"')).collect();
        let expected: Vec<_> = visible.iter().map(|c| record.value(&c.accessor).to_string()).collect();
        assert_eq!(cells, expected);
    }
}

#[test]
fn export_hook_replaces_csv_generation() {
    let called = Arc::new(AtomicBool::new(false));
    let flag = called.clone();
    let table = TableEngine::new(rbi_records(), rbi_columns())
        .with_hooks(TableHooks::default().on_export(move || flag.store(true, Ordering::SeqCst)));
    assert_eq!(table.export_csv(), ExportOutcome::Delegated);
    assert!(called.load(Ordering::SeqCst));
}

#[test]
fn five_record_sort_cycle_on_numeric_field() {
    let mut table = TableEngine::new(rbi_records(), rbi_columns());
    let pof = |t: &TableEngine| -> Vec<f64> {
        t.view()
            .rows
            .iter()
            .filter_map(|r| r.record.value("pof").as_f64())
            .collect()
    };

    table.set_sort("pof");
    assert_eq!(pof(&table), [1.0, 2.0, 3.0, 4.0, 5.0]);
    table.set_sort("pof");
    assert_eq!(pof(&table), [5.0, 4.0, 3.0, 2.0, 1.0]);
    table.set_sort("pof");
    assert_eq!(pof(&table), [3.0, 5.0, 1.0, 2.0, 4.0]);
}

#[test]
fn sorting_twice_is_idempotent_and_stable() {
    let mut table = TableEngine::new(rbi_records(), rbi_columns());
    table.set_sort("risk");
    let first: Vec<_> = table.view().rows.iter().map(|r| r.id).collect();
    let again: Vec<_> = table.view().rows.iter().map(|r| r.id).collect();
    assert_eq!(first, again);

    let tags: Vec<_> = table
        .view()
        .rows
        .iter()
        .map(|r| r.record.value("tag").to_string())
        .collect();
    // equal risks keep insertion order
    assert_eq!(tags, ["P101", "V202", "P102", "E301", "V201"]);
}

#[test]
fn search_filter_pipeline_equals_composed_predicates() {
    let mut table = TableEngine::new(rbi_records(), rbi_columns());
    table.set_search_term("v");
    table.set_filter("risk", "h");

    let expected: Vec<_> = rbi_records()
        .into_iter()
        .filter(|r| r.values().any(|v| v.to_string().to_lowercase().contains('v')))
        .filter(|r| r.value("risk").to_string().to_lowercase().contains('h'))
        .collect();
    let got: Vec<_> = table.filtered_rows().into_iter().map(|r| r.record.clone()).collect();
    assert_eq!(got, expected);
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].value("tag"), &Value::from("V202"));
}

#[test]
fn twenty_three_filtered_rows_paginate_into_three_pages() {
    let records = (0..40).map(|i| {
        Record::new()
            .with("id", i)
            .with("kind", if i < 23 { "match" } else { "other" })
    });
    let mut table = TableEngine::new(records, vec![ColumnSpec::new("id", "Id"), ColumnSpec::new("kind", "Kind")])
        .with_page_size(10);
    table.set_filter("kind", "match");

    assert_eq!(table.filtered_len(), 23);
    assert_eq!(table.page_count(), 3);
    table.go_to_page(4);
    let view = table.view();
    assert_eq!(view.page, 3);
    assert_eq!(view.rows.len(), 3);

    table.toggle_column_visibility("kind");
    assert_eq!(table.filtered_len(), 23);
    assert_eq!(table.page(), 3);
}

#[test]
fn empty_inputs_render_an_empty_page() {
    let table = TableEngine::new(Vec::new(), Vec::new());
    let view = table.view();
    assert_eq!(view.total, 0);
    assert_eq!(view.page, 1);
    assert_eq!(view.page_count, 1);
    assert_eq!(table.export_csv(), ExportOutcome::Csv(String::new()));
}
