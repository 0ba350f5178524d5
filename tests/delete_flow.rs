use assetdesk::{ColumnSpec, Record, RowId, TableEngine, TableError, TableHooks};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

fn work_orders(hooks: TableHooks) -> TableEngine {
    let records = ["WO-1", "WO-2", "WO-3"]
        .into_iter()
        .map(|n| Record::new().with("number", n).with("status", "Open"));
    let columns = vec![
        ColumnSpec::new("number", "Number"),
        ColumnSpec::new("status", "Status"),
    ];
    TableEngine::new(records, columns).with_hooks(hooks)
}

fn numbers(t: &TableEngine) -> Vec<String> {
    t.view()
        .rows
        .iter()
        .map(|r| r.record.value("number").to_string())
        .collect()
}

#[tokio::test]
async fn confirmed_delete_removes_row() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let mut t = work_orders(TableHooks::default().on_delete(move |record: Record| {
        let seen = seen.clone();
        async move {
            assert_eq!(record.value("number").to_string(), "WO-2");
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }));

    assert!(t.request_delete(RowId(1)));
    let pending = t.confirm_delete().expect("staged row");
    assert!(t.is_delete_pending());
    let removed = t.settle_delete(pending.run().await).unwrap();

    assert_eq!(removed.value("number").to_string(), "WO-2");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!t.is_delete_pending());
    assert_eq!(numbers(&t), ["WO-1", "WO-3"]);
}

#[tokio::test]
async fn rejected_delete_keeps_row_and_clears_pending() {
    let mut t = work_orders(
        TableHooks::default().on_delete(|_| async { Err(anyhow::anyhow!("permission denied")) }),
    );

    t.request_delete(RowId(0));
    let pending = t.confirm_delete().unwrap();
    let err = t.settle_delete(pending.run().await).unwrap_err();

    assert!(matches!(err, TableError::DeleteFailed { row: RowId(0), .. }));
    assert!(err.to_string().contains("permission denied"));
    assert!(!t.is_delete_pending());
    assert_eq!(t.staged_delete(), None);
    assert_eq!(numbers(&t), ["WO-1", "WO-2", "WO-3"]);
}

#[tokio::test]
async fn browsing_continues_while_delete_is_pending() {
    let mut t = work_orders(TableHooks::default().on_delete(|_| async { Ok(()) }));
    t.request_delete(RowId(2));
    let pending = t.confirm_delete().unwrap();

    // second submission and re-staging are refused
    assert!(t.confirm_delete().is_none());
    assert!(!t.request_delete(RowId(0)));
    assert!(!t.cancel_delete());

    t.set_search_term("wo-1");
    assert_eq!(numbers(&t), ["WO-1"]);
    t.set_search_term("");

    let handle = tokio::spawn(pending.run());
    let settled = handle.await.unwrap();
    t.settle_delete(settled).unwrap();
    assert_eq!(numbers(&t), ["WO-1", "WO-2"]);
}

#[test]
fn confirm_without_stage_does_nothing() {
    let mut t = work_orders(TableHooks::default().on_delete(|_| async { Ok(()) }));
    assert!(t.confirm_delete().is_none());
    assert_eq!(t.len(), 3);
}

#[test]
fn only_latest_staged_row_is_confirmed() {
    let mut t = work_orders(TableHooks::default().on_delete(|_| async { Ok(()) }));
    t.request_delete(RowId(0));
    t.request_delete(RowId(2));
    let pending = t.confirm_delete().unwrap();
    assert_eq!(pending.row, RowId(2));
}

#[test]
fn delete_requires_a_handler() {
    let mut t = work_orders(TableHooks::default());
    assert!(!t.request_delete(RowId(0)));
    assert!(t.confirm_delete().is_none());
}

#[test]
fn cancel_returns_to_idle() {
    let mut t = work_orders(TableHooks::default().on_delete(|_| async { Ok(()) }));
    t.request_delete(RowId(1));
    assert!(t.cancel_delete());
    assert!(t.confirm_delete().is_none());
}
