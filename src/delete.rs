//! Two-phase delete: stage a row, then confirm it.
//!
//! `Idle -> Staged -> Confirming -> Idle`. While confirming nothing else is
//! accepted, so a row can never be submitted twice.

use crate::{record::Record, table::RowId};
use futures::{FutureExt, future::BoxFuture};
use std::{fmt, panic::AssertUnwindSafe};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteFlow {
    #[default]
    Idle,
    Staged(RowId),
    Confirming(RowId),
}

impl DeleteFlow {
    /// Replaces any earlier staged row. Refused while confirming.
    pub fn stage(&mut self, row: RowId) -> bool {
        if self.is_pending() {
            return false;
        }
        *self = DeleteFlow::Staged(row);
        true
    }

    pub fn cancel(&mut self) -> bool {
        match self {
            DeleteFlow::Staged(_) => {
                *self = DeleteFlow::Idle;
                true
            }
            _ => false,
        }
    }

    /// Staged -> Confirming. Returns the row to delete.
    pub fn begin(&mut self) -> Option<RowId> {
        match *self {
            DeleteFlow::Staged(row) => {
                *self = DeleteFlow::Confirming(row);
                Some(row)
            }
            _ => None,
        }
    }

    /// Confirming(row) -> Idle. False when `row` is not the one in flight.
    pub fn settle(&mut self, row: RowId) -> bool {
        match *self {
            DeleteFlow::Confirming(pending) if pending == row => {
                *self = DeleteFlow::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn staged(&self) -> Option<RowId> {
        match *self {
            DeleteFlow::Staged(row) => Some(row),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, DeleteFlow::Confirming(_))
    }
}

/// A confirmed delete whose handler has not run yet. Drive it with
/// [`PendingDelete::run`] and hand the result back to the engine.
pub struct PendingDelete {
    pub row: RowId,
    pub record: Record,
    task: BoxFuture<'static, anyhow::Result<()>>,
}

impl PendingDelete {
    pub(crate) fn new(row: RowId, record: Record, task: BoxFuture<'static, anyhow::Result<()>>) -> Self {
        Self { row, record, task }
    }

    /// A panicking handler settles as a failure.
    pub async fn run(self) -> DeleteSettled {
        let result = match AssertUnwindSafe(self.task).catch_unwind().await {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!("delete handler panicked")),
        };
        DeleteSettled {
            row: self.row,
            result,
        }
    }
}

impl fmt::Debug for PendingDelete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingDelete")
            .field("row", &self.row)
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct DeleteSettled {
    pub row: RowId,
    pub result: anyhow::Result<()>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_without_stage_is_noop() {
        let mut flow = DeleteFlow::default();
        assert_eq!(flow.begin(), None);
        assert_eq!(flow, DeleteFlow::Idle);
    }

    #[test]
    fn latest_stage_wins() {
        let mut flow = DeleteFlow::default();
        flow.stage(RowId(1));
        flow.stage(RowId(2));
        assert_eq!(flow.begin(), Some(RowId(2)));
    }

    #[test]
    fn confirming_blocks_everything_until_settled() {
        let mut flow = DeleteFlow::default();
        flow.stage(RowId(4));
        flow.begin();
        assert!(!flow.stage(RowId(5)));
        assert!(!flow.cancel());
        assert_eq!(flow.begin(), None);
        assert!(!flow.settle(RowId(5)));
        assert!(flow.settle(RowId(4)));
        assert_eq!(flow, DeleteFlow::Idle);
    }

    #[test]
    fn panicking_handler_settles_as_error() {
        let task: BoxFuture<'static, anyhow::Result<()>> = Box::pin(async {
            if true {
                panic!("boom");
            }
            Ok::<(), anyhow::Error>(())
        });
        let pending = PendingDelete::new(RowId(0), Record::new(), task);
        let settled = futures::executor::block_on(pending.run());
        assert!(settled.result.is_err());
    }
}
