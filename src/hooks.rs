//! Callbacks supplied by whoever embeds a [`TableEngine`](crate::table::TableEngine).

use crate::record::Record;
use futures::future::BoxFuture;
use std::{fmt, sync::Arc};

pub type RecordHook = Arc<dyn Fn(&Record) + Send + Sync>;
pub type ActionHook = Arc<dyn Fn() + Send + Sync>;
/// Receives an owned copy of the record; the returned future settles the
/// delete.
pub type DeleteHook = Arc<dyn Fn(Record) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

#[derive(Clone, Default)]
pub struct TableHooks {
    pub on_edit: Option<RecordHook>,
    pub on_delete: Option<DeleteHook>,
    pub on_export: Option<ActionHook>,
    pub on_view_details: Option<RecordHook>,
    pub on_add_new: Option<ActionHook>,
    pub on_row_click: Option<RecordHook>,
}

impl TableHooks {
    pub fn on_edit(mut self, f: impl Fn(&Record) + Send + Sync + 'static) -> Self {
        self.on_edit = Some(Arc::new(f));
        self
    }

    pub fn on_delete<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Record) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.on_delete = Some(Arc::new(
            move |record: Record| -> BoxFuture<'static, anyhow::Result<()>> { Box::pin(f(record)) },
        ));
        self
    }

    pub fn on_export(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_export = Some(Arc::new(f));
        self
    }

    pub fn on_view_details(mut self, f: impl Fn(&Record) + Send + Sync + 'static) -> Self {
        self.on_view_details = Some(Arc::new(f));
        self
    }

    pub fn on_add_new(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_add_new = Some(Arc::new(f));
        self
    }

    pub fn on_row_click(mut self, f: impl Fn(&Record) + Send + Sync + 'static) -> Self {
        self.on_row_click = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for TableHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableHooks")
            .field("on_edit", &self.on_edit.is_some())
            .field("on_delete", &self.on_delete.is_some())
            .field("on_export", &self.on_export.is_some())
            .field("on_view_details", &self.on_view_details.is_some())
            .field("on_add_new", &self.on_add_new.is_some())
            .field("on_row_click", &self.on_row_click.is_some())
            .finish()
    }
}
