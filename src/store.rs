use crate::data::{Dataset, encode_records};
use anyhow::{Context, Result, anyhow};
use assetdesk::Record;
use log::info;
use parking_lot::Mutex;
use std::{path::PathBuf, sync::Arc};

/// The records file on disk. A delete rewrites the file without that record;
/// every other record is written back with its original text. The in-memory
/// copy only changes once the write succeeded.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    dataset: Arc<Mutex<Dataset>>,
}

impl RecordStore {
    pub fn new(path: PathBuf, dataset: Dataset) -> Self {
        Self {
            path,
            dataset: Arc::new(Mutex::new(dataset)),
        }
    }

    pub fn len(&self) -> usize {
        self.dataset.lock().records.len()
    }

    pub async fn delete(&self, record: Record) -> Result<()> {
        let (index, bytes) = {
            let dataset = self.dataset.lock();
            let index = dataset
                .records
                .iter()
                .position(|r| *r == record)
                .ok_or_else(|| anyhow!("record no longer exists in {}", self.path.display()))?;
            let mut remaining = dataset.clone();
            remaining.remove(index);
            (index, encode_records(&self.path, &remaining)?)
        };

        tokio::fs::write(&self.path, bytes)
            .await
            .with_context(|| format!("writing {}", self.path.display()))?;

        let mut dataset = self.dataset.lock();
        if dataset.records.get(index) == Some(&record) {
            dataset.remove(index);
        }
        info!("deleted record {index} from {}", self.path.display());
        Ok(())
    }
}
