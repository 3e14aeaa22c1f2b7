//! YAML file store.

use std::fs;
use std::path::{Path, PathBuf};

use super::{Dataset, MemoryStore, Store};
use crate::entity::EntityKind;
use crate::error::Result;
use crate::files::write_atomic;
use crate::value::Record;

/// Store persisted as a single YAML document.
///
/// The file is read on open and rewritten atomically on every commit.
#[derive(Debug)]
pub struct YamlStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl YamlStore {
    /// Open a store, loading existing data if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let dataset: Dataset = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                Dataset::new()
            } else {
                serde_yaml_ng::from_str(&content)?
            }
        } else {
            Dataset::new()
        };

        for name in dataset.keys() {
            if EntityKind::from_plural(name).is_none() {
                tracing::warn!(path = %path.display(), entity = %name, "unknown entity type in store");
            }
        }

        tracing::debug!(path = %path.display(), "opened store");

        Ok(Self {
            path,
            inner: MemoryStore::from_dataset(dataset),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Committed data.
    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        self.inner.dataset()
    }
}

impl Store for YamlStore {
    fn upsert(&mut self, kind: EntityKind, id: &str, record: Record) -> Result<()> {
        self.inner.upsert(kind, id, record)
    }

    fn commit(&mut self) -> Result<()> {
        self.inner.commit()?;
        let content = serde_yaml_ng::to_string(self.inner.dataset())?;
        write_atomic(&self.path, content.as_bytes())?;
        tracing::info!(path = %self.path.display(), "store committed");
        Ok(())
    }

    fn records(&self, kind: EntityKind) -> Vec<(&str, &Record)> {
        self.inner.records(kind)
    }

    fn id_handle_pairs(&self) -> Vec<(String, String)> {
        self.inner.id_handle_pairs()
    }
}
