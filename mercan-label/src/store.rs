//! redb-based persistence for label templates and registry settings

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use shared::{LabelTemplate, PaperSize};
use thiserror::Error;
use tracing::warn;

use crate::defaults;

/// Templates table: key = paper size name, value = JSON
const TEMPLATES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("label_templates");

/// Settings table: key = setting name, value = JSON
const SETTINGS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("label_settings");

const CUSTOM_SIZES_KEY: &str = "custom_paper_sizes";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Template storage, keyed by paper size name
///
/// Reads never fail on bad payloads: a missing or unreadable record
/// resolves to the factory template for built-in sizes, or an empty
/// shell otherwise. Unreadable records are logged and overwritten on
/// the next save.
#[derive(Clone)]
pub struct TemplateStore {
    db: Arc<Database>,
}

impl TemplateStore {
    /// Open or create database
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        let db =
            Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StoreResult<Self> {
        // Initialize tables
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(TEMPLATES_TABLE)?;
            let _ = write_txn.open_table(SETTINGS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    // ========== Templates ==========

    /// Load the template for a paper size, with fallback
    ///
    /// The key is authoritative for `paper_size_name`, whatever the
    /// stored payload claims.
    pub fn load(&self, paper_size_name: &str) -> StoreResult<LabelTemplate> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TEMPLATES_TABLE)?;

        match table.get(paper_size_name)? {
            Some(guard) => match serde_json::from_slice::<LabelTemplate>(guard.value()) {
                Ok(mut template) => {
                    template.paper_size_name = paper_size_name.to_string();
                    Ok(template)
                }
                Err(err) => {
                    warn!(paper_size_name, %err, "stored template unreadable, using fallback");
                    Ok(fallback(paper_size_name))
                }
            },
            None => Ok(fallback(paper_size_name)),
        }
    }

    /// Store a template under its paper size name
    pub fn save(&self, template: &LabelTemplate) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(TEMPLATES_TABLE)?;
            let value = serde_json::to_vec(template)?;
            table.insert(template.paper_size_name.as_str(), value.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Drop the stored template for a paper size, if any
    pub fn delete(&self, paper_size_name: &str) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(TEMPLATES_TABLE)?;
            table.remove(paper_size_name)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Replace any stored template with the fallback and return it
    ///
    /// The fallback is persisted, so subsequent loads read back the
    /// exact template this returned (fresh item ids included).
    pub fn reset_to_default(&self, paper_size_name: &str) -> StoreResult<LabelTemplate> {
        let template = fallback(paper_size_name);
        self.save(&template)?;
        Ok(template)
    }

    /// Move a stored template to a new key after a paper size rename
    ///
    /// No-op when nothing is stored under the old name. Unreadable
    /// payloads move unchanged; [`Self::load`] repairs the embedded
    /// name on read anyway.
    pub fn migrate_key(&self, old_name: &str, new_name: &str) -> StoreResult<()> {
        if old_name == new_name {
            return Ok(());
        }

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(TEMPLATES_TABLE)?;

            // Read first
            let bytes = match table.get(old_name)? {
                Some(guard) => Some(guard.value().to_vec()),
                None => None,
            };

            if let Some(bytes) = bytes {
                let value = match serde_json::from_slice::<LabelTemplate>(&bytes) {
                    Ok(mut template) => {
                        template.paper_size_name = new_name.to_string();
                        serde_json::to_vec(&template)?
                    }
                    Err(err) => {
                        warn!(old_name, new_name, %err, "migrating unreadable template as-is");
                        bytes
                    }
                };
                table.insert(new_name, value.as_slice())?;
                table.remove(old_name)?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    // ========== Settings ==========

    /// Stored custom paper sizes, empty when absent or unreadable
    pub fn load_custom_sizes(&self) -> StoreResult<Vec<PaperSize>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SETTINGS_TABLE)?;

        match table.get(CUSTOM_SIZES_KEY)? {
            Some(guard) => match serde_json::from_slice(guard.value()) {
                Ok(sizes) => Ok(sizes),
                Err(err) => {
                    warn!(%err, "stored custom sizes unreadable, starting empty");
                    Ok(Vec::new())
                }
            },
            None => Ok(Vec::new()),
        }
    }

    /// Persist the full custom paper size list
    pub fn save_custom_sizes(&self, sizes: &[PaperSize]) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SETTINGS_TABLE)?;
            let value = serde_json::to_vec(sizes)?;
            table.insert(CUSTOM_SIZES_KEY, value.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Insert raw bytes under a template key, bypassing serialization
    #[cfg(test)]
    pub fn insert_raw(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(TEMPLATES_TABLE)?;
            table.insert(key, bytes)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Insert raw bytes under a settings key, bypassing serialization
    #[cfg(test)]
    pub fn insert_raw_setting(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SETTINGS_TABLE)?;
            table.insert(key, bytes)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

fn fallback(paper_size_name: &str) -> LabelTemplate {
    defaults::default_template(paper_size_name)
        .unwrap_or_else(|| LabelTemplate::empty(paper_size_name))
}
