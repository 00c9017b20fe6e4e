//! Label service
//!
//! Facade over the registry, the store and the render pipeline. Owns
//! the active paper-size selection and keeps the three in step: size
//! lifecycle changes cascade into stored templates and the persisted
//! custom-size list before the call returns.

use std::path::Path;

use chrono::NaiveDate;
use shared::{LabelTemplate, PaperSize};
use thiserror::Error;
use tracing::{info, instrument};

use crate::defaults::DEFAULT_PAPER_SIZE;
use crate::queue::PrintQueue;
use crate::registry::{PaperSizeRegistry, RegistryError};
use crate::render::{render_document, PrintDocument};
use crate::store::{StoreError, TemplateStore};
use crate::surface::{PrintSurface, SurfaceError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Print queue is empty")]
    EmptyQueue,

    #[error("Paper size not found: {0}")]
    PaperSizeNotFound(String),

    #[error("Template has no items: {0}")]
    EmptyTemplate(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Orchestrates paper sizes, templates and print dispatch
pub struct LabelService {
    registry: PaperSizeRegistry,
    store: TemplateStore,
    active_size: String,
}

impl LabelService {
    /// Open the backing database and load persisted custom sizes
    pub fn open(path: impl AsRef<Path>) -> ServiceResult<Self> {
        let store = TemplateStore::open(path)?;
        Self::new(store)
    }

    /// Build over an already-open store
    pub fn new(store: TemplateStore) -> ServiceResult<Self> {
        let custom = store.load_custom_sizes()?;
        let registry = PaperSizeRegistry::with_custom(custom);
        Ok(Self {
            registry,
            store,
            active_size: DEFAULT_PAPER_SIZE.to_string(),
        })
    }

    pub fn registry(&self) -> &PaperSizeRegistry {
        &self.registry
    }

    /// Name of the size new prints and editor sessions use
    pub fn active_size(&self) -> &str {
        &self.active_size
    }

    /// The active size's full definition
    pub fn active_paper(&self) -> ServiceResult<&PaperSize> {
        self.registry
            .get(&self.active_size)
            .ok_or_else(|| ServiceError::PaperSizeNotFound(self.active_size.clone()))
    }

    pub fn set_active_size(&mut self, name: &str) -> ServiceResult<()> {
        if self.registry.get(name).is_none() {
            return Err(ServiceError::PaperSizeNotFound(name.to_string()));
        }
        self.active_size = name.to_string();
        Ok(())
    }

    // ========== Size lifecycle ==========

    /// Add a custom thermal size and persist the custom list
    pub fn add_paper_size(
        &mut self,
        name: &str,
        width_mm: f32,
        height_mm: f32,
    ) -> ServiceResult<PaperSize> {
        let size = self.registry.add(name, width_mm, height_mm)?.clone();
        self.store.save_custom_sizes(self.registry.custom_sizes())?;
        Ok(size)
    }

    /// Rename a custom size, migrating its stored template
    ///
    /// The old template key never survives; an active selection on the
    /// old name follows the rename.
    pub fn rename_paper_size(&mut self, old_name: &str, new_name: &str) -> ServiceResult<()> {
        self.registry.rename(old_name, new_name)?;
        self.store.migrate_key(old_name, new_name)?;
        self.store.save_custom_sizes(self.registry.custom_sizes())?;
        if self.active_size == old_name {
            self.active_size = new_name.trim().to_string();
        }
        info!(old_name, new_name, "paper size renamed");
        Ok(())
    }

    /// Remove a custom size together with its stored template
    ///
    /// An active selection on the removed size reverts to the default.
    pub fn remove_paper_size(&mut self, name: &str) -> ServiceResult<PaperSize> {
        let removed = self.registry.remove(name)?;
        self.store.delete(name)?;
        self.store.save_custom_sizes(self.registry.custom_sizes())?;
        if self.active_size == name {
            self.active_size = DEFAULT_PAPER_SIZE.to_string();
        }
        info!(name, "paper size removed");
        Ok(removed)
    }

    // ========== Templates ==========

    pub fn load_template(&self, name: &str) -> ServiceResult<LabelTemplate> {
        Ok(self.store.load(name)?)
    }

    pub fn save_template(&self, template: &LabelTemplate) -> ServiceResult<()> {
        Ok(self.store.save(template)?)
    }

    /// Drop the stored template and return the factory fallback
    pub fn reset_template(&self, name: &str) -> ServiceResult<LabelTemplate> {
        Ok(self.store.reset_to_default(name)?)
    }

    /// Human-readable template JSON for clipboard/support export
    pub fn export_template_json(&self, name: &str) -> ServiceResult<String> {
        let template = self.store.load(name)?;
        Ok(template.to_pretty_json().map_err(StoreError::from)?)
    }

    // ========== Printing ==========

    /// Render the queue against the active size and hand the document
    /// to the surface
    ///
    /// Validation happens before any work: an empty queue, a vanished
    /// active size or a template with no items all reject the call with
    /// no partial effects.
    #[instrument(skip(self, queue, surface), fields(paper = %self.active_size))]
    pub async fn print<S: PrintSurface>(
        &self,
        queue: &PrintQueue,
        surface: &S,
        today: NaiveDate,
    ) -> ServiceResult<PrintDocument> {
        if queue.is_empty() {
            return Err(ServiceError::EmptyQueue);
        }
        let paper = self.active_paper()?;
        let template = self.store.load(&self.active_size)?;
        if template.items.is_empty() {
            return Err(ServiceError::EmptyTemplate(self.active_size.clone()));
        }

        let labels = queue.expand();
        let document = render_document(paper, &template, &labels, today);
        surface.present(&document).await?;

        info!(
            job_id = %document.job_id,
            pages = document.page_count,
            labels = document.label_count,
            "print job dispatched"
        );
        Ok(document)
    }
}
