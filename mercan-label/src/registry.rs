//! Paper size registry
//!
//! Holds the built-in catalog plus user-defined custom sizes. Custom
//! sizes are always thermal; sheet grids only exist as built-ins.
//! Persistence of the custom list lives in [`crate::store`].

use shared::PaperSize;
use thiserror::Error;
use tracing::info;

use crate::defaults;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Paper size already exists: {0}")]
    DuplicateName(String),

    #[error("Paper size not found: {0}")]
    NotFound(String),

    #[error("Paper size is built in: {0}")]
    NotCustom(String),

    #[error("Invalid paper size: {0}")]
    InvalidDimensions(String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// In-memory paper size catalog
#[derive(Debug, Clone)]
pub struct PaperSizeRegistry {
    built_in: Vec<PaperSize>,
    custom: Vec<PaperSize>,
}

impl PaperSizeRegistry {
    /// Registry with the factory catalog only
    pub fn new() -> Self {
        Self {
            built_in: defaults::built_in_sizes(),
            custom: Vec::new(),
        }
    }

    /// Registry seeded with previously stored custom sizes
    ///
    /// Stored entries whose names collide with the factory catalog are
    /// dropped so built-ins always win.
    pub fn with_custom(custom: Vec<PaperSize>) -> Self {
        let mut registry = Self::new();
        for mut size in custom {
            if registry.get(&size.name).is_none() {
                size.is_custom = true;
                registry.custom.push(size);
            }
        }
        registry
    }

    /// Look up a size by exact name
    pub fn get(&self, name: &str) -> Option<&PaperSize> {
        self.built_in
            .iter()
            .chain(self.custom.iter())
            .find(|size| size.name == name)
    }

    /// All names, built-ins first, insertion order within each group
    pub fn list_names(&self) -> Vec<&str> {
        self.built_in
            .iter()
            .chain(self.custom.iter())
            .map(|size| size.name.as_str())
            .collect()
    }

    /// The custom entries, for persistence
    pub fn custom_sizes(&self) -> &[PaperSize] {
        &self.custom
    }

    /// Add a custom thermal size from physical dimensions
    pub fn add(&mut self, name: &str, width_mm: f32, height_mm: f32) -> RegistryResult<&PaperSize> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RegistryError::InvalidDimensions("name must not be empty".to_string()));
        }
        if !(width_mm > 0.0 && height_mm > 0.0) {
            return Err(RegistryError::InvalidDimensions(format!(
                "dimensions must be positive, got {width_mm}x{height_mm} mm"
            )));
        }
        if self.get(name).is_some() {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }

        let mut size = PaperSize::thermal(name, width_mm, height_mm);
        size.is_custom = true;
        info!(name, width_mm, height_mm, "custom paper size added");
        self.custom.push(size);
        Ok(&self.custom[self.custom.len() - 1])
    }

    /// Remove a custom size, returning it
    pub fn remove(&mut self, name: &str) -> RegistryResult<PaperSize> {
        if self.built_in.iter().any(|size| size.name == name) {
            return Err(RegistryError::NotCustom(name.to_string()));
        }
        let index = self
            .custom
            .iter()
            .position(|size| size.name == name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        info!(name, "custom paper size removed");
        Ok(self.custom.remove(index))
    }

    /// Rename a custom size in place
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> RegistryResult<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(RegistryError::InvalidDimensions("name must not be empty".to_string()));
        }
        if self.built_in.iter().any(|size| size.name == old_name) {
            return Err(RegistryError::NotCustom(old_name.to_string()));
        }
        if new_name != old_name && self.get(new_name).is_some() {
            return Err(RegistryError::DuplicateName(new_name.to_string()));
        }
        let size = self
            .custom
            .iter_mut()
            .find(|size| size.name == old_name)
            .ok_or_else(|| RegistryError::NotFound(old_name.to_string()))?;
        info!(old_name, new_name, "custom paper size renamed");
        size.name = new_name.to_string();
        Ok(())
    }
}

impl Default for PaperSizeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
