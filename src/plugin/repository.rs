//! Repository of per-plugin records

use super::error::{PluginError, Result};
use super::record::RepositoryRecord;
use std::collections::BTreeMap;

/// Plugin name to record mapping owned by the manager
///
/// A record exists exactly while the plugin of that name is loaded. Only the
/// manager creates and removes records.
#[derive(Debug, Default)]
pub struct Repository {
    records: BTreeMap<String, RepositoryRecord>,
}

impl Repository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty record for `name`
    ///
    /// # Errors
    /// Returns [`PluginError::DuplicatePlugin`] if a record already exists.
    pub fn create_record(&mut self, name: &str) -> Result<&mut RepositoryRecord> {
        if self.records.contains_key(name) {
            return Err(PluginError::DuplicatePlugin(name.to_string()));
        }

        Ok(self
            .records
            .entry(name.to_string())
            .or_insert_with(RepositoryRecord::new))
    }

    /// # Errors
    /// Returns [`PluginError::RecordNotFound`] if there is no record for `name`.
    pub fn get(&self, name: &str) -> Result<&RepositoryRecord> {
        self.records
            .get(name)
            .ok_or_else(|| PluginError::RecordNotFound(name.to_string()))
    }

    /// # Errors
    /// Returns [`PluginError::RecordNotFound`] if there is no record for `name`.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut RepositoryRecord> {
        self.records
            .get_mut(name)
            .ok_or_else(|| PluginError::RecordNotFound(name.to_string()))
    }

    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Remove the record for `name`; missing records are ignored
    pub fn remove_record(&mut self, name: &str) {
        self.records.remove(name);
    }

    /// All records ordered by plugin name
    pub fn records(&self) -> impl Iterator<Item = (&str, &RepositoryRecord)> {
        self.records.iter().map(|(name, record)| (name.as_str(), record))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }
}
