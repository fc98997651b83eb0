//! JSON-file storage engine.
//!
//! [`FileStorage`] owns the registry of live records, keyed by
//! `"<TypeName>.<id>"`, and moves it to and from one backing file.
//!
//! # File layout
//!
//! ```json
//! {
//!     "User.1c9b...": {
//!         "__class__": "User",
//!         "id": "1c9b...",
//!         "created_at": "2017-09-28T21:03:54.052298",
//!         "updated_at": "2017-09-28T21:03:54.052302",
//!         "email": ""
//!     }
//! }
//! ```
//!
//! Every [`FileStorage::save`] rewrites the whole file. The engine assumes a
//! single process owns the file; concurrent writers overwrite each other.

mod atomic;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::error::{ModelError, StorageError};
use crate::models::{composite_key, ModelKind, Record, KEY_SEPARATOR};

/// Backing file used when no other path is configured.
pub const DEFAULT_FILE_PATH: &str = "file.json";

const JSON_INDENT: &[u8] = b"    ";

/// What [`FileStorage::reload`] does with an entry that cannot be rehydrated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReloadPolicy {
    /// Skip the entry with a warning and keep loading.
    #[default]
    Lenient,
    /// Abort the reload with [`StorageError::Format`].
    Strict,
}

/// Outcome of a successful [`FileStorage::reload`].
#[derive(Debug, Default)]
pub struct ReloadReport {
    /// Entries registered from the file.
    pub loaded: usize,
    /// Entries left out under [`ReloadPolicy::Lenient`].
    pub skipped: Vec<SkippedEntry>,
}

#[derive(Debug)]
pub struct SkippedEntry {
    pub key: String,
    pub error: ModelError,
}

pub struct FileStorage {
    path: PathBuf,
    policy: ReloadPolicy,
    objects: BTreeMap<String, Record>,
    /// Stored entries that did not load; written back verbatim by `save`.
    unreadable: BTreeMap<String, Value>,
}

impl FileStorage {
    /// An empty registry backed by `path`. Nothing is read until
    /// [`FileStorage::reload`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            policy: ReloadPolicy::default(),
            objects: BTreeMap::new(),
            unreadable: BTreeMap::new(),
        }
    }

    pub fn with_policy(mut self, policy: ReloadPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> ReloadPolicy {
        self.policy
    }

    // ============================================================
    // Registry access
    // ============================================================

    /// The whole registry, in key order.
    pub fn all(&self) -> &BTreeMap<String, Record> {
        &self.objects
    }

    /// Entries whose key's type tag is `kind`.
    pub fn all_of(&self, kind: ModelKind) -> impl Iterator<Item = (&String, &Record)> {
        self.objects
            .iter()
            .filter(move |(key, _)| key_tag(key) == Some(kind.as_str()))
    }

    /// Number of entries, optionally restricted to one type tag.
    pub fn count(&self, kind: Option<ModelKind>) -> usize {
        match kind {
            Some(kind) => self.all_of(kind).count(),
            None => self.objects.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }

    /// Raw stored entries left out by the last lenient reload, or ignored
    /// because their key has no type separator.
    pub fn unreadable(&self) -> &BTreeMap<String, Value> {
        &self.unreadable
    }

    pub fn get(&self, key: &str) -> Option<&Record> {
        self.objects.get(key)
    }

    /// Mutable access; changes are written by the next [`FileStorage::save`].
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Record> {
        self.objects.get_mut(key)
    }

    pub fn find(&self, kind: ModelKind, id: &str) -> Option<&Record> {
        self.objects.get(&composite_key(kind, id))
    }

    // ============================================================
    // Registry mutation
    // ============================================================

    /// Inserts `record` under its computed key, replacing any previous entry.
    /// Returns the key.
    pub fn register(&mut self, record: Record) -> String {
        let key = record.key();
        self.insert(key.clone(), record);
        key
    }

    /// Builds a fresh record of `kind` and registers it. Returns the key.
    pub fn create(&mut self, kind: ModelKind) -> String {
        self.register(Record::new(kind))
    }

    /// Removes the entry for `key`. An absent key is a no-op.
    pub fn delete(&mut self, key: &str) -> Option<Record> {
        let removed = self.objects.remove(key);
        if removed.is_some() {
            tracing::debug!(key, "deleted record");
        }
        removed
    }

    fn insert(&mut self, key: String, record: Record) {
        tracing::debug!(key = %key, "registered record");
        self.objects.insert(key, record);
    }

    // ============================================================
    // Persistence
    // ============================================================

    /// Writes every entry to the backing file, replacing its content.
    ///
    /// Unreadable entries from the last reload are written back unchanged
    /// unless a live record has since taken their key.
    pub fn save(&self) -> Result<(), StorageError> {
        let mut data: Map<String, Value> = self
            .unreadable
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        data.extend(
            self.objects
                .iter()
                .map(|(key, record)| (key.clone(), Value::Object(record.to_dict()))),
        );

        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(JSON_INDENT));
        data.serialize(&mut serializer)?;

        atomic::write_atomic(&self.path, &buf)?;
        tracing::info!(
            path = %self.path.display(),
            records = self.objects.len(),
            unreadable = self.unreadable.len(),
            "saved registry"
        );
        Ok(())
    }

    /// Touch-and-persist: bumps the record's `updated_at`, then saves.
    pub fn touch(&mut self, key: &str) -> Result<(), StorageError> {
        let record = self
            .objects
            .get_mut(key)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;
        record.touch();
        self.save()
    }

    /// Repopulates the registry from the backing file.
    ///
    /// A missing file is a first run and leaves the registry as it is.
    /// Entries are registered under the key they were stored with; keys
    /// without a type separator are not loaded. Entries already in memory with
    /// the same key are replaced.
    ///
    /// Entries that are not loaded keep their raw value in
    /// [`FileStorage::unreadable`] so the next save does not drop them.
    ///
    /// # Errors
    /// - [`StorageError::Io`] when the file exists but cannot be read.
    /// - [`StorageError::Parse`] / [`StorageError::InvalidLayout`] when the
    ///   content is not a JSON object. The registry is untouched.
    /// - [`StorageError::Format`] under [`ReloadPolicy::Strict`] for the first
    ///   entry that fails to rehydrate. Entries before it stay registered.
    pub fn reload(&mut self) -> Result<ReloadReport, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no backing file, nothing to reload");
                return Ok(ReloadReport::default());
            }
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let value: Value = serde_json::from_str(&content).map_err(|source| StorageError::Parse {
            path: self.path.clone(),
            source,
        })?;
        let Value::Object(entries) = value else {
            return Err(StorageError::InvalidLayout {
                path: self.path.clone(),
            });
        };

        let mut report = ReloadReport::default();
        for (key, fields) in entries {
            let Some(tag) = key_tag(&key) else {
                tracing::debug!(key = %key, "keeping entry without a type separator as-is");
                self.unreadable.insert(key, fields);
                continue;
            };

            match rehydrate(tag, fields.clone()) {
                Ok(record) => {
                    self.unreadable.remove(&key);
                    self.insert(key, record);
                    report.loaded += 1;
                }
                Err(error) => match self.policy {
                    ReloadPolicy::Strict => return Err(StorageError::Format { key, source: error }),
                    ReloadPolicy::Lenient => {
                        tracing::warn!(
                            key = %key,
                            error = %error,
                            "skipping unreadable entry, it will be saved back unchanged"
                        );
                        self.unreadable.insert(key.clone(), fields);
                        report.skipped.push(SkippedEntry { key, error });
                    }
                },
            }
        }

        tracing::info!(
            path = %self.path.display(),
            loaded = report.loaded,
            skipped = report.skipped.len(),
            "reloaded registry"
        );
        Ok(report)
    }
}

fn rehydrate(tag: &str, fields: Value) -> Result<Record, ModelError> {
    let kind = ModelKind::from_str(tag).ok_or_else(|| ModelError::UnknownKind(tag.to_string()))?;
    Record::from_value(kind, fields)
}

/// Type tag component of a registry key.
fn key_tag(key: &str) -> Option<&str> {
    key.split_once(KEY_SEPARATOR).map(|(tag, _)| tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_tag_splits_on_first_separator() {
        assert_eq!(key_tag("User.1234"), Some("User"));
        assert_eq!(key_tag("User.12.34"), Some("User"));
        assert_eq!(key_tag("User"), None);
    }

    #[test]
    fn test_rehydrate_rejects_unknown_tag() {
        let err = rehydrate("Flight", Value::Object(Map::new())).unwrap_err();
        assert!(matches!(err, ModelError::UnknownKind(tag) if tag == "Flight"));
    }
}
