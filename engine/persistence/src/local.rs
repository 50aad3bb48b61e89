//! Local file-based decision store

use crate::backend::{Decision, DecisionStore};
use crate::config::PersistenceConfig;
use crate::error::{PersistenceError, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::collections::BTreeMap;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, error, info};

/// Decision store backed by a JSON object file
///
/// The whole file is read at open and rewritten on every flush. Keys are
/// written in sorted order with four-space indentation so the file diffs
/// cleanly and can be corrected by hand.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    decisions: BTreeMap<String, Decision>,
    write_through: bool,
    dirty: bool,
}

impl JsonFileStore {
    /// Open the cache file named by `config`
    pub fn open(config: &PersistenceConfig) -> Result<Self> {
        config.validate().map_err(PersistenceError::config)?;

        let path = config.cache_path();
        let (decisions, dirty) = match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let decisions: BTreeMap<String, Decision> = serde_json::from_str(&contents)
                    .map_err(|e| {
                        PersistenceError::corruption(format!("{}: {e}", path.display()))
                    })?;
                (decisions, false)
            }
            Err(e) if e.kind() == ErrorKind::NotFound && config.create_if_missing => {
                std::fs::create_dir_all(&config.data_dir)?;
                info!("No decision cache at {:?}, starting empty", path);
                (BTreeMap::new(), true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PersistenceError::not_found(format!(
                    "decision cache {} does not exist",
                    path.display()
                )));
            }
            Err(e) => return Err(e.into()),
        };

        info!("Loaded {} cached decisions from {:?}", decisions.len(), path);

        Ok(Self { path, decisions, write_through: config.write_through, dirty })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether there are decisions not yet written to disk
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write a complete replacement file, then rename it over the old one
    fn write_atomically(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            {
                let formatter = PrettyFormatter::with_indent(b"    ");
                let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
                self.decisions.serialize(&mut serializer)?;
            }
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&self.path)?;

        Ok(())
    }

    fn changed(&mut self) -> Result<()> {
        self.dirty = true;
        if self.write_through {
            self.flush()?;
        }
        Ok(())
    }
}

impl DecisionStore for JsonFileStore {
    fn get(&self, raw_name: &str) -> Option<Decision> {
        self.decisions.get(raw_name).copied()
    }

    fn put(&mut self, raw_name: &str, decision: Decision) -> Result<()> {
        if self.decisions.get(raw_name) == Some(&decision) {
            return Ok(());
        }
        self.decisions.insert(raw_name.to_string(), decision);
        self.changed()
    }

    fn remove(&mut self, raw_name: &str) -> Result<Option<Decision>> {
        let removed = self.decisions.remove(raw_name);
        if removed.is_some() {
            self.changed()?;
        }
        Ok(removed)
    }

    fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        self.write_atomically()?;
        self.dirty = false;

        debug!("Flushed {} decisions to {:?}", self.decisions.len(), self.path);
        Ok(())
    }

    fn len(&self) -> usize {
        self.decisions.len()
    }

    fn entries(&self) -> Vec<(String, Decision)> {
        self.decisions.iter().map(|(name, decision)| (name.clone(), *decision)).collect()
    }
}

impl Drop for JsonFileStore {
    fn drop(&mut self) {
        if self.dirty {
            if let Err(e) = self.flush() {
                error!("Failed to flush decision cache {:?} on drop: {}", self.path, e);
            }
        }
    }
}

/// Open the local decision cache described by `config`
pub fn create_local_store(config: &PersistenceConfig) -> Result<JsonFileStore> {
    JsonFileStore::open(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> PersistenceConfig {
        PersistenceConfig { create_if_missing: true, ..PersistenceConfig::new(dir.path()) }
    }

    #[test]
    fn test_missing_cache_is_a_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config = PersistenceConfig::new(temp_dir.path());

        let err = create_local_store(&config).unwrap_err();
        assert!(matches!(err, PersistenceError::NotFound(_)));
    }

    #[test]
    fn test_create_if_missing_writes_empty_cache_on_flush() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);

        let mut store = create_local_store(&config).unwrap();
        assert!(store.is_empty());
        store.flush().unwrap();

        let contents = std::fs::read_to_string(config.cache_path()).unwrap();
        assert_eq!(contents.trim(), "{}");
    }

    #[test]
    fn test_decisions_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);

        {
            let mut store = create_local_store(&config).unwrap();
            store.put("Luka Doncic", Some(1)).unwrap();
            store.put("Incomplete Roster Charge", None).unwrap();
        }

        let store = create_local_store(&config).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("Luka Doncic"), Some(Some(1)));
        assert_eq!(store.get("Incomplete Roster Charge"), Some(None));
    }

    #[test]
    fn test_file_is_sorted_and_indented() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);

        let mut store = create_local_store(&config).unwrap();
        store.put("Zach LaVine", Some(3)).unwrap();
        store.put("Alex Abrines", None).unwrap();
        store.put("Luka Doncic", Some(1)).unwrap();

        let contents = std::fs::read_to_string(config.cache_path()).unwrap();
        let expected = "{\n    \"Alex Abrines\": null,\n    \"Luka Doncic\": 1,\n    \"Zach LaVine\": 3\n}\n";
        assert_eq!(contents, expected);
    }

    #[test]
    fn test_write_through_disabled_defers_until_flush() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("name-map.json"), "{}").unwrap();
        let config = PersistenceConfig { write_through: false, ..PersistenceConfig::new(temp_dir.path()) };

        let mut store = create_local_store(&config).unwrap();
        store.put("Luka Doncic", Some(1)).unwrap();
        assert!(store.is_dirty());
        assert_eq!(std::fs::read_to_string(config.cache_path()).unwrap(), "{}");

        store.flush().unwrap();
        assert!(!store.is_dirty());
        let reloaded = create_local_store(&config).unwrap();
        assert_eq!(reloaded.get("Luka Doncic"), Some(Some(1)));
    }

    #[test]
    fn test_drop_flushes_pending_decisions() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("name-map.json"), "{}").unwrap();
        let config = PersistenceConfig { write_through: false, ..PersistenceConfig::new(temp_dir.path()) };

        {
            let mut store = create_local_store(&config).unwrap();
            store.put("Luka Doncic", Some(1)).unwrap();
        }

        let reloaded = create_local_store(&config).unwrap();
        assert_eq!(reloaded.get("Luka Doncic"), Some(Some(1)));
    }

    #[test]
    fn test_corrupt_cache_is_reported_and_left_alone() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("name-map.json");
        std::fs::write(&path, "{\"Luka Doncic\": \"one\"}").unwrap();

        let err = create_local_store(&PersistenceConfig::new(temp_dir.path())).unwrap_err();
        assert!(matches!(err, PersistenceError::Corruption(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"Luka Doncic\": \"one\"}");
    }

    #[test]
    fn test_reads_hand_edited_cache() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("name-map.json"),
            "{\n    \"Luka Don\\u010di\\u0107\": 1,\n    \"Nene\": null\n}",
        )
        .unwrap();

        let store = create_local_store(&PersistenceConfig::new(temp_dir.path())).unwrap();
        assert_eq!(store.get("Luka Dončić"), Some(Some(1)));
        assert_eq!(store.get("Nene"), Some(None));
    }

    #[test]
    fn test_remove_persists() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);

        let mut store = create_local_store(&config).unwrap();
        store.put("Luka Doncic", Some(1)).unwrap();
        assert_eq!(store.remove("Luka Doncic").unwrap(), Some(Some(1)));
        drop(store);

        let reloaded = create_local_store(&config).unwrap();
        assert!(reloaded.is_empty());
    }

    /// Move `data_dir` aside and leave a plain file in its place so no
    /// temporary file can be created next to the cache
    fn break_data_dir(data_dir: &Path) -> PathBuf {
        let moved = data_dir.with_extension("moved");
        std::fs::rename(data_dir, &moved).unwrap();
        std::fs::write(data_dir, "not a directory").unwrap();
        moved
    }

    #[test]
    fn test_failed_flush_is_reported_and_keeps_previous_file() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("data");
        std::fs::create_dir(&data_dir).unwrap();
        let previous = "{\n    \"Luka Doncic\": 1\n}\n";
        std::fs::write(data_dir.join("name-map.json"), previous).unwrap();
        let config = PersistenceConfig { write_through: false, ..PersistenceConfig::new(&data_dir) };

        let mut store = create_local_store(&config).unwrap();
        store.put("Kevin Durant", Some(2)).unwrap();
        let moved = break_data_dir(&data_dir);

        assert!(matches!(store.flush(), Err(PersistenceError::Io(_))));
        assert!(store.is_dirty());
        assert_eq!(std::fs::read_to_string(moved.join("name-map.json")).unwrap(), previous);
        assert_eq!(std::fs::read_dir(&moved).unwrap().count(), 1);
    }

    #[test]
    fn test_write_through_failure_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("data");
        let config = PersistenceConfig { create_if_missing: true, ..PersistenceConfig::new(&data_dir) };

        let mut store = create_local_store(&config).unwrap();
        store.put("Luka Doncic", Some(1)).unwrap();
        let moved = break_data_dir(&data_dir);

        assert!(store.put("Kevin Durant", Some(2)).is_err());
        let contents = std::fs::read_to_string(moved.join("name-map.json")).unwrap();
        assert_eq!(contents, "{\n    \"Luka Doncic\": 1\n}\n");
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);

        let mut store = create_local_store(&config).unwrap();
        store.put("Luka Doncic", Some(1)).unwrap();
        store.put("Kevin Durant", Some(2)).unwrap();

        let files: Vec<_> = std::fs::read_dir(temp_dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }
}
