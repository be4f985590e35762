#[cfg(test)]
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use tempfile::NamedTempFile;
use tracing::debug;

/// A named key-value store holding whole serialized values.
///
/// Reads return `Ok(None)` when the key has never been written. Writes
/// replace the previous value entirely.
pub trait SlotStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// Slots backed by one `<key>.json` file per key inside a data directory
#[derive(Debug, Clone)]
pub struct FileSlots {
    dir: PathBuf,
}

impl FileSlots {
    pub fn open(dir: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        debug!(dir = %dir.display(), "opened slot directory");
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }
}

impl SlotStorage for FileSlots {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed reading {}", path.display()))?;
        debug!(file = %path.display(), bytes = raw.len(), "read slot");
        Ok(Some(raw))
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.path_for(key);
        debug!(file = %path.display(), bytes = value.len(), "writing slot atomically");

        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(value.as_bytes())?;
        temp.flush()?;
        temp.persist(&path)
            .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;
        Ok(())
    }
}

/// In-memory slots for tests
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemorySlots {
    values: HashMap<String, String>,
    /// 为 true 时所有写入都失败（模拟存储配额耗尽）
    pub fail_writes: bool,
}

#[cfg(test)]
impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let mut slots = Self::default();
        slots.values.insert(key.to_string(), value.to_string());
        slots
    }
}

#[cfg(test)]
impl SlotStorage for MemorySlots {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        if self.fail_writes {
            return Err(anyhow!("storage quota exceeded while writing '{}'", key));
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Keep slot keys usable as file names
/// Example: "study/Tasks v2" -> "study_Tasks_v2"
fn sanitize_key(key: &str) -> String {
    let cleaned: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "slot".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_slots_missing_key() {
        let temp = tempdir().unwrap();
        let slots = FileSlots::open(temp.path()).unwrap();
        assert_eq!(slots.get("studyTasks").unwrap(), None);
    }

    #[test]
    fn test_file_slots_overwrite() {
        let temp = tempdir().unwrap();
        let mut slots = FileSlots::open(temp.path()).unwrap();

        slots.set("studyTasks", "[1]").unwrap();
        slots.set("studyTasks", "[]").unwrap();

        assert_eq!(slots.get("studyTasks").unwrap().as_deref(), Some("[]"));
        assert!(temp.path().join("studyTasks.json").exists());
    }

    #[test]
    fn test_file_slots_creates_nested_dir() {
        let temp = tempdir().unwrap();
        let nested = temp.path().join("a").join("b");
        let mut slots = FileSlots::open(&nested).unwrap();
        slots.set("k", "v").unwrap();
        assert_eq!(slots.path_for("k"), nested.join("k.json"));
        assert_eq!(slots.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("studyTasks"), "studyTasks");
        assert_eq!(sanitize_key("study/Tasks v2"), "study_Tasks_v2");
        assert_eq!(sanitize_key(""), "slot");
    }

    #[test]
    fn test_memory_slots_fail_writes() {
        let mut slots = MemorySlots::with_value("k", "old");
        slots.fail_writes = true;
        assert!(slots.set("k", "new").is_err());
        assert_eq!(slots.get("k").unwrap().as_deref(), Some("old"));
    }
}
