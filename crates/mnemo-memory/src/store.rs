use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{error, info, warn};

use mnemo_config::{DEFAULT_MEMORY_TEMPLATE, REQUIRED_SECTIONS};
use mnemo_core::AppError;

/// Owns the persisted memory document: one primary file plus a
/// single-slot backup at a fixed sibling path.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    memory_path: PathBuf,
    backup_path: PathBuf,
}

impl MemoryStore {
    pub fn new(memory_path: PathBuf) -> Self {
        Self {
            backup_path: backup_path_for(&memory_path),
            memory_path,
        }
    }

    pub fn memory_path(&self) -> &Path {
        &self.memory_path
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// Current document text. A document that has never been persisted
    /// yields the default template; this is not an error.
    pub fn load(&self) -> Result<String> {
        if !self.memory_path.exists() {
            warn!(path = %self.memory_path.display(), "memory document not found, using default template");
            return Ok(DEFAULT_MEMORY_TEMPLATE.to_string());
        }

        let content = fs::read_to_string(&self.memory_path).with_context(|| {
            format!(
                "Failed to read memory document: {}",
                self.memory_path.display()
            )
        })?;
        info!(chars = content.chars().count(), "loaded memory document");
        Ok(content)
    }

    /// Persist new document content.
    ///
    /// An existing document is first moved aside into the backup slot
    /// (replacing any prior backup), then the new content is written.
    /// The two steps are not atomic with respect to concurrent
    /// processes; at most one pipeline run is assumed at a time.
    pub fn save(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.memory_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create memory dir: {}", parent.display()))?;
        }

        if self.memory_path.exists() {
            fs::rename(&self.memory_path, &self.backup_path).with_context(|| {
                format!(
                    "Failed to move prior document to backup: {}",
                    self.backup_path.display()
                )
            })?;
            info!(backup = %self.backup_path.display(), "created backup");
        }

        fs::write(&self.memory_path, content).map_err(|source| AppError::DocumentUnwritable {
            path: self.memory_path.display().to_string(),
            message: source.to_string(),
        })?;

        info!(chars = content.chars().count(), "saved memory document");
        Ok(())
    }

    /// Write the initial document unless one already exists.
    ///
    /// Returns whether a document was created; never overwrites.
    pub fn create_initial(&self, template: &str) -> Result<bool> {
        if self.memory_path.exists() {
            info!("memory document already exists, skipping initialization");
            return Ok(false);
        }

        self.save(template)?;
        info!("created initial memory document from template");
        Ok(true)
    }

    /// Read-only reflection for health reporting. `valid_format` is
    /// advisory; nothing blocks on it.
    pub fn stats(&self) -> Result<MemoryStats> {
        if !self.memory_path.exists() {
            return Ok(MemoryStats::default());
        }

        let metadata = fs::metadata(&self.memory_path).with_context(|| {
            format!(
                "Failed to stat memory document: {}",
                self.memory_path.display()
            )
        })?;
        let content = fs::read_to_string(&self.memory_path).with_context(|| {
            format!(
                "Failed to read memory document: {}",
                self.memory_path.display()
            )
        })?;

        Ok(MemoryStats {
            exists: true,
            file_size: metadata.len(),
            character_count: content.chars().count(),
            line_count: content.lines().count(),
            last_modified: metadata.modified().ok().map(DateTime::<Local>::from),
            valid_format: validate_format(&content),
        })
    }

    /// Document wrapped in a framing block for prompt injection.
    pub fn context_for_prompt(&self) -> String {
        match self.load() {
            Ok(memory) => format!(
                "# User Context\n\n\
                 Based on previous interactions, here's what I know about you:\n\n\
                 {memory}\n\n\
                 ---\n\n\
                 I'll use this context to provide more personalized and relevant responses."
            ),
            Err(err) => {
                error!(error = %err, "failed to load memory for prompt context");
                "# User Context\n\nNo previous context available.".to_string()
            }
        }
    }
}

/// Check that every required section header appears as a literal
/// substring of the document.
pub fn validate_format(content: &str) -> bool {
    for section in REQUIRED_SECTIONS {
        if !content.contains(section) {
            warn!(section, "memory document missing required section");
            return false;
        }
    }
    true
}

/// Reflection over the persisted document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemoryStats {
    pub exists: bool,
    pub file_size: u64,
    pub character_count: usize,
    pub line_count: usize,
    pub last_modified: Option<DateTime<Local>>,
    pub valid_format: bool,
}

/// `memory.txt` backs up to the fixed sibling `memory.txt.backup`.
fn backup_path_for(memory_path: &Path) -> PathBuf {
    let mut file_name = memory_path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    file_name.push(".backup");
    memory_path.with_file_name(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store(dir: &Path) -> MemoryStore {
        MemoryStore::new(dir.join("memory.txt"))
    }

    #[test]
    fn test_backup_path_is_fixed_sibling() {
        let store = MemoryStore::new(PathBuf::from("/state/mnemo/memory.txt"));
        assert_eq!(
            store.backup_path(),
            Path::new("/state/mnemo/memory.txt.backup")
        );
    }

    #[test]
    fn test_load_missing_returns_default_template() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(dir.path());
        let content = store.load().unwrap();
        assert_eq!(content, DEFAULT_MEMORY_TEMPLATE);
        assert!(!store.memory_path().exists());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new(dir.path().join("deep").join("nested").join("memory.txt"));
        store.save("content").unwrap();
        assert_eq!(fs::read_to_string(store.memory_path()).unwrap(), "content");
    }

    #[test]
    fn test_save_moves_prior_content_to_backup() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(dir.path());

        store.save("first generation").unwrap();
        assert!(!store.backup_path().exists());

        store.save("second generation").unwrap();
        assert_eq!(
            fs::read_to_string(store.memory_path()).unwrap(),
            "second generation"
        );
        assert_eq!(
            fs::read_to_string(store.backup_path()).unwrap(),
            "first generation"
        );

        // Third save overwrites the single backup slot.
        store.save("third generation").unwrap();
        assert_eq!(
            fs::read_to_string(store.backup_path()).unwrap(),
            "second generation"
        );
    }

    #[test]
    fn test_create_initial_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(dir.path());

        assert!(store.create_initial("template v1").unwrap());
        assert!(!store.create_initial("template v2").unwrap());
        assert_eq!(
            fs::read_to_string(store.memory_path()).unwrap(),
            "template v1"
        );
    }

    #[test]
    fn test_stats_absent_document() {
        let dir = tempfile::tempdir().unwrap();
        let stats = make_store(dir.path()).stats().unwrap();
        assert!(!stats.exists);
        assert_eq!(stats.character_count, 0);
        assert!(stats.last_modified.is_none());
    }

    #[test]
    fn test_stats_present_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(dir.path());
        store.save(DEFAULT_MEMORY_TEMPLATE).unwrap();

        let stats = store.stats().unwrap();
        assert!(stats.exists);
        assert!(stats.valid_format);
        assert_eq!(
            stats.character_count,
            DEFAULT_MEMORY_TEMPLATE.chars().count()
        );
        assert_eq!(stats.line_count, DEFAULT_MEMORY_TEMPLATE.lines().count());
        assert!(stats.last_modified.is_some());
    }

    #[test]
    fn test_validate_format() {
        assert!(validate_format(DEFAULT_MEMORY_TEMPLATE));
        assert!(!validate_format("USER PROFILE\nINTERESTS:\n"));
        assert!(!validate_format(""));
    }

    #[test]
    fn test_context_for_prompt_wraps_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(dir.path());
        store.save("INTERESTS:\n- hiking").unwrap();

        let context = store.context_for_prompt();
        assert!(context.starts_with("# User Context"));
        assert!(context.contains("INTERESTS:\n- hiking"));
    }
}
