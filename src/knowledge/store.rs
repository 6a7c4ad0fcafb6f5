//! Knowledge store for uploaded reference documents
//!
//! The store keeps a durable copy of every uploaded file in a single
//! directory and tracks them in memory by filename. Filenames are the
//! unique key: re-uploading a same-named file is a no-op and the first
//! occurrence wins. Every actual change to the set fires the registered
//! change-notification callback, after the filesystem mutation has
//! completed.

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Callback invoked after the set of knowledge files changes
pub type ChangeCallback = Box<dyn Fn() + Send + Sync>;

/// A document tracked by the knowledge store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeFile {
    /// Base filename, unique within the store
    pub filename: String,
    /// Path of the stored copy inside the store directory
    pub stored_path: PathBuf,
}

/// Outcome of an [`KnowledgeStore::add`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The file was copied into the store and is now tracked
    Added(KnowledgeFile),
    /// A file with the same name was already tracked; nothing changed
    AlreadyTracked,
}

/// Durable set of named reference documents
///
/// # Examples
///
/// ```no_run
/// use quotegen::knowledge::KnowledgeStore;
/// use std::path::Path;
///
/// # fn example() -> quotegen::error::Result<()> {
/// let mut store = KnowledgeStore::open("uploads", None)?;
/// store.add(Path::new("/home/user/price_list.csv"))?;
/// for path in store.list() {
///     println!("{}", path.display());
/// }
/// # Ok(())
/// # }
/// ```
pub struct KnowledgeStore {
    dir: PathBuf,
    files: Vec<KnowledgeFile>,
    on_change: Option<ChangeCallback>,
}

impl KnowledgeStore {
    /// Open a store over the given directory
    ///
    /// Creates the directory if needed, then scans it and registers every
    /// regular non-hidden file already present (without copying), so the
    /// knowledge base persists across restarts. If any files were found,
    /// the change callback fires exactly once.
    ///
    /// # Arguments
    ///
    /// * `dir` - Directory holding the stored copies
    /// * `on_change` - Optional callback fired after every change to the set
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or scanned
    pub fn open(dir: impl Into<PathBuf>, on_change: Option<ChangeCallback>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;

        let mut store = Self {
            dir,
            files: Vec::new(),
            on_change,
        };
        let found = store.scan()?;
        if found > 0 {
            tracing::info!(
                "Registered {} existing knowledge files from {}",
                found,
                store.dir.display()
            );
            store.notify();
        }

        Ok(store)
    }

    /// Scan the store directory and register files not yet tracked
    ///
    /// Entries are sorted by filename so restarts are deterministic.
    fn scan(&mut self) -> Result<usize> {
        let mut discovered: Vec<(String, PathBuf)> = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let filename = entry.file_name().to_string_lossy().to_string();
            if filename.starts_with('.') {
                continue;
            }
            discovered.push((filename, entry.path()));
        }
        discovered.sort_by(|a, b| a.0.cmp(&b.0));

        let mut found = 0;
        for (filename, path) in discovered {
            if self.contains(&filename) {
                continue;
            }
            self.files.push(KnowledgeFile {
                filename,
                stored_path: path,
            });
            found += 1;
        }
        Ok(found)
    }

    /// Register a change-notification callback
    ///
    /// Replaces any callback passed to [`KnowledgeStore::open`]. The
    /// callback fires after every mutation that actually changes the set.
    pub fn set_on_change(&mut self, on_change: ChangeCallback) {
        self.on_change = Some(on_change);
    }

    /// Copy a file into the store and track it
    ///
    /// The file is stored under its base filename. If a file with that
    /// name is already tracked the call is a no-op: no overwrite, no
    /// error, no notification. Otherwise the bytes are copied and the
    /// change callback fires.
    ///
    /// # Arguments
    ///
    /// * `source` - Path of the file to upload
    ///
    /// # Errors
    ///
    /// Returns error if the source has no filename or the copy fails
    pub fn add(&mut self, source: &Path) -> Result<AddOutcome> {
        let filename = source
            .file_name()
            .ok_or_else(|| {
                crate::error::QuotegenError::Knowledge(format!(
                    "Path has no filename: {}",
                    source.display()
                ))
            })?
            .to_string_lossy()
            .to_string();

        if self.contains(&filename) {
            tracing::debug!("File {} already tracked, skipping upload", filename);
            return Ok(AddOutcome::AlreadyTracked);
        }

        let stored_path = self.dir.join(&filename);
        std::fs::copy(source, &stored_path)?;

        let file = KnowledgeFile {
            filename: filename.clone(),
            stored_path,
        };
        self.files.push(file.clone());
        tracing::info!("Added knowledge file: {}", filename);
        self.notify();

        Ok(AddOutcome::Added(file))
    }

    /// Remove a tracked file by name
    ///
    /// Deletes the stored copy and drops the entry, then fires the change
    /// callback. Deletion is idempotent from the caller's perspective: a
    /// stored copy that is already missing is only logged, and removing a
    /// name that was never tracked is a silent no-op with no notification.
    ///
    /// # Arguments
    ///
    /// * `filename` - Base filename of the document to remove
    pub fn remove(&mut self, filename: &str) {
        let Some(position) = self.files.iter().position(|f| f.filename == filename) else {
            tracing::debug!("File {} not tracked, nothing to remove", filename);
            return;
        };

        let file = self.files.remove(position);
        if let Err(e) = std::fs::remove_file(&file.stored_path) {
            tracing::warn!(
                "Could not delete stored copy {}: {}",
                file.stored_path.display(),
                e
            );
        }
        tracing::info!("Removed knowledge file: {}", filename);
        self.notify();
    }

    /// Stored paths of all tracked files, in insertion/discovery order
    pub fn list(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.stored_path.clone()).collect()
    }

    /// All tracked files
    pub fn files(&self) -> &[KnowledgeFile] {
        &self.files
    }

    /// Number of tracked files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Whether a filename is currently tracked
    pub fn contains(&self, filename: &str) -> bool {
        self.files.iter().any(|f| f.filename == filename)
    }

    /// The directory holding the stored copies
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn notify(&self) {
        if let Some(callback) = &self.on_change {
            callback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_callback() -> (Arc<AtomicUsize>, ChangeCallback) {
        let counter = Arc::new(AtomicUsize::new(0));
        let inner = counter.clone();
        let callback: ChangeCallback = Box::new(move || {
            inner.fetch_add(1, Ordering::SeqCst);
        });
        (counter, callback)
    }

    fn write_source(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_open_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("knowledge");
        let store = KnowledgeStore::open(&dir, None).unwrap();
        assert!(dir.is_dir());
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_copies_file_and_notifies() {
        let tmp = tempfile::tempdir().unwrap();
        let source = write_source(tmp.path(), "a.txt", "Widget A: 10 EUR");
        let (count, callback) = counting_callback();

        let mut store =
            KnowledgeStore::open(tmp.path().join("knowledge"), Some(callback)).unwrap();
        let outcome = store.add(&source).unwrap();

        match outcome {
            AddOutcome::Added(file) => {
                assert_eq!(file.filename, "a.txt");
                assert!(file.stored_path.is_file());
                assert_eq!(
                    std::fs::read_to_string(&file.stored_path).unwrap(),
                    "Widget A: 10 EUR"
                );
            }
            AddOutcome::AlreadyTracked => panic!("Expected Added"),
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_duplicate_add_is_noop_without_notification() {
        let tmp = tempfile::tempdir().unwrap();
        let first = write_source(tmp.path(), "price_list.csv", "old");
        let (count, callback) = counting_callback();

        let mut store =
            KnowledgeStore::open(tmp.path().join("knowledge"), Some(callback)).unwrap();
        store.add(&first).unwrap();

        // Same name from a different source directory with different bytes
        let other_dir = tmp.path().join("other");
        std::fs::create_dir_all(&other_dir).unwrap();
        let second = write_source(&other_dir, "price_list.csv", "new");

        let outcome = store.add(&second).unwrap();
        assert_eq!(outcome, AddOutcome::AlreadyTracked);
        assert_eq!(store.len(), 1);
        // First occurrence wins: the stored bytes were not overwritten
        assert_eq!(
            std::fs::read_to_string(&store.list()[0]).unwrap(),
            "old"
        );
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_remove_deletes_copy_and_notifies() {
        let tmp = tempfile::tempdir().unwrap();
        let source = write_source(tmp.path(), "a.txt", "content");
        let (count, callback) = counting_callback();

        let mut store =
            KnowledgeStore::open(tmp.path().join("knowledge"), Some(callback)).unwrap();
        store.add(&source).unwrap();
        let stored = store.list()[0].clone();

        store.remove("a.txt");
        assert!(store.is_empty());
        assert!(!stored.exists());
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_remove_untracked_is_silent_noop() {
        let tmp = tempfile::tempdir().unwrap();
        let (count, callback) = counting_callback();

        let mut store =
            KnowledgeStore::open(tmp.path().join("knowledge"), Some(callback)).unwrap();
        store.remove("ghost.txt");

        assert!(store.is_empty());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_remove_with_missing_copy_still_drops_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let source = write_source(tmp.path(), "a.txt", "content");

        let mut store = KnowledgeStore::open(tmp.path().join("knowledge"), None).unwrap();
        store.add(&source).unwrap();
        // Simulate an external deletion of the stored copy
        std::fs::remove_file(&store.list()[0]).unwrap();

        store.remove("a.txt");
        assert!(store.is_empty());
    }

    #[test]
    fn test_startup_scan_registers_existing_files_once() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("knowledge");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("b.txt"), "b").unwrap();
        std::fs::write(dir.join("a.txt"), "a").unwrap();

        let (count, callback) = counting_callback();
        let store = KnowledgeStore::open(&dir, Some(callback)).unwrap();

        assert_eq!(store.len(), 2);
        // Deterministic ordering by filename
        assert_eq!(store.files()[0].filename, "a.txt");
        assert_eq!(store.files()[1].filename, "b.txt");
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_startup_scan_skips_hidden_files_and_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("knowledge");
        std::fs::create_dir_all(dir.join("subdir")).unwrap();
        std::fs::write(dir.join(".hidden"), "x").unwrap();
        std::fs::write(dir.join("visible.txt"), "x").unwrap();

        let (count, callback) = counting_callback();
        let store = KnowledgeStore::open(&dir, Some(callback)).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.files()[0].filename, "visible.txt");
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_startup_scan_does_not_notify() {
        let tmp = tempfile::tempdir().unwrap();
        let (count, callback) = counting_callback();
        let store = KnowledgeStore::open(tmp.path().join("knowledge"), Some(callback)).unwrap();

        assert!(store.is_empty());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_set_on_change_replaces_callback() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("knowledge");
        let mut store = KnowledgeStore::open(&dir, None).unwrap();
        assert_eq!(store.dir(), dir.as_path());

        let (count, callback) = counting_callback();
        store.set_on_change(callback);

        let source = write_source(tmp.path(), "a.txt", "a");
        store.add(&source).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let tmp = tempfile::tempdir().unwrap();
        let z = write_source(tmp.path(), "z.txt", "z");
        let a = write_source(tmp.path(), "a.txt", "a");

        let mut store = KnowledgeStore::open(tmp.path().join("knowledge"), None).unwrap();
        store.add(&z).unwrap();
        store.add(&a).unwrap();

        let files = store.files();
        assert_eq!(files[0].filename, "z.txt");
        assert_eq!(files[1].filename, "a.txt");
    }
}
