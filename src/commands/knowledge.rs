//! Knowledge base management command handlers
//!
//! These handlers operate on the knowledge store directly, without a
//! provider or session: uploading, removing, and listing documents works
//! offline and without credentials.

use crate::config::Config;
use crate::error::Result;
use crate::knowledge::{AddOutcome, KnowledgeStore};
use std::path::PathBuf;

/// Upload one or more files into the knowledge base
///
/// Each path is copied under its base filename; a name that is already
/// tracked is skipped without error.
///
/// # Arguments
///
/// * `config` - Global configuration
/// * `paths` - Files to upload
pub fn run_add(config: &Config, paths: &[PathBuf]) -> Result<()> {
    let mut store = KnowledgeStore::open(&config.knowledge.dir, None)?;
    for path in paths {
        match store.add(path)? {
            AddOutcome::Added(file) => println!("Added {}", file.filename),
            AddOutcome::AlreadyTracked => {
                println!(
                    "Skipped {} (already in the knowledge base)",
                    path.file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| path.display().to_string())
                )
            }
        }
    }
    Ok(())
}

/// Remove a document from the knowledge base by name
///
/// # Arguments
///
/// * `config` - Global configuration
/// * `name` - Base filename of the document to remove
pub fn run_remove(config: &Config, name: &str) -> Result<()> {
    let mut store = KnowledgeStore::open(&config.knowledge.dir, None)?;
    if store.contains(name) {
        store.remove(name);
        println!("Removed {}", name);
    } else {
        println!("{} is not in the knowledge base", name);
    }
    Ok(())
}

/// List the documents currently in the knowledge base
///
/// # Arguments
///
/// * `config` - Global configuration
pub fn run_list(config: &Config) -> Result<()> {
    let store = KnowledgeStore::open(&config.knowledge.dir, None)?;
    if store.is_empty() {
        println!("No knowledge files");
        return Ok(());
    }
    for file in store.files() {
        println!("{}  ({})", file.filename, file.stored_path.display());
    }
    Ok(())
}
