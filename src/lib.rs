//! Quotegen - knowledge-grounded price quote assistant library
//!
//! This library provides the core functionality for the Quotegen
//! assistant: the knowledge store, content extraction, session
//! management, the remote-model provider abstraction, and configuration.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `knowledge`: Knowledge store over a local directory plus content extraction
//! - `session`: Session lifecycle, prompt assembly, and the context-sent flag
//! - `providers`: Remote model abstraction and the Gemini implementation
//! - `commands`: CLI command handlers (chat, ask, knowledge management)
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use quotegen::config::Config;
//! use quotegen::knowledge::KnowledgeStore;
//! use quotegen::providers::create_provider;
//! use quotegen::session::SessionManager;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::default();
//! config.validate()?;
//!
//! let store = KnowledgeStore::open(&config.knowledge.dir, None)?;
//! let provider = create_provider(&config.provider.provider_type, &config.provider)?;
//! let mut session = SessionManager::new(provider);
//!
//! let reply = session.send("price of widget A?", &store.list()).await;
//! println!("{}", reply);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod providers;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use error::{QuotegenError, Result};
pub use knowledge::{KnowledgeFile, KnowledgeStore};
pub use session::SessionManager;
