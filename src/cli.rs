//! Command-line interface definition for Quotegen
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, one-shot questions, and
//! knowledge base management.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Quotegen - knowledge-grounded price quote assistant
///
/// Chat with an AI assistant that drafts price quotes based exclusively
/// on the reference documents you upload to its knowledge base.
#[derive(Parser, Debug, Clone)]
#[command(name = "quotegen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the knowledge store directory from config
    #[arg(long, env = "QUOTEGEN_KNOWLEDGE_DIR")]
    pub knowledge_dir: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Quotegen
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session with the assistant
    Chat {
        /// Override the provider from config (gemini)
        #[arg(short, long)]
        provider: Option<String>,
    },

    /// Ask a single question and print the reply
    Ask {
        /// The question to send to the assistant
        prompt: String,
    },

    /// Manage the knowledge base of reference documents
    Knowledge {
        /// Knowledge management subcommand
        #[command(subcommand)]
        command: KnowledgeCommand,
    },
}

/// Knowledge base management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum KnowledgeCommand {
    /// Copy one or more files into the knowledge base
    Add {
        /// Paths of the files to upload
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Remove a file from the knowledge base by name
    Remove {
        /// Filename of the stored document to remove
        name: String,
    },

    /// List the files currently in the knowledge base
    List,
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
