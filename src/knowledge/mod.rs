//! Knowledge base module for Quotegen
//!
//! The knowledge base is the set of reference documents the assistant is
//! allowed to quote from. [`store`] tracks the documents on disk and
//! [`extract`] turns them into plain text for prompt assembly.

pub mod extract;
pub mod store;

pub use extract::extract_content;
pub use store::{AddOutcome, KnowledgeFile, KnowledgeStore};
