//! Prompt assembly for the quote assistant
//!
//! The instruction template and the helpers that combine knowledge file
//! contents with the customer's question into the first-turn prompt.

use crate::knowledge::extract_content;
use std::path::PathBuf;

/// Instruction template sent on the first turn of a session
///
/// `{knowledge_base}` is replaced with the concatenated contents of all
/// knowledge files.
pub const INSTRUCTION_TEMPLATE: &str = r#"You are a virtual assistant specialized in preparing price quotes for a company that installs electrical, heating and plumbing systems.
Your job is to answer the customer's questions and draft quotes based EXCLUSIVELY on the documentation provided.
The documentation consists of text files describing the services on offer and CSV files with price lists.

IMPORTANT RULES:
1. Give detailed and precise answers.
2. When you draft a quote, clearly itemize every line with its details, the individual prices and the total. Use a readable, well organized format.
3. If you are asked for a discount, apply only those mentioned in the documentation (for example early payment).
4. If a question concerns a product, service or piece of information NOT directly present in the documentation, but you can offer related information or available options from the documentation to help the customer narrow down the request, do so. Otherwise reply with: "I'm sorry, but I do not have enough information in my knowledge base to answer this question."
5. Never invent information, prices or services. Stick strictly to the data provided.

Here is the knowledge base you must use:
--- BEGIN DOCUMENTATION ---
{knowledge_base}
--- END DOCUMENTATION ---"#;

/// Build the composite first-turn prompt
///
/// # Arguments
///
/// * `knowledge` - Concatenated knowledge file contents
/// * `question` - The customer's question for this turn
///
/// # Examples
///
/// ```
/// use quotegen::session::prompt::build_context_prompt;
///
/// let prompt = build_context_prompt("Widget A: 10 EUR", "price of widget A?");
/// assert!(prompt.contains("Widget A: 10 EUR"));
/// assert!(prompt.ends_with("CUSTOMER: price of widget A?"));
/// ```
pub fn build_context_prompt(knowledge: &str, question: &str) -> String {
    let instructions = INSTRUCTION_TEMPLATE.replace("{knowledge_base}", knowledge);
    format!("{}\n\nCUSTOMER: {}", instructions, question)
}

/// Gather the combined content of all knowledge files
///
/// Contents are concatenated in store order, separated by blank lines.
/// Files whose extraction yields nothing are skipped; extraction failures
/// have already been logged and reduced to empty strings.
pub fn gather_knowledge(paths: &[PathBuf]) -> String {
    let mut combined = String::new();
    for path in paths {
        let content = extract_content(path);
        if !content.is_empty() {
            combined.push_str(&content);
            combined.push_str("\n\n");
        }
    }
    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_has_knowledge_placeholder() {
        assert!(INSTRUCTION_TEMPLATE.contains("{knowledge_base}"));
        assert!(INSTRUCTION_TEMPLATE.contains("--- BEGIN DOCUMENTATION ---"));
        assert!(INSTRUCTION_TEMPLATE.contains("--- END DOCUMENTATION ---"));
    }

    #[test]
    fn test_build_context_prompt_substitutes_and_appends() {
        let prompt = build_context_prompt("Widget A: 10 EUR", "price of widget A?");
        assert!(!prompt.contains("{knowledge_base}"));
        assert!(prompt.contains("--- BEGIN DOCUMENTATION ---\nWidget A: 10 EUR\n--- END DOCUMENTATION ---"));
        assert!(prompt.ends_with("CUSTOMER: price of widget A?"));
    }

    #[test]
    fn test_gather_knowledge_concatenates_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.txt");
        let second = dir.path().join("b.txt");
        std::fs::write(&first, "Widget A: 10 EUR").unwrap();
        std::fs::write(&second, "Widget B: 20 EUR").unwrap();

        let combined = gather_knowledge(&[first, second]);
        assert_eq!(combined, "Widget A: 10 EUR\n\nWidget B: 20 EUR\n\n");
    }

    #[test]
    fn test_gather_knowledge_skips_empty_contributions() {
        let dir = tempfile::tempdir().unwrap();
        let readable = dir.path().join("a.txt");
        std::fs::write(&readable, "Widget A: 10 EUR").unwrap();
        let missing = dir.path().join("gone.txt");

        let combined = gather_knowledge(&[missing, readable]);
        assert_eq!(combined, "Widget A: 10 EUR\n\n");
    }

    #[test]
    fn test_gather_knowledge_empty_set() {
        assert_eq!(gather_knowledge(&[]), "");
    }
}
