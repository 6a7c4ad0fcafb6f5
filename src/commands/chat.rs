//! Interactive chat mode and one-shot ask handlers
//!
//! Instantiates the provider, the knowledge store, and a session manager,
//! then runs a readline-based loop that submits user input to the
//! assistant. Knowledge-set changes fire the store's notification, which
//! the loop turns into a session reset before the next turn goes out.
//! The loop is strictly sequential, so only one remote call is ever in
//! flight (the cooperative single-flight the session layer expects).

use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
use crate::config::Config;
use crate::error::Result;
use crate::knowledge::{AddOutcome, KnowledgeStore};
use crate::providers::create_provider;
use crate::session::SessionManager;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Start interactive chat mode
///
/// # Arguments
///
/// * `config` - Global configuration (consumed)
/// * `provider_name` - Optional override for the configured provider
///
/// # Errors
///
/// Returns error if the provider cannot be created (including missing
/// credentials) or the knowledge store cannot be opened
pub async fn run_chat(config: Config, provider_name: Option<String>) -> Result<()> {
    let provider_type = provider_name
        .as_deref()
        .unwrap_or(&config.provider.provider_type);
    let provider = create_provider(provider_type, &config.provider)?;

    // The store signals every change of the knowledge set; the loop
    // below turns the signal into a session reset.
    let kb_changed = Arc::new(AtomicBool::new(false));
    let flag = kb_changed.clone();
    let mut store = KnowledgeStore::open(
        &config.knowledge.dir,
        Some(Box::new(move || {
            flag.store(true, Ordering::SeqCst);
        })),
    )?;
    // The startup scan is not a change relative to this brand-new session.
    kb_changed.store(false, Ordering::SeqCst);

    let mut session = SessionManager::new(provider);
    let mut rl = DefaultEditor::new()?;

    print_welcome_banner(&session, &store);

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let input = line.trim().to_string();
                if input.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&input);

                match parse_special_command(&input) {
                    Ok(SpecialCommand::Exit) => break,
                    Ok(SpecialCommand::Help) => print_help(),
                    Ok(SpecialCommand::ListFiles) => print_files(&store),
                    Ok(SpecialCommand::AddFile(path)) => {
                        match store.add(Path::new(&path)) {
                            Ok(AddOutcome::Added(file)) => {
                                println!("Added {}", file.filename)
                            }
                            Ok(AddOutcome::AlreadyTracked) => {
                                println!("Already in the knowledge base, skipped")
                            }
                            Err(e) => println!("{} {}", "Could not add file:".red(), e),
                        }
                    }
                    Ok(SpecialCommand::RemoveFile(name)) => {
                        store.remove(&name);
                        println!("Removed {} (if it was tracked)", name);
                    }
                    Ok(SpecialCommand::Reset) => {
                        kb_changed.store(false, Ordering::SeqCst);
                        session.reset();
                        print_system_notice("The conversation has been reset.");
                    }
                    Ok(SpecialCommand::None) => {
                        let reply = session.send(&input, &store.list()).await;
                        print_reply(&reply, config.chat.show_timestamps);
                    }
                    Err(e) => println!("{}", e),
                }

                // A knowledge change made through /add or /remove resets
                // the session right away, before the next message.
                apply_pending_reset(&kb_changed, &mut session);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Ask a single question and print the reply
///
/// Loads the knowledge base, sends one turn (with the knowledge context,
/// since the session is fresh), and prints the assistant's reply.
///
/// # Arguments
///
/// * `config` - Global configuration
/// * `prompt` - The question to send
pub async fn run_ask(config: Config, prompt: &str) -> Result<()> {
    let provider = create_provider(&config.provider.provider_type, &config.provider)?;
    let store = KnowledgeStore::open(&config.knowledge.dir, None)?;
    let mut session = SessionManager::new(provider);

    let reply = session.send(prompt, &store.list()).await;
    println!("{}", reply);
    Ok(())
}

/// Consume a pending knowledge-change notification, resetting the session
fn apply_pending_reset(kb_changed: &AtomicBool, session: &mut SessionManager) {
    if kb_changed.swap(false, Ordering::SeqCst) {
        session.reset();
        print_system_notice(
            "The knowledge base has changed. The conversation was reset to pick up the new documents.",
        );
    }
}

fn print_welcome_banner(session: &SessionManager, store: &KnowledgeStore) {
    println!("{}", "Quotegen - price quote assistant".bold());
    println!(
        "Provider: {} ({})",
        session.provider_name(),
        session.provider_model()
    );
    println!("Knowledge files loaded: {}", store.len());
    println!("Type /help for commands, exit to quit.");
    println!();
}

fn print_files(store: &KnowledgeStore) {
    if store.is_empty() {
        println!("No knowledge files. Upload one with /add <path>.");
        return;
    }
    for file in store.files() {
        println!("  {}  ({})", file.filename, file.stored_path.display());
    }
}

fn print_reply(reply: &str, show_timestamp: bool) {
    println!();
    if show_timestamp {
        let now = chrono::Local::now().format("%H:%M");
        println!("{} {}", "Assistant".green().bold(), format!("[{}]:", now).green());
    } else {
        println!("{}", "Assistant:".green().bold());
    }
    println!("{}", reply);
    println!();
}

fn print_system_notice(notice: &str) {
    println!("{} {}", "System:".yellow().bold(), notice.yellow());
}
