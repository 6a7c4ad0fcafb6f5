//! Special commands parser for interactive chat mode
//!
//! This module parses special commands entered during an interactive chat
//! session. Special commands let users manage the knowledge base, reset
//! the conversation, and exit, without leaving the chat loop.
//!
//! Commands are prefixed with `/`; the command word is case-insensitive
//! while arguments (paths, filenames) keep their original case.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
///
/// These commands modify the session or the knowledge base rather than
/// being sent to the assistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// List the files currently in the knowledge base
    ListFiles,

    /// Upload a file into the knowledge base
    AddFile(String),

    /// Remove a file from the knowledge base by name
    RemoveFile(String),

    /// Reset the conversation, forcing the knowledge context to be re-sent
    Reset,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent to the assistant as a regular message.
    None,
}

/// Parse a user input string into a special command
///
/// # Arguments
///
/// * `input` - The user input string to parse
///
/// # Returns
///
/// Returns Ok(SpecialCommand) for valid commands or SpecialCommand::None
/// for non-commands.
///
/// # Errors
///
/// Returns CommandError::UnknownCommand if input starts with "/" but is
/// not a valid command, and CommandError::MissingArgument if a command
/// requires an argument that was not provided.
///
/// # Examples
///
/// ```
/// use quotegen::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// let cmd = parse_special_command("/files").unwrap();
/// assert_eq!(cmd, SpecialCommand::ListFiles);
///
/// let cmd = parse_special_command("/add Price List.csv").unwrap();
/// assert_eq!(cmd, SpecialCommand::AddFile("Price List.csv".to_string()));
///
/// let cmd = parse_special_command("price of widget A?").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
/// assert!(parse_special_command("/frobnicate").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    // Split off the command word; arguments keep their original case
    let (word, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word.to_lowercase(), rest.trim()),
        None => (lower.clone(), ""),
    };

    match word.as_str() {
        "/files" | "/kb" => Ok(SpecialCommand::ListFiles),

        "/add" => {
            if arg.is_empty() {
                Err(CommandError::MissingArgument {
                    command: "/add".to_string(),
                    usage: "/add <path>".to_string(),
                })
            } else {
                Ok(SpecialCommand::AddFile(arg.to_string()))
            }
        }

        "/remove" | "/rm" => {
            if arg.is_empty() {
                Err(CommandError::MissingArgument {
                    command: "/remove".to_string(),
                    usage: "/remove <filename>".to_string(),
                })
            } else {
                Ok(SpecialCommand::RemoveFile(arg.to_string()))
            }
        }

        "/reset" => Ok(SpecialCommand::Reset),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/exit" | "/quit" | "exit" | "quit" => Ok(SpecialCommand::Exit),

        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

/// Print help for the special commands
pub fn print_help() {
    println!("Available commands:");
    println!("  /files             List the files in the knowledge base");
    println!("  /add <path>        Upload a file into the knowledge base");
    println!("  /remove <name>     Remove a file from the knowledge base");
    println!("  /reset             Reset the conversation and re-send the knowledge context");
    println!("  /help              Show this help");
    println!("  exit, quit         Leave the chat");
    println!();
    println!("Anything else is sent to the assistant as a message.");
}
