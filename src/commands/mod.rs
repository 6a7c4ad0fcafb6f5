/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `chat`      — Interactive chat mode and the one-shot `ask` handler
- `knowledge` — Knowledge base management (add/remove/list)
- `special_commands` — Parser for `/`-prefixed commands inside chat

These handlers are intentionally small and use the library components:
the knowledge store, the session manager, and the provider factory.
*/

pub mod chat;
pub mod knowledge;
pub mod special_commands;
