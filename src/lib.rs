//! Per-user memory log for AI agents, served over MCP.
//!
//! Each user owns one ordered list of free-text memory items, stored as a JSON array in
//! a document store under a key derived from the user's identity. Agents append with
//! `remember`, drop an item by position with `forget`, and read the whole list with
//! `recall`.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`db`]: SQLite database initialization and schema
//! - [`identity`]: Caller identity resolution and storage key derivation
//! - [`memory`]: The per-user memory list: append, remove-at-index, recall
//! - [`store`]: Backing JSON document store trait and its backends

pub mod config;
pub mod db;
pub mod identity;
pub mod memory;
pub mod store;
