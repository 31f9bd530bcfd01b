//! # Userdir Architecture
//!
//! Userdir is a **UI-agnostic user directory library**. It keeps a local
//! collection of users, reconciles it with a read-only remote user API, and
//! persists it between sessions. The `userdir` binary is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs) → Command Layer (commands/*.rs)         │
//! │  - Form validation, queries, user-facing messages           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  User Store (directory.rs)                                  │
//! │  - Owns the collection, mutations, refresh + merge          │
//! └─────────────────────────────────────────────────────────────┘
//!                 │                              │
//!                 ▼                              ▼
//! ┌───────────────────────────────┐ ┌───────────────────────────┐
//! │  Persistence (persistence.rs) │ │  Remote Fetcher (remote.rs)│
//! │  over BlobStore (store/)      │ │  UserSource over reqwest   │
//! └───────────────────────────────┘ └───────────────────────────┘
//! ```
//!
//! ## Failure Model
//!
//! Only a refresh can fail observably, and it does so through the store's
//! `status`/`last_error` as well as its return value. Persistence faults are
//! logged and swallowed; the in-memory collection stays authoritative.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: One module per user-facing operation
//! - [`directory`]: The user store and merge logic
//! - [`persistence`]: Snapshot load/save of the collection
//! - [`remote`]: Remote user API port and HTTP adapter
//! - [`store`]: Key-value blob storage backends
//! - [`query`]: Search and sort over the collection
//! - [`validate`]: Advisory form checks
//! - [`model`]: Core data types (`User`, `NewUser`, `UserPatch`)
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod directory;
pub mod error;
pub mod model;
pub mod persistence;
pub mod query;
pub mod remote;
pub mod store;
pub mod validate;
