//! In-memory CRM record keeper.
//!
//! Customer records, engagement scoring, segmentation, follow-up reminders
//! and rankings, served over HTTP or driven from the console demo.
//!
//! # Modules
//!
//! - `api`: HTTP router and middleware.
//! - `core`: Records, registry and errors, re-exported for front-ends.
//! - `clock`: Time source used for every timestamp.
//! - `commands`: Input coercion and status messages shared by front-ends.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Customer records, snapshots and segments.
//! - `registry`: The keyed customer collection.

pub mod api;
pub mod core;

pub mod clock;
pub mod commands;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod registry;
