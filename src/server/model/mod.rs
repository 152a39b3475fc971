//! Server application models and type definitions.
//!
//! Application state shared with HTTP handlers and type aliases for the database
//! entity models.

pub mod app;
pub mod db;
