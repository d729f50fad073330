//! Trello board importer for the Vectors task database.
//!
//! This library exports the import pipeline and its collaborators for
//! embedding in the host application; the `trello-import` binary is a
//! thin CLI over the same surface.

pub mod cli;
pub mod config;
pub mod error;
pub mod import;
pub mod store;
pub mod trello;
pub mod types;
