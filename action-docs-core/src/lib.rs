#![doc = "action-docs-core: core logic library for action-docs."]

//! This crate contains the domain logic for action-docs: loading an action
//! metadata file, rendering it to Markdown, patching the rendered text into a
//! marked region of a document and publishing the result.
//!
//! # Usage
//! The CLI crate builds a [`generate::Collaborators`] from real implementations
//! and calls [`generate::run`]. Tests substitute the mocks exported from
//! [`contract`].

pub mod config;
pub mod contract;
pub mod error;
pub mod generate;
pub mod markers;
pub mod metadata;
pub mod publish;
pub mod render;

pub use error::{DocError, DocResult, ExitCode};
