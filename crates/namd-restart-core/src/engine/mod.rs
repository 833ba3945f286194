//! # Engine Module
//!
//! The stateful part of a restart: the [`rewriter`] that edits a loaded configuration
//! document, the [`report`] port every step speaks through, and the [`error`] type the
//! [`workflows`](crate::workflows) surface to callers.

pub mod error;
pub mod report;
pub mod rewriter;
