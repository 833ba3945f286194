//! # Workflows Module
//!
//! High-level entry points tying [`core`](crate::core) and [`engine`](crate::engine)
//! together.
//!
//! - **Restart preparation** ([`prepare`]) - from a previous run folder to a ready-to-run
//!   configuration file in the restart folder.

pub mod prepare;
