//! # Core Module
//!
//! Stateless building blocks of a restart.
//!
//! - **Checkpoints** ([`checkpoint`]) - the restart file model, generation resolution and backups
//! - **Configuration** ([`config`]) - line-based NAMD configuration documents and directives
//! - **File I/O** ([`io`]) - extended-system and configuration file readers/writers

pub mod checkpoint;
pub mod config;
pub mod io;
