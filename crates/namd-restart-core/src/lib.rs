//! # namdrestart
//!
//! Resumes interrupted NAMD molecular-dynamics runs from their most recent valid
//! checkpoint.
//!
//! Given the folder of a previous run, the library picks a complete, non-empty
//! generation of restart files (current, `.old` or `.bak`), reads the step they were
//! written at, and rewrites the run's configuration file so that NAMD picks up from
//! there for the remaining number of steps.
//!
//! - **[`core`]** - restart file model and resolution, configuration documents, file formats.
//! - **[`engine`]** - the configuration rewriter, the event [`Reporter`](engine::report::Reporter)
//!   and the error type.
//! - **[`workflows`]** - the end-to-end restart preparation.

pub mod core;
pub mod engine;
pub mod workflows;
