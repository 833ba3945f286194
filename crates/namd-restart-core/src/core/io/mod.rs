//! Reading and writing the text files a restart touches.
//!
//! The extended-system (`.xsc`) checkpoint is only ever read, for the step it was
//! written at. Configuration (`.conf`) files are read into a [`ConfigDocument`] and
//! written back out verbatim.
//!
//! [`ConfigDocument`]: crate::core::config::ConfigDocument

pub mod conf;
pub mod traits;
pub mod xsc;
