//! Line-oriented model of NAMD configuration files.
//!
//! Only as much of the configuration language is understood as the restart needs:
//! a directive is recognised by the prefix of its line, and Tcl `set` variables are
//! keyed together with their name.

pub mod directive;
pub mod document;

pub use directive::{Directive, DirectiveError};
pub use document::{ConfigDocument, END_ANCHOR};
