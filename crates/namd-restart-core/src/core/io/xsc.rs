use super::traits::InputFile;
use std::io::{self, BufRead};
use std::path::Path;
use thiserror::Error;

/// Zero-based line holding the step record in an extended-system file.
const STEP_LINE: usize = 2;

#[derive(Debug, Error)]
pub enum XscError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Extended-system file has {lines} line(s), expected at least {}", STEP_LINE + 1)]
    TooShort { lines: usize },
    #[error("Invalid step '{value}' on line {}", STEP_LINE + 1)]
    InvalidStep { value: String },
}

/// NAMD extended-system checkpoint (`.restart.xsc`).
///
/// The file carries two header lines followed by a record whose first column is the
/// step the checkpoint was written at:
///
/// ```text
/// # NAMD extended system configuration restart file
/// #$LABELS step a_x a_y a_z b_x ...
/// 50000 48.2 0 0 0 ...
/// ```
pub struct XscFile;

impl InputFile for XscFile {
    type Content = u64;
    type Error = XscError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Content, Self::Error> {
        let mut lines = 0;
        for line in reader.lines() {
            let line = line?;
            if lines == STEP_LINE {
                let value = line.split_whitespace().next().unwrap_or_default();
                return value.parse().map_err(|_| XscError::InvalidStep {
                    value: value.to_string(),
                });
            }
            lines += 1;
        }
        Err(XscError::TooShort { lines })
    }
}

/// Reads the last completed step from an extended-system checkpoint.
///
/// # Errors
///
/// Fails if the file cannot be read, has fewer than three lines, or its third line does
/// not start with a non-negative integer.
pub fn read_last_step(xsc_path: &Path) -> Result<u64, XscError> {
    XscFile::read_from_path(xsc_path)
}
