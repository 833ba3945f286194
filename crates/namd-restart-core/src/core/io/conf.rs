use super::traits::{InputFile, OutputFile};
use crate::core::config::ConfigDocument;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Configuration file is empty")]
    Empty,
}

/// NAMD configuration (`.conf`) file, read and written line for line.
pub struct ConfFile;

impl InputFile for ConfFile {
    type Content = ConfigDocument;
    type Error = ConfError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Content, Self::Error> {
        let mut lines = Vec::new();
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            lines.push(line);
        }

        if lines.is_empty() {
            return Err(ConfError::Empty);
        }
        Ok(ConfigDocument::from_lines(lines))
    }
}

impl OutputFile for ConfFile {
    fn write_to(content: &Self::Content, writer: &mut impl Write) -> Result<(), Self::Error> {
        for line in content.lines() {
            writer.write_all(line.as_bytes())?;
        }
        Ok(())
    }
}
