use super::directive::Directive;

/// Anchor value meaning "no anchor": new directives go just before the last line.
pub const END_ANCHOR: usize = 0;

const COMMENT_PREFIX: char = '#';

/// A NAMD configuration file held as an ordered list of raw lines.
///
/// Lines keep their original terminators, so a document that is only read and written
/// back is reproduced byte for byte. Line order matters to NAMD, which applies options
/// sequentially, so edits either replace a line where it stands or insert at an explicit
/// position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    lines: Vec<String>,
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Index of the first line starting with `keyword`, commented out or not.
    pub fn locate(&self, keyword: &str) -> Option<usize> {
        self.lines.iter().position(|line| {
            line.starts_with(keyword)
                || line
                    .strip_prefix(COMMENT_PREFIX)
                    .is_some_and(|rest| rest.starts_with(keyword))
        })
    }

    /// Inserts `text` as a new line at `index` (clamped to the end of the document).
    pub fn insert_line(&mut self, index: usize, text: &str) {
        let index = index.min(self.lines.len());
        self.lines.insert(index, terminated(text));
    }

    /// Replaces the line carrying `directive`'s keyword, or inserts it after `anchor`.
    ///
    /// An existing line (even a commented one) is overwritten in place, which also
    /// uncomments it. Otherwise the directive is inserted at `anchor + 1`; with
    /// [`END_ANCHOR`] it goes just before the document's last line instead.
    ///
    /// Returns the index the directive ended up at.
    pub fn upsert(&mut self, directive: &Directive, anchor: usize) -> usize {
        let line = terminated(&directive.to_string());

        if let Some(index) = self.locate(directive.keyword()) {
            self.lines[index] = line;
            return index;
        }

        let index = if anchor == END_ANCHOR {
            self.lines.len().saturating_sub(1)
        } else {
            (anchor + 1).min(self.lines.len())
        };
        self.lines.insert(index, line);
        index
    }

    /// Comments out the line carrying `keyword`.
    ///
    /// Returns `false` when no such line exists. An already commented line is left as is.
    pub fn comment_out(&mut self, keyword: &str) -> bool {
        let Some(index) = self.locate(keyword) else {
            return false;
        };
        let line = &mut self.lines[index];
        if !line.starts_with(COMMENT_PREFIX) {
            line.insert(0, COMMENT_PREFIX);
        }
        true
    }
}

fn terminated(text: &str) -> String {
    format!("{}\n", text)
}
