use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Pseudo-keyword whose following token is part of the keyword (`set outputname`).
const SET_KEYWORD: &str = "set";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectiveError {
    #[error("Directive is empty")]
    Empty,
}

/// A single `<keyword> <value...>` line of a NAMD configuration file.
///
/// Tcl-style `set <var> <value>` lines are keyed on `set <var>` so that setting one
/// variable never matches another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    keyword: String,
    values: Vec<String>,
}

impl Directive {
    pub fn new(keyword: impl Into<String>, values: impl IntoIterator<Item = impl ToString>) -> Self {
        Self {
            keyword: keyword.into(),
            values: values.into_iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Builds a directive from already split tokens, applying the `set` folding rule.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Self, DirectiveError> {
        let mut tokens = tokens
            .iter()
            .flat_map(|token| token.as_ref().split_whitespace())
            .map(str::to_string);

        let first = tokens.next().ok_or(DirectiveError::Empty)?;
        let keyword = if first.eq_ignore_ascii_case(SET_KEYWORD) {
            match tokens.next() {
                Some(variable) => format!("{} {}", first, variable),
                None => first,
            }
        } else {
            first
        };

        Ok(Self {
            keyword,
            values: tokens.collect(),
        })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn first_value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}

impl FromStr for Directive {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        Self::from_tokens(&tokens)
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.keyword)?;
        for value in &self.values {
            write!(f, " {}", value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_directive_splits_keyword_from_values() {
        let directive: Directive = "cellBasisVector1   48.0  0.0 0.0".parse().unwrap();
        assert_eq!(directive.keyword(), "cellBasisVector1");
        assert_eq!(directive.values(), ["48.0", "0.0", "0.0"]);
        assert_eq!(directive.to_string(), "cellBasisVector1 48.0 0.0 0.0");
    }

    #[test]
    fn set_is_folded_with_its_variable_regardless_of_case() {
        let directive: Directive = "SET temperature 310".parse().unwrap();
        assert_eq!(directive.keyword(), "SET temperature");
        assert_eq!(directive.first_value(), Some("310"));
    }

    #[test]
    fn bare_set_keeps_a_single_token_keyword() {
        let directive: Directive = "set".parse().unwrap();
        assert_eq!(directive.keyword(), "set");
        assert!(directive.values().is_empty());
    }

    #[test]
    fn token_groups_may_contain_embedded_spaces() {
        let directive = Directive::from_tokens(&["set outputname", "md_02"]).unwrap();
        assert_eq!(directive.keyword(), "set outputname");
        assert_eq!(directive.values(), ["md_02"]);
    }

    #[test]
    fn blank_text_is_rejected() {
        assert_eq!("   ".parse::<Directive>(), Err(DirectiveError::Empty));
        assert_eq!(
            Directive::from_tokens::<&str>(&[]),
            Err(DirectiveError::Empty)
        );
    }
}
