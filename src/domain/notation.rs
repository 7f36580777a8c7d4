//! Textual notation for composite results.
//!
//! A leaf renders as its label, a container as
//! `<branch><open><child><separator><child>...<close>`.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, TreeResult};

/// Labels and punctuation used to render (and parse) a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notation {
    /// Result of a leaf
    pub leaf: String,
    /// Prefix marking a composite result
    pub branch: String,
    /// Opening bracket after the branch label
    pub open: String,
    /// Closing bracket
    pub close: String,
    /// Placed between sibling results
    pub separator: String,
}

impl Default for Notation {
    fn default() -> Self {
        Self {
            leaf: "Leaf".into(),
            branch: "Branch".into(),
            open: "(".into(),
            close: ")".into(),
            separator: " ".into(),
        }
    }
}

impl Notation {
    /// Wrap already rendered child results into a composite result.
    pub fn composite<I, S>(&self, parts: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let inner = parts
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .join(&self.separator);
        format!("{}{}{}{}", self.branch, self.open, inner, self.close)
    }

    /// Checks that the notation can be parsed back unambiguously.
    pub fn validate(&self) -> TreeResult<()> {
        let required = [
            ("leaf", &self.leaf),
            ("branch", &self.branch),
            ("open", &self.open),
            ("close", &self.close),
        ];
        if let Some((name, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(DomainError::InvalidNotation(format!(
                "{} must not be empty",
                name
            )));
        }
        if self.leaf == self.branch {
            return Err(DomainError::InvalidNotation(format!(
                "leaf and branch labels are both '{}'",
                self.leaf
            )));
        }
        let sep = self.separator.trim();
        if !sep.is_empty() {
            let tokens = [
                ("leaf", &self.leaf),
                ("branch", &self.branch),
                ("open", &self.open),
                ("close", &self.close),
            ];
            let overlap = tokens.iter().find(|(_, t)| sep.contains(t.trim()));
            if let Some((name, token)) = overlap {
                return Err(DomainError::InvalidNotation(format!(
                    "separator '{}' contains {} '{}'",
                    sep, name, token
                )));
            }
        }
        Ok(())
    }
}
