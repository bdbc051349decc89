//! Splitting and normalising multi-name text fields.
//!
//! Ingredient and tag inputs may carry several names in one field, separated
//! by `,`, `;`, `:` or a newline. Search queries are tokenised the same way.

use std::collections::HashSet;
use std::fmt;

/// Split free text on the name delimiters, trimming pieces and dropping blanks.
///
/// # Examples
/// ```
/// use recipe_backend::domain::split_terms;
///
/// assert_eq!(split_terms("egg, basil;;\n Salt "), vec!["egg", "basil", "Salt"]);
/// ```
pub fn split_terms(raw: &str) -> Vec<String> {
    raw.split(|c| matches!(c, ',' | ';' | ':' | '\n'))
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Trim and lower-case a single name. Returns `None` when blank.
pub fn normalize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

/// Flatten several multi-name fields into one order-preserving list of
/// normalised names.
pub fn normalize_names<'a, I>(fields: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    fields
        .into_iter()
        .flat_map(split_terms)
        .filter_map(|piece| normalize_name(&piece))
        .collect()
}

/// Which list a set of names came from; used to label duplicate errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameListKind {
    Ingredients,
    Tags,
}

impl NameListKind {
    /// Label used in user-facing messages.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ingredients => "ingredients",
            Self::Tags => "tags",
        }
    }
}

/// A normalised name list contained repeated entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateNamesError {
    kind: NameListKind,
    names: Vec<String>,
}

impl DuplicateNamesError {
    /// List the duplicates came from.
    pub fn kind(&self) -> NameListKind {
        self.kind
    }

    /// Each duplicated name once, in first-repeat order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl fmt::Display for DuplicateNamesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Duplicate {}: {}",
            self.kind.label(),
            self.names.join(", ")
        )
    }
}

impl std::error::Error for DuplicateNamesError {}

/// Names that occur more than once, each reported once in the order their
/// first repeat was seen.
pub fn find_duplicates(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates: Vec<String> = Vec::new();
    for name in names {
        if !seen.insert(name.as_str()) && !duplicates.contains(name) {
            duplicates.push(name.clone());
        }
    }
    duplicates
}

/// Reject a normalised list when any name repeats.
pub fn ensure_unique(names: &[String], kind: NameListKind) -> Result<(), DuplicateNamesError> {
    let duplicates = find_duplicates(names);
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(DuplicateNamesError {
            kind,
            names: duplicates,
        })
    }
}
