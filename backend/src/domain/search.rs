//! Scope-qualified multi-term recipe search.
//!
//! The query is tokenised with the same delimiters as name fields. Every term
//! must match (logical AND) somewhere inside the chosen scope; matching is a
//! case-insensitive substring test.

use std::fmt;
use std::str::FromStr;

use super::names::split_terms;

/// Fields a search term is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    /// Title, description, ingredient names or tag names.
    #[default]
    All,
    /// Title or description.
    Name,
    /// Any associated ingredient name.
    Ingredients,
    /// Any associated tag name.
    Tags,
}

impl SearchScope {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Name => "name",
            Self::Ingredients => "ingredients",
            Self::Tags => "tags",
        }
    }
}

/// Scope value outside the accepted set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidScopeError;

impl fmt::Display for InvalidScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Invalid scope")
    }
}

impl std::error::Error for InvalidScopeError {}

impl FromStr for SearchScope {
    type Err = InvalidScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "name" => Ok(Self::Name),
            "ingredients" => Ok(Self::Ingredients),
            "tags" => Ok(Self::Tags),
            _ => Err(InvalidScopeError),
        }
    }
}

/// Parsed search request. No terms means an unfiltered listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipeSearch {
    terms: Vec<String>,
    scope: SearchScope,
}

impl RecipeSearch {
    /// Unfiltered listing.
    pub fn all() -> Self {
        Self::default()
    }

    /// Parse raw query parameters.
    ///
    /// A missing or blank query yields the unfiltered listing without
    /// looking at `scope`; otherwise an unknown scope is rejected.
    ///
    /// # Examples
    /// ```
    /// use recipe_backend::domain::{RecipeSearch, SearchScope};
    ///
    /// let search = RecipeSearch::parse(Some("egg, basil"), Some(" ALL ")).unwrap();
    /// assert_eq!(search.terms(), ["egg", "basil"]);
    /// assert_eq!(search.scope(), SearchScope::All);
    /// assert!(RecipeSearch::parse(Some("  "), Some("bogus")).unwrap().is_unfiltered());
    /// ```
    pub fn parse(query: Option<&str>, scope: Option<&str>) -> Result<Self, InvalidScopeError> {
        let Some(query) = query.filter(|q| !q.trim().is_empty()) else {
            return Ok(Self::all());
        };
        let scope = match scope {
            Some(raw) => raw.parse()?,
            None => SearchScope::All,
        };
        let terms = split_terms(query)
            .into_iter()
            .map(|term| term.to_lowercase())
            .collect();
        Ok(Self { terms, scope })
    }

    /// Lower-cased search terms.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn scope(&self) -> SearchScope {
        self.scope
    }

    pub fn is_unfiltered(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluate the search against an in-memory recipe projection.
    pub fn matches(&self, candidate: &SearchCandidate<'_>) -> bool {
        self.terms
            .iter()
            .all(|term| candidate.matches_term(term, self.scope))
    }
}

/// Searchable text of one recipe.
#[derive(Debug, Clone, Copy)]
pub struct SearchCandidate<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub ingredient_names: &'a [String],
    pub tag_names: &'a [String],
}

impl SearchCandidate<'_> {
    fn matches_term(&self, term: &str, scope: SearchScope) -> bool {
        let contains = |text: &str| text.to_lowercase().contains(term);
        let by_name = || contains(self.title) || self.description.is_some_and(contains);
        let by_ingredient = || self.ingredient_names.iter().any(|name| contains(name));
        let by_tag = || self.tag_names.iter().any(|name| contains(name));
        match scope {
            SearchScope::Name => by_name(),
            SearchScope::Ingredients => by_ingredient(),
            SearchScope::Tags => by_tag(),
            SearchScope::All => by_name() || by_ingredient() || by_tag(),
        }
    }
}
