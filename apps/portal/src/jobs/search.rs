use serde::{Deserialize, Serialize};

/// Query string of the public job list: `?query=...&category=...`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchParams {
    pub query: Option<String>,
    pub category: Option<String>,
}

/// A normalized search: blank parameters are dropped, the text query becomes an `ILIKE` pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobSearch {
    /// Case-insensitive substring pattern applied to title, description and skills.
    pub pattern: Option<String>,
    /// Exact category value.
    pub category: Option<String>,
}

impl SearchParams {
    pub fn to_search(&self) -> JobSearch {
        let query = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty());
        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        JobSearch {
            pattern: query.map(like_pattern),
            category: category.map(str::to_string),
        }
    }
}

/// Builds a `%...%` pattern matching `query` literally, escaping LIKE wildcards.
pub fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
