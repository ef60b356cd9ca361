use serde::{Deserialize, Serialize};

use crate::database::models::JobPost;

/// Columns a caller may run a substring search against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchColumn {
    Title,
    LocationTerm,
}

impl SearchColumn {
    pub fn column_name(&self) -> &'static str {
        match self {
            SearchColumn::Title => "title",
            SearchColumn::LocationTerm => "location_term",
        }
    }

    pub fn value<'a>(&self, post: &'a JobPost) -> Option<&'a str> {
        match self {
            SearchColumn::Title => Some(post.title.as_str()),
            SearchColumn::LocationTerm => post.location_term.as_deref(),
        }
    }
}

/// Case-insensitive substring condition on a single column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMatch {
    pub column: SearchColumn,
    pub term: String,
}

/// Raw query parameters accepted by the listing endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub search_term: Option<String>,
    pub location_term: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<String>,
}
