use super::error::FilterError;
use super::filter_where::FilterWhere;
use super::types::{FieldMatch, SearchColumn, SearchParams, SqlResult};
use crate::database::models::JobPost;

/// Predicate for job post listings: a deletion-state constraint plus optional
/// substring conditions, any one of which is enough for a record to match.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobPostFilter {
    include_deleted: bool,
    any_of: Vec<FieldMatch>,
}

impl JobPostFilter {
    /// Only live records, no search conditions
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble the listing filter from query parameters. `searchTerm` targets the title and
    /// `locationTerm` the location; when both are given either one may match.
    pub fn from_params(params: &SearchParams, max_term_length: usize) -> Result<Self, FilterError> {
        let mut filter = Self::new();
        if let Some(term) = non_blank(params.search_term.as_deref()) {
            filter.matching(SearchColumn::Title, term, max_term_length)?;
        }
        if let Some(term) = non_blank(params.location_term.as_deref()) {
            filter.matching(SearchColumn::LocationTerm, term, max_term_length)?;
        }
        Ok(filter)
    }

    pub fn matching(
        &mut self,
        column: SearchColumn,
        term: &str,
        max_term_length: usize,
    ) -> Result<&mut Self, FilterError> {
        if term.chars().count() > max_term_length {
            return Err(FilterError::TermTooLong { column: column.column_name(), max: max_term_length });
        }
        self.any_of.push(FieldMatch { column, term: term.to_string() });
        Ok(self)
    }

    pub fn include_deleted(&mut self, include: bool) -> &mut Self {
        self.include_deleted = include;
        self
    }

    pub fn conditions(&self) -> &[FieldMatch] {
        &self.any_of
    }

    pub fn to_sql(&self, table_name: &str) -> SqlResult {
        let (where_clause, params) = FilterWhere::generate(&self.any_of, self.include_deleted);
        let query = format!(
            "SELECT * FROM \"{}\" WHERE {} ORDER BY \"created_at\" ASC, \"id\" ASC",
            table_name, where_clause
        );
        SqlResult { query, params }
    }

    /// Same predicate as `to_sql`, evaluated against an in-memory record
    pub fn matches(&self, post: &JobPost) -> bool {
        if post.is_deleted && !self.include_deleted {
            return false;
        }
        if self.any_of.is_empty() {
            return true;
        }
        self.any_of.iter().any(|m| {
            m.column
                .value(post)
                .map(|value| value.to_lowercase().contains(&m.term.to_lowercase()))
                .unwrap_or(false)
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
