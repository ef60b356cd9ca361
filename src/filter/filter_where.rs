use super::types::FieldMatch;

/// Builds the WHERE clause for job post listings with numbered bind parameters
pub struct FilterWhere {
    param_values: Vec<String>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Deletion constraint ANDed with the OR of all substring matches
    pub fn generate(any_of: &[FieldMatch], include_deleted: bool) -> (String, Vec<String>) {
        let mut filter_where = Self::new(0);
        filter_where.build(any_of, include_deleted)
    }

    fn build(&mut self, any_of: &[FieldMatch], include_deleted: bool) -> (String, Vec<String>) {
        let mut sql_conditions = vec![];
        if !include_deleted {
            sql_conditions.push("\"is_deleted\" = FALSE".to_string());
        }

        let alternatives: Vec<String> = any_of
            .iter()
            .map(|m| {
                let placeholder = self.param(escape_like(&m.term));
                format!("\"{}\" ILIKE '%' || {} || '%' ESCAPE '\\'", m.column.column_name(), placeholder)
            })
            .collect();
        if !alternatives.is_empty() {
            sql_conditions.push(format!("({})", alternatives.join(" OR ")));
        }

        let where_clause = if sql_conditions.is_empty() { "1=1".to_string() } else { sql_conditions.join(" AND ") };
        (where_clause, self.param_values.clone())
    }

    fn param(&mut self, value: String) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

/// Terms match literally, so LIKE wildcards in user input are escaped
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::types::SearchColumn;

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(escape_like("100%_done\\"), "100\\%\\_done\\\\");
        assert_eq!(escape_like("rust"), "rust");
    }

    #[test]
    fn numbers_params_in_order() {
        let matches = vec![
            FieldMatch { column: SearchColumn::Title, term: "dev".to_string() },
            FieldMatch { column: SearchColumn::LocationTerm, term: "lima".to_string() },
        ];
        let (sql, params) = FilterWhere::generate(&matches, false);
        assert_eq!(
            sql,
            "\"is_deleted\" = FALSE AND (\"title\" ILIKE '%' || $1 || '%' ESCAPE '\\' OR \"location_term\" ILIKE '%' || $2 || '%' ESCAPE '\\')"
        );
        assert_eq!(params, vec!["dev".to_string(), "lima".to_string()]);
    }

    #[test]
    fn empty_filter_including_deleted_matches_everything() {
        let (sql, params) = FilterWhere::generate(&[], true);
        assert_eq!(sql, "1=1");
        assert!(params.is_empty());
    }
}
