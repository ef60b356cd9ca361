use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("Search term for '{column}' exceeds {max} characters")]
    TermTooLong { column: &'static str, max: usize },
}
