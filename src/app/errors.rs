#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("bookmark not found")]
    NotFound,

    #[error("bookmark looks like a duplicate of {matched_id:?} (similarity {similarity:.3})")]
    Duplicate {
        matched_id: Option<u64>,
        similarity: f64,
    },

    #[error("unexpected error: {0:?}")]
    Other(#[from] anyhow::Error),
}
