#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Stored row is invalid: {0}")]
	InvalidRow(String),
	#[error("Not found: {0}")]
	NotFound(String),
	#[error("Slug {0:?} is already taken.")]
	DuplicateSlug(String),
}
