use clique_domain::quest_gate::RejectCode;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{}: {}", .code.as_str(), .code.message())]
	Rejected { code: RejectCode },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Unauthorized: {message}")]
	Unauthorized { message: String },
	#[error("Forbidden: {message}")]
	Forbidden { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<clique_storage::Error> for Error {
	fn from(err: clique_storage::Error) -> Self {
		match err {
			clique_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			clique_storage::Error::InvalidRow(message) => Self::Storage { message },
			clique_storage::Error::NotFound(message) => Self::NotFound { message },
			err @ clique_storage::Error::DuplicateSlug(_) =>
				Self::Conflict { message: err.to_string() },
		}
	}
}

impl From<clique_domain::session::SessionError> for Error {
	fn from(err: clique_domain::session::SessionError) -> Self {
		Self::Unauthorized { message: err.to_string() }
	}
}

impl From<RejectCode> for Error {
	fn from(code: RejectCode) -> Self {
		Self::Rejected { code }
	}
}
