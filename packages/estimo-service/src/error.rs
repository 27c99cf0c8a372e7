pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Invalid {field}: {message}")]
	InvalidField { field: String, message: String },
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

impl From<estimo_storage::Error> for Error {
	fn from(err: estimo_storage::Error) -> Self {
		match err {
			estimo_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			estimo_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			estimo_storage::Error::NotFound(message) => Self::NotFound { message },
			estimo_storage::Error::Conflict(message) => Self::Conflict { message },
		}
	}
}

impl From<estimo_domain::Error> for Error {
	fn from(err: estimo_domain::Error) -> Self {
		Self::InvalidField { field: err.field().to_string(), message: err.to_string() }
	}
}
