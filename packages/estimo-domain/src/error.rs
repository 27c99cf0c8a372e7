pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("Unknown category type {value:?}; expected material or work.")]
	InvalidCategoryType { value: String },
	#[error("tenant_id is required for tenant-scoped categories.")]
	MissingTenant,
	#[error("Invalid level: {message}")]
	InvalidLevel { message: String },
}
impl Error {
	/// Request field the error refers to.
	pub fn field(&self) -> &'static str {
		match self {
			Self::InvalidCategoryType { .. } => "type",
			Self::MissingTenant => "tenant_id",
			Self::InvalidLevel { .. } => "levels",
		}
	}
}
