use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Scope key stored on global rows. Must match the generated column in `catalog_categories`.
pub const GLOBAL_SCOPE_KEY: &str = "__global__";
const TENANT_SCOPE_KEY_PREFIX: &str = "tenant:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryType {
	Material,
	Work,
}
impl CategoryType {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Material => "material",
			Self::Work => "work",
		}
	}
}
impl FromStr for CategoryType {
	type Err = Error;

	fn from_str(value: &str) -> Result<Self> {
		match value.trim() {
			"material" => Ok(Self::Material),
			"work" => Ok(Self::Work),
			other => Err(Error::InvalidCategoryType { value: other.to_string() }),
		}
	}
}
impl fmt::Display for CategoryType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Ownership of a category row: shared by every tenant, or private to one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
	Global,
	Tenant(String),
}
impl Scope {
	pub fn tenant(tenant_id: &str) -> Result<Self> {
		let tenant_id = tenant_id.trim();

		if tenant_id.is_empty() {
			return Err(Error::MissingTenant);
		}

		Ok(Self::Tenant(tenant_id.to_string()))
	}

	/// Builds a scope from the `is_global` flag and optional tenant carried by requests.
	///
	/// A global request ignores the tenant; a tenant request without one is rejected.
	pub fn from_request(is_global: bool, tenant_id: Option<&str>) -> Result<Self> {
		if is_global {
			return Ok(Self::Global);
		}

		Self::tenant(tenant_id.unwrap_or_default())
	}

	pub fn is_global(&self) -> bool {
		matches!(self, Self::Global)
	}

	pub fn tenant_id(&self) -> Option<&str> {
		match self {
			Self::Global => None,
			Self::Tenant(tenant_id) => Some(tenant_id.as_str()),
		}
	}

	pub fn key(&self) -> String {
		match self {
			Self::Global => GLOBAL_SCOPE_KEY.to_string(),
			Self::Tenant(tenant_id) => format!("{TENANT_SCOPE_KEY_PREFIX}{tenant_id}"),
		}
	}
}

/// Everything a resolve call needs to know about where nodes live.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryScope {
	pub scope: Scope,
	pub category_type: CategoryType,
}
impl CategoryScope {
	pub fn new(scope: Scope, category_type: CategoryType) -> Self {
		Self { scope, category_type }
	}

	pub fn global(category_type: CategoryType) -> Self {
		Self::new(Scope::Global, category_type)
	}

	pub fn tenant(tenant_id: &str, category_type: CategoryType) -> Result<Self> {
		Ok(Self::new(Scope::tenant(tenant_id)?, category_type))
	}
}
