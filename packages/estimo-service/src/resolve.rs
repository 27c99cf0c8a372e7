use uuid::Uuid;

use crate::{CatalogService, Result, parse_category_type};
use estimo_domain::{CategoryScope, Scope, levels};
use estimo_storage::categories;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ResolveRequest {
	pub tenant_id: Option<String>,
	#[serde(default)]
	pub is_global: bool,
	#[serde(rename = "type")]
	pub category_type: String,
	pub levels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResolveResponse {
	pub category_id: Option<Uuid>,
	pub full_path: String,
	pub created: usize,
}

impl CatalogService {
	/// Finds or creates the category chain named by `levels` and returns its leaf.
	pub async fn resolve(&self, req: ResolveRequest) -> Result<ResolveResponse> {
		let category_type = parse_category_type(&req.category_type)?;
		let scope = Scope::from_request(req.is_global, req.tenant_id.as_deref())?;
		let scope = CategoryScope::new(scope, category_type);
		let parts = levels::normalize_levels(&req.levels);

		levels::check_levels(
			&parts,
			self.cfg.catalog.max_levels as usize,
			self.cfg.catalog.max_name_chars as usize,
		)?;

		if parts.is_empty() {
			return Ok(ResolveResponse { category_id: None, full_path: String::new(), created: 0 });
		}

		let mut conn = self.db.pool.acquire().await?;
		let resolved = categories::resolve_hierarchy(
			&mut conn,
			&scope,
			&parts,
			&self.cfg.catalog.path_separator,
		)
		.await?;

		tracing::info!(
			tenant_id = scope.scope.tenant_id().unwrap_or("-"),
			is_global = scope.scope.is_global(),
			category_type = %scope.category_type,
			category_id = ?resolved.leaf_id,
			created = resolved.created,
			"Resolved category path."
		);

		Ok(ResolveResponse {
			category_id: resolved.leaf_id,
			full_path: resolved.full_path,
			created: resolved.created,
		})
	}
}
