use uuid::Uuid;

use crate::{CatalogService, ListItem, Result, normalize_tenant};
use estimo_domain::levels;
use estimo_storage::categories;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GetRequest {
	pub tenant_id: Option<String>,
	pub category_id: Uuid,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GetResponse {
	#[serde(flatten)]
	pub item: ListItem,
	pub full_path: String,
	pub depth: usize,
}

impl CatalogService {
	/// Loads one category with its breadcrumb, computed from the live ancestor chain.
	pub async fn get(&self, req: GetRequest) -> Result<GetResponse> {
		let tenant_id = normalize_tenant(req.tenant_id.as_deref());
		let mut conn = self.db.pool.acquire().await?;
		let found = categories::get_with_ancestors(&mut conn, tenant_id, req.category_id).await?;
		let full_path = levels::join_path(&found.names(), &self.cfg.catalog.path_separator);
		let depth = found.ancestors.len();

		Ok(GetResponse { item: found.node.into(), full_path, depth })
	}
}
