use uuid::Uuid;

use crate::{CatalogService, Result, normalize_tenant, parse_category_type};
use estimo_domain::tree::{self, TreeItem, TreeNode};
use estimo_storage::{categories, models::CategoryNode};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ListRequest {
	pub tenant_id: Option<String>,
	#[serde(rename = "type")]
	pub category_type: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ListItem {
	pub category_id: Uuid,
	pub name: String,
	pub parent_id: Option<Uuid>,
	#[serde(rename = "type")]
	pub category_type: String,
	pub tenant_id: Option<String>,
	pub is_global: bool,
}
impl From<CategoryNode> for ListItem {
	fn from(node: CategoryNode) -> Self {
		Self {
			category_id: node.category_id,
			name: node.name,
			parent_id: node.parent_id,
			category_type: node.category_type,
			tenant_id: node.tenant_id,
			is_global: node.is_global,
		}
	}
}
impl TreeItem for ListItem {
	fn id(&self) -> Uuid {
		self.category_id
	}

	fn parent_id(&self) -> Option<Uuid> {
		self.parent_id
	}
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ListResponse {
	pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct TreeResponse {
	pub roots: Vec<TreeNode<ListItem>>,
}

impl CatalogService {
	/// Flat listing of every category visible to the tenant, roots first.
	pub async fn list(&self, req: ListRequest) -> Result<ListResponse> {
		let category_type = parse_category_type(&req.category_type)?;
		let tenant_id = normalize_tenant(req.tenant_id.as_deref());
		let mut conn = self.db.pool.acquire().await?;
		let nodes = categories::list_categories(&mut conn, tenant_id, category_type).await?;

		Ok(ListResponse { items: nodes.into_iter().map(ListItem::from).collect() })
	}

	pub async fn tree(&self, req: ListRequest) -> Result<TreeResponse> {
		let ListResponse { items } = self.list(req).await?;

		Ok(TreeResponse { roots: tree::assemble(items) })
	}
}
