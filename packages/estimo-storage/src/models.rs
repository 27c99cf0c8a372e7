use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CategoryNode {
	pub category_id: Uuid,
	pub name: String,
	pub category_type: String,
	pub is_global: bool,
	pub tenant_id: Option<String>,
	pub parent_id: Option<Uuid>,
	pub created_at: OffsetDateTime,
}

/// Outcome of resolving a level chain. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
	/// Deepest node found or created; `None` when every level was blank.
	pub leaf_id: Option<Uuid>,
	pub full_path: String,
	/// Number of nodes this call inserted.
	pub created: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryWithAncestors {
	pub node: CategoryNode,
	/// Root first, ending with the parent of `node`.
	pub ancestors: Vec<CategoryNode>,
}
impl CategoryWithAncestors {
	pub fn names(&self) -> Vec<&str> {
		self.ancestors
			.iter()
			.chain(std::iter::once(&self.node))
			.map(|node| node.name.as_str())
			.collect()
	}
}
