use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
	Error, Result,
	models::{CategoryNode, CategoryWithAncestors, ResolvedPath},
};
use estimo_domain::{CategoryScope, CategoryType, levels};

// Ancestor walks stop here even if the parent chain is corrupted into a loop.
const MAX_ANCESTOR_DEPTH: i32 = 1_024;

/// Walks `levels` from the root, creating the nodes that do not exist yet.
///
/// Blank levels are skipped, so `["A", "", "C"]` yields `A -> C`. Nothing is created and
/// `leaf_id` is `None` when every level is blank.
pub async fn resolve_hierarchy<S>(
	executor: &mut PgConnection,
	scope: &CategoryScope,
	levels: &[S],
	separator: &str,
) -> Result<ResolvedPath>
where
	S: AsRef<str>,
{
	let parts = levels::normalize_levels(levels);
	let mut parent_id = None;
	let mut created = 0;

	for name in &parts {
		let (node, inserted) = find_or_create_child(executor, scope, parent_id, name).await?;

		if inserted {
			created += 1;
		}

		parent_id = Some(node.category_id);
	}

	Ok(ResolvedPath { leaf_id: parent_id, full_path: levels::join_path(&parts, separator), created })
}

/// Returns the child named `name` under `parent_id`, inserting it if absent.
///
/// The boolean is true only when this call inserted the row. A concurrent insert of the same
/// sibling is absorbed by the unique constraint and the winner's row is returned instead.
pub async fn find_or_create_child(
	executor: &mut PgConnection,
	scope: &CategoryScope,
	parent_id: Option<Uuid>,
	name: &str,
) -> Result<(CategoryNode, bool)> {
	let name = name.trim();

	if name.is_empty() {
		return Err(Error::InvalidArgument("category name must not be empty".to_string()));
	}
	if let Some(node) = find_child(executor, scope, parent_id, name).await? {
		return Ok((node, false));
	}
	if let Some(node) = insert_child(executor, scope, parent_id, name).await? {
		tracing::debug!(
			category_id = %node.category_id,
			parent_id = ?parent_id,
			scope_key = %scope.scope.key(),
			category_type = %scope.category_type,
			"Created category."
		);

		return Ok((node, true));
	}

	let node = find_child(executor, scope, parent_id, name).await?.ok_or_else(|| {
		Error::Conflict(format!(
			"category insert conflicted but no row is visible; scope_key={} parent_id={:?} name={:?}",
			scope.scope.key(),
			parent_id,
			name
		))
	})?;

	tracing::warn!(
		category_id = %node.category_id,
		parent_id = ?parent_id,
		scope_key = %scope.scope.key(),
		"Adopted category created by a concurrent writer."
	);

	Ok((node, false))
}

/// Sibling lookup. `scope_key` is `'__global__'` for global rows and `'tenant:<id>'` for tenant
/// rows, so equality on it is the scope predicate for one side only.
pub async fn find_child(
	executor: &mut PgConnection,
	scope: &CategoryScope,
	parent_id: Option<Uuid>,
	name: &str,
) -> Result<Option<CategoryNode>> {
	let row = sqlx::query_as::<_, CategoryNode>(
		"\
SELECT
	category_id,
	name,
	category_type,
	is_global,
	tenant_id,
	parent_id,
	created_at
FROM catalog_categories
WHERE scope_key = $1
	AND is_global = $2
	AND tenant_id IS NOT DISTINCT FROM $3
	AND category_type = $4
	AND parent_key = COALESCE($5::uuid, '00000000-0000-0000-0000-000000000000'::uuid)
	AND name = $6",
	)
	.bind(scope.scope.key())
	.bind(scope.scope.is_global())
	.bind(scope.scope.tenant_id())
	.bind(scope.category_type.as_str())
	.bind(parent_id)
	.bind(name)
	.fetch_optional(&mut *executor)
	.await?;

	Ok(row)
}

/// Inserts a sibling, returning `None` if an equal sibling already exists.
pub async fn insert_child(
	executor: &mut PgConnection,
	scope: &CategoryScope,
	parent_id: Option<Uuid>,
	name: &str,
) -> Result<Option<CategoryNode>> {
	let row = sqlx::query_as::<_, CategoryNode>(
		"\
INSERT INTO catalog_categories (
	category_id,
	name,
	category_type,
	is_global,
	tenant_id,
	parent_id,
	created_at
)
VALUES ($1, $2, $3, $4, $5, $6, now())
ON CONFLICT ON CONSTRAINT catalog_categories_sibling_name_unique DO NOTHING
RETURNING
	category_id,
	name,
	category_type,
	is_global,
	tenant_id,
	parent_id,
	created_at",
	)
	.bind(Uuid::new_v4())
	.bind(name)
	.bind(scope.category_type.as_str())
	.bind(scope.scope.is_global())
	.bind(scope.scope.tenant_id())
	.bind(parent_id)
	.fetch_optional(&mut *executor)
	.await?;

	Ok(row)
}

/// Every node of `category_type` visible to `tenant_id`: global rows plus the tenant's own.
///
/// Roots come first, then rows are ordered by name. Without a tenant only global rows are
/// returned.
pub async fn list_categories(
	executor: &mut PgConnection,
	tenant_id: Option<&str>,
	category_type: CategoryType,
) -> Result<Vec<CategoryNode>> {
	let rows = sqlx::query_as::<_, CategoryNode>(
		"\
SELECT
	category_id,
	name,
	category_type,
	is_global,
	tenant_id,
	parent_id,
	created_at
FROM catalog_categories
WHERE category_type = $1
	AND (is_global = true OR tenant_id = $2)
ORDER BY parent_id IS NULL DESC, name ASC, category_id ASC",
	)
	.bind(category_type.as_str())
	.bind(tenant_id)
	.fetch_all(&mut *executor)
	.await?;

	Ok(rows)
}

/// Loads a node and its ancestor chain, applying the scope predicate at every level.
///
/// A node that exists but is not visible to `tenant_id`, or whose chain crosses into another
/// tenant's rows, is reported as not found.
pub async fn get_with_ancestors(
	executor: &mut PgConnection,
	tenant_id: Option<&str>,
	category_id: Uuid,
) -> Result<CategoryWithAncestors> {
	let mut chain = sqlx::query_as::<_, CategoryNode>(
		"\
WITH RECURSIVE chain AS (
	SELECT
		c.category_id,
		c.name,
		c.category_type,
		c.is_global,
		c.tenant_id,
		c.parent_id,
		c.created_at,
		0 AS depth
	FROM catalog_categories c
	WHERE c.category_id = $1
		AND (c.is_global = true OR c.tenant_id = $2)
	UNION ALL
	SELECT
		p.category_id,
		p.name,
		p.category_type,
		p.is_global,
		p.tenant_id,
		p.parent_id,
		p.created_at,
		chain.depth + 1
	FROM catalog_categories p
	JOIN chain ON p.category_id = chain.parent_id
	WHERE (p.is_global = true OR p.tenant_id = $2)
		AND chain.depth < $3
)
SELECT
	category_id,
	name,
	category_type,
	is_global,
	tenant_id,
	parent_id,
	created_at
FROM chain
ORDER BY depth DESC",
	)
	.bind(category_id)
	.bind(tenant_id)
	.bind(MAX_ANCESTOR_DEPTH)
	.fetch_all(&mut *executor)
	.await?;
	let not_found = || Error::NotFound(format!("category not found; category_id={category_id}"));
	let Some(node) = chain.pop() else {
		return Err(not_found());
	};

	// The walk must end at a root; otherwise some ancestor was filtered out by scope.
	if chain.first().unwrap_or(&node).parent_id.is_some() {
		return Err(not_found());
	}

	Ok(CategoryWithAncestors { node, ancestors: chain })
}
