use sqlx::PgConnection;
use uuid::Uuid;

use estimo_config::Postgres;
use estimo_domain::{CategoryScope, CategoryType};
use estimo_storage::{Error, categories, db::Db, models::CategoryNode};
use estimo_testkit::TestDatabase;

const SEP: &str = " / ";

async fn setup(test_db: &TestDatabase, pool_max_conns: u32) -> Db {
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	db
}

fn tenant(tenant_id: &str) -> CategoryScope {
	CategoryScope::tenant(tenant_id, CategoryType::Material).expect("tenant scope")
}

async fn count_named(conn: &mut PgConnection, name: &str) -> i64 {
	sqlx::query_scalar("SELECT count(*) FROM catalog_categories WHERE name = $1")
		.bind(name)
		.fetch_one(conn)
		.await
		.expect("Failed to count categories.")
}

fn find<'a>(nodes: &'a [CategoryNode], name: &str) -> Vec<&'a CategoryNode> {
	nodes.iter().filter(|node| node.name == name).collect()
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set ESTIMO_PG_DSN to run."]
async fn resolve_is_idempotent() {
	let Some(base_dsn) = estimo_testkit::env_dsn() else {
		eprintln!("Skipping resolve_is_idempotent; set ESTIMO_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = setup(&test_db, 1).await;
	let mut conn = db.pool.acquire().await.expect("Failed to acquire connection.");
	let scope = CategoryScope::global(CategoryType::Material);
	let levels = ["Construction", "Mixes", "Gypsum"];
	let first = categories::resolve_hierarchy(&mut conn, &scope, &levels, SEP)
		.await
		.expect("Failed to resolve path.");
	let second = categories::resolve_hierarchy(&mut conn, &scope, &levels, SEP)
		.await
		.expect("Failed to resolve path again.");

	assert!(first.leaf_id.is_some());
	assert_eq!(first.leaf_id, second.leaf_id);
	assert_eq!(first.full_path, "Construction / Mixes / Gypsum");
	assert_eq!(first.created, 3);
	assert_eq!(second.created, 0);

	let nodes = categories::list_categories(&mut conn, None, CategoryType::Material)
		.await
		.expect("Failed to list categories.");

	assert_eq!(nodes.len(), 3);

	drop(conn);
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set ESTIMO_PG_DSN to run."]
async fn blank_levels_collapse() {
	let Some(base_dsn) = estimo_testkit::env_dsn() else {
		eprintln!("Skipping blank_levels_collapse; set ESTIMO_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = setup(&test_db, 1).await;
	let mut conn = db.pool.acquire().await.expect("Failed to acquire connection.");
	let scope = tenant("tenant-a");
	let resolved =
		categories::resolve_hierarchy(&mut conn, &scope, &["Construction", "", "  Gypsum "], SEP)
			.await
			.expect("Failed to resolve sparse path.");

	assert_eq!(resolved.full_path, "Construction / Gypsum");
	assert_eq!(resolved.created, 2);

	let nodes = categories::list_categories(&mut conn, Some("tenant-a"), CategoryType::Material)
		.await
		.expect("Failed to list categories.");
	let construction = find(&nodes, "Construction");
	let gypsum = find(&nodes, "Gypsum");

	assert_eq!(nodes.len(), 2);
	assert_eq!(gypsum[0].parent_id, Some(construction[0].category_id));
	assert_eq!(resolved.leaf_id, Some(gypsum[0].category_id));

	drop(conn);
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set ESTIMO_PG_DSN to run."]
async fn blank_input_creates_nothing() {
	let Some(base_dsn) = estimo_testkit::env_dsn() else {
		eprintln!("Skipping blank_input_creates_nothing; set ESTIMO_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = setup(&test_db, 1).await;
	let mut conn = db.pool.acquire().await.expect("Failed to acquire connection.");
	let scope = CategoryScope::global(CategoryType::Work);
	let empty = categories::resolve_hierarchy::<&str>(&mut conn, &scope, &[], SEP)
		.await
		.expect("Failed to resolve empty path.");
	let blank = categories::resolve_hierarchy(&mut conn, &scope, &["", "   "], SEP)
		.await
		.expect("Failed to resolve blank path.");

	assert_eq!(empty.leaf_id, None);
	assert_eq!(empty.full_path, "");
	assert_eq!(blank.leaf_id, None);
	assert_eq!(blank.full_path, "");

	let total: i64 = sqlx::query_scalar("SELECT count(*) FROM catalog_categories")
		.fetch_one(&mut *conn)
		.await
		.expect("Failed to count categories.");

	assert_eq!(total, 0);

	drop(conn);
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set ESTIMO_PG_DSN to run."]
async fn tenants_are_isolated() {
	let Some(base_dsn) = estimo_testkit::env_dsn() else {
		eprintln!("Skipping tenants_are_isolated; set ESTIMO_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = setup(&test_db, 1).await;
	let mut conn = db.pool.acquire().await.expect("Failed to acquire connection.");
	let a = categories::resolve_hierarchy(&mut conn, &tenant("tenant-a"), &["Construction"], SEP)
		.await
		.expect("Failed to resolve for tenant a.");
	let b = categories::resolve_hierarchy(&mut conn, &tenant("tenant-b"), &["Construction"], SEP)
		.await
		.expect("Failed to resolve for tenant b.");

	assert_ne!(a.leaf_id, b.leaf_id);
	assert_eq!(count_named(&mut conn, "Construction").await, 2);

	let seen_by_a = categories::list_categories(&mut conn, Some("tenant-a"), CategoryType::Material)
		.await
		.expect("Failed to list categories.");

	assert_eq!(seen_by_a.len(), 1);
	assert_eq!(Some(seen_by_a[0].category_id), a.leaf_id);
	assert_eq!(seen_by_a[0].tenant_id.as_deref(), Some("tenant-a"));

	let b_id = b.leaf_id.expect("tenant b leaf");
	let err = categories::get_with_ancestors(&mut conn, Some("tenant-a"), b_id)
		.await
		.expect_err("Tenant a must not read tenant b's category.");

	assert!(matches!(err, Error::NotFound(_)));

	drop(conn);
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set ESTIMO_PG_DSN to run."]
async fn tenant_and_global_trees_do_not_mix() {
	let Some(base_dsn) = estimo_testkit::env_dsn() else {
		eprintln!("Skipping tenant_and_global_trees_do_not_mix; set ESTIMO_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = setup(&test_db, 1).await;
	let mut conn = db.pool.acquire().await.expect("Failed to acquire connection.");
	let global = CategoryScope::global(CategoryType::Material);
	let global_leaf = categories::resolve_hierarchy(&mut conn, &global, &["Construction"], SEP)
		.await
		.expect("Failed to resolve global path.");
	let tenant_leaf =
		categories::resolve_hierarchy(&mut conn, &tenant("tenant-a"), &["Construction"], SEP)
			.await
			.expect("Failed to resolve tenant path.");
	let work_leaf = categories::resolve_hierarchy(
		&mut conn,
		&CategoryScope::global(CategoryType::Work),
		&["Construction"],
		SEP,
	)
	.await
	.expect("Failed to resolve work path.");

	assert_ne!(global_leaf.leaf_id, tenant_leaf.leaf_id);
	assert_ne!(global_leaf.leaf_id, work_leaf.leaf_id);
	assert_eq!(count_named(&mut conn, "Construction").await, 3);

	drop(conn);
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set ESTIMO_PG_DSN to run."]
async fn global_nodes_are_visible_to_every_tenant() {
	let Some(base_dsn) = estimo_testkit::env_dsn() else {
		eprintln!(
			"Skipping global_nodes_are_visible_to_every_tenant; set ESTIMO_PG_DSN to run this test."
		);

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = setup(&test_db, 1).await;
	let mut conn = db.pool.acquire().await.expect("Failed to acquire connection.");
	let resolved = categories::resolve_hierarchy(
		&mut conn,
		&CategoryScope::global(CategoryType::Material),
		&["Finishing", "Paint"],
		SEP,
	)
	.await
	.expect("Failed to resolve global path.");
	let leaf_id = resolved.leaf_id.expect("global leaf");

	for tenant_id in ["tenant-a", "tenant-b", "tenant-c"] {
		let nodes = categories::list_categories(&mut conn, Some(tenant_id), CategoryType::Material)
			.await
			.expect("Failed to list categories.");

		assert!(nodes.iter().any(|node| node.category_id == leaf_id));

		let found = categories::get_with_ancestors(&mut conn, Some(tenant_id), leaf_id)
			.await
			.expect("Failed to load global category.");

		assert_eq!(found.names(), vec!["Finishing", "Paint"]);
	}

	drop(conn);
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set ESTIMO_PG_DSN to run."]
async fn siblings_share_one_parent() {
	let Some(base_dsn) = estimo_testkit::env_dsn() else {
		eprintln!("Skipping siblings_share_one_parent; set ESTIMO_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = setup(&test_db, 1).await;
	let mut conn = db.pool.acquire().await.expect("Failed to acquire connection.");
	let scope = tenant("tenant-a");
	let b = categories::resolve_hierarchy(&mut conn, &scope, &["A", "B"], SEP)
		.await
		.expect("Failed to resolve A/B.");
	let c = categories::resolve_hierarchy(&mut conn, &scope, &["A", "C"], SEP)
		.await
		.expect("Failed to resolve A/C.");
	let nodes = categories::list_categories(&mut conn, Some("tenant-a"), CategoryType::Material)
		.await
		.expect("Failed to list categories.");
	let a = find(&nodes, "A");
	let b_node = find(&nodes, "B");
	let c_node = find(&nodes, "C");

	assert_eq!(a.len(), 1);
	assert_eq!(b_node[0].parent_id, Some(a[0].category_id));
	assert_eq!(c_node[0].parent_id, Some(a[0].category_id));
	assert_ne!(b.leaf_id, c.leaf_id);
	assert_eq!(c.created, 1);
	// Roots are listed before their descendants.
	assert_eq!(nodes[0].name, "A");

	drop(conn);
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set ESTIMO_PG_DSN to run."]
async fn concurrent_first_resolution_creates_one_node_per_level() {
	let Some(base_dsn) = estimo_testkit::env_dsn() else {
		eprintln!(
			"Skipping concurrent_first_resolution_creates_one_node_per_level; set ESTIMO_PG_DSN to run."
		);

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = setup(&test_db, 8).await;
	let scope = CategoryScope::global(CategoryType::Material);
	let levels = ["Construction", "Mixes", "Gypsum"];
	let mut tasks = Vec::new();

	for _ in 0..8 {
		let pool = db.pool.clone();
		let scope = scope.clone();

		tasks.push(tokio::spawn(async move {
			let mut conn = pool.acquire().await.expect("Failed to acquire connection.");

			categories::resolve_hierarchy(&mut conn, &scope, &levels, SEP).await
		}));
	}

	let mut leaf_ids = Vec::new();
	let mut created = 0;

	for task in tasks {
		let resolved = task.await.expect("Task panicked.").expect("Failed to resolve path.");

		created += resolved.created;

		leaf_ids.push(resolved.leaf_id);
	}

	leaf_ids.dedup();

	assert_eq!(leaf_ids.len(), 1);
	assert_eq!(created, 3);

	let mut conn = db.pool.acquire().await.expect("Failed to acquire connection.");

	for name in levels {
		assert_eq!(count_named(&mut conn, name).await, 1, "duplicate sibling for {name}");
	}

	drop(conn);
	db.pool.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set ESTIMO_PG_DSN to run."]
async fn unique_constraint_rejects_duplicate_root_siblings() {
	let Some(base_dsn) = estimo_testkit::env_dsn() else {
		eprintln!(
			"Skipping unique_constraint_rejects_duplicate_root_siblings; set ESTIMO_PG_DSN to run."
		);

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = setup(&test_db, 1).await;
	let insert = "\
INSERT INTO catalog_categories (category_id, name, category_type, is_global, tenant_id, parent_id)
VALUES ($1, 'Root', 'material', true, NULL, NULL)";

	sqlx::query(insert)
		.bind(Uuid::new_v4())
		.execute(&db.pool)
		.await
		.expect("First root insert must succeed.");

	assert!(sqlx::query(insert).bind(Uuid::new_v4()).execute(&db.pool).await.is_err());

	let mismatched_scope = sqlx::query(
		"\
INSERT INTO catalog_categories (category_id, name, category_type, is_global, tenant_id)
VALUES ($1, 'Leaky', 'material', true, 'tenant-a')",
	)
	.bind(Uuid::new_v4())
	.execute(&db.pool)
	.await;

	assert!(mismatched_scope.is_err());

	let unknown_type = sqlx::query(
		"\
INSERT INTO catalog_categories (category_id, name, category_type, is_global, tenant_id)
VALUES ($1, 'Odd', 'labour', true, NULL)",
	)
	.bind(Uuid::new_v4())
	.execute(&db.pool)
	.await;

	assert!(unknown_type.is_err());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set ESTIMO_PG_DSN to run."]
async fn insert_child_reports_existing_sibling_as_none() {
	let Some(base_dsn) = estimo_testkit::env_dsn() else {
		eprintln!("Skipping insert_child_reports_existing_sibling_as_none; set ESTIMO_PG_DSN to run.");

		return;
	};

	estimo_testkit::with_test_db(&base_dsn, |test_db| {
		let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };

		async move {
			let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

			db.ensure_schema().await.expect("Failed to ensure schema.");

			let mut conn = db.pool.acquire().await?;
			let scope = tenant("tenant-a");
			let first = categories::insert_child(&mut conn, &scope, None, "Timber")
				.await
				.expect("Failed to insert category.");
			let second = categories::insert_child(&mut conn, &scope, None, "Timber")
				.await
				.expect("Conflicting insert must not error.");
			let (adopted, inserted) =
				categories::find_or_create_child(&mut conn, &scope, None, "Timber")
					.await
					.expect("Failed to find category.");

			assert!(first.is_some());
			assert!(second.is_none());
			assert!(!inserted);
			assert_eq!(Some(adopted.category_id), first.map(|node| node.category_id));

			drop(conn);
			db.pool.close().await;

			Ok(())
		}
	})
	.await
	.expect("Test database run failed.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set ESTIMO_PG_DSN to run."]
async fn ancestors_are_returned_root_first() {
	let Some(base_dsn) = estimo_testkit::env_dsn() else {
		eprintln!("Skipping ancestors_are_returned_root_first; set ESTIMO_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = setup(&test_db, 1).await;
	let mut conn = db.pool.acquire().await.expect("Failed to acquire connection.");
	let resolved = categories::resolve_hierarchy(
		&mut conn,
		&tenant("tenant-a"),
		&["Construction", "Mixes", "Gypsum"],
		SEP,
	)
	.await
	.expect("Failed to resolve path.");
	let leaf_id = resolved.leaf_id.expect("leaf");
	let found = categories::get_with_ancestors(&mut conn, Some("tenant-a"), leaf_id)
		.await
		.expect("Failed to load category.");

	assert_eq!(found.node.category_id, leaf_id);
	assert_eq!(found.ancestors.len(), 2);
	assert_eq!(found.ancestors[0].parent_id, None);
	assert_eq!(found.names().join(SEP), resolved.full_path);

	let missing = categories::get_with_ancestors(&mut conn, Some("tenant-a"), Uuid::new_v4())
		.await
		.expect_err("Unknown id must not be found.");

	assert!(matches!(missing, Error::NotFound(_)));

	drop(conn);
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
