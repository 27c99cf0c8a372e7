pub mod get;
pub mod list;
pub mod resolve;

mod error;

pub use error::{Error, Result};
pub use get::{GetRequest, GetResponse};
pub use list::{ListItem, ListRequest, ListResponse, TreeResponse};
pub use resolve::{ResolveRequest, ResolveResponse};

use estimo_config::Config;
use estimo_domain::CategoryType;
use estimo_storage::db::Db;

pub struct CatalogService {
	pub cfg: Config,
	pub db: Db,
}
impl CatalogService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, db }
	}
}

pub(crate) fn parse_category_type(raw: &str) -> Result<CategoryType> {
	Ok(raw.parse::<CategoryType>()?)
}

/// Blank tenant ids are treated as absent so they can never match a stored row.
pub(crate) fn normalize_tenant(tenant_id: Option<&str>) -> Option<&str> {
	tenant_id.map(str::trim).filter(|tenant_id| !tenant_id.is_empty())
}
