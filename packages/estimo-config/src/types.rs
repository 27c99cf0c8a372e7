use serde::Deserialize;

pub const DEFAULT_PATH_SEPARATOR: &str = " / ";

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub catalog: Catalog,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

/// Limits and formatting for category path resolution.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
	/// Joins level names into the breadcrumb returned by resolve and get.
	#[serde(default = "default_path_separator")]
	pub path_separator: String,
	/// Upper bound on non-blank levels accepted in a single resolve call.
	#[serde(default = "default_max_levels")]
	pub max_levels: u32,
	/// Upper bound on a single trimmed level name, in characters.
	#[serde(default = "default_max_name_chars")]
	pub max_name_chars: u32,
}
impl Default for Catalog {
	fn default() -> Self {
		Self {
			path_separator: default_path_separator(),
			max_levels: default_max_levels(),
			max_name_chars: default_max_name_chars(),
		}
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_path_separator() -> String {
	DEFAULT_PATH_SEPARATOR.to_string()
}

fn default_max_levels() -> u32 {
	16
}

fn default_max_name_chars() -> u32 {
	200
}
