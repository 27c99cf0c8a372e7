mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Catalog, Config, DEFAULT_PATH_SEPARATOR, Postgres, Service, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.catalog.path_separator.trim().is_empty() {
		return Err(Error::Validation {
			message: "catalog.path_separator must contain a visible character.".to_string(),
		});
	}
	if cfg.catalog.max_levels == 0 {
		return Err(Error::Validation {
			message: "catalog.max_levels must be greater than zero.".to_string(),
		});
	}
	if cfg.catalog.max_name_chars == 0 {
		return Err(Error::Validation {
			message: "catalog.max_name_chars must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.catalog.path_separator.is_empty() {
		cfg.catalog.path_separator = DEFAULT_PATH_SEPARATOR.to_string();
	}
	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}
}
