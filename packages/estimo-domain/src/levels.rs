use crate::{Error, Result};

/// Trims every level and drops the blank ones, keeping order.
pub fn normalize_levels<S>(levels: &[S]) -> Vec<&str>
where
	S: AsRef<str>,
{
	levels.iter().map(|level| level.as_ref().trim()).filter(|level| !level.is_empty()).collect()
}

/// Rejects paths the storage layer should never see.
pub fn check_levels(levels: &[&str], max_levels: usize, max_name_chars: usize) -> Result<()> {
	if levels.len() > max_levels {
		return Err(Error::InvalidLevel {
			message: format!("at most {max_levels} levels are allowed; got {}", levels.len()),
		});
	}

	for (index, level) in levels.iter().enumerate() {
		let chars = level.chars().count();

		if chars > max_name_chars {
			return Err(Error::InvalidLevel {
				message: format!(
					"level {index} is {chars} characters long; the limit is {max_name_chars}"
				),
			});
		}
		if level.chars().any(char::is_control) {
			return Err(Error::InvalidLevel {
				message: format!("level {index} contains control characters"),
			});
		}
	}

	Ok(())
}

pub fn join_path<S>(parts: &[S], separator: &str) -> String
where
	S: AsRef<str>,
{
	let mut out = String::new();

	for (index, part) in parts.iter().enumerate() {
		if index > 0 {
			out.push_str(separator);
		}

		out.push_str(part.as_ref());
	}

	out
}
