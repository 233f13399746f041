use std::io::ErrorKind;
use std::path::Path;

use crate::CfgError;
use crate::CfgResult;

/// Outcome of an idempotent write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
	/// Whether the destination content differs (or would differ) from what
	/// was there before.
	pub changed: bool,
	/// Whether bytes were actually written. Always false for a dry run.
	pub written: bool,
}

/// Persist `content` to `path` only when it differs from what is already
/// there.
///
/// A dry run never creates or modifies anything; it only reads the current
/// destination to report whether a write would change it.
pub fn write_if_changed(path: &Path, content: &str, dry_run: bool) -> CfgResult<WriteOutcome> {
	let changed = match read_existing(path)? {
		Some(existing) => existing != content.as_bytes(),
		None => true,
	};

	if dry_run || !changed {
		tracing::debug!(
			path = %path.display(),
			changed,
			dry_run,
			"skipping destination write"
		);
		return Ok(WriteOutcome {
			changed,
			written: false,
		});
	}

	std::fs::write(path, content).map_err(|e| file_error(path, &e))?;
	tracing::info!(path = %path.display(), bytes = content.len(), "wrote destination");

	Ok(WriteOutcome {
		changed: true,
		written: true,
	})
}

/// Read the destination, or `None` when it does not exist yet.
fn read_existing(path: &Path) -> CfgResult<Option<Vec<u8>>> {
	match std::fs::read(path) {
		Ok(bytes) => Ok(Some(bytes)),
		Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
		Err(e) => Err(file_error(path, &e)),
	}
}

fn file_error(path: &Path, error: &std::io::Error) -> CfgError {
	CfgError::File {
		path: path.display().to_string(),
		reason: error.to_string(),
	}
}
