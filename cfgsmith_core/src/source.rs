use std::fmt::Display;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::Serialize;

use crate::CfgError;
use crate::CfgResult;

/// Where a piece of input text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
	Inline(String),
	File(PathBuf),
}

impl Source {
	/// Load the text. A missing file fails with
	/// [`CfgError::SourceNotFound`].
	pub fn load(&self) -> CfgResult<LoadedSource> {
		match self {
			Self::Inline(text) => {
				Ok(LoadedSource {
					text: text.clone(),
					provenance: Provenance::Inline,
				})
			}
			Self::File(path) => {
				let text = std::fs::read_to_string(path).map_err(|e| {
					if e.kind() == ErrorKind::NotFound {
						CfgError::SourceNotFound {
							path: path.display().to_string(),
						}
					} else {
						CfgError::Io(e)
					}
				})?;
				tracing::debug!(path = %path.display(), bytes = text.len(), "loaded source file");

				Ok(LoadedSource {
					text,
					provenance: Provenance::File(path.clone()),
				})
			}
		}
	}
}

/// Text together with where it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSource {
	pub text: String,
	pub provenance: Provenance,
}

/// Whether an input was given inline or read from a file. Displays as
/// `inline` or `file:<path>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
	Inline,
	File(PathBuf),
}

impl Display for Provenance {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Inline => write!(f, "inline"),
			Self::File(path) => write!(f, "file:{}", path.display()),
		}
	}
}

impl Serialize for Provenance {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.collect_str(self)
	}
}

/// Provenance of every input used by a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourcesUsed {
	pub config_source: Provenance,
	pub template_source: Provenance,
	/// Absent when the output template defaulted to the extraction template.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub output_template_source: Option<Provenance>,
}
