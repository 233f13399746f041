use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::CfgError;
use crate::CfgResult;
use crate::IgnorePrefixes;
use crate::PipelineRequest;
use crate::Source;

/// Supported job file locations in discovery order (highest precedence
/// first).
pub const JOB_FILE_CANDIDATES: [&str; 3] = [
	"cfgsmith.toml",
	".cfgsmith.toml",
	".config/cfgsmith.toml",
];

/// Ignore prefixes as written in a job file: a single string or a list.
///
/// ```toml
/// keys_ignore = "GigabitEthernet"
/// ```
///
/// ```toml
/// keys_ignore = ["GigabitEthernet", "Loopback"]
/// ```
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
#[non_exhaustive]
pub enum KeysIgnore {
	One(String),
	Many(Vec<String>),
}

impl From<KeysIgnore> for IgnorePrefixes {
	fn from(keys: KeysIgnore) -> Self {
		match keys {
			KeysIgnore::One(prefix) => IgnorePrefixes::new([prefix]),
			KeysIgnore::Many(prefixes) => IgnorePrefixes::new(prefixes),
		}
	}
}

/// A rendering job, loaded from a job file or assembled from command-line
/// flags.
///
/// ```toml
/// config_src = "backups/core-sw1.cfg"
/// template = """
/// interface {{ ifname }}
///  no ip proxy-arp
/// """
/// keys_ignore = ["GigabitEthernet", "Loopback"]
/// dest_path = "out/core-sw1.cfg"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
	/// Inline device configuration.
	#[serde(default)]
	pub config: Option<String>,
	/// Path to the device configuration.
	#[serde(default)]
	pub config_src: Option<PathBuf>,
	/// Inline extraction template.
	#[serde(default)]
	pub template: Option<String>,
	/// Path to the extraction template.
	#[serde(default)]
	pub template_src: Option<PathBuf>,
	/// Inline output template. Defaults to the extraction template.
	#[serde(default)]
	pub output_template: Option<String>,
	/// Path to the output template.
	#[serde(default)]
	pub output_template_src: Option<PathBuf>,
	#[serde(default)]
	pub keys_ignore: Option<KeysIgnore>,
	/// Where to write the rendered configuration.
	#[serde(default)]
	pub dest_path: Option<PathBuf>,
	#[serde(default)]
	pub dry_run: Option<bool>,
}

impl JobConfig {
	/// Resolve the job file path using the supported discovery order.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		JOB_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Discover and load a job file under `root`. Returns `None` when no
	/// candidate exists.
	pub fn load(root: &Path) -> CfgResult<Option<JobConfig>> {
		let Some(path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		Self::load_file(&path).map(Some)
	}

	/// Load a job file, choosing the format from its extension. Relative
	/// paths inside the file are resolved against the file's directory.
	pub fn load_file(path: &Path) -> CfgResult<JobConfig> {
		let content = std::fs::read_to_string(path).map_err(|e| {
			if e.kind() == std::io::ErrorKind::NotFound {
				CfgError::SourceNotFound {
					path: path.display().to_string(),
				}
			} else {
				CfgError::Io(e)
			}
		})?;
		let format = path
			.extension()
			.and_then(|e| e.to_str())
			.unwrap_or("")
			.to_ascii_lowercase();
		let job = parse_job(&content, &format, &path.display().to_string())?;
		let base = path.parent().unwrap_or_else(|| Path::new(""));

		tracing::debug!(path = %path.display(), "loaded job file");
		Ok(job.resolve_relative_to(base))
	}

	fn resolve_relative_to(self, base: &Path) -> Self {
		let resolve = |path: Option<PathBuf>| {
			path.map(|path| {
				if path.is_relative() {
					base.join(path)
				} else {
					path
				}
			})
		};

		Self {
			config_src: resolve(self.config_src),
			template_src: resolve(self.template_src),
			output_template_src: resolve(self.output_template_src),
			dest_path: resolve(self.dest_path),
			..self
		}
	}

	/// Layer `overrides` on top of this job. Inline/file pairs are replaced
	/// as a unit so an override never leaves both halves set.
	#[must_use]
	pub fn merge(self, overrides: JobConfig) -> JobConfig {
		let (config, config_src) = pick_pair(
			(self.config, self.config_src),
			(overrides.config, overrides.config_src),
		);
		let (template, template_src) = pick_pair(
			(self.template, self.template_src),
			(overrides.template, overrides.template_src),
		);
		let (output_template, output_template_src) = pick_pair(
			(self.output_template, self.output_template_src),
			(overrides.output_template, overrides.output_template_src),
		);

		JobConfig {
			config,
			config_src,
			template,
			template_src,
			output_template,
			output_template_src,
			keys_ignore: overrides.keys_ignore.or(self.keys_ignore),
			dest_path: overrides.dest_path.or(self.dest_path),
			dry_run: overrides.dry_run.or(self.dry_run),
		}
	}

	/// Validate the job and turn it into a pipeline request.
	///
	/// Exactly one of `config`/`config_src` and one of
	/// `template`/`template_src` must be set; at most one of
	/// `output_template`/`output_template_src` may be.
	pub fn into_request(self) -> CfgResult<PipelineRequest> {
		let config = required_source("config", self.config, self.config_src)?;
		let template = required_source("template", self.template, self.template_src)?;
		let output_template = optional_source(
			"output_template",
			self.output_template,
			self.output_template_src,
		)?;

		Ok(PipelineRequest {
			config,
			template,
			output_template,
			ignore_prefixes: self.keys_ignore.map(Into::into).unwrap_or_default(),
			dest_path: self.dest_path,
			dry_run: self.dry_run.unwrap_or(false),
		})
	}
}

type SourcePair = (Option<String>, Option<PathBuf>);

fn pick_pair(base: SourcePair, overrides: SourcePair) -> SourcePair {
	if overrides.0.is_some() || overrides.1.is_some() {
		overrides
	} else {
		base
	}
}

fn optional_source(
	name: &str,
	inline: Option<String>,
	path: Option<PathBuf>,
) -> CfgResult<Option<Source>> {
	match (inline, path) {
		(Some(_), Some(_)) => {
			Err(CfgError::InvalidJob(format!(
				"`{name}` and `{name}_src` are mutually exclusive"
			)))
		}
		(Some(text), None) => Ok(Some(Source::Inline(text))),
		(None, Some(path)) => Ok(Some(Source::File(path))),
		(None, None) => Ok(None),
	}
}

fn required_source(name: &str, inline: Option<String>, path: Option<PathBuf>) -> CfgResult<Source> {
	optional_source(name, inline, path)?.ok_or_else(|| {
		CfgError::InvalidJob(format!("one of `{name}` or `{name}_src` is required"))
	})
}

fn parse_job(content: &str, format: &str, path: &str) -> CfgResult<JobConfig> {
	match format {
		"toml" => toml::from_str(content).map_err(|e| CfgError::ConfigParse(format!("{path}: {e}"))),
		"json" => {
			serde_json::from_str(content).map_err(|e| CfgError::ConfigParse(format!("{path}: {e}")))
		}
		"yaml" | "yml" => {
			serde_yaml_ng::from_str(content)
				.map_err(|e| CfgError::ConfigParse(format!("{path}: {e}")))
		}
		_ => Err(CfgError::UnsupportedJobFormat(format.to_string())),
	}
}
