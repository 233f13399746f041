use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum CfgError {
	#[error(transparent)]
	#[diagnostic(code(cfgsmith::io_error))]
	Io(#[from] std::io::Error),

	#[error("source file not found: `{path}`")]
	#[diagnostic(
		code(cfgsmith::source_not_found),
		help("check the path, or pass the content inline instead")
	)]
	SourceNotFound { path: String },

	#[error("invalid template at line {line}, column {column}: {message}")]
	#[diagnostic(
		code(cfgsmith::compile),
		help("placeholders are written as `{{{{ name }}}}` with a non-empty identifier")
	)]
	Compile {
		line: usize,
		column: usize,
		message: String,
	},

	#[error("the template did not match any line of the configuration")]
	#[diagnostic(
		code(cfgsmith::no_match),
		help("the first line of the template must match a top-level line of the configuration")
	)]
	NoMatch,

	#[error("record {record} has no field `{field}` referenced by the output template")]
	#[diagnostic(
		code(cfgsmith::missing_field),
		help("only placeholders captured by the extraction template can be rendered")
	)]
	MissingField { field: String, record: usize },

	#[error("template rendering failed: {0}")]
	#[diagnostic(code(cfgsmith::template_render))]
	Render(String),

	#[error("failed to access destination `{path}`: {reason}")]
	#[diagnostic(
		code(cfgsmith::file),
		help("check that the parent directory exists and is writable")
	)]
	File { path: String, reason: String },

	#[error("failed to parse job file: {0}")]
	#[diagnostic(code(cfgsmith::config_parse))]
	ConfigParse(String),

	#[error("invalid job: {0}")]
	#[diagnostic(code(cfgsmith::invalid_job))]
	InvalidJob(String),

	#[error("unsupported job file format: `{0}`")]
	#[diagnostic(
		code(cfgsmith::unsupported_format),
		help("supported formats: toml, json, yaml, yml")
	)]
	UnsupportedJobFormat(String),
}

impl CfgError {
	/// The failure kind reported on the machine-readable error surface.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::SourceNotFound { .. } => "SourceNotFound",
			Self::Compile { .. } => "CompileError",
			Self::NoMatch => "NoMatch",
			Self::MissingField { .. } | Self::Render(_) => "RenderError",
			Self::File { .. } => "FileError",
			Self::Io(_) => "IoError",
			Self::ConfigParse(_) | Self::InvalidJob(_) | Self::UnsupportedJobFormat(_) => {
				"ConfigError"
			}
		}
	}
}

pub type CfgResult<T> = Result<T, CfgError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
