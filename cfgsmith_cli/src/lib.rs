use std::path::PathBuf;

use cfgsmith_core::JobConfig;
use cfgsmith_core::KeysIgnore;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Extract blocks from device configurations and re-render them through a template.",
	long_about = "cfgsmith scans indented device configuration text with a declarative template, \
	              collects one record per matched block, drops records whose values start with \
	              an ignore prefix, and renders the rest through an output template.\n\nThe \
	              destination file is only written when its content would change.\n\nQuick \
	              start:\n  cfgsmith render --config-src sw1.cfg --template 'interface {{ ifname \
	              }}'\n  cfgsmith extract --config-src sw1.cfg --template-src iface.tpl\n  \
	              cfgsmith check --job sw1.toml"
)]
pub struct CfgsmithCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to a job file (toml, json or yaml). When omitted, `cfgsmith.toml`,
	/// `.cfgsmith.toml` or `.config/cfgsmith.toml` in the current directory is
	/// used if present.
	#[arg(long, short, global = true)]
	pub job: Option<PathBuf>,

	/// Enable verbose output and debug logging.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

/// Inputs shared by every command. Each flag overrides the matching job file
/// field.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
	/// Device configuration as inline text.
	#[arg(long, conflicts_with = "config_src")]
	pub config: Option<String>,

	/// Path to the device configuration.
	#[arg(long)]
	pub config_src: Option<PathBuf>,

	/// Extraction template as inline text.
	#[arg(long, conflicts_with = "template_src")]
	pub template: Option<String>,

	/// Path to the extraction template.
	#[arg(long)]
	pub template_src: Option<PathBuf>,

	/// Output template as inline text. Defaults to the extraction template.
	#[arg(long, conflicts_with = "output_template_src")]
	pub output_template: Option<String>,

	/// Path to the output template.
	#[arg(long)]
	pub output_template_src: Option<PathBuf>,

	/// Skip records with any value starting with this prefix. Repeatable.
	#[arg(long = "ignore", value_name = "PREFIX")]
	pub ignore: Vec<String>,
}

impl SourceArgs {
	/// Convert the flags into a job that can be layered over a job file.
	pub fn into_job(self, dest_path: Option<PathBuf>, dry_run: bool) -> JobConfig {
		JobConfig {
			config: self.config,
			config_src: self.config_src,
			template: self.template,
			template_src: self.template_src,
			output_template: self.output_template,
			output_template_src: self.output_template_src,
			keys_ignore: (!self.ignore.is_empty()).then_some(KeysIgnore::Many(self.ignore)),
			dest_path,
			dry_run: dry_run.then_some(true),
		}
	}
}

#[derive(Subcommand)]
pub enum Commands {
	/// Extract records, filter them, render the output template, and write
	/// the destination when it changed.
	///
	/// Without a destination the rendered text is printed to stdout. With
	/// `--dry-run` nothing is written, but the command still reports whether
	/// the destination would change.
	Render {
		#[command(flatten)]
		sources: SourceArgs,

		/// Write the rendered text to this file.
		#[arg(long)]
		dest: Option<PathBuf>,

		/// Report what would change without writing anything.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Show a line diff between the current destination and the rendered
		/// text.
		#[arg(long, default_value_t = false)]
		diff: bool,

		/// Output format. `json` prints the full run result.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Extract and filter records without rendering anything.
	Extract {
		#[command(flatten)]
		sources: SourceArgs,

		/// Output format. `json` prints kept and ignored records.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Check that the destination is up to date.
	///
	/// Renders without writing and exits with a non-zero status code when
	/// the destination would change. Ideal for CI pipelines.
	Check {
		#[command(flatten)]
		sources: SourceArgs,

		/// The file to compare against.
		#[arg(long)]
		dest: Option<PathBuf>,

		/// Show a line diff when the destination is stale.
		#[arg(long, default_value_t = false)]
		diff: bool,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
