use std::path::Path;
use std::path::PathBuf;
use std::process;

use cfgsmith_cli::CfgsmithCli;
use cfgsmith_cli::Commands;
use cfgsmith_cli::OutputFormat;
use cfgsmith_cli::SourceArgs;
use cfgsmith_core::AnyError;
use cfgsmith_core::AnyResult;
use cfgsmith_core::CfgError;
use cfgsmith_core::JobConfig;
use cfgsmith_core::PipelineRequest;
use cfgsmith_core::PipelineResult;
use cfgsmith_core::Record;
use cfgsmith_core::extract_records;
use cfgsmith_core::partition;
use cfgsmith_core::run_pipeline;
use clap::Parser;
use owo_colors::OwoColorize;
use serde::Serialize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

/// Global options every command needs.
struct Context {
	job: Option<PathBuf>,
	verbose: bool,
}

/// Failure surface for `--format json`.
#[derive(Serialize)]
struct ErrorReport<'a> {
	ok: bool,
	kind: &'a str,
	msg: String,
}

/// Records printed by `extract --format json`.
#[derive(Serialize)]
struct ExtractReport<'a> {
	render_data: &'a [Record],
	ignored_instances: &'a [Record],
}

fn main() {
	let CfgsmithCli {
		command,
		job,
		verbose,
		no_color,
	} = CfgsmithCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let ctx = Context { job, verbose };
	let json = matches!(
		command,
		Some(
			Commands::Render {
				format: OutputFormat::Json,
				..
			} | Commands::Extract {
				format: OutputFormat::Json,
				..
			}
		)
	);

	let result = match command {
		Some(Commands::Render {
			sources,
			dest,
			dry_run,
			diff,
			format,
		}) => run_render(&ctx, sources, dest, dry_run, diff, format),
		Some(Commands::Extract { sources, format }) => run_extract(&ctx, sources, format),
		Some(Commands::Check {
			sources,
			dest,
			diff,
		}) => run_check(&ctx, sources, dest, diff),
		None => {
			eprintln!("No subcommand specified. Run `cfgsmith --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		report_error(e, json);
		process::exit(2);
	}
}

fn init_tracing(verbose: bool, use_color: bool) {
	let default_filter = if verbose {
		"cfgsmith=debug,cfgsmith_core=debug"
	} else {
		"warn"
	};
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.init();
}

fn report_error(error: AnyError, json: bool) {
	match error.downcast::<CfgError>() {
		Ok(error) => {
			if json {
				print_json_error(error.kind(), error.to_string());
			} else {
				// Render through miette for help text and error codes.
				let report: miette::Report = (*error).into();
				eprintln!("{report:?}");
			}
		}
		Err(error) => {
			if json {
				print_json_error("Error", error.to_string());
			} else {
				eprintln!("{} {error}", colored!("error:", red));
			}
		}
	}
}

fn print_json_error(kind: &str, msg: String) {
	let report = ErrorReport {
		ok: false,
		kind,
		msg,
	};
	match serde_json::to_string(&report) {
		Ok(payload) => println!("{payload}"),
		Err(e) => eprintln!("{} {e}", colored!("error:", red)),
	}
}

/// Layer command-line flags over the job file, if any, and validate the
/// result.
fn build_request(ctx: &Context, overrides: JobConfig) -> AnyResult<PipelineRequest> {
	let base = match &ctx.job {
		Some(path) => JobConfig::load_file(path)?,
		None => {
			let cwd = std::env::current_dir()?;
			JobConfig::load(&cwd)?.unwrap_or_default()
		}
	};

	let request = base.merge(overrides).into_request()?;
	tracing::debug!(
		dest = ?request.dest_path,
		dry_run = request.dry_run,
		"resolved job"
	);
	Ok(request)
}

fn run_render(
	ctx: &Context,
	sources: SourceArgs,
	dest: Option<PathBuf>,
	dry_run: bool,
	show_diff: bool,
	format: OutputFormat,
) -> AnyResult<()> {
	let request = build_request(ctx, sources.into_job(dest, dry_run))?;
	let previous = if show_diff {
		read_current(request.dest_path.as_deref())
	} else {
		None
	};
	let result = run_pipeline(&request)?;

	match format {
		OutputFormat::Json => {
			println!("{}", serde_json::to_string_pretty(&result)?);
		}
		OutputFormat::Text => {
			if ctx.verbose {
				print_summary(&result);
			}

			match &result.dest_path {
				None => println!("{}", result.rendered),
				Some(path) => print_write_status(path, result.changed, request.dry_run),
			}
		}
	}

	if show_diff && result.changed {
		print_diff(previous.as_deref().unwrap_or_default(), &result.rendered);
	}

	Ok(())
}

fn run_extract(ctx: &Context, sources: SourceArgs, format: OutputFormat) -> AnyResult<()> {
	let request = build_request(ctx, sources.into_job(None, false))?;
	let config = request.config.load()?;
	let template = request.template.load()?;
	let records = extract_records(&config.text, &template.text)?;
	let split = partition(records, &request.ignore_prefixes);

	match format {
		OutputFormat::Json => {
			let report = ExtractReport {
				render_data: &split.kept,
				ignored_instances: &split.ignored,
			};
			println!("{}", serde_json::to_string_pretty(&report)?);
		}
		OutputFormat::Text => {
			if ctx.verbose {
				println!(
					"{}",
					colored!(
						format!(
							"Extracted {} record(s): {} kept, {} ignored",
							split.kept.len() + split.ignored.len(),
							split.kept.len(),
							split.ignored.len()
						),
						bold
					)
				);
			}

			for record in &split.kept {
				println!("{}", format_record(record));
			}
			for record in &split.ignored {
				println!("{} {}", colored!("ignored:", yellow), format_record(record));
			}
		}
	}

	Ok(())
}

fn run_check(
	ctx: &Context,
	sources: SourceArgs,
	dest: Option<PathBuf>,
	show_diff: bool,
) -> AnyResult<()> {
	let request = build_request(ctx, sources.into_job(dest, true))?;

	let Some(path) = request.dest_path.clone() else {
		return Err(CfgError::InvalidJob(
			"`check` needs a destination: pass --dest or set dest_path".to_string(),
		)
		.into());
	};

	let previous = read_current(Some(&path));
	let result = run_pipeline(&request)?;

	if !result.changed {
		println!(
			"{} {} is up to date.",
			colored!("Check passed:", green),
			path.display()
		);
		return Ok(());
	}

	println!("{} {} is out of date.", colored!("stale:", red), path.display());
	if show_diff {
		print_diff(previous.as_deref().unwrap_or_default(), &result.rendered);
	}
	println!("\nRun `cfgsmith render` to update it.");
	process::exit(1);
}

fn read_current(path: Option<&Path>) -> Option<String> {
	path.and_then(|path| std::fs::read_to_string(path).ok())
}

fn print_write_status(path: &Path, changed: bool, dry_run: bool) {
	match (changed, dry_run) {
		(false, _) => println!("{} is already up to date.", path.display()),
		(true, true) => {
			println!(
				"{} would write {}",
				colored!("Dry run:", yellow),
				path.display()
			);
		}
		(true, false) => println!("{} {}", colored!("Wrote", green), path.display()),
	}
}

fn print_summary(result: &PipelineResult) {
	println!("{}", colored!("Sources:", bold));
	println!("  config:   {}", result.sources.config_source);
	println!("  template: {}", result.sources.template_source);
	if let Some(output) = &result.sources.output_template_source {
		println!("  output:   {output}");
	}
	println!(
		"Rendered {} record(s), ignored {}.",
		result.kept.len(),
		result.ignored.len()
	);
}

fn format_record(record: &Record) -> String {
	record
		.iter()
		.map(|(name, value)| format!("{name}={value:?}"))
		.collect::<Vec<_>>()
		.join(" ")
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
	eprintln!();
}
