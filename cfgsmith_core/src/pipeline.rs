use std::path::PathBuf;

use serde::Serialize;

use crate::CfgResult;
use crate::IgnorePrefixes;
use crate::Record;
use crate::Source;
use crate::SourcesUsed;
use crate::compile_template;
use crate::engine::render_records;
use crate::extract;
use crate::partition;
use crate::writer::write_if_changed;

/// Everything a pipeline run needs.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
	/// Device configuration to scan.
	pub config: Source,
	/// Extraction template.
	pub template: Source,
	/// Output template. Defaults to the extraction template when absent.
	pub output_template: Option<Source>,
	pub ignore_prefixes: IgnorePrefixes,
	/// Where to persist the rendered text, if anywhere.
	pub dest_path: Option<PathBuf>,
	/// Compute the outcome without touching the destination.
	pub dry_run: bool,
}

/// The filesystem-free part of a run: rendered text and the records behind
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
	pub rendered: String,
	pub kept: Vec<Record>,
	pub ignored: Vec<Record>,
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineResult {
	#[serde(rename = "rendered_config")]
	pub rendered: String,
	#[serde(rename = "render_data")]
	pub kept: Vec<Record>,
	#[serde(rename = "ignored_instances")]
	pub ignored: Vec<Record>,
	#[serde(rename = "source_used")]
	pub sources: SourcesUsed,
	pub changed: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub dest_path: Option<PathBuf>,
}

/// Compile the extraction template and scan `config` with it.
pub fn extract_records(config: &str, template: &str) -> CfgResult<Vec<Record>> {
	let compiled = compile_template(template)?;
	extract(&compiled, config)
}

/// Run compile, match, filter and render over text that is already loaded.
/// Nothing here touches the filesystem.
pub fn render_text(
	config: &str,
	template: &str,
	output_template: &str,
	ignore_prefixes: &IgnorePrefixes,
) -> CfgResult<RenderOutcome> {
	let records = extract_records(config, template)?;
	let split = partition(records, ignore_prefixes);
	let rendered = render_records(output_template, &split.kept)?;

	Ok(RenderOutcome {
		rendered,
		kept: split.kept,
		ignored: split.ignored,
	})
}

/// Load the inputs, render, and write the destination when one is given and
/// its content differs. Any failing stage aborts the run before the write.
pub fn run_pipeline(request: &PipelineRequest) -> CfgResult<PipelineResult> {
	let config = request.config.load()?;
	let template = request.template.load()?;
	let output_template = request
		.output_template
		.as_ref()
		.map(Source::load)
		.transpose()?;

	let sources = SourcesUsed {
		config_source: config.provenance,
		template_source: template.provenance,
		output_template_source: output_template
			.as_ref()
			.map(|loaded| loaded.provenance.clone()),
	};
	let output_text = output_template
		.as_ref()
		.map_or(template.text.as_str(), |loaded| loaded.text.as_str());

	let outcome = render_text(
		&config.text,
		&template.text,
		output_text,
		&request.ignore_prefixes,
	)?;

	let changed = match &request.dest_path {
		Some(path) => write_if_changed(path, &outcome.rendered, request.dry_run)?.changed,
		None => false,
	};

	tracing::debug!(
		kept = outcome.kept.len(),
		ignored = outcome.ignored.len(),
		changed,
		"pipeline finished"
	);

	Ok(PipelineResult {
		rendered: outcome.rendered,
		kept: outcome.kept,
		ignored: outcome.ignored,
		sources,
		changed,
		dest_path: request.dest_path.clone(),
	})
}
