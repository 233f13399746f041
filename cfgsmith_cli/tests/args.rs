use cfgsmith_cli::CfgsmithCli;
use cfgsmith_cli::Commands;
use cfgsmith_cli::OutputFormat;
use cfgsmith_core::KeysIgnore;
use clap::Parser;

#[test]
fn render_arguments_become_a_job() {
	let cli = CfgsmithCli::try_parse_from([
		"cfgsmith",
		"render",
		"--config-src",
		"sw1.cfg",
		"--template",
		"interface {{ ifname }}",
		"--ignore",
		"Gi",
		"--ignore",
		"Lo",
		"--dest",
		"out.cfg",
		"--dry-run",
	])
	.unwrap_or_else(|e| panic!("parse: {e}"));

	let Some(Commands::Render {
		sources,
		dest,
		dry_run,
		format,
		..
	}) = cli.command
	else {
		panic!("expected the render command");
	};
	assert!(matches!(format, OutputFormat::Text));

	let job = sources.into_job(dest, dry_run);
	assert_eq!(job.config_src, Some("sw1.cfg".into()));
	assert_eq!(job.template.as_deref(), Some("interface {{ ifname }}"));
	assert_eq!(
		job.keys_ignore,
		Some(KeysIgnore::Many(vec!["Gi".to_string(), "Lo".to_string()]))
	);
	assert_eq!(job.dest_path, Some("out.cfg".into()));
	assert_eq!(job.dry_run, Some(true));
}

#[test]
fn unset_flags_do_not_override_the_job_file() {
	let cli = CfgsmithCli::try_parse_from(["cfgsmith", "--verbose", "extract"])
		.unwrap_or_else(|e| panic!("parse: {e}"));
	assert!(cli.verbose);

	let Some(Commands::Extract { sources, .. }) = cli.command else {
		panic!("expected the extract command");
	};
	let job = sources.into_job(None, false);
	assert_eq!(job, Default::default());
}

#[test]
fn inline_and_file_template_conflict() {
	let result = CfgsmithCli::try_parse_from([
		"cfgsmith",
		"extract",
		"--template",
		"x",
		"--template-src",
		"x.tpl",
	]);
	assert!(result.is_err());
}
