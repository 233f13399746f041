mod common;

use cfgsmith_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;
use serde_json::Value;

use crate::common::PROXY_ARP_TEMPLATE;
use crate::common::SWITCH_CONFIG;
use crate::common::cfgsmith_cmd;
use crate::common::write_file;

const RENDERED_VLANS: &str = "interface Vlan1\n no ip proxy-arp\ninterface Vlan30\n no ip proxy-arp";

#[test]
fn render_prints_to_stdout_without_destination() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config = write_file(tmp.path(), "sw1.cfg", SWITCH_CONFIG);

	cfgsmith_cmd()
		.current_dir(tmp.path())
		.arg("render")
		.arg("--config-src")
		.arg(&config)
		.arg("--template")
		.arg(PROXY_ARP_TEMPLATE)
		.arg("--ignore")
		.arg("GigabitEthernet")
		.assert()
		.success()
		.stdout(format!("{RENDERED_VLANS}\n"));

	Ok(())
}

#[test]
fn render_writes_destination_once() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config = write_file(tmp.path(), "sw1.cfg", SWITCH_CONFIG);
	let dest = tmp.path().join("sw1.out.cfg");

	cfgsmith_cmd()
		.current_dir(tmp.path())
		.arg("render")
		.arg("--config-src")
		.arg(&config)
		.arg("--template")
		.arg(PROXY_ARP_TEMPLATE)
		.arg("--ignore")
		.arg("GigabitEthernet")
		.arg("--dest")
		.arg(&dest)
		.assert()
		.success()
		.stdout(predicates::str::contains("Wrote"));

	assert_eq!(std::fs::read_to_string(&dest)?, RENDERED_VLANS);

	cfgsmith_cmd()
		.current_dir(tmp.path())
		.arg("render")
		.arg("--config-src")
		.arg(&config)
		.arg("--template")
		.arg(PROXY_ARP_TEMPLATE)
		.arg("--ignore")
		.arg("GigabitEthernet")
		.arg("--dest")
		.arg(&dest)
		.assert()
		.success()
		.stdout(predicates::str::contains("already up to date"));

	Ok(())
}

#[test]
fn render_dry_run_does_not_write() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config = write_file(tmp.path(), "sw1.cfg", SWITCH_CONFIG);
	let dest = tmp.path().join("sw1.out.cfg");

	cfgsmith_cmd()
		.current_dir(tmp.path())
		.arg("render")
		.arg("--config-src")
		.arg(&config)
		.arg("--template")
		.arg(PROXY_ARP_TEMPLATE)
		.arg("--dest")
		.arg(&dest)
		.arg("--dry-run")
		.assert()
		.success()
		.stdout(predicates::str::contains("Dry run: would write"));

	assert!(!dest.exists());

	Ok(())
}

#[test]
fn render_uses_discovered_job_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), "sw1.cfg", SWITCH_CONFIG);
	write_file(
		tmp.path(),
		"cfgsmith.toml",
		r#"config_src = "sw1.cfg"
template = """
interface {{ ifname }}
 no ip proxy-arp"""
keys_ignore = "GigabitEthernet"
dest_path = "out.cfg"
"#,
	);

	cfgsmith_cmd()
		.current_dir(tmp.path())
		.arg("render")
		.assert()
		.success();

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("out.cfg"))?,
		RENDERED_VLANS
	);

	Ok(())
}

#[test]
fn render_flags_override_job_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), "sw1.cfg", SWITCH_CONFIG);
	let job = write_file(
		tmp.path(),
		"job.yaml",
		"config_src: sw1.cfg\ntemplate: \"interface {{ ifname }}\"\nkeys_ignore: [Vlan]\n",
	);

	cfgsmith_cmd()
		.current_dir(tmp.path())
		.arg("--job")
		.arg(&job)
		.arg("render")
		.arg("--ignore")
		.arg("GigabitEthernet")
		.assert()
		.success()
		.stdout("interface Vlan1\ninterface Vlan30\n");

	Ok(())
}

#[test]
fn render_json_reports_records_and_sources() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config = write_file(tmp.path(), "sw1.cfg", SWITCH_CONFIG);

	let output = cfgsmith_cmd()
		.current_dir(tmp.path())
		.arg("render")
		.arg("--config-src")
		.arg(&config)
		.arg("--template")
		.arg(PROXY_ARP_TEMPLATE)
		.arg("--ignore")
		.arg("GigabitEthernet")
		.arg("--format")
		.arg("json")
		.output()?;

	assert!(output.status.success());
	let value: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(value["rendered_config"], RENDERED_VLANS);
	assert_eq!(value["render_data"][1]["ifname"], "Vlan30");
	assert_eq!(value["ignored_instances"][0]["ifname"], "GigabitEthernet0/1");
	assert_eq!(
		value["source_used"]["config_source"],
		format!("file:{}", config.display())
	);
	assert_eq!(value["source_used"]["template_source"], "inline");
	assert_eq!(value["changed"], false);

	Ok(())
}

#[test]
fn render_without_match_exits_with_error() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config = write_file(tmp.path(), "sw1.cfg", SWITCH_CONFIG);

	cfgsmith_cmd()
		.current_dir(tmp.path())
		.arg("render")
		.arg("--config-src")
		.arg(&config)
		.arg("--template")
		.arg("router ospf {{ pid }}")
		.assert()
		.code(2)
		.stderr(predicates::str::contains("did not match any line"));

	Ok(())
}

#[test]
fn render_json_error_surface() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	let output = cfgsmith_cmd()
		.current_dir(tmp.path())
		.arg("render")
		.arg("--config-src")
		.arg(tmp.path().join("missing.cfg"))
		.arg("--template")
		.arg(PROXY_ARP_TEMPLATE)
		.arg("--format")
		.arg("json")
		.output()?;

	assert_eq!(output.status.code(), Some(2));
	let value: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(value["ok"], false);
	assert_eq!(value["kind"], "SourceNotFound");
	assert!(value["msg"].as_str().is_some_and(|msg| msg.contains("missing.cfg")));

	Ok(())
}

#[test]
fn render_missing_field_names_the_field() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config = write_file(tmp.path(), "sw1.cfg", SWITCH_CONFIG);
	let dest = write_file(tmp.path(), "out.cfg", "previous");

	cfgsmith_cmd()
		.current_dir(tmp.path())
		.arg("render")
		.arg("--config-src")
		.arg(&config)
		.arg("--template")
		.arg("interface {{ ifname }}\n description {{ desc }}")
		.arg("--dest")
		.arg(&dest)
		.assert()
		.code(2)
		.stderr(predicates::str::contains("desc").and(predicates::str::contains("record 1")));

	assert_eq!(std::fs::read_to_string(&dest)?, "previous");

	Ok(())
}

#[test]
fn render_rejects_conflicting_sources() -> AnyEmptyResult {
	cfgsmith_cmd()
		.arg("render")
		.arg("--config")
		.arg("hostname sw1")
		.arg("--config-src")
		.arg("sw1.cfg")
		.arg("--template")
		.arg("hostname {{ name }}")
		.assert()
		.failure()
		.stderr(predicates::str::contains("cannot be used with"));

	Ok(())
}
