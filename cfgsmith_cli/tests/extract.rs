mod common;

use cfgsmith_core::AnyEmptyResult;
use serde_json::Value;
use serde_json::json;

use crate::common::SWITCH_CONFIG;
use crate::common::cfgsmith_cmd;
use crate::common::write_file;

const INTERFACE_TEMPLATE: &str =
	"interface {{ ifname }}\n description {{ desc }}\n ip address {{ ip }} {{ mask }}";

#[test]
fn extract_prints_one_record_per_line() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config = write_file(tmp.path(), "sw1.cfg", SWITCH_CONFIG);
	let template = write_file(tmp.path(), "iface.tpl", INTERFACE_TEMPLATE);

	cfgsmith_cmd()
		.current_dir(tmp.path())
		.arg("extract")
		.arg("--config-src")
		.arg(&config)
		.arg("--template-src")
		.arg(&template)
		.arg("--ignore")
		.arg("Vlan3")
		.assert()
		.success()
		.stdout(
			"ifname=\"GigabitEthernet0/1\" desc=\"uplink\"\nifname=\"Vlan1\" ip=\"10.0.0.1\" \
			 mask=\"255.255.255.0\"\nignored: ifname=\"Vlan30\"\n",
		);

	Ok(())
}

#[test]
fn extract_json_lists_kept_and_ignored_records() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config = write_file(tmp.path(), "sw1.cfg", SWITCH_CONFIG);

	let output = cfgsmith_cmd()
		.current_dir(tmp.path())
		.arg("extract")
		.arg("--config-src")
		.arg(&config)
		.arg("--template")
		.arg(INTERFACE_TEMPLATE)
		.arg("--ignore")
		.arg("GigabitEthernet")
		.arg("--format")
		.arg("json")
		.output()?;

	assert!(output.status.success());
	let value: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(
		value,
		json!({
			"render_data": [
				{ "ifname": "Vlan1", "ip": "10.0.0.1", "mask": "255.255.255.0" },
				{ "ifname": "Vlan30" },
			],
			"ignored_instances": [
				{ "ifname": "GigabitEthernet0/1", "desc": "uplink" },
			],
		})
	);

	Ok(())
}

#[test]
fn extract_reports_compile_errors() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config = write_file(tmp.path(), "sw1.cfg", SWITCH_CONFIG);

	let output = cfgsmith_cmd()
		.current_dir(tmp.path())
		.arg("extract")
		.arg("--config-src")
		.arg(&config)
		.arg("--template")
		.arg("interface {{ ifname")
		.arg("--format")
		.arg("json")
		.output()?;

	assert_eq!(output.status.code(), Some(2));
	let value: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(value["kind"], "CompileError");

	Ok(())
}

#[test]
fn extract_without_config_is_a_job_error() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	cfgsmith_cmd()
		.current_dir(tmp.path())
		.arg("extract")
		.arg("--template")
		.arg("interface {{ ifname }}")
		.assert()
		.code(2)
		.stderr(predicates::str::contains("`config_src` is required"));

	Ok(())
}
