#![allow(dead_code)]

use std::path::Path;
use std::path::PathBuf;

use assert_cmd::Command;

pub const SWITCH_CONFIG: &str = "hostname sw1
!
interface GigabitEthernet0/1
 description uplink
 switchport mode trunk
!
interface Vlan1
 ip address 10.0.0.1 255.255.255.0
 ip proxy-arp
!
interface Vlan30
 ip proxy-arp
!
end
";

pub const PROXY_ARP_TEMPLATE: &str = "interface {{ ifname }}\n no ip proxy-arp";

pub fn cfgsmith_cmd() -> Command {
	let mut cmd =
		Command::cargo_bin("cfgsmith").unwrap_or_else(|e| panic!("cfgsmith binary: {e}"));
	cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
	cmd
}

/// Write `content` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
	let path = dir.join(name);
	std::fs::write(&path, content).unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
	path
}
