//! Platform-agnostic inventory: hosts (`hosts.yaml`) and networks (`networks.yaml`).
//!
//! Hosts and networks are not cross-checked against each other.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostsConfig {
    pub hosts: Vec<Host>,
}

/// One machine in the inventory, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Host {
    pub name: String,
    pub role: String,
    pub ip: String,
    pub cpu: u32,
    /// MB
    pub memory: u64,
    /// GB
    pub disk: u64,
    pub labels: Vec<String>,
    pub groups: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworksConfig {
    pub networks: Vec<Network>,
    pub dns: DnsConfig,
    pub ntp: NtpConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Network {
    pub name: String,
    pub vlan_id: u32,
    pub cidr: String,
    pub gateway: String,
    pub dns_servers: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsConfig {
    pub domain: String,
    pub search_domains: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NtpConfig {
    pub servers: Vec<String>,
}

/// SSH connection settings taken from the `infrastructure` override document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SshConfig {
    pub user: String,
    pub port: u16,
    pub key_path: String,
    pub public_key: String,
}
