//! Platform-specific settings (`platforms/<platform>.yaml`).
//!
//! Each platform document nests its settings under a key named after the
//! platform, e.g. `aws: { region: ... }`. Only the document matching the
//! master config selection is ever read.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::value_objects::Platform;

/// Settings for the active platform. One variant per platform that has a
/// settings document.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformSettings {
    Proxmox(ProxmoxSettings),
    Aws(AwsSettings),
    Gcp(GcpSettings),
    Azure(AzureSettings),
}

impl PlatformSettings {
    /// The platform these settings belong to.
    pub fn platform(&self) -> Platform {
        match self {
            Self::Proxmox(_) => Platform::Proxmox,
            Self::Aws(_) => Platform::Aws,
            Self::Gcp(_) => Platform::Gcp,
            Self::Azure(_) => Platform::Azure,
        }
    }
}

// ── Proxmox ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxmoxDocument {
    pub proxmox: ProxmoxSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxmoxSettings {
    pub node_name: String,
    pub datastore: String,
    pub iso_storage: String,
    pub template: ProxmoxTemplate,
    pub network: ProxmoxNetwork,
    pub vm_defaults: ProxmoxVmDefaults,
    pub cloudinit: ProxmoxCloudinit,
    pub pool: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxmoxTemplate {
    pub id: u32,
    pub name: String,
    pub cores_per_socket: u32,
    pub sockets: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxmoxNetwork {
    pub bridge: String,
    pub model: String,
    pub firewall: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxmoxVmDefaults {
    pub os_type: String,
    pub boot_order: String,
    pub scsihw: String,
    pub agent: String,
    pub balloon: u64,
    pub cpu_type: String,
    pub hotplug: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxmoxCloudinit {
    pub enabled: bool,
    pub storage: String,
}

// ── AWS ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsDocument {
    pub aws: AwsSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsSettings {
    pub region: String,
    pub availability_zones: Vec<String>,
    pub vpc: AwsVpc,
    pub subnets: Vec<AwsSubnet>,
    pub instance_defaults: AwsInstanceDefaults,
    pub security_groups: Vec<Value>,
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsVpc {
    pub cidr_block: String,
    pub enable_dns_hostnames: bool,
    pub enable_dns_support: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsSubnet {
    pub name: String,
    pub cidr_block: String,
    pub availability_zone: String,
    pub map_public_ip_on_launch: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsInstanceDefaults {
    pub ami: String,
    pub instance_type: String,
    pub key_name: String,
    pub monitoring: bool,
    pub ebs_optimized: bool,
    pub root_volume: AwsRootVolume,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsRootVolume {
    pub volume_type: String,
    pub volume_size: u32,
    pub delete_on_termination: bool,
}

// ── GCP ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GcpDocument {
    pub gcp: GcpSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GcpSettings {
    pub project_id: String,
    pub region: String,
    pub zone: String,
    pub network: GcpNetwork,
    pub subnets: Vec<GcpSubnet>,
    pub instance_defaults: GcpInstanceDefaults,
    pub firewall_rules: Vec<Value>,
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GcpNetwork {
    pub name: String,
    pub auto_create_subnetworks: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GcpSubnet {
    pub name: String,
    pub ip_cidr_range: String,
    pub region: String,
    pub private_ip_google_access: bool,
    pub secondary_ip_ranges: Vec<GcpSecondaryIpRange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GcpSecondaryIpRange {
    pub range_name: String,
    pub ip_cidr_range: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GcpInstanceDefaults {
    pub machine_type: String,
    pub image_family: String,
    pub image_project: String,
    pub boot_disk: GcpBootDisk,
    pub network_tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GcpBootDisk {
    pub size_gb: u32,
    #[serde(rename = "type")]
    pub disk_type: String,
}

// ── Azure ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureDocument {
    pub azure: AzureSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureSettings {
    pub location: String,
    pub resource_group_name: String,
    pub vnet: AzureVnet,
    pub subnets: Vec<AzureSubnet>,
    pub vm_defaults: AzureVmDefaults,
    pub network_security_group: AzureNsg,
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureVnet {
    pub name: String,
    pub address_space: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureSubnet {
    pub name: String,
    pub address_prefixes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureVmDefaults {
    pub size: String,
    pub admin_username: String,
    pub disable_password_authentication: bool,
    pub os_disk: AzureOsDisk,
    pub source_image_reference: AzureSourceImageRef,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureOsDisk {
    pub caching: String,
    pub storage_account_type: String,
    pub disk_size_gb: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureSourceImageRef {
    pub publisher: String,
    pub offer: String,
    pub sku: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureNsg {
    pub name: String,
    pub security_rules: Vec<Value>,
}
