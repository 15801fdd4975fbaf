//! Typed views over the loosely-typed environment override documents.
//!
//! Override documents are free-form mappings. Each recognized key is pulled
//! into an `Option` field; a key that is absent or holds a value of the wrong
//! type reads as `None`, never as an override to an empty value.

use serde_json::Value;
use tracing::debug;

use crate::domain::entities::{Document, SshConfig};

pub const DEFAULT_SSH_USER: &str = "ansible";
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Everything recognized in `infrastructure/environments/<env>.yaml`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfrastructureOverrides {
    pub ssh: Option<SshOverride>,
    pub proxmox: Option<ProxmoxOverride>,
    pub aws: Option<RegionOverride>,
    pub gcp: Option<RegionOverride>,
    pub azure: Option<AzureOverride>,
}

impl InfrastructureOverrides {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            ssh: sub_document(doc, "ssh").map(SshOverride::from_document),
            proxmox: sub_document(doc, "proxmox").map(ProxmoxOverride::from_document),
            aws: sub_document(doc, "aws").map(RegionOverride::from_document),
            gcp: sub_document(doc, "gcp").map(RegionOverride::from_document),
            azure: sub_document(doc, "azure").map(AzureOverride::from_document),
        }
    }
}

/// The `ssh` block. Present only when the document has an `ssh` mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SshOverride {
    pub user: Option<String>,
    pub port: Option<u16>,
    pub key_path: Option<String>,
    pub public_key: Option<String>,
}

impl SshOverride {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            user: string_field(doc, "user"),
            port: port_field(doc, "port"),
            key_path: string_field(doc, "key_path"),
            public_key: string_field(doc, "public_key"),
        }
    }

    /// Fill every missing field with its default.
    pub fn into_config(self) -> SshConfig {
        SshConfig {
            user: self.user.unwrap_or_else(|| DEFAULT_SSH_USER.to_owned()),
            port: self.port.unwrap_or(DEFAULT_SSH_PORT),
            key_path: self.key_path.unwrap_or_default(),
            public_key: self.public_key.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxmoxOverride {
    /// Parsed but not applied to any setting.
    pub endpoint: Option<String>,
}

impl ProxmoxOverride {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            endpoint: string_field(doc, "endpoint"),
        }
    }
}

/// AWS and GCP both accept a `region` override.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionOverride {
    pub region: Option<String>,
}

impl RegionOverride {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            region: non_empty_string_field(doc, "region"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AzureOverride {
    pub location: Option<String>,
}

impl AzureOverride {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            location: non_empty_string_field(doc, "location"),
        }
    }
}

/// Everything recognized in `container-orchestration/environments/<env>.yaml`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrchestrationOverrides {
    pub cluster_overrides: Option<Document>,
}

impl OrchestrationOverrides {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            cluster_overrides: sub_document(doc, "cluster_overrides").cloned(),
        }
    }
}

/// A nested mapping under `key`, if that key holds one.
pub(crate) fn sub_document<'a>(doc: &'a Document, key: &str) -> Option<&'a Document> {
    match doc.get(key) {
        Some(Value::Object(map)) => Some(map),
        Some(other) => {
            debug!(key, kind = value_kind(other), "ignoring non-mapping override");
            None
        }
        None => None,
    }
}

fn string_field(doc: &Document, key: &str) -> Option<String> {
    doc.get(key).and_then(Value::as_str).map(str::to_owned)
}

// Empty strings never overwrite a loaded value.
fn non_empty_string_field(doc: &Document, key: &str) -> Option<String> {
    string_field(doc, key).filter(|s| !s.is_empty())
}

/// A TCP port. Anything outside `0..=65535` is logged and ignored.
fn port_field(doc: &Document, key: &str) -> Option<u16> {
    let value = doc.get(key)?;
    if !(value.is_i64() || value.is_u64()) {
        debug!(key, kind = value_kind(value), "ignoring non-integer port");
        return None;
    }
    let port = value.as_u64().and_then(|p| u16::try_from(p).ok());
    if port.is_none() {
        debug!(key, %value, "port out of range; override ignored");
    }
    port
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
