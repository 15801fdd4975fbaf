//! Optional config package manifest (`package.json`).

use serde::{Deserialize, Serialize};

/// Version recorded in the generation manifest when a package ships no
/// `package.json`.
pub const DEFAULT_PACKAGE_VERSION: &str = "v1.0.0";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageManifest {
    pub id: String,
    pub version: String,
    pub description: String,
}

impl PackageManifest {
    /// Version to record for `package`, falling back to the default when
    /// the manifest is absent or leaves the field empty.
    pub fn version_or_default(manifest: Option<&Self>) -> String {
        manifest
            .map(|m| m.version.as_str())
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_PACKAGE_VERSION)
            .to_owned()
    }
}
