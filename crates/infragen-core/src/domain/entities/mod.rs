//! Configuration data model: every source document plus the merged result.

mod catalog;
mod inventory;
mod master;
mod merged;
mod orchestrator;
mod package;
mod platform;
mod render_context;

/// A loosely-typed mapping, as found in override documents and the
/// kubekey/kind settings.
pub type Document = serde_json::Map<String, serde_json::Value>;

pub use catalog::{
    Application, ApplicationSource, ApplicationSyncAutomated, ApplicationSyncPolicy, BusinessApps,
    PlatformStacks, StackConfig,
};
pub use inventory::{DnsConfig, Host, HostsConfig, Network, NetworksConfig, NtpConfig, SshConfig};
pub use master::{
    BusinessDeployment, ContainerOrchestrationChoice, InfrastructureChoice, MasterConfig,
    PlatformDeployment,
};
pub use merged::MergedConfig;
pub use orchestrator::{KubesprayDocument, KubespraySettings, OrchestratorSettings};
pub use package::{DEFAULT_PACKAGE_VERSION, PackageManifest};
pub use platform::{
    AwsDocument, AwsInstanceDefaults, AwsRootVolume, AwsSettings, AwsSubnet, AwsVpc,
    AzureDocument, AzureNsg, AzureOsDisk, AzureSettings, AzureSourceImageRef, AzureSubnet,
    AzureVmDefaults, AzureVnet, GcpBootDisk, GcpDocument, GcpInstanceDefaults, GcpNetwork,
    GcpSecondaryIpRange, GcpSettings, GcpSubnet, PlatformSettings, ProxmoxCloudinit,
    ProxmoxDocument, ProxmoxNetwork, ProxmoxSettings, ProxmoxTemplate, ProxmoxVmDefaults,
};
pub use render_context::RenderContext;
