//! Compilation commands

use crate::domain::config::{apply_overrides, parse_properties, PlatformConfig};
use crate::domain::machine::version::parse_version;
use crate::domain::machine::{
    deployment, validate, validate_auto_update_enforcement, MachineDeployment,
};
use crate::domain::model::{Cluster, Datacenter, GlobalSettings, NodeDeployment, UserSshKey};
use crate::infrastructure::kubernetes::connect;
use crate::infrastructure::{FileSettingsSource, KubeSettingsSource, SettingsSource};
use clap::{Args, Parser, ValueEnum};
use semver::Version;
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs::read_to_string;
use tracing::info;

/// Inputs shared by every command
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Node deployment manifest (YAML or JSON)
    #[arg(long, short = 'f', value_name = "PATH")]
    pub node_deployment: String,

    /// Cluster manifest (YAML or JSON)
    #[arg(long, value_name = "PATH")]
    pub cluster: String,

    /// Platform configuration file with datacenters and settings (TOML)
    #[arg(long, value_name = "PATH")]
    pub config: String,

    /// Datacenter name from the platform configuration
    #[arg(long, short = 'd')]
    pub datacenter: String,

    /// Public key files to install on the nodes (repeatable)
    /// The key name is the file name without extension
    #[arg(long = "ssh-key", value_name = "PATH")]
    pub ssh_keys: Vec<String>,

    /// Control plane version
    /// If not provided, will use spec.version from the cluster manifest
    #[arg(long)]
    pub control_plane_version: Option<String>,

    /// Global settings file (YAML or TOML), replaces the settings of the platform configuration
    #[arg(long, value_name = "PATH", conflicts_with = "settings_from_cluster")]
    pub settings: Option<String>,

    /// Read global settings from the seed cluster
    #[arg(long)]
    pub settings_from_cluster: bool,

    /// Path to kubeconfig file
    /// If not specified, uses default kubeconfig resolution (KUBECONFIG env or ~/.kube/config)
    #[arg(long)]
    pub kubeconfig: Option<String>,

    /// Kubernetes context to use
    /// If not specified, uses current context from kubeconfig
    #[arg(long)]
    pub context: Option<String>,

    /// Dynamic properties to override node deployment fields (-D key=value)
    ///
    /// Scalars: nodedeployment.name, nodedeployment.replicas, nodedeployment.min-replicas,
    /// nodedeployment.max-replicas, nodedeployment.paused, nodedeployment.dynamic-config,
    /// nodedeployment.kubelet
    /// Maps: nodedeployment.labels, nodedeployment.annotations (format: key1=val1,key2=val2)
    /// Single entries: nodedeployment.label.KEY, nodedeployment.annotation.KEY
    ///
    /// Example: -Dnodedeployment.replicas=5 -Dnodedeployment.label.team=infra
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    pub properties: Vec<String>,
}

/// Everything a compilation needs, loaded and resolved
#[derive(Debug, Clone)]
pub struct CompileInputs {
    pub node_deployment: NodeDeployment,
    pub cluster: Cluster,
    pub datacenter: Datacenter,
    pub ssh_keys: Vec<UserSshKey>,
    pub settings: GlobalSettings,
    pub control_plane: Version,
}

impl InputArgs {
    pub async fn load(&self) -> anyhow::Result<CompileInputs> {
        let mut node_deployment: NodeDeployment = read_document(&self.node_deployment).await?;
        let cluster: Cluster = read_document(&self.cluster).await?;

        if !self.properties.is_empty() {
            let properties = parse_properties(&self.properties)
                .map_err(|e| anyhow::anyhow!("Failed to parse dynamic properties: {}", e))?;
            apply_overrides(&properties, &mut node_deployment)?;
            info!("Applied {} dynamic properties", properties.len());
        }

        let content = read_to_string(&self.config)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", self.config, e))?;
        let platform = PlatformConfig::from_toml(&content).map_err(|e| {
            anyhow::anyhow!("Failed to load configuration from {}: {}", self.config, e)
        })?;
        let datacenter = platform.datacenter(&self.datacenter)?;

        let raw_version = self
            .control_plane_version
            .clone()
            .or_else(|| cluster.spec.version.clone())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "control plane version is required (use --control-plane-version or set spec.version in the cluster manifest)"
                )
            })?;
        let control_plane = parse_version(&raw_version)
            .map_err(|e| anyhow::anyhow!("Invalid control plane version {}: {}", raw_version, e))?;

        let settings = self.load_settings(platform.settings).await?;

        Ok(CompileInputs {
            node_deployment,
            cluster,
            datacenter,
            ssh_keys: self.load_ssh_keys().await?,
            settings,
            control_plane,
        })
    }

    async fn load_settings(&self, configured: GlobalSettings) -> anyhow::Result<GlobalSettings> {
        if self.settings_from_cluster {
            let client = connect(self.kubeconfig.as_deref(), self.context.clone()).await?;
            let settings = KubeSettingsSource::new(client).fetch().await?;
            info!("Using global settings from the seed cluster");
            return Ok(settings);
        }

        if let Some(path) = &self.settings {
            let settings = FileSettingsSource::new(path).fetch().await.map_err(|e| {
                anyhow::anyhow!("Failed to load settings from {}: {}", path, e)
            })?;
            info!("Using global settings from {}", path);
            return Ok(settings);
        }

        Ok(configured)
    }

    async fn load_ssh_keys(&self) -> anyhow::Result<Vec<UserSshKey>> {
        let mut keys = Vec::with_capacity(self.ssh_keys.len());
        for path in &self.ssh_keys {
            let public_key = read_to_string(path)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to read ssh key {}: {}", path, e))?;
            let name = Path::new(path)
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or(path.as_str());
            keys.push(UserSshKey::new(name, public_key.trim()));
        }
        Ok(keys)
    }
}

impl CompileInputs {
    /// Validates the node deployment and returns it with the kubelet resolved
    pub fn validated(&self) -> anyhow::Result<NodeDeployment> {
        let nd = validate(self.node_deployment.clone(), &self.control_plane)?;
        validate_auto_update_enforcement(&nd, &self.settings)?;
        Ok(nd)
    }

    pub fn compile(&self) -> anyhow::Result<MachineDeployment> {
        let nd = self.validated()?;
        let md = deployment(
            &nd,
            &self.cluster,
            &self.datacenter,
            &self.ssh_keys,
            &self.settings,
        )?;
        info!(
            node_deployment = %nd.name,
            cluster = %self.cluster.name,
            datacenter = %self.datacenter.name,
            "Compiled machine deployment"
        );
        Ok(md)
    }
}

/// Reads a YAML or JSON document, chosen by extension
async fn read_document<T: DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let content = read_to_string(path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e))?;

    let document = match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?,
        _ => serde_yaml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?,
    };
    Ok(document)
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

#[derive(Parser, Debug, Clone)]
pub struct CompileCommand {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format
    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Yaml)]
    pub output: OutputFormat,
}

impl CompileCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let md = self.input.load().await?.compile()?;
        println!("{}", render(&md, self.output)?);
        Ok(())
    }
}

pub fn render(md: &MachineDeployment, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Yaml => serde_yaml::to_string(md)?,
        OutputFormat::Json => serde_json::to_string_pretty(md)?,
    })
}

#[derive(Parser, Debug, Clone)]
pub struct ValidateCommand {
    #[command(flatten)]
    pub input: InputArgs,
}

impl ValidateCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let nd = self.input.load().await?.validated()?;
        println!(
            "✓ Node deployment {} is valid (kubelet {})",
            nd.name, nd.spec.template.versions.kubelet
        );
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct DescribeCommand {
    #[command(flatten)]
    pub input: InputArgs,
}

impl DescribeCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        use crate::cli::display::{DeploymentSummary, TableRenderer};

        let md = self.input.load().await?.compile()?;
        let output =
            TableRenderer::new().render_deployment(&DeploymentSummary::from_deployment(&md));
        println!("{}", output);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CONFIG: &str = r#"
[datacenters.aws-eu-west-1.spec.aws]
region = "eu-west-1"

[datacenters.aws-eu-west-1.spec.aws.images]
ubuntu = "ami-0123456789"
"#;

    const NODE_DEPLOYMENT: &str = r#"
name: workers
spec:
  replicas: 2
  template:
    cloud:
      aws:
        instanceType: t3.medium
        availabilityZone: eu-west-1a
        subnetID: subnet-1
    operatingSystem:
      ubuntu: {}
"#;

    const CLUSTER: &str = r#"{"name": "c1", "spec": {"version": "1.27.3"}}"#;

    fn write(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    fn input(
        nd: &tempfile::NamedTempFile,
        cluster: &tempfile::NamedTempFile,
        config: &tempfile::NamedTempFile,
    ) -> InputArgs {
        InputArgs {
            node_deployment: nd.path().display().to_string(),
            cluster: cluster.path().display().to_string(),
            config: config.path().display().to_string(),
            datacenter: "aws-eu-west-1".to_string(),
            ssh_keys: Vec::new(),
            control_plane_version: None,
            settings: None,
            settings_from_cluster: false,
            kubeconfig: None,
            context: None,
            properties: vec!["nodedeployment.replicas=4".to_string()],
        }
    }

    #[tokio::test]
    async fn test_load_and_compile() {
        let nd = write(".yaml", NODE_DEPLOYMENT);
        let cluster = write(".json", CLUSTER);
        let config = write(".toml", CONFIG);
        let key = write(".pub", "ssh-ed25519 AAAA admin@example\n");

        let mut args = input(&nd, &cluster, &config);
        args.ssh_keys.push(key.path().display().to_string());

        let inputs = args.load().await.unwrap();
        assert_eq!(inputs.control_plane, Version::new(1, 27, 3));
        assert_eq!(inputs.node_deployment.spec.replicas, 4);
        assert_eq!(inputs.ssh_keys[0].public_key, "ssh-ed25519 AAAA admin@example");

        let md = inputs.compile().unwrap();
        assert_eq!(md.spec.replicas, Some(4));
        assert_eq!(md.spec.template.spec.versions.kubelet, "1.27.3");

        let json = render(&md, OutputFormat::Json).unwrap();
        assert!(json.contains("\"cloudProvider\": \"aws\""));
    }

    #[tokio::test]
    async fn test_unreadable_inputs_are_reported() {
        let nd = write(".yaml", NODE_DEPLOYMENT);
        let cluster = write(".json", CLUSTER);
        let config = write(".toml", CONFIG);

        let mut args = input(&nd, &cluster, &config);
        args.ssh_keys.push("/nonexistent/admin.pub".to_string());
        let err = args.load().await.unwrap_err();
        assert!(err.to_string().contains("Failed to read ssh key /nonexistent/admin.pub"));

        let mut args = input(&nd, &cluster, &config);
        args.config = "/nonexistent/platform.toml".to_string();
        let err = args.load().await.unwrap_err();
        assert!(err.to_string().contains("Failed to read /nonexistent/platform.toml"));
    }

    #[tokio::test]
    async fn test_missing_control_plane_version() {
        let nd = write(".yaml", NODE_DEPLOYMENT);
        let cluster = write(".json", r#"{"name": "c1"}"#);
        let config = write(".toml", CONFIG);

        let err = input(&nd, &cluster, &config).load().await.unwrap_err();
        assert!(err.to_string().contains("control plane version is required"));
    }

    #[tokio::test]
    async fn test_settings_file_replaces_configured_settings() {
        let nd = write(".yaml", NODE_DEPLOYMENT);
        let cluster = write(".json", CLUSTER);
        let config = write(".toml", CONFIG);
        let settings = write(
            ".yaml",
            "machineDeploymentOptions:\n  autoUpdatesEnabled: true\n  autoUpdatesEnforced: true\n",
        );

        let mut args = input(&nd, &cluster, &config);
        args.settings = Some(settings.path().display().to_string());

        let inputs = args.load().await.unwrap();
        assert!(inputs.settings.enforces_auto_updates());
    }
}
