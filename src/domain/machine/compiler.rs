// Copyright 2025 The Machinespec Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::encoder::encode;
use super::legacy;
use super::types::{
    Config, DnsServers, MachineDeployment, MachineDeploymentSpec, MachineSpec,
    MachineTemplateSpec, MachineVersionInfo, NetworkConfig, NodeConfigSource, ProviderSpec,
};
use super::validator::validate_auto_update_enforcement;
use super::version::parse_version;
use crate::domain::cloud::{self, GeneratorContext};
use crate::domain::model::{
    Cluster, Datacenter, NodeDeployment, NodeOperatingSystem, SettingsProvider, UserSshKey,
};
use crate::domain::os;
use crate::infrastructure::constants::{
    ANNOTATION_AUTOSCALER_MAX_SIZE, ANNOTATION_AUTOSCALER_MIN_SIZE,
    ANNOTATION_MACHINE_INITIALIZERS, ANNOTATION_OPERATING_SYSTEM_PROFILE, GENERATE_NAME_SUFFIX,
    INITIALIZER_IPAM, LABEL_MACHINE, LABEL_SYSTEM_CLUSTER, LABEL_SYSTEM_PROJECT,
    MACHINE_DEPLOYMENT_NAMESPACE, MACHINE_LABEL_HASH_LEN,
};
use crate::shared::error::{MachineSpecError, Result};
use k8s_openapi::api::core::v1::Taint;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use tracing::debug;
use uuid::Uuid;

/// Compiles a validated node deployment into a machine deployment.
///
/// The builder only borrows its inputs. Every call to [`build`] produces a
/// new object. Identical inputs produce identical objects as long as the
/// node deployment is named; unnamed ones get a fresh machine label.
///
/// [`build`]: MachineDeploymentBuilder::build
pub struct MachineDeploymentBuilder<'a> {
    node_deployment: &'a NodeDeployment,
    cluster: &'a Cluster,
    datacenter: &'a Datacenter,
    ssh_keys: &'a [UserSshKey],
    settings: &'a dyn SettingsProvider,
}

impl<'a> MachineDeploymentBuilder<'a> {
    pub fn new(
        node_deployment: &'a NodeDeployment,
        cluster: &'a Cluster,
        datacenter: &'a Datacenter,
        settings: &'a dyn SettingsProvider,
    ) -> Self {
        Self {
            node_deployment,
            cluster,
            datacenter,
            ssh_keys: &[],
            settings,
        }
    }

    pub fn ssh_keys(mut self, keys: &'a [UserSshKey]) -> Self {
        self.ssh_keys = keys;
        self
    }

    pub fn build(&self) -> Result<MachineDeployment> {
        let nd = self.node_deployment;

        validate_auto_update_enforcement(nd, self.settings)?;
        let os = nd.spec.template.operating_system.selected()?;

        let machine_label = machine_label(self.cluster, nd);
        debug!(label = %machine_label, "computed machine label");

        let mut md = MachineDeployment {
            metadata: self.metadata(os),
            ..Default::default()
        };

        md.spec = MachineDeploymentSpec {
            replicas: Some(nd.spec.replicas),
            selector: LabelSelector {
                match_labels: Some(BTreeMap::from([(
                    LABEL_MACHINE.to_string(),
                    machine_label.clone(),
                )])),
                ..Default::default()
            },
            template: MachineTemplateSpec {
                metadata: self.template_metadata(&machine_label),
                spec: self.machine_spec(os)?,
            },
            paused: nd.spec.paused.unwrap_or(false),
        };

        debug!(
            name = ?md.metadata.name,
            generate_name = ?md.metadata.generate_name,
            "machine deployment compiled"
        );
        Ok(md)
    }

    fn metadata(&self, os: NodeOperatingSystem<'_>) -> ObjectMeta {
        let nd = self.node_deployment;
        let mut metadata = ObjectMeta {
            namespace: Some(MACHINE_DEPLOYMENT_NAMESPACE.to_string()),
            ..Default::default()
        };

        if nd.name.is_empty() {
            metadata.generate_name = Some(format!("{}{}", self.cluster.name, GENERATE_NAME_SUFFIX));
        } else {
            metadata.name = Some(nd.name.clone());
        }

        let mut annotations = nd.annotations.clone();
        if let Some(profile) = self
            .datacenter
            .spec
            .default_operating_system_profile(os.kind())
        {
            annotations
                .entry(ANNOTATION_OPERATING_SYSTEM_PROFILE.to_string())
                .or_insert_with(|| profile.to_string());
        }
        apply_autoscaler_annotations(
            &mut annotations,
            nd.spec.min_replicas,
            nd.spec.max_replicas,
        );

        metadata.annotations = non_empty(annotations);
        metadata
    }

    fn template_metadata(&self, machine_label: &str) -> ObjectMeta {
        let mut labels = self.system_labels();
        labels.insert(LABEL_MACHINE.to_string(), machine_label.to_string());

        let mut annotations = BTreeMap::new();
        if !self.cluster.spec.machine_networks.is_empty() {
            annotations.insert(
                ANNOTATION_MACHINE_INITIALIZERS.to_string(),
                INITIALIZER_IPAM.to_string(),
            );
        }

        ObjectMeta {
            labels: Some(labels),
            annotations: non_empty(annotations),
            ..Default::default()
        }
    }

    fn machine_spec(&self, os: NodeOperatingSystem<'_>) -> Result<MachineSpec> {
        let template = &self.node_deployment.spec.template;

        let mut node_labels = template.labels.clone();
        node_labels.extend(self.system_labels());

        let taints = template
            .taints
            .iter()
            .map(|taint| Taint {
                key: taint.key.clone(),
                value: Some(taint.value.clone()),
                effect: taint.effect.clone(),
                time_added: None,
            })
            .collect();

        Ok(MachineSpec {
            metadata: ObjectMeta {
                labels: Some(node_labels),
                ..Default::default()
            },
            taints,
            provider_spec: ProviderSpec {
                value: Some(encode("machine config", &self.config(os)?)?),
            },
            versions: MachineVersionInfo {
                kubelet: template.versions.kubelet.clone(),
            },
            config_source: self.config_source()?,
        })
    }

    fn config(&self, os: NodeOperatingSystem<'_>) -> Result<Config> {
        let template = &self.node_deployment.spec.template;
        let ctx = GeneratorContext {
            cluster: self.cluster,
            template,
            os: os.kind(),
        };

        let provider = cloud::generate(ctx, self.datacenter)?;
        let os_config = os::generate(os, provider.provider());
        debug!(
            provider = %provider.provider(),
            operating_system = %os_config.operating_system(),
            "generated provider and operating system specs"
        );

        Ok(Config {
            ssh_public_keys: self
                .ssh_keys
                .iter()
                .map(|key| key.public_key.clone())
                .collect(),
            cloud_provider: provider.provider(),
            cloud_provider_spec: provider.encode()?,
            operating_system: os_config.operating_system(),
            operating_system_spec: os_config.encode()?,
            network: self.network(),
        })
    }

    /// Static node network, with the IP family falling back to the cluster's.
    ///
    /// Omitted for IPv4-only clusters without a static network.
    fn network(&self) -> Option<NetworkConfig> {
        let cluster_family = self.cluster.ip_family();
        match &self.node_deployment.spec.template.network {
            Some(network) => Some(NetworkConfig {
                cidr: network.cidr.clone(),
                gateway: network.gateway.clone(),
                dns: DnsServers {
                    servers: network.dns.servers.clone(),
                },
                ip_family: Some(network.ip_family.unwrap_or(cluster_family)),
            }),
            None if self.cluster.is_ipv4_only() => None,
            None => Some(NetworkConfig {
                ip_family: Some(cluster_family),
                ..Default::default()
            }),
        }
    }

    fn config_source(&self) -> Result<Option<NodeConfigSource>> {
        let nd = self.node_deployment;
        if !nd.spec.dynamic_config.unwrap_or(false) {
            return Ok(None);
        }

        let raw = &nd.spec.template.versions.kubelet;
        let kubelet = parse_version(raw).map_err(|e| MachineSpecError::InvalidVersion {
            version: raw.clone(),
            reason: e.to_string(),
        })?;
        Ok(legacy::dynamic_config_source(nd.spec.dynamic_config, &kubelet))
    }

    fn system_labels(&self) -> BTreeMap<String, String> {
        let mut labels = BTreeMap::new();
        labels.insert(LABEL_SYSTEM_CLUSTER.to_string(), self.cluster.name.clone());
        if let Some(project) = self.cluster.project_id() {
            labels.insert(LABEL_SYSTEM_PROJECT.to_string(), project.to_string());
        }
        labels
    }
}

/// Compiles a node deployment in one call.
pub fn deployment(
    node_deployment: &NodeDeployment,
    cluster: &Cluster,
    datacenter: &Datacenter,
    ssh_keys: &[UserSshKey],
    settings: &dyn SettingsProvider,
) -> Result<MachineDeployment> {
    MachineDeploymentBuilder::new(node_deployment, cluster, datacenter, settings)
        .ssh_keys(ssh_keys)
        .build()
}

/// Sets the autoscaler bounds that are present and removes the ones that are not.
pub fn apply_autoscaler_annotations(
    annotations: &mut BTreeMap<String, String>,
    min_replicas: Option<u32>,
    max_replicas: Option<u32>,
) {
    for (key, value) in [
        (ANNOTATION_AUTOSCALER_MIN_SIZE, min_replicas),
        (ANNOTATION_AUTOSCALER_MAX_SIZE, max_replicas),
    ] {
        match value {
            Some(value) => {
                annotations.insert(key.to_string(), value.to_string());
            }
            None => {
                annotations.remove(key);
            }
        }
    }
}

/// `md-<cluster>-<suffix>`, unique per deployment.
///
/// Named deployments hash the cluster and deployment name, so recompiling
/// keeps the selector. Unnamed ones are created through `generateName` and
/// get a random suffix, otherwise two such deployments would share a selector.
pub fn machine_label(cluster: &Cluster, nd: &NodeDeployment) -> String {
    let mut suffix = if nd.name.is_empty() {
        Uuid::new_v4().simple().to_string()
    } else {
        let mut hasher = Sha256::new();
        hasher.update(cluster.name.as_bytes());
        hasher.update(nd.name.as_bytes());

        let mut hex = String::with_capacity(64);
        for byte in hasher.finalize().iter() {
            let _ = write!(hex, "{:02x}", byte);
        }
        hex
    };
    suffix.truncate(MACHINE_LABEL_HASH_LEN);

    format!("md-{}-{}", cluster.name, suffix)
}

fn non_empty(map: BTreeMap<String, String>) -> Option<BTreeMap<String, String>> {
    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}
