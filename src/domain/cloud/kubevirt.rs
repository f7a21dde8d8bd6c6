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

//! KubeVirt virtual machines running inside an infrastructure cluster.
//!
//! The primary disk image is a URL the importer downloads, a registry image,
//! or a data volume in the infrastructure cluster. Bare data volume names
//! are qualified with the user cluster's namespace.

use super::{image_or_default, GeneratorContext};
use crate::domain::model::datacenter::{KubevirtDatacenterSpec, KubevirtDnsConfig};
use crate::domain::model::node_cloud::{KubevirtNodeSpec, KubevirtResourceRef};
use crate::shared::error::{MachineSpecError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

const PROVIDER: &str = "kubevirt";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    pub cluster_name: String,
    pub virtual_machine: VirtualMachine,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub dns_policy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_config: Option<DnsConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachine {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instancetype: Option<ResourceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preference: Option<ResourceRef>,
    pub template: Template,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub name: String,
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cpus: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub memory: String,
    pub primary_disk: PrimaryDisk,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub secondary_disks: Vec<SecondaryDisk>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryDisk {
    pub os_image: String,
    pub size: String,
    pub storage_class_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryDisk {
    pub size: String,
    pub storage_class_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DnsConfig {
    pub nameservers: Vec<String>,
    pub searches: Vec<String>,
}

impl From<&KubevirtDnsConfig> for DnsConfig {
    fn from(config: &KubevirtDnsConfig) -> Self {
        Self {
            nameservers: config.nameservers.clone(),
            searches: config.searches.clone(),
        }
    }
}

impl From<&KubevirtResourceRef> for ResourceRef {
    fn from(reference: &KubevirtResourceRef) -> Self {
        Self {
            name: reference.name.clone(),
            kind: reference.kind.clone(),
        }
    }
}

pub fn raw_config(
    ctx: GeneratorContext<'_>,
    node: &KubevirtNodeSpec,
    dc: &KubevirtDatacenterSpec,
) -> Result<RawConfig> {
    let image = image_or_default(&node.primary_disk_os_image, &dc.images, ctx.os);
    if image.is_empty() {
        return Err(MachineSpecError::missing_field(
            PROVIDER,
            format!("primaryDiskOSImage for operating system {}", ctx.os),
        ));
    }
    let os_image = qualify_image(&image, &ctx.cluster.namespace_name());

    Ok(RawConfig {
        cluster_name: ctx.cluster.name.clone(),
        virtual_machine: VirtualMachine {
            instancetype: node.instancetype.as_ref().map(ResourceRef::from),
            preference: node.preference.as_ref().map(ResourceRef::from),
            template: Template {
                cpus: node.cpus.clone(),
                memory: node.memory.clone(),
                primary_disk: PrimaryDisk {
                    os_image,
                    size: node.primary_disk_size.clone(),
                    storage_class_name: node.primary_disk_storage_class_name.clone(),
                },
                secondary_disks: node
                    .secondary_disks
                    .iter()
                    .map(|disk| SecondaryDisk {
                        size: disk.size.clone(),
                        storage_class_name: disk.storage_class_name.clone(),
                    })
                    .collect(),
            },
        },
        dns_policy: dc.dns_policy.clone(),
        dns_config: dc.dns_config.as_ref().map(DnsConfig::from),
    })
}

static IMAGE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?|docker|oci)://").expect("image url pattern is valid")
});

/// `<namespace>/<data volume>` with DNS-1123 names.
static DATA_VOLUME_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?/[a-z0-9]([-a-z0-9.]*[a-z0-9])?$")
        .expect("data volume reference pattern is valid")
});

/// Resolves the primary disk source.
///
/// URLs and data volume references pass through. Other references with a
/// path are registry images and get the `docker://` scheme; a bare name is a
/// data volume in the cluster namespace.
fn qualify_image(image: &str, namespace: &str) -> String {
    if IMAGE_URL.is_match(image) || DATA_VOLUME_REF.is_match(image) {
        return image.to_string();
    }
    if image.contains('/') {
        return format!("docker://{}", image);
    }
    format!("{}/{}", namespace, image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cloud::test_support::{cluster, ctx};
    use crate::domain::model::NodeSpec;

    fn node(image: &str) -> KubevirtNodeSpec {
        KubevirtNodeSpec {
            primary_disk_os_image: image.to_string(),
            primary_disk_size: "10Gi".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn image_references_are_qualified() {
        assert_eq!(
            qualify_image("http://images/ubuntu.img", "cluster-c1"),
            "http://images/ubuntu.img"
        );
        assert_eq!(
            qualify_image("docker://quay.io/os/ubuntu", "cluster-c1"),
            "docker://quay.io/os/ubuntu"
        );
        assert_eq!(
            qualify_image("images/ubuntu-22.04", "cluster-c1"),
            "images/ubuntu-22.04"
        );
        assert_eq!(
            qualify_image("ubuntu-22.04", "cluster-c1"),
            "cluster-c1/ubuntu-22.04"
        );
    }

    #[test]
    fn registry_images_get_docker_scheme() {
        assert_eq!(
            qualify_image("registry.io/img:tag", "cluster-c1"),
            "docker://registry.io/img:tag"
        );
        assert_eq!(
            qualify_image("quay.io/os/ubuntu", "cluster-c1"),
            "docker://quay.io/os/ubuntu"
        );
        assert_eq!(
            qualify_image("Images/ubuntu", "cluster-c1"),
            "docker://Images/ubuntu"
        );
    }

    #[test]
    fn datacenter_image_and_dns_are_used() {
        let cluster = cluster("c1", None);
        let template = NodeSpec::default();
        let mut dc = KubevirtDatacenterSpec {
            dns_policy: "None".to_string(),
            dns_config: Some(KubevirtDnsConfig {
                nameservers: vec!["8.8.8.8".to_string()],
                searches: Vec::new(),
            }),
            ..Default::default()
        };
        dc.images
            .insert("ubuntu".to_string(), "ubuntu-dv".to_string());

        let config = raw_config(ctx(&cluster, &template), &node(""), &dc).unwrap();
        assert_eq!(
            config.virtual_machine.template.primary_disk.os_image,
            "cluster-c1/ubuntu-dv"
        );
        assert_eq!(config.dns_policy, "None");
        assert_eq!(config.dns_config.unwrap().nameservers, vec!["8.8.8.8"]);
    }

    #[test]
    fn image_is_required() {
        let cluster = cluster("c1", None);
        let template = NodeSpec::default();
        let err = raw_config(
            ctx(&cluster, &template),
            &node(""),
            &KubevirtDatacenterSpec::default(),
        )
        .unwrap_err();
        assert!(matches!(err, MachineSpecError::MissingField { .. }));
    }
}
