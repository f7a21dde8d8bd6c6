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

//! Provider-specific parts of a node template.
//!
//! On the wire every provider is an optional field of [`NodeCloudSpec`].
//! Inside the crate the spec is only ever read through [`NodeCloud`], which
//! is built once by [`NodeCloudSpec::provider`] and rejects both an empty
//! spec and one that names more than one provider.

use crate::shared::error::{MachineSpecError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Provider tag understood by the machine controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CloudProvider {
    #[serde(rename = "aws")]
    Aws,
    #[serde(rename = "azure")]
    Azure,
    #[serde(rename = "vsphere")]
    VSphere,
    #[serde(rename = "baremetal")]
    Baremetal,
    #[serde(rename = "vmware-cloud-director")]
    VMwareCloudDirector,
    #[serde(rename = "openstack")]
    Openstack,
    #[serde(rename = "hetzner")]
    Hetzner,
    #[serde(rename = "digitalocean")]
    Digitalocean,
    #[serde(rename = "equinixmetal")]
    EquinixMetal,
    #[serde(rename = "gce")]
    Gcp,
    #[serde(rename = "kubevirt")]
    Kubevirt,
    #[serde(rename = "alibaba")]
    Alibaba,
    #[serde(rename = "anexia")]
    Anexia,
    #[serde(rename = "nutanix")]
    Nutanix,
}

impl CloudProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "aws",
            CloudProvider::Azure => "azure",
            CloudProvider::VSphere => "vsphere",
            CloudProvider::Baremetal => "baremetal",
            CloudProvider::VMwareCloudDirector => "vmware-cloud-director",
            CloudProvider::Openstack => "openstack",
            CloudProvider::Hetzner => "hetzner",
            CloudProvider::Digitalocean => "digitalocean",
            CloudProvider::EquinixMetal => "equinixmetal",
            CloudProvider::Gcp => "gce",
            CloudProvider::Kubevirt => "kubevirt",
            CloudProvider::Alibaba => "alibaba",
            CloudProvider::Anexia => "anexia",
            CloudProvider::Nutanix => "nutanix",
        }
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeCloudSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws: Option<AwsNodeSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azure: Option<AzureNodeSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vsphere: Option<VSphereNodeSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baremetal: Option<BaremetalNodeSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vmwareclouddirector: Option<VMwareCloudDirectorNodeSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openstack: Option<OpenstackNodeSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hetzner: Option<HetznerNodeSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digitalocean: Option<DigitaloceanNodeSpec>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "packet")]
    pub equinix: Option<EquinixNodeSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gcp: Option<GcpNodeSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kubevirt: Option<KubevirtNodeSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alibaba: Option<AlibabaNodeSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anexia: Option<AnexiaNodeSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutanix: Option<NutanixNodeSpec>,
}

/// The single provider selected by a node template.
#[derive(Debug, Clone, Copy)]
pub enum NodeCloud<'a> {
    Aws(&'a AwsNodeSpec),
    Azure(&'a AzureNodeSpec),
    VSphere(&'a VSphereNodeSpec),
    Baremetal(&'a BaremetalNodeSpec),
    VMwareCloudDirector(&'a VMwareCloudDirectorNodeSpec),
    Openstack(&'a OpenstackNodeSpec),
    Hetzner(&'a HetznerNodeSpec),
    Digitalocean(&'a DigitaloceanNodeSpec),
    EquinixMetal(&'a EquinixNodeSpec),
    Gcp(&'a GcpNodeSpec),
    Kubevirt(&'a KubevirtNodeSpec),
    Alibaba(&'a AlibabaNodeSpec),
    Anexia(&'a AnexiaNodeSpec),
    Nutanix(&'a NutanixNodeSpec),
}

impl NodeCloud<'_> {
    pub fn kind(&self) -> CloudProvider {
        match self {
            NodeCloud::Aws(_) => CloudProvider::Aws,
            NodeCloud::Azure(_) => CloudProvider::Azure,
            NodeCloud::VSphere(_) => CloudProvider::VSphere,
            NodeCloud::Baremetal(_) => CloudProvider::Baremetal,
            NodeCloud::VMwareCloudDirector(_) => CloudProvider::VMwareCloudDirector,
            NodeCloud::Openstack(_) => CloudProvider::Openstack,
            NodeCloud::Hetzner(_) => CloudProvider::Hetzner,
            NodeCloud::Digitalocean(_) => CloudProvider::Digitalocean,
            NodeCloud::EquinixMetal(_) => CloudProvider::EquinixMetal,
            NodeCloud::Gcp(_) => CloudProvider::Gcp,
            NodeCloud::Kubevirt(_) => CloudProvider::Kubevirt,
            NodeCloud::Alibaba(_) => CloudProvider::Alibaba,
            NodeCloud::Anexia(_) => CloudProvider::Anexia,
            NodeCloud::Nutanix(_) => CloudProvider::Nutanix,
        }
    }
}

impl NodeCloudSpec {
    /// Resolves the one provider this template targets.
    pub fn provider(&self) -> Result<NodeCloud<'_>> {
        let mut set: Vec<NodeCloud<'_>> = Vec::with_capacity(1);

        if let Some(spec) = &self.aws {
            set.push(NodeCloud::Aws(spec));
        }
        if let Some(spec) = &self.azure {
            set.push(NodeCloud::Azure(spec));
        }
        if let Some(spec) = &self.vsphere {
            set.push(NodeCloud::VSphere(spec));
        }
        if let Some(spec) = &self.baremetal {
            set.push(NodeCloud::Baremetal(spec));
        }
        if let Some(spec) = &self.vmwareclouddirector {
            set.push(NodeCloud::VMwareCloudDirector(spec));
        }
        if let Some(spec) = &self.openstack {
            set.push(NodeCloud::Openstack(spec));
        }
        if let Some(spec) = &self.hetzner {
            set.push(NodeCloud::Hetzner(spec));
        }
        if let Some(spec) = &self.digitalocean {
            set.push(NodeCloud::Digitalocean(spec));
        }
        if let Some(spec) = &self.equinix {
            set.push(NodeCloud::EquinixMetal(spec));
        }
        if let Some(spec) = &self.gcp {
            set.push(NodeCloud::Gcp(spec));
        }
        if let Some(spec) = &self.kubevirt {
            set.push(NodeCloud::Kubevirt(spec));
        }
        if let Some(spec) = &self.alibaba {
            set.push(NodeCloud::Alibaba(spec));
        }
        if let Some(spec) = &self.anexia {
            set.push(NodeCloud::Anexia(spec));
        }
        if let Some(spec) = &self.nutanix {
            set.push(NodeCloud::Nutanix(spec));
        }

        match set.len() {
            0 => Err(MachineSpecError::MissingProvider),
            1 => Ok(set[0]),
            _ => Err(MachineSpecError::MultipleProviders(
                set.iter().map(|p| p.kind().as_str()).collect(),
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AwsNodeSpec {
    pub instance_type: String,
    pub volume_size: i32,
    pub volume_type: String,
    pub ami: String,
    pub tags: BTreeMap<String, String>,
    pub availability_zone: String,
    #[serde(rename = "subnetID")]
    pub subnet_id: String,
    #[serde(rename = "assignPublicIP", skip_serializing_if = "Option::is_none")]
    pub assign_public_ip: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_spot_instance: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spot_instance_max_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spot_instance_persistent_request: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spot_instance_interruption_behavior: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebs_volume_encrypted: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AzureNodeSpec {
    pub size: String,
    #[serde(rename = "assignPublicIP")]
    pub assign_public_ip: bool,
    pub tags: BTreeMap<String, String>,
    pub os_disk_size: i32,
    pub data_disk_size: i32,
    pub zones: Vec<String>,
    #[serde(rename = "imageID")]
    pub image_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assign_availability_set: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_accelerated_networking: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VSphereNodeSpec {
    pub cpus: i32,
    pub memory: i32,
    #[serde(rename = "diskSizeGB", skip_serializing_if = "Option::is_none")]
    pub disk_size_gb: Option<i64>,
    pub template: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BaremetalNodeSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tinkerbell: Option<TinkerbellNodeSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TinkerbellNodeSpec {
    pub hardware_ref: HardwareReference,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HardwareReference {
    pub name: String,
    pub namespace: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VMwareCloudDirectorNodeSpec {
    pub cpus: i32,
    pub cpu_cores: i32,
    #[serde(rename = "memoryMB")]
    pub memory_mb: i32,
    #[serde(rename = "diskSizeGB", skip_serializing_if = "Option::is_none")]
    pub disk_size_gb: Option<i64>,
    #[serde(rename = "diskIOPS", skip_serializing_if = "Option::is_none")]
    pub disk_iops: Option<i64>,
    pub template: String,
    pub catalog: String,
    pub storage_profile: String,
    pub ip_allocation_mode: String,
    pub metadata: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizing_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement_policy: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenstackNodeSpec {
    pub flavor: String,
    pub image: String,
    #[serde(rename = "useFloatingIP")]
    pub use_floating_ip: bool,
    pub tags: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_size: Option<i32>,
    pub availability_zone: String,
    pub instance_ready_check_period: String,
    pub instance_ready_check_timeout: String,
    pub server_group: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HetznerNodeSpec {
    #[serde(rename = "type")]
    pub server_type: String,
    pub network: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DigitaloceanNodeSpec {
    pub size: String,
    pub backups: bool,
    pub ipv6: bool,
    pub monitoring: bool,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EquinixNodeSpec {
    pub instance_type: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GcpNodeSpec {
    pub zone: String,
    pub disk_size: i64,
    pub disk_type: String,
    pub machine_type: String,
    pub preemptible: bool,
    pub labels: BTreeMap<String, String>,
    pub tags: Vec<String>,
    pub custom_image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KubevirtNodeSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instancetype: Option<KubevirtResourceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preference: Option<KubevirtResourceRef>,
    pub cpus: String,
    pub memory: String,
    pub primary_disk_os_image: String,
    pub primary_disk_size: String,
    pub primary_disk_storage_class_name: String,
    pub secondary_disks: Vec<KubevirtSecondaryDisk>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KubevirtResourceRef {
    pub name: String,
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KubevirtSecondaryDisk {
    pub size: String,
    pub storage_class_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlibabaNodeSpec {
    pub instance_type: String,
    pub disk_size: String,
    pub disk_type: String,
    #[serde(rename = "vSwitchID")]
    pub vswitch_id: String,
    pub internet_max_bandwidth_out: String,
    pub labels: BTreeMap<String, String>,
    #[serde(rename = "zoneID")]
    pub zone_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnexiaNodeSpec {
    #[serde(rename = "vlanID")]
    pub vlan_id: String,
    #[serde(rename = "templateID")]
    pub template_id: String,
    pub template_build: String,
    pub cpus: i32,
    pub cpu_performance_type: String,
    pub memory: i64,
    /// Deprecated single-disk size, superseded by `disks`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_size: Option<i64>,
    pub disks: Vec<AnexiaDiskConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnexiaDiskConfig {
    pub size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NutanixNodeSpec {
    pub subnet_name: String,
    pub additional_subnet_names: Vec<String>,
    pub image_name: String,
    pub categories: BTreeMap<String, String>,
    pub cpus: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_cores: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_passthrough: Option<bool>,
    #[serde(rename = "memoryMB")]
    pub memory_mb: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_size: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_spec_has_no_provider() {
        let err = NodeCloudSpec::default().provider().unwrap_err();
        assert!(matches!(err, MachineSpecError::MissingProvider));
    }

    #[test]
    fn single_provider_is_selected() {
        let spec = NodeCloudSpec {
            hetzner: Some(HetznerNodeSpec::default()),
            ..Default::default()
        };
        assert_eq!(spec.provider().unwrap().kind(), CloudProvider::Hetzner);
    }

    #[test]
    fn two_providers_are_rejected() {
        let spec = NodeCloudSpec {
            aws: Some(AwsNodeSpec::default()),
            azure: Some(AzureNodeSpec::default()),
            ..Default::default()
        };
        match spec.provider() {
            Err(MachineSpecError::MultipleProviders(names)) => {
                assert_eq!(names, vec!["aws", "azure"]);
            }
            other => panic!("expected MultipleProviders, got {:?}", other),
        }
    }

    #[test]
    fn packet_alias_maps_to_equinix() {
        let spec: NodeCloudSpec =
            serde_yaml::from_str("packet:\n  instanceType: c3.small.x86\n").unwrap();
        assert_eq!(spec.provider().unwrap().kind(), CloudProvider::EquinixMetal);
    }
}
