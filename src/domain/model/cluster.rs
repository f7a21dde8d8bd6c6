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

use super::node_deployment::IpFamily;
use crate::infrastructure::constants::{CLUSTER_NAMESPACE_PREFIX, LABEL_PROJECT_ID};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::IpAddr;

/// The user cluster the machines will join.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Cluster {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub spec: ClusterSpec,
    pub status: ClusterStatus,
}

impl Cluster {
    /// Project owning the cluster, if labeled.
    pub fn project_id(&self) -> Option<&str> {
        self.labels
            .get(LABEL_PROJECT_ID)
            .map(String::as_str)
            .filter(|id| !id.is_empty())
    }

    /// Namespace of the cluster's control plane on the seed.
    pub fn namespace_name(&self) -> String {
        if self.status.namespace_name.is_empty() {
            format!("{}{}", CLUSTER_NAMESPACE_PREFIX, self.name)
        } else {
            self.status.namespace_name.clone()
        }
    }

    pub fn ip_family(&self) -> IpFamily {
        if let Some(family) = self.spec.cluster_network.ip_family {
            return family;
        }

        let blocks = &self.spec.cluster_network.pods.cidr_blocks;
        let v6 = blocks.iter().filter(|b| is_ipv6_block(b)).count();
        match (blocks.len() - v6, v6) {
            (0, n) if n > 0 => IpFamily::Ipv6,
            (_, 0) => IpFamily::Ipv4,
            _ => IpFamily::DualStack,
        }
    }

    pub fn is_ipv4_only(&self) -> bool {
        self.ip_family() == IpFamily::Ipv4
    }

    pub fn is_ipv6_only(&self) -> bool {
        self.ip_family() == IpFamily::Ipv6
    }

    pub fn is_dual_stack(&self) -> bool {
        self.ip_family() == IpFamily::DualStack
    }
}

fn is_ipv6_block(block: &str) -> bool {
    block
        .split('/')
        .next()
        .and_then(|addr| addr.parse::<IpAddr>().ok())
        .map(|addr| addr.is_ipv6())
        .unwrap_or(false)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterSpec {
    /// Control plane version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub cloud: ClusterCloudSpec,
    pub machine_networks: Vec<MachineNetwork>,
    pub cluster_network: ClusterNetwork,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterStatus {
    pub namespace_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MachineNetwork {
    pub cidr: String,
    pub gateway: String,
    pub dns_servers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterNetwork {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_family: Option<IpFamily>,
    pub pods: NetworkRanges,
    pub services: NetworkRanges,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkRanges {
    pub cidr_blocks: Vec<String>,
}

/// Cluster-level provider configuration, filled in when the cluster was created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterCloudSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws: Option<AwsCloudSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azure: Option<AzureCloudSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vsphere: Option<VSphereCloudSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vmwareclouddirector: Option<VMwareCloudDirectorCloudSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openstack: Option<OpenstackCloudSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hetzner: Option<HetznerCloudSpec>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "packet")]
    pub equinix: Option<EquinixCloudSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gcp: Option<GcpCloudSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutanix: Option<NutanixCloudSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AwsCloudSpec {
    #[serde(rename = "vpcID")]
    pub vpc_id: String,
    #[serde(rename = "securityGroupID")]
    pub security_group_id: String,
    pub instance_profile_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AzureCloudSpec {
    pub resource_group: String,
    pub vnet_resource_group: String,
    pub vnet_name: String,
    pub subnet_name: String,
    pub route_table_name: String,
    pub security_group: String,
    pub availability_set: String,
    pub load_balancer_sku: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VSphereCloudSpec {
    pub folder: String,
    pub resource_pool: String,
    pub datastore: String,
    pub datastore_cluster: String,
    pub vm_net_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VMwareCloudDirectorCloudSpec {
    pub organization: String,
    pub vdc: String,
    pub vapp: String,
    pub ovdc_network: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenstackCloudSpec {
    pub network: String,
    #[serde(rename = "subnetID")]
    pub subnet_id: String,
    pub security_groups: String,
    #[serde(rename = "floatingIPPool")]
    pub floating_ip_pool: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HetznerCloudSpec {
    pub network: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EquinixCloudSpec {
    #[serde(rename = "projectID")]
    pub project_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GcpCloudSpec {
    pub network: String,
    pub subnetwork: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NutanixCloudSpec {
    pub cluster_name: String,
    pub project_name: String,
}
