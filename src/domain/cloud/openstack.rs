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

use super::{image_or_default, or_default, GeneratorContext, SystemTags};
use crate::domain::model::datacenter::OpenstackDatacenterSpec;
use crate::domain::model::node_cloud::OpenstackNodeSpec;
use crate::shared::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    pub identity_endpoint: String,
    pub region: String,
    pub availability_zone: String,
    pub image: String,
    pub flavor: String,
    pub network: String,
    pub subnet: String,
    pub security_groups: Vec<String>,
    #[serde(rename = "floatingIPPool")]
    pub floating_ip_pool: String,
    pub trust_device_path: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_disk_size_gb: Option<i32>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub instance_ready_check_period: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub instance_ready_check_timeout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub server_group: String,
    pub tags: BTreeMap<String, String>,
}

pub fn raw_config(
    ctx: GeneratorContext<'_>,
    node: &OpenstackNodeSpec,
    dc: &OpenstackDatacenterSpec,
) -> Result<RawConfig> {
    let cloud = ctx.cluster.spec.cloud.openstack.clone().unwrap_or_default();

    let floating_ip_pool = if node.use_floating_ip || dc.enforce_floating_ip {
        cloud.floating_ip_pool
    } else {
        String::new()
    };

    let security_groups = cloud
        .security_groups
        .split(',')
        .map(str::trim)
        .filter(|group| !group.is_empty())
        .map(str::to_string)
        .collect();

    Ok(RawConfig {
        identity_endpoint: dc.auth_url.clone(),
        region: dc.region.clone(),
        availability_zone: or_default(&node.availability_zone, &dc.availability_zone),
        image: image_or_default(&node.image, &dc.images, ctx.os),
        flavor: node.flavor.clone(),
        network: cloud.network,
        subnet: cloud.subnet_id,
        security_groups,
        floating_ip_pool,
        trust_device_path: dc.trust_device_path,
        root_disk_size_gb: node.disk_size,
        instance_ready_check_period: node.instance_ready_check_period.clone(),
        instance_ready_check_timeout: node.instance_ready_check_timeout.clone(),
        server_group: node.server_group.clone(),
        tags: tags(SystemTags::of(ctx.cluster), &node.tags),
    })
}

fn tags(system: SystemTags<'_>, caller: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut tags = caller.clone();
    tags.insert("kubernetes-cluster".to_string(), system.cluster.to_string());
    tags.insert("system-cluster".to_string(), system.cluster.to_string());
    if let Some(project) = system.project {
        tags.insert("system-project".to_string(), project.to_string());
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cloud::test_support::{cluster, ctx};
    use crate::domain::model::cluster::OpenstackCloudSpec;
    use crate::domain::model::{Cluster, NodeSpec};

    fn cluster_with_pool() -> Cluster {
        let mut cluster = cluster("c1", Some("p1"));
        cluster.spec.cloud.openstack = Some(OpenstackCloudSpec {
            network: "net".to_string(),
            security_groups: "sg-a, sg-b".to_string(),
            floating_ip_pool: "public".to_string(),
            ..Default::default()
        });
        cluster
    }

    #[test]
    fn floating_ip_pool_only_when_requested() {
        let cluster = cluster_with_pool();
        let template = NodeSpec::default();
        let dc = OpenstackDatacenterSpec::default();

        let config = raw_config(ctx(&cluster, &template), &OpenstackNodeSpec::default(), &dc)
            .unwrap();
        assert_eq!(config.floating_ip_pool, "");
        assert_eq!(config.security_groups, vec!["sg-a", "sg-b"]);

        let node = OpenstackNodeSpec {
            use_floating_ip: true,
            ..Default::default()
        };
        let config = raw_config(ctx(&cluster, &template), &node, &dc).unwrap();
        assert_eq!(config.floating_ip_pool, "public");
    }

    #[test]
    fn datacenter_can_enforce_floating_ip() {
        let cluster = cluster_with_pool();
        let template = NodeSpec::default();
        let dc = OpenstackDatacenterSpec {
            enforce_floating_ip: true,
            trust_device_path: true,
            ..Default::default()
        };

        let config = raw_config(ctx(&cluster, &template), &OpenstackNodeSpec::default(), &dc)
            .unwrap();
        assert_eq!(config.floating_ip_pool, "public");
        assert!(config.trust_device_path);
        assert_eq!(config.tags["kubernetes-cluster"], "c1");
        assert_eq!(config.tags["system-project"], "p1");
    }
}
