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
use crate::domain::model::datacenter::AwsDatacenterSpec;
use crate::domain::model::node_cloud::AwsNodeSpec;
use crate::infrastructure::constants::{
    AWS_DEFAULT_DISK_SIZE, AWS_DEFAULT_DISK_TYPE, LABEL_SYSTEM_CLUSTER, LABEL_SYSTEM_PROJECT,
};
use crate::shared::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    pub region: String,
    pub availability_zone: String,
    pub vpc_id: String,
    pub subnet_id: String,
    #[serde(rename = "securityGroupIDs")]
    pub security_group_ids: Vec<String>,
    pub instance_profile: String,
    pub instance_type: String,
    pub ami: String,
    pub disk_size: i32,
    pub disk_type: String,
    pub ebs_volume_encrypted: bool,
    pub tags: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assign_public_ip: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_spot_instance: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spot_instance_config: Option<SpotInstanceConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotInstanceConfig {
    pub max_price: String,
    pub persistent_request: bool,
    pub interruption_behavior: String,
}

pub fn raw_config(
    ctx: GeneratorContext<'_>,
    node: &AwsNodeSpec,
    dc: &AwsDatacenterSpec,
) -> Result<RawConfig> {
    let cloud = ctx.cluster.spec.cloud.aws.clone().unwrap_or_default();

    let mut config = RawConfig {
        region: dc.region.clone(),
        availability_zone: node.availability_zone.clone(),
        vpc_id: cloud.vpc_id,
        subnet_id: node.subnet_id.clone(),
        security_group_ids: Vec::new(),
        instance_profile: cloud.instance_profile_name,
        instance_type: node.instance_type.clone(),
        ami: image_or_default(&node.ami, &dc.images, ctx.os),
        disk_size: if node.volume_size <= 0 {
            AWS_DEFAULT_DISK_SIZE
        } else {
            node.volume_size
        },
        disk_type: or_default(&node.volume_type, AWS_DEFAULT_DISK_TYPE),
        ebs_volume_encrypted: node.ebs_volume_encrypted.unwrap_or(false),
        tags: tags(SystemTags::of(ctx.cluster), &node.tags),
        assign_public_ip: node.assign_public_ip,
        is_spot_instance: node.is_spot_instance,
        spot_instance_config: None,
    };

    if !cloud.security_group_id.is_empty() {
        config.security_group_ids.push(cloud.security_group_id);
    }

    if node.is_spot_instance == Some(true) {
        config.spot_instance_config = Some(SpotInstanceConfig {
            max_price: node.spot_instance_max_price.clone().unwrap_or_default(),
            persistent_request: node.spot_instance_persistent_request.unwrap_or(false),
            interruption_behavior: node
                .spot_instance_interruption_behavior
                .clone()
                .unwrap_or_default(),
        });
    }

    Ok(config)
}

fn tags(system: SystemTags<'_>, caller: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut tags = caller.clone();
    tags.insert(format!("kubernetes.io/cluster/{}", system.cluster), String::new());
    tags.insert(LABEL_SYSTEM_CLUSTER.to_string(), system.cluster.to_string());
    if let Some(project) = system.project {
        tags.insert(LABEL_SYSTEM_PROJECT.to_string(), project.to_string());
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cloud::test_support::{cluster, ctx};
    use crate::domain::model::NodeSpec;

    fn datacenter() -> AwsDatacenterSpec {
        let mut dc = AwsDatacenterSpec {
            region: "eu-west-1".to_string(),
            ..Default::default()
        };
        dc.images
            .insert("ubuntu".to_string(), "ami-ubuntu".to_string());
        dc
    }

    #[test]
    fn empty_volume_settings_fall_back_to_defaults() {
        let cluster = cluster("c1", None);
        let template = NodeSpec::default();
        let config = raw_config(ctx(&cluster, &template), &AwsNodeSpec::default(), &datacenter())
            .unwrap();

        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.disk_type, "gp2");
        assert_eq!(config.disk_size, 25);
        assert_eq!(config.ami, "ami-ubuntu");
        assert!(config.spot_instance_config.is_none());
    }

    #[test]
    fn negative_volume_size_falls_back_to_default() {
        let cluster = cluster("c1", None);
        let template = NodeSpec::default();
        let node = AwsNodeSpec {
            volume_size: -10,
            ..Default::default()
        };

        let config = raw_config(ctx(&cluster, &template), &node, &datacenter()).unwrap();
        assert_eq!(config.disk_size, 25);

        let node = AwsNodeSpec {
            volume_size: 80,
            ..Default::default()
        };
        let config = raw_config(ctx(&cluster, &template), &node, &datacenter()).unwrap();
        assert_eq!(config.disk_size, 80);
    }

    #[test]
    fn system_tags_win_over_caller_tags() {
        let cluster = cluster("c1", Some("p1"));
        let template = NodeSpec::default();
        let mut node = AwsNodeSpec::default();
        node.tags.insert("team".to_string(), "infra".to_string());
        node.tags
            .insert("system/cluster".to_string(), "spoofed".to_string());

        let config = raw_config(ctx(&cluster, &template), &node, &datacenter()).unwrap();

        assert_eq!(config.tags["kubernetes.io/cluster/c1"], "");
        assert_eq!(config.tags["system/cluster"], "c1");
        assert_eq!(config.tags["system/project"], "p1");
        assert_eq!(config.tags["team"], "infra");
    }

    #[test]
    fn spot_config_only_when_requested() {
        let cluster = cluster("c1", None);
        let template = NodeSpec::default();
        let node = AwsNodeSpec {
            is_spot_instance: Some(true),
            spot_instance_max_price: Some("0.05".to_string()),
            ami: "ami-custom".to_string(),
            ..Default::default()
        };

        let config = raw_config(ctx(&cluster, &template), &node, &datacenter()).unwrap();
        let spot = config.spot_instance_config.unwrap();
        assert_eq!(spot.max_price, "0.05");
        assert!(!spot.persistent_request);
        assert_eq!(config.ami, "ami-custom");
    }

    #[test]
    fn cluster_network_settings_are_copied() {
        let mut cluster = cluster("c1", None);
        cluster.spec.cloud.aws = Some(crate::domain::model::cluster::AwsCloudSpec {
            vpc_id: "vpc-1".to_string(),
            security_group_id: "sg-1".to_string(),
            instance_profile_name: "nodes".to_string(),
        });
        let template = NodeSpec::default();

        let config = raw_config(ctx(&cluster, &template), &AwsNodeSpec::default(), &datacenter())
            .unwrap();
        assert_eq!(config.vpc_id, "vpc-1");
        assert_eq!(config.security_group_ids, vec!["sg-1"]);
        assert_eq!(config.instance_profile, "nodes");
    }
}
