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

use super::{image_or_default, GeneratorContext, SystemTags};
use crate::domain::model::datacenter::NutanixDatacenterSpec;
use crate::domain::model::node_cloud::NutanixNodeSpec;
use crate::shared::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
    pub allow_insecure: bool,
    pub cluster_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub project_name: String,
    pub subnet_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
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

pub fn raw_config(
    ctx: GeneratorContext<'_>,
    node: &NutanixNodeSpec,
    dc: &NutanixDatacenterSpec,
) -> Result<RawConfig> {
    let cloud = ctx.cluster.spec.cloud.nutanix.clone().unwrap_or_default();
    let system = SystemTags::of(ctx.cluster);

    let mut categories = node.categories.clone();
    categories.insert("KKPCluster".to_string(), system.cluster.to_string());
    if let Some(project) = system.project {
        categories.insert("KKPProject".to_string(), project.to_string());
    }

    Ok(RawConfig {
        endpoint: dc.endpoint.clone(),
        port: dc.port,
        allow_insecure: dc.allow_insecure,
        cluster_name: cloud.cluster_name,
        project_name: cloud.project_name,
        subnet_name: node.subnet_name.clone(),
        additional_subnet_names: node.additional_subnet_names.clone(),
        image_name: image_or_default(&node.image_name, &dc.images, ctx.os),
        categories,
        cpus: node.cpus,
        cpu_cores: node.cpu_cores,
        cpu_passthrough: node.cpu_passthrough,
        memory_mb: node.memory_mb,
        disk_size: node.disk_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cloud::test_support::{cluster, ctx};
    use crate::domain::model::cluster::NutanixCloudSpec;
    use crate::domain::model::NodeSpec;

    #[test]
    fn cluster_and_datacenter_settings_are_merged() {
        let mut cluster = cluster("c1", Some("p1"));
        cluster.spec.cloud.nutanix = Some(NutanixCloudSpec {
            cluster_name: "prism-cluster".to_string(),
            project_name: "default".to_string(),
        });
        let template = NodeSpec::default();
        let mut dc = NutanixDatacenterSpec {
            endpoint: "prism.example.com".to_string(),
            port: Some(9440),
            ..Default::default()
        };
        dc.images
            .insert("ubuntu".to_string(), "ubuntu-22.04-img".to_string());

        let config = raw_config(ctx(&cluster, &template), &NutanixNodeSpec::default(), &dc)
            .unwrap();
        assert_eq!(config.cluster_name, "prism-cluster");
        assert_eq!(config.port, Some(9440));
        assert_eq!(config.image_name, "ubuntu-22.04-img");
        assert_eq!(config.categories["KKPCluster"], "c1");
        assert_eq!(config.categories["KKPProject"], "p1");
    }
}
