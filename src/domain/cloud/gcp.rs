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

use super::{canonical_tags, GeneratorContext, SystemTags};
use crate::domain::model::datacenter::GcpDatacenterSpec;
use crate::domain::model::node_cloud::GcpNodeSpec;
use crate::shared::error::{MachineSpecError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const PROVIDER: &str = "gce";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    pub zone: String,
    pub machine_type: String,
    pub disk_size: i64,
    pub disk_type: String,
    pub network: String,
    pub subnetwork: String,
    pub preemptible: bool,
    pub regional: bool,
    #[serde(rename = "assignPublicIPAddress")]
    pub assign_public_ip_address: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub custom_image: String,
    pub labels: BTreeMap<String, String>,
    pub tags: Vec<String>,
}

pub fn raw_config(
    ctx: GeneratorContext<'_>,
    node: &GcpNodeSpec,
    dc: &GcpDatacenterSpec,
) -> Result<RawConfig> {
    let cloud = ctx.cluster.spec.cloud.gcp.clone().unwrap_or_default();
    let system = SystemTags::of(ctx.cluster);

    let zone = if !node.zone.is_empty() {
        node.zone.clone()
    } else {
        let suffix = dc
            .zone_suffixes
            .first()
            .ok_or_else(|| MachineSpecError::missing_field(PROVIDER, "zone"))?;
        format!("{}-{}", dc.region, suffix)
    };

    let mut labels = node.labels.clone();
    labels.insert("system-cluster".to_string(), system.cluster.to_string());
    if let Some(project) = system.project {
        labels.insert("system-project".to_string(), project.to_string());
    }

    let mut tags = node.tags.clone();
    tags.push(format!("kubernetes-cluster-{}", system.cluster));

    Ok(RawConfig {
        zone,
        machine_type: node.machine_type.clone(),
        disk_size: node.disk_size,
        disk_type: node.disk_type.clone(),
        network: cloud.network,
        subnetwork: cloud.subnetwork,
        preemptible: node.preemptible,
        regional: dc.regional,
        assign_public_ip_address: true,
        custom_image: node.custom_image.clone(),
        labels,
        tags: canonical_tags(tags),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cloud::test_support::{cluster, ctx};
    use crate::domain::model::NodeSpec;

    fn datacenter() -> GcpDatacenterSpec {
        GcpDatacenterSpec {
            region: "europe-west3".to_string(),
            zone_suffixes: vec!["c".to_string(), "a".to_string()],
            regional: false,
        }
    }

    #[test]
    fn zone_derives_from_first_suffix() {
        let cluster = cluster("c1", None);
        let template = NodeSpec::default();
        let config =
            raw_config(ctx(&cluster, &template), &GcpNodeSpec::default(), &datacenter()).unwrap();
        assert_eq!(config.zone, "europe-west3-c");
    }

    #[test]
    fn explicit_zone_wins() {
        let cluster = cluster("c1", None);
        let template = NodeSpec::default();
        let node = GcpNodeSpec {
            zone: "europe-west3-b".to_string(),
            ..Default::default()
        };
        let config = raw_config(ctx(&cluster, &template), &node, &datacenter()).unwrap();
        assert_eq!(config.zone, "europe-west3-b");
    }

    #[test]
    fn labels_and_tags_carry_cluster_identity() {
        let cluster = cluster("c1", Some("p1"));
        let template = NodeSpec::default();
        let node = GcpNodeSpec {
            tags: vec!["web".to_string(), "db".to_string(), "web".to_string()],
            ..Default::default()
        };

        let config = raw_config(ctx(&cluster, &template), &node, &datacenter()).unwrap();
        assert_eq!(config.labels["system-cluster"], "c1");
        assert_eq!(config.labels["system-project"], "p1");
        assert_eq!(config.tags, vec!["db", "kubernetes-cluster-c1", "web"]);
    }
}
