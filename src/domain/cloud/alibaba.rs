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

use super::{GeneratorContext, SystemTags};
use crate::domain::model::datacenter::AlibabaDatacenterSpec;
use crate::domain::model::node_cloud::AlibabaNodeSpec;
use crate::shared::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    pub region_id: String,
    #[serde(rename = "zoneID")]
    pub zone_id: String,
    pub instance_type: String,
    pub disk_size: String,
    pub disk_type: String,
    #[serde(rename = "vSwitchID")]
    pub vswitch_id: String,
    pub internet_max_bandwidth_out: String,
    pub labels: BTreeMap<String, String>,
}

pub fn raw_config(
    ctx: GeneratorContext<'_>,
    node: &AlibabaNodeSpec,
    dc: &AlibabaDatacenterSpec,
) -> Result<RawConfig> {
    let system = SystemTags::of(ctx.cluster);

    let mut labels = node.labels.clone();
    labels.insert("kubernetes-cluster".to_string(), system.cluster.to_string());
    labels.insert("system-cluster".to_string(), system.cluster.to_string());
    if let Some(project) = system.project {
        labels.insert("system-project".to_string(), project.to_string());
    }

    Ok(RawConfig {
        region_id: dc.region.clone(),
        zone_id: node.zone_id.clone(),
        instance_type: node.instance_type.clone(),
        disk_size: node.disk_size.clone(),
        disk_type: node.disk_type.clone(),
        vswitch_id: node.vswitch_id.clone(),
        internet_max_bandwidth_out: node.internet_max_bandwidth_out.clone(),
        labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cloud::test_support::{cluster, ctx};
    use crate::domain::model::NodeSpec;

    #[test]
    fn region_and_labels() {
        let cluster = cluster("c1", None);
        let template = NodeSpec::default();
        let dc = AlibabaDatacenterSpec {
            region: "eu-central-1".to_string(),
        };

        let config = raw_config(ctx(&cluster, &template), &AlibabaNodeSpec::default(), &dc)
            .unwrap();
        assert_eq!(config.region_id, "eu-central-1");
        assert_eq!(config.labels["kubernetes-cluster"], "c1");
        assert_eq!(config.labels["system-cluster"], "c1");
        assert!(!config.labels.contains_key("system-project"));
    }
}
