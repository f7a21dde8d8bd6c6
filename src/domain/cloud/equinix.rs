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
use crate::domain::model::datacenter::EquinixDatacenterSpec;
use crate::domain::model::node_cloud::EquinixNodeSpec;
use crate::infrastructure::constants::EQUINIX_DEFAULT_BILLING_CYCLE;
use crate::shared::error::{MachineSpecError, Result};
use serde::{Deserialize, Serialize};

const PROVIDER: &str = "equinixmetal";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    #[serde(rename = "projectID")]
    pub project_id: String,
    pub instance_type: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub facilities: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub metro: String,
    pub billing_cycle: String,
    pub tags: Vec<String>,
}

pub fn raw_config(
    ctx: GeneratorContext<'_>,
    node: &EquinixNodeSpec,
    dc: &EquinixDatacenterSpec,
) -> Result<RawConfig> {
    if dc.facilities.is_empty() && dc.metro.is_empty() {
        return Err(MachineSpecError::missing_field(PROVIDER, "facilities or metro"));
    }

    let project_id = ctx
        .cluster
        .spec
        .cloud
        .equinix
        .as_ref()
        .map(|cloud| cloud.project_id.clone())
        .unwrap_or_default();

    Ok(RawConfig {
        project_id,
        instance_type: node.instance_type.clone(),
        facilities: dc.facilities.clone(),
        metro: dc.metro.clone(),
        billing_cycle: EQUINIX_DEFAULT_BILLING_CYCLE.to_string(),
        tags: tags(SystemTags::of(ctx.cluster), &node.tags),
    })
}

fn tags(system: SystemTags<'_>, caller: &[String]) -> Vec<String> {
    let mut tags = caller.to_vec();
    tags.push("kubernetes".to_string());
    tags.push(format!("kubernetes-cluster-{}", system.cluster));
    tags.push(format!("system/cluster:{}", system.cluster));
    if let Some(project) = system.project {
        tags.push(format!("system/project:{}", project));
    }
    canonical_tags(tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cloud::test_support::{cluster, ctx};
    use crate::domain::model::cluster::EquinixCloudSpec;
    use crate::domain::model::NodeSpec;

    #[test]
    fn facilities_or_metro_required() {
        let cluster = cluster("c1", None);
        let template = NodeSpec::default();
        let err = raw_config(
            ctx(&cluster, &template),
            &EquinixNodeSpec::default(),
            &EquinixDatacenterSpec::default(),
        )
        .unwrap_err();
        assert!(matches!(err, MachineSpecError::MissingField { .. }));
    }

    #[test]
    fn metro_alone_is_enough() {
        let mut cluster = cluster("c1", Some("p1"));
        cluster.spec.cloud.equinix = Some(EquinixCloudSpec {
            project_id: "eq-project".to_string(),
        });
        let template = NodeSpec::default();
        let dc = EquinixDatacenterSpec {
            metro: "am".to_string(),
            ..Default::default()
        };
        let node = EquinixNodeSpec {
            instance_type: "c3.small.x86".to_string(),
            tags: vec!["a".to_string(), "a".to_string()],
        };

        let config = raw_config(ctx(&cluster, &template), &node, &dc).unwrap();
        assert_eq!(config.project_id, "eq-project");
        assert_eq!(config.billing_cycle, "hourly");
        assert_eq!(
            config.tags,
            vec![
                "a",
                "kubernetes",
                "kubernetes-cluster-c1",
                "system/cluster:c1",
                "system/project:p1",
            ]
        );
    }
}
