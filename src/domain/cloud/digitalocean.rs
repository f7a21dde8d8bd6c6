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
use crate::domain::model::datacenter::DigitaloceanDatacenterSpec;
use crate::domain::model::node_cloud::DigitaloceanNodeSpec;
use crate::shared::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    pub region: String,
    pub size: String,
    pub backups: bool,
    pub ipv6: bool,
    pub private_networking: bool,
    pub monitoring: bool,
    pub tags: Vec<String>,
}

pub fn raw_config(
    ctx: GeneratorContext<'_>,
    node: &DigitaloceanNodeSpec,
    dc: &DigitaloceanDatacenterSpec,
) -> Result<RawConfig> {
    Ok(RawConfig {
        region: dc.region.clone(),
        size: node.size.clone(),
        backups: node.backups,
        ipv6: node.ipv6,
        private_networking: true,
        monitoring: node.monitoring,
        tags: tags(SystemTags::of(ctx.cluster), &node.tags),
    })
}

fn tags(system: SystemTags<'_>, caller: &[String]) -> Vec<String> {
    let mut tags = caller.to_vec();
    tags.push("kubernetes".to_string());
    tags.push(format!("kubernetes-cluster-{}", system.cluster));
    tags.push(format!("system-cluster-{}", system.cluster));
    if let Some(project) = system.project {
        tags.push(format!("system-project-{}", project));
    }
    canonical_tags(tags)
}
