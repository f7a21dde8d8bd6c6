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

//! Anexia Engine.
//!
//! Node templates may describe storage with the legacy single `diskSize`
//! field or with the `disks` list, never both. The raw config always uses
//! the list form.

use super::GeneratorContext;
use crate::domain::model::datacenter::AnexiaDatacenterSpec;
use crate::domain::model::node_cloud::{AnexiaDiskConfig, AnexiaNodeSpec};
use crate::shared::error::{MachineSpecError, Result};
use serde::{Deserialize, Serialize};

const PROVIDER: &str = "anexia";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    #[serde(rename = "vlanID")]
    pub vlan_id: String,
    #[serde(rename = "templateID")]
    pub template_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub template_build: String,
    #[serde(rename = "locationID")]
    pub location_id: String,
    pub cpus: i32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cpu_performance_type: String,
    pub memory: i64,
    pub disks: Vec<DiskConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskConfig {
    pub size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance_type: Option<String>,
}

impl From<&AnexiaDiskConfig> for DiskConfig {
    fn from(disk: &AnexiaDiskConfig) -> Self {
        Self {
            size: disk.size,
            performance_type: disk.performance_type.clone(),
        }
    }
}

pub fn raw_config(
    _ctx: GeneratorContext<'_>,
    node: &AnexiaNodeSpec,
    dc: &AnexiaDatacenterSpec,
) -> Result<RawConfig> {
    Ok(RawConfig {
        vlan_id: node.vlan_id.clone(),
        template_id: node.template_id.clone(),
        template_build: node.template_build.clone(),
        location_id: dc.location_id.clone(),
        cpus: node.cpus,
        cpu_performance_type: node.cpu_performance_type.clone(),
        memory: node.memory,
        disks: disks(node)?,
    })
}

fn disks(node: &AnexiaNodeSpec) -> Result<Vec<DiskConfig>> {
    match (node.disk_size, node.disks.is_empty()) {
        (Some(_), false) => Err(MachineSpecError::DiskConflict),
        (Some(size), true) => Ok(vec![DiskConfig {
            size,
            performance_type: None,
        }]),
        (None, false) => Ok(node.disks.iter().map(DiskConfig::from).collect()),
        (None, true) => Err(MachineSpecError::missing_field(PROVIDER, "disks")),
    }
}
