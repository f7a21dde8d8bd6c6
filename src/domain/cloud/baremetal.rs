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

//! Bare-metal machines, provisioned through Tinkerbell.

use super::{image_or_default, or_default, GeneratorContext};
use crate::domain::model::datacenter::BaremetalDatacenterSpec;
use crate::domain::model::node_cloud::BaremetalNodeSpec;
use crate::infrastructure::constants::{BAREMETAL_DRIVER_TINKERBELL, DEFAULT_HARDWARE_NAMESPACE};
use crate::shared::error::{MachineSpecError, Result};
use serde::{Deserialize, Serialize};

const PROVIDER: &str = "baremetal";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    pub driver: String,
    pub driver_spec: TinkerbellConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TinkerbellConfig {
    pub cluster_name: String,
    pub os_image_url: String,
    pub hardware_ref: HardwareRef,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardwareRef {
    pub name: String,
    pub namespace: String,
}

pub fn raw_config(
    ctx: GeneratorContext<'_>,
    node: &BaremetalNodeSpec,
    dc: &BaremetalDatacenterSpec,
) -> Result<RawConfig> {
    let node = node
        .tinkerbell
        .as_ref()
        .ok_or_else(|| MachineSpecError::missing_field(PROVIDER, "tinkerbell"))?;
    let dc = dc
        .tinkerbell
        .as_ref()
        .ok_or_else(|| MachineSpecError::missing_field(PROVIDER, "datacenter tinkerbell"))?;

    if node.hardware_ref.name.is_empty() {
        return Err(MachineSpecError::missing_field(
            PROVIDER,
            "tinkerbell.hardwareRef.name",
        ));
    }

    let os_image_url = image_or_default("", &dc.images, ctx.os);
    if os_image_url.is_empty() {
        return Err(MachineSpecError::missing_field(
            PROVIDER,
            format!("os image url for operating system {}", ctx.os),
        ));
    }

    Ok(RawConfig {
        driver: BAREMETAL_DRIVER_TINKERBELL.to_string(),
        driver_spec: TinkerbellConfig {
            cluster_name: ctx.cluster.name.clone(),
            os_image_url,
            hardware_ref: HardwareRef {
                name: node.hardware_ref.name.clone(),
                namespace: or_default(&node.hardware_ref.namespace, DEFAULT_HARDWARE_NAMESPACE),
            },
        },
    })
}
