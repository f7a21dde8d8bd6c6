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

//! Operating system provisioning records.
//!
//! Ubuntu, CentOS, Rocky Linux and Amazon Linux 2 share the same record;
//! RHEL and Flatcar carry extra settings and live in their own modules.

pub mod flatcar;
pub mod rhel;

use crate::domain::machine::encoder::encode;
use crate::domain::model::{CloudProvider, NodeOperatingSystem, OperatingSystem};
use crate::shared::error::Result;
use k8s_openapi::apimachinery::pkg::runtime::RawExtension;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistUpgradeConfig {
    pub dist_upgrade_on_boot: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatingSystemRawConfig {
    Ubuntu(DistUpgradeConfig),
    Rhel(rhel::RawConfig),
    CentOs(DistUpgradeConfig),
    Flatcar(flatcar::RawConfig),
    RockyLinux(DistUpgradeConfig),
    AmazonLinux2(DistUpgradeConfig),
}

impl OperatingSystemRawConfig {
    pub fn operating_system(&self) -> OperatingSystem {
        match self {
            OperatingSystemRawConfig::Ubuntu(_) => OperatingSystem::Ubuntu,
            OperatingSystemRawConfig::Rhel(_) => OperatingSystem::Rhel,
            OperatingSystemRawConfig::CentOs(_) => OperatingSystem::CentOs,
            OperatingSystemRawConfig::Flatcar(_) => OperatingSystem::Flatcar,
            OperatingSystemRawConfig::RockyLinux(_) => OperatingSystem::RockyLinux,
            OperatingSystemRawConfig::AmazonLinux2(_) => OperatingSystem::AmazonLinux2,
        }
    }

    pub fn encode(&self) -> Result<RawExtension> {
        const WHAT: &str = "operating system spec";
        match self {
            OperatingSystemRawConfig::Ubuntu(c)
            | OperatingSystemRawConfig::CentOs(c)
            | OperatingSystemRawConfig::RockyLinux(c)
            | OperatingSystemRawConfig::AmazonLinux2(c) => encode(WHAT, c),
            OperatingSystemRawConfig::Rhel(c) => encode(WHAT, c),
            OperatingSystemRawConfig::Flatcar(c) => encode(WHAT, c),
        }
    }
}

/// Builds the provisioning record for the selected OS.
///
/// `provider` is needed because some providers cannot boot every
/// provisioning utility.
pub fn generate(os: NodeOperatingSystem<'_>, provider: CloudProvider) -> OperatingSystemRawConfig {
    match os {
        NodeOperatingSystem::Ubuntu(spec) => OperatingSystemRawConfig::Ubuntu(DistUpgradeConfig {
            dist_upgrade_on_boot: spec.dist_upgrade_on_boot,
        }),
        NodeOperatingSystem::CentOs(spec) => OperatingSystemRawConfig::CentOs(DistUpgradeConfig {
            dist_upgrade_on_boot: spec.dist_upgrade_on_boot,
        }),
        NodeOperatingSystem::RockyLinux(spec) => {
            OperatingSystemRawConfig::RockyLinux(DistUpgradeConfig {
                dist_upgrade_on_boot: spec.dist_upgrade_on_boot,
            })
        }
        NodeOperatingSystem::AmazonLinux2(spec) => {
            OperatingSystemRawConfig::AmazonLinux2(DistUpgradeConfig {
                dist_upgrade_on_boot: spec.dist_upgrade_on_boot,
            })
        }
        NodeOperatingSystem::Rhel(spec) => OperatingSystemRawConfig::Rhel(rhel::raw_config(spec)),
        NodeOperatingSystem::Flatcar(spec) => {
            OperatingSystemRawConfig::Flatcar(flatcar::raw_config(spec, provider))
        }
    }
}
