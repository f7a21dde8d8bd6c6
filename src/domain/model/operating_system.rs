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

//! Operating system part of a node template.

use crate::shared::error::{MachineSpecError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating system tag understood by the machine controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OperatingSystem {
    #[serde(rename = "ubuntu")]
    Ubuntu,
    #[serde(rename = "rhel")]
    Rhel,
    #[serde(rename = "centos")]
    CentOs,
    #[serde(rename = "flatcar")]
    Flatcar,
    #[serde(rename = "rockylinux")]
    RockyLinux,
    #[serde(rename = "amzn2")]
    AmazonLinux2,
}

impl OperatingSystem {
    /// Tag used on the wire and as key of datacenter image/profile tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatingSystem::Ubuntu => "ubuntu",
            OperatingSystem::Rhel => "rhel",
            OperatingSystem::CentOs => "centos",
            OperatingSystem::Flatcar => "flatcar",
            OperatingSystem::RockyLinux => "rockylinux",
            OperatingSystem::AmazonLinux2 => "amzn2",
        }
    }
}

impl fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingSystemSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ubuntu: Option<UbuntuSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rhel: Option<RhelSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub centos: Option<CentOsSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flatcar: Option<FlatcarSpec>,
    #[serde(rename = "rockylinux", skip_serializing_if = "Option::is_none")]
    pub rocky_linux: Option<RockyLinuxSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amzn2: Option<AmazonLinuxSpec>,
}

/// The single operating system selected by a node template.
#[derive(Debug, Clone, Copy)]
pub enum NodeOperatingSystem<'a> {
    Ubuntu(&'a UbuntuSpec),
    Rhel(&'a RhelSpec),
    CentOs(&'a CentOsSpec),
    Flatcar(&'a FlatcarSpec),
    RockyLinux(&'a RockyLinuxSpec),
    AmazonLinux2(&'a AmazonLinuxSpec),
}

impl NodeOperatingSystem<'_> {
    pub fn kind(&self) -> OperatingSystem {
        match self {
            NodeOperatingSystem::Ubuntu(_) => OperatingSystem::Ubuntu,
            NodeOperatingSystem::Rhel(_) => OperatingSystem::Rhel,
            NodeOperatingSystem::CentOs(_) => OperatingSystem::CentOs,
            NodeOperatingSystem::Flatcar(_) => OperatingSystem::Flatcar,
            NodeOperatingSystem::RockyLinux(_) => OperatingSystem::RockyLinux,
            NodeOperatingSystem::AmazonLinux2(_) => OperatingSystem::AmazonLinux2,
        }
    }

    /// Whether this OS is configured to apply updates on its own.
    pub fn auto_updates_enabled(&self) -> bool {
        match self {
            NodeOperatingSystem::Ubuntu(spec) => spec.dist_upgrade_on_boot,
            NodeOperatingSystem::Rhel(spec) => spec.dist_upgrade_on_boot,
            NodeOperatingSystem::CentOs(spec) => spec.dist_upgrade_on_boot,
            NodeOperatingSystem::Flatcar(spec) => !spec.disable_auto_update,
            NodeOperatingSystem::RockyLinux(spec) => spec.dist_upgrade_on_boot,
            NodeOperatingSystem::AmazonLinux2(spec) => spec.dist_upgrade_on_boot,
        }
    }
}

impl OperatingSystemSpec {
    pub fn selected(&self) -> Result<NodeOperatingSystem<'_>> {
        let mut set: Vec<NodeOperatingSystem<'_>> = Vec::with_capacity(1);

        if let Some(spec) = &self.ubuntu {
            set.push(NodeOperatingSystem::Ubuntu(spec));
        }
        if let Some(spec) = &self.rhel {
            set.push(NodeOperatingSystem::Rhel(spec));
        }
        if let Some(spec) = &self.centos {
            set.push(NodeOperatingSystem::CentOs(spec));
        }
        if let Some(spec) = &self.flatcar {
            set.push(NodeOperatingSystem::Flatcar(spec));
        }
        if let Some(spec) = &self.rocky_linux {
            set.push(NodeOperatingSystem::RockyLinux(spec));
        }
        if let Some(spec) = &self.amzn2 {
            set.push(NodeOperatingSystem::AmazonLinux2(spec));
        }

        match set.len() {
            0 => Err(MachineSpecError::MissingOperatingSystem),
            1 => Ok(set[0]),
            _ => Err(MachineSpecError::MultipleOperatingSystems(
                set.iter().map(|os| os.kind().as_str()).collect(),
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UbuntuSpec {
    pub dist_upgrade_on_boot: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RhelSpec {
    pub dist_upgrade_on_boot: bool,
    pub rhel_subscription_manager_user: String,
    pub rhel_subscription_manager_password: String,
    pub rhsm_offline_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CentOsSpec {
    pub dist_upgrade_on_boot: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlatcarSpec {
    pub disable_auto_update: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RockyLinuxSpec {
    pub dist_upgrade_on_boot: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AmazonLinuxSpec {
    pub dist_upgrade_on_boot: bool,
}
