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

//! Input model of the compiler

pub mod cluster;
pub mod datacenter;
pub mod node_cloud;
pub mod node_deployment;
pub mod operating_system;
pub mod settings;
pub mod ssh;

pub use self::cluster::Cluster;
pub use self::datacenter::{Datacenter, DatacenterSpec, ImageList};
pub use self::node_cloud::{CloudProvider, NodeCloud, NodeCloudSpec};
pub use self::node_deployment::{
    DnsConfig, IpFamily, NetworkSpec, NodeDeployment, NodeDeploymentSpec, NodeSpec,
    NodeVersionInfo, TaintSpec,
};
pub use self::operating_system::{NodeOperatingSystem, OperatingSystem, OperatingSystemSpec};
pub use self::settings::{GlobalSettings, MachineDeploymentOptions, SettingsProvider};
pub use self::ssh::UserSshKey;
