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

use crate::shared::error::Result;
use serde::{Deserialize, Serialize};

/// Platform-wide settings relevant to machine deployments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalSettings {
    pub machine_deployment_options: MachineDeploymentOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MachineDeploymentOptions {
    pub auto_updates_enabled: bool,
    pub auto_updates_enforced: bool,
}

impl GlobalSettings {
    /// Whether every machine deployment must keep OS auto-updates on.
    pub fn enforces_auto_updates(&self) -> bool {
        self.machine_deployment_options.auto_updates_enabled
            && self.machine_deployment_options.auto_updates_enforced
    }
}

/// Read access to the global settings.
///
/// Implementations must not block on I/O; remote settings are fetched
/// ahead of compilation (see `infrastructure::settings`).
pub trait SettingsProvider: Send + Sync {
    fn global_settings(&self) -> Result<GlobalSettings>;
}

impl SettingsProvider for GlobalSettings {
    fn global_settings(&self) -> Result<GlobalSettings> {
        Ok(self.clone())
    }
}
