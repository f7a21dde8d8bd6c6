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

use crate::domain::model::operating_system::RhelSpec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    pub dist_upgrade_on_boot: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rhel_subscription_manager_user: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rhel_subscription_manager_password: String,
    #[serde(rename = "rhsmOfflineToken", skip_serializing_if = "String::is_empty")]
    pub rhsm_offline_token: String,
}

pub fn raw_config(spec: &RhelSpec) -> RawConfig {
    RawConfig {
        dist_upgrade_on_boot: spec.dist_upgrade_on_boot,
        rhel_subscription_manager_user: spec.rhel_subscription_manager_user.clone(),
        rhel_subscription_manager_password: spec.rhel_subscription_manager_password.clone(),
        rhsm_offline_token: spec.rhsm_offline_token.clone(),
    }
}
