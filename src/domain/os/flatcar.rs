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

use crate::domain::model::operating_system::FlatcarSpec;
use crate::domain::model::CloudProvider;
use crate::infrastructure::constants::{
    FLATCAR_PROVISIONING_CLOUD_INIT, FLATCAR_PROVISIONING_IGNITION,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    pub disable_auto_update: bool,
    pub disable_locksmith_d: bool,
    pub disable_update_engine: bool,
    pub provisioning_utility: String,
}

pub fn raw_config(spec: &FlatcarSpec, provider: CloudProvider) -> RawConfig {
    // VMware Cloud Director cannot pass ignition configs to the guest.
    let provisioning_utility = match provider {
        CloudProvider::VMwareCloudDirector => FLATCAR_PROVISIONING_CLOUD_INIT,
        _ => FLATCAR_PROVISIONING_IGNITION,
    };

    RawConfig {
        disable_auto_update: spec.disable_auto_update,
        disable_locksmith_d: spec.disable_auto_update,
        disable_update_engine: spec.disable_auto_update,
        provisioning_utility: provisioning_utility.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignition_by_default() {
        let config = raw_config(&FlatcarSpec::default(), CloudProvider::Aws);
        assert_eq!(config.provisioning_utility, "ignition");
        assert!(!config.disable_locksmith_d);
        assert!(!config.disable_update_engine);
    }

    #[test]
    fn cloud_director_uses_cloud_init() {
        let spec = FlatcarSpec {
            disable_auto_update: true,
        };
        let config = raw_config(&spec, CloudProvider::VMwareCloudDirector);
        assert_eq!(config.provisioning_utility, "cloud-init");
        assert!(config.disable_locksmith_d);
        assert!(config.disable_update_engine);

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["disableLocksmithD"], true);
    }
}
