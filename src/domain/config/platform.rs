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

//! Platform configuration: the datacenters an administrator offers and the
//! global settings applied to every machine deployment.
//!
//! ```toml
//! [settings.machineDeploymentOptions]
//! autoUpdatesEnabled = true
//!
//! [datacenters.aws-eu-west-1.spec.aws]
//! region = "eu-west-1"
//!
//! [datacenters.aws-eu-west-1.spec.aws.images]
//! ubuntu = "ami-0123456789"
//! ```

use crate::domain::model::{Datacenter, DatacenterSpec, GlobalSettings};
use crate::shared::error::{MachineSpecError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::read_to_string;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub settings: GlobalSettings,
    pub datacenters: BTreeMap<String, DatacenterEntry>,
}

/// A datacenter as written in the config file; its name is the table key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatacenterEntry {
    pub spec: DatacenterSpec,
}

impl PlatformConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = read_to_string(path).map_err(|e| {
            MachineSpecError::config_error(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn datacenter(&self, name: &str) -> Result<Datacenter> {
        let entry = self.datacenters.get(name).ok_or_else(|| {
            MachineSpecError::config_error(format!(
                "datacenter '{}' not found, known datacenters: {}",
                name,
                self.datacenters
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?;

        Ok(Datacenter {
            name: name.to_string(),
            spec: entry.spec.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CloudProvider;
    use std::io::Write;

    const CONFIG: &str = r#"
[settings.machineDeploymentOptions]
autoUpdatesEnabled = true
autoUpdatesEnforced = true

[datacenters.aws-eu-west-1.spec]
defaultOperatingSystemProfiles = { ubuntu = "osp-ubuntu" }

[datacenters.aws-eu-west-1.spec.aws]
region = "eu-west-1"

[datacenters.aws-eu-west-1.spec.aws.images]
ubuntu = "ami-0123456789"

[datacenters.hetzner-fsn1.spec.hetzner]
location = "fsn1"
"#;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CONFIG.as_bytes()).unwrap();

        let config = PlatformConfig::from_file(file.path()).unwrap();
        assert!(config.settings.enforces_auto_updates());
        assert_eq!(config.datacenters.len(), 2);

        let dc = config.datacenter("aws-eu-west-1").unwrap();
        assert_eq!(dc.name, "aws-eu-west-1");
        assert_eq!(dc.spec.providers(), vec![CloudProvider::Aws]);
        let aws = dc.spec.aws.unwrap();
        assert_eq!(aws.region, "eu-west-1");
        assert_eq!(aws.images["ubuntu"], "ami-0123456789");
        assert_eq!(
            dc.spec.default_operating_system_profiles["ubuntu"],
            "osp-ubuntu"
        );
    }

    #[test]
    fn test_unknown_datacenter() {
        let config = PlatformConfig::from_toml(CONFIG).unwrap();
        let err = config.datacenter("gcp-europe").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("gcp-europe"));
        assert!(message.contains("hetzner-fsn1"));
    }

    #[test]
    fn test_missing_file() {
        let err = PlatformConfig::from_file("/nonexistent/platform.toml").unwrap_err();
        assert!(matches!(err, MachineSpecError::ConfigError(_)));
    }
}
