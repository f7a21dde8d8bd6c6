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

//! Datacenter defaults maintained by platform administrators.
//!
//! Image and profile tables are keyed by the operating system tag
//! (`ubuntu`, `flatcar`, ...). Generators only ever borrow them.

use super::node_cloud::CloudProvider;
use super::operating_system::OperatingSystem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default image (or template) per operating system tag.
pub type ImageList = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Datacenter {
    pub name: String,
    pub spec: DatacenterSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatacenterSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws: Option<AwsDatacenterSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azure: Option<AzureDatacenterSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vsphere: Option<VSphereDatacenterSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baremetal: Option<BaremetalDatacenterSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vmwareclouddirector: Option<VMwareCloudDirectorDatacenterSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openstack: Option<OpenstackDatacenterSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hetzner: Option<HetznerDatacenterSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digitalocean: Option<DigitaloceanDatacenterSpec>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "packet")]
    pub equinix: Option<EquinixDatacenterSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gcp: Option<GcpDatacenterSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kubevirt: Option<KubevirtDatacenterSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alibaba: Option<AlibabaDatacenterSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anexia: Option<AnexiaDatacenterSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutanix: Option<NutanixDatacenterSpec>,
    /// Operating system profile to use per operating system tag.
    pub default_operating_system_profiles: BTreeMap<String, String>,
}

impl DatacenterSpec {
    /// Providers this datacenter has a spec for, in declaration order.
    pub fn providers(&self) -> Vec<CloudProvider> {
        let candidates = [
            (self.aws.is_some(), CloudProvider::Aws),
            (self.azure.is_some(), CloudProvider::Azure),
            (self.vsphere.is_some(), CloudProvider::VSphere),
            (self.baremetal.is_some(), CloudProvider::Baremetal),
            (
                self.vmwareclouddirector.is_some(),
                CloudProvider::VMwareCloudDirector,
            ),
            (self.openstack.is_some(), CloudProvider::Openstack),
            (self.hetzner.is_some(), CloudProvider::Hetzner),
            (self.digitalocean.is_some(), CloudProvider::Digitalocean),
            (self.equinix.is_some(), CloudProvider::EquinixMetal),
            (self.gcp.is_some(), CloudProvider::Gcp),
            (self.kubevirt.is_some(), CloudProvider::Kubevirt),
            (self.alibaba.is_some(), CloudProvider::Alibaba),
            (self.anexia.is_some(), CloudProvider::Anexia),
            (self.nutanix.is_some(), CloudProvider::Nutanix),
        ];
        candidates
            .into_iter()
            .filter_map(|(set, provider)| set.then_some(provider))
            .collect()
    }

    pub fn default_operating_system_profile(&self, os: OperatingSystem) -> Option<&str> {
        self.default_operating_system_profiles
            .get(os.as_str())
            .map(String::as_str)
            .filter(|profile| !profile.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AwsDatacenterSpec {
    pub region: String,
    pub images: ImageList,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AzureDatacenterSpec {
    pub location: String,
    pub images: ImageList,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VSphereDatacenterSpec {
    pub endpoint: String,
    pub allow_insecure: bool,
    pub datacenter: String,
    pub cluster: String,
    pub default_datastore: String,
    pub root_path: String,
    pub templates: ImageList,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BaremetalDatacenterSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tinkerbell: Option<TinkerbellDatacenterSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TinkerbellDatacenterSpec {
    /// OS image URL per operating system tag.
    pub images: ImageList,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VMwareCloudDirectorDatacenterSpec {
    pub url: String,
    pub allow_insecure: bool,
    pub default_catalog: String,
    pub default_storage_profile: String,
    pub templates: ImageList,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenstackDatacenterSpec {
    #[serde(rename = "authURL")]
    pub auth_url: String,
    pub region: String,
    pub availability_zone: String,
    pub images: ImageList,
    #[serde(rename = "enforceFloatingIP")]
    pub enforce_floating_ip: bool,
    pub trust_device_path: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HetznerDatacenterSpec {
    pub datacenter: String,
    pub location: String,
    pub network: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DigitaloceanDatacenterSpec {
    pub region: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EquinixDatacenterSpec {
    pub facilities: Vec<String>,
    pub metro: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GcpDatacenterSpec {
    pub region: String,
    pub zone_suffixes: Vec<String>,
    pub regional: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KubevirtDatacenterSpec {
    pub dns_policy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_config: Option<KubevirtDnsConfig>,
    /// OS image URL or data volume name per operating system tag.
    pub images: ImageList,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KubevirtDnsConfig {
    pub nameservers: Vec<String>,
    pub searches: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlibabaDatacenterSpec {
    pub region: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnexiaDatacenterSpec {
    #[serde(rename = "locationID")]
    pub location_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NutanixDatacenterSpec {
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
    pub allow_insecure: bool,
    pub images: ImageList,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_configured_providers() {
        let spec = DatacenterSpec {
            azure: Some(AzureDatacenterSpec::default()),
            nutanix: Some(NutanixDatacenterSpec::default()),
            ..Default::default()
        };
        assert_eq!(
            spec.providers(),
            vec![CloudProvider::Azure, CloudProvider::Nutanix]
        );
    }

    #[test]
    fn empty_profile_is_not_a_default() {
        let mut spec = DatacenterSpec::default();
        spec.default_operating_system_profiles
            .insert("ubuntu".to_string(), String::new());
        spec.default_operating_system_profiles
            .insert("flatcar".to_string(), "osp-flatcar-custom".to_string());
        assert_eq!(
            spec.default_operating_system_profile(OperatingSystem::Ubuntu),
            None
        );
        assert_eq!(
            spec.default_operating_system_profile(OperatingSystem::Flatcar),
            Some("osp-flatcar-custom")
        );
    }
}
