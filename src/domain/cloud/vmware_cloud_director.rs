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

use super::{image_or_default, or_default, GeneratorContext};
use crate::domain::model::datacenter::VMwareCloudDirectorDatacenterSpec;
use crate::domain::model::node_cloud::VMwareCloudDirectorNodeSpec;
use crate::infrastructure::constants::VCD_DEFAULT_IP_ALLOCATION_MODE;
use crate::shared::error::{MachineSpecError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const PROVIDER: &str = "vmware-cloud-director";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    pub organization: String,
    pub vdc: String,
    pub vapp: String,
    pub network: String,
    pub allow_insecure: bool,
    pub catalog: String,
    pub template: String,
    pub storage_profile: String,
    pub ip_allocation_mode: String,
    pub cpus: i32,
    pub cpu_cores: i32,
    #[serde(rename = "memoryMB")]
    pub memory_mb: i32,
    #[serde(rename = "diskSizeGB", skip_serializing_if = "Option::is_none")]
    pub disk_size_gb: Option<i64>,
    #[serde(rename = "diskIOPS", skip_serializing_if = "Option::is_none")]
    pub disk_iops: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizing_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement_policy: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

pub fn raw_config(
    ctx: GeneratorContext<'_>,
    node: &VMwareCloudDirectorNodeSpec,
    dc: &VMwareCloudDirectorDatacenterSpec,
) -> Result<RawConfig> {
    let cloud = ctx
        .cluster
        .spec
        .cloud
        .vmwareclouddirector
        .clone()
        .unwrap_or_default();

    let catalog = required("catalog", or_default(&node.catalog, &dc.default_catalog))?;
    let template = required(
        "template",
        image_or_default(&node.template, &dc.templates, ctx.os),
    )?;
    let storage_profile = required(
        "storageProfile",
        or_default(&node.storage_profile, &dc.default_storage_profile),
    )?;

    Ok(RawConfig {
        organization: cloud.organization,
        vdc: cloud.vdc,
        vapp: cloud.vapp,
        network: cloud.ovdc_network,
        allow_insecure: dc.allow_insecure,
        catalog,
        template,
        storage_profile,
        ip_allocation_mode: or_default(&node.ip_allocation_mode, VCD_DEFAULT_IP_ALLOCATION_MODE),
        cpus: node.cpus,
        cpu_cores: node.cpu_cores,
        memory_mb: node.memory_mb,
        disk_size_gb: node.disk_size_gb,
        disk_iops: node.disk_iops,
        sizing_policy: node.sizing_policy.clone(),
        placement_policy: node.placement_policy.clone(),
        metadata: node.metadata.clone(),
    })
}

fn required(field: &'static str, value: String) -> Result<String> {
    if value.is_empty() {
        return Err(MachineSpecError::missing_field(PROVIDER, field));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cloud::test_support::{cluster, ctx};
    use crate::domain::model::NodeSpec;

    fn datacenter() -> VMwareCloudDirectorDatacenterSpec {
        let mut dc = VMwareCloudDirectorDatacenterSpec {
            default_catalog: "kubermatic".to_string(),
            default_storage_profile: "*".to_string(),
            ..Default::default()
        };
        dc.templates
            .insert("ubuntu".to_string(), "ubuntu-2204".to_string());
        dc
    }

    #[test]
    fn datacenter_defaults_fill_blanks() {
        let cluster = cluster("c1", None);
        let template = NodeSpec::default();
        let config = raw_config(
            ctx(&cluster, &template),
            &VMwareCloudDirectorNodeSpec::default(),
            &datacenter(),
        )
        .unwrap();

        assert_eq!(config.catalog, "kubermatic");
        assert_eq!(config.template, "ubuntu-2204");
        assert_eq!(config.storage_profile, "*");
        assert_eq!(config.ip_allocation_mode, "DHCP");
    }

    #[test]
    fn missing_storage_profile_is_rejected() {
        let cluster = cluster("c1", None);
        let template = NodeSpec::default();
        let mut dc = datacenter();
        dc.default_storage_profile.clear();

        let err = raw_config(
            ctx(&cluster, &template),
            &VMwareCloudDirectorNodeSpec::default(),
            &dc,
        )
        .unwrap_err();
        match err {
            MachineSpecError::MissingField { field, .. } => assert_eq!(field, "storageProfile"),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
