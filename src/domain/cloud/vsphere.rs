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
use crate::domain::model::datacenter::VSphereDatacenterSpec;
use crate::domain::model::node_cloud::VSphereNodeSpec;
use crate::shared::error::{MachineSpecError, Result};
use serde::{Deserialize, Serialize};

const PROVIDER: &str = "vsphere";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    pub template_vm_name: String,
    pub vm_net_name: String,
    pub datacenter: String,
    pub cluster: String,
    pub folder: String,
    pub resource_pool: String,
    pub datastore: String,
    pub datastore_cluster: String,
    pub allow_insecure: bool,
    pub cpus: i32,
    #[serde(rename = "memoryMB")]
    pub memory_mb: i32,
    #[serde(rename = "diskSizeGB", skip_serializing_if = "Option::is_none")]
    pub disk_size_gb: Option<i64>,
}

pub fn raw_config(
    ctx: GeneratorContext<'_>,
    node: &VSphereNodeSpec,
    dc: &VSphereDatacenterSpec,
) -> Result<RawConfig> {
    let cloud = ctx.cluster.spec.cloud.vsphere.clone().unwrap_or_default();

    let template = image_or_default(&node.template, &dc.templates, ctx.os);
    if template.is_empty() {
        return Err(MachineSpecError::missing_field(
            PROVIDER,
            format!("template for operating system {}", ctx.os),
        ));
    }

    // A datastore cluster replaces the single datastore entirely.
    let datastore = if cloud.datastore_cluster.is_empty() {
        or_default(&cloud.datastore, &dc.default_datastore)
    } else {
        String::new()
    };

    Ok(RawConfig {
        template_vm_name: template,
        vm_net_name: cloud.vm_net_name,
        datacenter: dc.datacenter.clone(),
        cluster: dc.cluster.clone(),
        folder: or_default(&cloud.folder, &dc.root_path),
        resource_pool: cloud.resource_pool,
        datastore,
        datastore_cluster: cloud.datastore_cluster,
        allow_insecure: dc.allow_insecure,
        cpus: node.cpus,
        memory_mb: node.memory,
        disk_size_gb: node.disk_size_gb,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cloud::test_support::{cluster, ctx};
    use crate::domain::model::cluster::VSphereCloudSpec;
    use crate::domain::model::NodeSpec;

    fn datacenter() -> VSphereDatacenterSpec {
        VSphereDatacenterSpec {
            datacenter: "dc-1".to_string(),
            cluster: "compute".to_string(),
            default_datastore: "ds-default".to_string(),
            root_path: "/dc-1/vm".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn template_is_required() {
        let cluster = cluster("c1", None);
        let template = NodeSpec::default();
        let err = raw_config(ctx(&cluster, &template), &VSphereNodeSpec::default(), &datacenter())
            .unwrap_err();
        assert!(matches!(
            err,
            MachineSpecError::MissingField { provider: "vsphere", .. }
        ));
    }

    #[test]
    fn cluster_datastore_overrides_datacenter_default() {
        let mut cluster = cluster("c1", None);
        cluster.spec.cloud.vsphere = Some(VSphereCloudSpec {
            datastore: "ds-cluster".to_string(),
            ..Default::default()
        });
        let template = NodeSpec::default();
        let node = VSphereNodeSpec {
            template: "ubuntu-tpl".to_string(),
            cpus: 2,
            memory: 4096,
            ..Default::default()
        };

        let config = raw_config(ctx(&cluster, &template), &node, &datacenter()).unwrap();
        assert_eq!(config.datastore, "ds-cluster");
        assert_eq!(config.folder, "/dc-1/vm");
        assert_eq!(config.template_vm_name, "ubuntu-tpl");
    }

    #[test]
    fn datacenter_datastore_is_the_fallback() {
        let cluster = cluster("c1", None);
        let template = NodeSpec::default();
        let mut dc = datacenter();
        dc.templates
            .insert("ubuntu".to_string(), "ubuntu-default".to_string());

        let config = raw_config(ctx(&cluster, &template), &VSphereNodeSpec::default(), &dc)
            .unwrap();
        assert_eq!(config.datastore, "ds-default");
        assert_eq!(config.template_vm_name, "ubuntu-default");
    }
}
