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

use super::{image_or_default, GeneratorContext, SystemTags};
use crate::domain::model::datacenter::AzureDatacenterSpec;
use crate::domain::model::node_cloud::AzureNodeSpec;
use crate::shared::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    pub location: String,
    pub resource_group: String,
    pub vnet_resource_group: String,
    pub vm_size: String,
    pub vnet_name: String,
    pub subnet_name: String,
    pub route_table_name: String,
    pub availability_set: String,
    pub security_group_name: String,
    pub load_balancer_sku: String,
    #[serde(rename = "imageID")]
    pub image_id: String,
    #[serde(rename = "assignPublicIP")]
    pub assign_public_ip: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assign_availability_set: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_accelerated_networking: Option<bool>,
    pub os_disk_size: i32,
    pub data_disk_size: i32,
    pub zones: Vec<String>,
    pub tags: BTreeMap<String, String>,
}

pub fn raw_config(
    ctx: GeneratorContext<'_>,
    node: &AzureNodeSpec,
    dc: &AzureDatacenterSpec,
) -> Result<RawConfig> {
    let cloud = ctx.cluster.spec.cloud.azure.clone().unwrap_or_default();

    Ok(RawConfig {
        location: dc.location.clone(),
        resource_group: cloud.resource_group,
        vnet_resource_group: cloud.vnet_resource_group,
        vm_size: node.size.clone(),
        vnet_name: cloud.vnet_name,
        subnet_name: cloud.subnet_name,
        route_table_name: cloud.route_table_name,
        availability_set: cloud.availability_set,
        security_group_name: cloud.security_group,
        load_balancer_sku: cloud.load_balancer_sku,
        image_id: image_or_default(&node.image_id, &dc.images, ctx.os),
        assign_public_ip: node.assign_public_ip,
        assign_availability_set: node.assign_availability_set,
        enable_accelerated_networking: node.enable_accelerated_networking,
        os_disk_size: node.os_disk_size,
        data_disk_size: node.data_disk_size,
        zones: node.zones.clone(),
        tags: tags(SystemTags::of(ctx.cluster), &node.tags),
    })
}

fn tags(system: SystemTags<'_>, caller: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut tags = caller.clone();
    tags.insert("KubernetesCluster".to_string(), system.cluster.to_string());
    tags.insert("system-cluster".to_string(), system.cluster.to_string());
    if let Some(project) = system.project {
        tags.insert("system-project".to_string(), project.to_string());
    }
    tags
}
