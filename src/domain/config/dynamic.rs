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

//! `-D key=value` overrides applied to a node deployment before validation.
//!
//! Supported keys:
//! - `nodedeployment.name`
//! - `nodedeployment.replicas`, `nodedeployment.min-replicas`,
//!   `nodedeployment.max-replicas`
//! - `nodedeployment.paused`, `nodedeployment.dynamic-config`
//! - `nodedeployment.kubelet`
//! - `nodedeployment.labels`, `nodedeployment.annotations` (`k1=v1,k2=v2`)
//! - `nodedeployment.label.<KEY>`, `nodedeployment.annotation.<KEY>`

use crate::domain::model::NodeDeployment;
use crate::shared::error::{MachineSpecError, Result};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

const LABEL_PREFIX: &str = "nodedeployment.label.";
const ANNOTATION_PREFIX: &str = "nodedeployment.annotation.";

/// Parses `key=value` strings into a map; later keys win.
pub fn parse_properties(properties: &[String]) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();

    for property in properties {
        let (key, value) = property.split_once('=').ok_or_else(|| {
            MachineSpecError::config_error(format!(
                "Invalid property format: '{}'. Expected 'key=value'",
                property
            ))
        })?;

        let key = key.trim();
        if key.is_empty() {
            return Err(MachineSpecError::config_error(format!(
                "Empty key in property: '{}'",
                property
            )));
        }

        map.insert(key.to_string(), value.trim().to_string());
    }

    Ok(map)
}

pub fn apply_overrides(configs: &HashMap<String, String>, nd: &mut NodeDeployment) -> Result<()> {
    if let Some(name) = configs.get("nodedeployment.name") {
        nd.name = name.clone();
    }

    if let Some(replicas) = configs.get("nodedeployment.replicas") {
        nd.spec.replicas = parse_value("nodedeployment.replicas", replicas)?;
    }

    if let Some(min) = configs.get("nodedeployment.min-replicas") {
        nd.spec.min_replicas = Some(parse_value("nodedeployment.min-replicas", min)?);
    }

    if let Some(max) = configs.get("nodedeployment.max-replicas") {
        nd.spec.max_replicas = Some(parse_value("nodedeployment.max-replicas", max)?);
    }

    if let Some(paused) = configs.get("nodedeployment.paused") {
        nd.spec.paused = Some(parse_value("nodedeployment.paused", paused)?);
    }

    if let Some(dynamic) = configs.get("nodedeployment.dynamic-config") {
        nd.spec.dynamic_config = Some(parse_value("nodedeployment.dynamic-config", dynamic)?);
    }

    if let Some(kubelet) = configs.get("nodedeployment.kubelet") {
        nd.spec.template.versions.kubelet = kubelet.clone();
    }

    if let Some(labels) = configs.get("nodedeployment.labels") {
        nd.spec.template.labels.extend(parse_key_value_pairs(labels));
    }

    if let Some(annotations) = configs.get("nodedeployment.annotations") {
        nd.annotations.extend(parse_key_value_pairs(annotations));
    }

    for (key, value) in configs {
        if let Some(label) = key.strip_prefix(LABEL_PREFIX) {
            nd.spec
                .template
                .labels
                .insert(label.to_string(), value.clone());
        } else if let Some(annotation) = key.strip_prefix(ANNOTATION_PREFIX) {
            nd.annotations.insert(annotation.to_string(), value.clone());
        }
    }

    Ok(())
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| {
        MachineSpecError::config_error(format!("Invalid value '{}' for {}: {}", raw, key, e))
    })
}

fn parse_key_value_pairs(input: &str) -> BTreeMap<String, String> {
    input
        .split(',')
        .filter_map(|pair| pair.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}
