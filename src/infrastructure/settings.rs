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

//! Sources of global settings.
//!
//! The compiler reads settings synchronously through `SettingsProvider`.
//! Sources here do the I/O up front and hand back a `GlobalSettings`
//! snapshot, which is itself a `SettingsProvider`.

use crate::domain::model::GlobalSettings;
use crate::infrastructure::constants::{
    SETTINGS_GROUP, SETTINGS_KIND, SETTINGS_NAME, SETTINGS_PLURAL, SETTINGS_VERSION,
};
use crate::shared::error::{MachineSpecError, Result};
use async_trait::async_trait;
use kube::api::{Api, ApiResource, DynamicObject, GroupVersionKind};
use kube::Client;
use std::path::PathBuf;
use tracing::{debug, info};

#[async_trait]
pub trait SettingsSource: Send + Sync {
    async fn fetch(&self) -> Result<GlobalSettings>;
}

/// Settings read from a YAML or TOML file, chosen by extension.
pub struct FileSettingsSource {
    path: PathBuf,
}

impl FileSettingsSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SettingsSource for FileSettingsSource {
    async fn fetch(&self) -> Result<GlobalSettings> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        debug!(path = %self.path.display(), "loaded settings file");

        match self.path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            _ => Ok(serde_yaml::from_str(&content)?),
        }
    }
}

/// The platform's cluster-scoped `KubermaticSetting` object.
pub struct KubeSettingsSource {
    client: Client,
}

impl KubeSettingsSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn api_resource() -> ApiResource {
        let gvk = GroupVersionKind::gvk(SETTINGS_GROUP, SETTINGS_VERSION, SETTINGS_KIND);
        ApiResource::from_gvk_with_plural(&gvk, SETTINGS_PLURAL)
    }
}

#[async_trait]
impl SettingsSource for KubeSettingsSource {
    async fn fetch(&self) -> Result<GlobalSettings> {
        let resource = Self::api_resource();
        let api: Api<DynamicObject> = Api::all_with(self.client.clone(), &resource);

        let object = api.get(SETTINGS_NAME).await?;
        info!("Fetched global settings from {}", SETTINGS_NAME);

        settings_from_object(&object)
    }
}

/// Extracts the settings from the object's `spec`; a missing spec means defaults.
pub fn settings_from_object(object: &DynamicObject) -> Result<GlobalSettings> {
    match object.data.get("spec") {
        Some(spec) if !spec.is_null() => serde_json::from_value(spec.clone()).map_err(|e| {
            MachineSpecError::config_error(format!("invalid {} spec: {}", SETTINGS_NAME, e))
        }),
        _ => Ok(GlobalSettings::default()),
    }
}
