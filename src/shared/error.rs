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

use crate::domain::machine::version::VersionSkewError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MachineSpecError>;

#[derive(Error, Debug)]
pub enum MachineSpecError {
    #[error("node deployment needs to have cloud provider data")]
    MissingProvider,

    #[error("node deployment must set exactly one cloud provider, found: {}", .0.join(", "))]
    MultipleProviders(Vec<&'static str>),

    #[error(
        "unknown or mismatched cloud provider: node deployment uses '{node}', datacenter '{datacenter}' has no matching spec"
    )]
    UnknownOrMismatchedProvider { node: String, datacenter: String },

    #[error("node deployment needs to have an operating system")]
    MissingOperatingSystem,

    #[error("node deployment must set exactly one operating system, found: {}", .0.join(", "))]
    MultipleOperatingSystems(Vec<&'static str>),

    #[error("failed to parse kubelet version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    #[error(transparent)]
    VersionSkew(#[from] VersionSkewError),

    #[error("incompatible feature: {0}")]
    IncompatibleFeature(String),

    #[error("invalid taint: {0}")]
    InvalidTaint(String),

    #[error(
        "automatic updates are enforced for all machine deployments, {operating_system} must not disable them"
    )]
    AutoUpdatesEnforced { operating_system: &'static str },

    #[error("anexia: diskSize and disks cannot be set at the same time, use disks")]
    DiskConflict,

    #[error("{provider}: {field} is required")]
    MissingField {
        provider: &'static str,
        field: String,
    },

    #[error("failed to encode {what}: {source}")]
    Encoding {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Kubernetes API error: {0}")]
    KubeError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl From<kube::Error> for MachineSpecError {
    fn from(err: kube::Error) -> Self {
        MachineSpecError::KubeError(err.to_string())
    }
}

impl MachineSpecError {
    pub fn config_error(context: impl Into<String>) -> Self {
        Self::ConfigError(context.into())
    }

    pub fn missing_field(provider: &'static str, field: impl Into<String>) -> Self {
        Self::MissingField {
            provider,
            field: field.into(),
        }
    }

    pub fn invalid_taint(context: impl Into<String>) -> Self {
        Self::InvalidTaint(context.into())
    }
}
