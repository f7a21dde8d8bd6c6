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

use super::legacy;
use super::version::{ensure_version_compatible, parse_version};
use crate::domain::model::{NodeDeployment, SettingsProvider, TaintSpec};
use crate::infrastructure::constants::TAINT_EFFECTS;
use crate::shared::error::{MachineSpecError, Result};
use semver::Version;
use tracing::debug;

/// Checks a node deployment before compilation and resolves its kubelet version.
///
/// The returned deployment carries the resolved kubelet version, so the
/// compiler never has to derive it again.
pub fn validate(mut nd: NodeDeployment, control_plane: &Version) -> Result<NodeDeployment> {
    nd.spec.template.cloud.provider()?;

    let kubelet = resolve_kubelet_version(&nd.spec.template.versions.kubelet, control_plane)?;
    nd.spec.template.versions.kubelet = kubelet.to_string();

    ensure_version_compatible(control_plane, &kubelet)?;

    if nd.spec.dynamic_config.unwrap_or(false) && !legacy::supports_dynamic_config(&kubelet) {
        return Err(MachineSpecError::IncompatibleFeature(format!(
            "dynamic kubelet config is not supported for kubelet {} (1.24 or newer)",
            kubelet
        )));
    }

    for taint in &nd.spec.template.taints {
        validate_taint(taint)?;
    }

    debug!(
        name = %nd.name,
        kubelet = %nd.spec.template.versions.kubelet,
        "node deployment validated"
    );
    Ok(nd)
}

fn resolve_kubelet_version(raw: &str, control_plane: &Version) -> Result<Version> {
    if raw.is_empty() {
        return Ok(control_plane.clone());
    }

    parse_version(raw).map_err(|e| MachineSpecError::InvalidVersion {
        version: raw.to_string(),
        reason: e.to_string(),
    })
}

fn validate_taint(taint: &TaintSpec) -> Result<()> {
    if taint.key.is_empty() {
        return Err(MachineSpecError::invalid_taint("key must not be empty"));
    }

    if taint.value.is_empty() {
        return Err(MachineSpecError::invalid_taint(format!(
            "value of taint '{}' must not be empty",
            taint.key
        )));
    }

    if !TAINT_EFFECTS.contains(&taint.effect.as_str()) {
        return Err(MachineSpecError::invalid_taint(format!(
            "effect '{}' of taint '{}' is not allowed, allowed effects: {}",
            taint.effect,
            taint.key,
            TAINT_EFFECTS.join(", ")
        )));
    }

    Ok(())
}

/// Rejects deployments whose OS disables updates while the platform enforces them.
pub fn validate_auto_update_enforcement(
    nd: &NodeDeployment,
    settings: &dyn SettingsProvider,
) -> Result<()> {
    let settings = settings.global_settings()?;
    if !settings.enforces_auto_updates() {
        return Ok(());
    }

    let os = nd.spec.template.operating_system.selected()?;
    if !os.auto_updates_enabled() {
        return Err(MachineSpecError::AutoUpdatesEnforced {
            operating_system: os.kind().as_str(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::node_cloud::AwsNodeSpec;

    fn aws_deployment() -> NodeDeployment {
        let mut nd = NodeDeployment::default();
        nd.spec.template.cloud.aws = Some(AwsNodeSpec::default());
        nd
    }

    #[test]
    fn taint_with_empty_value_is_rejected() {
        let mut nd = aws_deployment();
        nd.spec.template.taints.push(TaintSpec {
            key: "dedicated".to_string(),
            value: String::new(),
            effect: "NoSchedule".to_string(),
        });

        let err = validate(nd, &Version::new(1, 27, 3)).unwrap_err();
        assert!(matches!(err, MachineSpecError::InvalidTaint(_)));
    }

    #[test]
    fn dynamic_config_below_cutoff_is_accepted() {
        let mut nd = aws_deployment();
        nd.spec.dynamic_config = Some(true);
        nd.spec.template.versions.kubelet = "1.23.5".to_string();

        let nd = validate(nd, &Version::new(1, 23, 9)).unwrap();
        assert_eq!(nd.spec.template.versions.kubelet, "1.23.5");
    }

    #[test]
    fn leading_v_is_normalized_on_write_back() {
        let mut nd = aws_deployment();
        nd.spec.template.versions.kubelet = "v1.26.0".to_string();

        let nd = validate(nd, &Version::new(1, 27, 3)).unwrap();
        assert_eq!(nd.spec.template.versions.kubelet, "1.26.0");
    }
}
