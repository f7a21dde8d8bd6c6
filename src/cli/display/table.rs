//! Table rendering for CLI output

use super::{ColorTheme, StatusIcon};
use crate::domain::machine::MachineDeployment;
use crate::infrastructure::constants::{
    ANNOTATION_AUTOSCALER_MAX_SIZE, ANNOTATION_AUTOSCALER_MIN_SIZE,
    ANNOTATION_OPERATING_SYSTEM_PROFILE, LABEL_MACHINE,
};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

/// Flattened view of a compiled machine deployment
#[derive(Debug, Clone, Default)]
pub struct DeploymentSummary {
    pub name: String,
    pub namespace: String,
    pub replicas: i32,
    pub paused: bool,
    pub autoscaling: Option<String>,
    pub kubelet: String,
    pub provider: String,
    pub operating_system: String,
    pub operating_system_profile: Option<String>,
    pub machine_label: String,
    pub taints: Vec<String>,
    pub ssh_keys: usize,
}

impl DeploymentSummary {
    pub fn from_deployment(md: &MachineDeployment) -> Self {
        let metadata = &md.metadata;
        let annotations = metadata.annotations.clone().unwrap_or_default();
        let machine = &md.spec.template.spec;

        // providerSpec.value is opaque; only its top-level tags are shown.
        let payload = machine
            .provider_spec
            .value
            .as_ref()
            .map(|raw| raw.0.clone())
            .unwrap_or_default();
        let field = |key: &str| {
            payload
                .get(key)
                .and_then(|v| v.as_str())
                .unwrap_or("-")
                .to_string()
        };

        let autoscaling = match (
            annotations.get(ANNOTATION_AUTOSCALER_MIN_SIZE),
            annotations.get(ANNOTATION_AUTOSCALER_MAX_SIZE),
        ) {
            (None, None) => None,
            (min, max) => Some(format!(
                "{}..{}",
                min.map(String::as_str).unwrap_or("-"),
                max.map(String::as_str).unwrap_or("-")
            )),
        };

        Self {
            name: metadata
                .name
                .clone()
                .or_else(|| metadata.generate_name.as_ref().map(|g| format!("{}*", g)))
                .unwrap_or_default(),
            namespace: metadata.namespace.clone().unwrap_or_default(),
            replicas: md.spec.replicas.unwrap_or(0),
            paused: md.spec.paused,
            autoscaling,
            kubelet: machine.versions.kubelet.clone(),
            provider: field("cloudProvider"),
            operating_system: field("operatingSystem"),
            operating_system_profile: annotations.get(ANNOTATION_OPERATING_SYSTEM_PROFILE).cloned(),
            machine_label: md
                .spec
                .selector
                .match_labels
                .as_ref()
                .and_then(|labels| labels.get(LABEL_MACHINE))
                .cloned()
                .unwrap_or_default(),
            taints: machine
                .taints
                .iter()
                .map(|t| {
                    format!(
                        "{}={}:{}",
                        t.key,
                        t.value.as_deref().unwrap_or_default(),
                        t.effect
                    )
                })
                .collect(),
            ssh_keys: payload
                .get("sshPublicKeys")
                .and_then(|keys| keys.as_array())
                .map(Vec::len)
                .unwrap_or(0),
        }
    }
}

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    /// Create a new table renderer with default theme
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Render a compiled machine deployment as a two-column table
    pub fn render_deployment(&self, summary: &DeploymentSummary) -> String {
        let icon = StatusIcon::get_deployment_icon(summary.replicas, summary.paused);
        let status = StatusIcon::get_status_text(summary.replicas, summary.paused);
        let status_color = self
            .theme
            .get_deployment_color(summary.replicas, summary.paused);

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("FIELD").set_alignment(CellAlignment::Left),
                Cell::new("VALUE").set_alignment(CellAlignment::Left),
            ]);

        table.add_row(vec![Cell::new("Name"), Cell::new(&summary.name)]);
        table.add_row(vec![Cell::new("Namespace"), Cell::new(&summary.namespace)]);
        table.add_row(vec![
            Cell::new("Status"),
            Cell::new(format!("{} {}", icon, status)).fg(status_color),
        ]);
        table.add_row(vec![
            Cell::new("Replicas"),
            Cell::new(summary.replicas.to_string()),
        ]);
        table.add_row(vec![
            Cell::new("Autoscaling"),
            Cell::new(summary.autoscaling.as_deref().unwrap_or("disabled")),
        ]);
        table.add_row(vec![
            Cell::new("Provider"),
            Cell::new(&summary.provider).fg(self.theme.info),
        ]);
        table.add_row(vec![
            Cell::new("Operating System"),
            Cell::new(&summary.operating_system).fg(self.theme.info),
        ]);
        if let Some(profile) = &summary.operating_system_profile {
            table.add_row(vec![Cell::new("OS Profile"), Cell::new(profile)]);
        }
        table.add_row(vec![Cell::new("Kubelet"), Cell::new(&summary.kubelet)]);
        table.add_row(vec![
            Cell::new("Machine Label"),
            Cell::new(&summary.machine_label).fg(self.theme.muted),
        ]);
        table.add_row(vec![
            Cell::new("Taints"),
            Cell::new(if summary.taints.is_empty() {
                "none".to_string()
            } else {
                summary.taints.join("\n")
            }),
        ]);
        table.add_row(vec![
            Cell::new("SSH Keys"),
            Cell::new(summary.ssh_keys.to_string()),
        ]);

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ Machine Deployment {} ─╮\n",
            format!("[{}]", summary.name).bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');
        output.push_str(&format!(
            "Legend: {} Active  {} Paused  {} Idle\n",
            StatusIcon::ACTIVE.green(),
            StatusIcon::PAUSED.yellow(),
            StatusIcon::IDLE.bright_black()
        ));

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::machine::types::ProviderSpec;
    use k8s_openapi::api::core::v1::Taint;
    use k8s_openapi::apimachinery::pkg::runtime::RawExtension;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn compiled() -> MachineDeployment {
        let mut md = MachineDeployment::default();
        md.metadata.generate_name = Some("c1-worker-".to_string());
        md.metadata.namespace = Some("kube-system".to_string());
        md.metadata.annotations = Some(BTreeMap::from([(
            ANNOTATION_AUTOSCALER_MAX_SIZE.to_string(),
            "5".to_string(),
        )]));
        md.spec.replicas = Some(2);
        md.spec.template.spec.versions.kubelet = "1.27.3".to_string();
        md.spec.template.spec.taints.push(Taint {
            key: "dedicated".to_string(),
            value: Some("gpu".to_string()),
            effect: "NoSchedule".to_string(),
            time_added: None,
        });
        md.spec.template.spec.provider_spec = ProviderSpec {
            value: Some(RawExtension(json!({
                "cloudProvider": "aws",
                "operatingSystem": "ubuntu",
                "sshPublicKeys": ["ssh-ed25519 AAAA"]
            }))),
        };
        md
    }

    #[test]
    fn test_summary_from_deployment() {
        let summary = DeploymentSummary::from_deployment(&compiled());
        assert_eq!(summary.name, "c1-worker-*");
        assert_eq!(summary.provider, "aws");
        assert_eq!(summary.operating_system, "ubuntu");
        assert_eq!(summary.autoscaling.as_deref(), Some("-..5"));
        assert_eq!(summary.taints, vec!["dedicated=gpu:NoSchedule"]);
        assert_eq!(summary.ssh_keys, 1);
    }

    #[test]
    fn test_render_deployment() {
        let renderer = TableRenderer::new();
        let output = renderer.render_deployment(&DeploymentSummary::from_deployment(&compiled()));
        assert!(output.contains("c1-worker-*"));
        assert!(output.contains("kube-system"));
        assert!(output.contains("1.27.3"));
        assert!(output.contains("Active"));
    }
}
