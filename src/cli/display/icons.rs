//! Status icons for CLI output

/// Status icons for different states
pub struct StatusIcon;

impl StatusIcon {
    /// Deployment will roll out machines
    pub const ACTIVE: &'static str = "✓";

    /// Deployment is paused
    pub const PAUSED: &'static str = "⏸";

    /// Deployment scales to zero
    pub const IDLE: &'static str = "○";

    pub fn get_deployment_icon(replicas: i32, paused: bool) -> &'static str {
        if paused {
            Self::PAUSED
        } else if replicas == 0 {
            Self::IDLE
        } else {
            Self::ACTIVE
        }
    }

    pub fn get_status_text(replicas: i32, paused: bool) -> &'static str {
        if paused {
            "Paused"
        } else if replicas == 0 {
            "Idle"
        } else {
            "Active"
        }
    }
}
