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

//! Dynamic kubelet configuration.
//!
//! Only kubelets below 1.24 support it; the validator rejects the flag for
//! newer versions. Everything about the feature lives in this module so it
//! can be removed in one piece once those kubelets are no longer supported.

use super::types::{ConfigMapNodeConfigSource, NodeConfigSource};
use crate::infrastructure::constants::{
    DYNAMIC_CONFIG_CUTOFF, KUBELET_CONFIG_KEY, KUBELET_CONFIG_MAP_PREFIX,
    KUBELET_CONFIG_NAMESPACE,
};
use semver::Version;

/// Whether the kubelet can still consume a dynamic config source.
pub fn supports_dynamic_config(kubelet: &Version) -> bool {
    (kubelet.major, kubelet.minor) < DYNAMIC_CONFIG_CUTOFF
}

/// Config source pointing at the per-minor kubelet ConfigMap.
pub fn kubelet_config_source(kubelet: &Version) -> NodeConfigSource {
    NodeConfigSource {
        config_map: Some(ConfigMapNodeConfigSource {
            namespace: KUBELET_CONFIG_NAMESPACE.to_string(),
            name: format!(
                "{}{}.{}",
                KUBELET_CONFIG_MAP_PREFIX, kubelet.major, kubelet.minor
            ),
            kubelet_config_key: KUBELET_CONFIG_KEY.to_string(),
        }),
    }
}

/// Config source for a deployment that asked for dynamic config, if any.
pub fn dynamic_config_source(requested: Option<bool>, kubelet: &Version) -> Option<NodeConfigSource> {
    if requested.unwrap_or(false) && supports_dynamic_config(kubelet) {
        Some(kubelet_config_source(kubelet))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_map_name_uses_major_minor() {
        let source = kubelet_config_source(&Version::new(1, 23, 17));
        let cm = source.config_map.unwrap();
        assert_eq!(cm.name, "kubelet-config-1.23");
        assert_eq!(cm.namespace, "kube-system");
        assert_eq!(cm.kubelet_config_key, "kubelet");
    }

    #[test]
    fn cutoff_is_1_24() {
        assert!(supports_dynamic_config(&Version::new(1, 23, 0)));
        assert!(!supports_dynamic_config(&Version::new(1, 24, 0)));
    }

    #[test]
    fn not_requested_yields_nothing() {
        assert!(dynamic_config_source(None, &Version::new(1, 22, 0)).is_none());
        assert!(dynamic_config_source(Some(false), &Version::new(1, 22, 0)).is_none());
        assert!(dynamic_config_source(Some(true), &Version::new(1, 22, 0)).is_some());
    }
}
