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

use crate::shared::error::{MachineSpecError, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::Client;
use tracing::debug;

/// Creates a client for the seed cluster.
///
/// Without a kubeconfig path or context the default resolution applies
/// (in-cluster config, `KUBECONFIG`, then `~/.kube/config`).
pub async fn connect(kubeconfig_path: Option<&str>, context: Option<String>) -> Result<Client> {
    if kubeconfig_path.is_none() && context.is_none() {
        debug!("using default kubernetes client configuration");
        return Client::try_default().await.map_err(|e| {
            MachineSpecError::KubeError(format!("Failed to create Kubernetes client: {}", e))
        });
    }

    let kubeconfig = match kubeconfig_path {
        Some(path) => Kubeconfig::read_from(path),
        None => Kubeconfig::read(),
    }
    .map_err(|e| MachineSpecError::KubeError(format!("Failed to load kubeconfig: {}", e)))?;

    let options = KubeConfigOptions {
        context,
        cluster: None,
        user: None,
    };

    let config = kube::Config::from_custom_kubeconfig(kubeconfig, &options)
        .await
        .map_err(|e| {
            MachineSpecError::KubeError(format!("Failed to create Kubernetes config: {}", e))
        })?;

    Client::try_from(config).map_err(|e| {
        MachineSpecError::KubeError(format!("Failed to create Kubernetes client: {}", e))
    })
}
