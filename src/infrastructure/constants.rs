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

/// MachineDeployment resource
pub const MACHINE_DEPLOYMENT_API_VERSION: &str = "cluster.k8s.io/v1alpha1";
pub const MACHINE_DEPLOYMENT_KIND: &str = "MachineDeployment";
pub const MACHINE_DEPLOYMENT_NAMESPACE: &str = "kube-system";
pub const GENERATE_NAME_SUFFIX: &str = "-worker-";

/// Selector label
pub const LABEL_MACHINE: &str = "machine";
pub const MACHINE_LABEL_HASH_LEN: usize = 10;

/// System labels stamped on machines and nodes
pub const LABEL_SYSTEM_CLUSTER: &str = "system/cluster";
pub const LABEL_SYSTEM_PROJECT: &str = "system/project";

/// Cluster label carrying the owning project
pub const LABEL_PROJECT_ID: &str = "project-id";

/// Annotations
pub const ANNOTATION_OPERATING_SYSTEM_PROFILE: &str = "k8c.io/operating-system-profile";
pub const ANNOTATION_AUTOSCALER_MIN_SIZE: &str =
    "cluster.k8s.io/cluster-api-autoscaler-node-group-min-size";
pub const ANNOTATION_AUTOSCALER_MAX_SIZE: &str =
    "cluster.k8s.io/cluster-api-autoscaler-node-group-max-size";
pub const ANNOTATION_MACHINE_INITIALIZERS: &str = "machine-controller.kubermatic.io/initializers";
pub const INITIALIZER_IPAM: &str = "ipam";

/// Legacy dynamic kubelet config
pub const KUBELET_CONFIG_NAMESPACE: &str = "kube-system";
pub const KUBELET_CONFIG_MAP_PREFIX: &str = "kubelet-config-";
pub const KUBELET_CONFIG_KEY: &str = "kubelet";

/// Kubelet version policy
pub const MAX_KUBELET_MINOR_SKEW: u64 = 2;
pub const DYNAMIC_CONFIG_CUTOFF: (u64, u64) = (1, 24);

/// Taint effects accepted by the kubelet
pub const TAINT_EFFECT_NO_EXECUTE: &str = "NoExecute";
pub const TAINT_EFFECT_NO_SCHEDULE: &str = "NoSchedule";
pub const TAINT_EFFECT_PREFER_NO_SCHEDULE: &str = "PreferNoSchedule";
pub const TAINT_EFFECTS: [&str; 3] = [
    TAINT_EFFECT_NO_EXECUTE,
    TAINT_EFFECT_NO_SCHEDULE,
    TAINT_EFFECT_PREFER_NO_SCHEDULE,
];

/// AWS defaults
pub const AWS_DEFAULT_DISK_TYPE: &str = "gp2";
pub const AWS_DEFAULT_DISK_SIZE: i32 = 25;

/// VMware Cloud Director defaults
pub const VCD_DEFAULT_IP_ALLOCATION_MODE: &str = "DHCP";

/// Equinix Metal defaults
pub const EQUINIX_DEFAULT_BILLING_CYCLE: &str = "hourly";

/// Baremetal drivers
pub const BAREMETAL_DRIVER_TINKERBELL: &str = "tinkerbell";

/// Namespace used for hardware references that do not name one
pub const DEFAULT_HARDWARE_NAMESPACE: &str = "default";

/// Cluster namespace prefix on the seed
pub const CLUSTER_NAMESPACE_PREFIX: &str = "cluster-";

/// Flatcar provisioning utilities
pub const FLATCAR_PROVISIONING_IGNITION: &str = "ignition";
pub const FLATCAR_PROVISIONING_CLOUD_INIT: &str = "cloud-init";

/// Global settings resource on the management cluster
pub const SETTINGS_GROUP: &str = "kubermatic.k8c.io";
pub const SETTINGS_VERSION: &str = "v1";
pub const SETTINGS_KIND: &str = "KubermaticSetting";
pub const SETTINGS_PLURAL: &str = "kubermaticsettings";
pub const SETTINGS_NAME: &str = "globalsettings";
