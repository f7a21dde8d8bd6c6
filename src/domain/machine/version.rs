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

//! Kubelet version parsing and the kubelet/control-plane skew policy.

use crate::infrastructure::constants::MAX_KUBELET_MINOR_SKEW;
use semver::Version;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionSkewError {
    #[error("kubelet version {kubelet} is newer than control plane version {control_plane}")]
    KubeletNewer {
        kubelet: String,
        control_plane: String,
    },

    #[error(
        "kubelet version {kubelet} is more than {max_skew} minor versions behind control plane version {control_plane}"
    )]
    KubeletTooOld {
        kubelet: String,
        control_plane: String,
        max_skew: u64,
    },
}

/// Parses a Kubernetes version, accepting an optional leading `v`.
pub fn parse_version(raw: &str) -> Result<Version, semver::Error> {
    let trimmed = raw.trim();
    Version::parse(trimmed.strip_prefix('v').unwrap_or(trimmed))
}

/// Checks that a kubelet may join a control plane of the given version.
///
/// Only major and minor are compared: any patch release of the control
/// plane's minor is accepted.
pub fn ensure_version_compatible(
    control_plane: &Version,
    kubelet: &Version,
) -> Result<(), VersionSkewError> {
    let cp = (control_plane.major, control_plane.minor);
    let kl = (kubelet.major, kubelet.minor);

    if kl > cp {
        return Err(VersionSkewError::KubeletNewer {
            kubelet: kubelet.to_string(),
            control_plane: control_plane.to_string(),
        });
    }

    let too_old = kl.0 < cp.0 || cp.1.saturating_sub(kl.1) > MAX_KUBELET_MINOR_SKEW;
    if too_old {
        return Err(VersionSkewError::KubeletTooOld {
            kubelet: kubelet.to_string(),
            control_plane: control_plane.to_string(),
            max_skew: MAX_KUBELET_MINOR_SKEW,
        });
    }

    Ok(())
}
