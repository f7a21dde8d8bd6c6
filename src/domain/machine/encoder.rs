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

//! Serialization of raw records into opaque provider-spec payloads.

use crate::shared::error::{MachineSpecError, Result};
use k8s_openapi::apimachinery::pkg::runtime::RawExtension;
use serde::Serialize;

/// Encodes a raw record as the JSON payload embedded in the output object.
///
/// `what` names the record in the error if serialization fails.
pub fn encode<T: Serialize>(what: &'static str, record: &T) -> Result<RawExtension> {
    serde_json::to_value(record)
        .map(RawExtension)
        .map_err(|source| MachineSpecError::Encoding { what, source })
}
