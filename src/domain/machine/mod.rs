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

//! Node deployment to machine deployment compilation

pub mod compiler;
pub mod encoder;
pub mod legacy;
pub mod types;
pub mod validator;
pub mod version;

pub use self::compiler::{deployment, MachineDeploymentBuilder};
pub use self::encoder::encode;
pub use self::types::{Config, MachineDeployment};
pub use self::validator::{validate, validate_auto_update_enforcement};
pub use self::version::VersionSkewError;
