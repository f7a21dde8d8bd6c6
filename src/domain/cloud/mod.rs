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

//! Provider raw config generators
//!
//! Each submodule maps the provider's part of a node template, the matching
//! datacenter spec and the cluster into the raw record the machine
//! controller expects for that provider. Generators are pure: they borrow
//! their inputs and build a fresh record every call.
//!
//! [`generate`] selects the generator from the node template's single
//! provider and refuses to run when the datacenter has no spec for it.

pub mod alibaba;
pub mod anexia;
pub mod aws;
pub mod azure;
pub mod baremetal;
pub mod digitalocean;
pub mod equinix;
pub mod gcp;
pub mod hetzner;
pub mod kubevirt;
pub mod nutanix;
pub mod openstack;
pub mod vmware_cloud_director;
pub mod vsphere;

use crate::domain::machine::encoder::encode;
use crate::domain::model::{
    CloudProvider, Cluster, Datacenter, ImageList, NodeCloud, NodeSpec, OperatingSystem,
};
use crate::shared::error::{MachineSpecError, Result};
use k8s_openapi::apimachinery::pkg::runtime::RawExtension;
use std::collections::BTreeSet;
use tracing::debug;

/// Inputs shared by every generator.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorContext<'a> {
    pub cluster: &'a Cluster,
    pub template: &'a NodeSpec,
    pub os: OperatingSystem,
}

/// A generated provider record, kept typed until it is encoded.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderRawConfig {
    Aws(aws::RawConfig),
    Azure(azure::RawConfig),
    VSphere(vsphere::RawConfig),
    Baremetal(baremetal::RawConfig),
    VMwareCloudDirector(vmware_cloud_director::RawConfig),
    Openstack(openstack::RawConfig),
    Hetzner(hetzner::RawConfig),
    Digitalocean(digitalocean::RawConfig),
    EquinixMetal(equinix::RawConfig),
    Gcp(gcp::RawConfig),
    Kubevirt(kubevirt::RawConfig),
    Alibaba(alibaba::RawConfig),
    Anexia(anexia::RawConfig),
    Nutanix(nutanix::RawConfig),
}

impl ProviderRawConfig {
    pub fn provider(&self) -> CloudProvider {
        match self {
            ProviderRawConfig::Aws(_) => CloudProvider::Aws,
            ProviderRawConfig::Azure(_) => CloudProvider::Azure,
            ProviderRawConfig::VSphere(_) => CloudProvider::VSphere,
            ProviderRawConfig::Baremetal(_) => CloudProvider::Baremetal,
            ProviderRawConfig::VMwareCloudDirector(_) => CloudProvider::VMwareCloudDirector,
            ProviderRawConfig::Openstack(_) => CloudProvider::Openstack,
            ProviderRawConfig::Hetzner(_) => CloudProvider::Hetzner,
            ProviderRawConfig::Digitalocean(_) => CloudProvider::Digitalocean,
            ProviderRawConfig::EquinixMetal(_) => CloudProvider::EquinixMetal,
            ProviderRawConfig::Gcp(_) => CloudProvider::Gcp,
            ProviderRawConfig::Kubevirt(_) => CloudProvider::Kubevirt,
            ProviderRawConfig::Alibaba(_) => CloudProvider::Alibaba,
            ProviderRawConfig::Anexia(_) => CloudProvider::Anexia,
            ProviderRawConfig::Nutanix(_) => CloudProvider::Nutanix,
        }
    }

    pub fn encode(&self) -> Result<RawExtension> {
        const WHAT: &str = "cloud provider spec";
        match self {
            ProviderRawConfig::Aws(c) => encode(WHAT, c),
            ProviderRawConfig::Azure(c) => encode(WHAT, c),
            ProviderRawConfig::VSphere(c) => encode(WHAT, c),
            ProviderRawConfig::Baremetal(c) => encode(WHAT, c),
            ProviderRawConfig::VMwareCloudDirector(c) => encode(WHAT, c),
            ProviderRawConfig::Openstack(c) => encode(WHAT, c),
            ProviderRawConfig::Hetzner(c) => encode(WHAT, c),
            ProviderRawConfig::Digitalocean(c) => encode(WHAT, c),
            ProviderRawConfig::EquinixMetal(c) => encode(WHAT, c),
            ProviderRawConfig::Gcp(c) => encode(WHAT, c),
            ProviderRawConfig::Kubevirt(c) => encode(WHAT, c),
            ProviderRawConfig::Alibaba(c) => encode(WHAT, c),
            ProviderRawConfig::Anexia(c) => encode(WHAT, c),
            ProviderRawConfig::Nutanix(c) => encode(WHAT, c),
        }
    }
}

/// Generates the raw config for the template's provider.
pub fn generate(ctx: GeneratorContext<'_>, datacenter: &Datacenter) -> Result<ProviderRawConfig> {
    let node = ctx.template.cloud.provider()?;
    let dc = &datacenter.spec;
    let mismatch = || MachineSpecError::UnknownOrMismatchedProvider {
        node: node.kind().to_string(),
        datacenter: datacenter.name.clone(),
    };

    debug!(provider = %node.kind(), datacenter = %datacenter.name, "generating provider spec");

    let raw = match node {
        NodeCloud::Aws(spec) => {
            let dc = dc.aws.as_ref().ok_or_else(mismatch)?;
            ProviderRawConfig::Aws(aws::raw_config(ctx, spec, dc)?)
        }
        NodeCloud::Azure(spec) => {
            let dc = dc.azure.as_ref().ok_or_else(mismatch)?;
            ProviderRawConfig::Azure(azure::raw_config(ctx, spec, dc)?)
        }
        NodeCloud::VSphere(spec) => {
            let dc = dc.vsphere.as_ref().ok_or_else(mismatch)?;
            ProviderRawConfig::VSphere(vsphere::raw_config(ctx, spec, dc)?)
        }
        NodeCloud::Baremetal(spec) => {
            let dc = dc.baremetal.as_ref().ok_or_else(mismatch)?;
            ProviderRawConfig::Baremetal(baremetal::raw_config(ctx, spec, dc)?)
        }
        NodeCloud::VMwareCloudDirector(spec) => {
            let dc = dc.vmwareclouddirector.as_ref().ok_or_else(mismatch)?;
            ProviderRawConfig::VMwareCloudDirector(vmware_cloud_director::raw_config(
                ctx, spec, dc,
            )?)
        }
        NodeCloud::Openstack(spec) => {
            let dc = dc.openstack.as_ref().ok_or_else(mismatch)?;
            ProviderRawConfig::Openstack(openstack::raw_config(ctx, spec, dc)?)
        }
        NodeCloud::Hetzner(spec) => {
            let dc = dc.hetzner.as_ref().ok_or_else(mismatch)?;
            ProviderRawConfig::Hetzner(hetzner::raw_config(ctx, spec, dc)?)
        }
        NodeCloud::Digitalocean(spec) => {
            let dc = dc.digitalocean.as_ref().ok_or_else(mismatch)?;
            ProviderRawConfig::Digitalocean(digitalocean::raw_config(ctx, spec, dc)?)
        }
        NodeCloud::EquinixMetal(spec) => {
            let dc = dc.equinix.as_ref().ok_or_else(mismatch)?;
            ProviderRawConfig::EquinixMetal(equinix::raw_config(ctx, spec, dc)?)
        }
        NodeCloud::Gcp(spec) => {
            let dc = dc.gcp.as_ref().ok_or_else(mismatch)?;
            ProviderRawConfig::Gcp(gcp::raw_config(ctx, spec, dc)?)
        }
        NodeCloud::Kubevirt(spec) => {
            let dc = dc.kubevirt.as_ref().ok_or_else(mismatch)?;
            ProviderRawConfig::Kubevirt(kubevirt::raw_config(ctx, spec, dc)?)
        }
        NodeCloud::Alibaba(spec) => {
            let dc = dc.alibaba.as_ref().ok_or_else(mismatch)?;
            ProviderRawConfig::Alibaba(alibaba::raw_config(ctx, spec, dc)?)
        }
        NodeCloud::Anexia(spec) => {
            let dc = dc.anexia.as_ref().ok_or_else(mismatch)?;
            ProviderRawConfig::Anexia(anexia::raw_config(ctx, spec, dc)?)
        }
        NodeCloud::Nutanix(spec) => {
            let dc = dc.nutanix.as_ref().ok_or_else(mismatch)?;
            ProviderRawConfig::Nutanix(nutanix::raw_config(ctx, spec, dc)?)
        }
    };

    Ok(raw)
}

/// Cluster identity every provider stamps on the resources it creates.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SystemTags<'a> {
    pub cluster: &'a str,
    pub project: Option<&'a str>,
}

impl<'a> SystemTags<'a> {
    pub fn of(cluster: &'a Cluster) -> Self {
        Self {
            cluster: &cluster.name,
            project: cluster.project_id(),
        }
    }
}

/// Deduplicates and sorts list-typed tags so unchanged input encodes identically.
pub(crate) fn canonical_tags<I>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    tags.into_iter()
        .filter(|tag| !tag.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Explicit node-level image, else the datacenter default for the OS.
pub(crate) fn image_or_default(explicit: &str, defaults: &ImageList, os: OperatingSystem) -> String {
    if !explicit.is_empty() {
        return explicit.to_string();
    }
    defaults.get(os.as_str()).cloned().unwrap_or_default()
}

/// Returns `value` unless it is empty, in which case `fallback` is used.
pub(crate) fn or_default(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::GeneratorContext;
    use crate::domain::model::{Cluster, NodeSpec, OperatingSystem};
    use crate::infrastructure::constants::LABEL_PROJECT_ID;

    pub fn cluster(name: &str, project: Option<&str>) -> Cluster {
        let mut cluster = Cluster {
            name: name.to_string(),
            ..Default::default()
        };
        if let Some(project) = project {
            cluster
                .labels
                .insert(LABEL_PROJECT_ID.to_string(), project.to_string());
        }
        cluster
    }

    pub fn ctx<'a>(cluster: &'a Cluster, template: &'a NodeSpec) -> GeneratorContext<'a> {
        GeneratorContext {
            cluster,
            template,
            os: OperatingSystem::Ubuntu,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::datacenter::{AwsDatacenterSpec, AzureDatacenterSpec};
    use crate::domain::model::node_cloud::AwsNodeSpec;

    #[test]
    fn canonical_tags_are_sorted_and_unique() {
        let tags = canonical_tags(vec![
            "zeta".to_string(),
            "alpha".to_string(),
            String::new(),
            "zeta".to_string(),
        ]);
        assert_eq!(tags, vec!["alpha", "zeta"]);
    }

    #[test]
    fn explicit_image_overrides_default() {
        let mut defaults = ImageList::new();
        defaults.insert("ubuntu".to_string(), "ubuntu-22.04".to_string());

        assert_eq!(
            image_or_default("", &defaults, OperatingSystem::Ubuntu),
            "ubuntu-22.04"
        );
        assert_eq!(
            image_or_default("custom", &defaults, OperatingSystem::Ubuntu),
            "custom"
        );
        assert_eq!(image_or_default("", &defaults, OperatingSystem::Flatcar), "");
    }

    #[test]
    fn mismatched_datacenter_is_rejected() {
        let cluster = test_support::cluster("c1", None);
        let mut template = NodeSpec::default();
        template.cloud.aws = Some(AwsNodeSpec::default());

        let mut datacenter = Datacenter {
            name: "azure-westeurope".to_string(),
            ..Default::default()
        };
        datacenter.spec.azure = Some(AzureDatacenterSpec::default());

        let err = generate(test_support::ctx(&cluster, &template), &datacenter).unwrap_err();
        assert!(matches!(
            err,
            MachineSpecError::UnknownOrMismatchedProvider { .. }
        ));
    }

    #[test]
    fn matching_datacenter_selects_provider() {
        let cluster = test_support::cluster("c1", None);
        let mut template = NodeSpec::default();
        template.cloud.aws = Some(AwsNodeSpec::default());

        let mut datacenter = Datacenter::default();
        datacenter.spec.aws = Some(AwsDatacenterSpec::default());
        datacenter.spec.azure = Some(AzureDatacenterSpec::default());

        let raw = generate(test_support::ctx(&cluster, &template), &datacenter).unwrap();
        assert_eq!(raw.provider(), CloudProvider::Aws);
    }
}
