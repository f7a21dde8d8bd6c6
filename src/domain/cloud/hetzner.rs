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

use super::GeneratorContext;
use crate::domain::model::datacenter::HetznerDatacenterSpec;
use crate::domain::model::node_cloud::HetznerNodeSpec;
use crate::shared::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    pub server_type: String,
    pub datacenter: String,
    pub location: String,
    pub networks: Vec<String>,
}

pub fn raw_config(
    ctx: GeneratorContext<'_>,
    node: &HetznerNodeSpec,
    dc: &HetznerDatacenterSpec,
) -> Result<RawConfig> {
    let cluster_network = ctx
        .cluster
        .spec
        .cloud
        .hetzner
        .as_ref()
        .map(|cloud| cloud.network.as_str())
        .unwrap_or_default();

    // Node, then cluster, then datacenter.
    let network = [node.network.as_str(), cluster_network, dc.network.as_str()]
        .into_iter()
        .find(|network| !network.is_empty());

    Ok(RawConfig {
        server_type: node.server_type.clone(),
        datacenter: dc.datacenter.clone(),
        location: dc.location.clone(),
        networks: network.map(str::to_string).into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cloud::test_support::{cluster, ctx};
    use crate::domain::model::cluster::HetznerCloudSpec;
    use crate::domain::model::NodeSpec;

    fn datacenter() -> HetznerDatacenterSpec {
        HetznerDatacenterSpec {
            location: "fsn1".to_string(),
            network: "dc-net".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn network_precedence() {
        let mut cluster = cluster("c1", None);
        let template = NodeSpec::default();

        let config =
            raw_config(ctx(&cluster, &template), &HetznerNodeSpec::default(), &datacenter())
                .unwrap();
        assert_eq!(config.networks, vec!["dc-net"]);

        cluster.spec.cloud.hetzner = Some(HetznerCloudSpec {
            network: "cluster-net".to_string(),
        });
        let config =
            raw_config(ctx(&cluster, &template), &HetznerNodeSpec::default(), &datacenter())
                .unwrap();
        assert_eq!(config.networks, vec!["cluster-net"]);

        let node = HetznerNodeSpec {
            server_type: "cx21".to_string(),
            network: "node-net".to_string(),
        };
        let config = raw_config(ctx(&cluster, &template), &node, &datacenter()).unwrap();
        assert_eq!(config.networks, vec!["node-net"]);
        assert_eq!(config.location, "fsn1");
    }

    #[test]
    fn no_network_anywhere_yields_empty_list() {
        let cluster = cluster("c1", None);
        let template = NodeSpec::default();
        let config = raw_config(
            ctx(&cluster, &template),
            &HetznerNodeSpec::default(),
            &HetznerDatacenterSpec::default(),
        )
        .unwrap();
        assert!(config.networks.is_empty());
    }
}
