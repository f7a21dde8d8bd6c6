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

use machinespec::domain::model::datacenter::{
    AwsDatacenterSpec, AzureDatacenterSpec, VMwareCloudDirectorDatacenterSpec,
};
use machinespec::domain::model::node_cloud::{
    AwsNodeSpec, AzureNodeSpec, VMwareCloudDirectorNodeSpec,
};
use machinespec::domain::model::operating_system::{FlatcarSpec, RhelSpec, UbuntuSpec};
use machinespec::domain::model::{Cluster, Datacenter, GlobalSettings, NodeDeployment, UserSshKey};
use machinespec::{deployment, MachineSpecError};
use serde_json::Value;
use std::collections::BTreeMap;

fn cluster() -> Cluster {
    Cluster {
        name: "c1".to_string(),
        ..Default::default()
    }
}

fn aws_datacenter() -> Datacenter {
    let mut dc = Datacenter {
        name: "aws-eu-west-1".to_string(),
        ..Default::default()
    };
    dc.spec.aws = Some(AwsDatacenterSpec {
        region: "eu-west-1".to_string(),
        images: BTreeMap::from([("ubuntu".to_string(), "ami-ubuntu".to_string())]),
    });
    dc
}

fn aws_node_deployment() -> NodeDeployment {
    let mut nd = NodeDeployment {
        name: "workers".to_string(),
        ..Default::default()
    };
    nd.spec.replicas = 3;
    nd.spec.template.versions.kubelet = "1.27.3".to_string();
    nd.spec.template.cloud.aws = Some(AwsNodeSpec {
        instance_type: "t3.medium".to_string(),
        availability_zone: "eu-west-1a".to_string(),
        subnet_id: "subnet-1".to_string(),
        ..Default::default()
    });
    nd.spec.template.operating_system.ubuntu = Some(UbuntuSpec::default());
    nd
}

fn provider_value(md: &machinespec::MachineDeployment) -> Value {
    md.spec
        .template
        .spec
        .provider_spec
        .value
        .as_ref()
        .map(|raw| raw.0.clone())
        .expect("providerSpec.value is set")
}

#[test]
fn test_aws_end_to_end() {
    let keys = vec![UserSshKey::new("admin", "ssh-ed25519 AAAA")];
    let md = deployment(
        &aws_node_deployment(),
        &cluster(),
        &aws_datacenter(),
        &keys,
        &GlobalSettings::default(),
    )
    .unwrap();

    assert_eq!(md.spec.replicas, Some(3));
    assert_eq!(md.spec.template.spec.versions.kubelet, "1.27.3");

    let value = provider_value(&md);
    assert_eq!(value["cloudProvider"], "aws");
    assert_eq!(value["operatingSystem"], "ubuntu");
    assert_eq!(value["sshPublicKeys"][0], "ssh-ed25519 AAAA");

    let aws = &value["cloudProviderSpec"];
    assert_eq!(aws["region"], "eu-west-1");
    assert_eq!(aws["diskType"], "gp2");
    assert_eq!(aws["diskSize"], 25);
    assert_eq!(aws["ami"], "ami-ubuntu");
    assert_eq!(aws["tags"]["kubernetes.io/cluster/c1"], "");
    assert_eq!(aws["tags"]["system/cluster"], "c1");
}

#[test]
fn test_aws_against_azure_datacenter_is_rejected() {
    let mut dc = Datacenter {
        name: "azure-westeurope".to_string(),
        ..Default::default()
    };
    dc.spec.azure = Some(AzureDatacenterSpec {
        location: "westeurope".to_string(),
        ..Default::default()
    });

    let err = deployment(
        &aws_node_deployment(),
        &cluster(),
        &dc,
        &[],
        &GlobalSettings::default(),
    )
    .unwrap_err();

    match err {
        MachineSpecError::UnknownOrMismatchedProvider { node, datacenter } => {
            assert_eq!(node, "aws");
            assert_eq!(datacenter, "azure-westeurope");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_multiple_providers_are_rejected() {
    let mut nd = aws_node_deployment();
    nd.spec.template.cloud.azure = Some(AzureNodeSpec::default());

    let err = deployment(
        &nd,
        &cluster(),
        &aws_datacenter(),
        &[],
        &GlobalSettings::default(),
    )
    .unwrap_err();

    assert!(matches!(err, MachineSpecError::MultipleProviders(_)));
    assert!(err.to_string().contains("aws"));
    assert!(err.to_string().contains("azure"));
}

#[test]
fn test_compilation_is_idempotent() {
    let nd = aws_node_deployment();
    let settings = GlobalSettings::default();

    let first = deployment(&nd, &cluster(), &aws_datacenter(), &[], &settings).unwrap();
    let second = deployment(&nd, &cluster(), &aws_datacenter(), &[], &settings).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_flatcar_on_vmware_cloud_director_uses_cloud_init() {
    let mut dc = Datacenter {
        name: "vcd".to_string(),
        ..Default::default()
    };
    dc.spec.vmwareclouddirector = Some(VMwareCloudDirectorDatacenterSpec {
        default_catalog: "kubermatic".to_string(),
        default_storage_profile: "*".to_string(),
        templates: BTreeMap::from([("flatcar".to_string(), "flatcar-3510".to_string())]),
        ..Default::default()
    });

    let mut nd = NodeDeployment {
        name: "workers".to_string(),
        ..Default::default()
    };
    nd.spec.template.cloud.vmwareclouddirector = Some(VMwareCloudDirectorNodeSpec {
        cpus: 2,
        memory_mb: 4096,
        ..Default::default()
    });
    nd.spec.template.operating_system.flatcar = Some(FlatcarSpec::default());

    let md = deployment(&nd, &cluster(), &dc, &[], &GlobalSettings::default()).unwrap();
    let value = provider_value(&md);

    assert_eq!(value["operatingSystem"], "flatcar");
    assert_eq!(
        value["operatingSystemSpec"]["provisioningUtility"],
        "cloud-init"
    );
    assert_eq!(value["cloudProviderSpec"]["template"], "flatcar-3510");
    assert_eq!(value["cloudProviderSpec"]["ipAllocationMode"], "DHCP");
}

#[test]
fn test_auto_update_enforcement_per_operating_system() {
    let settings: GlobalSettings = serde_json::from_value(serde_json::json!({
        "machineDeploymentOptions": {
            "autoUpdatesEnabled": true,
            "autoUpdatesEnforced": true
        }
    }))
    .unwrap();

    // Ubuntu without dist upgrades is rejected.
    let err = deployment(
        &aws_node_deployment(),
        &cluster(),
        &aws_datacenter(),
        &[],
        &settings,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        MachineSpecError::AutoUpdatesEnforced {
            operating_system: "ubuntu"
        }
    ));

    // RHEL with dist upgrades passes.
    let mut nd = aws_node_deployment();
    nd.spec.template.operating_system.ubuntu = None;
    nd.spec.template.operating_system.rhel = Some(RhelSpec {
        dist_upgrade_on_boot: true,
        ..Default::default()
    });
    let mut dc = aws_datacenter();
    if let Some(aws) = dc.spec.aws.as_mut() {
        aws.images.insert("rhel".to_string(), "ami-rhel".to_string());
    }
    let md = deployment(&nd, &cluster(), &dc, &[], &settings).unwrap();
    assert_eq!(provider_value(&md)["operatingSystem"], "rhel");

    // Flatcar keeps updating unless told otherwise.
    let mut nd = aws_node_deployment();
    nd.spec.template.operating_system.ubuntu = None;
    nd.spec.template.operating_system.flatcar = Some(FlatcarSpec {
        disable_auto_update: true,
    });
    let err = deployment(&nd, &cluster(), &aws_datacenter(), &[], &settings).unwrap_err();
    assert!(matches!(err, MachineSpecError::AutoUpdatesEnforced { .. }));
}
