// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::common::*;
use crate::config::{ControllerConfig, OwnershipPolicy};
use crate::deployer_types::*;
use crate::resources::*;
use crate::unit_tests::fakes::*;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::collections::BTreeMap;

fn demo_parent() -> ParentIdentity {
    let deployer = make_deployer(&demo_key(), demo_spec(), DeployerStatus::default());
    ParentIdentity::new(&demo_key(), &deployer)
}

// Provisions into the Deployer's own namespace, where owner references are allowed.
fn same_namespace_config() -> ControllerConfig {
    ControllerConfig {
        provision_namespace: demo_key().namespace,
        ..ControllerConfig::default()
    }
}

fn app_demo() -> Option<BTreeMap<String, String>> {
    Some(BTreeMap::from([("app".to_string(), "demo".to_string())]))
}

#[test]
pub fn test_make_deployment() {
    let parent = demo_parent();
    let deployment = make_deployment(&demo_spec(), &parent, &ControllerConfig::default());

    assert_eq!(deployment.metadata.name.as_deref(), Some("demo"));
    assert_eq!(deployment.metadata.namespace.as_deref(), Some("sandbox-system"));
    assert_eq!(deployment.metadata.labels, app_demo());

    let spec = deployment.spec.unwrap();
    assert_eq!(spec.replicas, Some(2));
    assert_eq!(spec.selector.match_labels, app_demo());
    assert_eq!(spec.template.metadata.unwrap().labels, app_demo());

    let containers = spec.template.spec.unwrap().containers;
    assert_eq!(containers.len(), 1);
    assert_eq!(containers[0].name, CONTAINER_NAME);
    assert_eq!(containers[0].image.as_deref(), Some("demo:v1"));
    let ports = containers[0].ports.as_ref().unwrap();
    assert_eq!(ports.len(), 1);
    assert_eq!(ports[0].container_port, 80);
}

#[test]
pub fn test_make_deployment_passes_absent_replicas_through() {
    let spec = DeployerSpec {
        replicas: None,
        ..demo_spec()
    };
    let deployment = make_deployment(&spec, &demo_parent(), &ControllerConfig::default());
    assert_eq!(deployment.spec.unwrap().replicas, None);
}

#[test]
pub fn test_make_service() {
    let service = make_service(&demo_parent(), &ControllerConfig::default());

    assert_eq!(service.metadata.name.as_deref(), Some("demo"));
    assert_eq!(service.metadata.namespace.as_deref(), Some("sandbox-system"));
    assert_eq!(service.metadata.owner_references, None);

    let spec = service.spec.unwrap();
    assert_eq!(spec.selector, app_demo());
    let ports = spec.ports.unwrap();
    assert_eq!(ports.len(), 1);
    assert_eq!(ports[0].port, 80);
    assert_eq!(ports[0].target_port, Some(IntOrString::Int(80)));
}

#[test]
pub fn test_make_ingress() {
    let ingress = make_ingress(&demo_spec(), &demo_parent(), &ControllerConfig::default());

    assert_eq!(ingress.metadata.name.as_deref(), Some("demo-ingress"));
    assert_eq!(ingress.metadata.namespace.as_deref(), Some("sandbox-system"));
    assert_eq!(ingress.metadata.owner_references, None);

    let spec = ingress.spec.unwrap();
    assert_eq!(spec.ingress_class_name.as_deref(), Some("nginx"));
    let rules = spec.rules.unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].host.as_deref(), Some("demo.example.com"));

    let paths = &rules[0].http.as_ref().unwrap().paths;
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].path.as_deref(), Some("/"));
    assert_eq!(paths[0].path_type, "Prefix");
    let backend = paths[0].backend.service.as_ref().unwrap();
    assert_eq!(backend.name, "demo");
    assert_eq!(backend.port.as_ref().unwrap().number, Some(80));
}

#[test]
pub fn test_make_ingress_with_empty_host_matches_all_hosts() {
    let spec = DeployerSpec {
        host: String::new(),
        ..demo_spec()
    };
    let ingress = make_ingress(&spec, &demo_parent(), &ControllerConfig::default());
    let rules = ingress.spec.unwrap().rules.unwrap();
    assert_eq!(rules[0].host, None);
}

#[test]
pub fn test_units_land_in_the_configured_namespace() {
    let config = ControllerConfig {
        provision_namespace: "web-units".to_string(),
        ..ControllerConfig::default()
    };
    let parent = demo_parent();
    assert_eq!(
        make_deployment(&demo_spec(), &parent, &config).metadata.namespace.as_deref(),
        Some("web-units")
    );
    assert_eq!(make_service(&parent, &config).metadata.namespace.as_deref(), Some("web-units"));
    assert_eq!(
        make_ingress(&demo_spec(), &parent, &config).metadata.namespace.as_deref(),
        Some("web-units")
    );
}

#[test]
pub fn test_workload_owned_by_parent_in_same_namespace() {
    let config = same_namespace_config();
    let parent = demo_parent();
    assert_eq!(
        make_deployment(&demo_spec(), &parent, &config).metadata.owner_references,
        Some(vec![parent.owner_reference.clone().unwrap()])
    );
    assert_eq!(make_service(&parent, &config).metadata.owner_references, None);
    assert_eq!(make_ingress(&demo_spec(), &parent, &config).metadata.owner_references, None);
}

#[test]
pub fn test_cross_namespace_parent_gets_no_owner_reference() {
    let parent = demo_parent();
    assert_eq!(parent.namespace, "default");
    let config = ControllerConfig {
        ownership: OwnershipPolicy::AllUnits,
        ..ControllerConfig::default()
    };
    assert_eq!(config.provision_namespace, "sandbox-system");
    assert!(!can_link_owner(&parent, &config));

    let deployment = make_deployment(&demo_spec(), &parent, &ControllerConfig::default());
    assert_eq!(deployment.metadata.owner_references, None);
    assert_eq!(make_deployment(&demo_spec(), &parent, &config).metadata.owner_references, None);
    assert_eq!(make_service(&parent, &config).metadata.owner_references, None);
    assert_eq!(make_ingress(&demo_spec(), &parent, &config).metadata.owner_references, None);
}

#[test]
pub fn test_all_units_ownership_links_every_unit() {
    let config = ControllerConfig {
        ownership: OwnershipPolicy::AllUnits,
        ..same_namespace_config()
    };
    let parent = demo_parent();
    let expected = Some(vec![parent.owner_reference.clone().unwrap()]);
    assert_eq!(make_deployment(&demo_spec(), &parent, &config).metadata.owner_references, expected);
    assert_eq!(make_service(&parent, &config).metadata.owner_references, expected);
    assert_eq!(make_ingress(&demo_spec(), &parent, &config).metadata.owner_references, expected);
}

#[test]
pub fn test_parent_without_uid_gets_no_owner_reference() {
    let parent = ParentIdentity {
        owner_reference: None,
        ..demo_parent()
    };
    let deployment = make_deployment(&demo_spec(), &parent, &same_namespace_config());
    assert_eq!(deployment.metadata.owner_references, None);
}

#[test]
pub fn test_manifests_are_deterministic() {
    let parent = demo_parent();
    let config = ControllerConfig::default();
    assert_eq!(
        make_deployment(&demo_spec(), &parent, &config),
        make_deployment(&demo_spec(), &parent, &config)
    );
    assert_eq!(make_service(&parent, &config), make_service(&parent, &config));
    assert_eq!(
        make_ingress(&demo_spec(), &parent, &config),
        make_ingress(&demo_spec(), &parent, &config)
    );
}
