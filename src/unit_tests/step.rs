// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::config::ControllerConfig;
use crate::deployer_types::*;
use crate::step::*;
use crate::unit::{ProvisionableUnit, UnitKind};
use crate::unit_tests::fakes::*;

#[test]
pub fn test_default_steps_order() {
    let kinds: Vec<UnitKind> = default_steps().iter().map(|step| step.kind()).collect();
    assert_eq!(kinds, UnitKind::ALL.to_vec());
}

#[test]
pub fn test_steps_build_their_own_kind() {
    let deployer = make_deployer(&demo_key(), demo_spec(), DeployerStatus::default());
    let parent = ParentIdentity::new(&demo_key(), &deployer);
    let config = ControllerConfig::default();
    for step in default_steps() {
        let unit = step.build(&demo_spec(), &parent, &config);
        assert_eq!(unit.kind(), step.kind());
        assert_eq!(unit.namespace(), "sandbox-system");
    }
    assert!(matches!(
        RoutingRuleStep.build(&demo_spec(), &parent, &config),
        ProvisionableUnit::RoutingRule(_)
    ));
    assert_eq!(
        RoutingRuleStep.build(&demo_spec(), &parent, &config).key(),
        "Ingress/sandbox-system/demo-ingress"
    );
}

#[test]
pub fn test_is_done_and_mark_done_follow_the_status_flag() {
    let mut status = DeployerStatus::default();
    assert!(!NetworkServiceStep.is_done(&status));
    NetworkServiceStep.mark_done(&mut status);
    assert!(NetworkServiceStep.is_done(&status));
    assert!(!WorkloadStep.is_done(&status));
    assert!(!RoutingRuleStep.is_done(&status));
}

#[test]
pub fn test_strict_classifier_fails_on_already_exists() {
    let err = api_error("AlreadyExists", 409);
    assert_eq!(
        StrictClassifier.classify(UnitKind::Workload, &err),
        CreateFailure::Failed
    );
}

#[test]
pub fn test_already_exists_classifier() {
    let classifier = AlreadyExistsIsProvisioned;
    assert_eq!(
        classifier.classify(UnitKind::Workload, &api_error("AlreadyExists", 409)),
        CreateFailure::AlreadyProvisioned
    );
    assert_eq!(
        classifier.classify(UnitKind::Workload, &api_error("InternalError", 500)),
        CreateFailure::Failed
    );
}

#[test]
pub fn test_classifier_for_config() {
    let err = api_error("AlreadyExists", 409);
    let strict = classifier_for(&ControllerConfig::default());
    assert_eq!(strict.classify(UnitKind::RoutingRule, &err), CreateFailure::Failed);

    let lenient = classifier_for(&ControllerConfig {
        treat_already_exists_as_provisioned: true,
        ..ControllerConfig::default()
    });
    assert_eq!(
        lenient.classify(UnitKind::RoutingRule, &err),
        CreateFailure::AlreadyProvisioned
    );
}

#[test]
pub fn test_only_the_workload_step_validates_the_image() {
    let spec = DeployerSpec {
        image: String::new(),
        ..demo_spec()
    };
    assert!(WorkloadStep.validate(&spec).is_err());
    assert!(NetworkServiceStep.validate(&spec).is_ok());
    assert!(RoutingRuleStep.validate(&spec).is_ok());
    assert!(WorkloadStep.validate(&demo_spec()).is_ok());
}
