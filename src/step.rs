// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::config::ControllerConfig;
use crate::deployer_types::{DeployerSpec, DeployerStatus, ParentIdentity};
use crate::error::{is_already_exists, Error};
use crate::resources::{make_deployment, make_ingress, make_service};
use crate::unit::{ProvisionableUnit, UnitKind};

// A provisioning step decides whether its unit still has to be created and,
// if so, builds the manifest. Creating the unit is left to the reconciler so
// every step stays a pure function of (desired state, status).
pub trait ProvisioningStep: Send + Sync {
    fn kind(&self) -> UnitKind;

    fn build(
        &self,
        desired: &DeployerSpec,
        parent: &ParentIdentity,
        config: &ControllerConfig,
    ) -> ProvisionableUnit;

    /// Rejects desired state this step cannot turn into a valid manifest.
    /// Only the failing step is held back; the other steps still run.
    fn validate(&self, _desired: &DeployerSpec) -> Result<(), Error> {
        Ok(())
    }

    fn is_done(&self, status: &DeployerStatus) -> bool {
        status.is_provisioned(self.kind())
    }

    fn mark_done(&self, status: &mut DeployerStatus) {
        status.mark_provisioned(self.kind())
    }
}

pub struct WorkloadStep;

impl ProvisioningStep for WorkloadStep {
    fn kind(&self) -> UnitKind {
        UnitKind::Workload
    }

    fn validate(&self, desired: &DeployerSpec) -> Result<(), Error> {
        desired.validate()
    }

    fn build(
        &self,
        desired: &DeployerSpec,
        parent: &ParentIdentity,
        config: &ControllerConfig,
    ) -> ProvisionableUnit {
        ProvisionableUnit::Workload(make_deployment(desired, parent, config))
    }
}

pub struct NetworkServiceStep;

impl ProvisioningStep for NetworkServiceStep {
    fn kind(&self) -> UnitKind {
        UnitKind::NetworkService
    }

    fn build(
        &self,
        _desired: &DeployerSpec,
        parent: &ParentIdentity,
        config: &ControllerConfig,
    ) -> ProvisionableUnit {
        ProvisionableUnit::NetworkService(make_service(parent, config))
    }
}

pub struct RoutingRuleStep;

impl ProvisioningStep for RoutingRuleStep {
    fn kind(&self) -> UnitKind {
        UnitKind::RoutingRule
    }

    fn build(
        &self,
        desired: &DeployerSpec,
        parent: &ParentIdentity,
        config: &ControllerConfig,
    ) -> ProvisionableUnit {
        ProvisionableUnit::RoutingRule(make_ingress(desired, parent, config))
    }
}

/// The steps in the order a reconcile pass runs them.
pub fn default_steps() -> Vec<Box<dyn ProvisioningStep>> {
    vec![
        Box::new(WorkloadStep),
        Box::new(NetworkServiceStep),
        Box::new(RoutingRuleStep),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateFailure {
    /// The unit is known to exist; record it as provisioned.
    AlreadyProvisioned,
    Failed,
}

/// Decides what a failed create means for the unit's flag.
pub trait CreateErrorClassifier: Send + Sync {
    fn classify(&self, kind: UnitKind, error: &kube::Error) -> CreateFailure;
}

/// Every create failure is a failure, including "AlreadyExists".
pub struct StrictClassifier;

impl CreateErrorClassifier for StrictClassifier {
    fn classify(&self, _kind: UnitKind, _error: &kube::Error) -> CreateFailure {
        CreateFailure::Failed
    }
}

/// An "AlreadyExists" failure means an earlier pass created the unit but
/// never recorded it in the status.
pub struct AlreadyExistsIsProvisioned;

impl CreateErrorClassifier for AlreadyExistsIsProvisioned {
    fn classify(&self, _kind: UnitKind, error: &kube::Error) -> CreateFailure {
        if is_already_exists(error) {
            CreateFailure::AlreadyProvisioned
        } else {
            CreateFailure::Failed
        }
    }
}

pub fn classifier_for(config: &ControllerConfig) -> Box<dyn CreateErrorClassifier> {
    if config.treat_already_exists_as_provisioned {
        Box::new(AlreadyExistsIsProvisioned)
    } else {
        Box::new(StrictClassifier)
    }
}
