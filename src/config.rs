// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::common::DEFAULT_PROVISION_NAMESPACE;
use crate::unit::UnitKind;
use std::time::Duration;

/// Which provisioned units carry a controller owner reference to their Deployer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OwnershipPolicy {
    /// Only the Deployment is linked to its Deployer.
    #[default]
    WorkloadOnly,
    AllUnits,
}

impl OwnershipPolicy {
    pub fn links(&self, kind: UnitKind) -> bool {
        match self {
            OwnershipPolicy::WorkloadOnly => kind == UnitKind::Workload,
            OwnershipPolicy::AllUnits => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Every unit is created here, whatever the namespace of its Deployer.
    pub provision_namespace: String,
    pub ownership: OwnershipPolicy,
    /// Count an "AlreadyExists" create failure as a provisioned unit.
    pub treat_already_exists_as_provisioned: bool,
    /// Deadline of one reconcile pass.
    pub reconcile_timeout: Duration,
    /// Requeue delay handed to the controller after a failed pass.
    pub error_requeue: Duration,
}

impl Default for ControllerConfig {
    fn default() -> ControllerConfig {
        ControllerConfig {
            provision_namespace: DEFAULT_PROVISION_NAMESPACE.to_string(),
            ownership: OwnershipPolicy::default(),
            treat_already_exists_as_provisioned: false,
            reconcile_timeout: Duration::from_secs(30),
            error_requeue: Duration::from_secs(10),
        }
    }
}
