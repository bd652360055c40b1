// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
pub mod controller_runtime;
pub mod kube_api;

use crate::deployer_types::{Deployer, DeployerStatus, ObjectKey};
use crate::unit::ProvisionableUnit;
use async_trait::async_trait;

// The shim layer connects the reconciler to the Kubernetes API.
// The reconciler only sees these two traits, so it can be driven by the
// kube-rs implementations in kube_api or by in-memory fakes.

/// Where Deployer objects and their status live.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// A missing object surfaces as an API error with reason "NotFound".
    async fn get(&self, key: &ObjectKey) -> Result<Deployer, kube::Error>;

    async fn update_status(&self, key: &ObjectKey, status: &DeployerStatus)
        -> Result<(), kube::Error>;
}

/// Creates provisioned units in the cluster.
#[async_trait]
pub trait UnitProvisioner: Send + Sync {
    async fn create_unit(&self, unit: &ProvisionableUnit) -> Result<(), kube::Error>;
}
