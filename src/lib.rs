// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
pub mod common;
pub mod config;
pub mod deployer_types;
pub mod error;
pub mod reconciler;
pub mod resources;
pub mod shim_layer;
pub mod step;
pub mod unit;

#[cfg(test)]
pub mod unit_tests;

pub use config::{ControllerConfig, OwnershipPolicy};
pub use deployer_types::{Deployer, DeployerSpec, DeployerStatus, ObjectKey, ParentIdentity};
pub use error::Error;
pub use reconciler::{DeployerReconciler, Directive};
pub use unit::{ProvisionableUnit, UnitKind};
