// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::error::Error;
use crate::unit::UnitKind;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::{CustomResource, Resource};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(CustomResource, Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[kube(group = "operator.github.com", version = "v1", kind = "Deployer")]
#[kube(shortname = "dpl", namespaced, status = "DeployerStatus")]
pub struct DeployerSpec {
    /// Passed through to the Deployment; the cluster default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
    #[serde(rename = "images")]
    pub image: String,
    /// Host of the ingress rule. Empty matches every host.
    #[serde(default)]
    pub host: String,
}

impl DeployerSpec {
    pub fn validate(&self) -> Result<(), Error> {
        if self.image.trim().is_empty() {
            return Err(Error::InvalidSpec("spec.images must not be empty".to_string()));
        }
        if let Some(replicas) = self.replicas {
            if replicas < 0 {
                return Err(Error::InvalidSpec(format!(
                    "spec.replicas must not be negative, got {}",
                    replicas
                )));
            }
        }
        Ok(())
    }
}

// Each flag only ever flips from false to true.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct DeployerStatus {
    #[serde(rename = "deploymentOK", default)]
    pub deployment_ok: bool,
    #[serde(rename = "serviceOK", default)]
    pub service_ok: bool,
    #[serde(rename = "IngressOK", default)]
    pub ingress_ok: bool,
}

impl DeployerStatus {
    pub fn is_provisioned(&self, kind: UnitKind) -> bool {
        match kind {
            UnitKind::Workload => self.deployment_ok,
            UnitKind::NetworkService => self.service_ok,
            UnitKind::RoutingRule => self.ingress_ok,
        }
    }

    pub fn mark_provisioned(&mut self, kind: UnitKind) {
        match kind {
            UnitKind::Workload => self.deployment_ok = true,
            UnitKind::NetworkService => self.service_ok = true,
            UnitKind::RoutingRule => self.ingress_ok = true,
        }
    }

    pub fn all_provisioned(&self) -> bool {
        UnitKind::ALL.iter().all(|kind| self.is_provisioned(*kind))
    }
}

/// Namespace and name of a Deployer object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectKey {
    pub namespace: String,
    pub name: String,
}

impl ObjectKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> ObjectKey {
        ObjectKey {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn from_deployer(deployer: &Deployer) -> Result<ObjectKey, Error> {
        let name = deployer
            .metadata
            .name
            .as_ref()
            .ok_or_else(|| Error::MissingObjectKey(".metadata.name"))?;
        let namespace = deployer
            .metadata
            .namespace
            .as_ref()
            .ok_or_else(|| Error::MissingObjectKey(".metadata.namespace"))?;
        Ok(ObjectKey::new(namespace.clone(), name.clone()))
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// What a unit needs to know about the Deployer that owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentIdentity {
    pub name: String,
    pub namespace: String,
    /// None when the fetched object has no uid yet.
    pub owner_reference: Option<OwnerReference>,
}

impl ParentIdentity {
    pub fn new(key: &ObjectKey, deployer: &Deployer) -> ParentIdentity {
        ParentIdentity {
            name: key.name.clone(),
            namespace: key.namespace.clone(),
            owner_reference: deployer.controller_owner_ref(&()),
        }
    }
}
