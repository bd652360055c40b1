// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use k8s_openapi::api::networking::v1::Ingress;
use kube::api::ObjectMeta;
use std::fmt;

/// The kinds of sub-resources a Deployer provisions, in provisioning order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UnitKind {
    Workload,
    NetworkService,
    RoutingRule,
}

impl UnitKind {
    pub const ALL: [UnitKind; 3] = [
        UnitKind::Workload,
        UnitKind::NetworkService,
        UnitKind::RoutingRule,
    ];

    /// Kubernetes kind of the object backing this unit.
    pub fn object_kind(&self) -> &'static str {
        match self {
            UnitKind::Workload => "Deployment",
            UnitKind::NetworkService => "Service",
            UnitKind::RoutingRule => "Ingress",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.object_kind())
    }
}

/// A fully built manifest ready to be sent to the cluster.
#[derive(Debug, Clone, PartialEq)]
pub enum ProvisionableUnit {
    Workload(Deployment),
    NetworkService(Service),
    RoutingRule(Ingress),
}

impl ProvisionableUnit {
    pub fn kind(&self) -> UnitKind {
        match self {
            ProvisionableUnit::Workload(_) => UnitKind::Workload,
            ProvisionableUnit::NetworkService(_) => UnitKind::NetworkService,
            ProvisionableUnit::RoutingRule(_) => UnitKind::RoutingRule,
        }
    }

    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            ProvisionableUnit::Workload(deployment) => &deployment.metadata,
            ProvisionableUnit::NetworkService(service) => &service.metadata,
            ProvisionableUnit::RoutingRule(ingress) => &ingress.metadata,
        }
    }

    pub fn name(&self) -> &str {
        self.metadata().name.as_deref().unwrap_or_default()
    }

    pub fn namespace(&self) -> &str {
        self.metadata().namespace.as_deref().unwrap_or_default()
    }

    /// "Kind/namespace/name", used as the log key of the unit.
    pub fn key(&self) -> String {
        format!("{}/{}/{}", self.kind(), self.namespace(), self.name())
    }
}
