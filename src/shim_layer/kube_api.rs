// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::deployer_types::{Deployer, DeployerStatus, ObjectKey};
use crate::shim_layer::{RecordStore, UnitProvisioner};
use crate::unit::ProvisionableUnit;
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use k8s_openapi::api::networking::v1::Ingress;
use kube::{
    api::{Api, Patch, PatchParams, PostParams},
    Client,
};
use serde_json::json;
use tracing::*;

pub struct KubeRecordStore {
    client: Client,
}

impl KubeRecordStore {
    pub fn new(client: Client) -> KubeRecordStore {
        KubeRecordStore { client }
    }
}

#[async_trait]
impl RecordStore for KubeRecordStore {
    async fn get(&self, key: &ObjectKey) -> Result<Deployer, kube::Error> {
        // A quorum read to the API server, not the controller's cache.
        let api = Api::<Deployer>::namespaced(self.client.clone(), &key.namespace);
        api.get(&key.name).await
    }

    async fn update_status(
        &self,
        key: &ObjectKey,
        status: &DeployerStatus,
    ) -> Result<(), kube::Error> {
        let api = Api::<Deployer>::namespaced(self.client.clone(), &key.namespace);
        let patch = Patch::Merge(json!({ "status": status }));
        api.patch_status(&key.name, &PatchParams::default(), &patch)
            .await?;
        debug!(object = %key, ?status, "Status updated");
        Ok(())
    }
}

pub struct KubeUnitProvisioner {
    client: Client,
}

impl KubeUnitProvisioner {
    pub fn new(client: Client) -> KubeUnitProvisioner {
        KubeUnitProvisioner { client }
    }
}

#[async_trait]
impl UnitProvisioner for KubeUnitProvisioner {
    async fn create_unit(&self, unit: &ProvisionableUnit) -> Result<(), kube::Error> {
        let pp = PostParams::default();
        match unit {
            ProvisionableUnit::Workload(deployment) => {
                let api = Api::<Deployment>::namespaced(self.client.clone(), unit.namespace());
                api.create(&pp, deployment).await?;
            }
            ProvisionableUnit::NetworkService(service) => {
                let api = Api::<Service>::namespaced(self.client.clone(), unit.namespace());
                api.create(&pp, service).await?;
            }
            ProvisionableUnit::RoutingRule(ingress) => {
                let api = Api::<Ingress>::namespaced(self.client.clone(), unit.namespace());
                api.create(&pp, ingress).await?;
            }
        }
        Ok(())
    }
}
