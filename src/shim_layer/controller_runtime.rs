// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::config::ControllerConfig;
use crate::deployer_types::{Deployer, ObjectKey};
use crate::error::Error;
use crate::reconciler::{DeployerReconciler, Directive};
use crate::shim_layer::kube_api::{KubeRecordStore, KubeUnitProvisioner};
use anyhow::Result;
use futures::StreamExt;
use kube::{
    api::{Api, ListParams},
    runtime::{
        controller::{self, Action, Controller},
        reflector::ObjectRef,
    },
    Client, Resource,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::*;

pub const CONTROLLER_NAME: &str = "deployer-controller";

// Data is passed to reconcile and error_policy by kube-rs.
pub struct Data {
    pub reconciler: DeployerReconciler<KubeRecordStore, KubeUnitProvisioner>,
}

// run_controller watches every Deployer in the cluster and reconciles each
// changed object. kube-rs never runs two reconciles of the same object at the
// same time, which the reconciler depends on.
pub async fn run_controller(config: ControllerConfig) -> Result<()> {
    let client = Client::try_default().await?;
    let deployers = Api::<Deployer>::all(client.clone());
    let reconciler = DeployerReconciler::new(
        KubeRecordStore::new(client.clone()),
        KubeUnitProvisioner::new(client),
        config,
    );

    info!(
        controller.name = CONTROLLER_NAME,
        namespace = %reconciler.config().provision_namespace,
        "Starting controller"
    );
    Controller::new(deployers, ListParams::default())
        .shutdown_on_signal()
        .run(reconcile, error_policy, Arc::new(Data { reconciler }))
        .for_each(|res| async move { report_controller_reconciled(CONTROLLER_NAME, &res) })
        .await;
    info!(controller.name = CONTROLLER_NAME, "Controller terminated");
    Ok(())
}

// reconcile is invoked by kube-rs whenever the watcher sees a relevant event.
// The cached object only provides the key; the reconciler reads the latest
// version itself.
pub async fn reconcile(deployer: Arc<Deployer>, ctx: Arc<Data>) -> Result<Action, Error> {
    let key = ObjectKey::from_deployer(&deployer)?;
    let directive = ctx.reconciler.reconcile(&key).await;
    directive_to_action(&key, directive)
}

/// Maps a directive onto the kube-rs scheduling vocabulary. `RetryAfter`
/// becomes an error so the requeue goes through `error_policy`.
pub fn directive_to_action(key: &ObjectKey, directive: Directive) -> Result<Action, Error> {
    match directive {
        Directive::Done => Ok(Action::await_change()),
        Directive::RetryNow => Ok(Action::requeue(Duration::ZERO)),
        Directive::RetryAfter(err) => Err(err),
        Directive::Fatal(err) => {
            error!(object = %key, error = %err, "Reconcile failed permanently, waiting for the object to change");
            Ok(Action::await_change())
        }
    }
}

// error_policy defines the controller's behavior when the reconcile ends with an error.
pub fn error_policy(_object: Arc<Deployer>, error: &Error, ctx: Arc<Data>) -> Action {
    warn!("Reconcile failed due to error: {}", error);
    Action::requeue(ctx.reconciler.config().error_requeue)
}

pub fn report_controller_reconciled<K, QueueErr>(
    controller_name: &str,
    result: &Result<(ObjectRef<K>, Action), controller::Error<Error, QueueErr>>,
) where
    K: Resource,
    QueueErr: std::error::Error,
{
    match result {
        Ok((obj, _)) => {
            info!(
                controller.name = controller_name,
                object = %obj,
                "Reconciled object"
            );
        }
        Err(err) => {
            error!(
                controller.name = controller_name,
                error = err as &dyn std::error::Error,
                "Failed to reconcile object",
            );
        }
    }
}
