// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::config::ControllerConfig;
use crate::deployer_types::{DeployerSpec, DeployerStatus, ObjectKey, ParentIdentity};
use crate::error::{is_not_found, Error};
use crate::resources::can_link_owner;
use crate::shim_layer::{RecordStore, UnitProvisioner};
use crate::step::{
    classifier_for, default_steps, CreateErrorClassifier, CreateFailure, ProvisioningStep,
};
use tracing::*;

/// What the controller should do with an object after a reconcile pass.
#[derive(Debug)]
pub enum Directive {
    /// Nothing left to do until the object changes again.
    Done,
    RetryNow,
    /// Retry with the controller's backoff; carries the first error of the pass.
    RetryAfter(Error),
    /// Retrying cannot help until the object itself changes. Every error
    /// `DeployerReconciler` reports is retryable, so it never returns this.
    Fatal(Error),
}

impl Directive {
    pub fn is_done(&self) -> bool {
        matches!(self, Directive::Done)
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            Directive::RetryAfter(err) | Directive::Fatal(err) => Some(err),
            Directive::Done | Directive::RetryNow => None,
        }
    }
}

// Correctness relies on the caller never running two passes for the same key
// at once. The kube-rs controller guarantees that; nothing here locks.
pub struct DeployerReconciler<S, P> {
    store: S,
    provisioner: P,
    classifier: Box<dyn CreateErrorClassifier>,
    steps: Vec<Box<dyn ProvisioningStep>>,
    config: ControllerConfig,
}

impl<S, P> DeployerReconciler<S, P>
where
    S: RecordStore,
    P: UnitProvisioner,
{
    pub fn new(store: S, provisioner: P, config: ControllerConfig) -> DeployerReconciler<S, P> {
        DeployerReconciler {
            store,
            provisioner,
            classifier: classifier_for(&config),
            steps: default_steps(),
            config,
        }
    }

    pub fn with_classifier(
        mut self,
        classifier: impl CreateErrorClassifier + 'static,
    ) -> DeployerReconciler<S, P> {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn provisioner(&self) -> &P {
        &self.provisioner
    }

    /// Runs one pass for `key`, bounded by the configured deadline. When the
    /// deadline hits, the in-flight API call is dropped and nothing is persisted.
    pub async fn reconcile(&self, key: &ObjectKey) -> Directive {
        let timeout = self.config.reconcile_timeout;
        match tokio::time::timeout(timeout, self.reconcile_pass(key)).await {
            Ok(directive) => directive,
            Err(_) => {
                warn!(object = %key, ?timeout, "Reconcile deadline exceeded");
                Directive::RetryAfter(Error::ReconcileTimeout(timeout))
            }
        }
    }

    async fn reconcile_pass(&self, key: &ObjectKey) -> Directive {
        let deployer = match self.store.get(key).await {
            Err(err) if is_not_found(&err) => {
                info!(object = %key, "Deployer not found, end reconcile");
                return Directive::Done;
            }
            Err(err) => {
                warn!(object = %key, error = %err, "Get Deployer failed, will retry reconcile");
                return Directive::RetryAfter(Error::CRGetFailed(err));
            }
            Ok(deployer) => deployer,
        };

        let parent = ParentIdentity::new(key, &deployer);
        let observed = deployer.status.clone().unwrap_or_default();
        let mut status = observed.clone();
        let mut first_error: Option<Error> = None;

        // Every step runs even after an earlier one failed.
        for step in &self.steps {
            if let Err(err) = self
                .apply_step(step.as_ref(), &deployer.spec, &parent, &mut status)
                .await
            {
                warn!(object = %key, unit = %step.kind(), error = %err, "Provisioning step failed");
                first_error.get_or_insert(err);
            }
        }

        if status != observed {
            if let Err(err) = self.store.update_status(key, &status).await {
                warn!(object = %key, error = %err, "Status update failed");
                first_error.get_or_insert(Error::StatusUpdateFailed(err));
            }
        }

        match first_error {
            Some(err) => Directive::RetryAfter(err),
            None if status.all_provisioned() => {
                info!(object = %key, "All units provisioned");
                Directive::Done
            }
            // Only reachable with steps that leave their flag unset on success.
            None => Directive::RetryNow,
        }
    }

    /// Creates the step's unit unless the status says it exists already.
    /// The flag is set only when the create succeeds, or when the classifier
    /// says the failure means the unit is there.
    pub async fn apply_step(
        &self,
        step: &dyn ProvisioningStep,
        desired: &DeployerSpec,
        parent: &ParentIdentity,
        status: &mut DeployerStatus,
    ) -> Result<(), Error> {
        if step.is_done(status) {
            return Ok(());
        }
        step.validate(desired)?;
        let unit = step.build(desired, parent, &self.config);
        let kind = step.kind();
        if self.config.ownership.links(kind) {
            if !can_link_owner(parent, &self.config) {
                warn!(
                    unit = %unit.key(),
                    parent_namespace = %parent.namespace,
                    "Unit lives outside the Deployer's namespace, creating it without owner reference"
                );
            } else if parent.owner_reference.is_none() {
                warn!(unit = %unit.key(), "Parent has no uid, creating unit without owner reference");
            }
        }
        info!(unit = %unit.key(), "Creating unit");
        match self.provisioner.create_unit(&unit).await {
            Ok(()) => {
                info!(unit = %unit.key(), "Unit created");
                step.mark_done(status);
                Ok(())
            }
            Err(err) => match self.classifier.classify(kind, &err) {
                CreateFailure::AlreadyProvisioned => {
                    info!(unit = %unit.key(), "Unit already exists, recording it as provisioned");
                    step.mark_done(status);
                    Ok(())
                }
                CreateFailure::Failed => Err(Error::UnitCreationFailed { kind, source: err }),
            },
        }
    }
}
