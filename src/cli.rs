// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use clap::{Args, Parser, Subcommand, ValueEnum};
use deployer_controller::common::DEFAULT_PROVISION_NAMESPACE;
use deployer_controller::{ControllerConfig, OwnershipPolicy};
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "deployer-controller", version, about = "Provisions a deployment, service and ingress per Deployer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the Deployer custom resource definition as YAML
    Export,
    /// Run the controller against the current kubeconfig context
    Run(RunArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Ownership {
    WorkloadOnly,
    AllUnits,
}

impl From<Ownership> for OwnershipPolicy {
    fn from(ownership: Ownership) -> OwnershipPolicy {
        match ownership {
            Ownership::WorkloadOnly => OwnershipPolicy::WorkloadOnly,
            Ownership::AllUnits => OwnershipPolicy::AllUnits,
        }
    }
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Namespace that receives every provisioned unit
    #[arg(long, env = "DEPLOYER_PROVISION_NAMESPACE", default_value = DEFAULT_PROVISION_NAMESPACE)]
    pub provision_namespace: String,

    /// Units that get an owner reference to their Deployer
    #[arg(long, env = "DEPLOYER_OWNERSHIP", value_enum, default_value_t = Ownership::WorkloadOnly)]
    pub ownership: Ownership,

    /// Record a unit as provisioned when its create fails with AlreadyExists
    #[arg(long, env = "DEPLOYER_TREAT_ALREADY_EXISTS_AS_PROVISIONED")]
    pub treat_already_exists_as_provisioned: bool,

    /// Deadline of a single reconcile pass, in seconds
    #[arg(long, env = "DEPLOYER_RECONCILE_TIMEOUT_SECS", default_value_t = 30)]
    pub reconcile_timeout_secs: u64,

    /// Requeue delay after a failed reconcile, in seconds
    #[arg(long, env = "DEPLOYER_ERROR_REQUEUE_SECS", default_value_t = 10)]
    pub error_requeue_secs: u64,
}

impl From<RunArgs> for ControllerConfig {
    fn from(args: RunArgs) -> ControllerConfig {
        ControllerConfig {
            provision_namespace: args.provision_namespace,
            ownership: args.ownership.into(),
            treat_already_exists_as_provisioned: args.treat_already_exists_as_provisioned,
            reconcile_timeout: Duration::from_secs(args.reconcile_timeout_secs),
            error_requeue: Duration::from_secs(args.error_requeue_secs),
        }
    }
}
