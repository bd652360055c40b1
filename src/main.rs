// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
mod cli;

use anyhow::Result;
use clap::Parser;
use deployer_controller::shim_layer::controller_runtime::run_controller;
use deployer_controller::Deployer;
use kube::CustomResourceExt;
use tracing::*;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Cli::parse().command {
        Command::Export => {
            info!("exporting custom resource definition");
            println!("{}", serde_yaml::to_string(&Deployer::crd())?);
        }
        Command::Run(args) => {
            info!("running deployer-controller");
            run_controller(args.into()).await?;
        }
    }
    Ok(())
}
