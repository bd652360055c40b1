#![allow(unused_imports)]
#![allow(unused_variables)]
use deployer_controller::common::DEFAULT_PROVISION_NAMESPACE;
use deployer_controller::{Deployer, DeployerStatus};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::{api::Api, discovery::Discovery, Client};
use std::time::{Duration, Instant};
use tokio::time::sleep;

use crate::common::*;

pub fn deployer() -> String {
    "
    apiVersion: operator.github.com/v1
    kind: Deployer
    metadata:
      name: demo
      namespace: default
    spec:
      replicas: 2
      images: httpd:2.4
      host: demo.example.com
    "
    .to_string()
}

pub fn deployer_no_host() -> String {
    "
    apiVersion: operator.github.com/v1
    kind: Deployer
    metadata:
      name: demo-any-host
      namespace: default
    spec:
      images: httpd:2.4
    "
    .to_string()
}

pub async fn desired_state_test(
    client: Client,
    name: String,
    replicas: Option<i32>,
    host: Option<&str>,
) -> Result<(), Error> {
    let timeout = Duration::from_secs(360);
    let start = Instant::now();
    let deploy_api: Api<Deployment> = Api::namespaced(client.clone(), DEFAULT_PROVISION_NAMESPACE);
    let svc_api: Api<Service> = Api::namespaced(client.clone(), DEFAULT_PROVISION_NAMESPACE);
    let ingress_api: Api<Ingress> = Api::namespaced(client.clone(), DEFAULT_PROVISION_NAMESPACE);
    loop {
        sleep(Duration::from_secs(5)).await;
        if start.elapsed() > timeout {
            return Err(Error::Timeout);
        }

        let deployment = match deploy_api.get(&name).await {
            Err(e) => {
                println!("Get deployment failed with error {}.", e);
                continue;
            }
            Ok(deployment) => deployment,
        };
        if deployment.spec.as_ref().and_then(|spec| spec.replicas) != replicas
            && replicas.is_some()
        {
            println!("Deployment replicas do not match the deployer spec.");
            return Err(Error::DeploymentFailed);
        }

        let service = match svc_api.get(&name).await {
            Err(e) => {
                println!("Get service failed with error {}.", e);
                continue;
            }
            Ok(service) => service,
        };
        let port = service
            .spec
            .as_ref()
            .and_then(|spec| spec.ports.as_ref())
            .and_then(|ports| ports.first())
            .map(|port| port.port);
        if port != Some(80) {
            println!("Service does not expose port 80.");
            return Err(Error::ServiceFailed);
        }

        let ingress = match ingress_api.get(&(name.clone() + "-ingress")).await {
            Err(e) => {
                println!("Get ingress failed with error {}.", e);
                continue;
            }
            Ok(ingress) => ingress,
        };
        let rule_host = ingress
            .spec
            .as_ref()
            .and_then(|spec| spec.rules.as_ref())
            .and_then(|rules| rules.first())
            .and_then(|rule| rule.host.clone());
        if rule_host.as_deref() != host {
            println!("Ingress host is {:?}, expected {:?}.", rule_host, host);
            return Err(Error::IngressFailed);
        }
        break;
    }
    println!("Desired state test passed.");
    Ok(())
}

pub async fn status_test(client: Client, name: String) -> Result<(), Error> {
    let timeout = Duration::from_secs(360);
    let start = Instant::now();
    let deployer_api: Api<Deployer> = Api::default_namespaced(client.clone());
    loop {
        sleep(Duration::from_secs(5)).await;
        if start.elapsed() > timeout {
            return Err(Error::Timeout);
        }
        match deployer_api.get(&name).await {
            Err(e) => {
                println!("Get deployer failed with error {}.", e);
                continue;
            }
            Ok(deployer) => {
                if deployer
                    .status
                    .as_ref()
                    .map(DeployerStatus::all_provisioned)
                    .unwrap_or(false)
                {
                    println!("All status flags are set now.");
                    break;
                }
                println!("Status is {:?} now.", deployer.status);
            }
        }
    }
    println!("Status test passed.");
    Ok(())
}

async fn check_crd(client: Client) -> Result<(), Error> {
    let crd_api: Api<CustomResourceDefinition> = Api::all(client);
    match crd_api.get("deployers.operator.github.com").await {
        Err(e) => {
            println!("No CRD found, create one before run the e2e test.");
            Err(Error::CRDGetFailed(e))
        }
        Ok(_) => {
            println!("CRD found, continue to run the e2e test.");
            Ok(())
        }
    }
}

pub async fn deployer_e2e_test() -> Result<(), Error> {
    let client = Client::try_default().await?;
    check_crd(client.clone()).await?;

    let discovery = Discovery::new(client.clone()).run().await?;
    let name = apply(deployer(), client.clone(), &discovery).await?;

    desired_state_test(client.clone(), name.clone(), Some(2), Some("demo.example.com")).await?;
    status_test(client.clone(), name.clone()).await?;

    println!("E2e test passed.");
    Ok(())
}

pub async fn deployer_no_host_e2e_test() -> Result<(), Error> {
    let client = Client::try_default().await?;
    check_crd(client.clone()).await?;

    let discovery = Discovery::new(client.clone()).run().await?;
    let name = apply(deployer_no_host(), client.clone(), &discovery).await?;

    desired_state_test(client.clone(), name.clone(), None, None).await?;
    status_test(client.clone(), name.clone()).await?;

    println!("E2e test passed.");
    Ok(())
}
