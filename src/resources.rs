// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use k8s_openapi::api::apps::v1 as appsv1;
use k8s_openapi::api::core::v1 as corev1;
use k8s_openapi::api::networking::v1 as networkingv1;
use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::api::ObjectMeta;

use crate::common::*;
use crate::config::ControllerConfig;
use crate::deployer_types::{DeployerSpec, ParentIdentity};
use crate::unit::UnitKind;

/// Owner references must stay inside one namespace; the garbage collector
/// treats a cross-namespace owner as missing and deletes the dependent.
pub fn can_link_owner(parent: &ParentIdentity, config: &ControllerConfig) -> bool {
    parent.namespace == config.provision_namespace
}

fn owner_references(
    parent: &ParentIdentity,
    kind: UnitKind,
    config: &ControllerConfig,
) -> Option<Vec<metav1::OwnerReference>> {
    if !config.ownership.links(kind) || !can_link_owner(parent, config) {
        return None;
    }
    parent.owner_reference.clone().map(|oref| vec![oref])
}

pub fn make_deployment(
    desired: &DeployerSpec,
    parent: &ParentIdentity,
    config: &ControllerConfig,
) -> appsv1::Deployment {
    appsv1::Deployment {
        metadata: ObjectMeta {
            name: Some(workload_name(parent)),
            namespace: Some(config.provision_namespace.clone()),
            labels: Some(app_labels(parent)),
            owner_references: owner_references(parent, UnitKind::Workload, config),
            ..ObjectMeta::default()
        },
        spec: Some(appsv1::DeploymentSpec {
            replicas: desired.replicas,
            selector: metav1::LabelSelector {
                match_labels: Some(app_labels(parent)),
                ..metav1::LabelSelector::default()
            },
            template: corev1::PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(app_labels(parent)),
                    ..ObjectMeta::default()
                }),
                spec: Some(make_pod_spec(desired)),
            },
            ..appsv1::DeploymentSpec::default()
        }),
        ..appsv1::Deployment::default()
    }
}

fn make_pod_spec(desired: &DeployerSpec) -> corev1::PodSpec {
    corev1::PodSpec {
        containers: vec![corev1::Container {
            name: CONTAINER_NAME.to_string(),
            image: Some(desired.image.clone()),
            ports: Some(vec![corev1::ContainerPort {
                container_port: CONTAINER_PORT,
                ..corev1::ContainerPort::default()
            }]),
            ..corev1::Container::default()
        }],
        ..corev1::PodSpec::default()
    }
}

pub fn make_service(parent: &ParentIdentity, config: &ControllerConfig) -> corev1::Service {
    corev1::Service {
        metadata: ObjectMeta {
            name: Some(network_service_name(parent)),
            namespace: Some(config.provision_namespace.clone()),
            owner_references: owner_references(parent, UnitKind::NetworkService, config),
            ..ObjectMeta::default()
        },
        spec: Some(corev1::ServiceSpec {
            selector: Some(app_labels(parent)),
            ports: Some(vec![corev1::ServicePort {
                port: CONTAINER_PORT,
                target_port: Some(IntOrString::Int(CONTAINER_PORT)),
                ..corev1::ServicePort::default()
            }]),
            ..corev1::ServiceSpec::default()
        }),
        ..corev1::Service::default()
    }
}

pub fn make_ingress(
    desired: &DeployerSpec,
    parent: &ParentIdentity,
    config: &ControllerConfig,
) -> networkingv1::Ingress {
    // An empty host is left out of the rule so it matches every host.
    let host = if desired.host.is_empty() {
        None
    } else {
        Some(desired.host.clone())
    };
    networkingv1::Ingress {
        metadata: ObjectMeta {
            name: Some(routing_rule_name(parent)),
            namespace: Some(config.provision_namespace.clone()),
            owner_references: owner_references(parent, UnitKind::RoutingRule, config),
            ..ObjectMeta::default()
        },
        spec: Some(networkingv1::IngressSpec {
            ingress_class_name: Some(INGRESS_CLASS_NAME.to_string()),
            rules: Some(vec![networkingv1::IngressRule {
                host,
                http: Some(networkingv1::HTTPIngressRuleValue {
                    paths: vec![networkingv1::HTTPIngressPath {
                        path: Some(ROUTING_PATH.to_string()),
                        path_type: ROUTING_PATH_TYPE.to_string(),
                        backend: networkingv1::IngressBackend {
                            service: Some(networkingv1::IngressServiceBackend {
                                name: network_service_name(parent),
                                port: Some(networkingv1::ServiceBackendPort {
                                    number: Some(CONTAINER_PORT),
                                    ..networkingv1::ServiceBackendPort::default()
                                }),
                            }),
                            ..networkingv1::IngressBackend::default()
                        },
                    }],
                }),
            }]),
            ..networkingv1::IngressSpec::default()
        }),
        ..networkingv1::Ingress::default()
    }
}
