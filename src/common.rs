// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::deployer_types::ParentIdentity;
use std::collections::BTreeMap;

pub const DEFAULT_PROVISION_NAMESPACE: &str = "sandbox-system";

pub const APP_LABEL_KEY: &str = "app";
pub const CONTAINER_NAME: &str = "httpd-container";
pub const CONTAINER_PORT: i32 = 80;

pub const INGRESS_CLASS_NAME: &str = "nginx";
pub const ROUTING_PATH: &str = "/";
pub const ROUTING_PATH_TYPE: &str = "Prefix";
pub const ROUTING_RULE_SUFFIX: &str = "-ingress";

pub fn workload_name(parent: &ParentIdentity) -> String {
    parent.name.clone()
}

pub fn network_service_name(parent: &ParentIdentity) -> String {
    parent.name.clone()
}

pub fn routing_rule_name(parent: &ParentIdentity) -> String {
    parent.name.clone() + ROUTING_RULE_SUFFIX
}

pub fn app_labels(parent: &ParentIdentity) -> BTreeMap<String, String> {
    BTreeMap::from([(APP_LABEL_KEY.to_string(), parent.name.clone())])
}
