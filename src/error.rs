// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::unit::UnitKind;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to get CR: {0}")]
    CRGetFailed(#[source] kube::Error),

    #[error("Failed to create {kind}: {source}")]
    UnitCreationFailed {
        kind: UnitKind,
        #[source]
        source: kube::Error,
    },

    #[error("Failed to update status: {0}")]
    StatusUpdateFailed(#[source] kube::Error),

    #[error("Reconcile did not finish within {0:?}")]
    ReconcileTimeout(Duration),

    #[error("Invalid Deployer spec: {0}")]
    InvalidSpec(String),

    #[error("MissingObjectKey: {0}")]
    MissingObjectKey(&'static str),
}

/// Coarse classification of an API server failure, keyed on the status reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum APIError {
    ObjectNotFound,
    ObjectAlreadyExists,
    BadRequest,
    Conflict,
    Invalid,
    InternalError,
    Timeout,
    ServerTimeout,
    Other,
}

pub fn kube_error_to_api_error(error: &kube::Error) -> APIError {
    match error {
        kube::Error::Api(kube_core::ErrorResponse { reason, .. }) => match reason.as_str() {
            "NotFound" => APIError::ObjectNotFound,
            "AlreadyExists" => APIError::ObjectAlreadyExists,
            "BadRequest" => APIError::BadRequest,
            "Conflict" => APIError::Conflict,
            "Invalid" => APIError::Invalid,
            "InternalError" => APIError::InternalError,
            "Timeout" => APIError::Timeout,
            "ServerTimeout" => APIError::ServerTimeout,
            _ => APIError::Other,
        },
        _ => APIError::Other,
    }
}

pub fn is_not_found(error: &kube::Error) -> bool {
    kube_error_to_api_error(error) == APIError::ObjectNotFound
}

pub fn is_already_exists(error: &kube::Error) -> bool {
    kube_error_to_api_error(error) == APIError::ObjectAlreadyExists
}
