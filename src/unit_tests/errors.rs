// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use anyhow::anyhow;
use kube::core::ErrorResponse;

use crate::errors::{is_operation_not_done, is_resource_not_found, prioritize, Error};

fn not_done(resource: &str) -> Error {
    Error::OperationNotDone {
        operation: "PUT".to_string(),
        resource: resource.to_string(),
    }
}

fn real(message: &'static str) -> Error {
    Error::Other(anyhow!(message))
}

#[test]
pub fn test_first_real_error_wins() {
    let kept = prioritize(Some(real("first")), Some(real("second"))).unwrap();
    assert_eq!("first", kept.to_string());
}

#[test]
pub fn test_real_error_overwrites_not_done_in_either_order() {
    let kept = prioritize(Some(not_done("a")), Some(real("boom"))).unwrap();
    assert_eq!("boom", kept.to_string());

    let kept = prioritize(Some(real("boom")), Some(not_done("a"))).unwrap();
    assert_eq!("boom", kept.to_string());
}

#[test]
pub fn test_first_not_done_wins() {
    let kept = prioritize(Some(not_done("a")), Some(not_done("b"))).unwrap();
    assert!(kept.to_string().contains("resource a"));
}

#[test]
pub fn test_not_done_kept_only_over_nothing() {
    let kept = prioritize(None, Some(not_done("a"))).unwrap();
    assert!(is_operation_not_done(&kept));
}

#[test]
pub fn test_nothing_never_overwrites() {
    let kept = prioritize(Some(real("boom")), None).unwrap();
    assert_eq!("boom", kept.to_string());
    assert!(prioritize(None, None).is_none());
}

#[test]
pub fn test_not_done_predicate() {
    assert!(is_operation_not_done(&not_done("a")));
    assert!(!is_operation_not_done(&real("boom")));
    assert!(!is_operation_not_done(&Error::ResourceNotFound {
        resource: "a".to_string()
    }));
}

#[test]
pub fn test_not_found_predicate() {
    assert!(is_resource_not_found(&Error::ResourceNotFound {
        resource: "a".to_string()
    }));
    assert!(!is_resource_not_found(&real("boom")));
}

#[test]
pub fn test_not_found_predicate_covers_api_404() {
    let gone = Error::Kube(kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message: "fakeresources \"a\" not found".to_string(),
        reason: "NotFound".to_string(),
        code: 404,
    }));
    assert!(is_resource_not_found(&gone));

    let denied = Error::Kube(kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message: "forbidden".to_string(),
        reason: "Forbidden".to_string(),
        code: 403,
    }));
    assert!(!is_resource_not_found(&denied));
}
