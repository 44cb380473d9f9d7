// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use anyhow::anyhow;

use crate::conditions::{check_ready, Condition, ConditionStatus, READY_CONDITION};
use crate::errors::Error;

#[test]
pub fn test_ready_when_condition_true() {
    let conditions = vec![Condition::new(READY_CONDITION, ConditionStatus::True)];
    assert!(check_ready(&conditions).is_ok());
}

#[test]
pub fn test_missing_condition_is_unknown() {
    let err = check_ready(&[]).unwrap_err();
    assert_eq!("ready status unknown", err.to_string());

    let other = vec![Condition::new("Paused", ConditionStatus::True)];
    assert!(check_ready(&other).is_err());
}

#[test]
pub fn test_false_condition_reports_message() {
    let conditions =
        vec![Condition::new(READY_CONDITION, ConditionStatus::False).with_message("still wiring")];
    let err = check_ready(&conditions).unwrap_err();
    assert_eq!("resource is not Ready: still wiring", err.to_string());
}

#[test]
pub fn test_unknown_status_is_not_ready() {
    let conditions = vec![Condition::new(READY_CONDITION, ConditionStatus::Unknown)];
    assert!(check_ready(&conditions).is_err());
}

#[test]
pub fn test_first_ready_condition_wins() {
    let conditions = vec![
        Condition::new(READY_CONDITION, ConditionStatus::False).with_message("draining"),
        Condition::new(READY_CONDITION, ConditionStatus::True),
    ];
    let err = check_ready(&conditions).unwrap_err();
    assert!(err.to_string().contains("draining"));

    let conditions = vec![
        Condition::new(READY_CONDITION, ConditionStatus::True),
        Condition::new(READY_CONDITION, ConditionStatus::False),
    ];
    assert!(check_ready(&conditions).is_ok());
}

#[test]
pub fn test_outcome_renders_success_as_true() {
    let condition = Condition::for_outcome("VaultsReady", None);
    assert_eq!("VaultsReady", condition.r#type);
    assert_eq!(ConditionStatus::True, condition.status);
    assert_eq!(Some("Succeeded".to_string()), condition.reason);
    assert_eq!(None, condition.message);
}

#[test]
pub fn test_outcome_renders_not_done_as_in_progress() {
    let err = Error::OperationNotDone {
        operation: "PUT".to_string(),
        resource: "a".to_string(),
    };
    let condition = Condition::for_outcome("VaultsReady", Some(&err));
    assert_eq!(ConditionStatus::False, condition.status);
    assert_eq!(Some("InProgress".to_string()), condition.reason);
    assert!(condition.message.unwrap().contains("is not done"));
}

#[test]
pub fn test_outcome_renders_failure_with_message() {
    let err = Error::Other(anyhow!("subnet misconfigured"));
    let condition = Condition::for_outcome("VaultsReady", Some(&err));
    assert_eq!(ConditionStatus::False, condition.status);
    assert_eq!(Some("Failed".to_string()), condition.reason);
    assert_eq!(Some("subnet misconfigured".to_string()), condition.message);
}

#[test]
pub fn test_condition_wire_form() {
    let condition = Condition::new(READY_CONDITION, ConditionStatus::False)
        .with_reason("InProgress")
        .with_message("waiting on backend");
    let value = serde_json::to_value(&condition).unwrap();
    assert_eq!(
        serde_json::json!({
            "type": "Ready",
            "status": "False",
            "reason": "InProgress",
            "message": "waiting on backend",
        }),
        value
    );
}
