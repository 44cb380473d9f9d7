// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// The one condition type the engine interprets and updates.
pub const READY_CONDITION: &str = "Ready";

/// Status of a condition, mirroring `corev1.ConditionStatus`.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionStatus::True => write!(f, "True"),
            ConditionStatus::False => write!(f, "False"),
            ConditionStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A named boolean-with-message status entry carried by stored objects and by
/// the owner the engine reports on. Embeddable in CRD status structs.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub r#type: String,
    pub status: ConditionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
}

impl Condition {
    pub fn new(r#type: impl Into<String>, status: ConditionStatus) -> Self {
        Condition {
            r#type: r#type.into(),
            status,
            reason: None,
            message: None,
            last_transition_time: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Renders the outcome of a completed pass as a condition of the given
    /// type: no error maps to `True`, operation-not-done to `False` with an
    /// in-progress reason, and any real failure to `False` with the error's
    /// message. Status sinks stamp the transition time.
    pub fn for_outcome(r#type: &str, result: Option<&Error>) -> Self {
        match result {
            None => Condition::new(r#type, ConditionStatus::True).with_reason("Succeeded"),
            Some(err) if err.is_operation_not_done() => {
                Condition::new(r#type, ConditionStatus::False)
                    .with_reason("InProgress")
                    .with_message(err.to_string())
            }
            Some(err) => Condition::new(r#type, ConditionStatus::False)
                .with_reason("Failed")
                .with_message(err.to_string()),
        }
    }
}

/// Decides whether a stored object is in shape based on its `Ready`
/// condition. If the backend ever compacts duplicate conditions, the first
/// entry by list position wins.
pub fn check_ready(conditions: &[Condition]) -> Result<(), Error> {
    match conditions.iter().find(|c| c.r#type == READY_CONDITION) {
        None => Err(Error::ReadyUnknown),
        Some(c) if c.status != ConditionStatus::True => Err(Error::NotReady {
            message: c.message.clone().unwrap_or_default(),
        }),
        Some(_) => Ok(()),
    }
}
