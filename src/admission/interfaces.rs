// Copyright 2024 The Kubernetes Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Core admission mutation interfaces.

use super::attributes::Attributes;
use super::errors::AdmissionResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation is the type of resource operation being admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    /// Create indicates a resource creation operation.
    Create,
    /// Update indicates a resource update operation.
    Update,
    /// Delete indicates a resource deletion operation.
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Interface is the part of every mutator that scopes it to operations.
pub trait Interface: Send + Sync {
    /// Returns true if this mutator can handle the given operation.
    fn handles(&self, operation: Operation) -> bool;
}

/// MutationInterface is implemented by every mutator bound to a webhook.
///
/// `admit` may rewrite the object carried by `attributes` in place. It must be
/// idempotent, leave the object untouched when there is nothing to normalize
/// and keep no reference to the object once it returns.
pub trait MutationInterface: Interface {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Apply this mutator's rules to the object in `attributes`.
    fn admit(&self, attributes: &mut dyn Attributes) -> AdmissionResult<()>;
}
