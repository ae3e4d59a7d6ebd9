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

//! Core Kubernetes API types.

use super::{ApiObject, ObjectMeta};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::any::Any;

// ============================================================================
// Namespace
// ============================================================================

/// Namespace represents a Kubernetes Namespace.
///
/// Spec and status are never rewritten and stay in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Namespace {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Namespace {
    pub const KIND: &'static str = "Namespace";

    pub fn new(name: &str) -> Self {
        Self {
            metadata: ObjectMeta::named(name),
            extra: Map::new(),
        }
    }
}

impl ApiObject for Namespace {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn kind(&self) -> &str {
        Self::KIND
    }

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }

    fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_namespace_keeps_spec_and_status() {
        let raw = json!({
            "apiVersion": "v1",
            "kind": "Namespace",
            "metadata": {"name": "shoot--dev--foo"},
            "spec": {"finalizers": ["kubernetes"]},
            "status": {"phase": "Active"}
        });
        let ns: Namespace = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(ns.metadata.name(), "shoot--dev--foo");
        assert_eq!(ns.kind(), "Namespace");
        assert_eq!(ns.provider_type(), None);
        assert_eq!(ns.to_value().unwrap(), raw);
    }
}
