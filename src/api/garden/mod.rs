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

//! Gardener core types (`core.gardener.cloud`).

use super::{ApiObject, ObjectMeta};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::any::Any;

// ============================================================================
// Shoot
// ============================================================================

/// Shoot is a cluster specification managed by Gardener.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Shoot {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<ShootSpec>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// ShootSpec holds the parts of a Shoot specification that get defaulted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShootSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ShootProvider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networking: Option<Networking>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// ShootProvider names the infrastructure provider of a Shoot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShootProvider {
    #[serde(rename = "type", default)]
    pub type_: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Networking describes the network plugin of a Shoot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Networking {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    /// Network extension specific configuration, opaque to Gardener itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_config: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Shoot {
    pub const KIND: &'static str = "Shoot";

    /// Create a Shoot for the given provider with an otherwise empty spec.
    pub fn new(name: &str, namespace: &str, provider_type: &str) -> Self {
        let mut metadata = ObjectMeta::named(name);
        metadata.namespace = Some(namespace.to_string());
        Self {
            metadata,
            spec: Some(ShootSpec {
                provider: Some(ShootProvider {
                    type_: provider_type.to_string(),
                    extra: Map::new(),
                }),
                networking: None,
                extra: Map::new(),
            }),
            extra: Map::new(),
        }
    }

    pub fn networking(&self) -> Option<&Networking> {
        self.spec.as_ref()?.networking.as_ref()
    }

    pub fn networking_mut(&mut self) -> Option<&mut Networking> {
        self.spec.as_mut()?.networking.as_mut()
    }
}

impl ApiObject for Shoot {
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

    fn provider_type(&self) -> Option<&str> {
        self.spec
            .as_ref()?
            .provider
            .as_ref()
            .map(|p| p.type_.as_str())
    }

    fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}
