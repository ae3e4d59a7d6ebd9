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

//! Startup configuration.
//!
//! Loaded once from YAML, then overlaid by `PROVIDER_MUTATOR_*` environment
//! variables. Nothing here changes after the registry has been built.

use crate::admission::{AdmissionError, AdmissionResult, ProviderType};
use serde::{Deserialize, Serialize};
use std::io::Read;

pub const ENV_PROVIDER_TYPE: &str = "PROVIDER_MUTATOR_PROVIDER_TYPE";
pub const ENV_SEED_REGION: &str = "PROVIDER_MUTATOR_SEED_REGION";
pub const ENV_SEED_PROVIDER: &str = "PROVIDER_MUTATOR_SEED_PROVIDER";

/// MutatorConfig configures which webhooks are served and how they normalize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutatorConfig {
    /// Infrastructure provider this process is installed for.
    #[serde(default = "default_provider_type")]
    pub provider_type: String,

    /// Region of the seed cluster; zone names are normalized against it.
    #[serde(default)]
    pub seed_region: String,

    /// Provider of the seed cluster.
    #[serde(default)]
    pub seed_provider: String,

    /// Label on seed namespaces naming the shoot's provider.
    #[serde(default = "default_namespace_selector_label")]
    pub namespace_selector_label: String,

    #[serde(default = "default_true")]
    pub enable_namespace_mutator: bool,

    #[serde(default = "default_true")]
    pub enable_shoot_mutator: bool,
}

fn default_provider_type() -> String {
    "azure".to_string()
}

fn default_namespace_selector_label() -> String {
    "shoot.gardener.cloud/provider".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for MutatorConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            seed_region: String::new(),
            seed_provider: String::new(),
            namespace_selector_label: default_namespace_selector_label(),
            enable_namespace_mutator: true,
            enable_shoot_mutator: true,
        }
    }
}

impl MutatorConfig {
    /// Parse a YAML document.
    pub fn from_yaml_str(yaml: &str) -> AdmissionResult<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| AdmissionError::config(format!("failed to parse config: {}", e)))
    }

    /// Parse a YAML document from a reader.
    pub fn from_reader(reader: impl Read) -> AdmissionResult<Self> {
        serde_yaml::from_reader(reader)
            .map_err(|e| AdmissionError::config(format!("failed to parse config: {}", e)))
    }

    /// Overlay values from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values from `lookup`; unset or empty values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = get(ENV_PROVIDER_TYPE) {
            self.provider_type = v;
        }
        if let Some(v) = get(ENV_SEED_REGION) {
            self.seed_region = v;
        }
        if let Some(v) = get(ENV_SEED_PROVIDER) {
            self.seed_provider = v;
        }
        self
    }

    /// The validated provider type.
    pub fn provider(&self) -> AdmissionResult<ProviderType> {
        ProviderType::new(&self.provider_type)
    }

    /// True if seed namespaces belong to this provider and should be normalized.
    pub fn serves_seed_namespaces(&self) -> bool {
        self.enable_namespace_mutator && self.seed_provider == self.provider_type
    }

    pub fn validate(&self) -> AdmissionResult<()> {
        self.provider()?;
        if self.serves_seed_namespaces() && self.seed_region.trim().is_empty() {
            return Err(AdmissionError::config(
                "seed region is required when the namespace mutator is enabled",
            ));
        }
        if self.namespace_selector_label.is_empty() {
            return Err(AdmissionError::config(
                "namespace selector label must not be empty",
            ));
        }
        Ok(())
    }
}
