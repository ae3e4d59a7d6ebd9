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

//! Object selection: label selectors, provider scoping and predicates.
//!
//! Everything here is a pure, total function of the object. An object that
//! does not match is simply not mutated.

use super::errors::{AdmissionError, AdmissionResult};
use crate::api::ApiObject;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Label key prefix the provider extension puts on objects it is responsible for.
pub const PROVIDER_EXTENSION_LABEL_PREFIX: &str = "provider.extensions.gardener.cloud/";

// ============================================================================
// ProviderType
// ============================================================================

/// ProviderType is the infrastructure provider this process is installed for.
///
/// Set once at startup, never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProviderType(Arc<str>);

impl ProviderType {
    pub fn new(value: &str) -> AdmissionResult<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(AdmissionError::config("provider type must not be empty"));
        }
        Ok(Self(Arc::from(value)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `provider.extensions.gardener.cloud/<type>` label key.
    pub fn extension_label(&self) -> String {
        format!("{}{}", PROVIDER_EXTENSION_LABEL_PREFIX, self.0)
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// LabelSelector
// ============================================================================

/// LabelSelectorOperator represents an operator for label selector requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSelectorOperator {
    In,
    NotIn,
    Exists,
    DoesNotExist,
}

/// LabelSelectorRequirement is a selector that contains values, a key, and an operator.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSelectorRequirement {
    pub key: String,
    pub operator: LabelSelectorOperator,
    pub values: Vec<String>,
}

impl LabelSelectorRequirement {
    fn matches(&self, labels: Option<&BTreeMap<String, String>>) -> bool {
        let value = labels.and_then(|l| l.get(&self.key));
        match self.operator {
            LabelSelectorOperator::In => value.is_some_and(|v| self.values.contains(v)),
            LabelSelectorOperator::NotIn => value.map_or(true, |v| !self.values.contains(v)),
            LabelSelectorOperator::Exists => value.is_some(),
            LabelSelectorOperator::DoesNotExist => value.is_none(),
        }
    }
}

/// LabelSelector is a label query over objects.
/// An empty selector matches everything.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabelSelector {
    pub match_labels: BTreeMap<String, String>,
    pub match_expressions: Vec<LabelSelectorRequirement>,
}

impl LabelSelector {
    /// Selector requiring a single label key/value pair.
    pub fn with_label(key: &str, value: &str) -> Self {
        let mut match_labels = BTreeMap::new();
        match_labels.insert(key.to_string(), value.to_string());
        Self {
            match_labels,
            match_expressions: Vec::new(),
        }
    }

    /// Add a requirement to the selector.
    pub fn with_expression(
        mut self,
        key: &str,
        operator: LabelSelectorOperator,
        values: &[&str],
    ) -> Self {
        self.match_expressions.push(LabelSelectorRequirement {
            key: key.to_string(),
            operator,
            values: values.iter().map(|v| v.to_string()).collect(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.match_labels.is_empty() && self.match_expressions.is_empty()
    }

    /// Check whether the given labels satisfy every term of the selector.
    pub fn matches(&self, labels: Option<&BTreeMap<String, String>>) -> bool {
        let labels_match = self
            .match_labels
            .iter()
            .all(|(k, v)| labels.and_then(|l| l.get(k)) == Some(v));
        labels_match && self.match_expressions.iter().all(|r| r.matches(labels))
    }
}

// ============================================================================
// Predicates
// ============================================================================

/// Predicate is an additional condition an object must meet beyond [`applies`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// The object must not be in deletion.
    NotDeleting,
}

impl Predicate {
    pub fn evaluate(&self, object: &dyn ApiObject) -> bool {
        match self {
            Predicate::NotDeleting => !object.metadata().is_being_deleted(),
        }
    }
}

/// Decide whether `object` belongs to `provider`.
///
/// Its labels must satisfy `selector`, the label identifying the object as
/// belonging to the provider. Kinds that name their own infrastructure
/// provider must also name `provider`; kinds without such a field are not
/// constrained by it.
pub fn applies(
    object: &dyn ApiObject,
    selector: &LabelSelector,
    provider: &ProviderType,
) -> bool {
    selector.matches(object.metadata().labels.as_ref())
        && object
            .provider_type()
            .map_or(true, |actual| actual == provider.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Namespace, Shoot};

    fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_provider_type_rejects_empty() {
        assert!(ProviderType::new("").is_err());
        assert!(ProviderType::new("   ").is_err());
        let azure = ProviderType::new("azure").unwrap();
        assert_eq!(azure.as_str(), "azure");
        assert_eq!(azure.extension_label(), "provider.extensions.gardener.cloud/azure");
    }

    #[test]
    fn test_empty_selector_matches_everything() {
        let selector = LabelSelector::default();
        assert!(selector.is_empty());
        assert!(selector.matches(None));
        assert!(selector.matches(Some(&labels(&[("a", "b")]))));
    }

    #[test]
    fn test_match_labels() {
        let selector = LabelSelector::with_label("shoot.gardener.cloud/provider", "azure");
        assert!(selector.matches(Some(&labels(&[("shoot.gardener.cloud/provider", "azure")]))));
        assert!(!selector.matches(Some(&labels(&[("shoot.gardener.cloud/provider", "aws")]))));
        assert!(!selector.matches(None));
    }

    #[test]
    fn test_match_expressions() {
        let selector = LabelSelector::default()
            .with_expression("tier", LabelSelectorOperator::In, &["a", "b"])
            .with_expression("skip", LabelSelectorOperator::DoesNotExist, &[]);
        assert!(selector.matches(Some(&labels(&[("tier", "a")]))));
        assert!(!selector.matches(Some(&labels(&[("tier", "c")]))));
        assert!(!selector.matches(Some(&labels(&[("tier", "a"), ("skip", "")]))));

        let not_in = LabelSelector::default()
            .with_expression("tier", LabelSelectorOperator::NotIn, &["a"])
            .with_expression("owner", LabelSelectorOperator::Exists, &[]);
        assert!(not_in.matches(Some(&labels(&[("owner", "x")]))));
        assert!(!not_in.matches(Some(&labels(&[("owner", "x"), ("tier", "a")]))));
        assert!(!not_in.matches(None));
    }

    fn extension_selector(provider: &ProviderType) -> LabelSelector {
        LabelSelector::with_label(&provider.extension_label(), "true")
    }

    #[test]
    fn test_applies_is_exclusive_between_providers() {
        let azure = ProviderType::new("azure").unwrap();
        let aws = ProviderType::new("aws").unwrap();
        let mut ns = Namespace::new("foo");
        ns.metadata
            .set_label("provider.extensions.gardener.cloud/azure", "true");

        assert!(applies(&ns, &extension_selector(&azure), &azure));
        assert!(!applies(&ns, &extension_selector(&aws), &aws));
    }

    #[test]
    fn test_applies_requires_true_value() {
        let azure = ProviderType::new("azure").unwrap();
        let selector = extension_selector(&azure);
        let mut ns = Namespace::new("foo");
        ns.metadata
            .set_label("provider.extensions.gardener.cloud/azure", "false");
        assert!(!applies(&ns, &selector, &azure));
        assert!(!applies(&Namespace::new("bar"), &selector, &azure));
    }

    #[test]
    fn test_applies_checks_provider_field() {
        let azure = ProviderType::new("azure").unwrap();
        let selector = extension_selector(&azure);

        let mut shoot = Shoot::new("foo", "garden", "azure");
        shoot
            .metadata
            .set_label("provider.extensions.gardener.cloud/azure", "true");
        assert!(applies(&shoot, &selector, &azure));

        // Labelled for azure but naming another provider.
        let mut gcp = Shoot::new("foo", "garden", "gcp");
        gcp.metadata
            .set_label("provider.extensions.gardener.cloud/azure", "true");
        assert!(!applies(&gcp, &selector, &azure));

        // Namespaces carry no provider field and are selected by label only.
        let mut ns = Namespace::new("foo");
        ns.metadata.set_label("shoot.gardener.cloud/provider", "azure");
        let by_label = LabelSelector::with_label("shoot.gardener.cloud/provider", "azure");
        assert!(applies(&ns, &by_label, &azure));
    }

    #[test]
    fn test_not_deleting_predicate() {
        let mut shoot = Shoot::new("foo", "garden", "azure");
        assert!(Predicate::NotDeleting.evaluate(&shoot));
        shoot.metadata.deletion_timestamp = Some("2024-01-01T00:00:00Z".to_string());
        assert!(!Predicate::NotDeleting.evaluate(&shoot));
    }
}
