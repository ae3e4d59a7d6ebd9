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

//! Webhook registrations binding kinds and selectors to mutators.

use super::errors::{AdmissionError, AdmissionResult};
use super::interfaces::MutationInterface;
use super::selector::{applies, LabelSelector, Predicate, ProviderType};
use crate::api::ApiObject;
use std::fmt;
use std::sync::Arc;

/// Target is the cluster a webhook is served for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The seed cluster hosting shoot control planes.
    Seed,
    /// The shoot cluster itself.
    Shoot,
}

/// WebhookArgs collects everything needed to define a webhook.
pub struct WebhookArgs {
    pub provider: ProviderType,
    pub name: String,
    pub path: String,
    /// Kinds this webhook mutates.
    pub kinds: Vec<String>,
    pub target: Target,
    pub object_selector: LabelSelector,
    pub predicates: Vec<Predicate>,
    /// Mutators, applied in this order.
    pub mutators: Vec<Arc<dyn MutationInterface>>,
}

/// Webhook is one immutable registration.
pub struct Webhook {
    provider: ProviderType,
    name: String,
    path: String,
    kinds: Vec<String>,
    target: Target,
    object_selector: LabelSelector,
    predicates: Vec<Predicate>,
    mutators: Vec<Arc<dyn MutationInterface>>,
}

impl Webhook {
    /// Create a webhook, rejecting definitions that could never apply.
    pub fn new(args: WebhookArgs) -> AdmissionResult<Self> {
        if args.name.is_empty() {
            return Err(AdmissionError::config("webhook name must not be empty"));
        }
        if !args.path.starts_with('/') {
            return Err(AdmissionError::config(format!(
                "webhook {} path {:?} must be absolute",
                args.name, args.path
            )));
        }
        if args.kinds.is_empty() {
            return Err(AdmissionError::config(format!(
                "webhook {} does not select any kind",
                args.name
            )));
        }
        if args.mutators.is_empty() {
            return Err(AdmissionError::config(format!(
                "webhook {} has no mutators",
                args.name
            )));
        }
        Ok(Self {
            provider: args.provider,
            name: args.name,
            path: args.path,
            kinds: args.kinds,
            target: args.target,
            object_selector: args.object_selector,
            predicates: args.predicates,
            mutators: args.mutators,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn provider(&self) -> &ProviderType {
        &self.provider
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn mutators(&self) -> &[Arc<dyn MutationInterface>] {
        &self.mutators
    }

    pub fn handles_kind(&self, kind: &str) -> bool {
        self.kinds.iter().any(|k| k == kind)
    }

    /// Check that the object belongs to this webhook's provider and meets
    /// every predicate.
    pub fn selects(&self, object: &dyn ApiObject) -> bool {
        applies(object, &self.object_selector, &self.provider)
            && self.predicates.iter().all(|p| p.evaluate(object))
    }
}

impl fmt::Debug for Webhook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mutators: Vec<&str> = self.mutators.iter().map(|m| m.name()).collect();
        f.debug_struct("Webhook")
            .field("provider", &self.provider)
            .field("name", &self.name)
            .field("path", &self.path)
            .field("kinds", &self.kinds)
            .field("target", &self.target)
            .field("object_selector", &self.object_selector)
            .field("predicates", &self.predicates)
            .field("mutators", &mutators)
            .finish()
    }
}

/// RegistryBuilder collects webhooks during startup.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    webhooks: Vec<Webhook>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a webhook. Registration order is dispatch order.
    pub fn register(&mut self, webhook: Webhook) -> AdmissionResult<&mut Self> {
        if self.webhooks.iter().any(|w| w.name == webhook.name) {
            return Err(AdmissionError::config(format!(
                "webhook {} registered twice",
                webhook.name
            )));
        }
        self.webhooks.push(webhook);
        Ok(self)
    }

    /// Freeze the registrations.
    pub fn build(self) -> Registry {
        Registry {
            webhooks: self.webhooks,
        }
    }
}

/// Registry is the read-only set of webhooks served by this process.
#[derive(Debug, Default)]
pub struct Registry {
    webhooks: Vec<Webhook>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Webhooks for `kind`, in registration order.
    pub fn for_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Webhook> + 'a {
        self.webhooks.iter().filter(move |w| w.handles_kind(kind))
    }

    /// Check if any webhook handles `kind`.
    pub fn has_kind(&self, kind: &str) -> bool {
        self.webhooks.iter().any(|w| w.handles_kind(kind))
    }

    pub fn get(&self, name: &str) -> Option<&Webhook> {
        self.webhooks.iter().find(|w| w.name == name)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names of all webhooks, in registration order.
    pub fn registered_names(&self) -> Vec<&str> {
        self.webhooks.iter().map(|w| w.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.webhooks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admission::{AdmissionResult, Attributes, Handler, Interface, Operation};
    use crate::api::{Namespace, Shoot};

    struct NoopMutator {
        handler: Handler,
    }

    impl Interface for NoopMutator {
        fn handles(&self, operation: Operation) -> bool {
            self.handler.handles(operation)
        }
    }

    impl MutationInterface for NoopMutator {
        fn name(&self) -> &'static str {
            "noop"
        }

        fn admit(&self, _attributes: &mut dyn Attributes) -> AdmissionResult<()> {
            Ok(())
        }
    }

    fn args(name: &str, kind: &str) -> WebhookArgs {
        WebhookArgs {
            provider: ProviderType::new("azure").unwrap(),
            name: name.to_string(),
            path: format!("/webhooks/{}", name),
            kinds: vec![kind.to_string()],
            target: Target::Seed,
            object_selector: LabelSelector::default(),
            predicates: vec![],
            mutators: vec![Arc::new(NoopMutator {
                handler: Handler::new_create_update(),
            }) as Arc<dyn MutationInterface>],
        }
    }

    #[test]
    fn test_registry_register() {
        let mut builder = Registry::builder();
        builder.register(Webhook::new(args("zones", "Namespace")).unwrap()).unwrap();
        builder.register(Webhook::new(args("mutator", "Shoot")).unwrap()).unwrap();
        let registry = builder.build();

        assert!(registry.is_registered("zones"));
        assert!(!registry.is_registered("unknown"));
        assert_eq!(registry.registered_names(), vec!["zones", "mutator"]);
        assert!(registry.has_kind("Shoot"));
        assert!(!registry.has_kind("Pod"));
        assert_eq!(registry.for_kind("Namespace").count(), 1);
        assert_eq!(registry.get("mutator").unwrap().path(), "/webhooks/mutator");
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let mut builder = Registry::builder();
        builder.register(Webhook::new(args("zones", "Namespace")).unwrap()).unwrap();
        let err = builder
            .register(Webhook::new(args("zones", "Shoot")).unwrap())
            .unwrap_err();
        assert!(matches!(err, AdmissionError::Config(_)));
    }

    #[test]
    fn test_webhook_rejects_invalid_args() {
        let mut no_kinds = args("zones", "Namespace");
        no_kinds.kinds.clear();
        assert!(Webhook::new(no_kinds).is_err());

        let mut relative = args("zones", "Namespace");
        relative.path = "webhooks/zones".to_string();
        assert!(Webhook::new(relative).is_err());

        let mut no_mutators = args("zones", "Namespace");
        no_mutators.mutators.clear();
        assert!(Webhook::new(no_mutators).is_err());
    }

    #[test]
    fn test_webhook_selects() {
        let mut a = args("mutator", "Shoot");
        a.object_selector =
            LabelSelector::with_label("provider.extensions.gardener.cloud/azure", "true");
        a.predicates = vec![Predicate::NotDeleting];
        let webhook = Webhook::new(a).unwrap();

        let mut shoot = Shoot::new("foo", "garden", "azure");
        assert!(!webhook.selects(&shoot));
        shoot
            .metadata
            .set_label("provider.extensions.gardener.cloud/azure", "true");
        assert!(webhook.selects(&shoot));

        let mut other = Shoot::new("bar", "garden", "aws");
        other
            .metadata
            .set_label("provider.extensions.gardener.cloud/azure", "true");
        assert!(!webhook.selects(&other));
        assert!(!webhook.selects(&Namespace::new("foo")));

        shoot.metadata.deletion_timestamp = Some("2024-01-01T00:00:00Z".to_string());
        assert!(!webhook.selects(&shoot));
    }
}
