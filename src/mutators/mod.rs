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

//! Mutators and the webhooks that serve them.

pub mod namespace;
pub mod shoot;

use crate::admission::{
    AdmissionResult, LabelSelector, MutationInterface, Predicate, Registry, Target, Webhook,
    WebhookArgs,
};
use crate::api::{Namespace, Shoot};
use crate::config::MutatorConfig;
use std::sync::Arc;
use tracing::info;

/// Webhook mutating Shoots of this provider.
pub const SHOOT_WEBHOOK_NAME: &str = "mutator";
pub const SHOOT_WEBHOOK_PATH: &str = "/webhooks/mutate";

/// Webhook normalizing zone annotations of seed namespaces.
pub const ZONES_WEBHOOK_NAME: &str = "zones";
pub const ZONES_WEBHOOK_PATH: &str = "/webhooks/topology";

/// All webhooks in dispatch order.
pub const ALL_ORDERED_WEBHOOKS: &[&str] = &[SHOOT_WEBHOOK_NAME, ZONES_WEBHOOK_NAME];

/// Build the registry of every webhook enabled by `config`.
pub fn build_registry(config: &MutatorConfig) -> AdmissionResult<Registry> {
    config.validate()?;
    let provider = config.provider()?;
    let mut builder = Registry::builder();

    if config.enable_shoot_mutator {
        info!(name = SHOOT_WEBHOOK_NAME, provider = %provider, "Setting up webhook");
        builder.register(Webhook::new(WebhookArgs {
            provider: provider.clone(),
            name: SHOOT_WEBHOOK_NAME.to_string(),
            path: SHOOT_WEBHOOK_PATH.to_string(),
            kinds: vec![Shoot::KIND.to_string()],
            target: Target::Seed,
            object_selector: LabelSelector::with_label(&provider.extension_label(), "true"),
            predicates: vec![Predicate::NotDeleting],
            mutators: vec![Arc::new(shoot::Mutator::new()) as Arc<dyn MutationInterface>],
        })?)?;
    }

    if config.serves_seed_namespaces() {
        info!(
            name = ZONES_WEBHOOK_NAME,
            provider = %provider,
            region = %config.seed_region,
            "Setting up webhook"
        );
        builder.register(Webhook::new(WebhookArgs {
            provider: provider.clone(),
            name: ZONES_WEBHOOK_NAME.to_string(),
            path: ZONES_WEBHOOK_PATH.to_string(),
            kinds: vec![Namespace::KIND.to_string()],
            target: Target::Seed,
            object_selector: LabelSelector::with_label(
                &config.namespace_selector_label,
                provider.as_str(),
            ),
            predicates: vec![],
            mutators: vec![
                Arc::new(namespace::Mutator::new(&config.seed_region)) as Arc<dyn MutationInterface>,
            ],
        })?)?;
    }

    Ok(builder.build())
}
