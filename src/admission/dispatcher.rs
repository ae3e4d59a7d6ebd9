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

//! Mutation dispatch.
//!
//! For one request the dispatcher selects the webhooks registered for the
//! object's kind whose selector and predicates accept the object, then runs
//! their mutators in registration order: webhooks in the order they were
//! registered, mutators in the order listed by each webhook. There is no
//! other ordering guarantee between mutators.
//!
//! Dispatch is fail-fast and not transactional: when a mutator fails, the
//! mutators before it stay applied and the error is returned. Cancellation is
//! honored between mutators, never in the middle of one.

use super::attributes::{Attributes, AttributesRecord, GroupVersionKind, GroupVersionResource};
use super::errors::{AdmissionError, AdmissionResult};
use super::interfaces::Operation;
use super::registry::{Registry, Webhook};
use crate::api::codec;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info_span, warn, Span};

/// DispatchOutcome reports what a dispatch did to the object.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DispatchOutcome {
    /// True iff the serialized object differs from its pre-dispatch form.
    pub mutated: bool,
    /// Mutators that ran, in order.
    pub applied: Vec<&'static str>,
}

impl DispatchOutcome {
    fn unchanged() -> Self {
        Self::default()
    }
}

/// RawRequest is an undecoded admission request.
#[derive(Debug, Clone)]
pub struct RawRequest<'a> {
    pub kind: GroupVersionKind,
    pub resource: GroupVersionResource,
    pub operation: Operation,
    pub object: &'a [u8],
    /// Absent on create.
    pub old_object: Option<&'a [u8]>,
    pub dry_run: bool,
}

/// RawOutcome is the re-encoded result of [`Dispatcher::mutate_raw`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOutcome {
    pub mutated: bool,
    /// The encoded object; the request bytes verbatim when nothing changed.
    pub object: Vec<u8>,
}

/// Dispatcher routes admitted objects to their mutators.
///
/// It holds no per-request state and can be shared between threads.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    span: Span,
}

impl Dispatcher {
    pub fn new(registry: Registry) -> Self {
        Self::with_span(registry, info_span!("admission_dispatch"))
    }

    /// Create a dispatcher logging under `span`.
    pub fn with_span(registry: Registry, span: Span) -> Self {
        Self {
            registry: Arc::new(registry),
            span,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run every applicable mutator against the object in `attributes`.
    pub fn dispatch(
        &self,
        attributes: &mut dyn Attributes,
        cancel: &CancellationToken,
    ) -> AdmissionResult<DispatchOutcome> {
        let _entered = self.span.enter();
        let kind = attributes.get_kind().kind.clone();
        let operation = attributes.get_operation();

        if !self.registry.has_kind(&kind) {
            debug!(kind = %kind, "No webhook registered for kind, passing through");
            return Ok(DispatchOutcome::unchanged());
        }

        let object = match attributes.get_object() {
            Some(o) => o,
            None => return Ok(DispatchOutcome::unchanged()),
        };
        let before = object.to_value()?;
        let selected: Vec<&Webhook> = self
            .registry
            .for_kind(&kind)
            .filter(|w| w.selects(object))
            .collect();
        if selected.is_empty() {
            debug!(
                kind = %kind,
                name = %attributes.get_name(),
                "Object not selected by any webhook"
            );
            return Ok(DispatchOutcome::unchanged());
        }

        let mut applied = Vec::new();
        for webhook in selected {
            for mutator in webhook.mutators() {
                if !mutator.handles(operation) {
                    continue;
                }
                if cancel.is_cancelled() {
                    warn!(
                        kind = %kind,
                        name = %attributes.get_name(),
                        applied = applied.len(),
                        "Admission cancelled before all mutators ran"
                    );
                    return Err(AdmissionError::Cancelled);
                }

                debug!(
                    webhook = webhook.name(),
                    mutator = mutator.name(),
                    kind = %kind,
                    name = %attributes.get_name(),
                    namespace = %attributes.get_namespace(),
                    operation = %operation,
                    "Running mutator"
                );
                if let Err(e) = mutator.admit(attributes) {
                    warn!(
                        webhook = webhook.name(),
                        mutator = mutator.name(),
                        name = %attributes.get_name(),
                        error = %e,
                        "Mutator failed"
                    );
                    return Err(e);
                }
                applied.push(mutator.name());
            }
        }

        let after = attributes.get_object().map(|o| o.to_value()).transpose()?;
        let mutated = after.as_ref() != Some(&before);
        debug!(kind = %kind, name = %attributes.get_name(), mutated, "Dispatch finished");
        Ok(DispatchOutcome { mutated, applied })
    }

    /// Decode, dispatch and re-encode a raw object.
    ///
    /// Kinds without a typed representation or without a registered webhook
    /// are passed through untouched.
    pub fn mutate_raw(
        &self,
        request: RawRequest<'_>,
        cancel: &CancellationToken,
    ) -> AdmissionResult<RawOutcome> {
        let passthrough = || RawOutcome {
            mutated: false,
            object: request.object.to_vec(),
        };
        let kind = request.kind.kind.as_str();
        if !self.registry.has_kind(kind) {
            return Ok(passthrough());
        }

        let object = match codec::decode(kind, request.object) {
            Ok(o) => o,
            Err(AdmissionError::UnsupportedKind(_)) => return Ok(passthrough()),
            Err(e) => return Err(e),
        };
        let old_object = request
            .old_object
            .map(|raw| codec::decode(kind, raw))
            .transpose()?;

        let mut attributes = AttributesRecord::new(
            request.kind.clone(),
            request.resource.clone(),
            request.operation,
            object,
            old_object,
        )
        .with_dry_run(request.dry_run);

        let outcome = self.dispatch(&mut attributes, cancel)?;
        if !outcome.mutated {
            return Ok(passthrough());
        }
        match attributes.get_object() {
            Some(o) => Ok(RawOutcome {
                mutated: true,
                object: codec::encode(o, request.object)?,
            }),
            None => Ok(passthrough()),
        }
    }
}
