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

//! Admission-time mutators for provider extensions.
//!
//! This crate rewrites selected fields of incoming objects before they are
//! persisted: it normalizes the high-availability zone annotation of seed
//! namespaces and defaults the networking provider config of Shoots. It holds
//! no server of its own; a transport layer decodes the admission payload,
//! hands it to the [`admission::Dispatcher`] and turns the outcome into a patch.

pub mod admission;
pub mod api;
pub mod config;
pub mod logging;
pub mod mutators;
pub mod topology;

// Re-export commonly used types
pub use admission::{
    AdmissionError, AdmissionResult, Attributes, AttributesRecord, DispatchOutcome, Dispatcher,
    Handler, Interface, MutationInterface, Operation, ProviderType, Registry, Webhook, WebhookArgs,
};
pub use api::{ApiObject, Namespace, ObjectMeta, Shoot};
pub use config::MutatorConfig;
pub use topology::{normalize, ZoneSet, ZoneToken};
