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

//! Admission mutation interfaces and the machinery that routes objects to them.
//!
//! Mutators implement [`MutationInterface`]. They are grouped into
//! [`Webhook`] registrations, frozen into a [`Registry`] at startup and driven
//! by the [`Dispatcher`] once per admission request.

pub mod attributes;
pub mod dispatcher;
pub mod errors;
mod handler;
mod interfaces;
mod registry;
pub mod selector;

pub use attributes::{Attributes, AttributesRecord, GroupVersionKind, GroupVersionResource};
pub use dispatcher::{DispatchOutcome, Dispatcher, RawOutcome, RawRequest};
pub use errors::{AdmissionError, AdmissionResult};
pub use handler::Handler;
pub use interfaces::{Interface, MutationInterface, Operation};
pub use registry::{Registry, RegistryBuilder, Target, Webhook, WebhookArgs};
pub use selector::{
    applies, LabelSelector, LabelSelectorOperator, LabelSelectorRequirement, Predicate,
    ProviderType,
};
