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

//! Typed API objects handled by the mutators.
//!
//! Only the fields a mutator reads or writes are modelled. Everything else is
//! kept verbatim in flattened `extra` maps so that decoding and re-encoding an
//! object never loses or alters fields nobody touched.

pub mod codec;
pub mod core;
pub mod garden;
mod meta;

use std::any::Any;
use std::fmt;

pub use self::core::Namespace;
pub use garden::{Networking, Shoot, ShootProvider, ShootSpec};
pub use meta::ObjectMeta;

/// ApiObject is a trait for objects that can be admitted and mutated.
pub trait ApiObject: Send + Sync + fmt::Debug {
    /// Returns the object as Any for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns the object as mutable Any for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Returns the kind of this object.
    fn kind(&self) -> &str;

    /// Returns the object metadata.
    fn metadata(&self) -> &ObjectMeta;

    /// Returns the object metadata for mutation.
    fn metadata_mut(&mut self) -> &mut ObjectMeta;

    /// Returns the infrastructure provider named by the object itself, if its kind has one.
    fn provider_type(&self) -> Option<&str> {
        None
    }

    /// Serializes the object into its JSON form.
    fn to_value(&self) -> serde_json::Result<serde_json::Value>;
}
