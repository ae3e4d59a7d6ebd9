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

//! Admission attributes that describe an admission request.

use super::interfaces::Operation;
use crate::api::{ApiObject, Namespace, Shoot};

/// GroupVersionResource identifies a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupVersionResource {
    pub group: String,
    pub version: String,
    pub resource: String,
}

impl GroupVersionResource {
    pub fn new(group: &str, version: &str, resource: &str) -> Self {
        Self {
            group: group.to_string(),
            version: version.to_string(),
            resource: resource.to_string(),
        }
    }
}

/// GroupVersionKind identifies a kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    pub fn new(group: &str, version: &str, kind: &str) -> Self {
        Self {
            group: group.to_string(),
            version: version.to_string(),
            kind: kind.to_string(),
        }
    }

    /// `v1` Namespace.
    pub fn namespace() -> Self {
        Self::new("", "v1", Namespace::KIND)
    }

    /// `core.gardener.cloud/v1beta1` Shoot.
    pub fn shoot() -> Self {
        Self::new("core.gardener.cloud", "v1beta1", Shoot::KIND)
    }
}

/// Attributes gives a mutator access to everything known about one request.
pub trait Attributes {
    /// Returns the name of the object as presented in the request.
    fn get_name(&self) -> &str;

    /// Returns the namespace associated with the request (if any).
    fn get_namespace(&self) -> &str;

    /// Returns the resource being requested.
    fn get_resource(&self) -> &GroupVersionResource;

    /// Returns the operation being performed.
    fn get_operation(&self) -> Operation;

    /// Returns the object from the incoming request.
    fn get_object(&self) -> Option<&dyn ApiObject>;

    /// Returns the object as a mutable reference.
    fn get_object_mut(&mut self) -> Option<&mut (dyn ApiObject + 'static)>;

    /// Returns the existing object (absent on create).
    fn get_old_object(&self) -> Option<&dyn ApiObject>;

    /// Returns the kind of object being manipulated.
    fn get_kind(&self) -> &GroupVersionKind;

    /// Check if this request is a dry run.
    fn is_dry_run(&self) -> bool;
}

/// AttributesRecord is a concrete implementation of Attributes.
#[derive(Debug)]
pub struct AttributesRecord {
    pub name: String,
    pub namespace: String,
    pub resource: GroupVersionResource,
    pub operation: Operation,
    pub object: Option<Box<dyn ApiObject>>,
    pub old_object: Option<Box<dyn ApiObject>>,
    pub kind: GroupVersionKind,
    pub dry_run: bool,
}

impl AttributesRecord {
    /// Create attributes for an already decoded object.
    /// Name and namespace are taken from the object metadata.
    pub fn new(
        kind: GroupVersionKind,
        resource: GroupVersionResource,
        operation: Operation,
        object: Box<dyn ApiObject>,
        old_object: Option<Box<dyn ApiObject>>,
    ) -> Self {
        let name = object.metadata().name().to_string();
        let namespace = object.metadata().namespace().to_string();
        Self {
            name,
            namespace,
            resource,
            operation,
            object: Some(object),
            old_object,
            kind,
            dry_run: false,
        }
    }

    /// Helper to create attributes for a Namespace.
    pub fn new_namespace(operation: Operation, ns: Namespace, old_ns: Option<Namespace>) -> Self {
        Self::new(
            GroupVersionKind::namespace(),
            GroupVersionResource::new("", "v1", "namespaces"),
            operation,
            Box::new(ns),
            old_ns.map(|n| Box::new(n) as Box<dyn ApiObject>),
        )
    }

    /// Helper to create attributes for a Shoot.
    pub fn new_shoot(operation: Operation, shoot: Shoot, old_shoot: Option<Shoot>) -> Self {
        Self::new(
            GroupVersionKind::shoot(),
            GroupVersionResource::new("core.gardener.cloud", "v1beta1", "shoots"),
            operation,
            Box::new(shoot),
            old_shoot.map(|s| Box::new(s) as Box<dyn ApiObject>),
        )
    }

    /// Mark the request as a dry run.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Get the namespace object, if it is one.
    pub fn get_namespace_obj(&self) -> Option<&Namespace> {
        self.object
            .as_ref()
            .and_then(|obj| obj.as_any().downcast_ref::<Namespace>())
    }

    /// Get the shoot object, if it is one.
    pub fn get_shoot(&self) -> Option<&Shoot> {
        self.object
            .as_ref()
            .and_then(|obj| obj.as_any().downcast_ref::<Shoot>())
    }
}

impl Attributes for AttributesRecord {
    fn get_name(&self) -> &str {
        &self.name
    }

    fn get_namespace(&self) -> &str {
        &self.namespace
    }

    fn get_resource(&self) -> &GroupVersionResource {
        &self.resource
    }

    fn get_operation(&self) -> Operation {
        self.operation
    }

    fn get_object(&self) -> Option<&dyn ApiObject> {
        self.object.as_deref()
    }

    fn get_object_mut(&mut self) -> Option<&mut (dyn ApiObject + 'static)> {
        self.object.as_deref_mut()
    }

    fn get_old_object(&self) -> Option<&dyn ApiObject> {
        self.old_object.as_deref()
    }

    fn get_kind(&self) -> &GroupVersionKind {
        &self.kind
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}
