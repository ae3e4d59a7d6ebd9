// Copyright 2024 The Kubernetes Authors.
// Licensed under the Apache License, Version 2.0

//! High-availability zone annotations and their normalization.

mod annotation;
mod normalize;

pub use annotation::{ZoneSet, ZoneToken};
pub use normalize::normalize;

/// Annotation on seed namespaces listing the zones a control plane is spread over.
pub const HIGH_AVAILABILITY_CONFIG_ZONES: &str =
    "high-availability-config.resources.gardener.cloud/zones";
