// Copyright 2024 The Kubernetes Authors.
// Licensed under the Apache License, Version 2.0

//! Zone annotation mutator for seed namespaces.
//!
//! Control plane namespaces of highly available shoots carry the zones they
//! are spread over. Depending on who wrote the annotation those zones are
//! ordinals (`2`) or provider zone names (`westeurope-1`); this mutator
//! rewrites the value into canonical ordinals.

use crate::admission::{
    AdmissionError, AdmissionResult, Attributes, Handler, Interface, MutationInterface, Operation,
};
use crate::api::Namespace;
use crate::topology::{normalize, ZoneSet, HIGH_AVAILABILITY_CONFIG_ZONES};
use tracing::{debug, info};

pub const MUTATOR_NAME: &str = "namespace-zones";

/// Mutator normalizes the zones annotation of namespaces.
pub struct Mutator {
    handler: Handler,
    region: String,
}

impl Mutator {
    /// Create a mutator normalizing zones against the seed `region`.
    pub fn new(region: &str) -> Self {
        Self {
            handler: Handler::new_create_update(),
            region: region.to_string(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Normalize the annotation of `ns` in place.
    pub fn mutate(&self, ns: &mut Namespace) -> AdmissionResult<()> {
        let current = match ns.metadata.annotation(HIGH_AVAILABILITY_CONFIG_ZONES) {
            Some(v) if !v.trim().is_empty() => v,
            _ => return Ok(()),
        };

        let zones = ZoneSet::parse(current)?;
        let rendered = normalize(&zones, &self.region).render();
        if rendered == current {
            return Ok(());
        }

        info!(
            namespace = %ns.metadata.name(),
            from = %current,
            to = %rendered,
            "Normalizing zone annotation"
        );
        ns.metadata
            .set_annotation(HIGH_AVAILABILITY_CONFIG_ZONES, &rendered);
        Ok(())
    }
}

impl Interface for Mutator {
    fn handles(&self, operation: Operation) -> bool {
        self.handler.handles(operation)
    }
}

impl MutationInterface for Mutator {
    fn name(&self) -> &'static str {
        MUTATOR_NAME
    }

    fn admit(&self, attributes: &mut dyn Attributes) -> AdmissionResult<()> {
        let obj = match attributes.get_object_mut() {
            Some(o) => o,
            None => return Ok(()),
        };
        let kind = obj.kind().to_string();
        let ns = obj
            .as_any_mut()
            .downcast_mut::<Namespace>()
            .ok_or_else(|| AdmissionError::unexpected_type(Namespace::KIND, &kind))?;

        debug!(namespace = %ns.metadata.name(), region = %self.region, "Checking zone annotation");
        self.mutate(ns)
    }
}
