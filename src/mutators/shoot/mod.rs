// Copyright 2024 The Kubernetes Authors.
// Licensed under the Apache License, Version 2.0

//! Networking defaults for Shoots of this provider.
//!
//! New clusters on this provider route pod traffic natively, so the overlay
//! network of calico and cilium is switched off unless the user asked for it.
//! Existing clusters keep whatever they were created with.

use crate::admission::{
    AdmissionError, AdmissionResult, Attributes, Handler, Interface, MutationInterface, Operation,
};
use crate::api::{Networking, Shoot};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

pub const MUTATOR_NAME: &str = "shoot-networking";

pub const NETWORKING_CALICO: &str = "calico";
pub const NETWORKING_CILIUM: &str = "cilium";

const OVERLAY_KEY: &str = "overlay";
const SNAT_TO_UPSTREAM_DNS_KEY: &str = "snatToUpstreamDNS";

/// API version of the network extension's provider config.
fn network_config_api_version(networking_type: &str) -> String {
    format!("{}.networking.extensions.gardener.cloud/v1alpha1", networking_type)
}

/// Mutator defaults the networking provider config of Shoots.
pub struct Mutator {
    handler: Handler,
}

impl Mutator {
    pub fn new() -> Self {
        Self {
            handler: Handler::new_create_update(),
        }
    }

    /// Apply the defaults to `shoot`, using `old` to tell creation from update.
    pub fn mutate(&self, shoot: &mut Shoot, old: Option<&Shoot>) -> AdmissionResult<()> {
        if shoot.metadata.is_being_deleted() {
            return Ok(());
        }
        let name = shoot.metadata.name().to_string();

        let networking = match shoot.networking_mut() {
            Some(n) => n,
            None => return Ok(()),
        };
        let networking_type = match networking.type_.as_deref() {
            Some(t @ (NETWORKING_CALICO | NETWORKING_CILIUM)) => t.to_string(),
            _ => return Ok(()),
        };

        match old {
            None => default_on_create(networking, &networking_type)?,
            Some(old) => {
                let old_overlay = old
                    .networking()
                    .and_then(|n| n.provider_config.as_ref())
                    .and_then(|c| c.get(OVERLAY_KEY))
                    .cloned();
                if let Some(old_overlay) = old_overlay {
                    carry_overlay(networking, &networking_type, old_overlay)?;
                }
            }
        }

        debug!(shoot = %name, networking = %networking_type, "Networking defaults applied");
        Ok(())
    }
}

impl Default for Mutator {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrow the provider config as a JSON object, creating it if absent.
fn provider_config_mut<'a>(
    networking: &'a mut Networking,
    networking_type: &str,
) -> AdmissionResult<&'a mut Map<String, Value>> {
    let config = networking.provider_config.get_or_insert_with(|| {
        json!({
            "apiVersion": network_config_api_version(networking_type),
            "kind": "NetworkConfig",
        })
    });
    config.as_object_mut().ok_or_else(|| {
        AdmissionError::mutation(format!(
            "networking provider config of type {} is not an object",
            networking_type
        ))
    })
}

fn default_on_create(networking: &mut Networking, networking_type: &str) -> AdmissionResult<()> {
    let config = provider_config_mut(networking, networking_type)?;
    if !config.contains_key(OVERLAY_KEY) {
        info!(networking = %networking_type, "Disabling overlay network for new shoot");
        config.insert(OVERLAY_KEY.to_string(), json!({"enabled": false}));
    }

    let overlay_disabled = config
        .get(OVERLAY_KEY)
        .and_then(|o| o.get("enabled"))
        .and_then(Value::as_bool)
        == Some(false);
    if networking_type == NETWORKING_CALICO
        && overlay_disabled
        && !config.contains_key(SNAT_TO_UPSTREAM_DNS_KEY)
    {
        config.insert(
            SNAT_TO_UPSTREAM_DNS_KEY.to_string(),
            json!({"enabled": false}),
        );
    }
    Ok(())
}

fn carry_overlay(
    networking: &mut Networking,
    networking_type: &str,
    old_overlay: Value,
) -> AdmissionResult<()> {
    if networking
        .provider_config
        .as_ref()
        .is_some_and(|c| c.get(OVERLAY_KEY).is_some())
    {
        return Ok(());
    }
    let config = provider_config_mut(networking, networking_type)?;
    info!(networking = %networking_type, "Keeping overlay setting of existing shoot");
    config.insert(OVERLAY_KEY.to_string(), old_overlay);
    Ok(())
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
        let old = match attributes.get_old_object() {
            Some(o) => Some(
                o.as_any()
                    .downcast_ref::<Shoot>()
                    .ok_or_else(|| AdmissionError::unexpected_type(Shoot::KIND, o.kind()))?
                    .clone(),
            ),
            None => None,
        };

        let obj = match attributes.get_object_mut() {
            Some(o) => o,
            None => return Ok(()),
        };
        let kind = obj.kind().to_string();
        let shoot = obj
            .as_any_mut()
            .downcast_mut::<Shoot>()
            .ok_or_else(|| AdmissionError::unexpected_type(Shoot::KIND, &kind))?;

        self.mutate(shoot, old.as_ref())
    }
}
