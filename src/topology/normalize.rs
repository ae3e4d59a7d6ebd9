// Copyright 2024 The Kubernetes Authors.
// Licensed under the Apache License, Version 2.0

//! Zone normalization: mixed zone tokens to canonical ordinals.

use super::annotation::{is_ordinal, ZoneSet, ZoneToken};
use std::collections::HashSet;

/// Identity of the physical zone a token refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Identity<'a> {
    /// Ordinals and tokens qualified with the local region.
    Local(String),
    /// Tokens of another region never merge with local ones.
    Foreign { region: &'a str, suffix: &'a str },
}

/// Strip leading zeros so that `01` and `1` denote the same zone.
fn canonical_number(digits: &str) -> String {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn identity<'a>(token: &'a ZoneToken, region: &str) -> Identity<'a> {
    match token {
        ZoneToken::Ordinal(digits) => Identity::Local(canonical_number(digits)),
        ZoneToken::Qualified { region: r, suffix } if r == region => {
            if is_ordinal(suffix) {
                Identity::Local(canonical_number(suffix))
            } else {
                Identity::Local(suffix.clone())
            }
        }
        ZoneToken::Qualified { region: r, suffix } => Identity::Foreign { region: r, suffix },
    }
}

/// Normalize `zones` for a seed in `region`.
///
/// Every distinct zone identity is assigned an ordinal, starting at 1, in the
/// order it is first seen; the result lists those ordinals ascending. Tokens
/// that refer to the same zone (`1` and `westeurope-1` in `westeurope`)
/// collapse into one. The output is already canonical, so normalizing it
/// again returns it unchanged.
pub fn normalize(zones: &ZoneSet, region: &str) -> ZoneSet {
    let mut seen = HashSet::new();
    let mut distinct = 0usize;
    for token in zones.tokens() {
        if seen.insert(identity(token, region)) {
            distinct += 1;
        }
    }
    ZoneSet::new(
        (1..=distinct)
            .map(|ordinal| ZoneToken::Ordinal(ordinal.to_string()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGION: &str = "westeurope";

    fn normalized(raw: &str) -> String {
        normalize(&ZoneSet::parse(raw).unwrap(), REGION).render()
    }

    #[test]
    fn test_mixed_tokens() {
        assert_eq!(normalized("2,westeurope-1,3"), "1,2,3");
    }

    #[test]
    fn test_duplicates_across_representations_collapse() {
        assert_eq!(normalized("1,westeurope-1"), "1");
        assert_eq!(normalized("westeurope-2,2,02"), "1");
        assert_eq!(normalized("3,3,3"), "1");
    }

    #[test]
    fn test_foreign_region_is_never_merged() {
        assert_eq!(normalized("1,northeurope-1"), "1,2");
        assert_eq!(normalized("northeurope-1,northeurope-1"), "1");
        assert_eq!(normalized("northeurope-1,westeurope-1,1"), "1,2");
    }

    #[test]
    fn test_non_numeric_suffix() {
        assert_eq!(normalized("westeurope-a,westeurope-b,westeurope-a"), "1,2");
    }

    #[test]
    fn test_empty() {
        assert_eq!(normalized(""), "");
    }

    #[test]
    fn test_idempotent() {
        for raw in [
            "",
            "1",
            "3,1,2",
            "2,westeurope-1,3",
            "northeurope-1,1,westeurope-1",
            "westeurope-a,7",
        ] {
            let once = normalize(&ZoneSet::parse(raw).unwrap(), REGION);
            let twice = normalize(&once, REGION);
            assert_eq!(once, twice, "normalize not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_deterministic() {
        let zones = ZoneSet::parse("northeurope-2,3,westeurope-3,1").unwrap();
        let first = normalize(&zones, REGION);
        for _ in 0..16 {
            assert_eq!(normalize(&zones, REGION), first);
        }
        assert_eq!(first.render(), "1,2,3");
    }
}
