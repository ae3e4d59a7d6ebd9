// Copyright 2024 The Kubernetes Authors.
// Licensed under the Apache License, Version 2.0

//! Lexical codec for the zones annotation value.
//!
//! The value is a comma-separated list of tokens. A token is either an
//! ordinal (`^\d+$`) or region-qualified (`^[a-z0-9-]+-[A-Za-z0-9]+$`, the
//! suffix being everything after the last `-`). Nothing is normalized here.

use crate::admission::{AdmissionError, AdmissionResult};
use std::fmt;

/// ZoneToken is one element of a zones annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ZoneToken {
    /// A logical zone number, digits as written.
    Ordinal(String),
    /// A provider zone name such as `westeurope-1`.
    Qualified { region: String, suffix: String },
}

impl ZoneToken {
    fn parse(token: &str) -> Option<Self> {
        if is_ordinal(token) {
            return Some(ZoneToken::Ordinal(token.to_string()));
        }
        let (region, suffix) = token.rsplit_once('-')?;
        let region_ok = !region.is_empty()
            && region
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
        let suffix_ok = !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_alphanumeric());
        if region_ok && suffix_ok {
            Some(ZoneToken::Qualified {
                region: region.to_string(),
                suffix: suffix.to_string(),
            })
        } else {
            None
        }
    }
}

impl fmt::Display for ZoneToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneToken::Ordinal(digits) => f.write_str(digits),
            ZoneToken::Qualified { region, suffix } => write!(f, "{}-{}", region, suffix),
        }
    }
}

pub(crate) fn is_ordinal(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// ZoneSet is a parsed zones annotation, tokens in their original order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ZoneSet {
    tokens: Vec<ZoneToken>,
}

impl ZoneSet {
    pub fn new(tokens: Vec<ZoneToken>) -> Self {
        Self { tokens }
    }

    /// Parse an annotation value.
    ///
    /// A value that is empty after trimming yields an empty set. Any empty or
    /// unrecognized token fails the whole parse.
    pub fn parse(raw: &str) -> AdmissionResult<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let tokens = raw
            .split(',')
            .map(str::trim)
            .map(|t| ZoneToken::parse(t).ok_or_else(|| AdmissionError::malformed_token(t, raw)))
            .collect::<AdmissionResult<Vec<_>>>()?;
        Ok(Self { tokens })
    }

    /// Serialize the tokens in stored order, comma-joined.
    pub fn render(&self) -> String {
        self.tokens
            .iter()
            .map(ZoneToken::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn tokens(&self) -> &[ZoneToken] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}

impl fmt::Display for ZoneSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qualified(region: &str, suffix: &str) -> ZoneToken {
        ZoneToken::Qualified {
            region: region.to_string(),
            suffix: suffix.to_string(),
        }
    }

    #[test]
    fn test_parse_mixed_tokens() {
        let set = ZoneSet::parse("2, westeurope-1 ,3").unwrap();
        assert_eq!(
            set.tokens(),
            &[
                ZoneToken::Ordinal("2".to_string()),
                qualified("westeurope", "1"),
                ZoneToken::Ordinal("3".to_string()),
            ]
        );
        assert_eq!(set.render(), "2,westeurope-1,3");
    }

    #[test]
    fn test_parse_hyphenated_region() {
        let set = ZoneSet::parse("us-east-1a").unwrap();
        assert_eq!(set.tokens(), &[qualified("us-east", "1a")]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(ZoneSet::parse("").unwrap().is_empty());
        assert!(ZoneSet::parse("  ").unwrap().is_empty());
        assert_eq!(ZoneSet::default().render(), "");
    }

    #[test]
    fn test_parse_malformed() {
        let err = ZoneSet::parse("2,,bad token").unwrap_err();
        match err {
            AdmissionError::MalformedToken { token, value } => {
                assert_eq!(token, "");
                assert_eq!(value, "2,,bad token");
            }
            other => panic!("unexpected error: {other}"),
        }

        for raw in ["1,", "bad token", "-1", "westeurope-", "WestEurope-1", "zone_1"] {
            assert!(
                matches!(ZoneSet::parse(raw), Err(AdmissionError::MalformedToken { .. })),
                "{raw} should not parse"
            );
        }
    }

    #[test]
    fn test_canonical_round_trip() {
        for canonical in ["", "1", "1,2", "1,2,3"] {
            let rendered = ZoneSet::parse(canonical).unwrap().render();
            assert_eq!(rendered, canonical);
            assert_eq!(ZoneSet::parse(&rendered).unwrap().render(), rendered);
        }
    }
}
