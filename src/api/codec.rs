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

//! JSON codec between raw admission payloads and typed objects.
//!
//! Decoding keeps every field the typed model does not know about. Encoding
//! lays the typed object back over the payload it was decoded from, so keys
//! keep their received order and only rewritten values change.

use super::{ApiObject, Namespace, Shoot};
use crate::admission::{AdmissionError, AdmissionResult};
use serde_json::{Map, Value};

/// Decode a raw JSON object of the given kind.
pub fn decode(kind: &str, raw: &[u8]) -> AdmissionResult<Box<dyn ApiObject>> {
    let object: Box<dyn ApiObject> = match kind {
        Namespace::KIND => Box::new(serde_json::from_slice::<Namespace>(raw)?),
        Shoot::KIND => Box::new(serde_json::from_slice::<Shoot>(raw)?),
        other => return Err(AdmissionError::UnsupportedKind(other.to_string())),
    };
    Ok(object)
}

/// Encode `object` onto `original`, the payload it was decoded from.
///
/// Keys present in both keep the position they had in `original`; keys the
/// mutators added are appended in model order. Explicit `null`s the model
/// dropped on decode are kept.
pub fn encode(object: &dyn ApiObject, original: &[u8]) -> AdmissionResult<Vec<u8>> {
    let original: Value = serde_json::from_slice(original)?;
    Ok(serde_json::to_vec(&overlay(original, object.to_value()?))?)
}

fn overlay(original: Value, updated: Value) -> Value {
    match (original, updated) {
        (Value::Object(original), Value::Object(updated)) => {
            let mut merged = Map::new();
            for (key, old) in original {
                match updated.get(&key) {
                    Some(new) => {
                        let new = overlay(old, new.clone());
                        merged.insert(key, new);
                    }
                    None if old.is_null() => {
                        merged.insert(key, old);
                    }
                    None => {}
                }
            }
            for (key, new) in updated {
                if !merged.contains_key(&key) {
                    merged.insert(key, new);
                }
            }
            Value::Object(merged)
        }
        (_, updated) => updated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_decode_namespace() {
        let raw = br#"{"metadata":{"name":"foo","annotations":{"a":"b"}}}"#;
        let obj = decode("Namespace", raw).unwrap();
        assert_eq!(obj.kind(), "Namespace");
        assert_eq!(obj.metadata().annotation("a"), Some("b"));
        assert!(obj.as_any().downcast_ref::<Namespace>().is_some());
    }

    #[test]
    fn test_decode_unsupported_kind() {
        let err = decode("Pod", b"{}").unwrap_err();
        assert!(matches!(err, AdmissionError::UnsupportedKind(k) if k == "Pod"));
    }

    #[test]
    fn test_decode_invalid_json() {
        let err = decode("Shoot", b"{not json").unwrap_err();
        assert!(matches!(err, AdmissionError::Serialization(_)));
    }

    #[test]
    fn test_encode_preserves_untouched_fields() {
        let input = json!({
            "apiVersion": "core.gardener.cloud/v1beta1",
            "kind": "Shoot",
            "metadata": {"name": "foo", "generation": 3},
            "spec": {"provider": {"type": "azure"}, "purpose": "evaluation"},
            "status": {"technicalID": "shoot--dev--foo"}
        });
        let raw = serde_json::to_vec(&input).unwrap();
        let obj = decode("Shoot", &raw).unwrap();
        let out = encode(obj.as_ref(), &raw).unwrap();
        assert_eq!(out, raw);
    }

    #[test]
    fn test_encode_keeps_key_order_of_mutated_object() {
        let raw = concat!(
            r#"{"apiVersion":"v1","kind":"Namespace","metadata":{"uid":"u","name":"foo","#,
            r#""annotations":{"z":"1","zones":"2,westeurope-1,3","a":"x"},"#,
            r#""labels":{"tier":"b","app":"a"}},"status":{"phase":"Active"}}"#
        );
        let mut obj = decode("Namespace", raw.as_bytes()).unwrap();
        obj.metadata_mut().set_annotation("zones", "1,2,3");
        obj.metadata_mut().set_label("added", "yes");

        let expected = concat!(
            r#"{"apiVersion":"v1","kind":"Namespace","metadata":{"uid":"u","name":"foo","#,
            r#""annotations":{"z":"1","zones":"1,2,3","a":"x"},"#,
            r#""labels":{"tier":"b","app":"a","added":"yes"}},"status":{"phase":"Active"}}"#
        );
        let out = encode(obj.as_ref(), raw.as_bytes()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_encode_keeps_explicit_nulls() {
        let raw = br#"{"metadata":{"name":"foo","annotations":null,"labels":{"a":"b"}}}"#;
        let obj = decode("Namespace", raw).unwrap();
        assert!(obj.metadata().annotations.is_none());
        assert_eq!(encode(obj.as_ref(), raw).unwrap(), raw.to_vec());
    }

    #[test]
    fn test_encode_replaces_nulls_that_were_set() {
        let raw = br#"{"metadata":{"name":"foo","annotations":null}}"#;
        let mut obj = decode("Namespace", raw).unwrap();
        obj.metadata_mut().set_annotation("k", "v");
        let out: Value = serde_json::from_slice(&encode(obj.as_ref(), raw).unwrap()).unwrap();
        assert_eq!(out, json!({"metadata": {"name": "foo", "annotations": {"k": "v"}}}));
    }
}
