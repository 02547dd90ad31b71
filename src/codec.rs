//! Numeric-keyed JSON payloads.
//!
//! The gateway names every attribute with a short decimal string (`"9001"`
//! is a name, `"5850"` an on/off state). Record types map those keys onto
//! their fields with `#[serde(rename = "...")]`.
//!
//! Records are decoded leniently: they carry `#[serde(default)]`, so absent
//! keys keep the default value, and unknown keys are ignored. Partial updates
//! use `Option` fields with `skip_serializing_none`, so only what was set
//! goes on the wire.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// Decode the payload fetched from `path`.
///
/// Nothing is partially applied: any mismatch fails the whole decode with
/// [`Error::MalformedPayload`], naming the key path that did not fit.
///
/// # Examples
///
/// ```
/// use lightctl::{Device, Error, codec};
///
/// let device: Device = codec::decode("/15001/65537", br#"{"9001": "Desk", "9003": 65537}"#).unwrap();
/// assert_eq!(device.name(), "Desk");
///
/// let err = codec::decode::<Device>("/15001/65537", br#"{"3311": [{"5851": "max"}]}"#).unwrap_err();
/// assert!(matches!(err, Error::MalformedPayload { reason, .. } if reason.starts_with("3311[0].5851")));
/// ```
pub fn decode<T: DeserializeOwned>(path: &str, payload: &[u8]) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_slice(payload);
    serde_path_to_error::deserialize(de)
        .map_err(|e| Error::malformed(path, format!("{}: {}", e.path(), e.inner())))
}

/// Encode a record, leaving out every field that is not set.
pub fn encode<T: Serialize>(record: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(record).map_err(Error::JsonDump)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use serde_json::{Value, json};

    #[derive(Debug, Default, PartialEq, Deserialize)]
    #[serde(default)]
    struct Inner {
        #[serde(rename = "1")]
        label: String,
    }

    #[serde_with::skip_serializing_none]
    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Outer {
        #[serde(rename = "10")]
        count: Option<u32>,
        #[serde(rename = "12")]
        tags: Vec<u32>,
        #[serde(rename = "13")]
        note: Option<String>,
    }

    #[derive(Debug, Default, PartialEq, Deserialize)]
    #[serde(default)]
    struct Nested {
        #[serde(rename = "11")]
        inner: Inner,
        #[serde(rename = "12")]
        items: Vec<Inner>,
    }

    #[test]
    fn test_decode_ignores_unknown_and_defaults_missing() {
        let payload = br#"{"10": 7, "99": "ignored"}"#;
        let outer: Outer = decode("/test", payload).unwrap();
        assert_eq!(
            outer,
            Outer {
                count: Some(7),
                tags: Vec::new(),
                note: None,
            }
        );
    }

    #[test]
    fn test_decode_mismatch_names_path_and_key() {
        let err = decode::<Nested>("/15001/65537", br#"{"12": [{"1": "a"}, {"1": 3}]}"#).unwrap_err();
        match err {
            Error::MalformedPayload { path, reason } => {
                assert_eq!(path, "/15001/65537");
                assert!(reason.starts_with("12[1].1: invalid type"), "{reason}");
            }
            other => panic!("unexpected error {other:?}"),
        }

        assert!(matches!(
            decode::<Nested>("/x", b"[1, 2]"),
            Err(Error::MalformedPayload { .. })
        ));
        assert!(matches!(
            decode::<Nested>("/x", b"not json"),
            Err(Error::MalformedPayload { .. })
        ));
    }

    #[test]
    fn test_encode_skips_absent() {
        let outer = Outer {
            count: Some(0),
            ..Outer::default()
        };
        let value: Value = serde_json::from_slice(&encode(&outer).unwrap()).unwrap();
        assert_eq!(value, json!({"10": 0, "12": []}));
    }
}
