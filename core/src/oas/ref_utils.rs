#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Helpers for resolving local `$ref` pointers (`#/components/{section}/{name}`)
//! and for walking every `$ref` of a document.

use percent_encoding::percent_decode_str;
use serde_json::Value;

/// Splits a local `$ref` into its components section and entry name.
///
/// Returns `None` for external references or pointers outside `#/components/`.
pub(crate) fn split_component_ref(ref_str: &str) -> Option<(&str, String)> {
    let pointer = ref_str.strip_prefix("#/")?;
    let mut segments = pointer.splitn(3, '/');
    if segments.next()? != "components" {
        return None;
    }
    let section = segments.next()?;
    let name = decode_pointer_segment(segments.next()?);
    if name.is_empty() {
        None
    } else {
        Some((section, name))
    }
}

/// Decodes a JSON Pointer segment (handles `~1`, `~0` and percent-encoding).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Collects `(location, $ref)` pairs for every `$ref` string in `value`.
///
/// Locations are JSON pointers into `value`.
pub(crate) fn collect_refs(value: &Value) -> Vec<(String, String)> {
    let mut out = Vec::new();
    walk(value, String::new(), &mut out);
    out
}

fn walk(value: &Value, location: String, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_location = format!("{}/{}", location, encode_pointer_segment(key));
                if key == "$ref" {
                    if let Some(target) = child.as_str() {
                        out.push((child_location, target.to_string()));
                    }
                    continue;
                }
                walk(child, child_location, out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                walk(child, format!("{}/{}", location, index), out);
            }
        }
        _ => {}
    }
}

pub(crate) fn encode_pointer_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}
