//! # Field Path Normalization
//!
//! Engines report instance locations in different conventions. All of them
//! are rendered here as dotted, root-relative paths, with the root itself
//! as the empty string.
//!
//! | Engine form     | Normalized |
//! |-----------------|------------|
//! | `""`, `/`, `#`  | `""`       |
//! | `(root)`, `$`   | `""`       |
//! | `/a/0/b`        | `a.0.b`    |
//! | `#/a/b`         | `a.b`      |
//! | `(root).a.b`    | `a.b`      |
//! | `$.a.b`         | `a.b`      |
//! | `a.b`           | `a.b`      |
//!
//! Overlay keys are taken from the unescaped segments, never from the
//! dotted rendering, so `/user.name` keys `user.name` and not `user`.

use serde_json::Value;

const ROOT_MARKERS: [&str; 2] = ["(root)", "$"];

/// Normalize an engine-native field path.
pub fn normalize_field(path: &str) -> String {
    field_segments(path).join(".")
}

/// Split an engine-native field path into its property and index segments.
///
/// JSON Pointer segments are unescaped, so property names containing `.`
/// or `/` survive intact. Dotted forms are split on `.`.
pub fn field_segments(path: &str) -> Vec<String> {
    let path = path.trim();

    if let Some(pointer) = path.strip_prefix('#') {
        return pointer_segments(pointer);
    }
    if path.starts_with('/') {
        return pointer_segments(path);
    }

    let mut dotted = path;
    for marker in ROOT_MARKERS {
        if dotted == marker {
            return Vec::new();
        }
        if let Some(rest) = dotted.strip_prefix(marker).and_then(|r| r.strip_prefix('.')) {
            dotted = rest;
            break;
        }
    }

    dotted
        .split('.')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Overlay lookup key: the first segment that names an object property
/// rather than an array index. `None` for the root.
///
/// A segment is an index only when `document` holds an array at that
/// level, so digit-only property names (`"2024"`) remain keys.
pub fn overlay_key<'a>(segments: &'a [String], document: &Value) -> Option<&'a str> {
    let mut current = Some(document);
    for segment in segments {
        match current {
            Some(Value::Array(items)) => {
                current = segment.parse::<usize>().ok().and_then(|i| items.get(i));
            }
            _ => return Some(segment.as_str()),
        }
    }
    None
}

fn pointer_segments(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect()
}

/// Append one property to a JSON Pointer, escaping per RFC 6901.
pub(crate) fn pointer_join(base: &str, property: &str) -> String {
    let escaped = property.replace('~', "~0").replace('/', "~1");
    format!("{}/{escaped}", base.trim_end_matches('/'))
}
