//! Small helpers shared across modules.

use std::borrow::Cow;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Serialize `value` as JSON indented by four spaces per level.
///
/// - `{}` for an empty map
/// - `{\n    "k": "v"\n}` for a single entry
pub fn to_indented_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::with_capacity(128);
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Canonical `Header-Case` form of a header name.
///
/// - `"x-test-header"` → `"X-Test-Header"`
/// - `"content-type"` → `"Content-Type"`
/// - Names that are already canonical pass through unchanged.
pub fn canonical_header_name(name: &str) -> Cow<'_, str> {
    let mut upper_next = true;
    let canonical = name.chars().all(|c| {
        let ok = if upper_next {
            !c.is_ascii_lowercase()
        } else {
            !c.is_ascii_uppercase()
        };
        upper_next = c == '-';
        ok
    });
    if canonical {
        return Cow::Borrowed(name);
    }

    let mut out = String::with_capacity(name.len());
    let mut upper_next = true;
    for c in name.chars() {
        out.push(if upper_next {
            c.to_ascii_uppercase()
        } else {
            c.to_ascii_lowercase()
        });
        upper_next = c == '-';
    }
    Cow::Owned(out)
}
