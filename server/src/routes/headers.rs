//! Request header echo.

use std::collections::BTreeMap;

use axum::{
    http::{header, HeaderMap},
    response::Response,
};

use crate::routes::indented_json;
use crate::util::canonical_header_name;

/// `GET /headers` — every request header as a JSON object.
///
/// Names are reported in `Header-Case`, repeated headers are joined with
/// `", "` in arrival order, and keys are sorted so identical requests produce
/// identical bodies. `Host` is part of the request target rather than a
/// header for this purpose and is left out.
pub async fn headers(headers: HeaderMap) -> Response {
    indented_json(&collect_headers(&headers))
}

pub(crate) fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .keys()
        .filter(|name| **name != header::HOST)
        .map(|name| {
            let joined = headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()))
                .collect::<Vec<_>>()
                .join(", ");
            (canonical_header_name(name.as_str()).into_owned(), joined)
        })
        .collect()
}
