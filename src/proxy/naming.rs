//! Proxy class naming.
//!
//! A proxy class for `Entity` generated under namespace `Proxies` is named
//! `Proxies::__CG__::Entity`. The marker segment lets any holder of a proxy
//! recover the entity class it stands in for.

use std::path::{Path, PathBuf};

pub const PROXY_MARKER: &str = "__CG__";
pub const ARTIFACT_EXTENSION: &str = "proxy.json";

const SEPARATOR: &str = "::";

pub fn proxy_class_name(namespace: &str, class_name: &str) -> String {
    let namespace = namespace.trim_end_matches(SEPARATOR);
    if namespace.is_empty() {
        format!("{}{}{}", PROXY_MARKER, SEPARATOR, class_name)
    } else {
        format!("{}{}{}{}{}", namespace, SEPARATOR, PROXY_MARKER, SEPARATOR, class_name)
    }
}

/// Entity class behind a (possibly proxied) class name; plain names pass through.
pub fn real_class_name(class_name: &str) -> &str {
    let marker = format!("{}{}", PROXY_MARKER, SEPARATOR);
    match class_name.rfind(&marker) {
        Some(pos) => &class_name[pos + marker.len()..],
        None => class_name,
    }
}

pub fn is_proxy_class_name(class_name: &str) -> bool {
    class_name.contains(&format!("{}{}", PROXY_MARKER, SEPARATOR))
}

/// `<dir>/__CG__<EncodedClass>.proxy.json`
///
/// Distinct class names always map to distinct files: `::` becomes `.`, `_`
/// is doubled, ASCII alphanumerics pass through and anything else is written
/// as `-<hex>-`.
pub fn artifact_path(proxy_dir: &Path, class_name: &str) -> PathBuf {
    let encoded = class_name
        .split(SEPARATOR)
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join(".");
    proxy_dir.join(format!("{}{}.{}", PROXY_MARKER, encoded, ARTIFACT_EXTENSION))
}

fn encode_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for c in segment.chars() {
        match c {
            c if c.is_ascii_alphanumeric() => encoded.push(c),
            '_' => encoded.push_str("__"),
            c => encoded.push_str(&format!("-{:x}-", c as u32)),
        }
    }
    encoded
}
