use serde_json::{json, Value};
use sha2::{Digest, Sha256};

/// Cache key of a repository read: `{resource type}.{method}.{sha256}`.
///
/// The hash covers the normalized arguments, the repository's cache
/// namespace (API root and active scopes) and its flags, so reads differing
/// in any of those never share an entry.
/// Callers sort attribute maps by key and id lists by value before passing
/// them in.
pub fn cache_key(
    resource_type: &str,
    method: &str,
    arguments: &Value,
    namespace: &str,
    auth_enabled: bool,
    without_includes: bool,
) -> String {
    let payload = json!({
        "arguments": arguments,
        "namespace": namespace,
        "auth_enabled": auth_enabled,
        "without_includes": without_includes,
    });
    let digest = Sha256::digest(payload.to_string().as_bytes());
    format!("{}.{}.{:x}", resource_type, method, digest)
}
