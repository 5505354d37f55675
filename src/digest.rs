//! Content digests for settings documents using BLAKE3

use blake3::Hasher;
use serde_json::Value;

/// 32-byte BLAKE3 digest
pub type Digest = [u8; 32];

/// Compute the digest of a JSON document.
///
/// Object keys are hashed in sorted order and every value carries a type
/// tag, so equal documents always produce the same digest regardless of
/// how their maps were built.
pub fn document_digest(value: &Value) -> Digest {
    let mut hasher = Hasher::new();
    hash_value(&mut hasher, value);
    *hasher.finalize().as_bytes()
}

/// Combine an ordered list of `(label, digest)` pairs into one digest
pub fn combine<'a>(parts: impl IntoIterator<Item = (&'a str, &'a Digest)>) -> Digest {
    let mut hasher = Hasher::new();
    hasher.update(b"stack");
    for (label, digest) in parts {
        hasher.update(&(label.len() as u64).to_be_bytes());
        hasher.update(label.as_bytes());
        hasher.update(digest);
    }
    *hasher.finalize().as_bytes()
}

/// Short hex form for logs and CLI output
pub fn short_hex(digest: &Digest) -> String {
    hex::encode(&digest[..8])
}

fn hash_str(hasher: &mut Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_be_bytes());
    hasher.update(s.as_bytes());
}

fn hash_value(hasher: &mut Hasher, value: &Value) {
    match value {
        Value::Null => {
            hasher.update(b"n");
        }
        Value::Bool(b) => {
            hasher.update(if *b { b"t" } else { b"f" });
        }
        Value::Number(n) => {
            hasher.update(b"#");
            hash_str(hasher, &n.to_string());
        }
        Value::String(s) => {
            hasher.update(b"s");
            hash_str(hasher, s);
        }
        Value::Array(items) => {
            hasher.update(b"[");
            hasher.update(&(items.len() as u64).to_be_bytes());
            for item in items {
                hash_value(hasher, item);
            }
        }
        Value::Object(map) => {
            hasher.update(b"{");
            hasher.update(&(map.len() as u64).to_be_bytes());
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for key in keys {
                hash_str(hasher, key);
                hash_value(hasher, &map[key.as_str()]);
            }
        }
    }
}
