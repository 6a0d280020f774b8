//! Deterministic fingerprints of view type definitions.
//!
//! Every generated view type hashes a canonical description of itself (type
//! name, fields, value kinds, accessor and mutator names, policy). Two view
//! types with equal fingerprints are interchangeable definitions, which lets
//! callers on different threads confirm they observe one and the same
//! substitute type.
//!
//! Hashing is SHA-256 with domain separation and length prefixing, so the
//! fingerprint is stable across builds and processes.

use crate::policy::Policy;
use crate::schema::{FieldInfo, FieldKind, Schema};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Domain for view type fingerprints (v0).
const DOMAIN_VIEW_TYPE_V0: &[u8] = b"VIEW_TYPE_V0";

/// A 256-bit hash value.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashValue(pub [u8; 32]);

impl HashValue {
    /// Creates a zero hash (all zeros).
    #[inline]
    pub fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Returns the raw byte array.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Computes SHA-256 of `data` with domain separation.
    ///
    /// The hashed input is `b"IV:<domain>:v1" || len(data) as u64 LE || data`.
    pub fn hash_with_domain(domain: &[u8], data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"IV:");
        hasher.update(domain);
        hasher.update(b":v1");
        hasher.update((data.len() as u64).to_le_bytes());
        hasher.update(data);
        Self(hasher.finalize().into())
    }
}

impl std::fmt::Display for HashValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "HashValue({:02x}{:02x}{:02x}{:02x}…)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

/// Types with a canonical byte encoding for hashing.
pub trait Canonicalizable {
    /// Serialize to canonical byte representation.
    fn to_canonical_bytes(&self) -> Vec<u8>;

    /// Domain-separated hash of the canonical bytes.
    fn fingerprint(&self, domain: &[u8]) -> HashValue {
        HashValue::hash_with_domain(domain, &self.to_canonical_bytes())
    }
}

fn push_str(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(&(s.len() as u64).to_le_bytes());
    out.extend_from_slice(s.as_bytes());
}

impl Canonicalizable for FieldInfo {
    fn to_canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(64);
        push_str(&mut out, self.name);
        push_str(&mut out, self.accessor);
        match self.mutator {
            Some(mutator) => {
                out.push(1);
                push_str(&mut out, mutator);
            }
            None => out.push(0),
        }
        out.push(match self.kind {
            FieldKind::Terminal => 0,
            FieldKind::Complex => 1,
        });
        out
    }
}

impl<T> Canonicalizable for Schema<T> {
    fn to_canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(256);
        push_str(&mut out, self.type_name());
        let fields: Vec<_> = self.fields().collect();
        out.extend_from_slice(&(fields.len() as u64).to_le_bytes());
        for field in fields {
            let bytes = field.to_canonical_bytes();
            out.extend_from_slice(&(bytes.len() as u64).to_le_bytes());
            out.extend_from_slice(&bytes);
        }
        let mutators = self.standalone_mutators();
        out.extend_from_slice(&(mutators.len() as u64).to_le_bytes());
        for mutator in mutators {
            push_str(&mut out, mutator);
        }
        out.push(self.is_sealed() as u8);
        out
    }
}

/// Fingerprint of the view type generated for `schema` under `policy`.
pub fn view_type_fingerprint<T>(schema: &Schema<T>, policy: Policy) -> HashValue {
    let mut bytes = schema.to_canonical_bytes();
    push_str(&mut bytes, policy.tag());
    HashValue::hash_with_domain(DOMAIN_VIEW_TYPE_V0, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Tag {
        text: String,
    }

    fn tag_schema(mutator: Option<&'static str>) -> Schema<Tag> {
        Schema::builder("Tag")
            .terminal("text", "get_text", mutator, |t: &Tag| &t.text, |t, v| t.text = v)
            .build()
            .unwrap()
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let a = view_type_fingerprint(&tag_schema(Some("set_text")), Policy::Strict);
        let b = view_type_fingerprint(&tag_schema(Some("set_text")), Policy::Strict);
        assert_eq!(a, b);
        assert_ne!(a, HashValue::zero());
    }

    #[test]
    fn policy_changes_fingerprint() {
        let schema = tag_schema(Some("set_text"));
        assert_ne!(
            view_type_fingerprint(&schema, Policy::Strict),
            view_type_fingerprint(&schema, Policy::Silent)
        );
    }

    #[test]
    fn mutator_changes_fingerprint() {
        assert_ne!(
            view_type_fingerprint(&tag_schema(Some("set_text")), Policy::Strict),
            view_type_fingerprint(&tag_schema(None), Policy::Strict)
        );
    }

    #[test]
    fn domain_separates_hashes() {
        assert_ne!(
            HashValue::hash_with_domain(b"a", b"data"),
            HashValue::hash_with_domain(b"b", b"data")
        );
    }
}
