use crate::types::{Node, Violation};
use blake3::Hasher;
use std::fmt;

/// Content hash of a violation list, used to tell violation sets apart
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViolationSetKey([u8; 32]);

impl ViolationSetKey {
    pub fn of(violations: &[Violation]) -> Self {
        let mut hasher = Hasher::new();
        hasher.update(&(violations.len() as u64).to_le_bytes());
        for violation in violations {
            field(&mut hasher, violation.id.as_bytes());
            field(&mut hasher, violation.source.as_str().as_bytes());
            field(&mut hasher, violation.target.as_str().as_bytes());
            node(&mut hasher, violation.source_node.as_ref());
            node(&mut hasher, violation.target_node.as_ref());
            // serde_json::Map iterates in key order, so this is stable
            for (key, value) in &violation.metadata {
                field(&mut hasher, key.as_bytes());
                field(&mut hasher, value.to_string().as_bytes());
            }
            hasher.update(b"|");
        }
        Self(*hasher.finalize().as_bytes())
    }

    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.0).to_hex().to_string()
    }
}

impl fmt::Debug for ViolationSetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ViolationSetKey({})", &self.to_hex()[..12])
    }
}

fn field(hasher: &mut Hasher, bytes: &[u8]) {
    hasher.update(&(bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

fn node(hasher: &mut Hasher, node: Option<&Node>) {
    match node {
        Some(node) => {
            hasher.update(&[1]);
            field(hasher, node.id.as_str().as_bytes());
            field(hasher, node.label.as_bytes());
        }
        None => {
            hasher.update(&[0]);
        }
    }
}
