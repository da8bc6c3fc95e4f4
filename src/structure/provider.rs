//! Structure loading seam
//!
//! Graph construction is agnostic to where structures come from. The on-disk
//! convention is one structure file per crystal identifier, named
//! `<identifier>.<ext>` under the dataset root; parsing that format is the
//! provider's concern, not this crate's.

use std::collections::HashMap;
use std::sync::Arc;

use super::{CrystalStructure, StructureError};

/// Resolves a crystal identifier to its structure.
///
/// Implementations must be shareable across worker threads; loading may
/// block on I/O and is the unit of concurrency during dataset construction.
pub trait StructureProvider: Send + Sync {
    fn load_structure(&self, id: &str) -> Result<CrystalStructure, StructureError>;
}

/// In-memory provider, for tests and for embedding pre-parsed structures.
#[derive(Debug, Default, Clone)]
pub struct MemoryProvider {
    structures: HashMap<String, Arc<CrystalStructure>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, structure: CrystalStructure) {
        self.structures.insert(id.into(), Arc::new(structure));
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
}

impl StructureProvider for MemoryProvider {
    fn load_structure(&self, id: &str) -> Result<CrystalStructure, StructureError> {
        self.structures
            .get(id)
            .map(|s| s.as_ref().clone())
            .ok_or_else(|| StructureError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_provider() {
        let mut provider = MemoryProvider::new();
        let s = CrystalStructure::from_symbols(&["Zn"], vec![[0.0; 3]], None).unwrap();
        provider.insert("mof-1", s);

        assert_eq!(provider.load_structure("mof-1").unwrap().len(), 1);
        assert!(matches!(
            provider.load_structure("missing"),
            Err(StructureError::NotFound(_))
        ));
    }
}
