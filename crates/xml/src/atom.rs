//! Interned element and attribute names.
//!
//! XML names are case-sensitive, so names are stored exactly as written.
use std::collections::HashMap;
use std::sync::Arc;

/// Opaque atom identifier, valid for the table that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomId(pub u32);

#[derive(Debug, Default)]
pub struct AtomTable {
    atoms: Vec<Arc<str>>,
    map: HashMap<Arc<str>, AtomId>,
}

impl AtomTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` once every `u32` id is taken.
    pub fn intern(&mut self, name: &str) -> Option<AtomId> {
        if let Some(id) = self.map.get(name) {
            return Some(*id);
        }
        let id = AtomId(self.atoms.len().try_into().ok()?);
        let atom = Arc::<str>::from(name);
        self.atoms.push(Arc::clone(&atom));
        self.map.insert(atom, id);
        Some(id)
    }

    /// Panics on an id from another table; ids never leave their token stream.
    pub fn resolve(&self, id: AtomId) -> &str {
        &self.atoms[id.0 as usize]
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.atoms.len()
    }
}
