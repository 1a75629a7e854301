//! Variable environment: case-insensitive name → number store.
//!
//! Names are interned into [`Slot`]s when code is compiled so the hot
//! per-point loop indexes a vector instead of hashing strings. Reading a name
//! or slot that was never assigned yields `0.0`.

use std::collections::HashMap;

/// Index of an interned variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot(u32);

impl Slot {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Default)]
pub struct Environment {
    slots: HashMap<String, Slot>,
    names: Vec<String>,
    values: Vec<Option<f64>>,
}

fn fold(name: &str) -> String {
    name.to_lowercase()
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the slot for `name`, creating an unbound one if needed.
    pub fn intern(&mut self, name: &str) -> Slot {
        let key = fold(name);
        if let Some(&slot) = self.slots.get(&key) {
            return slot;
        }
        let slot = Slot(self.values.len() as u32);
        self.names.push(key.clone());
        self.values.push(None);
        self.slots.insert(key, slot);
        slot
    }

    /// Look up an existing slot without creating one.
    pub fn resolve(&self, name: &str) -> Option<Slot> {
        self.slots.get(&fold(name)).copied()
    }

    pub fn get(&self, slot: Slot) -> f64 {
        self.values
            .get(slot.index())
            .copied()
            .flatten()
            .unwrap_or(0.0)
    }

    pub fn set(&mut self, slot: Slot, value: f64) {
        if let Some(v) = self.values.get_mut(slot.index()) {
            *v = Some(value);
        }
    }

    /// Whether the slot has ever been assigned.
    pub fn is_bound(&self, slot: Slot) -> bool {
        matches!(self.values.get(slot.index()), Some(Some(_)))
    }

    /// The value of `name`, or `None` if it was never assigned.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.resolve(name)
            .and_then(|slot| self.values.get(slot.index()).copied().flatten())
    }

    /// The value of `name`, `0.0` when unbound.
    pub fn get_named(&self, name: &str) -> f64 {
        self.value(name).unwrap_or(0.0)
    }

    pub fn set_named(&mut self, name: &str, value: f64) {
        let slot = self.intern(name);
        self.set(slot, value);
    }

    /// Bound variables as `(lower-cased name, value)` pairs, in interning order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.names
            .iter()
            .zip(self.values.iter())
            .filter_map(|(name, value)| value.map(|v| (name.as_str(), v)))
    }

    /// Number of bound variables.
    pub fn len(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbound_reads_zero() {
        let mut env = Environment::new();
        assert_eq!(env.get_named("foo"), 0.0);
        let slot = env.intern("foo");
        assert_eq!(env.get(slot), 0.0);
        assert!(!env.is_bound(slot));
        assert_eq!(env.value("foo"), None);
    }

    #[test]
    fn names_fold_case() {
        let mut env = Environment::new();
        env.set_named("Red", 0.5);
        assert_eq!(env.get_named("RED"), 0.5);
        assert_eq!(env.intern("red"), env.intern("rEd"));
        env.set_named("$PI", 3.0);
        assert_eq!(env.get_named("$pi"), 3.0);
    }

    #[test]
    fn slot_and_name_access_agree() {
        let mut env = Environment::new();
        let x = env.intern("x");
        env.set(x, 2.5);
        assert_eq!(env.get_named("X"), 2.5);
        env.set_named("x", -1.0);
        assert_eq!(env.get(x), -1.0);
        assert!(env.is_bound(x));
    }

    #[test]
    fn len_counts_only_bound() {
        let mut env = Environment::new();
        env.intern("a");
        env.intern("b");
        env.set_named("c", 1.0);
        assert_eq!(env.len(), 1);
        assert_eq!(env.iter().collect::<Vec<_>>(), vec![("c", 1.0)]);
    }
}
