//! Part-union selectors.

use crate::id::PartId;

/// A predicate over mesh parts, built as an ordered union.
///
/// The probe system aggregates every probe part into one selector so
/// the owning simulation can exclude probe-only entities from physics
/// computation (e.g. by subtracting this selector from its
/// active-physics selector).
///
/// # Examples
///
/// ```
/// use sonde_mesh::{PartId, Selector};
///
/// let sel = Selector::union_of([PartId(3), PartId(7), PartId(3)]);
/// assert_eq!(sel.parts(), &[PartId(3), PartId(7)]);
/// assert!(sel.contains(PartId(7)));
/// assert!(!sel.contains(PartId(4)));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector {
    parts: Vec<PartId>,
}

impl Selector {
    /// Create a selector matching no parts.
    pub fn empty() -> Self {
        Self { parts: Vec::new() }
    }

    /// Build the union of the given parts.
    ///
    /// Duplicates are dropped; first-seen order is preserved.
    pub fn union_of<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = PartId>,
    {
        let mut sel = Self::empty();
        for part in parts {
            sel.insert(part);
        }
        sel
    }

    /// Add a part to the union. Re-adding an existing part is a no-op.
    pub fn insert(&mut self, part: PartId) {
        if !self.parts.contains(&part) {
            self.parts.push(part);
        }
    }

    /// Whether the selector matches the given part.
    pub fn contains(&self, part: PartId) -> bool {
        self.parts.contains(&part)
    }

    /// The selected parts, in insertion order.
    pub fn parts(&self) -> &[PartId] {
        &self.parts
    }

    /// Number of selected parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the selector matches no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}
