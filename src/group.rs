//! Sibling groups: paintings that share the "one ripple at a time" rule.

use crate::painting::{Painting, RippleState};

/// A fixed set of paintings, addressed by slot.
#[derive(Debug, Clone, Default)]
pub struct PaintingGroup {
    name: String,
    paintings: Vec<Painting>,
}

impl PaintingGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), paintings: Vec::new() }
    }

    /// Append a painting; its slot is the number of paintings before it.
    pub fn with_painting(mut self, painting: Painting) -> Self {
        self.paintings.push(painting);
        self
    }

    pub fn push(&mut self, painting: Painting) -> usize {
        self.paintings.push(painting);
        self.paintings.len() - 1
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.paintings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.paintings.is_empty()
    }

    #[inline]
    pub fn get(&self, slot: usize) -> Option<&Painting> {
        self.paintings.get(slot)
    }

    #[inline]
    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Painting> {
        self.paintings.get_mut(slot)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Painting> {
        self.paintings.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Painting> {
        self.paintings.iter_mut()
    }

    /// Stop every painting whose id differs from `id`.
    ///
    /// Only the state is touched; presets, timers and origins stay as they
    /// were. Matching is by painting id, not by slot.
    pub fn stop_others(&mut self, id: i16) {
        for painting in self.paintings.iter_mut().filter(|p| p.id != id) {
            painting.state = RippleState::Idle;
        }
    }

    /// Number of paintings currently rippling.
    pub fn rippling_count(&self) -> usize {
        self.paintings.iter().filter(|p| p.is_rippling()).count()
    }
}
