//! Entity trait: a record whose identity outlives changes to its state.
//!
//! An account keeps its number while its balance and lock flag move; stores
//! key entities by [`Entity::id`].

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier (used as a map key and in log fields).
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Whether `other` is the same entity, regardless of its current state.
    fn same_identity(&self, other: &Self) -> bool
    where
        Self: Sized,
    {
        self.id() == other.id()
    }
}
