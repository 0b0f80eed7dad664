//! Entity trait: a stored row whose identity outlives its state changes.

/// Anything persisted under an opaque, immutable identifier.
///
/// Stores key rows by this id; secondary lookups (e.g. by product) resolve to it.
pub trait Entity {
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Identifier assigned at creation; never reassigned.
    fn id(&self) -> Self::Id;
}
