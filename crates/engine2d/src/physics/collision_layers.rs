//! Collision layer masks for filtering collider queries
//!
//! Entities carry an integer `layer`; [`CollisionLayers::bit`] turns it into a
//! mask bit so pairs can be filtered before the narrow phase runs.

/// Collision layer definitions as bit masks
pub struct CollisionLayers;

impl CollisionLayers {
    /// No collision layer
    pub const NONE: u32 = 0;

    /// All collision layers
    pub const ALL: u32 = 0xFFFF_FFFF;

    /// Entities that never set a layer
    pub const DEFAULT: u32 = 1 << 0;

    /// Trigger volumes (no physical response)
    pub const TRIGGER: u32 = 1 << 1;

    /// Static level geometry
    pub const ENVIRONMENT: u32 = 1 << 2;

    /// Player-controlled entities
    pub const PLAYER: u32 = 1 << 3;

    /// Enemies
    pub const ENEMY: u32 = 1 << 4;

    /// Projectiles
    pub const PROJECTILE: u32 = 1 << 5;

    /// Mask bit for an entity layer index
    ///
    /// Indices outside `0..32` have no bit and collide with nothing.
    pub fn bit(layer: i32) -> u32 {
        match u32::try_from(layer) {
            Ok(index) if index < 32 => 1 << index,
            _ => Self::NONE,
        }
    }

    /// Check if two entities should collide based on their layers and masks
    ///
    /// A's layer must be in B's mask and B's layer must be in A's mask.
    pub fn should_collide(layer_a: u32, mask_a: u32, layer_b: u32, mask_b: u32) -> bool {
        (layer_a & mask_b) != 0 && (layer_b & mask_a) != 0
    }

    /// Helper to create a mask from multiple layers
    pub fn mask(layers: &[u32]) -> u32 {
        layers.iter().fold(0, |acc, &layer| acc | layer)
    }
}
