//! Collider shape abstractions
//!
//! Shapes are stored in model space on the collider and converted to world
//! space on demand, using the owner's world position and lossy scale at the
//! moment of the query.

use crate::foundation::math::Vec2;
use super::primitives::{self, CollisionInfo, WorldBox, WorldCircle};

/// Collider shape in model space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionShape {
    /// Axis-aligned box with full width and height
    Box(Vec2),
    /// Circle with the given radius
    Circle(f32),
}

impl CollisionShape {
    /// Box shape from a full size
    pub fn rect(size: Vec2) -> Self {
        Self::Box(size)
    }

    /// Circle shape, radius clamped to be non-negative
    pub fn circle(radius: f32) -> Self {
        Self::Circle(radius.max(0.0))
    }

    /// Transform into world space
    ///
    /// Box sizes scale per axis. Circle radii scale by the larger scale
    /// magnitude so a non-uniformly scaled circle stays a circle.
    pub fn to_world_space(&self, center: Vec2, lossy_scale: Vec2) -> WorldSpaceShape {
        match *self {
            Self::Box(size) => {
                let world_size = Vec2::new(size.x * lossy_scale.x.abs(), size.y * lossy_scale.y.abs());
                WorldSpaceShape::Box(WorldBox::new(center, world_size))
            }
            Self::Circle(radius) => {
                let scale = lossy_scale.x.abs().max(lossy_scale.y.abs());
                WorldSpaceShape::Circle(WorldCircle::new(center, radius * scale))
            }
        }
    }
}

/// Collider shape resolved into world space, ready for the pairwise tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldSpaceShape {
    /// World-space box
    Box(WorldBox),
    /// World-space circle
    Circle(WorldCircle),
}

impl WorldSpaceShape {
    /// Get center position
    pub fn center(&self) -> Vec2 {
        match self {
            Self::Box(shape) => shape.center,
            Self::Circle(shape) => shape.center,
        }
    }

    /// Inclusive point containment
    pub fn contains_point(&self, point: &Vec2) -> bool {
        match self {
            Self::Box(shape) => shape.contains_point(point),
            Self::Circle(shape) => shape.contains_point(point),
        }
    }

    /// Narrow-phase test against another shape; the normal points toward `other`
    pub fn collide(&self, other: &WorldSpaceShape) -> CollisionInfo {
        match (self, other) {
            (Self::Box(a), Self::Box(b)) => primitives::box_box(a, b),
            (Self::Box(a), Self::Circle(b)) => primitives::box_circle(a, b),
            (Self::Circle(a), Self::Box(b)) => primitives::circle_box(a, b),
            (Self::Circle(a), Self::Circle(b)) => primitives::circle_circle(a, b),
        }
    }
}
