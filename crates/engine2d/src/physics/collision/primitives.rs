//! World-space collision primitives and pairwise narrow-phase tests
//!
//! All tests here are pure functions of world-space geometry. They report
//! overlap only and never move anything.

use crate::foundation::math::Vec2;

/// Result of a pairwise collider query
///
/// The normal points from the first operand toward the second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    /// Whether the two shapes overlap
    pub is_colliding: bool,
    /// Unit separation normal (zero when not colliding)
    pub normal: Vec2,
    /// Overlap depth along the normal (zero when not colliding)
    pub penetration_depth: f32,
    /// Representative contact point in world space
    pub contact_point: Vec2,
}

impl CollisionInfo {
    /// A non-colliding result
    pub fn none() -> Self {
        Self {
            is_colliding: false,
            normal: Vec2::zeros(),
            penetration_depth: 0.0,
            contact_point: Vec2::zeros(),
        }
    }

    fn hit(normal: Vec2, penetration_depth: f32, contact_point: Vec2) -> Self {
        Self {
            is_colliding: true,
            normal,
            penetration_depth,
            contact_point,
        }
    }

    /// Same result seen from the other operand
    pub fn flipped(mut self) -> Self {
        self.normal = -self.normal;
        self
    }
}

impl Default for CollisionInfo {
    fn default() -> Self {
        Self::none()
    }
}

/// Axis-aligned box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBox {
    /// Center of the box
    pub center: Vec2,
    /// Full width and height
    pub size: Vec2,
}

impl WorldBox {
    /// Creates a new box from center and full size
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    /// Half of the size on each axis
    pub fn half_size(&self) -> Vec2 {
        self.size * 0.5
    }

    /// Top-left corner (minimum x and y)
    pub fn min(&self) -> Vec2 {
        self.center - self.half_size()
    }

    /// Inclusive point containment
    pub fn contains_point(&self, point: &Vec2) -> bool {
        let half = self.half_size();
        point.x >= self.center.x - half.x
            && point.x <= self.center.x + half.x
            && point.y >= self.center.y - half.y
            && point.y <= self.center.y + half.y
    }
}

/// Circle in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldCircle {
    /// Center of the circle
    pub center: Vec2,
    /// Radius of the circle
    pub radius: f32,
}

impl WorldCircle {
    /// Creates a new circle
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Inclusive point containment
    pub fn contains_point(&self, point: &Vec2) -> bool {
        (point - self.center).magnitude_squared() <= self.radius * self.radius
    }
}

fn sign(value: f32) -> f32 {
    if value > 0.0 { 1.0 } else { -1.0 }
}

/// Box vs box, separating along the axis of least overlap
///
/// Ties (`overlap.x == overlap.y`) resolve on the Y axis.
pub fn box_box(a: &WorldBox, b: &WorldBox) -> CollisionInfo {
    let half_a = a.half_size();
    let half_b = b.half_size();

    let delta = b.center - a.center;
    let overlap = (half_a + half_b) - delta.abs();

    if overlap.x <= 0.0 || overlap.y <= 0.0 {
        return CollisionInfo::none();
    }

    if overlap.x < overlap.y {
        let normal = Vec2::new(sign(delta.x), 0.0);
        let contact = a.center + Vec2::new(half_a.x * normal.x, 0.0);
        CollisionInfo::hit(normal, overlap.x, contact)
    } else {
        let normal = Vec2::new(0.0, sign(delta.y));
        let contact = a.center + Vec2::new(0.0, half_a.y * normal.y);
        CollisionInfo::hit(normal, overlap.y, contact)
    }
}

/// Box vs circle using the closest point on the box
pub fn box_circle(a: &WorldBox, b: &WorldCircle) -> CollisionInfo {
    let half = a.half_size();
    let delta = b.center - a.center;

    let clamped = Vec2::new(
        delta.x.clamp(-half.x, half.x),
        delta.y.clamp(-half.y, half.y),
    );
    let closest = a.center + clamped;
    let offset = b.center - closest;

    let distance_squared = offset.magnitude_squared();
    if distance_squared >= b.radius * b.radius {
        return CollisionInfo::none();
    }

    let distance = distance_squared.sqrt();
    if distance > 0.0 {
        CollisionInfo::hit(offset / distance, b.radius - distance, closest)
    } else {
        // Circle center inside the box
        CollisionInfo::hit(Vec2::new(1.0, 0.0), b.radius, a.center)
    }
}

/// Circle vs box, mirrored from [`box_circle`]
pub fn circle_box(a: &WorldCircle, b: &WorldBox) -> CollisionInfo {
    box_circle(b, a).flipped()
}

/// Circle vs circle
pub fn circle_circle(a: &WorldCircle, b: &WorldCircle) -> CollisionInfo {
    let delta = b.center - a.center;
    let distance = delta.magnitude();
    let total_radius = a.radius + b.radius;

    if distance >= total_radius {
        return CollisionInfo::none();
    }

    let depth = total_radius - distance;
    if distance > 0.0 {
        let normal = delta / distance;
        CollisionInfo::hit(normal, depth, a.center + normal * a.radius)
    } else {
        CollisionInfo::hit(Vec2::new(1.0, 0.0), depth, a.center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(x: f32, y: f32, side: f32) -> WorldBox {
        WorldBox::new(Vec2::new(x, y), Vec2::new(side, side))
    }

    #[test]
    fn test_box_box_overlap_on_x() {
        let info = box_box(&square(0.0, 0.0, 2.0), &square(1.0, 0.0, 2.0));

        assert!(info.is_colliding);
        assert_relative_eq!(info.penetration_depth, 1.0);
        assert_eq!(info.normal, Vec2::new(1.0, 0.0));
        assert_eq!(info.contact_point, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_box_box_normal_follows_delta_sign() {
        let info = box_box(&square(1.0, 0.0, 2.0), &square(0.0, 0.0, 2.0));

        assert!(info.is_colliding);
        assert_eq!(info.normal, Vec2::new(-1.0, 0.0));
        assert_eq!(info.contact_point, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn test_box_box_tie_resolves_on_y() {
        let info = box_box(&square(0.0, 0.0, 2.0), &square(1.0, 1.0, 2.0));

        assert!(info.is_colliding);
        assert_eq!(info.normal, Vec2::new(0.0, 1.0));
        assert_relative_eq!(info.penetration_depth, 1.0);
    }

    #[test]
    fn test_box_box_touching_edges_do_not_collide() {
        let info = box_box(&square(0.0, 0.0, 2.0), &square(2.0, 0.0, 2.0));
        assert!(!info.is_colliding);
        assert_eq!(info, CollisionInfo::none());
    }

    #[test]
    fn test_box_box_coincident_centers_pick_negative_y() {
        let info = box_box(&square(0.0, 0.0, 2.0), &square(0.0, 0.0, 2.0));

        assert!(info.is_colliding);
        assert_eq!(info.normal, Vec2::new(0.0, -1.0));
        assert_relative_eq!(info.penetration_depth, 2.0);
    }

    #[test]
    fn test_circle_circle_overlap() {
        let a = WorldCircle::new(Vec2::new(0.0, 0.0), 1.0);
        let b = WorldCircle::new(Vec2::new(1.5, 0.0), 1.0);
        let info = circle_circle(&a, &b);

        assert!(info.is_colliding);
        assert_relative_eq!(info.penetration_depth, 0.5);
        assert_relative_eq!(info.normal, Vec2::new(1.0, 0.0));
        assert_relative_eq!(info.contact_point, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_circle_circle_coincident_centers() {
        let a = WorldCircle::new(Vec2::new(2.0, 3.0), 1.0);
        let b = WorldCircle::new(Vec2::new(2.0, 3.0), 0.5);
        let info = circle_circle(&a, &b);

        assert!(info.is_colliding);
        assert_eq!(info.normal, Vec2::new(1.0, 0.0));
        assert_eq!(info.contact_point, Vec2::new(2.0, 3.0));
        assert_relative_eq!(info.penetration_depth, 1.5);
    }

    #[test]
    fn test_circle_circle_separated() {
        let a = WorldCircle::new(Vec2::new(0.0, 0.0), 1.0);
        let b = WorldCircle::new(Vec2::new(2.0, 0.0), 1.0);
        assert!(!circle_circle(&a, &b).is_colliding);
    }

    #[test]
    fn test_box_circle_separated() {
        let info = box_circle(&square(0.0, 0.0, 2.0), &WorldCircle::new(Vec2::new(3.0, 0.0), 0.5));
        assert!(!info.is_colliding);
    }

    #[test]
    fn test_box_circle_edge_contact() {
        let info = box_circle(&square(0.0, 0.0, 2.0), &WorldCircle::new(Vec2::new(1.5, 0.0), 1.0));

        assert!(info.is_colliding);
        assert_relative_eq!(info.normal, Vec2::new(1.0, 0.0));
        assert_relative_eq!(info.penetration_depth, 0.5);
        assert_relative_eq!(info.contact_point, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_box_circle_center_inside_box() {
        let info = box_circle(&square(0.0, 0.0, 4.0), &WorldCircle::new(Vec2::new(0.5, 0.5), 0.75));

        assert!(info.is_colliding);
        assert_eq!(info.normal, Vec2::new(1.0, 0.0));
        assert_relative_eq!(info.penetration_depth, 0.75);
        assert_eq!(info.contact_point, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn test_circle_box_mirrors_box_circle() {
        let boxed = square(0.0, 0.0, 2.0);
        let circle = WorldCircle::new(Vec2::new(1.2, 0.9), 0.5);

        let forward = box_circle(&boxed, &circle);
        let reverse = circle_box(&circle, &boxed);

        assert!(forward.is_colliding && reverse.is_colliding);
        assert_relative_eq!(reverse.normal, -forward.normal);
        assert_relative_eq!(reverse.penetration_depth, forward.penetration_depth);
        assert_relative_eq!(reverse.contact_point, forward.contact_point);
    }

    #[test]
    fn test_contains_point_is_inclusive() {
        let boxed = square(0.0, 0.0, 2.0);
        assert!(boxed.contains_point(&Vec2::new(1.0, -1.0)));
        assert!(!boxed.contains_point(&Vec2::new(1.01, 0.0)));

        let circle = WorldCircle::new(Vec2::zeros(), 1.0);
        assert!(circle.contains_point(&Vec2::new(0.0, 1.0)));
        assert!(!circle.contains_point(&Vec2::new(0.8, 0.8)));
    }
}
