//! Debug drawing primitives and system
//!
//! [`DrawSurface`] is the seam to whatever actually puts pixels on screen.
//! [`DebugDrawSystem`] is a recording surface: it keeps temporary shapes
//! (which expire after a duration) and persistent shapes (which remain until
//! explicitly removed), and can replay them onto a real surface.

use std::collections::HashMap;

use crate::foundation::math::{Vec2, Vec4};

/// Unique identifier for persistent debug shapes
pub type DebugShapeId = String;

/// Drawing backend used by collider gizmos and debug overlays
///
/// Coordinates are world-space pixels, +y down.
pub trait DrawSurface {
    /// Line segment from `start` to `end`
    fn draw_line(&mut self, start: Vec2, end: Vec2, color: Vec4);

    /// Rectangle outline with its top-left corner at `top_left`
    fn draw_rect(&mut self, top_left: Vec2, size: Vec2, color: Vec4);

    /// Circle outline
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Vec4);

    /// Text label anchored at `position`
    fn draw_text(&mut self, position: Vec2, text: &str, color: Vec4);
}

/// Debug shape primitives that can be rendered for visualization
#[derive(Clone, Debug, PartialEq)]
pub enum DebugShape {
    /// Line segment from start to end
    Line {
        /// Segment start
        start: Vec2,
        /// Segment end
        end: Vec2,
        /// RGBA color
        color: Vec4,
        /// Seconds left before the shape expires
        duration: f32,
    },

    /// Axis-aligned rectangle
    Rect {
        /// Top-left corner
        top_left: Vec2,
        /// Width and height
        size: Vec2,
        /// RGBA color
        color: Vec4,
        /// Seconds left before the shape expires
        duration: f32,
    },

    /// Circle at center with radius
    Circle {
        /// Center point
        center: Vec2,
        /// Radius
        radius: f32,
        /// RGBA color
        color: Vec4,
        /// Seconds left before the shape expires
        duration: f32,
    },

    /// Text label
    Text {
        /// Anchor point
        position: Vec2,
        /// Label contents
        text: String,
        /// RGBA color
        color: Vec4,
        /// Seconds left before the shape expires
        duration: f32,
    },
}

impl DebugShape {
    /// Get remaining duration
    pub fn duration(&self) -> f32 {
        match self {
            DebugShape::Line { duration, .. }
            | DebugShape::Rect { duration, .. }
            | DebugShape::Circle { duration, .. }
            | DebugShape::Text { duration, .. } => *duration,
        }
    }

    /// Set duration (returns modified shape)
    pub fn with_duration(mut self, new_duration: f32) -> Self {
        match &mut self {
            DebugShape::Line { duration, .. }
            | DebugShape::Rect { duration, .. }
            | DebugShape::Circle { duration, .. }
            | DebugShape::Text { duration, .. } => *duration = new_duration,
        }
        self
    }

    /// Decrease duration by delta_time, returns true if expired
    pub fn tick(&mut self, delta_time: f32) -> bool {
        match self {
            DebugShape::Line { duration, .. }
            | DebugShape::Rect { duration, .. }
            | DebugShape::Circle { duration, .. }
            | DebugShape::Text { duration, .. } => {
                *duration -= delta_time;
                *duration <= 0.0
            }
        }
    }

    /// Draw this shape onto a surface
    pub fn draw_on(&self, surface: &mut dyn DrawSurface) {
        match self {
            DebugShape::Line { start, end, color, .. } => surface.draw_line(*start, *end, *color),
            DebugShape::Rect { top_left, size, color, .. } => surface.draw_rect(*top_left, *size, *color),
            DebugShape::Circle { center, radius, color, .. } => surface.draw_circle(*center, *radius, *color),
            DebugShape::Text { position, text, color, .. } => surface.draw_text(*position, text, *color),
        }
    }
}

/// Debug drawing system for recording debug shapes
///
/// Shapes drawn through the [`DrawSurface`] impl live until the next
/// [`update`](DebugDrawSystem::update).
pub struct DebugDrawSystem {
    /// Temporary shapes that expire after their duration
    temporary_shapes: Vec<DebugShape>,

    /// Persistent shapes that remain until manually removed
    persistent_shapes: HashMap<DebugShapeId, DebugShape>,

    /// Master enable/disable flag
    pub enabled: bool,
}

impl DebugDrawSystem {
    /// Create a new debug draw system
    pub fn new() -> Self {
        Self {
            temporary_shapes: Vec::new(),
            persistent_shapes: HashMap::new(),
            enabled: true,
        }
    }

    /// Record a temporary shape
    pub fn draw(&mut self, shape: DebugShape) {
        if !self.enabled {
            return;
        }
        self.temporary_shapes.push(shape);
    }

    /// Draw a line segment (temporary)
    pub fn draw_line_for(&mut self, start: Vec2, end: Vec2, color: Vec4, duration: f32) {
        self.draw(DebugShape::Line { start, end, color, duration });
    }

    /// Draw a circle (temporary)
    pub fn draw_circle_for(&mut self, center: Vec2, radius: f32, color: Vec4, duration: f32) {
        self.draw(DebugShape::Circle { center, radius, color, duration });
    }

    /// Draw a rectangle (temporary)
    pub fn draw_rect_for(&mut self, top_left: Vec2, size: Vec2, color: Vec4, duration: f32) {
        self.draw(DebugShape::Rect { top_left, size, color, duration });
    }

    /// Draw a persistent shape that remains until explicitly removed
    pub fn draw_persistent(&mut self, id: impl Into<String>, shape: DebugShape) {
        if !self.enabled {
            return;
        }

        self.persistent_shapes.insert(id.into(), shape);
    }

    /// Remove a persistent shape
    pub fn clear_persistent(&mut self, id: &str) {
        self.persistent_shapes.remove(id);
    }

    /// Update shape lifetimes and remove expired temporary shapes
    pub fn update(&mut self, delta_time: f32) {
        if !self.enabled {
            return;
        }

        self.temporary_shapes.retain_mut(|shape| !shape.tick(delta_time));
    }

    /// Get all shapes for rendering (both temporary and persistent)
    pub fn get_shapes(&self) -> Vec<&DebugShape> {
        if !self.enabled {
            return Vec::new();
        }

        self.temporary_shapes.iter()
            .chain(self.persistent_shapes.values())
            .collect()
    }

    /// Replay every recorded shape onto a real surface
    pub fn replay(&self, surface: &mut dyn DrawSurface) {
        for shape in self.get_shapes() {
            shape.draw_on(surface);
        }
    }

    /// Get the number of active shapes
    pub fn shape_count(&self) -> usize {
        self.temporary_shapes.len() + self.persistent_shapes.len()
    }

    /// Clear all shapes (temporary and persistent)
    pub fn clear(&mut self) {
        self.temporary_shapes.clear();
        self.persistent_shapes.clear();
    }
}

impl Default for DebugDrawSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawSurface for DebugDrawSystem {
    fn draw_line(&mut self, start: Vec2, end: Vec2, color: Vec4) {
        self.draw_line_for(start, end, color, 0.0);
    }

    fn draw_rect(&mut self, top_left: Vec2, size: Vec2, color: Vec4) {
        self.draw_rect_for(top_left, size, color, 0.0);
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Vec4) {
        self.draw_circle_for(center, radius, color, 0.0);
    }

    fn draw_text(&mut self, position: Vec2, text: &str, color: Vec4) {
        self.draw(DebugShape::Text {
            position,
            text: text.to_string(),
            color,
            duration: 0.0,
        });
    }
}
