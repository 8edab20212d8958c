//! Static hull geometry: panel definitions and their Rapier colliders.
//!
//! Panels are immutable after the world is built. Everything the robot can crawl on
//! (deck plates, bulkheads, overheads, pipes) is a panel.

use crawler::{Quat, Vec3};
use rapier3d::prelude::*;

/// Friction of bare hull steel against the robot's tracks.
pub const HULL_FRICTION: f32 = 0.8;

/// Thickness of the plates of the demo compartment (meters).
pub const PLATE_THICKNESS: f32 = 0.2;

/// One immutable hull panel.
#[derive(Clone, Debug)]
pub struct HullPanel {
    /// Stable identifier; panels are inserted in ascending `id` order.
    pub id: u32,
    /// World-space translation.
    pub translation: Vec3,
    /// World-space rotation.
    pub rotation: Quat,
    pub shape: PanelShape,
}

/// Supported panel shapes.
#[derive(Clone, Debug)]
pub enum PanelShape {
    /// Infinite plane (half-space) with normal `rotation * +Y`.
    ///
    /// The plane passes through the translation, shifted by `offset_along_normal`.
    Plane { offset_along_normal: f32 },

    /// Oriented plate with the given half-extents (meters).
    Plate { half_extents: Vec3 },

    /// Plate with rounded edges; `border_radius` rounds all edges and corners.
    RoundPlate { half_extents: Vec3, border_radius: f32 },

    /// Y-aligned pipe (meters).
    Pipe { radius: f32, half_height: f32 },
}

impl HullPanel {
    pub fn plate(id: u32, translation: Vec3, half_extents: Vec3) -> Self {
        Self {
            id,
            translation,
            rotation: Quat::identity(),
            shape: PanelShape::Plate { half_extents },
        }
    }

    pub fn round_plate(
        id: u32,
        translation: Vec3,
        half_extents: Vec3,
        border_radius: f32,
    ) -> Self {
        Self {
            id,
            translation,
            rotation: Quat::identity(),
            shape: PanelShape::RoundPlate {
                half_extents,
                border_radius,
            },
        }
    }

    /// A pipe whose axis is `rotation * +Y`.
    pub fn pipe(
        id: u32,
        translation: Vec3,
        rotation: Quat,
        radius: f32,
        half_height: f32,
    ) -> Self {
        Self {
            id,
            translation,
            rotation,
            shape: PanelShape::Pipe {
                radius,
                half_height,
            },
        }
    }

    /// The panel's world pose.
    pub fn pose(&self) -> Isometry<f32> {
        Isometry::from_parts(self.translation.into(), self.rotation)
    }
}

/// Build the Rapier collider of a panel.
///
/// The panel pose lives on the parent fixed body, so the collider has an identity local
/// transform except for planes, which carry their offset.
pub fn collider_from_panel(panel: &HullPanel) -> Collider {
    let builder = match &panel.shape {
        PanelShape::Plane {
            offset_along_normal,
        } => {
            // Local frame: the body already carries the rotation, so the normal is +Y here.
            let halfspace = HalfSpace::new(Vector::y_axis());
            ColliderBuilder::new(SharedShape::new(halfspace))
                .translation(Vector::y() * *offset_along_normal)
        }

        PanelShape::Plate { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }

        PanelShape::RoundPlate {
            half_extents,
            border_radius,
        } => ColliderBuilder::round_cuboid(
            half_extents.x,
            half_extents.y,
            half_extents.z,
            *border_radius,
        ),

        PanelShape::Pipe {
            radius,
            half_height,
        } => ColliderBuilder::cylinder(*half_height, *radius),
    };
    builder.friction(HULL_FRICTION).build()
}

/// A closed box compartment: floor, four bulkheads and an overhead.
///
/// `inner_half_extents` is the free space inside. The floor's top face is at `y = 0`.
pub fn demo_compartment(inner_half_extents: Vec3) -> Vec<HullPanel> {
    let t = PLATE_THICKNESS * 0.5;
    let (hx, hy, hz) = (
        inner_half_extents.x,
        inner_half_extents.y,
        inner_half_extents.z,
    );
    let height = 2.0 * hy;

    vec![
        // Floor and overhead.
        HullPanel::plate(1, Vec3::new(0.0, -t, 0.0), Vec3::new(hx + 2.0 * t, t, hz + 2.0 * t)),
        HullPanel::plate(
            2,
            Vec3::new(0.0, height + t, 0.0),
            Vec3::new(hx + 2.0 * t, t, hz + 2.0 * t),
        ),
        // Bulkheads along +-Z.
        HullPanel::plate(3, Vec3::new(0.0, hy, hz + t), Vec3::new(hx, hy, t)),
        HullPanel::plate(4, Vec3::new(0.0, hy, -hz - t), Vec3::new(hx, hy, t)),
        // Bulkheads along +-X.
        HullPanel::plate(5, Vec3::new(hx + t, hy, 0.0), Vec3::new(t, hy, hz + 2.0 * t)),
        HullPanel::plate(6, Vec3::new(-hx - t, hy, 0.0), Vec3::new(t, hy, hz + 2.0 * t)),
    ]
}
