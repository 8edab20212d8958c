//! Rapier world holding the static hull and the robot body.
//!
//! Design notes
//! - Deterministic: panels are inserted sorted by `id`, and contact reports are sorted
//!   by collider handle.
//! - The hull is immutable after [`HullWorld::build`]. Only the robot body moves.
//! - The robot body is dynamic with locked rotations: contacts push it, but only the
//!   controller turns it.

use std::collections::HashMap;

use crawler::{ContactSample, Quat, Vec3};
use rapier3d::prelude::*;

use crate::hull::{HullPanel, collider_from_panel};

/// Friction of the robot's tracks.
pub const ROBOT_FRICTION: f32 = 0.6;

/// Linear damping of the robot body; keeps magnet-driven settling short.
pub const ROBOT_LINEAR_DAMPING: f32 = 2.0;

/// Handles of the robot's rigid body and its collider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RobotHandles {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
}

/// Contacts of one collider the robot is touching.
#[derive(Clone, Debug, PartialEq)]
pub struct TouchedSurface {
    pub collider: ColliderHandle,
    /// Hull panel id, if the collider belongs to a panel.
    pub panel: Option<u32>,
    /// Samples with normals pointing from the surface toward the robot.
    pub samples: Vec<ContactSample>,
}

pub struct HullWorld {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub islands: IslandManager,
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
    pub impulse_joints: ImpulseJointSet,
    pub multibody_joints: MultibodyJointSet,
    pub ccd: CCDSolver,
    pipeline: PhysicsPipeline,
    params: IntegrationParameters,
    gravity: Vector<f32>,
    panels: HashMap<ColliderHandle, u32>,
}

impl HullWorld {
    /// Build a world from hull panels, stepping at a fixed `dt`.
    pub fn build(mut panels: Vec<HullPanel>, gravity: Vec3, dt: f32) -> Self {
        panels.sort_by_key(|p| p.id);

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let mut panel_ids = HashMap::with_capacity(panels.len());

        for panel in &panels {
            let rb = RigidBodyBuilder::fixed().pose(panel.pose()).build();
            let rb_handle = bodies.insert(rb);
            let handle =
                colliders.insert_with_parent(collider_from_panel(panel), rb_handle, &mut bodies);
            panel_ids.insert(handle, panel.id);
        }

        let params = IntegrationParameters {
            dt,
            ..IntegrationParameters::default()
        };

        log::debug!("Hull world built with {} panels", panels.len());

        Self {
            bodies,
            colliders,
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            pipeline: PhysicsPipeline::new(),
            params,
            gravity,
            panels: panel_ids,
        }
    }

    #[inline]
    pub fn dt(&self) -> f32 {
        self.params.dt
    }

    /// Insert the robot as a box with the given half-extents.
    ///
    /// `collider_rotation` is the box's rotation relative to the body. Passing the mesh
    /// offset keeps the box in the robot's logical frame while the body carries the
    /// asset-corrected rotation.
    pub fn spawn_robot(
        &mut self,
        position: Vec3,
        rotation: Quat,
        half_extents: Vec3,
        collider_rotation: Quat,
    ) -> RobotHandles {
        let rb = RigidBodyBuilder::dynamic()
            .pose(Isometry::from_parts(position.into(), rotation))
            .lock_rotations()
            .linear_damping(ROBOT_LINEAR_DAMPING)
            .ccd_enabled(true)
            .build();
        let body = self.bodies.insert(rb);
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .position(Isometry::from_parts(Vec3::zeros().into(), collider_rotation))
            .friction(ROBOT_FRICTION)
            .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);
        RobotHandles { body, collider }
    }

    #[inline]
    pub fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    #[inline]
    pub fn body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    #[inline]
    pub fn panel_id(&self, collider: ColliderHandle) -> Option<u32> {
        self.panels.get(&collider).copied()
    }

    /// Advance the simulation by one fixed step.
    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            &(),
            &(),
        );
    }

    /// Everything `collider` touched during the last step, sorted by collider handle.
    pub fn touched_surfaces(&self, collider: ColliderHandle) -> Vec<TouchedSurface> {
        let mut touched: Vec<TouchedSurface> = self
            .narrow_phase
            .contact_pairs_with(collider)
            .filter(|pair| pair.has_any_active_contact)
            .filter_map(|pair| {
                let (other, flip) = if pair.collider1 == collider {
                    (pair.collider2, true)
                } else {
                    (pair.collider1, false)
                };
                let samples = self.pair_samples(pair, flip);
                (!samples.is_empty()).then(|| TouchedSurface {
                    collider: other,
                    panel: self.panel_id(other),
                    samples,
                })
            })
            .collect();
        touched.sort_by_key(|t| t.collider.into_raw_parts());
        touched
    }

    /// Convert a contact pair into samples. Manifold normals point from collider1 to
    /// collider2; `flip` turns them around when the robot is collider1.
    fn pair_samples(&self, pair: &ContactPair, flip: bool) -> Vec<ContactSample> {
        let mut samples = Vec::new();
        for manifold in &pair.manifolds {
            if manifold.points.is_empty() {
                continue;
            }
            let normal = if flip {
                -manifold.data.normal
            } else {
                manifold.data.normal
            };
            if manifold.data.solver_contacts.is_empty() {
                let Some(point) = self.manifold_point(pair.collider1, manifold) else {
                    continue;
                };
                samples.push(ContactSample::new(point, normal));
            } else {
                samples.extend(
                    manifold
                        .data
                        .solver_contacts
                        .iter()
                        .map(|c| ContactSample::new(c.point.coords, normal)),
                );
            }
        }
        samples
    }

    /// World-space position of a manifold's first tracked point.
    fn manifold_point(
        &self,
        collider1: ColliderHandle,
        manifold: &ContactManifold,
    ) -> Option<Vec3> {
        let first = manifold.points.first()?;
        let pose = self.colliders.get(collider1)?.position();
        Some((pose * first.local_p1).coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hull::demo_compartment;

    fn floor_world() -> HullWorld {
        HullWorld::build(
            demo_compartment(Vec3::new(3.0, 2.0, 3.0)),
            Vec3::new(0.0, -9.81, 0.0),
            1.0 / 50.0,
        )
    }

    #[test]
    fn panels_are_registered_by_id() {
        let world = floor_world();
        let mut ids: Vec<u32> = world.panels.values().copied().collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(world.dt(), 1.0 / 50.0);
    }

    #[test]
    fn resting_robot_reports_the_floor_normal() {
        let mut world = floor_world();
        let robot = world.spawn_robot(
            Vec3::new(0.0, 0.2, 0.0),
            Quat::identity(),
            Vec3::new(0.4, 0.15, 0.5),
            Quat::identity(),
        );
        for _ in 0..50 {
            world.step();
        }

        let touched = world.touched_surfaces(robot.collider);
        assert_eq!(touched.len(), 1, "{touched:?}");
        assert_eq!(touched[0].panel, Some(1));
        for sample in &touched[0].samples {
            assert!((sample.normal - Vec3::new(0.0, 1.0, 0.0)).norm() < 1.0e-3);
        }
    }

    #[test]
    fn airborne_robot_touches_nothing() {
        let mut world = HullWorld::build(Vec::new(), Vec3::zeros(), 1.0 / 50.0);
        let robot = world.spawn_robot(
            Vec3::zeros(),
            Quat::identity(),
            Vec3::new(0.4, 0.15, 0.5),
            Quat::identity(),
        );
        world.step();
        assert!(world.touched_surfaces(robot.collider).is_empty());
    }
}
