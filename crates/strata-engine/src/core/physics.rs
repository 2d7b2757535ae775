use std::collections::HashMap;
use std::sync::Mutex;

use glam::{Quat, Vec3};
use hecs::Entity;
use rapier3d::na;
use rapier3d::prelude::*;

use crate::core::time::FixedTimestep;
use crate::ecs::SystemContext;
use crate::extensions::transform::Transform3D;

// ---------------------------------------------------------------------------
// Conversion helpers: glam <-> nalgebra
// ---------------------------------------------------------------------------

pub(crate) fn vec3_to_na(v: Vec3) -> na::Vector3<f32> {
    na::Vector3::new(v.x, v.y, v.z)
}

pub(crate) fn na_to_vec3(v: &na::Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn quat_to_na(q: Quat) -> na::UnitQuaternion<f32> {
    na::UnitQuaternion::new_normalize(na::Quaternion::new(q.w, q.x, q.y, q.z))
}

fn na_to_quat(q: &na::UnitQuaternion<f32>) -> Quat {
    let c = q.coords;
    Quat::from_xyzw(c.x, c.y, c.z, c.w)
}

pub(crate) fn isometry(position: Vec3, rotation: Quat) -> Isometry<f32> {
    Isometry::from_parts(na::Translation3::new(position.x, position.y, position.z), quat_to_na(rotation))
}

fn entity_to_user_data(entity: Entity) -> u128 {
    entity.to_bits().get() as u128
}

fn user_data_to_entity(data: u128) -> Option<Entity> {
    Entity::from_bits(data as u64)
}

// ---------------------------------------------------------------------------
// Layers
// ---------------------------------------------------------------------------

/// Object layer of a body. Static geometry only needs to be tested against
/// things that move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectLayer {
    NonMoving,
    Moving,
}

/// Coarse layer used for broad-phase culling, one per object layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BroadPhaseLayer {
    NonMoving,
    Moving,
}

impl ObjectLayer {
    /// Non-moving collides only with moving; moving collides with everything.
    pub fn should_collide(self, other: ObjectLayer) -> bool {
        match self {
            ObjectLayer::NonMoving => other == ObjectLayer::Moving,
            ObjectLayer::Moving => true,
        }
    }

    pub fn broad_phase_layer(self) -> BroadPhaseLayer {
        match self {
            ObjectLayer::NonMoving => BroadPhaseLayer::NonMoving,
            ObjectLayer::Moving => BroadPhaseLayer::Moving,
        }
    }

    /// Same rule as `should_collide`, against a broad-phase layer.
    pub fn should_collide_broad_phase(self, layer: BroadPhaseLayer) -> bool {
        match self {
            ObjectLayer::NonMoving => layer == BroadPhaseLayer::Moving,
            ObjectLayer::Moving => true,
        }
    }

    /// Rapier collision groups encoding the pair rule.
    pub fn groups(self) -> InteractionGroups {
        match self {
            ObjectLayer::NonMoving => InteractionGroups::new(Group::GROUP_1, Group::GROUP_2),
            ObjectLayer::Moving => InteractionGroups::new(Group::GROUP_2, Group::GROUP_1 | Group::GROUP_2),
        }
    }
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The kind of rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Static,
    Dynamic,
    Kinematic,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Static => RigidBodyType::Fixed,
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Kinematic => RigidBodyType::KinematicPositionBased,
        }
    }
}

/// Collision shape, centred on the body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeDesc {
    Box { half_extents: Vec3 },
    Sphere { radius: f32 },
    /// Y-aligned capsule; `half_height` is half the cylinder part.
    Capsule { half_height: f32, radius: f32 },
}

impl ShapeDesc {
    fn build_collider(&self) -> ColliderBuilder {
        match *self {
            ShapeDesc::Box { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            ShapeDesc::Sphere { radius } => ColliderBuilder::ball(radius),
            ShapeDesc::Capsule { half_height, radius } => ColliderBuilder::capsule_y(half_height, radius),
        }
    }

    pub(crate) fn shared_shape(&self) -> SharedShape {
        match *self {
            ShapeDesc::Box { half_extents } => SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z),
            ShapeDesc::Sphere { radius } => SharedShape::ball(radius),
            ShapeDesc::Capsule { half_height, radius } => SharedShape::capsule_y(half_height, radius),
        }
    }
}

/// Physical material properties for a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.0,
            friction: 0.5,
            density: 1.0,
        }
    }
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub shape: ShapeDesc,
    pub position: Vec3,
    pub rotation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub material: ColliderMaterial,
    pub layer: ObjectLayer,
    pub ccd: bool,
}

impl BodyDesc {
    fn new(body_type: BodyType, shape: ShapeDesc, layer: ObjectLayer) -> Self {
        Self {
            body_type,
            shape,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            material: ColliderMaterial::default(),
            layer,
            ccd: false,
        }
    }

    /// Static body on the non-moving layer.
    pub fn fixed(shape: ShapeDesc) -> Self {
        Self::new(BodyType::Static, shape, ObjectLayer::NonMoving)
    }

    /// Dynamic body on the moving layer.
    pub fn dynamic(shape: ShapeDesc) -> Self {
        Self::new(BodyType::Dynamic, shape, ObjectLayer::Moving)
    }

    /// Kinematic (position-driven) body on the moving layer.
    pub fn kinematic(shape: ShapeDesc) -> Self {
        Self::new(BodyType::Kinematic, shape, ObjectLayer::Moving)
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_linear_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, velocity: Vec3) -> Self {
        self.angular_velocity = velocity;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.material.restitution = restitution;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.material.friction = friction;
        self
    }

    pub fn with_material(mut self, material: ColliderMaterial) -> Self {
        self.material = material;
        self
    }

    pub fn with_layer(mut self, layer: ObjectLayer) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }
}

/// Handle pair stored on an entity, referencing Rapier internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

/// A contact between two bodies starting or ending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub body_a: RigidBodyHandle,
    pub body_b: RigidBodyHandle,
    /// Entities the bodies were created for, if any.
    pub entity_a: Option<Entity>,
    pub entity_b: Option<Entity>,
    /// `true` when the contact just started, `false` when it ended.
    pub started: bool,
}

/// A body going to sleep or waking up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyActivation {
    pub body: RigidBodyHandle,
    pub entity: Option<Entity>,
    pub awake: bool,
}

// ---------------------------------------------------------------------------
// Event collector (no crossbeam)
// ---------------------------------------------------------------------------

struct DirectEventCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
}

impl DirectEventCollector {
    fn new() -> Self {
        Self {
            collisions: Mutex::new(Vec::new()),
        }
    }

    fn drain_collisions(&self) -> Vec<CollisionEvent> {
        match self.collisions.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl EventHandler for DirectEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let Ok(mut events) = self.collisions.lock() {
            events.push(event);
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
        // Contact forces are not reported.
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Default gravity, Y up.
pub const DEFAULT_GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

/// Wraps all Rapier3D boilerplate into a single singleton.
pub struct PhysicsWorld {
    gravity: na::Vector3<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    pub(crate) bodies: RigidBodySet,
    pub(crate) colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    pub(crate) query_pipeline: QueryPipeline,
    event_collector: DirectEventCollector,
    timestep: FixedTimestep,
    sleeping: HashMap<RigidBodyHandle, bool>,
    queries_dirty: bool,
    contacts: Vec<Contact>,
    activations: Vec<BodyActivation>,
    steps: u64,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity: vec3_to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: DirectEventCollector::new(),
            timestep: FixedTimestep::new(1.0 / 60.0),
            sleeping: HashMap::new(),
            queries_dirty: false,
            contacts: Vec::new(),
            activations: Vec::new(),
            steps: 0,
        }
    }

    /// Use `timestep` for `advance`.
    pub fn with_timestep(mut self, timestep: FixedTimestep) -> Self {
        self.timestep = timestep;
        self
    }

    pub fn gravity(&self) -> Vec3 {
        na_to_vec3(&self.gravity)
    }

    pub fn timestep(&self) -> &FixedTimestep {
        &self.timestep
    }

    /// Fixed steps taken since creation.
    pub fn step_count(&self) -> u64 {
        self.steps
    }

    /// Create a rigid body + collider and return handles.
    pub fn create_body(&mut self, desc: &BodyDesc) -> PhysicsBody {
        self.insert_body(desc, 0)
    }

    /// Like `create_body`, remembering `entity` for contact reports.
    pub fn create_body_for(&mut self, entity: Entity, desc: &BodyDesc) -> PhysicsBody {
        self.insert_body(desc, entity_to_user_data(entity))
    }

    fn insert_body(&mut self, desc: &BodyDesc, user_data: u128) -> PhysicsBody {
        let rb = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .position(isometry(desc.position, desc.rotation))
            .linvel(vec3_to_na(desc.linear_velocity))
            .angvel(vec3_to_na(desc.angular_velocity))
            .ccd_enabled(desc.ccd)
            .user_data(user_data)
            .build();
        let body_handle = self.bodies.insert(rb);

        let collider = desc
            .shape
            .build_collider()
            .restitution(desc.material.restitution)
            .friction(desc.material.friction)
            .density(desc.material.density)
            .collision_groups(desc.layer.groups())
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let collider_handle = self
            .colliders
            .insert_with_parent(collider, body_handle, &mut self.bodies);

        let asleep = self.bodies.get(body_handle).map(|b| b.is_sleeping()).unwrap_or(false);
        self.sleeping.insert(body_handle, asleep);
        self.queries_dirty = true;
        log::debug!("created {:?} body {:?} on {:?}", desc.body_type, body_handle, desc.layer);

        PhysicsBody {
            body_handle,
            collider_handle,
        }
    }

    /// Remove a body and all its colliders from the simulation.
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        self.bodies.remove(
            body.body_handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        self.sleeping.remove(&body.body_handle);
        self.queries_dirty = true;
    }

    /// Advance the simulation by one fixed step of `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );
        self.steps += 1;
        self.queries_dirty = false;

        for event in self.event_collector.drain_collisions() {
            let (h1, h2, started) = match event {
                CollisionEvent::Started(h1, h2, _) => (h1, h2, true),
                CollisionEvent::Stopped(h1, h2, _) => (h1, h2, false),
            };
            let (Some(body_a), Some(body_b)) = (self.collider_parent(h1), self.collider_parent(h2)) else {
                continue;
            };
            let contact = Contact {
                body_a,
                body_b,
                entity_a: self.body_entity(body_a),
                entity_b: self.body_entity(body_b),
                started,
            };
            log::debug!(
                "contact {} between {:?} and {:?}",
                if started { "added" } else { "removed" },
                body_a,
                body_b
            );
            self.contacts.push(contact);
        }
        self.track_activation();
    }

    /// Feed a frame delta into the fixed timestep and run the steps it yields.
    /// Returns how many steps ran.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let steps = self.timestep.accumulate(frame_dt);
        let dt = self.timestep.dt();
        for _ in 0..steps {
            self.step(dt);
        }
        steps
    }

    /// Contacts collected since the last `clear_events`.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Sleep/wake transitions collected since the last `clear_events`.
    pub fn activations(&self) -> &[BodyActivation] {
        &self.activations
    }

    pub fn clear_events(&mut self) {
        self.contacts.clear();
        self.activations.clear();
    }

    /// Teleport a body, waking it.
    pub fn set_position_and_rotation(&mut self, body: &PhysicsBody, position: Vec3, rotation: Quat) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_position(isometry(position, rotation), true);
        }
        self.queries_dirty = true;
    }

    /// Bring the scene query structure up to date with bodies created or
    /// moved since the last step.
    pub fn update_queries(&mut self) {
        if self.queries_dirty {
            self.query_pipeline.update(&self.colliders);
            self.queries_dirty = false;
        }
    }

    pub fn set_linear_velocity(&mut self, body: &PhysicsBody, velocity: Vec3) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_linvel(vec3_to_na(velocity), true);
        }
    }

    pub fn set_angular_velocity(&mut self, body: &PhysicsBody, velocity: Vec3) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_angvel(vec3_to_na(velocity), true);
        }
    }

    /// Apply an instantaneous impulse at the center of mass.
    pub fn apply_impulse(&mut self, body: &PhysicsBody, impulse: Vec3) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.apply_impulse(vec3_to_na(impulse), true);
        }
    }

    pub fn linear_velocity(&self, body: &PhysicsBody) -> Vec3 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec3(rb.linvel()))
            .unwrap_or(Vec3::ZERO)
    }

    /// Body origin in world space.
    pub fn position(&self, body: &PhysicsBody) -> Vec3 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec3(rb.translation()))
            .unwrap_or(Vec3::ZERO)
    }

    pub fn center_of_mass_position(&self, body: &PhysicsBody) -> Vec3 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec3(&rb.center_of_mass().coords))
            .unwrap_or(Vec3::ZERO)
    }

    pub fn rotation(&self, body: &PhysicsBody) -> Quat {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_quat(rb.rotation()))
            .unwrap_or(Quat::IDENTITY)
    }

    pub fn is_sleeping(&self, body: &PhysicsBody) -> bool {
        self.bodies
            .get(body.body_handle)
            .map(|rb| rb.is_sleeping())
            .unwrap_or(false)
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    // -- private helpers --

    fn collider_parent(&self, collider: ColliderHandle) -> Option<RigidBodyHandle> {
        self.colliders.get(collider)?.parent()
    }

    pub(crate) fn body_entity(&self, body: RigidBodyHandle) -> Option<Entity> {
        let data = self.bodies.get(body)?.user_data;
        if data == 0 {
            return None;
        }
        user_data_to_entity(data)
    }

    fn track_activation(&mut self) {
        let mut changed = Vec::new();
        for (handle, rb) in self.bodies.iter() {
            let asleep = rb.is_sleeping();
            let before = self.sleeping.insert(handle, asleep);
            if before.is_some_and(|b| b != asleep) {
                changed.push((handle, !asleep));
            }
        }
        for (body, awake) in changed {
            log::debug!("body {:?} {}", body, if awake { "activated" } else { "deactivated" });
            self.activations.push(BodyActivation {
                body,
                entity: self.body_entity(body),
                awake,
            });
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(DEFAULT_GRAVITY)
    }
}

/// Run the fixed steps owed for this frame, then copy body poses into the
/// `Transform3D` of every entity carrying a `PhysicsBody`.
pub fn physics_step_system(ctx: &mut SystemContext<'_>) {
    let dt = ctx.delta_time();
    let Some(mut physics) = ctx.singleton_mut::<PhysicsWorld>() else {
        log::trace!("{}: no PhysicsWorld, skip", ctx.name());
        return;
    };
    physics.clear_events();
    if physics.advance(dt) == 0 {
        return;
    }
    sync_transforms(&physics, ctx.entities());
}

/// Copy body poses into `Transform3D`s, marking only changed ones dirty.
pub fn sync_transforms(physics: &PhysicsWorld, world: &hecs::World) {
    for (_, (body, transform)) in world.query::<(&PhysicsBody, &mut Transform3D)>().iter() {
        let position = physics.position(body);
        let rotation = physics.rotation(body);
        if transform.position != position {
            transform.set_position(position);
        }
        if transform.rotation != rotation {
            transform.set_rotation(rotation);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> BodyDesc {
        BodyDesc::fixed(ShapeDesc::Box {
            half_extents: Vec3::new(100.0, 1.0, 100.0),
        })
        .with_position(Vec3::new(0.0, -1.0, 0.0))
    }

    fn sphere() -> BodyDesc {
        BodyDesc::dynamic(ShapeDesc::Sphere { radius: 0.5 })
            .with_position(Vec3::new(0.0, 10.0, 0.0))
            .with_linear_velocity(Vec3::new(0.0, -5.0, 0.0))
    }

    #[test]
    fn layer_pair_filter() {
        use ObjectLayer::*;
        assert!(!NonMoving.should_collide(NonMoving));
        assert!(NonMoving.should_collide(Moving));
        assert!(Moving.should_collide(NonMoving));
        assert!(Moving.should_collide(Moving));
        assert!(!NonMoving.should_collide_broad_phase(BroadPhaseLayer::NonMoving));
        assert!(Moving.should_collide_broad_phase(BroadPhaseLayer::NonMoving));

        // The rapier groups agree with the table.
        for a in [NonMoving, Moving] {
            for b in [NonMoving, Moving] {
                assert_eq!(a.groups().test(b.groups()), a.should_collide(b), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn create_and_remove_body() {
        let mut world = PhysicsWorld::default();
        let body = world.create_body(&sphere());
        assert_eq!(world.body_count(), 1);
        world.remove_body(&body);
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn initial_state_from_desc() {
        let mut world = PhysicsWorld::default();
        let body = world.create_body(&sphere().with_rotation(Quat::from_rotation_y(1.0)));
        assert!((world.center_of_mass_position(&body) - Vec3::new(0.0, 10.0, 0.0)).length() < 1e-4);
        assert!((world.linear_velocity(&body) - Vec3::new(0.0, -5.0, 0.0)).length() < 1e-4);
        assert!(world.rotation(&body).angle_between(Quat::from_rotation_y(1.0)) < 1e-4);
    }

    #[test]
    fn sphere_falls_and_lands_on_floor() {
        let mut world = PhysicsWorld::default();
        let ground = world.create_body(&floor());
        let ball = world.create_body(&sphere().with_restitution(0.5));

        let mut started = false;
        for _ in 0..600 {
            world.step(1.0 / 60.0);
            started |= world.contacts().iter().any(|c| c.started);
            world.clear_events();
        }
        assert!(started, "sphere should touch the floor");

        let pos = world.center_of_mass_position(&ball);
        assert!((pos.y - 0.5).abs() < 0.1, "sphere should rest on the floor: y={}", pos.y);
        // Static floor never moves.
        assert!((world.position(&ground) - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn static_bodies_do_not_report_contacts_with_each_other() {
        let mut world = PhysicsWorld::default();
        world.create_body(&floor());
        world.create_body(&floor().with_position(Vec3::new(0.0, -0.5, 0.0)));
        for _ in 0..10 {
            world.step(1.0 / 60.0);
        }
        assert!(world.contacts().is_empty());
    }

    #[test]
    fn contacts_name_entities() {
        let mut ecs = hecs::World::new();
        let floor_e = ecs.spawn(());
        let ball_e = ecs.spawn(());

        let mut world = PhysicsWorld::default();
        world.create_body_for(floor_e, &floor());
        world.create_body_for(ball_e, &sphere().with_position(Vec3::new(0.0, 0.6, 0.0)));
        for _ in 0..30 {
            world.step(1.0 / 60.0);
        }
        let c = world.contacts().iter().find(|c| c.started).copied().unwrap();
        let entities = [c.entity_a, c.entity_b];
        assert!(entities.contains(&Some(floor_e)));
        assert!(entities.contains(&Some(ball_e)));
    }

    #[test]
    fn reset_teleports_and_sets_velocity() {
        let mut world = PhysicsWorld::default();
        let ball = world.create_body(&sphere());
        for _ in 0..30 {
            world.step(1.0 / 60.0);
        }
        world.set_position_and_rotation(&ball, Vec3::new(0.0, 10.0, 0.0), Quat::IDENTITY);
        world.set_linear_velocity(&ball, Vec3::new(0.0, -5.0, 0.0));
        world.set_angular_velocity(&ball, Vec3::ZERO);
        assert!((world.center_of_mass_position(&ball).y - 10.0).abs() < 1e-4);
        assert!((world.linear_velocity(&ball).y + 5.0).abs() < 1e-4);
    }

    #[test]
    fn sleep_and_wake_are_reported() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let ball = world.create_body(&sphere().with_linear_velocity(Vec3::ZERO));

        if let Some(rb) = world.bodies.get_mut(ball.body_handle) {
            rb.sleep();
        }
        world.track_activation();
        assert_eq!(
            world.activations(),
            &[BodyActivation {
                body: ball.body_handle,
                entity: None,
                awake: false
            }]
        );

        world.clear_events();
        world.set_linear_velocity(&ball, Vec3::X);
        world.track_activation();
        assert_eq!(world.activations().len(), 1);
        assert!(world.activations()[0].awake);
    }

    #[test]
    fn advance_runs_whole_fixed_steps() {
        let mut world = PhysicsWorld::default();
        world.create_body(&sphere());
        assert_eq!(world.advance(0.5 / 60.0), 0);
        assert_eq!(world.advance(0.6 / 60.0), 1);
        assert_eq!(world.advance(1.0), 10);
        assert_eq!(world.step_count(), 11);
    }

    #[test]
    fn sync_copies_pose_into_transform() {
        let mut ecs = hecs::World::new();
        let mut physics = PhysicsWorld::default();
        let e = ecs.spawn((Transform3D::new(),));
        let body = physics.create_body_for(e, &sphere());
        ecs.insert_one(e, body).unwrap();

        {
            let mut t = ecs.get::<&mut Transform3D>(e).unwrap();
            t.dirty = false;
        }
        physics.step(1.0 / 60.0);
        sync_transforms(&physics, &ecs);

        let t = ecs.get::<&Transform3D>(e).unwrap();
        assert!(t.dirty);
        assert!(t.position.y < 10.0);
    }
}
