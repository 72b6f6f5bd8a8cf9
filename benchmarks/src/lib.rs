//! Shared scene builders for the collision benchmarks.

use anyhow::{Context, Result};
use glam::Vec3;
use kinematic_collision::ecs::components::physics::{Collider, ColliderShape};
use kinematic_collision::ecs::components::transform::{GlobalTransform, Transform};
use kinematic_collision::ecs::systems::{collision_sync_system, transform_system};
use kinematic_collision::physics::{
    Aabb, CharacterController, CharacterControllerConfig, CollisionConfig, CollisionSystem,
    GeometryStore, HeightfieldData, HeightfieldId, SpatialHash,
};

pub const DT: f32 = 1.0 / 60.0;

/// Small deterministic generator so runs are comparable.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_f32(&mut self) -> f32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 40) as f32) / ((1u64 << 24) as f32)
    }

    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }

    pub fn vec3(&mut self, extent: f32) -> Vec3 {
        Vec3::new(
            self.range(-extent, extent),
            self.range(-extent, extent),
            self.range(-extent, extent),
        )
    }
}

/// `n` entities with random boxes inside a cube of half-size `extent`.
pub fn random_aabbs(n: usize, extent: f32, seed: u64) -> (hecs::World, Vec<(hecs::Entity, Aabb)>) {
    let mut world = hecs::World::new();
    let mut rng = Lcg::new(seed);
    let boxes = (0..n)
        .map(|_| {
            let center = rng.vec3(extent);
            let half = Vec3::new(rng.range(0.2, 1.5), rng.range(0.2, 1.5), rng.range(0.2, 1.5));
            (world.spawn(()), Aabb::from_center_half_extents(center, half))
        })
        .collect();
    (world, boxes)
}

pub fn setup_hash(boxes: &[(hecs::Entity, Aabb)], cell_size: f32) -> SpatialHash {
    let mut hash = SpatialHash::new(cell_size, 100);
    for (entity, aabb) in boxes {
        hash.insert(*entity, *aabb);
    }
    hash
}

fn shape_for(i: usize, rng: &mut Lcg) -> ColliderShape {
    match i % 3 {
        0 => ColliderShape::cuboid(Vec3::new(
            rng.range(0.3, 1.0),
            rng.range(0.3, 1.0),
            rng.range(0.3, 1.0),
        )),
        1 => ColliderShape::sphere(rng.range(0.3, 1.0)),
        _ => ColliderShape::capsule(rng.range(0.2, 0.5), rng.range(1.0, 2.5)),
    }
}

/// Push ECS state into the collision system and step once.
pub fn tick(world: &mut hecs::World, system: &mut CollisionSystem) -> Result<()> {
    transform_system(world);
    collision_sync_system(world, system).context("collision sync failed")?;
    system.step(DT);
    Ok(())
}

/// Height-field terrain plus `n` mixed colliders scattered above it, stepped once.
pub fn setup_scene(n: usize) -> Result<(hecs::World, CollisionSystem)> {
    let side = (n as f32).sqrt().ceil().max(4.0) * 2.5;
    let mut store = GeometryStore::new();
    let samples = 33;
    let heights = (0..samples * samples)
        .map(|i| ((i % samples) as f32 * 0.4).sin() * 0.5 + ((i / samples) as f32 * 0.3).cos() * 0.5)
        .collect();
    let scale = Vec3::new(side * 2.0 / (samples - 1) as f32, 1.0, side * 2.0 / (samples - 1) as f32);
    store.insert_heightfield(
        HeightfieldId(1),
        HeightfieldData::new(samples, samples, heights, scale).context("terrain heights")?,
    );

    let mut system = CollisionSystem::new(CollisionConfig::default())?;
    system.set_geometry_provider(store);

    let mut world = hecs::World::new();
    world.spawn((
        Transform::from_position(Vec3::new(-side, -1.0, -side)),
        GlobalTransform::default(),
        Collider::new(ColliderShape::Heightfield {
            field: HeightfieldId(1),
        }),
    ));

    let mut rng = Lcg::new(0x5eed);
    for i in 0..n {
        let position = Vec3::new(
            rng.range(-side, side),
            rng.range(0.0, 6.0),
            rng.range(-side, side),
        );
        world.spawn((
            Transform::from_position(position),
            GlobalTransform::default(),
            Collider::new(shape_for(i, &mut rng)),
        ));
    }

    tick(&mut world, &mut system)?;
    Ok((world, system))
}

/// Nudge every `stride`-th collider so the next step has work to do.
pub fn jitter_scene(world: &mut hecs::World, frame: usize, stride: usize) {
    let offset = Vec3::new((frame as f32 * 0.7).sin(), 0.0, (frame as f32 * 0.7).cos()) * 0.05;
    for (i, (_, transform)) in world
        .query_mut::<hecs::With<&mut Transform, &Collider>>()
        .into_iter()
        .enumerate()
    {
        if i % stride.max(1) == 0 {
            transform.position += offset;
        }
    }
}

/// Floor, a wall ring and a few obstacles with one character in the middle.
pub fn setup_character_scene() -> Result<(CollisionSystem, CharacterController)> {
    let mut world = hecs::World::new();
    let mut system = CollisionSystem::default();
    let mut spawn_box = |center: Vec3, half: Vec3| {
        world.spawn((
            Transform::from_position(center),
            GlobalTransform::default(),
            Collider::new(ColliderShape::cuboid(half)),
        ));
    };
    spawn_box(Vec3::new(0.0, -0.5, 0.0), Vec3::new(30.0, 0.5, 30.0));
    for sign in [-1.0, 1.0] {
        spawn_box(Vec3::new(20.0 * sign, 1.5, 0.0), Vec3::new(0.5, 1.5, 20.0));
        spawn_box(Vec3::new(0.0, 1.5, 20.0 * sign), Vec3::new(20.0, 1.5, 0.5));
    }
    let mut rng = Lcg::new(7);
    for _ in 0..40 {
        let center = Vec3::new(rng.range(-18.0, 18.0), 0.5, rng.range(-18.0, 18.0));
        spawn_box(center, Vec3::new(rng.range(0.3, 1.2), 0.5, rng.range(0.3, 1.2)));
    }
    tick(&mut world, &mut system)?;

    let controller =
        CharacterController::new(CharacterControllerConfig::default(), Vec3::new(0.0, 1.02, 0.0))?;
    Ok((system, controller))
}

/// Walk the character in a slow circle for `frames` ticks.
pub fn run_character(system: &CollisionSystem, controller: &mut CharacterController, frames: usize) {
    for frame in 0..frames {
        let angle = frame as f32 * 0.05;
        let motion = Vec3::new(angle.cos(), 0.0, angle.sin()) * 6.0 * DT;
        controller.move_by(system, motion, DT);
    }
}
