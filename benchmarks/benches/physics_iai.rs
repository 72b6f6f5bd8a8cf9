//! Collision core benchmarks (iai-callgrind - instruction counts).
//!
//! Run: cargo bench --manifest-path benchmarks/Cargo.toml --bench physics_iai

use std::hint::black_box;

use collision_bench::*;
use glam::Vec3;
use iai_callgrind::{library_benchmark, library_benchmark_group, main};
use kinematic_collision::physics::{
    Aabb, CharacterController, CollisionSystem, QueryFilter, SpatialHash,
};

fn hash_with(n: usize) -> SpatialHash {
    let (_world, boxes) = random_aabbs(n, (n as f32).sqrt() * 2.0, 1);
    setup_hash(&boxes, 5.0)
}

fn scene_with(n: usize) -> (hecs::World, CollisionSystem) {
    setup_scene(n).expect("scene setup")
}

fn character_scene() -> (CollisionSystem, CharacterController) {
    setup_character_scene().expect("character scene")
}

#[library_benchmark]
#[bench::n100(args = (100), setup = hash_with)]
#[bench::n1000(args = (1000), setup = hash_with)]
fn broadphase_pairs(hash: SpatialHash) -> Vec<(hecs::Entity, hecs::Entity)> {
    black_box(hash.query_pairs())
}

#[library_benchmark]
#[bench::n1000(args = (1000), setup = hash_with)]
fn broadphase_region(hash: SpatialHash) -> Vec<hecs::Entity> {
    let bounds = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(10.0));
    black_box(hash.query_aabb(&bounds))
}

#[library_benchmark]
#[bench::n500(args = (500), setup = scene_with)]
fn step_settled(scene: (hecs::World, CollisionSystem)) -> CollisionSystem {
    let (mut world, mut system) = scene;
    tick(&mut world, &mut system).expect("tick");
    black_box(system)
}

#[library_benchmark]
#[bench::n500(args = (500), setup = scene_with)]
fn raycasts(scene: (hecs::World, CollisionSystem)) -> usize {
    let (_world, system) = scene;
    let filter = QueryFilter::default();
    let hits = (0..64)
        .filter_map(|i| {
            let origin = Vec3::new(i as f32 - 32.0, 20.0, (i % 8) as f32 - 4.0);
            system.raycast(origin, Vec3::NEG_Y, 40.0, &filter)
        })
        .count();
    black_box(hits)
}

#[library_benchmark]
#[bench::walk(setup = character_scene)]
fn character_walk(scene: (CollisionSystem, CharacterController)) -> Vec3 {
    let (system, mut controller) = scene;
    run_character(&system, &mut controller, 60);
    black_box(controller.position())
}

library_benchmark_group!(
    name = broadphase;
    benchmarks = broadphase_pairs, broadphase_region
);

library_benchmark_group!(
    name = pipeline;
    benchmarks = step_settled, raycasts, character_walk
);

main!(library_benchmark_groups = broadphase, pipeline);
