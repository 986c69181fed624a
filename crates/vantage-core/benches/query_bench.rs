use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec3;
use gridscape::{Bounds, ScriptedWorld};
use vantage_core::{
    Condition, ConditionKind, Criterion as ScoringCriterion, CriterionKind, Engine,
    EnvironmentConfig, Params, Query,
};

fn bench_world() -> ScriptedWorld {
    let mut world = ScriptedWorld::new("bench");
    world.add_ground(
        "floor",
        Bounds::from_min_max(Vec3::new(-40.0, -1.0, -40.0), Vec3::new(40.0, 0.0, 40.0)),
    );
    // A few walls and a scattering of units to keep the filters honest.
    for i in 0..4 {
        let x = -15.0 + i as f32 * 10.0;
        world.add_block(
            "wall",
            Bounds::from_min_max(Vec3::new(x, 0.0, -5.0), Vec3::new(x + 1.0, 3.0, 5.0)),
        );
    }
    for i in 0..12 {
        let angle = i as f32 * 0.5;
        world.add_dynamic(
            "unit",
            Vec3::new(angle.cos() * 12.0, 0.5, angle.sin() * 12.0),
            "enemy",
        );
    }
    world
}

fn bench_environment_build(c: &mut Criterion) {
    let engine = Engine::new(Arc::new(bench_world()));
    let config = EnvironmentConfig::new()
        .with_region(Vec3::new(0.0, 2.0, 0.0), Vec3::new(30.0, 4.0, 30.0))
        .forced();

    c.bench_function("environment_build", |b| {
        b.iter(|| {
            engine
                .initialize_environment(black_box(&config))
                .expect("bench environment builds");
        })
    });
}

fn bench_filtered_scored_query(c: &mut Criterion) {
    let engine = Engine::new(Arc::new(bench_world()));
    engine
        .initialize_environment(
            &EnvironmentConfig::new().with_region(Vec3::new(0.0, 2.0, 0.0), Vec3::new(30.0, 4.0, 30.0)),
        )
        .expect("bench environment builds");

    let query = Query::new("bench")
        .with_desired_count(10)
        .with_condition(Condition::new(
            ConditionKind::CustomProperty,
            Params::new()
                .with("propertyName", "isWalkable")
                .with("expectedValue", true),
        ))
        .with_condition(Condition::new(
            ConditionKind::DistanceTo,
            Params::new().with("target", Vec3::ZERO).with("maxDistance", 14.0_f32),
        ))
        .with_criterion(ScoringCriterion::new(
            CriterionKind::CoverQuality,
            Params::new().with("eyeHeight", 0.5_f32),
            0.6,
        ))
        .with_criterion(ScoringCriterion::new(
            CriterionKind::DensityOfObjects,
            Params::new().with("mode", "inverse"),
            0.4,
        ));

    c.bench_function("filtered_scored_query", |b| {
        b.iter(|| black_box(engine.perform_query(black_box(&query))))
    });
}

criterion_group!(benches, bench_environment_build, bench_filtered_scored_query);
criterion_main!(benches);
