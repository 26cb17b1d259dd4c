use ancestry_core::cat::{CatParams, MutationPool};
use ancestry_core::tree::{
    estimate_cat_count, FounderInput, FoundingCoupleInput, TreeGenerationConfig, TreeManager,
};
use criterion::{criterion_group, criterion_main, Criterion};

fn founders() -> FoundingCoupleInput {
    let params = CatParams {
        pelt_name: "Tabby".to_string(),
        colour: "GINGER".to_string(),
        eye_colour: "AMBER".to_string(),
        skin_colour: "PINK".to_string(),
        ..CatParams::default()
    };
    FoundingCoupleInput {
        mother: FounderInput {
            params: params.clone(),
            name: None,
            history_profile_id: None,
        },
        father: FounderInput {
            params,
            name: None,
            history_profile_id: None,
        },
    }
}

fn full_tree(depth: u32, seed: u64) -> usize {
    let mut manager = TreeManager::seeded(MutationPool::standard(), seed);
    manager
        .set_config(TreeGenerationConfig {
            depth,
            min_children: 2,
            max_children: 4,
            partner_chance: 0.6,
            ..TreeGenerationConfig::default()
        })
        .unwrap();
    manager.initialize_founding_couple(founders()).unwrap();
    manager.generate_full_tree().unwrap();
    manager.cat_count()
}

fn bench_generation(c: &mut Criterion) {
    c.bench_function("full_tree_depth3", |b| b.iter(|| full_tree(3, 7)));

    c.bench_function("full_tree_depth5", |b| b.iter(|| full_tree(5, 7)));

    c.bench_function("estimate_depth30", |b| {
        b.iter(|| estimate_cat_count(30, 3.0, 0.9))
    });

    let mut manager = TreeManager::seeded(MutationPool::standard(), 7);
    manager.initialize_founding_couple(founders()).unwrap();
    manager.generate_full_tree().unwrap();
    let tree = manager.serialize();
    c.bench_function("serialize_default_tree", |b| {
        b.iter(|| tree.to_json().unwrap())
    });
}

criterion_group!(benches, bench_generation);
criterion_main!(benches);
