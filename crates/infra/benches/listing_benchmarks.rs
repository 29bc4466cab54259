//! Benchmarks for lock resolution / listing assembly.
//!
//! The listing is rebuilt after every mutation, so its cost is on the hot
//! path of every admin edit.

use std::collections::HashSet;

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use brickstore_catalog::{NewProduct, Product, Selection, VariantListing};
use brickstore_core::{BrandId, CategoryId, CombinationId};

fn build_product(axes: usize, options_per_axis: usize, combos: usize) -> Product {
    let mut product = Product::create(
        NewProduct {
            name: "Benchmark Set".to_string(),
            price: None,
            category_id: CategoryId::new(),
            brand_id: BrandId::new(),
            product_info: String::new(),
            usage: String::new(),
            has_variants: true,
        },
        vec![],
        Utc::now(),
    )
    .expect("product");

    let mut axis_ids = Vec::new();
    for a in 0..axes {
        let options: Vec<String> = (0..options_per_axis).map(|o| format!("opt-{a}-{o}")).collect();
        let id = product
            .add_variant(&format!("axis-{a}"), &options)
            .expect("axis");
        axis_ids.push(id);
    }

    for c in 0..combos {
        let selections: Vec<Selection> = axis_ids
            .iter()
            .enumerate()
            .map(|(a, &variant_id)| Selection {
                variant_id,
                value: format!("opt-{a}-{}", c % options_per_axis),
            })
            .collect();
        product
            .add_combination(&format!("combo-{c}"), selections, vec![])
            .expect("combination");
    }

    product
}

fn listing_benchmark(c: &mut Criterion) {
    let product = build_product(4, 8, 8);
    let locked: HashSet<CombinationId> = product
        .combinations()
        .take(2)
        .map(|combo| combo.id_typed())
        .collect();

    c.bench_function("build_listing_4x8_axes_8_combos", |b| {
        b.iter(|| VariantListing::build(black_box(&product), black_box(&locked)))
    });
}

criterion_group!(benches, listing_benchmark);
criterion_main!(benches);
