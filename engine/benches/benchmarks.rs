//! Performance benchmarks for rally-engine

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rally_engine::{CartStore, DebounceMap, Product, WishlistState};
use rust_decimal::Decimal;

fn product(id: u64) -> Product {
    Product::new(
        format!("p-{id}"),
        format!("Product {id}"),
        Decimal::new(999 + id as i64, 2),
    )
}

fn bench_cart_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("cart_operations");

    group.bench_function("increment", |b| {
        let mut cart = CartStore::new();
        for i in 0..100 {
            let _ = cart.add(product(i), 1);
        }
        b.iter(|| cart.increment(black_box("p-50")));
    });

    group.bench_function("totals_100_lines", |b| {
        let mut cart = CartStore::new();
        for i in 0..100 {
            let _ = cart.add(product(i), (i % 5 + 1) as u32);
        }
        b.iter(|| black_box(cart.totals()));
    });

    group.finish();
}

fn bench_debounce(c: &mut Criterion) {
    let mut group = c.benchmark_group("debounce");

    group.bench_function("schedule_replace", |b| {
        let mut debounce = DebounceMap::new(500);
        let mut now = 0u64;
        b.iter(|| {
            now += 1;
            debounce.schedule(black_box("p-1"), 1, 3, now)
        });
    });

    group.finish();
}

fn bench_wishlist(c: &mut Criterion) {
    let mut group = c.benchmark_group("wishlist");

    group.bench_function("tap_confirm", |b| {
        let mut state = WishlistState::new();
        state.resolve_probe("p-1", false);
        b.iter(|| {
            let intent = state.tap(black_box("p-1"));
            state.confirm("p-1", intent.token);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_cart_operations, bench_debounce, bench_wishlist);
criterion_main!(benches);
