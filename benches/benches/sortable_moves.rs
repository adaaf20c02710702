// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_sortable::{
    DropPosition, Item, ItemId, ItemTree, SortableState, ZoneId, Zones, move_item,
};

fn flat(prefix: &str, n: usize) -> Vec<Item<u32>> {
    (0..n)
        .map(|i| Item::leaf(format!("{prefix}{i}"), i as u32))
        .collect()
}

/// `groups` containers of `per_group` leaves each.
fn nested(groups: usize, per_group: usize) -> Vec<Item<u32>> {
    (0..groups)
        .map(|g| Item::group(format!("g{g}"), 0, flat(&format!("g{g}-"), per_group)))
        .collect()
}

fn zones(entries: Vec<(&str, Vec<Item<u32>>)>) -> Zones<u32> {
    let mut state = SortableState::new();
    for (zone, items) in entries {
        state = state.with_zone(zone, ItemTree::from_items(items).unwrap());
    }
    state.zones().clone()
}

fn bench_shift(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_item_shift");
    for &n in &[16_usize, 256, 4096] {
        let zones = zones(vec![("list", flat("i", n))]);
        let zone = ZoneId::new("list");
        let source = zones
            .current(&zone)
            .unwrap()
            .position_of(&ItemId::new("i0"), &zone)
            .unwrap();
        let target = DropPosition::at(zone.clone(), None, None, n - 1);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("first_to_last_n{n}"), |b| {
            b.iter(|| black_box(move_item(&zones, &source, &target, false)));
        });
    }
    group.finish();
}

fn bench_transfer(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_item_transfer");
    for &(groups, per_group) in &[(4_usize, 16_usize), (32, 64)] {
        let zones = zones(vec![
            ("tree", nested(groups, per_group)),
            ("other", flat("o", per_group)),
        ]);
        let tree = ZoneId::new("tree");
        let other = ZoneId::new("other");
        let source = zones
            .current(&tree)
            .unwrap()
            .position_of(&ItemId::new("g0"), &tree)
            .unwrap();
        let target = DropPosition::at(other.clone(), None, None, per_group / 2);
        group.bench_function(format!("subtree_g{groups}x{per_group}"), |b| {
            b.iter(|| black_box(move_item(&zones, &source, &target, false)));
        });
        let into = DropPosition::at(tree.clone(), Some(ItemId::new("g1")), None, 0);
        group.bench_function(format!("across_containers_g{groups}x{per_group}"), |b| {
            let leaf = zones
                .current(&tree)
                .unwrap()
                .position_of(&ItemId::new("g0-0"), &tree)
                .unwrap();
            b.iter(|| black_box(move_item(&zones, &leaf, &into, false)));
        });
    }
    group.finish();
}

fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("sortable_state");
    let n = 512;
    let zone = ZoneId::new("list");
    let start = SortableState::new().with_zone(zone.clone(), ItemTree::from_items(flat("i", n)).unwrap());
    let item = ItemId::new("i0");
    group.bench_function("drag_across_list_then_cancel", |b| {
        b.iter_batched(
            || start.start_sort(&item, None, &zone),
            |mut state| {
                for index in 1..32 {
                    state = state.save_item_move(&DropPosition::at(zone.clone(), None, None, index), false);
                }
                black_box(state.cancel_sort())
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("drag_across_list_then_commit", |b| {
        b.iter_batched(
            || start.start_sort(&item, None, &zone),
            |mut state| {
                for index in 1..32 {
                    state = state.save_item_move(&DropPosition::at(zone.clone(), None, None, index), false);
                }
                black_box(state.commit_preview().end_sort())
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_shift, bench_transfer, bench_session);
criterion_main!(benches);
