// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;
use understory_sortable::{
    BoxCache, DropPosition, Item, ItemId, ItemTree, MoveInfo, SceneHost, SortableState, ZoneId,
    compute_moving_items, measure_zone,
};

fn tree(groups: usize, per_group: usize) -> ItemTree<()> {
    let items = (0..groups)
        .map(|g| {
            let children = (0..per_group)
                .map(|i| Item::leaf(format!("g{g}-{i}"), ()))
                .collect();
            Item::group(format!("g{g}"), (), children)
        })
        .collect();
    ItemTree::from_items(items).unwrap()
}

fn bench_measure(c: &mut Criterion) {
    let mut group = c.benchmark_group("measure_zone");
    for &(groups, per_group) in &[(4_usize, 8_usize), (16, 32)] {
        let zone = ZoneId::new("tree");
        let tree = tree(groups, per_group);
        let mut host = SceneHost::default();
        host.add_zone(zone.clone(), Point::ZERO, 300.0, false);
        host.render(&zone, &tree);
        group.bench_function(format!("g{groups}x{per_group}"), |b| {
            b.iter(|| black_box(measure_zone(&mut host, &zone, &tree).unwrap()));
        });
    }
    group.finish();
}

fn bench_moving_items(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_moving_items");
    let zone = ZoneId::new("tree");
    let tree = tree(16, 32);
    let mut host = SceneHost::default();
    host.add_zone(zone.clone(), Point::ZERO, 300.0, false);
    host.render(&zone, &tree);

    let item = ItemId::new("g0-0");
    let before = SortableState::new()
        .with_zone(zone.clone(), tree.clone())
        .start_sort(&item, Some(&ItemId::new("g0")), &zone);
    let mut boxes = BoxCache::new();
    boxes.insert(zone.clone(), measure_zone(&mut host, &zone, &tree).unwrap());

    let target = DropPosition::at(zone.clone(), Some(ItemId::new("g15")), None, 31);
    let after = before.save_item_move(&target, false);
    let moved = after.zones().current(&zone).unwrap();
    host.render(&zone, moved);
    let mut target_boxes = BoxCache::new();
    target_boxes.insert(zone.clone(), measure_zone(&mut host, &zone, moved).unwrap());

    let info = MoveInfo::between(before.zones(), after.zones(), &item, &zone, &zone, None).unwrap();
    group.bench_function("transfer_g16x32", |b| {
        b.iter(|| black_box(compute_moving_items(&info, &boxes, &target_boxes)));
    });
    group.finish();
}

criterion_group!(benches, bench_measure, bench_moving_items);
criterion_main!(benches);
