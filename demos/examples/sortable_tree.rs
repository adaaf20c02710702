// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The sortable state machine without any rendering.
//!
//! Moves an item into an empty folder, swaps two cells of a table, and shows
//! that cancelling restores the zones and that untouched zones keep their
//! identity.
//!
//! Run:
//! - `cargo run -p understory_demos --example sortable_tree`

use understory_sortable::{DropPosition, Item, ItemId, ItemTree, SortableState, ZoneId};

fn main() {
    let files = ZoneId::new("files");
    let table = ZoneId::new("table");
    let tree = ItemTree::from_items(vec![
        Item::leaf("readme", 1),
        Item::group("src", 0, vec![Item::leaf("lib", 2), Item::leaf("main", 3)]),
        Item::group("docs", 0, vec![]),
    ])
    .unwrap();
    let cells = ItemTree::from_items((0..4).map(|i| Item::leaf(format!("c{i}"), i)).collect()).unwrap();
    let state = SortableState::new()
        .with_zone(files.clone(), tree)
        .with_zone(table.clone(), cells);
    println!("== Start ==\n  {:?}", state.zones().current(&files).unwrap());

    // `lib` goes into the empty `docs` folder.
    let lib = ItemId::new("lib");
    let dragging = state.start_sort(&lib, Some(&ItemId::new("src")), &files);
    let into_docs = DropPosition::into_container(files.clone(), Some(ItemId::new("docs")));
    let moved = dragging.save_item_move(&into_docs, false);
    println!("== Preview ==\n  {:?}", moved.zones().current(&files).unwrap());
    assert!(moved.zones().zone_ptr_eq(state.zones(), &table));

    // Cancelling puts it back.
    let cancelled = moved.cancel_sort();
    println!("== Cancelled ==\n  {:?}", cancelled.zones().current(&files).unwrap());
    assert_eq!(cancelled.zones().current(&files), state.zones().current(&files));

    // Swapping two table cells, then committing.
    let c0 = ItemId::new("c0");
    let swapped = state
        .start_sort(&c0, None, &table)
        .save_item_move(&DropPosition::onto(table.clone(), None, "c3"), true)
        .commit_preview()
        .end_sort();
    let order: Vec<String> = swapped
        .zones()
        .current(&table)
        .unwrap()
        .iter()
        .map(|n| n.id().to_string())
        .collect();
    println!("== Swapped ==\n  {order:?}");
    assert_eq!(order, ["c3", "c1", "c2", "c0"]);
}
