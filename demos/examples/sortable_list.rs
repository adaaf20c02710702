// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sortable list walkthrough.
//!
//! Two connected lists share the group tag `todo`. The first item of
//! "backlog" is dragged down past its siblings, then over to "doing" and
//! dropped there. Every frame re-renders the preview trees and lets the
//! controller measure and animate.
//!
//! Run:
//! - `cargo run -p understory_demos --example sortable_list`
//! - `RUST_LOG=understory_sortable=debug cargo run -p understory_demos --example sortable_list`

use core::time::Duration;

use kurbo::Point;
use tracing_subscriber::EnvFilter;
use understory_drag::{DragEvent, Input, Orchestrator, PointerKind, SourceOptions, TargetOptions};
use understory_scene::{ElementId, QueryFilter};
use understory_sortable::{Item, SceneHost, SortEvent, Sortable, ZoneId, ZoneOptions};

const WIDTH: f64 = 180.0;

struct Board {
    host: SceneHost,
    sortable: Sortable<&'static str, ElementId>,
    drag: Orchestrator<ElementId>,
    time: Duration,
}

impl Board {
    fn send(&mut self, input: Input<ElementId>) {
        let Self {
            host,
            sortable,
            drag,
            ..
        } = self;
        let mut avatar = None;
        let mut delegate = |event: DragEvent<ElementId>| {
            if let DragEvent::AvatarMoved { avatar_origin, .. } = &event {
                avatar = Some(*avatar_origin);
            }
            sortable.on_drag_event(&*host, &event)
        };
        drag.handle(host.scene(), input, &mut delegate);
        match avatar {
            Some(origin) if drag.is_dragging() => host.place_avatar(origin, WIDTH),
            _ if !drag.is_dragging() => host.park_avatar(),
            _ => {}
        }
    }

    fn frame(&mut self) {
        self.host.render_all(self.sortable.state().zones());
        self.sortable.on_frame(&mut self.host);
        self.host.render_all(self.sortable.state().zones());
        for event in self.sortable.drain_events() {
            match event {
                SortEvent::SortMove { animate, target_index, target_zone_id, .. } => {
                    println!("  move -> {target_zone_id}[{target_index}]");
                    for item in animate {
                        println!("    animate {} by {:?}", item.id, item.translation());
                    }
                    // A real host would play the animation, then clear it.
                    self.sortable.clear_transform();
                }
                other => println!("  {other:?}"),
            }
        }
    }

    fn pointer(&mut self, x: f64, y: f64) {
        self.time += Duration::from_millis(16);
        self.send(Input::PointerMove { position: Point::new(x, y), time: self.time });
        self.frame();
        self.frame();
    }

    fn print(&self) {
        for zone in ["backlog", "doing"] {
            let tree = self.sortable.state().zones().current(&ZoneId::new(zone)).unwrap();
            println!("  {zone}: {tree:?}");
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut board = Board {
        host: SceneHost::default(),
        sortable: Sortable::default(),
        drag: Orchestrator::default(),
        time: Duration::ZERO,
    };
    let kind = board.sortable.options().avatar_kind;
    let lists: [(&str, Vec<Item<&'static str>>); 2] = [
        (
            "backlog",
            vec![
                Item::leaf("write", "Write the draft"),
                Item::leaf("review", "Review it"),
                Item::leaf("ship", "Ship it"),
            ],
        ),
        ("doing", vec![Item::leaf("triage", "Triage bugs")]),
    ];
    for (i, (zone, items)) in lists.into_iter().enumerate() {
        let root = board
            .host
            .add_zone(zone, Point::new(i as f64 * 250.0, 0.0), WIDTH, false);
        board
            .sortable
            .add_zone(zone, ZoneOptions::new().with_group("todo"), items)
            .unwrap();
        board.drag.register_source(SourceOptions::new(root));
        board.drag.register_target(TargetOptions::new(root).accepting(kind));
    }
    board.host.render_all(board.sortable.state().zones());
    println!("== Before ==");
    board.print();

    println!("== Drag ==");
    let start = Point::new(20.0, 5.0);
    let target = board
        .host
        .scene()
        .hit_test_point(start, QueryFilter::PICKING)
        .unwrap()
        .element;
    board.send(Input::PointerDown {
        pointer: PointerKind::Mouse,
        position: start,
        target,
        time: board.time,
    });
    board.pointer(20.0, 25.0);
    board.pointer(20.0, 45.0);
    board.pointer(270.0, 5.0);
    board.time += Duration::from_millis(16);
    board.send(Input::PointerUp { position: Point::new(270.0, 5.0), time: board.time });
    board.frame();

    println!("== After ==");
    board.print();
    let doing = board.sortable.items(&ZoneId::new("doing")).unwrap();
    assert_eq!(doing[0].data, "Write the draft");
}
