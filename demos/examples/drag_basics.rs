// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag orchestrator basics.
//!
//! A scene with two lists. A mouse press on the left list turns into a drag
//! once the pointer moves past the threshold, enters the right list, and is
//! dropped there. A second gesture is cancelled with Escape.
//!
//! Run:
//! - `cargo run -p understory_demos --example drag_basics`
//! - `RUST_LOG=understory_drag=trace cargo run -p understory_demos --example drag_basics`

use core::time::Duration;

use kurbo::{Point, Size, Vec2};
use tracing_subscriber::EnvFilter;
use understory_drag::{
    Avatar, AvatarKind, DragEvent, Input, Key, Orchestrator, PointerKind, Reply, SourceOptions,
    TargetOptions,
};
use understory_scene::{ElementId, LocalElement, Scene};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut scene = Scene::new();
    let left = scene.insert(None, LocalElement::at(Vec2::ZERO, Size::new(100.0, 100.0)));
    let row = scene.insert(Some(left), LocalElement::at(Vec2::ZERO, Size::new(100.0, 20.0)));
    let right = scene.insert(
        None,
        LocalElement::at(Vec2::new(200.0, 0.0), Size::new(100.0, 100.0)),
    );

    let card = AvatarKind("card");
    let mut drag = Orchestrator::default();
    drag.register_source(SourceOptions::new(left).with_threshold(4.0));
    drag.register_target(TargetOptions::new(left).accepting(card));
    let right_target = drag.register_target(TargetOptions::new(right).accepting(card));

    let mut log = Vec::new();
    let mut delegate = |event: DragEvent<ElementId>| -> Reply<ElementId> {
        let reply = match &event {
            DragEvent::AvatarRequested(_) => Reply::Avatar(Avatar::new(card)),
            _ => Reply::Ack,
        };
        if !matches!(event, DragEvent::AvatarMoved { .. }) {
            log.push(event);
        }
        reply
    };

    let ms = Duration::from_millis;
    let press = Input::PointerDown {
        pointer: PointerKind::Mouse,
        position: Point::new(10.0, 10.0),
        target: row,
        time: ms(0),
    };
    drag.handle(&scene, press.clone(), &mut delegate);
    // Below the threshold: still a press.
    drag.handle(&scene, Input::PointerMove { position: Point::new(12.0, 10.0), time: ms(16) }, &mut delegate);
    drag.handle(&scene, Input::PointerMove { position: Point::new(250.0, 50.0), time: ms(32) }, &mut delegate);
    drag.handle(&scene, Input::PointerUp { position: Point::new(250.0, 50.0), time: ms(48) }, &mut delegate);

    drag.handle(&scene, press, &mut delegate);
    drag.handle(&scene, Input::PointerMove { position: Point::new(50.0, 50.0), time: ms(80) }, &mut delegate);
    drag.handle(&scene, Input::Key(Key::Escape), &mut delegate);

    println!("== Events ==");
    for event in &log {
        println!("  {:?}", event);
    }
    assert!(
        log.iter()
            .any(|e| matches!(e, DragEvent::Dropped { target, .. } if *target == right_target))
    );
    assert!(matches!(log.last(), Some(DragEvent::Cancelled { .. })));
}
