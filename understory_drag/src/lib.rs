// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_drag --heading-base-level=0

//! Understory Drag: a deterministic, `no_std` drag-and-drop orchestrator.
//!
//! ## Overview
//!
//! This crate turns raw pointer, scroll and key input into a drag protocol:
//! which registered source a press belongs to, when the press becomes a drag,
//! which registered drop target the dragged avatar is over, and how the gesture ends.
//! It does not render anything and does not know what is being dragged.
//!
//! ## Seams
//!
//! - [`Surface`](crate::types::Surface): the element tree to walk and hit test.
//!   Enable `scene_adapter` to use an [`understory_scene`](https://docs.rs/understory_scene) `Scene`.
//! - [`DragDelegate`](crate::types::DragDelegate): the single sink for every
//!   [`DragEvent`](crate::types::DragEvent). It answers avatar requests; all other
//!   events are notifications.
//!
//! ## One gesture at a time
//!
//! An [`Orchestrator`](crate::orchestrator::Orchestrator) holds at most one press or
//! drag. Presses that arrive while one is active are ignored.
//!
//! ## Cancellation
//!
//! Escape, pointer cancellation, [`Orchestrator::cancel`](crate::orchestrator::Orchestrator::cancel)
//! and a release outside every target all end in
//! [`DragEvent::Cancelled`](crate::types::DragEvent::Cancelled). Invalid presses,
//! declined avatars and unaccepted avatar kinds fail silently.
//!
//! ## Example
//!
//! ```
//! use core::time::Duration;
//! use kurbo::Point;
//! use understory_drag::{
//!     Avatar, AvatarKind, DragEvent, Input, Orchestrator, PointerKind, Reply, SourceOptions,
//!     Surface, TargetOptions,
//! };
//!
//! // Two elements: 1 is a list, 2 is a row inside it.
//! struct Tiny;
//! impl Surface for Tiny {
//!     type Element = u32;
//!     fn parent_of(&self, e: u32) -> Option<u32> { (e == 2).then_some(1) }
//!     fn element_at(&self, p: Point, _hidden: Option<u32>) -> Option<u32> {
//!         (p.y < 100.0).then_some(2)
//!     }
//! }
//!
//! let mut orchestrator = Orchestrator::default();
//! orchestrator.register_source(SourceOptions::new(1));
//! let list = orchestrator.register_target(TargetOptions::new(1));
//!
//! let mut dropped = None;
//! let mut delegate = |event: DragEvent<u32>| -> Reply<u32> {
//!     match event {
//!         DragEvent::AvatarRequested(_) => Reply::Avatar(Avatar::new(AvatarKind("row"))),
//!         DragEvent::Dropped { target, .. } => {
//!             dropped = Some(target);
//!             Reply::Ack
//!         }
//!         _ => Reply::Ack,
//!     }
//! };
//!
//! let t = Duration::ZERO;
//! let down = Input::PointerDown { pointer: PointerKind::Mouse, position: Point::new(5.0, 5.0), target: 2, time: t };
//! orchestrator.handle(&Tiny, down, &mut delegate);
//! orchestrator.handle(&Tiny, Input::PointerMove { position: Point::new(5.0, 50.0), time: t }, &mut delegate);
//! orchestrator.handle(&Tiny, Input::PointerUp { position: Point::new(5.0, 50.0), time: t }, &mut delegate);
//! assert_eq!(dropped, Some(list));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod options;
pub mod orchestrator;
pub mod targets;
pub mod types;

pub use options::{AngleGate, Axis, DragConfig, SourceOptions, TargetOptions};
pub use orchestrator::Orchestrator;
pub use types::{
    Avatar, AvatarKind, AvatarRequest, CancelReason, DragDelegate, DragEvent, Input, Key,
    PointerKind, Reply, SourceId, Surface, TargetId,
};
