// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_scene --heading-base-level=0

//! Understory Scene: a Kurbo-native arena of positioned elements.
//!
//! Understory Scene is the stand-in for a document tree when driving pointer
//! interactions headlessly: drag-and-drop engines, gesture tests, and tools
//! that need "what is under the pointer" and "where is this element" answers
//! without a browser or a windowing toolkit.
//!
//! - Represents a hierarchy of elements with parent-relative offsets, an intrinsic size, and optional explicit size styling.
//! - Provides hit testing with a hidden subtree (for example a drag avatar that follows the pointer).
//! - Measures an element's natural box with explicit sizing temporarily cleared.
//!
//! ## Not a layout engine
//!
//! This crate does not perform layout. Upstream code positions elements and
//! assigns sizes; the scene only resolves world-space geometry from them.
//!
//! ## API overview
//!
//! - [`Scene`]: container managing elements.
//! - [`LocalElement`]: per-element offset, sizes, z-order, and flags.
//! - [`ElementFlags`]: visibility, picking, and interactivity.
//! - [`ElementId`]: generational handle of an element.
//! - [`QueryFilter`]: restricts hit results and hides a subtree.
//!
//! ### Minimal usage
//!
//! ```
//! use understory_scene::{LocalElement, QueryFilter, Scene};
//! use kurbo::{Point, Size, Vec2};
//!
//! let mut scene = Scene::new();
//! let list = scene.insert(None, LocalElement::at(Vec2::ZERO, Size::new(200.0, 90.0)));
//! let first = scene.insert(Some(list), LocalElement::at(Vec2::ZERO, Size::new(200.0, 30.0)));
//! let second = scene.insert(Some(list), LocalElement::at(Vec2::new(0.0, 30.0), Size::new(200.0, 30.0)));
//!
//! let hit = scene.hit_test_point(Point::new(10.0, 40.0), QueryFilter::PICKING).unwrap();
//! assert_eq!(hit.element, second);
//! assert_eq!(hit.path, vec![list, second]);
//!
//! // Hiding `second` reveals the list behind it.
//! let hit = scene
//!     .hit_test_point(Point::new(10.0, 40.0), QueryFilter::PICKING.hiding(Some(second)))
//!     .unwrap();
//! assert_eq!(hit.element, list);
//! # let _ = first;
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod scene;
mod types;

pub use scene::{Hit, QueryFilter, Scene};
pub use types::{ElementFlags, ElementId, LocalElement};
