// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter for Understory Scene.
//!
//! ## Feature
//!
//! Enable with `scene_adapter`.
//!
//! ## Notes
//!
//! Hit testing uses visible, pickable elements only, with the avatar's subtree hidden.
//! Elements flagged [`ElementFlags::INTERACTIVE`] are not implicit drag handles.

use kurbo::Point;
use understory_scene::{ElementFlags, ElementId, QueryFilter, Scene};

use crate::types::Surface;

impl Surface for Scene {
    type Element = ElementId;

    fn parent_of(&self, element: ElementId) -> Option<ElementId> {
        self.parent(element)
    }

    fn element_at(&self, position: Point, hidden: Option<ElementId>) -> Option<ElementId> {
        self.hit_test_point(position, QueryFilter::PICKING.hiding(hidden))
            .map(|hit| hit.element)
    }

    fn is_interactive(&self, element: ElementId) -> bool {
        self.flags(element)
            .is_some_and(|f| f.contains(ElementFlags::INTERACTIVE))
    }
}
