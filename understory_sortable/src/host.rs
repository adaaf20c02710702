// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The rendering layer as seen by the sortable engine.

use core::fmt::Debug;

use kurbo::Rect;

use crate::item::{ItemId, ZoneId};

/// What a rendered element stands for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElementMatch {
    /// The element renders an item.
    Item {
        /// Zone of the item.
        zone: ZoneId,
        /// The item.
        id: ItemId,
    },
    /// The element is a drop area for a child list: the zone root (`id: None`)
    /// or the children of a container item.
    Container {
        /// Zone of the list.
        zone: ZoneId,
        /// Owning container, or `None` for the zone root.
        id: Option<ItemId>,
    },
    /// The element is a swap placeholder standing for an item.
    Placeholder {
        /// Zone of the item.
        zone: ZoneId,
        /// The item the placeholder stands for.
        id: ItemId,
    },
}

impl ElementMatch {
    /// Zone the element belongs to.
    pub fn zone(&self) -> &ZoneId {
        match self {
            Self::Item { zone, .. } | Self::Container { zone, .. } | Self::Placeholder { zone, .. } => {
                zone
            }
        }
    }
}

/// Element tree, selectors and measurement supplied by the rendering layer.
pub trait SortableHost {
    /// Element handle.
    type Element: Copy + Eq + Debug;

    /// Returns the parent of `element`, or `None` for roots.
    fn parent_of(&self, element: Self::Element) -> Option<Self::Element>;

    /// Classify `element`; `None` if it is not part of any zone's rendering.
    fn match_element(&self, element: Self::Element) -> Option<ElementMatch>;

    /// Element currently rendering `item` of `zone`.
    fn element_of(&self, zone: &ZoneId, item: &ItemId) -> Option<Self::Element>;

    /// Layout box of `element` in world coordinates, ignoring any explicit size.
    fn measure(&mut self, element: Self::Element) -> Option<Rect>;

    /// Element rendering the drag avatar for `item`, if the host draws one.
    fn avatar_element(&self, zone: &ZoneId, item: &ItemId) -> Option<Self::Element> {
        let _ = (zone, item);
        None
    }

    /// Nearest element at or above `element` that [`match_element`](Self::match_element) recognizes.
    fn closest_match(&self, element: Self::Element) -> Option<(Self::Element, ElementMatch)> {
        let mut current = Some(element);
        while let Some(e) = current {
            if let Some(m) = self.match_element(e) {
                return Some((e, m));
            }
            current = self.parent_of(e);
        }
        None
    }
}
