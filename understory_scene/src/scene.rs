// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core scene implementation: structure, updates, queries.

use alloc::vec::Vec;
use kurbo::{Point, Rect, Size, Vec2};

use crate::types::{ElementFlags, ElementId, LocalElement};

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// An arena of positioned elements.
///
/// Elements form a forest: each element has at most one parent and an ordered
/// list of children. Geometry is resolved on demand from the chain of offsets,
/// so there is no commit step and no cached world state to invalidate.
pub struct Scene {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Scene")
            .field("elements_total", &total)
            .field("elements_alive", &alive)
            .field("free_list", &free)
            .finish_non_exhaustive()
    }
}

/// Results of a hit test.
#[derive(Clone, Debug)]
pub struct Hit {
    /// The matched element.
    pub element: ElementId,
    /// Path from root to element (inclusive).
    pub path: Vec<ElementId>,
}

/// Filters applied during hit testing.
///
/// Used by [`Scene::hit_test_point`].
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryFilter {
    /// If true, skip elements (and their subtrees) not marked [`ElementFlags::VISIBLE`].
    pub visible_only: bool,
    /// If true, only consider elements marked [`ElementFlags::PICKABLE`].
    pub pickable_only: bool,
    /// An element whose whole subtree is treated as hidden for this query.
    ///
    /// A drag avatar follows the pointer, so it is always under it; hiding it
    /// reveals what the avatar is hovering.
    pub hidden: Option<ElementId>,
}

impl QueryFilter {
    /// Visible and pickable elements only, nothing hidden.
    pub const PICKING: Self = Self {
        visible_only: true,
        pickable_only: true,
        hidden: None,
    };

    /// Return a copy of this filter that hides `element`'s subtree.
    pub fn hiding(self, element: Option<ElementId>) -> Self {
        Self {
            hidden: element,
            ..self
        }
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    local: LocalElement,
}

impl Node {
    fn new(generation: u32, local: LocalElement) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            local,
        }
    }
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Insert a new element as the last child of `parent` (or as a root if `None`).
    pub fn insert(&mut self, parent: Option<ElementId>, local: LocalElement) -> ElementId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, local));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, local)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = ElementId::new(idx, generation);
        if let Some(p) = parent.filter(|p| self.is_alive(*p)) {
            self.link_parent(id, p, None);
        }
        id
    }

    /// Remove an element (and its subtree) from the scene.
    pub fn remove(&mut self, id: ElementId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Move `id` under `new_parent` at `index` (appended when `None` or out of range).
    ///
    /// Reparenting an element under itself or one of its descendants is ignored.
    pub fn reparent(&mut self, id: ElementId, new_parent: Option<ElementId>, index: Option<usize>) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(p) = new_parent {
            if !self.is_alive(p) || self.contains(id, p) {
                return;
            }
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        if let Some(p) = new_parent {
            self.link_parent(id, p, index);
        }
    }

    /// Update the offset relative to the parent.
    pub fn set_offset(&mut self, id: ElementId, offset: Vec2) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.offset = offset;
        }
    }

    /// Update the intrinsic size.
    pub fn set_intrinsic_size(&mut self, id: ElementId, size: Size) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.intrinsic_size = size;
        }
    }

    /// Apply or clear explicit size styling.
    pub fn set_explicit_size(&mut self, id: ElementId, size: Option<Size>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.explicit_size = size;
        }
    }

    /// Update z index.
    pub fn set_z_index(&mut self, id: ElementId, z: i32) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.z_index = z;
        }
    }

    /// Update element flags.
    pub fn set_flags(&mut self, id: ElementId, flags: ElementFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.flags = flags;
        }
    }

    /// Returns true if `id` refers to a live element.
    ///
    /// An `ElementId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Local data of a live element.
    pub fn local(&self, id: ElementId) -> Option<&LocalElement> {
        self.node_opt(id).map(|n| &n.local)
    }

    /// Flags of a live element.
    pub fn flags(&self, id: ElementId) -> Option<ElementFlags> {
        self.node_opt(id).map(|n| n.local.flags)
    }

    /// Parent of a live element, `None` for roots and stale ids.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Children of a live element in insertion order.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Returns true if `id` is `ancestor` or lies in its subtree.
    pub fn contains(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.parent(c);
        }
        false
    }

    /// Cumulative offset of the element's origin from the scene origin.
    pub fn world_origin(&self, id: ElementId) -> Option<Point> {
        let mut node = self.node_opt(id)?;
        let mut origin = Point::ORIGIN + node.local.offset;
        while let Some(p) = node.parent {
            node = self.node_opt(p)?;
            origin += node.local.offset;
        }
        Some(origin)
    }

    /// World-space box as currently rendered (explicit size wins).
    pub fn world_bounds(&self, id: ElementId) -> Option<Rect> {
        let origin = self.world_origin(id)?;
        let size = self.node_opt(id)?.local.rendered_size();
        Some(Rect::from_origin_size(origin, size))
    }

    /// Measure the element's natural world-space box.
    ///
    /// Explicit size styling is cleared while reading the box and restored
    /// afterwards, so a size pinned for an in-flight animation does not leak
    /// into the measurement.
    pub fn measure(&mut self, id: ElementId) -> Option<Rect> {
        let saved = self.node_opt_mut(id)?.local.explicit_size.take();
        let measured = self.world_bounds(id);
        if let Some(n) = self.node_opt_mut(id) {
            n.local.explicit_size = saved;
        }
        measured
    }

    /// Hit test a world-space point. Returns the topmost element.
    ///
    /// Elements paint after their parent, siblings paint in ascending `z_index`
    /// and insertion order within equal z. The last painted element containing
    /// the point wins.
    pub fn hit_test_point(&self, pt: Point, filter: QueryFilter) -> Option<Hit> {
        let roots: Vec<ElementId> = self
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| match n {
                Some(n) if n.parent.is_none() =>
                {
                    #[allow(
                        clippy::cast_possible_truncation,
                        reason = "ElementId uses 32-bit indices by design."
                    )]
                    Some(ElementId::new(i as u32, n.generation))
                }
                _ => None,
            })
            .collect();

        let mut best = None;
        for root in self.paint_order(&roots) {
            self.hit_recursive(root, Point::ORIGIN, pt, filter, &mut best);
        }
        best.map(|element| Hit {
            element,
            path: self.path_to_root(element),
        })
    }

    // --- internals ---

    fn node(&self, id: ElementId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling ElementId")
    }

    fn node_mut(&mut self, id: ElementId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling ElementId")
    }

    fn node_opt(&self, id: ElementId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn node_opt_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: ElementId, parent: ElementId, index: Option<usize>) {
        let parent_node = self.node_mut(parent);
        match index {
            Some(i) if i <= parent_node.children.len() => parent_node.children.insert(i, id),
            _ => parent_node.children.push(id),
        }
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: ElementId, parent: ElementId) {
        let p = self.node_mut(parent);
        p.children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }

    fn paint_order(&self, ids: &[ElementId]) -> Vec<ElementId> {
        let mut ordered = ids.to_vec();
        ordered.sort_by_key(|id| self.node(*id).local.z_index);
        ordered
    }

    fn path_to_root(&self, mut id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        loop {
            out.push(id);
            match self.node(id).parent {
                Some(p) => id = p,
                None => break,
            }
        }
        out.reverse();
        out
    }

    fn hit_recursive(
        &self,
        id: ElementId,
        parent_origin: Point,
        pt: Point,
        filter: QueryFilter,
        best: &mut Option<ElementId>,
    ) {
        if filter.hidden == Some(id) {
            return;
        }
        let node = self.node(id);
        if filter.visible_only && !node.local.flags.contains(ElementFlags::VISIBLE) {
            return;
        }
        let origin = parent_origin + node.local.offset;
        let bounds = Rect::from_origin_size(origin, node.local.rendered_size());
        let pickable =
            !filter.pickable_only || node.local.flags.contains(ElementFlags::PICKABLE);
        if pickable && bounds.contains(pt) {
            *best = Some(id);
        }
        for child in self.paint_order(&node.children) {
            self.hit_recursive(child, origin, pt, filter, best);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(x: f64, y: f64, w: f64, h: f64) -> LocalElement {
        LocalElement::at(Vec2::new(x, y), Size::new(w, h))
    }

    #[test]
    fn insert_and_hit_test() {
        let mut scene = Scene::new();
        let root = scene.insert(None, boxed(0.0, 0.0, 200.0, 200.0));
        let _a = scene.insert(Some(root), boxed(10.0, 10.0, 50.0, 50.0));
        let b = scene.insert(
            Some(root),
            LocalElement {
                z_index: 10,
                ..boxed(40.0, 40.0, 80.0, 80.0)
            },
        );

        let hit = scene
            .hit_test_point(Point::new(50.0, 50.0), QueryFilter::PICKING)
            .unwrap();
        assert_eq!(hit.element, b, "topmost by z should win");
        assert_eq!(hit.path.first().copied(), Some(root));
        assert_eq!(hit.path.last().copied(), Some(b));
    }

    #[test]
    fn offsets_accumulate() {
        let mut scene = Scene::new();
        let root = scene.insert(None, boxed(5.0, 5.0, 100.0, 100.0));
        let list = scene.insert(Some(root), boxed(10.0, 20.0, 80.0, 60.0));
        let row = scene.insert(Some(list), boxed(0.0, 30.0, 80.0, 30.0));
        assert_eq!(scene.world_origin(row), Some(Point::new(15.0, 55.0)));
        assert_eq!(
            scene.world_bounds(row),
            Some(Rect::new(15.0, 55.0, 95.0, 85.0))
        );
    }

    #[test]
    fn hidden_subtree_reveals_element_below() {
        let mut scene = Scene::new();
        let root = scene.insert(None, boxed(0.0, 0.0, 100.0, 100.0));
        let row = scene.insert(Some(root), boxed(0.0, 0.0, 100.0, 20.0));
        let avatar = scene.insert(
            Some(root),
            LocalElement {
                z_index: 100,
                ..boxed(0.0, 0.0, 100.0, 20.0)
            },
        );
        let label = scene.insert(Some(avatar), boxed(0.0, 0.0, 50.0, 20.0));

        let pt = Point::new(10.0, 10.0);
        let hit = scene.hit_test_point(pt, QueryFilter::PICKING).unwrap();
        assert_eq!(hit.element, label);

        let hit = scene
            .hit_test_point(pt, QueryFilter::PICKING.hiding(Some(avatar)))
            .unwrap();
        assert_eq!(hit.element, row, "avatar subtree must be skipped");
    }

    #[test]
    fn invisible_and_unpickable() {
        let mut scene = Scene::new();
        let root = scene.insert(None, boxed(0.0, 0.0, 100.0, 100.0));
        let a = scene.insert(Some(root), boxed(0.0, 0.0, 50.0, 50.0));
        let inner = scene.insert(Some(a), boxed(0.0, 0.0, 10.0, 10.0));
        let pt = Point::new(5.0, 5.0);

        scene.set_flags(a, ElementFlags::VISIBLE);
        let hit = scene.hit_test_point(pt, QueryFilter::PICKING).unwrap();
        assert_eq!(hit.element, inner, "unpickable parent still passes to children");

        scene.set_flags(a, ElementFlags::PICKABLE);
        let hit = scene.hit_test_point(pt, QueryFilter::PICKING).unwrap();
        assert_eq!(hit.element, root, "invisible parent hides its subtree");
    }

    #[test]
    fn measure_ignores_and_restores_explicit_size() {
        let mut scene = Scene::new();
        let root = scene.insert(None, boxed(0.0, 0.0, 300.0, 300.0));
        let row = scene.insert(Some(root), boxed(0.0, 40.0, 120.0, 30.0));
        scene.set_explicit_size(row, Some(Size::new(10.0, 10.0)));

        assert_eq!(
            scene.world_bounds(row),
            Some(Rect::new(0.0, 40.0, 10.0, 50.0))
        );
        assert_eq!(scene.measure(row), Some(Rect::new(0.0, 40.0, 120.0, 70.0)));
        assert_eq!(
            scene.local(row).and_then(|l| l.explicit_size),
            Some(Size::new(10.0, 10.0)),
            "explicit size must be restored after measuring"
        );
    }

    #[test]
    fn reparent_keeps_order_and_refuses_cycles() {
        let mut scene = Scene::new();
        let root = scene.insert(None, LocalElement::default());
        let a = scene.insert(Some(root), LocalElement::default());
        let b = scene.insert(Some(root), LocalElement::default());
        let c = scene.insert(Some(a), LocalElement::default());

        scene.reparent(b, Some(root), Some(0));
        assert_eq!(scene.children(root), &[b, a]);

        scene.reparent(a, Some(c), None);
        assert_eq!(scene.parent(a), Some(root), "cannot move under own descendant");

        scene.reparent(c, Some(b), None);
        assert_eq!(scene.children(b), &[c]);
        assert!(scene.children(a).is_empty());
        assert!(scene.contains(root, c));
    }

    #[test]
    fn liveness_insert_remove_reuse() {
        let mut scene = Scene::new();
        let root = scene.insert(None, boxed(0.0, 0.0, 1.0, 1.0));
        let a = scene.insert(Some(root), boxed(0.0, 0.0, 1.0, 1.0));

        assert!(scene.is_alive(root));
        assert!(scene.is_alive(a));

        // Remove child; id becomes stale.
        scene.remove(a);
        assert!(!scene.is_alive(a));
        assert!(scene.children(root).is_empty());

        // Reuse slot by inserting a new element; old id must remain stale.
        let b = scene.insert(Some(root), boxed(0.0, 0.0, 1.0, 1.0));
        assert!(scene.is_alive(b));
        assert!(!scene.is_alive(a));
        if a.0 == b.0 {
            assert!(b.1 > a.1, "generation must increase on reuse");
        }
        assert_eq!(scene.world_bounds(a), None, "stale ids resolve to nothing");
    }
}
