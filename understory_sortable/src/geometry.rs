// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animation-box geometry for FLIP transitions.
//!
//! Before a preview move the engine snapshots the rendered boxes of the
//! affected zones; after the host has laid out the new preview it snapshots them
//! again. [`compute_moving_items`] pairs the two snapshots for the items a move
//! actually displaces. Each [`AnimationItem`] carries the translation that makes
//! the element appear at its old place; animating that translation to zero
//! plays the move.
//!
//! Which items are displaced:
//! - same-list shift: the items between the old and new index, inclusive;
//! - transfer to another list: the source list from the vacated slot onward,
//!   and the destination list from the insertion point onward;
//! - into an empty container: the moved item only;
//! - swap: the two exchanged items.

use std::collections::BTreeMap;

use kurbo::{Rect, Vec2};

use crate::error::GeometryError;
use crate::host::SortableHost;
use crate::item::{ItemId, ZoneId};
use crate::position::ItemPosition;
use crate::tree::{ItemTree, Node};
use crate::zones::Zones;

/// Measured box of an item, with the boxes of its children for containers.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationBox {
    /// The item.
    pub id: ItemId,
    /// World-space layout box.
    pub rect: Rect,
    /// Children, for containers.
    pub items: Vec<AnimationBox>,
}

impl AnimationBox {
    /// Left edge.
    pub fn x(&self) -> f64 {
        self.rect.x0
    }

    /// Top edge.
    pub fn y(&self) -> f64 {
        self.rect.y0
    }

    /// Width.
    pub fn width(&self) -> f64 {
        self.rect.width()
    }

    /// Height.
    pub fn height(&self) -> f64 {
        self.rect.height()
    }

    /// Top edge.
    pub fn top(&self) -> f64 {
        self.rect.y0
    }

    /// Left edge.
    pub fn left(&self) -> f64 {
        self.rect.x0
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.rect.y1
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.rect.x1
    }

    /// This box or a descendant with `id`.
    pub fn find(&self, id: &ItemId) -> Option<&Self> {
        if &self.id == id {
            return Some(self);
        }
        self.items.iter().find_map(|b| b.find(id))
    }
}

/// Boxes per zone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoxCache {
    zones: BTreeMap<ZoneId, Vec<AnimationBox>>,
}

impl BoxCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no zone has been measured.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Returns true if `zone` has been measured.
    pub fn contains_zone(&self, zone: &ZoneId) -> bool {
        self.zones.contains_key(zone)
    }

    /// Boxes of `zone`'s root list.
    pub fn get(&self, zone: &ZoneId) -> Option<&[AnimationBox]> {
        self.zones.get(zone).map(Vec::as_slice)
    }

    /// Store the boxes of `zone`, replacing older ones.
    pub fn insert(&mut self, zone: ZoneId, boxes: Vec<AnimationBox>) {
        self.zones.insert(zone, boxes);
    }

    /// Box of `id` anywhere in `zone`.
    pub fn find(&self, zone: &ZoneId, id: &ItemId) -> Option<&AnimationBox> {
        self.zones.get(zone)?.iter().find_map(|b| b.find(id))
    }

    /// Forget every zone.
    pub fn clear(&mut self) {
        self.zones.clear();
    }
}

/// An item to animate after a move.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationItem {
    /// The item.
    pub id: ItemId,
    /// Zone the item is in after the move.
    pub zone: ZoneId,
    /// Box before the move.
    pub rect: Rect,
    /// Box after the move.
    pub target_rect: Rect,
    /// Translation already applied to the item through animated ancestors.
    pub parent_offset: Vec2,
}

impl AnimationItem {
    /// Translation to apply to the item's element (relative to its parent) so
    /// it shows at its old place.
    pub fn translation(&self) -> Vec2 {
        self.rect.origin() - self.target_rect.origin() - self.parent_offset
    }
}

/// How a move rearranged the trees.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveKind {
    /// Within one child list.
    Shift,
    /// Into another, non-empty child list.
    Transfer,
    /// Into a child list that held nothing else.
    IntoEmpty,
    /// Exchanged with another item.
    Swap {
        /// The other item.
        with: ItemId,
    },
}

/// A classified move, read off the trees before and after it.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveInfo {
    /// Classification.
    pub kind: MoveKind,
    /// Place of the moved item before the move.
    pub from: ItemPosition,
    /// Place of the moved item after the move.
    pub to: ItemPosition,
    /// The list the item left, after the move.
    pub source_list: Vec<ItemId>,
    /// The list the item joined, after the move.
    pub target_list: Vec<ItemId>,
    /// Containers enclosing the source list after the move, outermost first.
    pub source_ancestors: Vec<ItemId>,
    /// Containers enclosing the target list after the move, outermost first.
    pub target_ancestors: Vec<ItemId>,
}

impl MoveInfo {
    /// Classify the move of `item` from `source_zone` in `before` to `target_zone` in `after`.
    ///
    /// `swapped_with` names the other item of a swap. Returns `None` if the item
    /// cannot be found on either side.
    pub fn between<T: Clone>(
        before: &Zones<T>,
        after: &Zones<T>,
        item: &ItemId,
        source_zone: &ZoneId,
        target_zone: &ZoneId,
        swapped_with: Option<&ItemId>,
    ) -> Option<Self> {
        let from = before.current(source_zone)?.position_of(item, source_zone)?;
        let after_src = after.current(source_zone)?;
        let after_dst = after.current(target_zone)?;
        let to = after_dst.position_of(item, target_zone)?;
        let source_list = list(after_src, from.parent.as_ref())?;
        let target_list = list(after_dst, to.parent.as_ref())?;
        let kind = match swapped_with {
            Some(with) => MoveKind::Swap { with: with.clone() },
            None if source_zone == target_zone && from.parent == to.parent => MoveKind::Shift,
            None if target_list.len() == 1 => MoveKind::IntoEmpty,
            None => MoveKind::Transfer,
        };
        Some(Self {
            kind,
            source_ancestors: enclosing(after_src, from.parent.as_ref()),
            target_ancestors: enclosing(after_dst, to.parent.as_ref()),
            from,
            to,
            source_list,
            target_list,
        })
    }
}

fn list<T: Clone>(tree: &ItemTree<T>, parent: Option<&ItemId>) -> Option<Vec<ItemId>> {
    Some(tree.children(parent).ok()?.iter().cloned().collect())
}

fn enclosing<T: Clone>(tree: &ItemTree<T>, parent: Option<&ItemId>) -> Vec<ItemId> {
    match parent {
        None => Vec::new(),
        Some(p) => {
            let mut out = tree.ancestors(p);
            out.push(p.clone());
            out
        }
    }
}

/// Measure the element rendering `id`.
pub fn measure_box<H: SortableHost>(
    host: &mut H,
    zone: &ZoneId,
    id: &ItemId,
) -> Result<AnimationBox, GeometryError> {
    let missing = || GeometryError::MissingElement {
        zone: zone.clone(),
        item: id.clone(),
    };
    let element = host.element_of(zone, id).ok_or_else(missing)?;
    let rect = host.measure(element).ok_or_else(missing)?;
    Ok(AnimationBox {
        id: id.clone(),
        rect,
        items: Vec::new(),
    })
}

/// Measure every item of `tree` as rendered in `zone`.
///
/// Aborts on the first item the host has no element for.
pub fn measure_zone<H: SortableHost, T: Clone>(
    host: &mut H,
    zone: &ZoneId,
    tree: &ItemTree<T>,
) -> Result<Vec<AnimationBox>, GeometryError> {
    measure_list(host, zone, tree, tree.roots().iter())
}

fn measure_list<'a, H: SortableHost, T: Clone>(
    host: &mut H,
    zone: &ZoneId,
    tree: &'a ItemTree<T>,
    ids: impl Iterator<Item = &'a ItemId>,
) -> Result<Vec<AnimationBox>, GeometryError> {
    let mut out = Vec::new();
    for id in ids {
        let mut b = measure_box(host, zone, id)?;
        if let Some(children) = tree.get(id).and_then(Node::children) {
            b.items = measure_list(host, zone, tree, children.iter())?;
        }
        out.push(b);
    }
    Ok(out)
}

struct Displaced<'a> {
    id: &'a ItemId,
    before: &'a ZoneId,
    after: &'a ZoneId,
    ancestors: &'a [ItemId],
}

impl<'a> Displaced<'a> {
    fn new(id: &'a ItemId, before: &'a ZoneId, after: &'a ZoneId, ancestors: &'a [ItemId]) -> Self {
        Self {
            id,
            before,
            after,
            ancestors,
        }
    }
}

/// Items displaced by `info`, with their boxes from before (`boxes`) and after
/// (`target_boxes`) the move.
///
/// Items missing from either cache are skipped. Outer items come first, so
/// containers precede the items they carry.
pub fn compute_moving_items(
    info: &MoveInfo,
    boxes: &BoxCache,
    target_boxes: &BoxCache,
) -> Vec<AnimationItem> {
    let src = &info.from.zone;
    let dst = &info.to.zone;
    let item = &info.from.id;
    let mut displaced = Vec::new();
    match &info.kind {
        MoveKind::Shift => {
            let lo = info.from.index.min(info.to.index);
            let hi = info.from.index.max(info.to.index);
            for id in info.target_list.iter().take(hi + 1).skip(lo) {
                displaced.push(Displaced::new(id, dst, dst, &info.target_ancestors));
            }
        }
        MoveKind::Transfer => {
            for id in info.source_list.iter().skip(info.from.index) {
                displaced.push(Displaced::new(id, src, src, &info.source_ancestors));
            }
            for id in info.target_list.iter().skip(info.to.index) {
                let before = if id == item { src } else { dst };
                displaced.push(Displaced::new(id, before, dst, &info.target_ancestors));
            }
        }
        MoveKind::IntoEmpty => {
            displaced.push(Displaced::new(item, src, dst, &info.target_ancestors));
        }
        MoveKind::Swap { with } => {
            displaced.push(Displaced::new(item, src, dst, &info.target_ancestors));
            displaced.push(Displaced::new(with, dst, src, &info.source_ancestors));
        }
    }

    displaced.sort_by_key(|d| d.ancestors.len());
    let mut applied: BTreeMap<(&ZoneId, &ItemId), Vec2> = BTreeMap::new();
    let mut out = Vec::with_capacity(displaced.len());
    for d in displaced {
        let (Some(rect), Some(target_rect)) = (
            boxes.find(d.before, d.id).map(|b| b.rect),
            target_boxes.find(d.after, d.id).map(|b| b.rect),
        ) else {
            continue;
        };
        let parent_offset = d
            .ancestors
            .iter()
            .filter_map(|a| applied.get(&(d.after, a)))
            .fold(Vec2::ZERO, |acc, t| acc + *t);
        let moving = AnimationItem {
            id: d.id.clone(),
            zone: d.after.clone(),
            rect,
            target_rect,
            parent_offset,
        };
        applied.insert((d.after, d.id), moving.translation());
        out.push(moving);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;
    use crate::moves::move_item;
    use crate::position::DropPosition;
    use crate::zones::Zone;

    const ROW: f64 = 10.0;

    fn zones(entries: Vec<(&str, Vec<Item<()>>)>) -> Zones<()> {
        entries.into_iter().fold(Zones::new(), |zones, (id, items)| {
            zones.with(id.into(), Zone::new(ItemTree::from_items(items).unwrap()))
        })
    }

    fn leaves(ids: &[&str]) -> Vec<Item<()>> {
        ids.iter().map(|id| Item::leaf(*id, ())).collect()
    }

    /// Stack a list vertically: a container's header row is followed by its children.
    fn stack(tree: &ItemTree<()>, ids: &im::Vector<ItemId>, x: f64, y: &mut f64) -> Vec<AnimationBox> {
        let mut out = Vec::new();
        for id in ids {
            let top = *y;
            *y += ROW;
            let items = match tree.get(id).and_then(Node::children) {
                Some(children) => stack(tree, children, x + 5.0, y),
                None => Vec::new(),
            };
            out.push(AnimationBox {
                id: id.clone(),
                rect: Rect::new(x, top, x + 100.0, *y),
                items,
            });
        }
        out
    }

    fn layout(zones: &Zones<()>, columns: &[(&str, f64)]) -> BoxCache {
        let mut cache = BoxCache::new();
        for (zone, x) in columns {
            let tree = zones.current(&(*zone).into()).unwrap();
            let mut y = 0.0;
            cache.insert((*zone).into(), stack(tree, tree.roots(), *x, &mut y));
        }
        cache
    }

    fn moved(
        z: &Zones<()>,
        item: &str,
        src: &str,
        target: DropPosition,
        swap: bool,
    ) -> (Zones<()>, MoveInfo) {
        let from = z.current(&src.into()).unwrap().position_of(&item.into(), &src.into()).unwrap();
        let with = if swap { target.id.clone() } else { None };
        let after = move_item(z, &from, &target, swap);
        let info = MoveInfo::between(z, &after, &item.into(), &src.into(), &target.zone, with.as_ref())
            .unwrap();
        (after, info)
    }

    fn summary(items: &[AnimationItem]) -> Vec<(String, Vec2)> {
        items.iter().map(|i| (i.id.to_string(), i.translation())).collect()
    }

    #[test]
    fn box_accessors() {
        let b = AnimationBox {
            id: "a".into(),
            rect: Rect::new(1.0, 2.0, 11.0, 32.0),
            items: vec![AnimationBox {
                id: "b".into(),
                rect: Rect::ZERO,
                items: vec![],
            }],
        };
        assert_eq!((b.x(), b.y(), b.width(), b.height()), (1.0, 2.0, 10.0, 30.0));
        assert_eq!((b.left(), b.top(), b.right(), b.bottom()), (1.0, 2.0, 11.0, 32.0));
        assert_eq!(b.find(&"b".into()).unwrap().rect, Rect::ZERO);
        assert!(b.find(&"c".into()).is_none());
    }

    #[test]
    fn shift_only_touches_the_affected_range() {
        let z = zones(vec![("A", leaves(&["1", "2", "3", "4", "5"]))]);
        let before = layout(&z, &[("A", 0.0)]);
        let (after, info) = moved(&z, "1", "A", DropPosition::at("A", None, None, 3), false);
        assert_eq!(info.kind, MoveKind::Shift);
        let items = compute_moving_items(&info, &before, &layout(&after, &[("A", 0.0)]));
        assert_eq!(
            summary(&items),
            [
                ("2".into(), Vec2::new(0.0, ROW)),
                ("3".into(), Vec2::new(0.0, ROW)),
                ("4".into(), Vec2::new(0.0, ROW)),
                ("1".into(), Vec2::new(0.0, -3.0 * ROW)),
            ]
        );
    }

    #[test]
    fn transfer_touches_both_tails() {
        let z = zones(vec![("A", leaves(&["1", "2", "3"])), ("B", leaves(&["4", "5"]))]);
        let cols = [("A", 0.0), ("B", 200.0)];
        let before = layout(&z, &cols);
        let (after, info) = moved(&z, "2", "A", DropPosition::at("B", None, None, 1), false);
        assert_eq!(info.kind, MoveKind::Transfer);
        let items = compute_moving_items(&info, &before, &layout(&after, &cols));
        assert_eq!(
            summary(&items),
            [
                ("3".into(), Vec2::new(0.0, ROW)),
                ("2".into(), Vec2::new(-200.0, 0.0)),
                ("5".into(), Vec2::new(0.0, -ROW)),
            ]
        );
        assert_eq!(items[1].zone, ZoneId::from("B"));
    }

    #[test]
    fn into_empty_touches_only_the_item() {
        let z = zones(vec![("A", leaves(&["1", "2"])), ("B", vec![])]);
        let cols = [("A", 0.0), ("B", 200.0)];
        let before = layout(&z, &cols);
        let (after, info) = moved(&z, "2", "A", DropPosition::into_container("B", None), false);
        assert_eq!(info.kind, MoveKind::IntoEmpty);
        let items = compute_moving_items(&info, &before, &layout(&after, &cols));
        assert_eq!(summary(&items), [("2".into(), Vec2::new(-200.0, ROW))]);
    }

    #[test]
    fn swap_touches_the_pair() {
        let z = zones(vec![("A", leaves(&["1", "2", "3"]))]);
        let before = layout(&z, &[("A", 0.0)]);
        let (after, info) = moved(&z, "1", "A", DropPosition::onto("A", None, "3"), true);
        assert_eq!(info.kind, MoveKind::Swap { with: "3".into() });
        let items = compute_moving_items(&info, &before, &layout(&after, &[("A", 0.0)]));
        assert_eq!(
            summary(&items),
            [
                ("1".into(), Vec2::new(0.0, -2.0 * ROW)),
                ("3".into(), Vec2::new(0.0, 2.0 * ROW)),
            ]
        );
    }

    #[test]
    fn nested_items_subtract_their_container_translation() {
        // [1, g: [x]] -> [g: [1, x]]
        let z = zones(vec![(
            "A",
            vec![Item::leaf("1", ()), Item::group("g", (), vec![Item::leaf("x", ())])],
        )]);
        let before = layout(&z, &[("A", 0.0)]);
        let (after, info) = moved(&z, "1", "A", DropPosition::at("A", Some("g".into()), None, 0), false);
        assert_eq!(info.kind, MoveKind::Transfer);
        assert_eq!(info.target_ancestors, [ItemId::from("g")]);
        let items = compute_moving_items(&info, &before, &layout(&after, &[("A", 0.0)]));
        let g = items.iter().find(|i| i.id.as_str() == "g").unwrap();
        assert_eq!(g.translation(), Vec2::new(0.0, ROW));
        let one = items.iter().find(|i| i.id.as_str() == "1").unwrap();
        assert_eq!(one.parent_offset, Vec2::new(0.0, ROW));
        assert_eq!(one.translation(), Vec2::new(-5.0, -2.0 * ROW));
        let x = items.iter().find(|i| i.id.as_str() == "x").unwrap();
        assert_eq!(x.translation(), Vec2::new(0.0, -ROW));
    }

    #[test]
    fn unmeasured_items_are_skipped() {
        let z = zones(vec![("A", leaves(&["1", "2"]))]);
        let (_, info) = moved(&z, "1", "A", DropPosition::at("A", None, None, 1), false);
        assert!(compute_moving_items(&info, &BoxCache::new(), &BoxCache::new()).is_empty());
    }
}
