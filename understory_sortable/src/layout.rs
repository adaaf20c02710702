// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A headless [`SortableHost`] over an [`understory_scene::Scene`].
//!
//! [`SceneHost`] lays every zone out as a vertical stack of fixed-height rows.
//! A container item gets a header row followed by an indented child list.
//! Rendering reconciles against the previous frame: an item keeps its element
//! for as long as it stays in the same zone, so element handles held by the
//! drag orchestrator survive a re-render.

use std::collections::{BTreeMap, BTreeSet};

use im::Vector;
use kurbo::{Point, Rect, Size, Vec2};
use understory_scene::{ElementId, LocalElement, Scene};

use crate::host::{ElementMatch, SortableHost};
use crate::item::{ItemId, ZoneId};
use crate::tree::{ItemTree, Node};
use crate::zones::Zones;

/// Row metrics used by [`SceneHost`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RowLayout {
    /// Height of one item row.
    pub row_height: f64,
    /// Horizontal indent of a child list.
    pub indent: f64,
    /// Height given to an empty list so it stays a drop area.
    pub empty_height: f64,
}

impl Default for RowLayout {
    fn default() -> Self {
        Self {
            row_height: 20.0,
            indent: 16.0,
            empty_height: 10.0,
        }
    }
}

#[derive(Clone, Debug)]
struct ZoneView {
    root: ElementId,
    width: f64,
    swap: bool,
}

/// Renders zones into a [`Scene`] and answers the engine's element queries.
#[derive(Debug)]
pub struct SceneHost {
    scene: Scene,
    layout: RowLayout,
    zones: BTreeMap<ZoneId, ZoneView>,
    matches: BTreeMap<ElementId, ElementMatch>,
    rows: BTreeMap<(ZoneId, ItemId), ElementId>,
    lists: BTreeMap<(ZoneId, ItemId), ElementId>,
    avatar: ElementId,
}

impl Default for SceneHost {
    fn default() -> Self {
        Self::new(RowLayout::default())
    }
}

impl SceneHost {
    /// An empty scene holding only the (collapsed) avatar element.
    pub fn new(layout: RowLayout) -> Self {
        let mut scene = Scene::new();
        let mut avatar = LocalElement::at(Vec2::ZERO, Size::ZERO);
        avatar.z_index = 1000;
        let avatar = scene.insert(None, avatar);
        Self {
            scene,
            layout,
            zones: BTreeMap::new(),
            matches: BTreeMap::new(),
            rows: BTreeMap::new(),
            lists: BTreeMap::new(),
            avatar,
        }
    }

    /// The rendered scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Row metrics.
    pub fn layout(&self) -> RowLayout {
        self.layout
    }

    /// Add a zone whose root list starts at `origin` and is `width` wide.
    ///
    /// In a `swap` zone items render as swap placeholders. Returns the root
    /// element, which is the zone's drop area.
    pub fn add_zone(
        &mut self,
        zone: impl Into<ZoneId>,
        origin: Point,
        width: f64,
        swap: bool,
    ) -> ElementId {
        let zone = zone.into();
        let size = Size::new(width, self.layout.empty_height);
        let root = self.scene.insert(None, LocalElement::at(origin.to_vec2(), size));
        self.matches.insert(
            root,
            ElementMatch::Container {
                zone: zone.clone(),
                id: None,
            },
        );
        self.zones.insert(zone, ZoneView { root, width, swap });
        root
    }

    /// Root element of `zone`.
    pub fn zone_root(&self, zone: &ZoneId) -> Option<ElementId> {
        self.zones.get(zone).map(|v| v.root)
    }

    /// Element rendering the child list of container `item`.
    pub fn list_element(&self, zone: &ZoneId, item: &ItemId) -> Option<ElementId> {
        self.lists.get(&(zone.clone(), item.clone())).copied()
    }

    /// Re-render every zone known to both `zones` and this host.
    pub fn render_all<T: Clone>(&mut self, zones: &Zones<T>) {
        for (zone, z) in zones.iter() {
            self.render(zone, z.current());
        }
    }

    /// Re-render `zone` from `tree`. Unknown zones are ignored.
    pub fn render<T: Clone>(&mut self, zone: &ZoneId, tree: &ItemTree<T>) {
        let Some(view) = self.zones.get(zone).cloned() else {
            return;
        };
        let mut seen = BTreeSet::new();
        let height = self.place(zone, tree, tree.roots(), view.root, view.width, view.swap, &mut seen);
        self.scene.set_intrinsic_size(
            view.root,
            Size::new(view.width, height.max(self.layout.empty_height)),
        );

        let stale: Vec<(ItemId, ElementId)> = self
            .rows
            .iter()
            .filter(|((z, id), _)| z == zone && !seen.contains(id))
            .map(|((_, id), el)| (id.clone(), *el))
            .collect();
        for (id, row) in stale {
            let key = (zone.clone(), id);
            self.rows.remove(&key);
            self.matches.remove(&row);
            if let Some(list) = self.lists.remove(&key) {
                self.matches.remove(&list);
            }
            self.scene.remove(row);
        }
    }

    fn place<T: Clone>(
        &mut self,
        zone: &ZoneId,
        tree: &ItemTree<T>,
        ids: &Vector<ItemId>,
        parent: ElementId,
        width: f64,
        swap: bool,
        seen: &mut BTreeSet<ItemId>,
    ) -> f64 {
        let RowLayout {
            row_height,
            indent,
            empty_height,
        } = self.layout;
        let mut y = 0.0;
        for (index, id) in ids.iter().enumerate() {
            seen.insert(id.clone());
            let key = (zone.clone(), id.clone());
            let row = match self.rows.get(&key) {
                Some(&row) => {
                    self.scene.reparent(row, Some(parent), Some(index));
                    row
                }
                None => {
                    let row = self.scene.insert(Some(parent), LocalElement::at(Vec2::ZERO, Size::ZERO));
                    self.rows.insert(key.clone(), row);
                    row
                }
            };
            let matched = if swap {
                ElementMatch::Placeholder {
                    zone: zone.clone(),
                    id: id.clone(),
                }
            } else {
                ElementMatch::Item {
                    zone: zone.clone(),
                    id: id.clone(),
                }
            };
            self.matches.insert(row, matched);
            self.scene.set_offset(row, Vec2::new(0.0, y));

            let mut height = row_height;
            if let Some(children) = tree.get(id).and_then(Node::children) {
                let inner_width = (width - indent).max(0.0);
                let list = match self.lists.get(&key) {
                    Some(&list) => list,
                    None => {
                        let list = self.scene.insert(
                            Some(row),
                            LocalElement::at(Vec2::new(indent, row_height), Size::ZERO),
                        );
                        self.matches.insert(
                            list,
                            ElementMatch::Container {
                                zone: zone.clone(),
                                id: Some(id.clone()),
                            },
                        );
                        self.lists.insert(key, list);
                        list
                    }
                };
                let inner = self
                    .place(zone, tree, children, list, inner_width, swap, seen)
                    .max(empty_height);
                self.scene.set_intrinsic_size(list, Size::new(inner_width, inner));
                height += inner;
            }
            self.scene.set_intrinsic_size(row, Size::new(width, height));
            y += height;
        }
        y
    }

    /// Element drawn under the pointer while dragging.
    pub fn avatar(&self) -> ElementId {
        self.avatar
    }

    /// Show the avatar at `origin` with the size of one row.
    pub fn place_avatar(&mut self, origin: Point, width: f64) {
        self.scene.set_offset(self.avatar, origin.to_vec2());
        self.scene
            .set_intrinsic_size(self.avatar, Size::new(width, self.layout.row_height));
    }

    /// Collapse the avatar so it no longer covers anything.
    pub fn park_avatar(&mut self) {
        self.scene.set_intrinsic_size(self.avatar, Size::ZERO);
    }
}

impl SortableHost for SceneHost {
    type Element = ElementId;

    fn parent_of(&self, element: ElementId) -> Option<ElementId> {
        self.scene.parent(element)
    }

    fn match_element(&self, element: ElementId) -> Option<ElementMatch> {
        self.matches.get(&element).cloned()
    }

    fn element_of(&self, zone: &ZoneId, item: &ItemId) -> Option<ElementId> {
        self.rows.get(&(zone.clone(), item.clone())).copied()
    }

    fn measure(&mut self, element: ElementId) -> Option<Rect> {
        self.scene.measure(element)
    }

    fn avatar_element(&self, _zone: &ZoneId, _item: &ItemId) -> Option<ElementId> {
        Some(self.avatar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;
    use understory_scene::QueryFilter;

    fn tree() -> ItemTree<()> {
        ItemTree::from_items(vec![
            Item::leaf("a", ()),
            Item::group("g", (), vec![Item::leaf("b", ()), Item::leaf("c", ())]),
            Item::group("e", (), vec![]),
            Item::leaf("d", ()),
        ])
        .unwrap()
    }

    fn host() -> (SceneHost, ZoneId) {
        let mut host = SceneHost::default();
        let zone = ZoneId::new("z");
        host.add_zone(zone.clone(), Point::new(100.0, 50.0), 200.0, false);
        host.render(&zone, &tree());
        (host, zone)
    }

    fn rect_of(host: &mut SceneHost, zone: &ZoneId, id: &str) -> Rect {
        let el = host.element_of(zone, &ItemId::new(id)).unwrap();
        host.measure(el).unwrap()
    }

    #[test]
    fn rows_stack_with_indented_children() {
        let (mut host, zone) = host();
        assert_eq!(rect_of(&mut host, &zone, "a"), Rect::new(100.0, 50.0, 300.0, 70.0));
        // Header row plus two child rows.
        assert_eq!(rect_of(&mut host, &zone, "g"), Rect::new(100.0, 70.0, 300.0, 130.0));
        assert_eq!(rect_of(&mut host, &zone, "b"), Rect::new(116.0, 90.0, 300.0, 110.0));
        assert_eq!(rect_of(&mut host, &zone, "c"), Rect::new(116.0, 110.0, 300.0, 130.0));
        // Empty container keeps a drop area.
        assert_eq!(rect_of(&mut host, &zone, "e"), Rect::new(100.0, 130.0, 300.0, 160.0));
        assert_eq!(rect_of(&mut host, &zone, "d"), Rect::new(100.0, 160.0, 300.0, 180.0));
        let root = host.zone_root(&zone).unwrap();
        assert_eq!(host.measure(root), Some(Rect::new(100.0, 50.0, 300.0, 180.0)));
    }

    #[test]
    fn hit_test_maps_to_items_and_lists() {
        let (host, zone) = host();
        let hit = |p: Point| {
            let h = host.scene().hit_test_point(p, QueryFilter::PICKING).unwrap();
            host.closest_match(h.element).map(|(_, m)| m)
        };
        assert_eq!(
            hit(Point::new(150.0, 95.0)),
            Some(ElementMatch::Item {
                zone: zone.clone(),
                id: ItemId::new("b")
            })
        );
        assert_eq!(
            hit(Point::new(150.0, 155.0)),
            Some(ElementMatch::Container {
                zone: zone.clone(),
                id: Some(ItemId::new("e"))
            })
        );
        assert_eq!(
            hit(Point::new(105.0, 95.0)),
            Some(ElementMatch::Item {
                zone,
                id: ItemId::new("g")
            })
        );
    }

    #[test]
    fn rerender_keeps_elements_of_surviving_items() {
        let (mut host, zone) = host();
        let b = host.element_of(&zone, &ItemId::new("b")).unwrap();
        let moved = ItemTree::from_items(vec![
            Item::leaf("b", ()),
            Item::leaf("a", ()),
            Item::group("g", (), vec![Item::leaf("c", ())]),
        ])
        .unwrap();
        host.render(&zone, &moved);
        assert_eq!(host.element_of(&zone, &ItemId::new("b")), Some(b));
        assert_eq!(host.scene().parent(b), host.zone_root(&zone));
        assert_eq!(rect_of(&mut host, &zone, "b"), Rect::new(100.0, 50.0, 300.0, 70.0));
        assert!(host.element_of(&zone, &ItemId::new("d")).is_none());
        assert!(host.list_element(&zone, &ItemId::new("e")).is_none());
    }

    #[test]
    fn swap_zones_render_placeholders() {
        let mut host = SceneHost::default();
        let zone = ZoneId::new("t");
        host.add_zone(zone.clone(), Point::ZERO, 100.0, true);
        host.render(&zone, &tree());
        let a = host.element_of(&zone, &ItemId::new("a")).unwrap();
        assert!(matches!(
            host.match_element(a),
            Some(ElementMatch::Placeholder { .. })
        ));
    }

    #[test]
    fn parked_avatar_is_never_hit() {
        let (mut host, _) = host();
        host.place_avatar(Point::new(100.0, 50.0), 200.0);
        let top = host.scene().hit_test_point(Point::new(150.0, 60.0), QueryFilter::PICKING);
        assert_eq!(top.map(|h| h.element), Some(host.avatar()));
        host.park_avatar();
        let top = host.scene().hit_test_point(Point::new(150.0, 60.0), QueryFilter::PICKING);
        assert_ne!(top.map(|h| h.element), Some(host.avatar()));
    }
}
