// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The controller tying the drag orchestrator to the sortable state machine.
//!
//! [`Sortable`] answers [`DragEvent`]s from an [`understory_drag::Orchestrator`]
//! and turns them into state transitions and outbound [`SortEvent`]s.
//!
//! Moving over a new element only records it. The move itself happens in
//! [`Sortable::on_frame`], once per rendered frame: the pre-move boxes are
//! measured, the preview trees change, and on the following frame (after the
//! host re-rendered the previews) the post-move boxes are measured and the
//! animation items are reported with [`SortEvent::SortMove`].

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, trace};
use understory_drag::{Avatar, DragDelegate, DragEvent, Reply};

use crate::error::{GeometryError, TreeError};
use crate::geometry::{
    AnimationBox, AnimationItem, BoxCache, MoveInfo, compute_moving_items, measure_zone,
};
use crate::host::{ElementMatch, SortableHost};
use crate::item::{Item, ItemId, ZoneId};
use crate::options::{SortableOptions, ZoneOptions};
use crate::resolve::{Resolution, resolve};
use crate::state::SortableState;
use crate::tree::ItemTree;

/// Outbound notifications, drained with [`Sortable::drain_events`].
#[derive(Clone, Debug, PartialEq)]
pub enum SortEvent {
    /// A drag picked up an item.
    SortStart {
        /// The dragged item.
        item_id: ItemId,
        /// Its container, `None` at the zone root.
        parent_id: Option<ItemId>,
        /// Its zone.
        zone_id: ZoneId,
    },
    /// The preview changed.
    SortMove {
        /// Item the drop was resolved against, if any.
        target_id: Option<ItemId>,
        /// Index of the dragged item in its new list.
        target_index: usize,
        /// Container of the new list.
        target_parent_id: Option<ItemId>,
        /// Zone of the new list.
        target_zone_id: ZoneId,
        /// The move was a swap.
        swap_with_placeholder: bool,
        /// Displaced items to animate; empty if measuring failed.
        animate: Vec<AnimationItem>,
    },
    /// The drag was dropped and the previews committed.
    Sort {
        /// The dragged item.
        id: ItemId,
        /// Index before the drag.
        source_index: usize,
        /// Zone before the drag.
        source_zone_id: ZoneId,
        /// Container before the drag.
        source_parent_id: Option<ItemId>,
        /// Last item the drop was resolved against.
        target_id: Option<ItemId>,
        /// Index after the drag.
        target_index: usize,
        /// Zone after the drag.
        target_zone_id: ZoneId,
        /// Container after the drag.
        target_parent_id: Option<ItemId>,
    },
    /// The drag ended without a drop and every zone was rolled back.
    SortCancel,
}

#[derive(Debug)]
struct PendingMove {
    info: Option<MoveInfo>,
    boxes: BoxCache,
    resolution: Resolution,
}

/// Drag-to-reorder controller over zones of `T` items rendered as `E` elements.
#[derive(Debug)]
pub struct Sortable<T, E> {
    state: SortableState<T>,
    zones: BTreeMap<ZoneId, ZoneOptions>,
    options: SortableOptions,
    hovered: Option<E>,
    awaiting_layout: Option<PendingMove>,
    events: Vec<SortEvent>,
}

impl<T: Clone, E: Copy + Eq + fmt::Debug> Default for Sortable<T, E> {
    fn default() -> Self {
        Self::new(SortableOptions::default())
    }
}

impl<T: Clone, E: Copy + Eq + fmt::Debug> Sortable<T, E> {
    /// A controller with no zones.
    pub fn new(options: SortableOptions) -> Self {
        Self {
            state: SortableState::new(),
            zones: BTreeMap::new(),
            options,
            hovered: None,
            awaiting_layout: None,
            events: Vec::new(),
        }
    }

    /// Controller-wide settings.
    pub fn options(&self) -> &SortableOptions {
        &self.options
    }

    /// The state machine.
    pub fn state(&self) -> &SortableState<T> {
        &self.state
    }

    /// Returns true while a drag is in progress.
    pub fn is_sorting(&self) -> bool {
        self.state.is_sorting()
    }

    /// Register (or replace) `zone` holding `items`.
    pub fn add_zone(
        &mut self,
        zone: impl Into<ZoneId>,
        options: ZoneOptions,
        items: Vec<Item<T>>,
    ) -> Result<(), TreeError> {
        let zone = zone.into();
        let tree = ItemTree::from_items(items)?;
        debug!(zone = %zone, items = tree.len(), "zone registered");
        self.state = self.state.with_zone(zone.clone(), tree);
        self.zones.insert(zone, options);
        Ok(())
    }

    /// Replace the items of a registered zone.
    pub fn set_items(&mut self, zone: &ZoneId, items: Vec<Item<T>>) -> Result<(), TreeError> {
        if !self.zones.contains_key(zone) {
            return Err(TreeError::UnknownZone(zone.clone()));
        }
        let tree = ItemTree::from_items(items)?;
        self.state = self.state.set_zone_items(zone, tree);
        Ok(())
    }

    /// Forget `zone`.
    pub fn remove_zone(&mut self, zone: &ZoneId) {
        self.zones.remove(zone);
        self.state = self.state.remove_zone(zone);
    }

    /// Options of `zone`.
    pub fn zone_options(&self, zone: &ZoneId) -> Option<&ZoneOptions> {
        self.zones.get(zone)
    }

    /// Committed items of `zone`, nested.
    pub fn items(&self, zone: &ZoneId) -> Option<Vec<Item<T>>> {
        self.state.zones().get(zone).map(|z| z.items.to_items())
    }

    /// Drop the animation items once the host finished animating them.
    pub fn clear_transform(&mut self) {
        self.state = self.state.clear_transform();
    }

    /// Take the events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<SortEvent> {
        core::mem::take(&mut self.events)
    }

    /// Borrow this controller as a [`DragDelegate`] answering from `host`.
    pub fn delegate<'a, H>(&'a mut self, host: &'a H) -> SortableDelegate<'a, T, H>
    where
        H: SortableHost<Element = E>,
    {
        SortableDelegate {
            sortable: self,
            host,
        }
    }

    /// Answer one orchestrator event.
    pub fn on_drag_event<H>(&mut self, host: &H, event: &DragEvent<E>) -> Reply<E>
    where
        H: SortableHost<Element = E>,
    {
        match event {
            DragEvent::AvatarRequested(request) => self.begin(host, request.element),
            DragEvent::TargetMoved { element, .. } => {
                if self.state.is_sorting() {
                    self.hovered = Some(*element);
                }
                Reply::Ack
            }
            DragEvent::Dropped { .. } => {
                self.finish();
                Reply::Ack
            }
            DragEvent::Cancelled { reason, .. } => {
                trace!(?reason, "drag cancelled");
                self.rollback();
                Reply::Ack
            }
            _ => Reply::Ack,
        }
    }

    /// Run the deferred work of one frame.
    ///
    /// Call after the host rendered the current preview trees.
    pub fn on_frame<H>(&mut self, host: &mut H)
    where
        H: SortableHost<Element = E>,
    {
        if let Some(pending) = self.awaiting_layout.take() {
            self.report_move(host, pending);
        }
        if let Some(element) = self.hovered.take() {
            self.try_move(host, element);
        }
    }

    fn begin<H: SortableHost<Element = E>>(&mut self, host: &H, pressed: E) -> Reply<E> {
        if self.state.is_sorting() {
            return Reply::Decline;
        }
        let Some((zone, id)) = host.closest_match(pressed).and_then(|(_, m)| match m {
            ElementMatch::Item { zone, id } | ElementMatch::Placeholder { zone, id } => {
                Some((zone, id))
            }
            ElementMatch::Container { .. } => None,
        }) else {
            trace!(element = ?pressed, "press is not on an item");
            return Reply::Decline;
        };
        if !self.zones.contains_key(&zone) {
            return Reply::Decline;
        }
        let Some(node) = self.state.zones().current(&zone).and_then(|t| t.get(&id)) else {
            return Reply::Decline;
        };
        if node.is_disabled() {
            debug!(item = %id, "disabled item refuses to drag");
            return Reply::Decline;
        }
        let parent = node.parent().cloned();
        self.state = self.state.start_sort(&id, parent.as_ref(), &zone);
        self.hovered = None;
        self.awaiting_layout = None;
        self.events.push(SortEvent::SortStart {
            item_id: id.clone(),
            parent_id: parent,
            zone_id: zone.clone(),
        });
        let mut avatar = Avatar::new(self.options.avatar_kind);
        if let Some(element) = host.avatar_element(&zone, &id) {
            avatar = avatar.with_element(element);
        }
        Reply::Avatar(avatar)
    }

    fn try_move<H: SortableHost<Element = E>>(&mut self, host: &mut H, element: E) {
        let resolution = match resolve(&self.state, &self.zones, &*host, element) {
            Ok(resolution) => resolution,
            Err(rejection) => {
                trace!(?rejection, ?element, "no drop position");
                return;
            }
        };
        let (Some(item), Some(source)) = (self.state.item_id(), self.state.source_position())
        else {
            return;
        };
        let item = item.clone();
        let source_zone = source.zone.clone();
        let target_zone = resolution.target.zone.clone();

        let mut touched = vec![source_zone.clone()];
        if target_zone != source_zone {
            touched.push(target_zone.clone());
        }
        for zone in &touched {
            if self.state.boxes().contains_zone(zone) {
                continue;
            }
            match self.measure(host, zone) {
                Ok(boxes) => self.state = self.state.refresh_positions(zone, boxes),
                Err(err) => {
                    trace!(%err, "measurement failed; frame skipped");
                    return;
                }
            }
        }

        let before = self.state.clone();
        self.state = self
            .state
            .save_item_move(&resolution.target, resolution.swap_with_placeholder());
        if self.state.zones().ptr_eq(before.zones()) {
            trace!(item = %item, "move refused");
            return;
        }
        let swapped_with = if resolution.swap_with_placeholder() {
            resolution.target.id.as_ref()
        } else {
            None
        };
        let info = MoveInfo::between(
            before.zones(),
            self.state.zones(),
            &item,
            &source_zone,
            &target_zone,
            swapped_with,
        );
        self.awaiting_layout = Some(PendingMove {
            info,
            boxes: before.boxes().clone(),
            resolution,
        });
    }

    fn report_move<H: SortableHost<Element = E>>(&mut self, host: &mut H, pending: PendingMove) {
        let mut animate = Vec::new();
        if let Some(info) = &pending.info {
            let mut zones = vec![info.from.zone.clone()];
            if info.to.zone != info.from.zone {
                zones.push(info.to.zone.clone());
            }
            let mut measured = Ok(());
            for zone in &zones {
                match self.measure(host, zone) {
                    Ok(boxes) => self.state = self.state.set_target_boxes(zone, boxes),
                    Err(err) => {
                        measured = Err(err);
                        break;
                    }
                }
            }
            match measured {
                Ok(()) => {
                    animate = compute_moving_items(info, &pending.boxes, self.state.target_boxes());
                    self.state = self.state.set_transforms(animate.clone());
                }
                Err(err) => trace!(%err, "post-move measurement failed; move not animated"),
            }
        }
        self.push_move(&pending.resolution, animate);
    }

    fn push_move(&mut self, resolution: &Resolution, animate: Vec<AnimationItem>) {
        let Some(now) = self.state.source_position() else {
            return;
        };
        self.events.push(SortEvent::SortMove {
            target_id: resolution.target.id.clone(),
            target_index: now.index,
            target_parent_id: now.parent.clone(),
            target_zone_id: now.zone.clone(),
            swap_with_placeholder: resolution.swap_with_placeholder(),
            animate,
        });
    }

    fn measure<H: SortableHost<Element = E>>(
        &self,
        host: &mut H,
        zone: &ZoneId,
    ) -> Result<Vec<AnimationBox>, GeometryError> {
        match self.state.zones().current(zone) {
            Some(tree) => measure_zone(host, zone, tree),
            None => Ok(Vec::new()),
        }
    }

    fn finish(&mut self) {
        if !self.state.is_sorting() {
            return;
        }
        self.hovered = None;
        if let Some(pending) = self.awaiting_layout.take() {
            self.push_move(&pending.resolution, Vec::new());
        }
        if !self.state.has_moved() {
            self.rollback();
            return;
        }
        let (Some(item), Some(orig), Some(now)) = (
            self.state.item_id().cloned(),
            self.state.orig_sort_pos().cloned(),
            self.state.source_position().cloned(),
        ) else {
            self.rollback();
            return;
        };
        let target_id = self.state.target_id().cloned();
        self.state = self.state.commit_preview().end_sort();
        debug!(item = %item, from = orig.index, to = now.index, zone = %now.zone, "sort committed");
        self.events.push(SortEvent::Sort {
            id: item,
            source_index: orig.index,
            source_zone_id: orig.zone,
            source_parent_id: orig.parent,
            target_id,
            target_index: now.index,
            target_zone_id: now.zone,
            target_parent_id: now.parent,
        });
    }

    fn rollback(&mut self) {
        if !self.state.is_sorting() {
            return;
        }
        self.hovered = None;
        self.awaiting_layout = None;
        self.state = self.state.cancel_sort();
        self.events.push(SortEvent::SortCancel);
    }
}

/// A [`Sortable`] borrowed together with its host, usable as a [`DragDelegate`].
pub struct SortableDelegate<'a, T, H: SortableHost> {
    sortable: &'a mut Sortable<T, H::Element>,
    host: &'a H,
}

impl<T: Clone, H: SortableHost> fmt::Debug for SortableDelegate<'_, T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortableDelegate")
            .field("sorting", &self.sortable.state.item_id())
            .finish_non_exhaustive()
    }
}

impl<T: Clone, H: SortableHost> DragDelegate<H::Element> for SortableDelegate<'_, T, H> {
    fn handle(&mut self, event: DragEvent<H::Element>) -> Reply<H::Element> {
        self.sortable.on_drag_event(self.host, &event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SceneHost;
    use core::time::Duration;
    use kurbo::Point;
    use understory_drag::{Input, Orchestrator, PointerKind, SourceOptions, TargetOptions};
    use understory_scene::{ElementId, QueryFilter};

    struct Harness {
        host: SceneHost,
        sortable: Sortable<(), ElementId>,
        drag: Orchestrator<ElementId>,
        t: u64,
    }

    impl Harness {
        fn new(zones: &[(&str, ZoneOptions, Vec<Item<()>>)]) -> Self {
            let mut host = SceneHost::default();
            let mut sortable = Sortable::default();
            let mut drag = Orchestrator::default();
            for (i, (name, options, items)) in zones.iter().enumerate() {
                let zone = ZoneId::new(*name);
                let origin = Point::new(300.0 * i as f64, 0.0);
                let root = host.add_zone(zone.clone(), origin, 200.0, options.swap);
                sortable
                    .add_zone(zone, options.clone(), items.clone())
                    .unwrap();
                drag.register_source(SourceOptions::new(root));
                drag.register_target(TargetOptions::new(root).accepting(sortable.options().avatar_kind));
            }
            host.render_all(sortable.state().zones());
            Self {
                host,
                sortable,
                drag,
                t: 0,
            }
        }

        fn input(&mut self, input: Input<ElementId>) {
            let Self {
                host,
                sortable,
                drag,
                ..
            } = self;
            let mut delegate = sortable.delegate(&*host);
            drag.handle(host.scene(), input, &mut delegate);
        }

        fn frame(&mut self) {
            self.host.render_all(self.sortable.state().zones());
            self.sortable.on_frame(&mut self.host);
            self.host.render_all(self.sortable.state().zones());
        }

        fn press(&mut self, x: f64, y: f64) {
            let target = self
                .host
                .scene()
                .hit_test_point(Point::new(x, y), QueryFilter::PICKING)
                .unwrap()
                .element;
            self.t += 16;
            self.input(Input::PointerDown {
                pointer: PointerKind::Mouse,
                position: Point::new(x, y),
                target,
                time: Duration::from_millis(self.t),
            });
        }

        fn move_to(&mut self, x: f64, y: f64) {
            self.t += 16;
            self.input(Input::PointerMove {
                position: Point::new(x, y),
                time: Duration::from_millis(self.t),
            });
            self.frame();
            self.frame();
        }

        fn release(&mut self, x: f64, y: f64) {
            self.t += 16;
            self.input(Input::PointerUp {
                position: Point::new(x, y),
                time: Duration::from_millis(self.t),
            });
            self.frame();
        }

        fn ids(&self, zone: &str) -> Vec<String> {
            self.sortable
                .items(&ZoneId::new(zone))
                .unwrap()
                .iter()
                .map(|i| i.id.to_string())
                .collect()
        }
    }

    fn leaves(ids: &[&str]) -> Vec<Item<()>> {
        ids.iter().map(|id| Item::leaf(*id, ())).collect()
    }

    #[test]
    fn drag_down_reorders_and_reports() {
        let mut h = Harness::new(&[("A", ZoneOptions::new(), leaves(&["1", "2", "3"]))]);
        h.press(50.0, 5.0);
        h.move_to(50.0, 45.0);
        let events = h.sortable.drain_events();
        assert_eq!(
            events[0],
            SortEvent::SortStart {
                item_id: ItemId::new("1"),
                parent_id: None,
                zone_id: ZoneId::new("A"),
            }
        );
        let SortEvent::SortMove {
            target_id,
            target_index,
            animate,
            ..
        } = &events[1]
        else {
            panic!("expected a move, got {:?}", events[1]);
        };
        assert_eq!(target_id.as_ref().map(ItemId::as_str), Some("3"));
        assert_eq!(*target_index, 2);
        assert!(!animate.is_empty());

        h.release(50.0, 45.0);
        assert_eq!(h.ids("A"), ["2", "3", "1"]);
        let events = h.sortable.drain_events();
        assert_eq!(
            events,
            [SortEvent::Sort {
                id: ItemId::new("1"),
                source_index: 0,
                source_zone_id: ZoneId::new("A"),
                source_parent_id: None,
                target_id: Some(ItemId::new("3")),
                target_index: 2,
                target_zone_id: ZoneId::new("A"),
                target_parent_id: None,
            }]
        );
        assert!(!h.sortable.is_sorting());
    }

    #[test]
    fn escape_rolls_back() {
        let mut h = Harness::new(&[("A", ZoneOptions::new(), leaves(&["1", "2", "3"]))]);
        h.press(50.0, 5.0);
        h.move_to(50.0, 45.0);
        h.input(Input::Key(understory_drag::Key::Escape));
        assert_eq!(h.ids("A"), ["1", "2", "3"]);
        let events = h.sortable.drain_events();
        assert_eq!(events.last(), Some(&SortEvent::SortCancel));
        assert_eq!(
            events.iter().filter(|e| **e == SortEvent::SortCancel).count(),
            1
        );
    }

    #[test]
    fn drop_without_move_cancels() {
        let mut h = Harness::new(&[("A", ZoneOptions::new(), leaves(&["1", "2"]))]);
        h.press(50.0, 5.0);
        h.move_to(50.0, 6.0);
        h.release(50.0, 6.0);
        let events = h.sortable.drain_events();
        assert!(matches!(events[0], SortEvent::SortStart { .. }));
        assert_eq!(events[1..], [SortEvent::SortCancel]);
        assert_eq!(h.ids("A"), ["1", "2"]);
    }

    #[test]
    fn disabled_items_do_not_drag() {
        let items = vec![Item::leaf("1", ()).disabled(), Item::leaf("2", ())];
        let mut h = Harness::new(&[("A", ZoneOptions::new(), items)]);
        h.press(50.0, 5.0);
        h.move_to(50.0, 25.0);
        assert!(!h.sortable.is_sorting());
        assert!(h.sortable.drain_events().is_empty());
    }

    #[test]
    fn transfer_between_zones() {
        let mut h = Harness::new(&[
            ("A", ZoneOptions::new().with_group("g"), leaves(&["1", "2"])),
            ("B", ZoneOptions::new().with_group("g"), leaves(&["3"])),
        ]);
        h.press(50.0, 5.0);
        h.move_to(350.0, 5.0);
        h.release(350.0, 5.0);
        assert_eq!(h.ids("A"), ["2"]);
        assert_eq!(h.ids("B"), ["1", "3"]);
        let sort = h.sortable.drain_events().pop();
        assert!(matches!(
            sort,
            Some(SortEvent::Sort { target_index: 0, ref target_zone_id, .. }) if target_zone_id.as_str() == "B"
        ));
    }

    #[test]
    fn group_mismatch_blocks_transfer() {
        let mut h = Harness::new(&[
            ("A", ZoneOptions::new().with_group("x"), leaves(&["1", "2"])),
            ("B", ZoneOptions::new().with_group("y"), leaves(&["3"])),
        ]);
        h.press(50.0, 5.0);
        h.move_to(350.0, 5.0);
        h.release(350.0, 5.0);
        assert_eq!(h.ids("B"), ["3"]);
        assert_eq!(h.sortable.drain_events().last(), Some(&SortEvent::SortCancel));
    }

    #[test]
    fn swap_zone_exchanges_items() {
        let options = ZoneOptions::new().swapping();
        let mut h = Harness::new(&[("T", options, leaves(&["1", "2", "3"]))]);
        h.press(50.0, 5.0);
        h.move_to(50.0, 45.0);
        let moved = h.sortable.drain_events();
        assert!(moved.iter().any(|e| matches!(
            e,
            SortEvent::SortMove {
                swap_with_placeholder: true,
                ..
            }
        )));
        h.release(50.0, 45.0);
        assert_eq!(h.ids("T"), ["3", "2", "1"]);
    }

    #[test]
    fn clear_transform_forgets_animation() {
        let mut h = Harness::new(&[("A", ZoneOptions::new(), leaves(&["1", "2", "3"]))]);
        h.press(50.0, 5.0);
        h.move_to(50.0, 25.0);
        assert!(!h.sortable.state().transforms().is_empty());
        h.sortable.clear_transform();
        assert!(h.sortable.state().transforms().is_empty());
        h.sortable.clear_transform();
        assert!(h.sortable.state().transforms().is_empty());
    }

    #[test]
    fn delegate_debug_shows_the_dragged_item() {
        let mut h = Harness::new(&[("A", ZoneOptions::new(), leaves(&["1", "2"]))]);
        let idle = format!("{:?}", h.sortable.delegate(&h.host));
        assert!(idle.starts_with("SortableDelegate"));
        assert!(idle.contains("None"));
        h.press(50.0, 5.0);
        h.move_to(50.0, 25.0);
        let dragging = format!("{:?}", h.sortable.delegate(&h.host));
        assert!(dragging.contains("\"1\""), "{dragging}");
    }

    #[test]
    fn set_items_requires_a_registered_zone() {
        let mut sortable: Sortable<(), u32> = Sortable::default();
        assert!(matches!(
            sortable.set_items(&ZoneId::new("nope"), leaves(&["1"])),
            Err(TreeError::UnknownZone(_))
        ));
        sortable
            .add_zone("A", ZoneOptions::new(), leaves(&["1"]))
            .unwrap();
        assert!(matches!(
            sortable.set_items(&ZoneId::new("A"), leaves(&["1", "1"])),
            Err(TreeError::DuplicateId(_))
        ));
    }
}
