// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Orchestrator implementation.
//!
//! ## Overview
//!
//! Owns the source and target registries and the single active gesture.
//! Raw [`Input`] goes in through [`Orchestrator::handle`]; [`DragEvent`]s come out
//! through a [`DragDelegate`].
//!
//! ## Gesture lifecycle
//!
//! - **Idle**: a press on a registered source (inside a valid handle) moves to *pressed*.
//!   Presses while a gesture is active are ignored.
//! - **Pressed**: mouse and pen wait for the source threshold, touch waits for
//!   [`DragConfig::touch_delay`]. A scroll during the touch delay abandons the press.
//!   The first qualifying move asks the delegate for an avatar; a decline abandons silently.
//! - **Dragging**: every move repositions the avatar, hit tests with the avatar hidden,
//!   and reports target transitions and moves. Release drops on the innermost target
//!   or cancels; Escape and pointer cancellation always cancel.

use alloc::vec::Vec;
use core::time::Duration;

use kurbo::Point;
use tracing::{debug, trace};

use crate::options::{DragConfig, SourceOptions, TargetOptions};
use crate::targets::{TargetTracker, TargetTransition};
use crate::types::{
    Avatar, AvatarKind, AvatarRequest, CancelReason, DragDelegate, DragEvent, Input, Key,
    PointerKind, Reply, SourceId, Surface, TargetId,
};

/// Drag-and-drop coordinator.
///
/// ## Usage
///
/// - Construct one per application (or per window) and keep it next to the element tree.
/// - Register sources with [`Orchestrator::register_source`] and targets with
///   [`Orchestrator::register_target`].
/// - Feed every pointer, scroll and key input to [`Orchestrator::handle`].
pub struct Orchestrator<E> {
    config: DragConfig,
    sources: Vec<(SourceId, SourceOptions<E>)>,
    targets: Vec<(TargetId, TargetOptions<E>)>,
    next_id: u32,
    phase: Phase<E>,
}

#[derive(Clone, Debug)]
enum Phase<E> {
    Idle,
    Pressed(Press<E>),
    Dragging(Session<E>),
}

#[derive(Clone, Debug)]
struct Press<E> {
    source: SourceId,
    pointer: PointerKind,
    element: E,
    origin: Point,
    time: Duration,
}

#[derive(Clone, Debug)]
struct Session<E> {
    source: SourceId,
    avatar: Avatar<E>,
    tracker: TargetTracker<TargetId>,
    element: Option<E>,
    selection_suppressed: bool,
}

impl<E> core::fmt::Debug for Orchestrator<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let phase = match self.phase {
            Phase::Idle => "idle",
            Phase::Pressed(_) => "pressed",
            Phase::Dragging(_) => "dragging",
        };
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("sources", &self.sources.len())
            .field("targets", &self.targets.len())
            .field("phase", &phase)
            .finish_non_exhaustive()
    }
}

impl<E> Default for Orchestrator<E> {
    fn default() -> Self {
        Self::new(DragConfig::default())
    }
}

impl<E> Orchestrator<E> {
    /// Create an orchestrator with empty registries.
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            sources: Vec::new(),
            targets: Vec::new(),
            next_id: 0,
            phase: Phase::Idle,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    /// Register a drag source.
    pub fn register_source(&mut self, options: SourceOptions<E>) -> SourceId {
        let id = SourceId(self.bump());
        self.sources.push((id, options));
        id
    }

    /// Remove a drag source. A press on it that has not become a drag yet is dropped.
    pub fn unregister_source(&mut self, id: SourceId) -> Option<SourceOptions<E>> {
        if matches!(&self.phase, Phase::Pressed(p) if p.source == id) {
            self.phase = Phase::Idle;
        }
        let pos = self.sources.iter().position(|(s, _)| *s == id)?;
        Some(self.sources.remove(pos).1)
    }

    /// Register a drop target.
    pub fn register_target(&mut self, options: TargetOptions<E>) -> TargetId {
        let id = TargetId(self.bump());
        self.targets.push((id, options));
        id
    }

    /// Remove a drop target. It receives no further events, not even a leave.
    pub fn unregister_target(&mut self, id: TargetId) -> Option<TargetOptions<E>> {
        if let Phase::Dragging(session) = &mut self.phase {
            if session.tracker.forget(id) {
                trace!(?id, "target unregistered while under the avatar");
            }
        }
        let pos = self.targets.iter().position(|(t, _)| *t == id)?;
        Some(self.targets.remove(pos).1)
    }

    /// Returns true while a drag session is active.
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging(_))
    }

    /// Returns true while a press waits to become a drag.
    pub fn is_pressed(&self) -> bool {
        matches!(self.phase, Phase::Pressed(_))
    }

    /// Source of the active press or drag.
    pub fn active_source(&self) -> Option<SourceId> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Pressed(p) => Some(p.source),
            Phase::Dragging(s) => Some(s.source),
        }
    }

    /// Innermost target under the avatar.
    pub fn current_target(&self) -> Option<TargetId> {
        match &self.phase {
            Phase::Dragging(s) => s.tracker.innermost(),
            _ => None,
        }
    }

    fn bump(&mut self) -> u32 {
        self.next_id = self.next_id.wrapping_add(1);
        self.next_id
    }
}

impl<E: Copy + Eq + core::fmt::Debug> Orchestrator<E> {
    /// Handle one input and report resulting events to `delegate`.
    ///
    /// Returns true if the input was consumed by a press or drag.
    pub fn handle<S, D>(&mut self, surface: &S, input: Input<E>, delegate: &mut D) -> bool
    where
        S: Surface<Element = E>,
        D: DragDelegate<E>,
    {
        match input {
            Input::PointerDown {
                pointer,
                position,
                target,
                time,
            } => self.on_down(surface, pointer, position, target, time),
            Input::PointerMove { position, time } => {
                self.on_move(surface, position, time, delegate)
            }
            Input::PointerUp { position, .. } => self.on_up(position, delegate),
            Input::PointerCancel => self.abort(CancelReason::PointerCancelled, delegate),
            Input::Scroll { time } => self.on_scroll(time),
            Input::Key(Key::Escape) => self.abort(CancelReason::Escape, delegate),
            Input::Key(Key::Other) => false,
        }
    }

    /// Cancel the active gesture, if any.
    pub fn cancel<D: DragDelegate<E>>(&mut self, delegate: &mut D) -> bool {
        self.abort(CancelReason::Requested, delegate)
    }

    fn on_down<S: Surface<Element = E>>(
        &mut self,
        surface: &S,
        pointer: PointerKind,
        origin: Point,
        element: E,
        time: Duration,
    ) -> bool {
        if !matches!(self.phase, Phase::Idle) {
            trace!(?element, "press ignored: a gesture is already active");
            return false;
        }
        let Some(source) = self.source_for(surface, element) else {
            return false;
        };
        trace!(?source, ?element, ?pointer, "press on drag source");
        self.phase = Phase::Pressed(Press {
            source,
            pointer,
            element,
            origin,
            time,
        });
        true
    }

    fn on_move<S, D>(&mut self, surface: &S, position: Point, time: Duration, delegate: &mut D) -> bool
    where
        S: Surface<Element = E>,
        D: DragDelegate<E>,
    {
        match &self.phase {
            Phase::Idle => false,
            Phase::Pressed(press) => {
                let press = press.clone();
                self.try_start(surface, press, position, time, delegate)
            }
            Phase::Dragging(_) => {
                self.drag_move(surface, position, delegate);
                true
            }
        }
    }

    fn try_start<S, D>(
        &mut self,
        surface: &S,
        press: Press<E>,
        position: Point,
        time: Duration,
        delegate: &mut D,
    ) -> bool
    where
        S: Surface<Element = E>,
        D: DragDelegate<E>,
    {
        let Some((_, options)) = self.sources.iter().find(|(id, _)| *id == press.source) else {
            self.phase = Phase::Idle;
            return false;
        };
        let delta = position - press.origin;
        if press.pointer.is_touch() {
            if time < press.time + self.config.touch_delay {
                return true;
            }
        } else {
            let threshold = options.threshold.unwrap_or(self.config.default_threshold);
            if delta.hypot() <= threshold {
                return true;
            }
        }
        if let Some(gate) = options.angle_gate {
            if !gate.allows(delta) {
                trace!(?delta, "drag refused by angle gate");
                self.phase = Phase::Idle;
                return false;
            }
        }

        let request = AvatarRequest {
            source: press.source,
            pointer: press.pointer,
            element: press.element,
            origin: press.origin,
            position,
        };
        let avatar = match delegate.handle(DragEvent::AvatarRequested(request)) {
            Reply::Avatar(avatar) => avatar,
            Reply::Ack | Reply::Decline => {
                debug!(source = ?press.source, "source declined to produce an avatar");
                self.phase = Phase::Idle;
                return false;
            }
        };

        debug!(source = ?press.source, kind = avatar.kind.0, "drag started");
        let _ = delegate.handle(DragEvent::Started {
            source: press.source,
            pointer: press.pointer,
            kind: avatar.kind,
        });
        let selection_suppressed = press.pointer.is_touch();
        if selection_suppressed {
            let _ = delegate.handle(DragEvent::SelectionSuppressed(true));
        }
        self.phase = Phase::Dragging(Session {
            source: press.source,
            avatar,
            tracker: TargetTracker::new(),
            element: None,
            selection_suppressed,
        });
        self.drag_move(surface, position, delegate);
        true
    }

    fn drag_move<S, D>(&mut self, surface: &S, position: Point, delegate: &mut D)
    where
        S: Surface<Element = E>,
        D: DragDelegate<E>,
    {
        let Phase::Dragging(session) = &self.phase else {
            return;
        };
        let source = session.source;
        let kind = session.avatar.kind;
        let hidden = session.avatar.element;
        let _ = delegate.handle(DragEvent::AvatarMoved {
            source,
            position,
            avatar_origin: position - session.avatar.grab_offset,
        });

        let element = surface.element_at(position, hidden);
        let path = self.target_path(surface, element, kind);

        let Phase::Dragging(session) = &mut self.phase else {
            return;
        };
        session.element = element;
        let transitions = session.tracker.update_path(&path);
        let innermost = session.tracker.innermost();
        for transition in transitions {
            let event = match transition {
                TargetTransition::Enter(target) => DragEvent::TargetEntered { target },
                TargetTransition::Leave(target) => DragEvent::TargetLeft { target },
            };
            let _ = delegate.handle(event);
        }
        if let (Some(target), Some(element)) = (innermost, element) {
            let _ = delegate.handle(DragEvent::TargetMoved {
                target,
                element,
                position,
            });
        }
    }

    fn on_up<D: DragDelegate<E>>(&mut self, position: Point, delegate: &mut D) -> bool {
        match core::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => false,
            Phase::Pressed(_) => {
                trace!("released before the press became a drag");
                false
            }
            Phase::Dragging(session) => {
                let event = match session.tracker.innermost() {
                    Some(target) => {
                        debug!(?target, "dropped");
                        DragEvent::Dropped {
                            source: session.source,
                            target,
                            element: session.element,
                            position,
                        }
                    }
                    None => {
                        debug!("released outside every drop target");
                        DragEvent::Cancelled {
                            source: session.source,
                            target: None,
                            reason: CancelReason::NoTarget,
                        }
                    }
                };
                let _ = delegate.handle(event);
                Self::cleanup(&session, delegate);
                true
            }
        }
    }

    fn abort<D: DragDelegate<E>>(&mut self, reason: CancelReason, delegate: &mut D) -> bool {
        match core::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => false,
            Phase::Pressed(_) => {
                trace!(?reason, "press abandoned");
                true
            }
            Phase::Dragging(session) => {
                debug!(?reason, "drag cancelled");
                let _ = delegate.handle(DragEvent::Cancelled {
                    source: session.source,
                    target: session.tracker.innermost(),
                    reason,
                });
                Self::cleanup(&session, delegate);
                true
            }
        }
    }

    fn on_scroll(&mut self, time: Duration) -> bool {
        if let Phase::Pressed(press) = &self.phase {
            if press.pointer.is_touch() && time < press.time + self.config.touch_delay {
                trace!("scroll during touch delay: gesture abandoned");
                self.phase = Phase::Idle;
            }
        }
        false
    }

    fn cleanup<D: DragDelegate<E>>(session: &Session<E>, delegate: &mut D) {
        if session.selection_suppressed {
            let _ = delegate.handle(DragEvent::SelectionSuppressed(false));
        }
    }

    /// Nearest registered source containing `element` whose handle rules accept it.
    fn source_for<S: Surface<Element = E>>(&self, surface: &S, element: E) -> Option<SourceId> {
        let mut cur = Some(element);
        while let Some(el) = cur {
            if let Some((id, options)) = self.sources.iter().rev().find(|(_, o)| o.root == el) {
                return Self::is_handle(surface, options, element).then_some(*id);
            }
            cur = surface.parent_of(el);
        }
        None
    }

    fn is_handle<S: Surface<Element = E>>(surface: &S, options: &SourceOptions<E>, element: E) -> bool {
        let mut cur = Some(element);
        while let Some(el) = cur {
            match &options.handles {
                Some(handles) if handles.contains(&el) => return true,
                Some(_) if el == options.root => return false,
                None if el == options.root => return true,
                None if surface.is_interactive(el) => return false,
                _ => {}
            }
            cur = surface.parent_of(el);
        }
        false
    }

    /// Registered targets containing `element` that accept `kind`, outer→inner.
    fn target_path<S: Surface<Element = E>>(
        &self,
        surface: &S,
        element: Option<E>,
        kind: AvatarKind,
    ) -> Vec<TargetId> {
        let mut path = Vec::new();
        let mut cur = element;
        while let Some(el) = cur {
            for (id, options) in &self.targets {
                if options.root == el && options.accepts(kind) {
                    path.push(*id);
                }
            }
            cur = surface.parent_of(el);
        }
        path.reverse();
        path
    }
}
