// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the orchestrator: ids, inputs, avatars, events, and the traits at its seams.
//!
//! ## Overview
//!
//! These types describe the drag protocol and its inputs/outputs.
//! They are consumed by the [`orchestrator`](crate::orchestrator) and by the
//! components that act as drag sources and drop targets.

use core::time::Duration;

use kurbo::{Point, Vec2};

/// Handle of a registered drag source.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub(crate) u32);

/// Handle of a registered drop target.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub(crate) u32);

/// The kind of device driving a gesture.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PointerKind {
    /// A mouse.
    Mouse,
    /// A finger on a touch surface.
    Touch,
    /// A stylus.
    Pen,
}

impl PointerKind {
    /// Touch gestures wait for the touch delay instead of a distance threshold.
    pub fn is_touch(self) -> bool {
        matches!(self, Self::Touch)
    }
}

/// Keys the orchestrator cares about.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Key {
    /// Cancels an active drag.
    Escape,
    /// Any other key; ignored.
    Other,
}

/// Raw input fed into [`Orchestrator::handle`](crate::orchestrator::Orchestrator::handle).
///
/// `time` is a monotonic timestamp from any fixed origin; only differences are used.
#[derive(Clone, Debug)]
pub enum Input<E> {
    /// A pointer was pressed on `target`.
    PointerDown {
        /// Device kind.
        pointer: PointerKind,
        /// World-space position.
        position: Point,
        /// Innermost element under the pointer.
        target: E,
        /// Timestamp.
        time: Duration,
    },
    /// The pointer moved.
    PointerMove {
        /// World-space position.
        position: Point,
        /// Timestamp.
        time: Duration,
    },
    /// The pointer was released.
    PointerUp {
        /// World-space position.
        position: Point,
        /// Timestamp.
        time: Duration,
    },
    /// The platform took the pointer away (for example a system gesture).
    PointerCancel,
    /// The page or a scroll container scrolled.
    Scroll {
        /// Timestamp.
        time: Duration,
    },
    /// A key was pressed.
    Key(Key),
}

/// Tag matched against [`TargetOptions::accepts`](crate::TargetOptions::accepts).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct AvatarKind(pub &'static str);

/// The transient object standing in for the dragged thing.
#[derive(Clone, Debug, PartialEq)]
pub struct Avatar<E> {
    /// Tag used by drop targets to accept or ignore this avatar.
    pub kind: AvatarKind,
    /// Element rendered under the pointer, hidden while hit testing.
    pub element: Option<E>,
    /// Offset from the avatar's origin to the pointer.
    pub grab_offset: Vec2,
}

impl<E> Avatar<E> {
    /// An avatar with no rendered element and no grab offset.
    pub fn new(kind: AvatarKind) -> Self {
        Self {
            kind,
            element: None,
            grab_offset: Vec2::ZERO,
        }
    }

    /// Attach the element that renders this avatar.
    pub fn with_element(mut self, element: E) -> Self {
        self.element = Some(element);
        self
    }

    /// Set the offset from the avatar's origin to the pointer.
    pub fn with_grab_offset(mut self, grab_offset: Vec2) -> Self {
        self.grab_offset = grab_offset;
        self
    }
}

/// Sent to the delegate once a press qualifies as a drag.
#[derive(Clone, Debug, PartialEq)]
pub struct AvatarRequest<E> {
    /// Source the press started on.
    pub source: SourceId,
    /// Device kind.
    pub pointer: PointerKind,
    /// Element that received the press.
    pub element: E,
    /// Position of the press.
    pub origin: Point,
    /// Position of the move that confirmed the drag.
    pub position: Point,
}

/// Why a drag ended without a drop.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CancelReason {
    /// Escape was pressed.
    Escape,
    /// The pointer was released outside every drop target.
    NoTarget,
    /// The platform cancelled the pointer.
    PointerCancelled,
    /// [`Orchestrator::cancel`](crate::orchestrator::Orchestrator::cancel) was called.
    Requested,
}

/// Messages sent from the orchestrator to its delegate.
#[derive(Clone, Debug, PartialEq)]
pub enum DragEvent<E> {
    /// A press qualified as a drag; reply with [`Reply::Avatar`] to start it.
    AvatarRequested(AvatarRequest<E>),
    /// The drag started.
    Started {
        /// Source of the drag.
        source: SourceId,
        /// Device kind.
        pointer: PointerKind,
        /// Kind of the accepted avatar.
        kind: AvatarKind,
    },
    /// The avatar should be drawn at a new place.
    AvatarMoved {
        /// Source of the drag.
        source: SourceId,
        /// Pointer position.
        position: Point,
        /// Where the avatar's origin goes (pointer minus grab offset).
        avatar_origin: Point,
    },
    /// A drop target now contains the avatar. Sent outer→inner.
    TargetEntered {
        /// The entered target.
        target: TargetId,
    },
    /// A drop target no longer contains the avatar. Sent inner→outer.
    TargetLeft {
        /// The left target.
        target: TargetId,
    },
    /// The avatar moved over the innermost active target.
    TargetMoved {
        /// The innermost target.
        target: TargetId,
        /// Element under the avatar, found with the avatar hidden.
        element: E,
        /// Pointer position.
        position: Point,
    },
    /// The drag ended over a target: commit.
    Dropped {
        /// Source of the drag.
        source: SourceId,
        /// The innermost target.
        target: TargetId,
        /// Last element seen under the avatar.
        element: Option<E>,
        /// Pointer position.
        position: Point,
    },
    /// The drag ended without a drop: roll back.
    Cancelled {
        /// Source of the drag.
        source: SourceId,
        /// Target active when the drag was cancelled, if any.
        target: Option<TargetId>,
        /// Why.
        reason: CancelReason,
    },
    /// Text selection should be suppressed (`true`) or restored (`false`).
    SelectionSuppressed(bool),
}

/// Delegate answers to [`DragEvent`]s.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply<E> {
    /// Nothing to report.
    Ack,
    /// Start the drag with this avatar.
    Avatar(Avatar<E>),
    /// Refuse to produce an avatar; the gesture is abandoned.
    Decline,
}

/// Single message sink for everything the orchestrator reports.
pub trait DragDelegate<E> {
    /// Receive an event and answer it.
    ///
    /// Only [`DragEvent::AvatarRequested`] reads the answer; other events should reply [`Reply::Ack`].
    fn handle(&mut self, event: DragEvent<E>) -> Reply<E>;
}

impl<E, F> DragDelegate<E> for F
where
    F: FnMut(DragEvent<E>) -> Reply<E>,
{
    fn handle(&mut self, event: DragEvent<E>) -> Reply<E> {
        self(event)
    }
}

/// The element tree the orchestrator hit tests and walks.
pub trait Surface {
    /// Element handle.
    type Element: Copy + Eq + core::fmt::Debug;

    /// Returns the parent of `element`, or `None` for roots.
    fn parent_of(&self, element: Self::Element) -> Option<Self::Element>;

    /// Returns the topmost element under `position`, ignoring `hidden` and its subtree.
    fn element_at(&self, position: Point, hidden: Option<Self::Element>) -> Option<Self::Element>;

    /// Returns true if the element handles pointer input on its own (buttons, inputs).
    fn is_interactive(&self, element: Self::Element) -> bool {
        let _ = element;
        false
    }
}
