// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration for the orchestrator and its registrations.

use alloc::vec::Vec;
use core::time::Duration;

use kurbo::Vec2;

use crate::types::AvatarKind;

/// Orchestrator-wide settings.
#[derive(Clone, Debug, PartialEq)]
pub struct DragConfig {
    /// How long a touch must be held before moves count as a drag (default: 200ms).
    ///
    /// A scroll before this elapses abandons the gesture, leaving the touch to
    /// the scroll container.
    pub touch_delay: Duration,
    /// Distance a mouse or pen must travel before a drag starts, for sources
    /// without their own threshold (default: 0).
    pub default_threshold: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            touch_delay: Duration::from_millis(200),
            default_threshold: 0.0,
        }
    }
}

/// Principal direction for an [`AngleGate`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Axis {
    /// Left/right.
    Horizontal,
    /// Up/down.
    Vertical,
}

/// Restricts the direction of the move that starts a drag.
///
/// A vertical list inside a horizontally scrolling carousel can gate on
/// [`Axis::Vertical`] so that sideways swipes keep scrolling.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AngleGate {
    /// Axis the initial movement must follow.
    pub axis: Axis,
    /// Largest allowed deviation from `axis`, in radians.
    pub max_deviation: f64,
}

impl AngleGate {
    /// Gate on `axis` with a deviation given in degrees.
    pub fn degrees(axis: Axis, max_deviation: f64) -> Self {
        Self {
            axis,
            max_deviation: max_deviation.to_radians(),
        }
    }

    /// Whether a displacement starts a drag under this gate.
    pub fn allows(&self, delta: Vec2) -> bool {
        let (along, across) = match self.axis {
            Axis::Horizontal => (delta.x.abs(), delta.y.abs()),
            Axis::Vertical => (delta.y.abs(), delta.x.abs()),
        };
        Vec2::new(along, across).atan2() <= self.max_deviation
    }
}

/// Registration data for a drag source.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceOptions<E> {
    /// Root element; presses anywhere inside it may start a drag.
    pub root: E,
    /// Explicit handles. When `None`, any descendant qualifies unless an
    /// interactive element sits between it and the root.
    pub handles: Option<Vec<E>>,
    /// Distance a mouse or pen must travel first; `None` uses [`DragConfig::default_threshold`].
    pub threshold: Option<f64>,
    /// Optional direction gate for the starting move.
    pub angle_gate: Option<AngleGate>,
}

impl<E> SourceOptions<E> {
    /// A source rooted at `root` with default behavior.
    pub fn new(root: E) -> Self {
        Self {
            root,
            handles: None,
            threshold: None,
            angle_gate: None,
        }
    }

    /// Restrict drags to presses inside these handles.
    pub fn with_handles(mut self, handles: impl Into<Vec<E>>) -> Self {
        self.handles = Some(handles.into());
        self
    }

    /// Require the pointer to travel further than `threshold` before dragging.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Gate the starting move on a direction.
    pub fn with_angle_gate(mut self, gate: AngleGate) -> Self {
        self.angle_gate = Some(gate);
        self
    }
}

/// Registration data for a drop target.
#[derive(Clone, Debug, PartialEq)]
pub struct TargetOptions<E> {
    /// Root element; the target is active while the avatar is over it.
    pub root: E,
    /// Avatar kinds this target reacts to. Empty accepts every kind.
    pub accepts: Vec<AvatarKind>,
}

impl<E> TargetOptions<E> {
    /// A target rooted at `root` accepting every avatar kind.
    pub fn new(root: E) -> Self {
        Self {
            root,
            accepts: Vec::new(),
        }
    }

    /// Only react to avatars of `kind` (may be called repeatedly).
    pub fn accepting(mut self, kind: AvatarKind) -> Self {
        self.accepts.push(kind);
        self
    }

    /// Whether an avatar of `kind` is accepted.
    pub fn accepts(&self, kind: AvatarKind) -> bool {
        self.accepts.is_empty() || self.accepts.contains(&kind)
    }
}
