// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drop target tracking: compute enter/leave transitions as the avatar moves.
//!
//! Drop targets may nest (a tree zone inside a board zone). On every move the
//! orchestrator collects the registered targets containing the avatar's element,
//! outer→inner, and feeds that path to [`TargetTracker::update_path`].
//!
//! ```
//! use understory_drag::targets::{TargetTracker, TargetTransition};
//! let mut t: TargetTracker<u32> = TargetTracker::new();
//! assert_eq!(t.update_path(&[1, 2]), vec![TargetTransition::Enter(1), TargetTransition::Enter(2)]);
//! assert_eq!(t.update_path(&[1, 3]), vec![TargetTransition::Leave(2), TargetTransition::Enter(3)]);
//! assert_eq!(t.innermost(), Some(3));
//! ```

use alloc::vec::Vec;

/// Tracks the current outer→inner path of active drop targets.
///
/// Ordering semantics:
/// - Leave events are emitted from inner-most to outer-most.
/// - Enter events are emitted from outer-most to inner-most.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TargetTracker<K: Copy + Eq> {
    current: Vec<K>,
}

/// A target transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TargetTransition<K> {
    /// The avatar entered the target (in order from outer→inner).
    Enter(K),
    /// The avatar left the target (in order from inner→outer).
    Leave(K),
}

impl<K: Copy + Eq> TargetTracker<K> {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self {
            current: Vec::new(),
        }
    }

    /// Return the current outer→inner path.
    pub fn current_path(&self) -> &[K] {
        &self.current
    }

    /// The target that receives moves and drops.
    pub fn innermost(&self) -> Option<K> {
        self.current.last().copied()
    }

    /// Drop `target` from the path without reporting a transition.
    ///
    /// Returns true if it was on the path.
    pub fn forget(&mut self, target: K) -> bool {
        let before = self.current.len();
        self.current.retain(|&k| k != target);
        self.current.len() != before
    }

    /// Replace the path with `new_path` and return the transitions between them.
    ///
    /// Targets the two paths share as an outer prefix are left alone.
    pub fn update_path(&mut self, new_path: &[K]) -> Vec<TargetTransition<K>> {
        let shared = self
            .current
            .iter()
            .zip(new_path)
            .take_while(|(old, new)| old == new)
            .count();
        let mut out: Vec<_> = self.current[shared..]
            .iter()
            .rev()
            .map(|&k| TargetTransition::Leave(k))
            .collect();
        out.extend(new_path[shared..].iter().map(|&k| TargetTransition::Enter(k)));
        self.current = new_path.to_vec();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn enter_nested_targets_outer_first() {
        let mut t: TargetTracker<u32> = TargetTracker::new();
        let ev = t.update_path(&[1, 2]);
        assert_eq!(
            ev,
            vec![TargetTransition::Enter(1), TargetTransition::Enter(2)]
        );
        assert_eq!(t.innermost(), Some(2));
    }

    #[test]
    fn leaving_everything_is_inner_first() {
        let mut t: TargetTracker<u32> = TargetTracker::new();
        let _ = t.update_path(&[1, 2]);
        let ev = t.update_path(&[]);
        assert_eq!(
            ev,
            vec![TargetTransition::Leave(2), TargetTransition::Leave(1)]
        );
        assert_eq!(t.innermost(), None);
    }

    #[test]
    fn forgotten_targets_never_see_a_leave() {
        let mut t: TargetTracker<u32> = TargetTracker::new();
        let _ = t.update_path(&[1, 2]);
        assert!(t.forget(2));
        assert!(!t.forget(2));
        assert_eq!(t.innermost(), Some(1));
        assert_eq!(t.update_path(&[]), vec![TargetTransition::Leave(1)]);
    }

    // Moving from one zone straight into a sibling zone.
    #[test]
    fn switching_sibling_targets() {
        let mut t: TargetTracker<u32> = TargetTracker::new();
        let _ = t.update_path(&[7]);
        let ev = t.update_path(&[8]);
        assert_eq!(
            ev,
            vec![TargetTransition::Leave(7), TargetTransition::Enter(8)]
        );
    }

    #[test]
    fn moving_within_a_target_is_silent() {
        let mut t: TargetTracker<u32> = TargetTracker::new();
        let _ = t.update_path(&[3, 4]);
        assert!(t.update_path(&[3, 4]).is_empty());
        assert_eq!(t.current_path(), &[3, 4]);
    }

    #[test]
    fn leaving_inner_keeps_outer() {
        let mut t: TargetTracker<u32> = TargetTracker::new();
        let _ = t.update_path(&[1, 2, 3]);
        let ev = t.update_path(&[1]);
        assert_eq!(
            ev,
            vec![TargetTransition::Leave(3), TargetTransition::Leave(2)]
        );
        assert_eq!(t.innermost(), Some(1));
    }
}
