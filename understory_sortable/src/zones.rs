// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zones and the zone map.
//!
//! Every zone is stored behind an [`Arc`]. Operations that leave a zone alone
//! keep its `Arc`, so consumers can skip untouched zones with [`Zones::zone_ptr_eq`]
//! and detect refused moves with [`Zones::ptr_eq`].

use std::sync::Arc;

use im::OrdMap;

use crate::item::ZoneId;
use crate::tree::ItemTree;

/// One drop area: its committed tree and, during a drag, a preview tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Zone<T> {
    /// Committed arrangement.
    pub items: ItemTree<T>,
    /// Tentative arrangement during a drag.
    pub next: Option<ItemTree<T>>,
}

impl<T: Clone> Zone<T> {
    /// A zone with no preview.
    pub fn new(items: ItemTree<T>) -> Self {
        Self { items, next: None }
    }

    /// The preview if there is one, else the committed tree.
    pub fn current(&self) -> &ItemTree<T> {
        self.next.as_ref().unwrap_or(&self.items)
    }

    /// Returns true while a preview exists.
    pub fn has_preview(&self) -> bool {
        self.next.is_some()
    }
}

/// Map from zone id to zone.
#[derive(Clone, Debug, PartialEq)]
pub struct Zones<T> {
    map: OrdMap<ZoneId, Arc<Zone<T>>>,
}

impl<T: Clone> Default for Zones<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Zones<T> {
    /// No zones.
    pub fn new() -> Self {
        Self { map: OrdMap::new() }
    }

    /// Number of zones.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true with no zones.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Look up a zone.
    pub fn get(&self, zone: &ZoneId) -> Option<&Zone<T>> {
        self.map.get(zone).map(|z| &**z)
    }

    /// The current (preview or committed) tree of `zone`.
    pub fn current(&self, zone: &ZoneId) -> Option<&ItemTree<T>> {
        self.get(zone).map(Zone::current)
    }

    /// Zones in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&ZoneId, &Zone<T>)> {
        self.map.iter().map(|(id, z)| (id, &**z))
    }

    /// Ids of all zones.
    pub fn ids(&self) -> impl Iterator<Item = &ZoneId> {
        self.map.keys()
    }

    /// A copy with `zone` set.
    pub fn with(&self, id: ZoneId, zone: Zone<T>) -> Self {
        Self {
            map: self.map.update(id, Arc::new(zone)),
        }
    }

    /// A copy without `zone`.
    pub fn without(&self, id: &ZoneId) -> Self {
        Self {
            map: self.map.without(id),
        }
    }

    /// A copy whose `zone` shows `next` as its preview.
    ///
    /// Unknown zones are ignored.
    pub fn with_preview(&self, id: &ZoneId, next: ItemTree<T>) -> Self {
        let Some(zone) = self.get(id) else {
            return self.clone();
        };
        self.with(
            id.clone(),
            Zone {
                items: zone.items.clone(),
                next: Some(next),
            },
        )
    }

    /// A copy with every preview promoted to the committed tree.
    pub fn committed(&self) -> Self {
        self.replace_previews(|zone| Zone::new(zone.current().clone()))
    }

    /// A copy with every preview dropped.
    pub fn discarded(&self) -> Self {
        self.replace_previews(|zone| Zone::new(zone.items.clone()))
    }

    fn replace_previews(&self, f: impl Fn(&Zone<T>) -> Zone<T>) -> Self {
        let mut map = self.map.clone();
        for (id, zone) in &self.map {
            if zone.has_preview() {
                map.insert(id.clone(), Arc::new(f(zone)));
            }
        }
        Self { map }
    }

    /// Returns true if both maps hold the very same zones.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.map.len() == other.map.len()
            && self
                .map
                .iter()
                .zip(other.map.iter())
                .all(|((a_id, a), (b_id, b))| a_id == b_id && Arc::ptr_eq(a, b))
    }

    /// Returns true if `zone` is the very same zone in both maps.
    pub fn zone_ptr_eq(&self, other: &Self, zone: &ZoneId) -> bool {
        match (self.map.get(zone), other.map.get(zone)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}
