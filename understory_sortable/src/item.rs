// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identifiers and the consumer-facing nested item type.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(Arc<str>);

        impl $name {
            /// Wrap a string.
            pub fn new(id: impl Into<Arc<str>>) -> Self {
                Self(id.into())
            }

            /// The underlying string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:?}", &*self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.into())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id.into())
            }
        }
    };
}

string_id! {
    /// Identifier of an item, unique within its zone.
    ItemId
}

string_id! {
    /// Identifier of a zone.
    ZoneId
}

string_id! {
    /// Logical group tag; items only move between zones with the same tag.
    GroupName
}

/// Whether an item is a leaf or a container of further items.
#[derive(Clone, Debug, PartialEq)]
pub enum ItemKind<T> {
    /// A plain item.
    Leaf,
    /// A container. An empty vector is an empty container, which can receive drops in tree mode.
    Group(Vec<Item<T>>),
}

/// A nested item as supplied by and handed back to the consumer.
#[derive(Clone, Debug, PartialEq)]
pub struct Item<T> {
    /// Identifier.
    pub id: ItemId,
    /// Group tag overriding the zone's tag.
    pub group: Option<GroupName>,
    /// Disabled items cannot be picked up (they can still be displaced).
    pub disabled: bool,
    /// Consumer payload.
    pub data: T,
    /// Leaf or container.
    pub kind: ItemKind<T>,
}

impl<T> Item<T> {
    /// A leaf item.
    pub fn leaf(id: impl Into<ItemId>, data: T) -> Self {
        Self {
            id: id.into(),
            group: None,
            disabled: false,
            data,
            kind: ItemKind::Leaf,
        }
    }

    /// A container item.
    pub fn group(id: impl Into<ItemId>, data: T, children: Vec<Self>) -> Self {
        Self {
            id: id.into(),
            group: None,
            disabled: false,
            data,
            kind: ItemKind::Group(children),
        }
    }

    /// Set the group tag.
    pub fn with_group(mut self, group: impl Into<GroupName>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Mark the item as disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Returns true for [`ItemKind::Group`].
    pub fn is_container(&self) -> bool {
        matches!(self.kind, ItemKind::Group(_))
    }

    /// Children of a container; empty for leaves.
    pub fn children(&self) -> &[Self] {
        match &self.kind {
            ItemKind::Leaf => &[],
            ItemKind::Group(children) => children,
        }
    }
}
