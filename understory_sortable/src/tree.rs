// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Persistent item trees and the utilities over them.
//!
//! An [`ItemTree`] is an arena of nodes keyed by [`ItemId`]. Each node knows its
//! parent and, for containers, the ordered ids of its children. Both maps and
//! lists are `im` collections, so cloning a tree is cheap and a clone is an
//! independent snapshot: moving an item in one copy never changes another.
//!
//! ```
//! use understory_sortable::{Item, ItemId, ItemTree};
//!
//! let tree = ItemTree::from_items(vec![
//!     Item::leaf("a", ()),
//!     Item::group("g", (), vec![Item::leaf("b", ())]),
//! ])
//! .unwrap();
//! assert_eq!(tree.parent_of(&ItemId::from("b")), Some(&ItemId::from("g")));
//! let flat: Vec<_> = tree.to_flat_list(false).iter().map(|n| n.id().as_str()).collect();
//! assert_eq!(flat, ["a", "b"]);
//! ```

use std::fmt;

use im::{OrdMap, Vector};

use crate::error::TreeError;
use crate::item::{GroupName, Item, ItemId, ItemKind, ZoneId};
use crate::position::ItemPosition;

/// One item stored in an [`ItemTree`].
#[derive(Clone, Debug, PartialEq)]
pub struct Node<T> {
    id: ItemId,
    parent: Option<ItemId>,
    group: Option<GroupName>,
    disabled: bool,
    data: T,
    kind: NodeKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum NodeKind {
    Leaf,
    Group(Vector<ItemId>),
}

impl<T> Node<T> {
    /// Identifier.
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// Containing item, or `None` at the root.
    pub fn parent(&self) -> Option<&ItemId> {
        self.parent.as_ref()
    }

    /// Group tag set on the item itself.
    pub fn group(&self) -> Option<&GroupName> {
        self.group.as_ref()
    }

    /// Whether the item refuses to be picked up.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Consumer payload.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Returns true for containers.
    pub fn is_container(&self) -> bool {
        matches!(self.kind, NodeKind::Group(_))
    }

    /// Ordered child ids; `None` for leaves.
    pub fn children(&self) -> Option<&Vector<ItemId>> {
        match &self.kind {
            NodeKind::Leaf => None,
            NodeKind::Group(children) => Some(children),
        }
    }
}

/// Parent and index of an item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    /// Containing item, or `None` at the root.
    pub parent: Option<ItemId>,
    /// Index among the parent's children.
    pub index: usize,
}

/// A detached subtree, moved between trees as a unit.
#[derive(Clone, Debug)]
pub(crate) struct Subtree<T> {
    root: ItemId,
    nodes: Vec<Node<T>>,
}

impl<T> Subtree<T> {
    pub(crate) fn ids(&self) -> impl Iterator<Item = &ItemId> {
        self.nodes.iter().map(|n| &n.id)
    }
}

/// A persistent ordered tree of items.
#[derive(Clone, PartialEq)]
pub struct ItemTree<T> {
    nodes: OrdMap<ItemId, Node<T>>,
    roots: Vector<ItemId>,
}

impl<T: Clone> Default for ItemTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> ItemTree<T> {
    /// An empty tree.
    pub fn new() -> Self {
        Self {
            nodes: OrdMap::new(),
            roots: Vector::new(),
        }
    }

    /// Build a tree from nested items.
    ///
    /// Fails with [`TreeError::DuplicateId`] if an id occurs more than once.
    pub fn from_items(items: Vec<Item<T>>) -> Result<Self, TreeError> {
        let mut tree = Self::new();
        for item in items {
            let id = item.id.clone();
            tree.insert_item(None, item)?;
            tree.roots.push_back(id);
        }
        Ok(tree)
    }

    fn insert_item(&mut self, parent: Option<&ItemId>, item: Item<T>) -> Result<(), TreeError> {
        if self.nodes.contains_key(&item.id) {
            return Err(TreeError::DuplicateId(item.id));
        }
        let Item {
            id,
            group,
            disabled,
            data,
            kind,
        } = item;
        let (kind, children) = match kind {
            ItemKind::Leaf => (NodeKind::Leaf, Vec::new()),
            ItemKind::Group(children) => (
                NodeKind::Group(children.iter().map(|c| c.id.clone()).collect()),
                children,
            ),
        };
        self.nodes.insert(
            id.clone(),
            Node {
                id: id.clone(),
                parent: parent.cloned(),
                group,
                disabled,
                data,
                kind,
            },
        );
        for child in children {
            self.insert_item(Some(&id), child)?;
        }
        Ok(())
    }

    /// Convert back into nested items.
    pub fn to_items(&self) -> Vec<Item<T>> {
        self.roots.iter().map(|id| self.item(id)).collect()
    }

    fn item(&self, id: &ItemId) -> Item<T> {
        let node = self.node(id);
        let kind = match &node.kind {
            NodeKind::Leaf => ItemKind::Leaf,
            NodeKind::Group(children) => {
                ItemKind::Group(children.iter().map(|c| self.item(c)).collect())
            }
        };
        Item {
            id: node.id.clone(),
            group: node.group.clone(),
            disabled: node.disabled,
            data: node.data.clone(),
            kind,
        }
    }

    fn node(&self, id: &ItemId) -> &Node<T> {
        self.nodes.get(id).expect("dangling item id")
    }

    /// Number of items, containers included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree holds no items.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up an item.
    pub fn get(&self, id: &ItemId) -> Option<&Node<T>> {
        self.nodes.get(id)
    }

    /// Returns true if `id` is anywhere in the tree.
    pub fn contains_id(&self, id: &ItemId) -> bool {
        self.nodes.contains_key(id)
    }

    /// The root list.
    pub fn roots(&self) -> &Vector<ItemId> {
        &self.roots
    }

    /// The child list of `parent`, or the root list for `None`.
    ///
    /// Fails if `parent` is unknown or is a leaf.
    pub fn children(&self, parent: Option<&ItemId>) -> Result<&Vector<ItemId>, TreeError> {
        let Some(parent) = parent else {
            return Ok(&self.roots);
        };
        let node = self
            .nodes
            .get(parent)
            .ok_or_else(|| TreeError::UnknownItem(parent.clone()))?;
        node.children()
            .ok_or_else(|| TreeError::NotAContainer(parent.clone()))
    }

    /// Parent and index of `id`.
    pub fn locate(&self, id: &ItemId) -> Option<Location> {
        let node = self.nodes.get(id)?;
        let index = self.children(node.parent()).ok()?.index_of(id)?;
        Some(Location {
            parent: node.parent.clone(),
            index,
        })
    }

    /// Index of `id` among its siblings.
    pub fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.locate(id).map(|l| l.index)
    }

    /// Parent of `id`; `None` for root items and unknown ids.
    pub fn parent_of(&self, id: &ItemId) -> Option<&ItemId> {
        self.nodes.get(id)?.parent.as_ref()
    }

    /// Full position of `id`, tagged with `zone`.
    pub fn position_of(&self, id: &ItemId, zone: &ZoneId) -> Option<ItemPosition> {
        let Location { parent, index } = self.locate(id)?;
        Some(ItemPosition {
            id: id.clone(),
            parent,
            index,
            zone: zone.clone(),
        })
    }

    /// Ancestors of `id`, outermost first.
    pub fn ancestors(&self, id: &ItemId) -> Vec<ItemId> {
        let mut out = Vec::new();
        let mut current = self.parent_of(id);
        while let Some(parent) = current {
            out.push(parent.clone());
            current = self.parent_of(parent);
        }
        out.reverse();
        out
    }

    /// Returns true if `id` is `ancestor` or lies in its subtree.
    pub fn contains(&self, ancestor: &ItemId, id: &ItemId) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent_of(c);
        }
        false
    }

    /// Depth-first, pre-order iteration over every item.
    pub fn iter(&self) -> Preorder<'_, T> {
        Preorder {
            tree: self,
            stack: self.roots.iter().rev().collect(),
        }
    }

    /// Depth-first iteration over `id` and its descendants.
    pub fn descendants<'a>(&'a self, id: &'a ItemId) -> Preorder<'a, T> {
        let stack = if self.nodes.contains_key(id) {
            vec![id]
        } else {
            Vec::new()
        };
        Preorder { tree: self, stack }
    }

    /// First item in depth-first order matching `pred`.
    pub fn find(&self, mut pred: impl FnMut(&Node<T>) -> bool) -> Option<&Node<T>> {
        self.iter().find(|n| pred(n))
    }

    /// Last item in depth-first order matching `pred`.
    pub fn find_last(&self, mut pred: impl FnMut(&Node<T>) -> bool) -> Option<&Node<T>> {
        self.iter().filter(|n| pred(n)).last()
    }

    /// A new tree keeping only items matching `pred`.
    ///
    /// A rejected container takes its whole subtree with it.
    pub fn filter(&self, mut pred: impl FnMut(&Node<T>) -> bool) -> Self {
        let mut out = Self::new();
        out.roots = self.filter_list(&self.roots, None, &mut pred, &mut out.nodes);
        out
    }

    fn filter_list<F: FnMut(&Node<T>) -> bool>(
        &self,
        ids: &Vector<ItemId>,
        parent: Option<&ItemId>,
        pred: &mut F,
        out: &mut OrdMap<ItemId, Node<T>>,
    ) -> Vector<ItemId> {
        let mut kept = Vector::new();
        for id in ids {
            let node = self.node(id);
            if !pred(node) {
                continue;
            }
            let kind = match &node.kind {
                NodeKind::Leaf => NodeKind::Leaf,
                NodeKind::Group(children) => {
                    NodeKind::Group(self.filter_list(children, Some(id), pred, out))
                }
            };
            out.insert(
                id.clone(),
                Node {
                    id: id.clone(),
                    parent: parent.cloned(),
                    group: node.group.clone(),
                    disabled: node.disabled,
                    data: node.data.clone(),
                    kind,
                },
            );
            kept.push_back(id.clone());
        }
        kept
    }

    /// A new tree with every payload mapped through `f`, visited depth-first.
    pub fn map<U: Clone>(&self, mut f: impl FnMut(&Node<T>) -> U) -> ItemTree<U> {
        let mut nodes = OrdMap::new();
        for node in self.iter() {
            nodes.insert(
                node.id.clone(),
                Node {
                    id: node.id.clone(),
                    parent: node.parent.clone(),
                    group: node.group.clone(),
                    disabled: node.disabled,
                    data: f(node),
                    kind: node.kind.clone(),
                },
            );
        }
        ItemTree {
            nodes,
            roots: self.roots.clone(),
        }
    }

    /// Depth-first flatten, optionally keeping the containers themselves.
    pub fn to_flat_list(&self, include_containers: bool) -> Vec<&Node<T>> {
        self.iter()
            .filter(|n| include_containers || !n.is_container())
            .collect()
    }

    /// A fresh id not used by any item in the tree.
    pub fn generate_id(&self) -> ItemId {
        let mut n = self.nodes.len() + 1;
        loop {
            let id = ItemId::from(format!("item-{n}"));
            if !self.nodes.contains_key(&id) {
                return id;
            }
            n += 1;
        }
    }

    fn child_list_mut(&mut self, parent: Option<&ItemId>) -> Option<&mut Vector<ItemId>> {
        match parent {
            None => Some(&mut self.roots),
            Some(p) => match &mut self.nodes.get_mut(p)?.kind {
                NodeKind::Leaf => None,
                NodeKind::Group(children) => Some(children),
            },
        }
    }

    /// Remove `id` from its parent's list, keeping its nodes.
    pub(crate) fn unlink(&mut self, id: &ItemId) -> Option<Location> {
        let location = self.locate(id)?;
        self.child_list_mut(location.parent.as_ref())?
            .remove(location.index);
        Some(location)
    }

    /// Insert `id` into `parent`'s list at `index` (clamped).
    pub(crate) fn link(&mut self, id: &ItemId, parent: Option<&ItemId>, index: usize) -> bool {
        let Some(list) = self.child_list_mut(parent) else {
            return false;
        };
        list.insert(index.min(list.len()), id.clone());
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = parent.cloned();
        }
        true
    }

    /// Put `id` in the slot at `index` of `parent`, replacing whatever was there.
    pub(crate) fn put(&mut self, id: &ItemId, parent: Option<&ItemId>, index: usize) {
        if let Some(list) = self.child_list_mut(parent)
            && index < list.len()
        {
            list.set(index, id.clone());
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = parent.cloned();
        }
    }

    /// Detach `id` with its whole subtree.
    pub(crate) fn take_subtree(&mut self, id: &ItemId) -> Option<(Location, Subtree<T>)> {
        let location = self.unlink(id)?;
        let mut nodes = Vec::new();
        let mut stack = vec![id.clone()];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                if let Some(children) = node.children() {
                    stack.extend(children.iter().cloned());
                }
                nodes.push(node);
            }
        }
        Some((
            location,
            Subtree {
                root: id.clone(),
                nodes,
            },
        ))
    }

    /// Attach a detached subtree under `parent` at `index` (clamped).
    pub(crate) fn graft(&mut self, subtree: Subtree<T>, parent: Option<&ItemId>, index: usize) {
        for node in subtree.nodes {
            self.nodes.insert(node.id.clone(), node);
        }
        self.link(&subtree.root, parent, index);
    }
}

/// Pre-order iterator returned by [`ItemTree::iter`].
pub struct Preorder<'a, T> {
    tree: &'a ItemTree<T>,
    stack: Vec<&'a ItemId>,
}

impl<'a, T: Clone> Iterator for Preorder<'a, T> {
    type Item = &'a Node<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.node(id);
        if let Some(children) = node.children() {
            self.stack.extend(children.iter().rev());
        }
        Some(node)
    }
}

impl<T> fmt::Debug for Preorder<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preorder")
            .field("pending", &self.stack.len())
            .finish_non_exhaustive()
    }
}

impl<T: fmt::Debug> fmt::Debug for ItemTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.roots.iter().map(|id| Nested { tree: self, id }))
            .finish()
    }
}

struct Nested<'a, T> {
    tree: &'a ItemTree<T>,
    id: &'a ItemId,
}

impl<T: fmt::Debug> fmt::Debug for Nested<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tree.nodes.get(self.id).and_then(Node::children) {
            None => write!(f, "{:?}", self.id),
            Some(children) => {
                write!(f, "{:?}: ", self.id)?;
                f.debug_list()
                    .entries(children.iter().map(|id| Nested {
                        tree: self.tree,
                        id,
                    }))
                    .finish()
            }
        }
    }
}
