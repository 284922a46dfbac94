//! Fully materialized media hierarchy
//!
//! `MediaTree` is an arena of group nodes. Children are owned by the arena
//! and referenced by index; parent back-references are non-owning indices,
//! so the tree has no reference cycles.

use crate::core::library::MediaItem;

/// Index of a group node inside a [`MediaTree`].
pub type GroupId = usize;

/// A named node in the hierarchy. Leaf groups hold items, container groups
/// hold children.
#[derive(Debug)]
pub struct GroupNode {
    pub name: String,
    pub parent: Option<GroupId>,
    pub children: Vec<GroupId>,
    pub items: Vec<MediaItem>,
}

/// A fully loaded, synchronously traversable group tree.
#[derive(Debug)]
pub struct MediaTree {
    nodes: Vec<GroupNode>,
}

impl MediaTree {
    /// Create a tree containing only the root group.
    pub fn new<S: Into<String>>(root_name: S) -> Self {
        Self {
            nodes: vec![GroupNode {
                name: root_name.into(),
                parent: None,
                children: Vec::new(),
                items: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> GroupId {
        0
    }

    /// Append a child group under `parent` and return its id.
    pub fn add_group<S: Into<String>>(&mut self, parent: GroupId, name: S) -> GroupId {
        let id = self.nodes.len();
        self.nodes.push(GroupNode {
            name: name.into(),
            parent: Some(parent),
            children: Vec::new(),
            items: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub fn set_items(&mut self, id: GroupId, items: Vec<MediaItem>) {
        self.nodes[id].items = items;
    }

    pub fn node(&self, id: GroupId) -> &GroupNode {
        &self.nodes[id]
    }

    pub fn group_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn item_count(&self) -> usize {
        self.nodes.iter().map(|n| n.items.len()).sum()
    }

    /// Export path of a group: the `/`-joined names of its ancestors and
    /// itself, most distant first. The root group is never part of the path.
    pub fn group_path(&self, id: GroupId) -> String {
        let mut path = self.nodes[id].name.clone();
        let mut current = id;

        while let Some(parent) = self.nodes[current].parent {
            // Stop at the root group.
            if self.nodes[parent].parent.is_none() {
                break;
            }
            path = format!("{}/{}", self.nodes[parent].name, path);
            current = parent;
        }

        path
    }
}
