//! Quadtree spatial partitioning structure
//!
//! Divides 2D space into hierarchical regions for the collision broad phase.
//! A node splits into four quadrants once it holds more than
//! `max_objects` boxes, and an object whose box spans several quadrants is
//! stored in every quadrant it touches. The tree is rebuilt every step, so
//! there is no removal.

use super::Aabb;
use crate::ecs::Entity;
use crate::foundation::math::Vec2;
use log::trace;
use serde::{Deserialize, Serialize};

/// Default number of objects a node holds before splitting
pub const MAX_OBJECTS: usize = 10;

/// Default maximum subdivision depth
pub const MAX_LEVELS: u32 = 5;

/// Configuration for quadtree behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadTreeConfig {
    /// Maximum objects per node before subdivision
    pub max_objects: usize,

    /// Maximum subdivision depth (root is level 0)
    pub max_levels: u32,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self {
            max_objects: MAX_OBJECTS,
            max_levels: MAX_LEVELS,
        }
    }
}

/// Entity stored in the quadtree together with its box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadTreeObject {
    /// Owning entity
    pub entity: Entity,
    /// Box used for placement
    pub aabb: Aabb,
}

/// Single node in the quadtree hierarchy
#[derive(Debug, Clone)]
pub struct QuadTreeNode {
    /// World-space bounds of this node
    pub bounds: Aabb,

    /// Depth in the tree (0 = root)
    pub level: u32,

    /// Objects stored at this node
    pub objects: Vec<QuadTreeObject>,

    /// Child quadrants: top-left, top-right, bottom-left, bottom-right
    pub children: Option<Box<[QuadTreeNode; 4]>>,
}

impl QuadTreeNode {
    /// Create a new leaf node
    pub const fn new(bounds: Aabb, level: u32) -> Self {
        Self {
            bounds,
            level,
            objects: Vec::new(),
            children: None,
        }
    }

    /// Check if this node is a leaf (has no children)
    pub const fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Insert an object into this node or its overlapping children
    pub fn insert(&mut self, object: QuadTreeObject, config: &QuadTreeConfig) {
        if let Some(children) = self.children.as_mut() {
            let mut placed = false;
            for child in children.iter_mut() {
                if child.bounds.intersects(&object.aabb) {
                    child.insert(object, config);
                    placed = true;
                }
            }
            if !placed {
                self.objects.push(object);
            }
            return;
        }

        self.objects.push(object);
        if self.objects.len() > config.max_objects {
            if self.level < config.max_levels {
                self.split(config);
            } else {
                trace!(
                    "quadtree leaf at max level {} holds {} objects",
                    self.level,
                    self.objects.len()
                );
            }
        }
    }

    /// Split into four equal quadrants and redistribute stored objects
    fn split(&mut self, config: &QuadTreeConfig) {
        if self.children.is_some() {
            return;
        }

        let min = self.bounds.min;
        let max = self.bounds.max;
        let center = self.bounds.center();
        let level = self.level + 1;

        self.children = Some(Box::new([
            Self::new(Aabb::new(min, center), level),
            Self::new(Aabb::new(Vec2::new(center.x, min.y), Vec2::new(max.x, center.y)), level),
            Self::new(Aabb::new(Vec2::new(min.x, center.y), Vec2::new(center.x, max.y)), level),
            Self::new(Aabb::new(center, max), level),
        ]));

        for object in std::mem::take(&mut self.objects) {
            self.insert(object, config);
        }
    }

    /// Append every object that may intersect `aabb`
    ///
    /// Objects stored at this node are always appended; children are visited
    /// only when their bounds overlap the query.
    pub fn retrieve(&self, out: &mut Vec<Entity>, aabb: &Aabb) {
        out.extend(self.objects.iter().map(|object| object.entity));

        if let Some(children) = &self.children {
            for child in children.iter() {
                if child.bounds.intersects(aabb) {
                    child.retrieve(out, aabb);
                }
            }
        }
    }

    /// Count stored objects in this node and all children, duplicates included
    pub fn count_objects(&self) -> usize {
        self.objects.len()
            + self
                .children
                .as_ref()
                .map_or(0, |children| children.iter().map(Self::count_objects).sum())
    }

    /// Count nodes in this subtree
    pub fn count_nodes(&self) -> usize {
        1 + self
            .children
            .as_ref()
            .map_or(0, |children| children.iter().map(Self::count_nodes).sum())
    }

    /// Deepest level in this subtree
    pub fn max_level(&self) -> u32 {
        self.children.as_ref().map_or(self.level, |children| {
            children.iter().map(Self::max_level).max().unwrap_or(self.level)
        })
    }
}

/// Quadtree over a fixed world rectangle
#[derive(Debug, Clone)]
pub struct QuadTree {
    /// Root node covering the world bounds
    pub root: QuadTreeNode,

    /// Objects not fully inside the root bounds; kept at the root and
    /// returned by every query
    outliers: Vec<QuadTreeObject>,

    config: QuadTreeConfig,
}

impl QuadTree {
    /// Create a new quadtree with given world bounds
    pub const fn new(world_bounds: Aabb, config: QuadTreeConfig) -> Self {
        Self {
            root: QuadTreeNode::new(world_bounds, 0),
            outliers: Vec::new(),
            config,
        }
    }

    /// Insert an entity's box
    pub fn insert(&mut self, entity: Entity, aabb: Aabb) {
        let object = QuadTreeObject { entity, aabb };
        if self.root.bounds.contains(&aabb) {
            self.root.insert(object, &self.config);
        } else {
            trace!("{entity} lies outside the quadtree root bounds");
            self.outliers.push(object);
        }
    }

    /// Append candidates for `aabb` to `out`
    ///
    /// The result is a superset of the inserted entities whose box intersects
    /// `aabb`; an entity may appear more than once.
    pub fn retrieve(&self, out: &mut Vec<Entity>, aabb: &Aabb) {
        out.extend(self.outliers.iter().map(|object| object.entity));
        self.root.retrieve(out, aabb);
    }

    /// Sorted, deduplicated candidates for `aabb`
    pub fn retrieve_unique(&self, aabb: &Aabb) -> Vec<Entity> {
        let mut out = Vec::new();
        self.retrieve(&mut out, aabb);
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Drop all objects and children
    pub fn clear(&mut self) {
        self.root = QuadTreeNode::new(self.root.bounds, 0);
        self.outliers.clear();
    }

    /// Replace the world bounds; clears the tree
    pub fn set_bounds(&mut self, bounds: Aabb) {
        self.root = QuadTreeNode::new(bounds, 0);
        self.outliers.clear();
    }

    /// World bounds covered by the root
    pub const fn bounds(&self) -> Aabb {
        self.root.bounds
    }

    /// Active configuration
    pub const fn config(&self) -> &QuadTreeConfig {
        &self.config
    }

    /// Stored objects, counting duplicates across quadrants
    pub fn object_count(&self) -> usize {
        self.root.count_objects() + self.outliers.len()
    }

    /// Total number of nodes
    pub fn node_count(&self) -> usize {
        self.root.count_nodes()
    }

    /// Deepest level currently in use
    pub fn depth(&self) -> u32 {
        self.root.max_level()
    }
}
