use fxhash::{FxHashMap, FxHashSet};
use std::cell::RefCell;
use std::rc::Rc;

use super::api::BoxModel;
use super::types::{Node, NodePool, SharedPool, Slot};
use crate::error::{BoxModelError, BoxModelResult};

// Canonicalizes the node pools of many box models into one shared pool.
// Recursively identical subtrees collapse to a single physical node, no
// matter which model or region produced them. Adds are single-writer: no
// tree registered here may be read while an add is in flight.
pub struct Compressor {
    pool: SharedPool,
    canonical: FxHashMap<Node, u32>,
    trees: FxHashMap<String, BoxModel>,
    logical_nodes: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CompressorStats {
    // Sum of the input trees' own node counts.
    pub logical_nodes: usize,
    // Nodes actually held in the shared pool.
    pub physical_nodes: usize,
}

impl Compressor {
    pub fn new() -> Self {
        Self {
            pool: Rc::new(RefCell::new(NodePool::new())),
            canonical: FxHashMap::default(),
            trees: FxHashMap::default(),
            logical_nodes: 0,
        }
    }

    // Take ownership of `model`, fold its nodes into the shared pool, and
    // return a lightweight handle bound to it. Names are unique per
    // compressor; a duplicate is an error, never an overwrite.
    pub fn add(&mut self, name: &str, model: BoxModel) -> BoxModelResult<BoxModel> {
        if self.trees.contains_key(name) {
            return Err(BoxModelError::DuplicateName {
                name: name.to_string(),
            });
        }

        let compressed = if Rc::ptr_eq(&model.pool, &self.pool) {
            // Already bound to this pool; its slots are canonical as-is.
            self.logical_nodes += reachable_nodes(&self.pool.borrow(), model.start);
            model
        } else {
            let src = model.pool.borrow();
            let mut pool = self.pool.borrow_mut();
            let mut memo: FxHashMap<u32, Slot> = FxHashMap::default();
            let start = canonicalize(
                &mut pool,
                &mut self.canonical,
                &mut memo,
                &src,
                model.start,
            );
            // Every distinct source node was visited exactly once.
            self.logical_nodes += memo.len();
            drop(pool);
            drop(src);
            BoxModel {
                start,
                pool: Rc::clone(&self.pool),
                depth: model.depth,
                axis_h: model.axis_h,
                axis_v: model.axis_v,
                counts: model.counts,
                area: model.area,
                centroid: model.centroid,
            }
        };

        self.trees.insert(name.to_string(), compressed.clone());
        Ok(compressed)
    }

    pub fn get(&self, name: &str) -> Option<BoxModel> {
        self.trees.get(name).cloned()
    }

    pub fn all(&self) -> &FxHashMap<String, BoxModel> {
        &self.trees
    }

    pub fn stats(&self) -> CompressorStats {
        CompressorStats {
            logical_nodes: self.logical_nodes,
            physical_nodes: self.pool.borrow().len(),
        }
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new()
    }
}

// Post-order hash-consing: a node's canonical id can only be assigned once
// its children's canonical ids are known. Tags are already canonical. The
// memo keeps each add linear in the source pool even when the source already
// shares subtrees.
fn canonicalize(
    pool: &mut NodePool,
    canonical: &mut FxHashMap<Node, u32>,
    memo: &mut FxHashMap<u32, Slot>,
    src: &NodePool,
    slot: Slot,
) -> Slot {
    let src_idx = match slot.as_node() {
        Some(src_idx) => src_idx,
        None => return slot,
    };
    if let Some(&mapped) = memo.get(&src_idx) {
        return mapped;
    }
    let children = src[src_idx as usize]
        .children()
        .map(|child| canonicalize(pool, canonical, memo, src, child));
    let canon = Node::new(children);
    let mapped = match canonical.get(&canon) {
        Some(&id) => Slot::node(id),
        None => {
            let id = pool.len() as u32;
            pool.push(canon);
            canonical.insert(canon, id);
            Slot::node(id)
        }
    };
    memo.insert(src_idx, mapped);
    mapped
}

// Distinct pool nodes reachable from `start`; the pool is a DAG, so a
// visited set is required, not an optimization.
fn reachable_nodes(pool: &NodePool, start: Slot) -> usize {
    fn walk(pool: &NodePool, slot: Slot, seen: &mut FxHashSet<u32>) {
        if let Some(node_idx) = slot.as_node() {
            if seen.insert(node_idx) {
                for child in pool[node_idx as usize].children() {
                    walk(pool, child, seen);
                }
            }
        }
    }
    let mut seen = FxHashSet::default();
    walk(pool, start, &mut seen);
    seen.len()
}
