use common::geom::{Line, Pt};
use common::shapes::Shape;

use super::types::{Counts, Node, NodePool, Slot, SlotKind, Tag};

// Basis evaluation: the horizontal axis line carries u, the vertical carries
// v, mapping normalized [0,1]^2 traversal coordinates to world space.
pub(crate) fn world(axis_h: &Line, axis_v: &Line, u: f64, v: f64) -> Pt {
    Pt::new(axis_h.at(u).x, axis_v.at(v).y)
}

// Fair bisection order: 1/2, 1/4, 3/4, 1/8, 3/8, 5/8, 7/8, ... Always the
// unexplored midpoint of the densest unexplored gap; denominators are powers
// of two.
pub(crate) fn subdiv(i: u32) -> f64 {
    let level = 31 - (i + 1).leading_zeros();
    let k = i + 1 - (1u32 << level);
    (2 * k + 1) as f64 / (1u64 << (level + 1)) as f64
}

// Descend exactly `depth` levels toward the probe point (u, v), materializing
// unknown slots into fresh 4-tuples along the way, and mark the final cell
// perimeter. Returns the slot now standing where `slot` was.
pub(crate) fn insert(
    pool: &mut NodePool,
    slot: Slot,
    u: f64,
    v: f64,
    x: f64,
    y: f64,
    size: f64,
    depth: u32,
) -> Slot {
    if depth == 0 {
        return Slot::tag(Tag::Perimeter);
    }
    let node_idx = match slot.as_node() {
        Some(node_idx) => node_idx,
        None => {
            let node_idx = pool.len() as u32;
            pool.push(Node::filled(slot));
            node_idx
        }
    };
    let half = size * 0.5;
    let mut child = 0u8;
    let (mut cx, mut cy) = (x, y);
    if u >= x + half {
        child |= 1;
        cx += half;
    }
    if v >= y + half {
        child |= 2;
        cy += half;
    }
    let sub = pool[node_idx as usize].child(child);
    let sub = insert(pool, sub, u, v, cx, cy, half, depth - 1);
    pool[node_idx as usize].set_child(child, sub);
    Slot::node(node_idx)
}

// Scan phase: one horizontal and one vertical probe per bisection offset,
// inserting a perimeter leaf at full depth for every boundary crossing the
// shape reports. Enumerating every bisection level down to denominator
// 2^(depth+1) puts a probe through the interior of every row and column of
// cells at the target depth, so only boundary-adjacent regions subdivide.
pub(crate) fn scan(
    shape: &dyn Shape,
    depth: u32,
    axis_h: &Line,
    axis_v: &Line,
    pool: &mut NodePool,
) -> Slot {
    let mut start = Slot::tag(Tag::Unknown);
    let probes = (1u32 << (depth + 1)) - 1;
    let mut ts = Vec::new();
    for i in 0..probes {
        let offset = subdiv(i);

        let h_line = Line::new(
            world(axis_h, axis_v, 0.0, offset),
            world(axis_h, axis_v, 1.0, offset),
        );
        ts.clear();
        shape.line_intersections(&h_line, &mut ts, 0);
        for &t in &ts {
            // Endpoint hits lie on the bounding rect itself; the orthogonal
            // scan recovers any shape edge coincident with it.
            if t > 0.0 && t < 1.0 {
                start = insert(pool, start, t, offset, 0.0, 0.0, 1.0, depth);
            }
        }

        let v_line = Line::new(
            world(axis_h, axis_v, offset, 0.0),
            world(axis_h, axis_v, offset, 1.0),
        );
        ts.clear();
        shape.line_intersections(&v_line, &mut ts, 0);
        for &t in &ts {
            if t > 0.0 && t < 1.0 {
                start = insert(pool, start, offset, t, 0.0, 0.0, 1.0, depth);
            }
        }
    }
    start
}

// Tag phase: every unknown leaf is classified by a single containment sample
// at the cell center; all three terminal tags are counted. No unknown leaf
// survives this walk.
pub(crate) fn tag_leaves(
    pool: &mut NodePool,
    slot: Slot,
    x: f64,
    y: f64,
    size: f64,
    axis_h: &Line,
    axis_v: &Line,
    shape: &dyn Shape,
    counts: &mut Counts,
) -> Slot {
    match slot.kind() {
        SlotKind::Parent(node_idx) => {
            let half = size * 0.5;
            for child in 0..4u8 {
                let cx = x + if child & 1 != 0 { half } else { 0.0 };
                let cy = y + if child & 2 != 0 { half } else { 0.0 };
                let sub = pool[node_idx as usize].child(child);
                let sub = tag_leaves(pool, sub, cx, cy, half, axis_h, axis_v, shape, counts);
                pool[node_idx as usize].set_child(child, sub);
            }
            slot
        }
        SlotKind::Leaf(Tag::Perimeter) => {
            counts.perimeter += 1;
            slot
        }
        SlotKind::Leaf(Tag::Inside) => {
            counts.inside += 1;
            slot
        }
        SlotKind::Leaf(Tag::Outside) => {
            counts.outside += 1;
            slot
        }
        SlotKind::Leaf(Tag::Unknown) => {
            let center = world(axis_h, axis_v, x + size * 0.5, y + size * 0.5);
            if shape.contains(center) {
                counts.inside += 1;
                Slot::tag(Tag::Inside)
            } else {
                counts.outside += 1;
                Slot::tag(Tag::Outside)
            }
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct SumAcc {
    pub(crate) weight: f64,
    pub(crate) wu: f64,
    pub(crate) wv: f64,
}

// Sum phase: accumulate cell weights and weighted centers in normalized
// space. Inside cells weigh size^2, perimeter cells half that; the caller
// scales to world units once at the end, which keeps the partial sums free
// of world-magnitude terms.
pub(crate) fn sum_leaves(pool: &NodePool, slot: Slot, x: f64, y: f64, size: f64, acc: &mut SumAcc) {
    match slot.kind() {
        SlotKind::Parent(node_idx) => {
            let half = size * 0.5;
            let node = pool[node_idx as usize];
            for child in 0..4u8 {
                let cx = x + if child & 1 != 0 { half } else { 0.0 };
                let cy = y + if child & 2 != 0 { half } else { 0.0 };
                sum_leaves(pool, node.child(child), cx, cy, half, acc);
            }
        }
        SlotKind::Leaf(tag) => {
            let w = match tag {
                Tag::Inside => size * size,
                Tag::Perimeter => size * size * 0.5,
                Tag::Outside | Tag::Unknown => return,
            };
            acc.weight += w;
            acc.wu += w * (x + size * 0.5);
            acc.wv += w * (y + size * 0.5);
        }
    }
}
