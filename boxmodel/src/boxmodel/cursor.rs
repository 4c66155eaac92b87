use common::geom::{Line, Pt, Rect};
use std::cell::Ref;

use super::api::BoxModel;
use super::types::{CursorStack, NodePool, Slot, SlotKind, Tag, SENTINEL_CHILD};

// Depth-first iterator over the leaf cells carrying one target tag. The
// traversal state lives in an explicit frame stack so the walk can be
// suspended between yields; cells are tracked in normalized [0,1]^2
// coordinates where size == 2^-level, and mapped to world space on yield.
pub struct Cursor<'a> {
    pool: Ref<'a, NodePool>,
    model: &'a BoxModel,
    target: Tag,
    slot: Slot,
    stack: CursorStack,
    x: f64,
    y: f64,
    size: f64,
    started: bool,
    done: bool,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(model: &'a BoxModel, target: Tag) -> Self {
        let mut stack = CursorStack::new();
        // Synthetic root frame; ascending past it reads as exhaustion.
        stack.push((0, SENTINEL_CHILD));
        Self {
            pool: model.pool.borrow(),
            model,
            target,
            slot: model.start,
            stack,
            x: 0.0,
            y: 0.0,
            size: 1.0,
            started: false,
            done: false,
        }
    }

    // Descend into `child` of the node at `node_idx` (the current slot).
    fn move_to(&mut self, node_idx: u32, child: u8) {
        self.stack.push((node_idx, child));
        self.size *= 0.5;
        if child & 1 != 0 {
            self.x += self.size;
        }
        if child & 2 != 0 {
            self.y += self.size;
        }
        self.slot = self.pool[node_idx as usize].child(child);
    }

    // Ascend one level, restoring the cell coordinates. Returns the child bit
    // that was taken to get here, or the sentinel at the synthetic root.
    fn pop(&mut self) -> u8 {
        let (node_idx, child) = self.stack.pop().expect("cursor stack underflow");
        if child == SENTINEL_CHILD {
            // Leave the synthetic frame in place for repeated calls.
            self.stack.push((node_idx, child));
            return SENTINEL_CHILD;
        }
        if child & 1 != 0 {
            self.x -= self.size;
        }
        if child & 2 != 0 {
            self.y -= self.size;
        }
        self.size *= 2.0;
        self.slot = Slot::node(node_idx);
        child
    }

    // Advance to the next matching leaf, beginning the search at
    // `start_child` of the current node. Returns false once exhausted.
    fn next_leaf(&mut self, start_child: u8) -> bool {
        let mut child = start_child;
        loop {
            match self.slot.kind() {
                SlotKind::Parent(node_idx) => {
                    if child < 4 {
                        self.move_to(node_idx, child);
                        child = 0;
                        continue;
                    }
                }
                SlotKind::Leaf(tag) => {
                    if child == 0 && tag == self.target {
                        return true;
                    }
                }
            }
            let taken = self.pop();
            if taken == SENTINEL_CHILD {
                return false;
            }
            child = taken + 1;
        }
    }

    // World-space bounds of the current cell.
    fn bounds(&self) -> Rect {
        Rect::new(
            self.model.world(self.x, self.y),
            self.model.world(self.x + self.size, self.y + self.size),
        )
    }
}

impl Iterator for Cursor<'_> {
    type Item = Rect;

    fn next(&mut self) -> Option<Rect> {
        if self.done {
            return None;
        }
        let found = if !self.started {
            self.started = true;
            self.next_leaf(0)
        } else {
            // Resume at the sibling after the leaf yielded last time.
            let taken = self.pop();
            taken != SENTINEL_CHILD && self.next_leaf(taken + 1)
        };
        if found {
            Some(self.bounds())
        } else {
            self.done = true;
            None
        }
    }
}

// Point classification by midpoint descent over world-space boxes.
pub(crate) fn tag_at(pool: &NodePool, start: Slot, bounds: Rect, pt: Pt) -> Tag {
    let mut slot = start;
    let mut rect = bounds;
    loop {
        match slot.kind() {
            SlotKind::Leaf(tag) => return tag,
            SlotKind::Parent(node_idx) => {
                let mid = rect.center();
                let mut child = 0u8;
                if pt.x >= mid.x {
                    child |= 1;
                    rect.min.x = mid.x;
                } else {
                    rect.max.x = mid.x;
                }
                if pt.y >= mid.y {
                    child |= 2;
                    rect.min.y = mid.y;
                } else {
                    rect.max.y = mid.y;
                }
                slot = pool[node_idx as usize].child(child);
            }
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub(crate) struct RawHit {
    pub(crate) t: f64,
    pub(crate) tag: Tag,
}

pub(crate) fn child_rect(rect: Rect, mid: Pt, child: u8) -> Rect {
    Rect::new(
        Pt::new(
            if child & 1 != 0 { mid.x } else { rect.min.x },
            if child & 2 != 0 { mid.y } else { rect.min.y },
        ),
        Pt::new(
            if child & 1 != 0 { rect.max.x } else { mid.x },
            if child & 2 != 0 { rect.max.y } else { mid.y },
        ),
    )
}

// Gather one raw (t, tag) sample per leaf cell the line passes through. The
// recorded parameter is the midpoint of the cell's clip interval, which also
// covers the corner-graze case where entry and exit coincide.
pub(crate) fn line_hits(
    pool: &NodePool,
    slot: Slot,
    rect: Rect,
    line: &Line,
    hits: &mut Vec<RawHit>,
) {
    let (t0, t1) = match rect.clip_line(line) {
        Some(clip) => clip,
        None => return,
    };
    match slot.kind() {
        SlotKind::Leaf(tag) => hits.push(RawHit {
            t: (t0 + t1) * 0.5,
            tag,
        }),
        SlotKind::Parent(node_idx) => {
            let node = pool[node_idx as usize];
            let mid = rect.center();
            for child in 0..4u8 {
                line_hits(pool, node.child(child), child_rect(rect, mid, child), line, hits);
            }
        }
    }
}
