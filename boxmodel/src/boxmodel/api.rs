use common::geom::{convex_hull, Line, Pt, Rect};
use common::shapes::Shape;
use std::cell::RefCell;
use std::rc::Rc;

use super::build::{scan, sum_leaves, tag_leaves, world, SumAcc};
use super::cursor::{line_hits, tag_at, Cursor, RawHit};
use super::types::{Counts, NodePool, SharedPool, Slot, Tag};

// A compressed quadtree voxelization of a shape: space is classified as
// inside, outside, or perimeter down to a fixed subdivision depth, with the
// tree encoded pointer-free in a flat node pool. A finished model is
// immutable and cheap to clone; the pool may be shared with a Compressor.
#[derive(Debug, Clone)]
pub struct BoxModel {
    pub(crate) start: Slot,
    pub(crate) pool: SharedPool,
    pub(crate) depth: u32,
    pub(crate) axis_h: Line,
    pub(crate) axis_v: Line,
    pub(crate) counts: Counts,
    pub(crate) area: f64,
    pub(crate) centroid: Pt,
}

impl BoxModel {
    // Voxelize `shape` into a box tree of the given subdivision depth:
    // scan the boundary to full resolution, classify the remaining space,
    // then accumulate area and centroid.
    pub fn new(shape: &dyn Shape, depth: u32) -> Self {
        let hull = shape.convex_hull();
        let bounds = match Rect::from_points(&hull) {
            Some(bounds) if bounds.area() > 0.0 => bounds,
            other => return Self::degenerate(other, depth),
        };
        let axis_h = Line::new(bounds.min, Pt::new(bounds.max.x, bounds.min.y));
        let axis_v = Line::new(bounds.min, Pt::new(bounds.min.x, bounds.max.y));

        let mut pool = NodePool::new();
        let mut start = scan(shape, depth, &axis_h, &axis_v, &mut pool);
        let mut counts = Counts::default();
        start = tag_leaves(
            &mut pool, start, 0.0, 0.0, 1.0, &axis_h, &axis_v, shape, &mut counts,
        );
        let mut acc = SumAcc::default();
        sum_leaves(&pool, start, 0.0, 0.0, 1.0, &mut acc);
        let area = acc.weight * bounds.area();
        let centroid = if acc.weight > 0.0 {
            world(&axis_h, &axis_v, acc.wu / acc.weight, acc.wv / acc.weight)
        } else {
            bounds.center()
        };

        Self {
            start,
            pool: Rc::new(RefCell::new(pool)),
            depth,
            axis_h,
            axis_v,
            counts,
            area,
            centroid,
        }
    }

    // Degenerate input (empty hull or zero-area bounds) still builds a valid
    // tree: a single all-outside leaf reporting zero area.
    fn degenerate(bounds: Option<Rect>, depth: u32) -> Self {
        let bounds = bounds.unwrap_or(Rect::new(Pt::default(), Pt::default()));
        Self {
            start: Slot::tag(Tag::Outside),
            pool: Rc::new(RefCell::new(NodePool::new())),
            depth,
            axis_h: Line::new(bounds.min, Pt::new(bounds.max.x, bounds.min.y)),
            axis_v: Line::new(bounds.min, Pt::new(bounds.min.x, bounds.max.y)),
            counts: Counts {
                inside: 0,
                outside: 1,
                perimeter: 0,
            },
            area: 0.0,
            centroid: bounds.center(),
        }
    }

    pub fn inside(&self) -> u32 {
        self.counts.inside
    }

    pub fn outside(&self) -> u32 {
        self.counts.outside
    }

    pub fn perimeter(&self) -> u32 {
        self.counts.perimeter
    }

    pub fn inside_cursor(&self) -> Cursor<'_> {
        Cursor::new(self, Tag::Inside)
    }

    pub fn outside_cursor(&self) -> Cursor<'_> {
        Cursor::new(self, Tag::Outside)
    }

    pub fn perimeter_cursor(&self) -> Cursor<'_> {
        Cursor::new(self, Tag::Perimeter)
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    // Shape polarity is not tracked at this resolution.
    pub fn signed_area(&self) -> f64 {
        self.area
    }

    pub fn centroid(&self) -> Pt {
        self.centroid
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    // World-space bounds of the whole tree.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.world(0.0, 0.0), self.world(1.0, 1.0))
    }

    // Physical nodes in the backing pool. For a model sharing a compressor's
    // pool this counts the whole shared pool, not just this tree's nodes.
    pub fn node_count(&self) -> usize {
        self.pool.borrow().len()
    }

    pub fn contains(&self, pt: Pt) -> bool {
        let bounds = self.bounds();
        if !bounds.contains_point(pt) {
            return false;
        }
        let pool = self.pool.borrow();
        matches!(
            tag_at(&pool, self.start, bounds, pt),
            Tag::Inside | Tag::Perimeter
        )
    }

    // Hull of the corners of every inside box: a bounded, slightly
    // conservative proxy for the shape's own hull.
    pub fn convex_hull(&self) -> Vec<Pt> {
        let mut corners = Vec::new();
        for rect in self.inside_cursor() {
            corners.extend(rect.corners());
        }
        convex_hull(&corners)
    }

    // Boundary crossings of `line`, sorted raw cell hits merged into one
    // crossing per perimeter run. A limit of 0 means unbounded; otherwise
    // reporting stops once `crossings` holds `limit` entries.
    pub fn line_intersections(&self, line: &Line, crossings: &mut Vec<f64>, limit: usize) {
        let pool = self.pool.borrow();
        let mut raw: Vec<RawHit> = Vec::new();
        line_hits(&pool, self.start, self.bounds(), line, &mut raw);
        raw.sort_by(|a, b| a.t.total_cmp(&b.t));

        // A run of consecutive perimeter hits is one real crossing sampled by
        // several adjacent boundary cells.
        let mut run: Option<(f64, f64)> = None;
        for hit in raw {
            if hit.tag == Tag::Perimeter {
                run = match run {
                    Some((first, _)) => Some((first, hit.t)),
                    None => Some((hit.t, hit.t)),
                };
            } else if let Some((first, last)) = run.take() {
                if limit != 0 && crossings.len() >= limit {
                    return;
                }
                crossings.push(merge_run(first, last));
            }
        }
        // A run still open at the end is a crossing too: the probe leaves the
        // tree through boundary cells.
        if let Some((first, last)) = run {
            if limit != 0 && crossings.len() >= limit {
                return;
            }
            crossings.push(merge_run(first, last));
        }
    }

    pub(crate) fn world(&self, u: f64, v: f64) -> Pt {
        world(&self.axis_h, &self.axis_v, u, v)
    }
}

fn merge_run(first: f64, last: f64) -> f64 {
    if first == last {
        first
    } else {
        (first + last) * 0.5
    }
}

// A finished model can stand in for the shape that produced it.
impl Shape for BoxModel {
    fn contains(&self, pt: Pt) -> bool {
        BoxModel::contains(self, pt)
    }

    fn line_intersections(&self, line: &Line, hits: &mut Vec<f64>, limit: usize) {
        BoxModel::line_intersections(self, line, hits, limit)
    }

    fn convex_hull(&self) -> Vec<Pt> {
        BoxModel::convex_hull(self)
    }
}
