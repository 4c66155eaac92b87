use crate::geom::{convex_hull, Line, Pt};
use std::fmt::Debug;

pub trait Shape: Debug {
    fn contains(&self, pt: Pt) -> bool;

    // Appends the parametric t values along `line` where the shape boundary
    // crosses it, in no particular order. A limit of 0 means unbounded;
    // otherwise reporting stops once `hits` holds `limit` entries.
    fn line_intersections(&self, line: &Line, hits: &mut Vec<f64>, limit: usize);

    fn convex_hull(&self) -> Vec<Pt>;
}

#[derive(Debug, Copy, Clone)]
pub struct Circle {
    pub center: Pt,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Pt, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }
}

impl Shape for Circle {
    fn contains(&self, pt: Pt) -> bool {
        let d = pt - self.center;
        d.dot(d) <= self.radius * self.radius
    }

    fn line_intersections(&self, line: &Line, hits: &mut Vec<f64>, limit: usize) {
        let d = line.delta();
        let f = line.a - self.center;
        let a = d.dot(d);
        if a == 0.0 {
            return;
        }
        let b = 2.0 * f.dot(d);
        let c = f.dot(f) - self.radius * self.radius;
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            return;
        }
        let sq = disc.sqrt();
        let mut roots = [(-b - sq) / (2.0 * a), (-b + sq) / (2.0 * a)];
        if disc == 0.0 {
            // Tangent line: one touch point, not two.
            roots[1] = f64::NAN;
        }
        for t in roots {
            if !(0.0..=1.0).contains(&t) {
                continue;
            }
            if limit != 0 && hits.len() >= limit {
                return;
            }
            hits.push(t);
        }
    }

    fn convex_hull(&self) -> Vec<Pt> {
        // Inscribed 32-gon starting at angle 0, so the four axis extremes are
        // vertices and the hull's bounding rect matches the circle's exactly.
        let n = 32;
        (0..n)
            .map(|i| {
                let a = (i as f64) * std::f64::consts::TAU / (n as f64);
                self.center + Pt::new(a.cos(), a.sin()) * self.radius
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct Polygon {
    verts: Vec<Pt>,
}

impl Polygon {
    pub fn new(verts: Vec<Pt>) -> Self {
        Self { verts }
    }

    pub fn triangle(a: Pt, b: Pt, c: Pt) -> Self {
        Self::new(vec![a, b, c])
    }

    pub fn verts(&self) -> &[Pt] {
        &self.verts
    }

    // Shoelace area, orientation-independent.
    pub fn area(&self) -> f64 {
        let n = self.verts.len();
        let mut twice = 0.0;
        for i in 0..n {
            twice += self.verts[i].cross(self.verts[(i + 1) % n]);
        }
        (twice * 0.5).abs()
    }
}

impl Shape for Polygon {
    fn contains(&self, pt: Pt) -> bool {
        // Even-odd ray cast against a horizontal ray to +x.
        let n = self.verts.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (pi, pj) = (self.verts[i], self.verts[j]);
            if (pi.y > pt.y) != (pj.y > pt.y) {
                let x = pi.x + (pt.y - pi.y) / (pj.y - pi.y) * (pj.x - pi.x);
                if pt.x < x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    fn line_intersections(&self, line: &Line, hits: &mut Vec<f64>, limit: usize) {
        let n = self.verts.len();
        let d = line.delta();
        for i in 0..n {
            let q0 = self.verts[i];
            let q1 = self.verts[(i + 1) % n];
            let e = q1 - q0;
            let denom = d.cross(e);
            if denom == 0.0 {
                // Parallel or collinear edge; no single crossing parameter.
                continue;
            }
            let diff = q0 - line.a;
            let t = diff.cross(e) / denom;
            let s = diff.cross(d) / denom;
            if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&s) {
                if limit != 0 && hits.len() >= limit {
                    return;
                }
                hits.push(t);
            }
        }
    }

    fn convex_hull(&self) -> Vec<Pt> {
        convex_hull(&self.verts)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Op {
    Union,
    Intersect,
    Subtract,
}

// Boolean combination of two shapes. Containment is exact; boundary reporting
// filters each operand's crossings by membership of the other operand, which
// is correct everywhere except tangencies.
#[derive(Debug, Clone)]
pub struct Boolean<A, B> {
    op: Op,
    a: A,
    b: B,
}

impl<A: Shape, B: Shape> Boolean<A, B> {
    pub fn new(op: Op, a: A, b: B) -> Self {
        Self { op, a, b }
    }

    pub fn union(a: A, b: B) -> Self {
        Self::new(Op::Union, a, b)
    }

    pub fn intersect(a: A, b: B) -> Self {
        Self::new(Op::Intersect, a, b)
    }

    pub fn subtract(a: A, b: B) -> Self {
        Self::new(Op::Subtract, a, b)
    }
}

impl<A: Shape, B: Shape> Shape for Boolean<A, B> {
    fn contains(&self, pt: Pt) -> bool {
        match self.op {
            Op::Union => self.a.contains(pt) || self.b.contains(pt),
            Op::Intersect => self.a.contains(pt) && self.b.contains(pt),
            Op::Subtract => self.a.contains(pt) && !self.b.contains(pt),
        }
    }

    fn line_intersections(&self, line: &Line, hits: &mut Vec<f64>, limit: usize) {
        let mut from_a = Vec::new();
        let mut from_b = Vec::new();
        self.a.line_intersections(line, &mut from_a, 0);
        self.b.line_intersections(line, &mut from_b, 0);

        // A crossing of one operand survives iff the point sits on the
        // combined boundary, decided by membership of the other operand.
        for t in from_a {
            let p = line.at(t);
            let keep = match self.op {
                Op::Union => !self.b.contains(p),
                Op::Intersect => self.b.contains(p),
                Op::Subtract => !self.b.contains(p),
            };
            if keep {
                if limit != 0 && hits.len() >= limit {
                    return;
                }
                hits.push(t);
            }
        }
        for t in from_b {
            let p = line.at(t);
            let keep = match self.op {
                Op::Union => !self.a.contains(p),
                Op::Intersect => self.a.contains(p),
                Op::Subtract => self.a.contains(p),
            };
            if keep {
                if limit != 0 && hits.len() >= limit {
                    return;
                }
                hits.push(t);
            }
        }
    }

    fn convex_hull(&self) -> Vec<Pt> {
        match self.op {
            Op::Union => {
                let mut pts = self.a.convex_hull();
                pts.extend(self.b.convex_hull());
                convex_hull(&pts)
            }
            // Conservative: the result is contained in the left operand.
            Op::Intersect | Op::Subtract => self.a.convex_hull(),
        }
    }
}
