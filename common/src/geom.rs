use rand::Rng;
use std::ops::{Add, Mul, Neg, Sub};

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Pt {
    pub x: f64,
    pub y: f64,
}

impl Pt {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Pt) -> f64 {
        self.x * other.x + self.y * other.y
    }

    // 2D cross product magnitude; sign gives orientation.
    pub fn cross(self, other: Pt) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn distance(self, other: Pt) -> f64 {
        (self - other).dot(self - other).sqrt()
    }

    pub fn midpoint(self, other: Pt) -> Pt {
        Pt::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

impl Add for Pt {
    type Output = Pt;
    fn add(self, other: Pt) -> Pt {
        Pt::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Pt {
    type Output = Pt;
    fn sub(self, other: Pt) -> Pt {
        Pt::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Pt {
    type Output = Pt;
    fn mul(self, s: f64) -> Pt {
        Pt::new(self.x * s, self.y * s)
    }
}

impl Neg for Pt {
    type Output = Pt;
    fn neg(self) -> Pt {
        Pt::new(-self.x, -self.y)
    }
}

// A parametric segment: at(0) == a, at(1) == b.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Line {
    pub a: Pt,
    pub b: Pt,
}

impl Line {
    pub fn new(a: Pt, b: Pt) -> Self {
        Self { a, b }
    }

    pub fn at(&self, t: f64) -> Pt {
        self.a + (self.b - self.a) * t
    }

    pub fn delta(&self) -> Pt {
        self.b - self.a
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    pub min: Pt,
    pub max: Pt,
}

impl Rect {
    pub fn new(min: Pt, max: Pt) -> Self {
        Self { min, max }
    }

    // Bounding rect of a point set; None for an empty set.
    pub fn from_points(points: &[Pt]) -> Option<Rect> {
        let first = *points.first()?;
        let mut rect = Rect::new(first, first);
        for &p in &points[1..] {
            rect.min.x = rect.min.x.min(p.x);
            rect.min.y = rect.min.y.min(p.y);
            rect.max.x = rect.max.x.max(p.x);
            rect.max.y = rect.max.y.max(p.y);
        }
        Some(rect)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Pt {
        self.min.midpoint(self.max)
    }

    pub fn contains_point(&self, pt: Pt) -> bool {
        pt.x >= self.min.x && pt.x <= self.max.x && pt.y >= self.min.y && pt.y <= self.max.y
    }

    pub fn corners(&self) -> [Pt; 4] {
        [
            self.min,
            Pt::new(self.max.x, self.min.y),
            self.max,
            Pt::new(self.min.x, self.max.y),
        ]
    }

    // Liang-Barsky parametric clip of a segment against this rect. Returns the
    // (entry, exit) parameters along `line`, or None when the segment misses.
    pub fn clip_line(&self, line: &Line) -> Option<(f64, f64)> {
        let d = line.delta();
        let mut t0 = 0.0f64;
        let mut t1 = 1.0f64;
        let checks = [
            (-d.x, line.a.x - self.min.x),
            (d.x, self.max.x - line.a.x),
            (-d.y, line.a.y - self.min.y),
            (d.y, self.max.y - line.a.y),
        ];
        for (p, q) in checks {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
            } else {
                let r = q / p;
                if p < 0.0 {
                    if r > t1 {
                        return None;
                    }
                    if r > t0 {
                        t0 = r;
                    }
                } else {
                    if r < t0 {
                        return None;
                    }
                    if r < t1 {
                        t1 = r;
                    }
                }
            }
        }
        Some((t0, t1))
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Pt {
        Pt::new(
            safe_randf64(rng, self.min.x, self.max.x),
            safe_randf64(rng, self.min.y, self.max.y),
        )
    }
}

fn safe_randf64<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    if min >= max {
        return min;
    }
    rng.gen_range(min..=max)
}

// Andrew's monotone chain; returns the hull in counter-clockwise order.
// Collinear points on the hull boundary are dropped.
pub fn convex_hull(points: &[Pt]) -> Vec<Pt> {
    let mut pts: Vec<Pt> = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup_by(|a, b| a.x == b.x && a.y == b.y);
    if pts.len() < 3 {
        return pts;
    }

    fn turns_right(o: Pt, a: Pt, b: Pt) -> bool {
        (a - o).cross(b - o) <= 0.0
    }

    let mut hull: Vec<Pt> = Vec::with_capacity(pts.len() * 2);
    for &p in pts.iter() {
        while hull.len() >= 2 && turns_right(hull[hull.len() - 2], hull[hull.len() - 1], p) {
            hull.pop();
        }
        hull.push(p);
    }
    let lower_len = hull.len() + 1;
    for &p in pts.iter().rev().skip(1) {
        while hull.len() >= lower_len && turns_right(hull[hull.len() - 2], hull[hull.len() - 1], p)
        {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    hull
}
