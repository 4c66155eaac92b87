use common::geom::{convex_hull, Line, Pt, Rect};
use common::shapes::{Boolean, Circle, Polygon, Shape};

use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_rect_accessors() {
    let rect = Rect::new(Pt::new(1.0, 2.0), Pt::new(4.0, 8.0));
    assert_eq!(rect.width(), 3.0);
    assert_eq!(rect.height(), 6.0);
    assert_eq!(rect.area(), 18.0);
    assert_eq!(rect.center(), Pt::new(2.5, 5.0));
    assert!(rect.contains_point(Pt::new(1.0, 2.0)));
    assert!(rect.contains_point(Pt::new(4.0, 8.0)));
    assert!(!rect.contains_point(Pt::new(4.1, 5.0)));
}

#[test]
fn test_rect_from_points() {
    let pts = [Pt::new(3.0, -1.0), Pt::new(-2.0, 5.0), Pt::new(0.0, 0.0)];
    let rect = Rect::from_points(&pts).unwrap();
    assert_eq!(rect.min, Pt::new(-2.0, -1.0));
    assert_eq!(rect.max, Pt::new(3.0, 5.0));
    assert!(Rect::from_points(&[]).is_none());
}

#[test]
fn test_clip_line_through() {
    let rect = Rect::new(Pt::new(0.0, 0.0), Pt::new(1.0, 1.0));
    let line = Line::new(Pt::new(-1.0, 0.5), Pt::new(2.0, 0.5));
    let (t0, t1) = rect.clip_line(&line).unwrap();
    assert!((line.at(t0).x - 0.0).abs() < 1e-12);
    assert!((line.at(t1).x - 1.0).abs() < 1e-12);
}

#[test]
fn test_clip_line_miss() {
    let rect = Rect::new(Pt::new(0.0, 0.0), Pt::new(1.0, 1.0));
    let line = Line::new(Pt::new(-1.0, 2.0), Pt::new(2.0, 2.0));
    assert!(rect.clip_line(&line).is_none());
}

#[test]
fn test_clip_line_inside() {
    let rect = Rect::new(Pt::new(0.0, 0.0), Pt::new(1.0, 1.0));
    let line = Line::new(Pt::new(0.25, 0.25), Pt::new(0.75, 0.75));
    assert_eq!(rect.clip_line(&line), Some((0.0, 1.0)));
}

#[test]
fn test_rect_sample() {
    let rect = Rect::new(Pt::new(2.0, 3.0), Pt::new(6.0, 8.0));
    // Use a fixed seed for reproducibility.
    let mut rng: StdRng = SeedableRng::seed_from_u64(123);
    for _ in 0..10 {
        let p = rect.sample(&mut rng);
        assert!(rect.contains_point(p));
    }
}

#[test]
fn test_convex_hull_square_with_interior() {
    let pts = [
        Pt::new(0.0, 0.0),
        Pt::new(1.0, 0.0),
        Pt::new(1.0, 1.0),
        Pt::new(0.0, 1.0),
        Pt::new(0.5, 0.5),
        Pt::new(0.25, 0.75),
    ];
    let hull = convex_hull(&pts);
    assert_eq!(hull.len(), 4);
    for corner in [
        Pt::new(0.0, 0.0),
        Pt::new(1.0, 0.0),
        Pt::new(1.0, 1.0),
        Pt::new(0.0, 1.0),
    ] {
        assert!(hull.contains(&corner));
    }
}

#[test]
fn test_circle_contains() {
    let circle = Circle::new(Pt::new(0.0, 0.0), 1.0);
    assert!(circle.contains(Pt::new(0.0, 0.0)));
    assert!(circle.contains(Pt::new(0.999, 0.0)));
    assert!(!circle.contains(Pt::new(1.001, 0.0)));
}

#[test]
fn test_circle_line_intersections() {
    let circle = Circle::new(Pt::new(0.0, 0.0), 1.0);
    let line = Line::new(Pt::new(-2.0, 0.0), Pt::new(2.0, 0.0));
    let mut hits = Vec::new();
    circle.line_intersections(&line, &mut hits, 0);
    hits.sort_by(f64::total_cmp);
    assert_eq!(hits.len(), 2);
    assert!((line.at(hits[0]).x + 1.0).abs() < 1e-12);
    assert!((line.at(hits[1]).x - 1.0).abs() < 1e-12);

    // The limit caps how many crossings are reported.
    let mut capped = Vec::new();
    circle.line_intersections(&line, &mut capped, 1);
    assert_eq!(capped.len(), 1);
}

#[test]
fn test_circle_hull_bounds() {
    let circle = Circle::new(Pt::new(2.0, -1.0), 3.0);
    let rect = Rect::from_points(&circle.convex_hull()).unwrap();
    assert!((rect.min.x + 1.0).abs() < 1e-12);
    assert!((rect.max.x - 5.0).abs() < 1e-12);
    assert!((rect.min.y + 4.0).abs() < 1e-12);
    assert!((rect.max.y - 2.0).abs() < 1e-12);
}

#[test]
fn test_polygon_contains() {
    let tri = Polygon::triangle(Pt::new(0.0, 0.0), Pt::new(4.0, 0.0), Pt::new(0.0, 4.0));
    assert!(tri.contains(Pt::new(1.0, 1.0)));
    assert!(!tri.contains(Pt::new(3.0, 3.0)));
    assert_eq!(tri.area(), 8.0);
}

#[test]
fn test_polygon_line_intersections() {
    let square = Polygon::new(vec![
        Pt::new(0.0, 0.0),
        Pt::new(1.0, 0.0),
        Pt::new(1.0, 1.0),
        Pt::new(0.0, 1.0),
    ]);
    let line = Line::new(Pt::new(-1.0, 0.5), Pt::new(2.0, 0.5));
    let mut hits = Vec::new();
    square.line_intersections(&line, &mut hits, 0);
    hits.sort_by(f64::total_cmp);
    assert_eq!(hits.len(), 2);
    assert!((line.at(hits[0]).x - 0.0).abs() < 1e-12);
    assert!((line.at(hits[1]).x - 1.0).abs() < 1e-12);
}

#[test]
fn test_boolean_contains() {
    let a = Circle::new(Pt::new(0.0, 0.0), 1.0);
    let b = Circle::new(Pt::new(1.0, 0.0), 1.0);

    let union = Boolean::union(a, b);
    assert!(union.contains(Pt::new(-0.9, 0.0)));
    assert!(union.contains(Pt::new(1.9, 0.0)));

    let inter = Boolean::intersect(a, b);
    assert!(inter.contains(Pt::new(0.5, 0.0)));
    assert!(!inter.contains(Pt::new(-0.5, 0.0)));

    let diff = Boolean::subtract(a, b);
    assert!(diff.contains(Pt::new(-0.5, 0.0)));
    assert!(!diff.contains(Pt::new(0.5, 0.0)));
}

#[test]
fn test_boolean_line_intersections() {
    let a = Circle::new(Pt::new(0.0, 0.0), 1.0);
    let b = Circle::new(Pt::new(1.0, 0.0), 1.0);
    let union = Boolean::union(a, b);

    // A horizontal diameter crosses the union boundary at x = -1 and x = 2;
    // the interior crossings of each operand are swallowed by the other.
    let line = Line::new(Pt::new(-3.0, 0.0), Pt::new(3.0, 0.0));
    let mut hits = Vec::new();
    union.line_intersections(&line, &mut hits, 0);
    let mut xs: Vec<f64> = hits.iter().map(|&t| line.at(t).x).collect();
    xs.sort_by(f64::total_cmp);
    assert_eq!(xs.len(), 2);
    assert!((xs[0] + 1.0).abs() < 1e-9);
    assert!((xs[1] - 2.0).abs() < 1e-9);
}
