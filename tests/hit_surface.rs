use floodviz::config::Margin;
use floodviz::hit::{Extent, HitSurface, polygon_area};
use floodviz::models::Sample;

fn sample(key: &str, t: i64, v: f64) -> Sample {
    Sample {
        series_key: key.into(),
        timestamp: t,
        value: v,
        time: String::new(),
        timezone: String::new(),
        display_name: key.into(),
    }
}

/// Deterministic scatter over a 890x440 plot.
fn scatter(n: usize) -> Vec<(f64, f64, Sample)> {
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut next = || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state % 10_000) as f64 / 10_000.0
    };
    (0..n)
        .map(|i| {
            let x = next() * 890.0;
            let y = next() * 440.0;
            (x, y, sample(if i % 2 == 0 { "A" } else { "B" }, i as i64, 100.0))
        })
        .collect()
}

/// Nearest point by exhaustive search; no match outside the extent.
fn brute_force(points: &[(f64, f64, Sample)], ext: &Extent, x: f64, y: f64) -> Option<usize> {
    if !ext.contains(x, y) {
        return None;
    }
    let mut best = (f64::INFINITY, usize::MAX);
    for (i, (px, py, _)) in points.iter().enumerate() {
        let (dx, dy) = (px - x, py - y);
        let d2 = dx * dx + dy * dy;
        if d2 < best.0 {
            best = (d2, i);
        }
    }
    Some(best.1)
}

fn extent() -> Extent {
    Extent::padded(890.0, 440.0, &Margin::default())
}

#[test]
fn every_point_finds_itself() {
    let pts = scatter(200);
    let surface = HitSurface::build(pts.clone(), extent());
    assert_eq!(surface.len(), 200);
    for (i, (x, y, s)) in pts.iter().enumerate() {
        let hit = surface.find(*x, *y).expect("inside extent");
        assert_eq!((hit.x, hit.y), (*x, *y), "point {i}");
        assert_eq!(&hit.sample, s);
    }
}

#[test]
fn queries_agree_with_brute_force() {
    let pts = scatter(150);
    let ext = extent();
    let surface = HitSurface::build(pts.clone(), ext);
    for gx in (-40..930).step_by(23) {
        for gy in (-25..465).step_by(19) {
            let (x, y) = (gx as f64 + 0.25, gy as f64 + 0.75);
            assert_eq!(
                surface.nearest_index(x, y),
                brute_force(&pts, &ext, x, y),
                "query ({x}, {y})"
            );
        }
    }
}

#[test]
fn cells_tile_the_extent() {
    let pts = scatter(80);
    let ext = extent();
    let surface = HitSurface::build(pts, ext);
    let total: f64 = surface.cells().map(polygon_area).sum();
    assert!((total - ext.area()).abs() < 1e-6 * ext.area(), "{total} vs {}", ext.area());
}

#[test]
fn queries_outside_the_padded_extent_miss() {
    let surface = HitSurface::build(scatter(10), extent());
    assert!(surface.find(-51.0, 10.0).is_none());
    assert!(surface.find(10.0, 471.0).is_none());
    assert!(surface.find(-49.0, -29.0).is_some());
}

#[test]
fn coincident_points_resolve_to_first() {
    let pts = vec![
        (10.0, 10.0, sample("A", 1, 50.0)),
        (10.0, 10.0, sample("B", 1, 50.0)),
        (300.0, 200.0, sample("C", 2, 50.0)),
    ];
    let surface = HitSurface::build(pts, extent());
    assert_eq!(surface.find(10.0, 10.0).unwrap().sample.series_key, "A");
    assert_eq!(surface.find(12.0, 11.0).unwrap().sample.series_key, "A");
    assert!(surface.cell(1).unwrap().is_empty());
}
