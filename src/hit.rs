//! Voronoi hit-testing over projected sample points.
//!
//! A thin hydrograph line is almost impossible to hover precisely. Instead the
//! plot plane is partitioned into one Voronoi cell per rendered sample, and a
//! pointer anywhere inside a cell selects that sample.
//!
//! Cells are built by clipping the padded extent against the perpendicular
//! bisector of each neighbour, visiting neighbours in order of horizontal
//! distance and stopping once no farther seed can cut the cell any more.
//! Queries use the same x-sorted order: a binary search followed by an
//! outward walk pruned on `|dx|`.

use ahash::AHashSet;

use crate::config::Margin;
use crate::models::Sample;

/// Axis-aligned rectangle in plot-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Extent {
    /// Plot area grown by the chart margins, so points on the axes stay hoverable.
    pub fn padded(inner_width: f64, inner_height: f64, margin: &Margin) -> Self {
        Self {
            x0: -(margin.left as f64),
            y0: -(margin.top as f64),
            x1: inner_width + margin.right as f64,
            y1: inner_height + margin.bottom as f64,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    pub fn area(&self) -> f64 {
        (self.x1 - self.x0).max(0.0) * (self.y1 - self.y0).max(0.0)
    }

    fn corners(&self) -> Vec<(f64, f64)> {
        vec![
            (self.x0, self.y0),
            (self.x1, self.y0),
            (self.x1, self.y1),
            (self.x0, self.y1),
        ]
    }
}

/// A rendered sample together with its screen position.
#[derive(Debug, Clone, PartialEq)]
pub struct HitPoint {
    pub x: f64,
    pub y: f64,
    pub sample: Sample,
}

/// Nearest-sample lookup for the current set of rendered points.
#[derive(Debug, Clone)]
pub struct HitSurface {
    points: Vec<HitPoint>,
    /// Indices into `points`, ordered by `(x, index)`.
    by_x: Vec<usize>,
    /// One clipped polygon per point; empty for later coincident duplicates.
    cells: Vec<Vec<(f64, f64)>>,
    extent: Extent,
}

impl HitSurface {
    pub fn empty(extent: Extent) -> Self {
        Self {
            points: Vec::new(),
            by_x: Vec::new(),
            cells: Vec::new(),
            extent,
        }
    }

    /// Build the surface from `(x, y, sample)` triples. Points with non-finite
    /// coordinates (e.g. non-positive values on the log axis) or outside the
    /// extent (values below the log floor) are left out, so every remaining
    /// cell contains its own seed.
    pub fn build<I>(points: I, extent: Extent) -> Self
    where
        I: IntoIterator<Item = (f64, f64, Sample)>,
    {
        let mut dropped = 0usize;
        let points: Vec<HitPoint> = points
            .into_iter()
            .filter_map(|(x, y, sample)| {
                if x.is_finite() && y.is_finite() && extent.contains(x, y) {
                    Some(HitPoint { x, y, sample })
                } else {
                    dropped += 1;
                    None
                }
            })
            .collect();
        if dropped > 0 {
            log::warn!("hit surface: skipped {dropped} point(s) outside the hoverable extent");
        }

        let mut by_x: Vec<usize> = (0..points.len()).collect();
        by_x.sort_by(|&a, &b| points[a].x.total_cmp(&points[b].x).then(a.cmp(&b)));

        let cells = match points.len() {
            0 => Vec::new(),
            1 => vec![extent.corners()],
            _ => voronoi_cells(&points, &by_x, &extent),
        };

        Self {
            points,
            by_x,
            cells,
            extent,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn extent(&self) -> &Extent {
        &self.extent
    }

    pub fn points(&self) -> &[HitPoint] {
        &self.points
    }

    /// Clipped Voronoi polygon of point `index`, in input order.
    pub fn cell(&self, index: usize) -> Option<&[(f64, f64)]> {
        self.cells.get(index).map(Vec::as_slice)
    }

    pub fn cells(&self) -> impl Iterator<Item = &[(f64, f64)]> {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Distinct series keys present on the surface.
    pub fn keys(&self) -> AHashSet<&str> {
        self.points
            .iter()
            .map(|p| p.sample.series_key.as_str())
            .collect()
    }

    /// Index of the sample whose cell contains `(x, y)`.
    ///
    /// `None` when the surface is empty or the point lies outside the extent.
    /// Equidistant candidates resolve to the lowest input index.
    pub fn nearest_index(&self, x: f64, y: f64) -> Option<usize> {
        if self.points.is_empty() || !self.extent.contains(x, y) {
            return None;
        }
        if self.points.len() == 1 {
            return Some(0);
        }

        let start = self.by_x.partition_point(|&i| self.points[i].x < x);
        let mut best: Option<(f64, usize)> = None;
        let consider = |i: usize, best: &mut Option<(f64, usize)>| -> bool {
            let p = &self.points[i];
            let dx = p.x - x;
            if let Some((d2, _)) = *best
                && dx * dx > d2
            {
                return false;
            }
            let d2 = dx * dx + (p.y - y) * (p.y - y);
            match *best {
                Some((bd, bi)) if d2 > bd || (d2 == bd && i > bi) => {}
                _ => *best = Some((d2, i)),
            }
            true
        };

        for &i in &self.by_x[start..] {
            if !consider(i, &mut best) {
                break;
            }
        }
        for &i in self.by_x[..start].iter().rev() {
            if !consider(i, &mut best) {
                break;
            }
        }
        best.map(|(_, i)| i)
    }

    /// The hit point whose cell contains `(x, y)`.
    pub fn find(&self, x: f64, y: f64) -> Option<&HitPoint> {
        self.nearest_index(x, y).map(|i| &self.points[i])
    }
}

fn voronoi_cells(points: &[HitPoint], by_x: &[usize], extent: &Extent) -> Vec<Vec<(f64, f64)>> {
    let n = points.len();
    let mut rank = vec![0usize; n];
    for (r, &i) in by_x.iter().enumerate() {
        rank[i] = r;
    }

    (0..n)
        .map(|i| {
            let seed = (points[i].x, points[i].y);
            let mut cell = extent.corners();
            let mut reach2 = max_dist2(seed, &cell);

            let mut left = rank[i];
            let mut right = rank[i] + 1;
            let mut left_open = left > 0;
            let mut right_open = right < n;

            while left_open || right_open {
                let left_dx = if left_open {
                    seed.0 - points[by_x[left - 1]].x
                } else {
                    f64::INFINITY
                };
                let right_dx = if right_open {
                    points[by_x[right]].x - seed.0
                } else {
                    f64::INFINITY
                };
                let take_left = left_dx <= right_dx;
                let dx = if take_left { left_dx } else { right_dx };

                // Seeds farther than twice the cell radius cannot clip it.
                if dx * dx > 4.0 * reach2 {
                    break;
                }

                let j = if take_left {
                    left -= 1;
                    left_open = left > 0;
                    by_x[left]
                } else {
                    let j = by_x[right];
                    right += 1;
                    right_open = right < n;
                    j
                };

                let other = (points[j].x, points[j].y);
                if other == seed {
                    if j < i {
                        // Coincident with an earlier point: that point owns the cell.
                        cell.clear();
                        break;
                    }
                    continue;
                }

                cell = clip_to_bisector(&cell, seed, other);
                if cell.is_empty() {
                    break;
                }
                reach2 = max_dist2(seed, &cell);
            }
            cell
        })
        .collect()
}

fn max_dist2(seed: (f64, f64), poly: &[(f64, f64)]) -> f64 {
    poly.iter()
        .map(|&(x, y)| (x - seed.0) * (x - seed.0) + (y - seed.1) * (y - seed.1))
        .fold(0.0, f64::max)
}

/// Keep the part of `poly` that is at least as close to `seed` as to `other`.
fn clip_to_bisector(poly: &[(f64, f64)], seed: (f64, f64), other: (f64, f64)) -> Vec<(f64, f64)> {
    let a = other.0 - seed.0;
    let b = other.1 - seed.1;
    let c = a * (seed.0 + other.0) / 2.0 + b * (seed.1 + other.1) / 2.0;
    let side = |p: (f64, f64)| a * p.0 + b * p.1 - c;

    let mut out = Vec::with_capacity(poly.len() + 1);
    for k in 0..poly.len() {
        let p = poly[k];
        let q = poly[(k + 1) % poly.len()];
        let (fp, fq) = (side(p), side(q));
        if fp <= 0.0 {
            out.push(p);
        }
        if (fp <= 0.0) != (fq <= 0.0) {
            let t = fp / (fp - fq);
            out.push((p.0 + t * (q.0 - p.0), p.1 + t * (q.1 - p.1)));
        }
    }
    out
}

/// Shoelace area of a simple polygon.
pub fn polygon_area(poly: &[(f64, f64)]) -> f64 {
    if poly.len() < 3 {
        return 0.0;
    }
    let twice: f64 = (0..poly.len())
        .map(|k| {
            let (x0, y0) = poly[k];
            let (x1, y1) = poly[(k + 1) % poly.len()];
            x0 * y1 - x1 * y0
        })
        .sum();
    twice.abs() / 2.0
}
