//! Polygon-fill rasterization into a [`RegionMask`].

use photo_measure_core::{Polygon, RegionMask};

/// Fill `polygon` on a `width x height` grid.
///
/// Vertices are truncated to integer pixel coordinates. A pixel is selected
/// when its integer center lies inside the polygon or on its outline, so the
/// boundary itself is part of the region. Parts of the polygon outside the
/// grid are clipped; vertices may lie arbitrarily far off the image.
pub fn rasterize_polygon(polygon: &Polygon, width: usize, height: usize) -> RegionMask {
    let pts: Vec<(f64, f64)> = polygon
        .vertices()
        .iter()
        .map(|p| (p.x.trunc(), p.y.trunc()))
        .collect();
    let mut data = vec![false; width * height];
    let n = pts.len();

    let mut xs: Vec<f64> = Vec::with_capacity(n);
    for row in 0..height {
        let y = row as f64;
        xs.clear();
        for i in 0..n {
            let (ax, ay) = pts[i];
            let (bx, by) = pts[(i + 1) % n];
            if ay == by {
                continue;
            }
            let (lo, hi) = if ay < by { (ay, by) } else { (by, ay) };
            // Half-open in y so shared vertices are counted once.
            if y < lo || y >= hi {
                continue;
            }
            let t = (y - ay) / (by - ay);
            xs.push(lerp(ax, bx, t));
        }
        xs.sort_by(|a, b| a.total_cmp(b));
        for span in xs.chunks_exact(2) {
            fill_span(&mut data, width, row, span[0].ceil(), span[1].floor());
        }
    }

    let band = (width as f64, height as f64);
    for i in 0..n {
        if let Some((a, b)) = clip_to_band(pts[i], pts[(i + 1) % n], band) {
            draw_line(&mut data, width, height, a, b);
        }
    }

    RegionMask::from_fn(width, height, |row, col| data[row * width + col])
}

fn fill_span(data: &mut [bool], width: usize, row: usize, x0: f64, x1: f64) {
    if width == 0 || x1 < 0.0 || x0 > (width - 1) as f64 || x0 > x1 {
        return;
    }
    let c0 = x0.max(0.0) as usize;
    let c1 = (x1 as usize).min(width - 1);
    data[row * width + c0..=row * width + c1].fill(true);
}

const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const ABOVE: u8 = 4;
const BELOW: u8 = 8;

fn outcode(p: (f64, f64), max: (f64, f64)) -> u8 {
    let mut code = 0;
    if p.0 < -1.0 {
        code |= LEFT;
    } else if p.0 > max.0 {
        code |= RIGHT;
    }
    if p.1 < -1.0 {
        code |= ABOVE;
    } else if p.1 > max.1 {
        code |= BELOW;
    }
    code
}

/// `a + (b - a) * t`, falling back to the weighted form when `b - a`
/// overflows for vertices far outside the grid.
#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    let d = b - a;
    if d.is_finite() {
        a + d * t
    } else {
        a * (1.0 - t) + b * t
    }
}

/// Cohen-Sutherland clip of `a -> b` to `[-1, max.0] x [-1, max.1]`.
///
/// Endpoints already inside the band come back unchanged; clipped ones are
/// rounded to the nearest pixel. The result lies within one pixel of the
/// grid, so the outline walk stays proportional to the image size.
fn clip_to_band(
    mut a: (f64, f64),
    mut b: (f64, f64),
    max: (f64, f64),
) -> Option<((i64, i64), (i64, i64))> {
    // Each pass pins one coordinate of one endpoint to a band edge.
    for _ in 0..8 {
        let (ca, cb) = (outcode(a, max), outcode(b, max));
        if ca | cb == 0 {
            return Some((snap(a, max), snap(b, max)));
        }
        if ca & cb != 0 {
            return None;
        }
        let (code, p, q) = if ca != 0 { (ca, a, b) } else { (cb, b, a) };
        let moved = if code & LEFT != 0 {
            let t = (-1.0 - p.0) / (q.0 - p.0);
            (-1.0, lerp(p.1, q.1, t))
        } else if code & RIGHT != 0 {
            let t = (max.0 - p.0) / (q.0 - p.0);
            (max.0, lerp(p.1, q.1, t))
        } else if code & ABOVE != 0 {
            let t = (-1.0 - p.1) / (q.1 - p.1);
            (lerp(p.0, q.0, t), -1.0)
        } else {
            let t = (max.1 - p.1) / (q.1 - p.1);
            (lerp(p.0, q.0, t), max.1)
        };
        if ca != 0 {
            a = moved;
        } else {
            b = moved;
        }
    }
    None
}

fn snap(p: (f64, f64), max: (f64, f64)) -> (i64, i64) {
    (
        p.0.round().clamp(-1.0, max.0) as i64,
        p.1.round().clamp(-1.0, max.1) as i64,
    )
}

/// Bresenham walk; both endpoints lie within one pixel of the grid.
fn draw_line(data: &mut [bool], width: usize, height: usize, a: (i64, i64), b: (i64, i64)) {
    let (mut x, mut y) = a;
    let dx = (b.0 - a.0).abs();
    let dy = -(b.1 - a.1).abs();
    let sx = if a.0 < b.0 { 1 } else { -1 };
    let sy = if a.1 < b.1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        if x >= 0 && y >= 0 && (x as usize) < width && (y as usize) < height {
            data[y as usize * width + x as usize] = true;
        }
        if x == b.0 && y == b.1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photo_measure_core::Point2D;

    fn poly(raw: &[(f64, f64)]) -> Polygon {
        Polygon::new(raw.iter().map(|&(x, y)| Point2D::new(x, y)).collect()).unwrap()
    }

    #[test]
    fn rectangle_includes_its_boundary() {
        let mask = rasterize_polygon(&poly(&[(1.0, 1.0), (4.0, 1.0), (4.0, 3.0), (1.0, 3.0)]), 6, 5);
        assert_eq!(mask.count(), 12);
        assert!(mask.get(1, 1) && mask.get(3, 4));
        assert!(!mask.get(0, 0) && !mask.get(4, 5) && !mask.get(2, 0));
    }

    #[test]
    fn triangle_matches_lattice_points() {
        let mask = rasterize_polygon(&poly(&[(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)]), 5, 5);
        assert_eq!(mask.count(), 15);
        for row in 0..5 {
            for col in 0..5 {
                assert_eq!(mask.get(row, col), row + col <= 4, "({row},{col})");
            }
        }
    }

    #[test]
    fn fractional_vertices_truncate() {
        let a = rasterize_polygon(&poly(&[(1.9, 1.2), (4.7, 1.0), (4.2, 3.9), (1.1, 3.5)]), 6, 5);
        let b = rasterize_polygon(&poly(&[(1.0, 1.0), (4.0, 1.0), (4.0, 3.0), (1.0, 3.0)]), 6, 5);
        assert_eq!(a, b);
    }

    #[test]
    fn clips_to_grid() {
        let mask = rasterize_polygon(
            &poly(&[(-10.0, -10.0), (20.0, -10.0), (20.0, 20.0), (-10.0, 20.0)]),
            4,
            3,
        );
        assert_eq!(mask.count(), 12);
    }

    #[test]
    fn far_off_vertices_are_clipped_not_walked() {
        // Rows 0-1 are filled by the scanline, row 2 by the clipped outline.
        for far in [2e9, 1e19, f64::MAX] {
            let mask = rasterize_polygon(&poly(&[(0.0, 0.0), (far, 0.0), (0.0, 2.0)]), 4, 3);
            assert_eq!(mask.count(), 12, "far = {far}");
        }
        let mask = rasterize_polygon(
            &poly(&[(-1e18, -1e18), (1e18, -1e18), (1e18, 1e18), (-1e18, 1e18)]),
            5,
            4,
        );
        assert_eq!(mask.count(), 20);
    }

    #[test]
    fn polygon_entirely_off_grid_selects_nothing() {
        let mask = rasterize_polygon(&poly(&[(50.0, 50.0), (1e12, 50.0), (50.0, 1e12)]), 6, 5);
        assert_eq!(mask.count(), 0);
    }
}
