//! Link label placement
//!
//! Searches positions along a link's polyline for a spot where the label
//! text clears every box and box icon. Path positions are tried outer,
//! offsets inner, and the first clear candidate wins. When nothing is clear
//! the label goes to the sampled point farthest from any box center. That
//! fallback is not re-checked for overlap.

use super::config::LayoutConfig;
use super::types::{BoundingBox, BoxLayout, Point};

/// Fractions of the path length, in priority order
const PATH_RATIOS: [f64; 7] = [0.5, 0.35, 0.65, 0.25, 0.75, 0.15, 0.85];

/// Offsets tried on mostly horizontal segments: above, below, upper-right,
/// upper-left, right, left
const HORIZONTAL_OFFSETS: [(f64, f64); 6] = [
    (0.0, -12.0),
    (0.0, 18.0),
    (15.0, -8.0),
    (-15.0, -8.0),
    (10.0, 0.0),
    (-10.0, 0.0),
];

/// Offsets tried on mostly vertical segments: right, left, upper-right,
/// upper-left, above, below
const VERTICAL_OFFSETS: [(f64, f64); 6] = [
    (10.0, 0.0),
    (-10.0, 0.0),
    (15.0, -8.0),
    (-15.0, -8.0),
    (0.0, -12.0),
    (0.0, 18.0),
];

const FALLBACK_RATIOS: [f64; 3] = [0.3, 0.5, 0.7];
const FALLBACK_OFFSET: (f64, f64) = (15.0, -15.0);
const ZERO_LENGTH_OFFSET: (f64, f64) = (10.0, -15.0);

/// Extent of label text above and below its baseline
const TEXT_ASCENT: f64 = 16.0;
const TEXT_DESCENT: f64 = 4.0;

/// Clearance kept around every box
const BOX_CLEARANCE: f64 = 5.0;

/// Find a position for `text` along the polyline `points`
///
/// The returned point is the start of the text baseline.
pub fn place(points: &[Point], text: &str, boxes: &[BoxLayout], config: &LayoutConfig) -> Point {
    match points {
        [] => return Point::new(0.0, 0.0),
        [only] => return *only,
        _ => {}
    }

    let path = Polyline::new(points);
    if path.total == 0.0 {
        return points[0].translate(ZERO_LENGTH_OFFSET.0, ZERO_LENGTH_OFFSET.1);
    }

    let width = text.chars().count() as f64 * config.label_char_width;

    for ratio in PATH_RATIOS {
        let Some((point, segment)) = path.at(ratio) else {
            continue;
        };
        let dx = points[segment + 1].x - points[segment].x;
        let dy = points[segment + 1].y - points[segment].y;
        let offsets = if dx.abs() > dy.abs() {
            &HORIZONTAL_OFFSETS
        } else {
            &VERTICAL_OFFSETS
        };

        for &(ox, oy) in offsets {
            let candidate = point.translate(ox, oy);
            if !overlaps_any(candidate, width, boxes) {
                return candidate;
            }
        }
    }

    fallback(&path, boxes)
}

fn fallback(path: &Polyline<'_>, boxes: &[BoxLayout]) -> Point {
    let middle = path.points[path.points.len() / 2];
    let mut best = middle.translate(20.0, -20.0);
    let mut best_distance = -1.0;

    for ratio in FALLBACK_RATIOS {
        let Some((point, _)) = path.at(ratio) else {
            continue;
        };
        let distance = boxes
            .iter()
            .map(|b| point.distance(b.bounds.center()))
            .fold(f64::INFINITY, f64::min);
        if distance > best_distance {
            best_distance = distance;
            best = point.translate(FALLBACK_OFFSET.0, FALLBACK_OFFSET.1);
        }
    }
    best
}

fn overlaps_any(position: Point, width: f64, boxes: &[BoxLayout]) -> bool {
    let label = BoundingBox::from_edges(
        position.x,
        position.y - TEXT_ASCENT,
        position.x + width,
        position.y + TEXT_DESCENT,
    );
    boxes.iter().any(|b| {
        label.intersects(&b.bounds.padded(BOX_CLEARANCE)) || label.intersects(&icon_region(&b.bounds))
    })
}

/// Area above the top-right corner where the stereotype icon is drawn
fn icon_region(bounds: &BoundingBox) -> BoundingBox {
    BoundingBox::new(bounds.right() - 20.0, bounds.y - 20.0, 30.0, 25.0)
}

/// A polyline with precomputed segment lengths
struct Polyline<'a> {
    points: &'a [Point],
    lengths: Vec<f64>,
    total: f64,
}

impl<'a> Polyline<'a> {
    fn new(points: &'a [Point]) -> Self {
        let lengths: Vec<f64> = points.windows(2).map(|w| w[0].distance(w[1])).collect();
        let total = lengths.iter().sum();
        Self {
            points,
            lengths,
            total,
        }
    }

    /// Point at `ratio` of the total length, with the index of its segment
    fn at(&self, ratio: f64) -> Option<(Point, usize)> {
        let target = self.total * ratio;
        let mut walked = 0.0;
        for (i, &len) in self.lengths.iter().enumerate() {
            if walked + len >= target {
                let t = if len > 0.0 { (target - walked) / len } else { 0.0 };
                let a = self.points[i];
                let b = self.points[i + 1];
                return Some((Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y)), i));
            }
            walked += len;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NavBox, Stereotype};

    fn boxed(id: &str, bounds: BoundingBox) -> BoxLayout {
        let mut b = BoxLayout::sized(
            &NavBox::new(id, Stereotype::NavigationClass),
            bounds.width,
            bounds.height,
        );
        b.bounds = bounds;
        b
    }

    fn horizontal() -> Vec<Point> {
        vec![Point::new(0.0, 100.0), Point::new(200.0, 100.0)]
    }

    #[test]
    fn test_clear_horizontal_path_goes_above_midpoint() {
        let p = place(&horizontal(), "- next", &[], &LayoutConfig::default());
        assert_eq!(p, Point::new(100.0, 88.0));
    }

    #[test]
    fn test_clear_vertical_path_goes_right_of_midpoint() {
        let points = vec![Point::new(50.0, 0.0), Point::new(50.0, 300.0)];
        let p = place(&points, "- next", &[], &LayoutConfig::default());
        assert_eq!(p, Point::new(60.0, 150.0));
    }

    #[test]
    fn test_box_above_pushes_label_below() {
        let boxes = vec![boxed("A", BoundingBox::new(90.0, 60.0, 40.0, 20.0))];
        let p = place(&horizontal(), "ab", &boxes, &LayoutConfig::default());
        assert_eq!(p, Point::new(100.0, 118.0));
    }

    #[test]
    fn test_interpolates_along_multi_segment_path() {
        // total length 200, midpoint is the corner
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
        ];
        let p = place(&points, "x", &[], &LayoutConfig::default());
        assert_eq!(p, Point::new(100.0, -12.0));
    }

    #[test]
    fn test_everything_blocked_uses_farthest_point() {
        let boxes = vec![boxed("Huge", BoundingBox::new(-1000.0, -1000.0, 3000.0, 3000.0))];
        let points = vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)];
        let p = place(&points, "- label", &boxes, &LayoutConfig::default());
        assert_eq!(p, Point::new(45.0, -15.0));
    }

    #[test]
    fn test_zero_length_path() {
        let points = vec![Point::new(10.0, 20.0), Point::new(10.0, 20.0)];
        let p = place(&points, "x", &[], &LayoutConfig::default());
        assert_eq!(p, Point::new(20.0, 5.0));
    }

    #[test]
    fn test_degenerate_paths() {
        let config = LayoutConfig::default();
        assert_eq!(place(&[], "x", &[], &config), Point::new(0.0, 0.0));
        assert_eq!(
            place(&[Point::new(3.0, 4.0)], "x", &[], &config),
            Point::new(3.0, 4.0)
        );
    }

    #[test]
    fn test_icon_region_blocks_label() {
        // label above the midpoint would sit on the icon of a box to its left
        let boxes = vec![boxed("A", BoundingBox::new(0.0, 110.0, 105.0, 40.0))];
        let config = LayoutConfig::default();
        let p = place(&horizontal(), "x", &boxes, &config);
        let label = BoundingBox::from_edges(p.x, p.y - 16.0, p.x + 7.0, p.y + 4.0);
        assert!(!label.intersects(&icon_region(&boxes[0].bounds)));
        assert!(!label.intersects(&boxes[0].bounds.padded(5.0)));
    }

    #[test]
    fn test_placement_is_deterministic() {
        let boxes = vec![boxed("A", BoundingBox::new(90.0, 60.0, 40.0, 20.0))];
        let config = LayoutConfig::default();
        assert_eq!(
            place(&horizontal(), "- again", &boxes, &config),
            place(&horizontal(), "- again", &boxes, &config)
        );
    }
}
