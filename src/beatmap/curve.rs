//! Slider path reconstruction and arc-length queries.
//!
//! A slider line stores its control points together with a one-letter curve kind. This module
//! flattens that description into a polyline with cumulative arc lengths, which supports the two
//! queries the rest of the crate needs: the pixel distance travelled at a path parameter
//! ([`Curve::length_at`]) and the position at a travelled distance ([`Curve::point_at`]).
//!
//! The explicit pixel length written in the file is authoritative over the geometry: when the two
//! disagree, the flattened path is truncated, or extended along its final segment, to match.

use itertools::Itertools;
use thiserror::Error;

use crate::beatmap::model::Position;

/// Interpolation kinds of a slider path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CurveKind {
    /// `B` - piecewise Bezier. Consecutive duplicate control points separate independent
    /// sub-curves, each of degree (points in the sub-curve - 1).
    Bezier,
    /// `C` - centripetal Catmull-Rom through every control point.
    Catmull,
    /// `L` - the polyline through the control points.
    Linear,
    /// `P` - the circle through exactly 3 control points, following the shorter arc from the
    /// first to the last.
    PerfectCircle,
}

impl CurveKind {
    /// Resolves the one-letter tag used in slider lines.
    pub const fn from_tag(tag: char) -> Option<Self> {
        Some(match tag {
            'B' => Self::Bezier,
            'C' => Self::Catmull,
            'L' => Self::Linear,
            'P' => Self::PerfectCircle,
            _ => return None,
        })
    }

    /// Returns the tag as written in slider lines.
    pub const fn tag(self) -> char {
        match self {
            Self::Bezier => 'B',
            Self::Catmull => 'C',
            Self::Linear => 'L',
            Self::PerfectCircle => 'P',
        }
    }
}

/// A point of the flattened path, in playfield pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Vec2 {
    /// Euclidean distance to `other`.
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Linear interpolation towards `other`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

impl From<Position> for Vec2 {
    fn from(pos: Position) -> Self {
        Self {
            x: f64::from(pos.x),
            y: f64::from(pos.y),
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl std::ops::Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

/// Why the path builder departed from the declared curve kind.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeometryFallback {
    /// The 3 perfect-circle control points lie on a line; no circle passes through them. The
    /// control points were treated as a Bezier curve instead.
    #[error("perfect-circle control points are collinear, treated as bezier")]
    CollinearPerfectCircle,
    /// A perfect-circle slider with a control point count other than 3. The control points were
    /// treated as a Bezier curve instead.
    #[error("perfect-circle slider needs exactly 3 control points, treated as bezier")]
    PerfectCirclePointCount,
    /// The slider has no extent: fewer than 2 distinct control points, or a non-positive
    /// explicit length. The path degrades to a stationary point.
    #[error("slider path has no extent")]
    ZeroLength,
}

/// Linear steps each curve segment is flattened into. Chord error at playfield scale stays well
/// below one pixel.
const SEGMENT_DETAIL: usize = 64;

/// A slider path flattened to a polyline with cumulative arc lengths.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Curve {
    /// The kind actually used, after any degenerate-geometry fallback.
    kind: CurveKind,
    /// The flattened polyline. Never empty; consecutive points are distinct.
    points: Vec<Vec2>,
    /// `cumulative[i]` is the arc length from the start to `points[i]`.
    cumulative: Vec<f64>,
}

impl Curve {
    /// Builds the path for `control_points` interpreted as `kind`.
    ///
    /// `expected_length` is the explicit pixel length from the slider line; when given, it is
    /// authoritative and the geometry is truncated or extended to match it. Degenerate inputs do
    /// not fail: the path degrades as documented on [`GeometryFallback`] and the departure is
    /// reported in the second return value.
    pub fn new(
        kind: CurveKind,
        control_points: &[Position],
        expected_length: Option<f64>,
    ) -> (Self, Option<GeometryFallback>) {
        let control: Vec<Vec2> = control_points.iter().map(|&p| p.into()).collect();

        if control.len() < 2 {
            let point = control.first().copied().unwrap_or_default();
            return (
                Self {
                    kind,
                    points: vec![point],
                    cumulative: vec![0.0],
                },
                Some(GeometryFallback::ZeroLength),
            );
        }

        let mut fallback = None;
        let mut effective = kind;
        if kind == CurveKind::PerfectCircle {
            if control.len() != 3 {
                effective = CurveKind::Bezier;
                fallback = Some(GeometryFallback::PerfectCirclePointCount);
            } else if circle_through(control[0], control[1], control[2]).is_none() {
                effective = CurveKind::Bezier;
                fallback = Some(GeometryFallback::CollinearPerfectCircle);
            }
        }

        let mut points = Vec::new();
        match effective {
            CurveKind::Linear => {
                for &point in &control {
                    push_point(&mut points, point);
                }
            }
            CurveKind::PerfectCircle => flatten_arc(&mut points, &control),
            CurveKind::Catmull => flatten_catmull(&mut points, &control),
            CurveKind::Bezier => flatten_bezier(&mut points, &control),
        }

        if points.len() < 2 {
            // All control points coincided; nothing to travel along.
            fallback = fallback.or(Some(GeometryFallback::ZeroLength));
            if points.is_empty() {
                points.push(control[0]);
            }
        }

        let mut cumulative = cumulative_lengths(&points);

        match expected_length {
            Some(expected) if expected <= 0.0 => {
                fallback = fallback.or(Some(GeometryFallback::ZeroLength));
                points.truncate(1);
                cumulative.truncate(1);
            }
            Some(expected) => reconcile(&mut points, &mut cumulative, expected),
            None => {}
        }

        (
            Self {
                kind: effective,
                points,
                cumulative,
            },
            fallback,
        )
    }

    /// The kind actually used, after any degenerate-geometry fallback.
    pub const fn kind(&self) -> CurveKind {
        self.kind
    }

    /// The flattened polyline.
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Total travel distance of one pass over the path, in pixels. Equals the explicit length
    /// when one was given to [`Curve::new`].
    pub fn length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// The position after travelling `distance` pixels from the start. The distance is clamped
    /// to `[0, length]`.
    pub fn point_at(&self, distance: f64) -> Vec2 {
        let Some((&first, &last)) = self.points.first().zip(self.points.last()) else {
            return Vec2::default();
        };
        let distance = distance.clamp(0.0, self.length());
        let index = self.cumulative.partition_point(|&len| len < distance);
        if index == 0 {
            return first;
        }
        if index >= self.points.len() {
            return last;
        }
        let segment = self.cumulative[index] - self.cumulative[index - 1];
        if segment <= 0.0 {
            return self.points[index];
        }
        let t = (distance - self.cumulative[index - 1]) / segment;
        self.points[index - 1].lerp(self.points[index], t)
    }

    /// The travelled pixel distance at `t`, the normalized position along the sampled path
    /// parameterization. `t` is clamped to `[0, 1]`.
    pub fn length_at(&self, t: f64) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        let scaled = t.clamp(0.0, 1.0) * (self.points.len() - 1) as f64;
        let index = scaled.floor() as usize;
        if index + 1 >= self.points.len() {
            return self.length();
        }
        let frac = scaled - index as f64;
        self.cumulative[index] + (self.cumulative[index + 1] - self.cumulative[index]) * frac
    }

    /// The final position of one pass over the path.
    pub fn end_point(&self) -> Vec2 {
        self.points.last().copied().unwrap_or_default()
    }
}

/// Appends `point` unless it coincides with the current tail, keeping segment lengths nonzero.
fn push_point(out: &mut Vec<Vec2>, point: Vec2) {
    if out.last() != Some(&point) {
        out.push(point);
    }
}

/// Samples `eval` over `[0, 1]` at the fixed segment detail.
fn flatten(out: &mut Vec<Vec2>, mut eval: impl FnMut(f64) -> Vec2) {
    for step in 0..=SEGMENT_DETAIL {
        let t = step as f64 / SEGMENT_DETAIL as f64;
        push_point(out, eval(t));
    }
}

fn cumulative_lengths(points: &[Vec2]) -> Vec<f64> {
    let mut cumulative = Vec::with_capacity(points.len());
    cumulative.push(0.0);
    let mut total = 0.0;
    for (&a, &b) in points.iter().tuple_windows() {
        total += a.distance(b);
        cumulative.push(total);
    }
    cumulative
}

/// Cuts or extends the flattened path so its total length equals `expected`.
fn reconcile(points: &mut Vec<Vec2>, cumulative: &mut Vec<f64>, expected: f64) {
    let total = cumulative.last().copied().unwrap_or(0.0);
    if (total - expected).abs() < 1e-9 {
        return;
    }
    if total > expected {
        let cut = cumulative.partition_point(|&len| len < expected);
        let segment = cumulative[cut] - cumulative[cut - 1];
        let t = if segment > 0.0 {
            (expected - cumulative[cut - 1]) / segment
        } else {
            0.0
        };
        let end = points[cut - 1].lerp(points[cut], t);
        points.truncate(cut);
        cumulative.truncate(cut);
        push_point(points, end);
        if points.len() > cumulative.len() {
            cumulative.push(expected);
        }
    } else if points.len() >= 2 {
        // Consecutive points are distinct, so the final segment has a direction to extend along.
        let last = points[points.len() - 1];
        let before = points[points.len() - 2];
        let segment = last.distance(before);
        let direction = (last - before) * (1.0 / segment);
        points.push(last + direction * (expected - total));
        cumulative.push(expected);
    }
}

/// The center and radius of the circle through 3 points, or [`None`] when they are collinear.
fn circle_through(a: Vec2, b: Vec2, c: Vec2) -> Option<(Vec2, f64)> {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < 1e-9 {
        return None;
    }
    let a2 = a.x * a.x + a.y * a.y;
    let b2 = b.x * b.x + b.y * b.y;
    let c2 = c.x * c.x + c.y * c.y;
    let center = Vec2 {
        x: (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d,
        y: (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d,
    };
    Some((center, center.distance(a)))
}

fn flatten_arc(out: &mut Vec<Vec2>, control: &[Vec2]) {
    let (start, pass_through, end) = (control[0], control[1], control[2]);
    let Some((center, radius)) = circle_through(start, pass_through, end) else {
        return;
    };
    let start_angle = (start.y - center.y).atan2(start.x - center.x);
    let end_angle = (end.y - center.y).atan2(end.x - center.x);

    // The shorter of the two arcs between start and end. A half circle is ambiguous; there the
    // orientation of the control triangle decides, so the arc still passes through the middle
    // control point.
    let mut sweep = end_angle - start_angle;
    if sweep > std::f64::consts::PI {
        sweep -= 2.0 * std::f64::consts::PI;
    } else if sweep < -std::f64::consts::PI {
        sweep += 2.0 * std::f64::consts::PI;
    }
    if (sweep.abs() - std::f64::consts::PI).abs() < 1e-9 {
        let orientation = (pass_through.x - start.x) * (end.y - start.y)
            - (pass_through.y - start.y) * (end.x - start.x);
        sweep = sweep.abs().copysign(orientation);
    }

    flatten(out, |t| {
        let angle = start_angle + sweep * t;
        Vec2 {
            x: center.x + radius * angle.cos(),
            y: center.y + radius * angle.sin(),
        }
    });
}

fn flatten_catmull(out: &mut Vec<Vec2>, control: &[Vec2]) {
    for i in 0..control.len() - 1 {
        let p0 = control[i.saturating_sub(1)];
        let p1 = control[i];
        let p2 = control[i + 1];
        let p3 = control[(i + 2).min(control.len() - 1)];
        flatten(out, |t| catmull_point(p0, p1, p2, p3, t));
    }
}

/// Centripetal Catmull-Rom evaluation over the `p1..p2` span, by the Barry-Goldman pyramid.
fn catmull_point(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f64) -> Vec2 {
    // Centripetal knot spacing: the square root of the chord length. Coincident control points
    // would make a knot interval vanish, so clamp it.
    fn knot_interval(a: Vec2, b: Vec2) -> f64 {
        a.distance(b).sqrt().max(1e-4)
    }
    fn interp(a: Vec2, b: Vec2, ta: f64, tb: f64, t: f64) -> Vec2 {
        a.lerp(b, (t - ta) / (tb - ta))
    }

    let t0 = 0.0;
    let t1 = t0 + knot_interval(p0, p1);
    let t2 = t1 + knot_interval(p1, p2);
    let t3 = t2 + knot_interval(p2, p3);
    let t = t1 + (t2 - t1) * t;

    let a1 = interp(p0, p1, t0, t1, t);
    let a2 = interp(p1, p2, t1, t2, t);
    let a3 = interp(p2, p3, t2, t3, t);
    let b1 = interp(a1, a2, t0, t2, t);
    let b2 = interp(a2, a3, t1, t3, t);
    interp(b1, b2, t1, t2, t)
}

fn flatten_bezier(out: &mut Vec<Vec2>, control: &[Vec2]) {
    let mut scratch = Vec::new();
    let mut start = 0;
    for end in 1..=control.len() {
        // A consecutive duplicate ends the current sub-curve and starts the next one there.
        if end < control.len() && control[end] != control[end - 1] {
            continue;
        }
        let segment = &control[start..end];
        start = end;
        match segment {
            [] => {}
            [point] => push_point(out, *point),
            _ => flatten(out, |t| de_casteljau(&mut scratch, segment, t)),
        }
    }
}

/// De Casteljau evaluation of a Bezier curve of any degree.
fn de_casteljau(scratch: &mut Vec<Vec2>, control: &[Vec2], t: f64) -> Vec2 {
    scratch.clear();
    scratch.extend_from_slice(control);
    for width in (1..scratch.len()).rev() {
        for i in 0..width {
            scratch[i] = scratch[i].lerp(scratch[i + 1], t);
        }
    }
    scratch[0]
}

#[cfg(test)]
mod tests {
    use super::{Curve, CurveKind, GeometryFallback, Vec2};
    use crate::beatmap::model::Position;

    fn pos(x: i32, y: i32) -> Position {
        Position { x, y }
    }

    fn assert_close(actual: Vec2, expected: (f64, f64), tolerance: f64) {
        let expected = Vec2 {
            x: expected.0,
            y: expected.1,
        };
        assert!(
            actual.distance(expected) <= tolerance,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn bezier_duplicate_point_starts_new_segment() {
        let control = [pos(0, 0), pos(100, 0), pos(100, 0), pos(100, 100)];
        let (curve, fallback) = Curve::new(CurveKind::Bezier, &control, None);

        assert_eq!(fallback, None);
        // Two degree-1 segments: a horizontal then a vertical line.
        assert!((curve.length() - 200.0).abs() < 1e-9);
        assert_close(curve.point_at(50.0), (50.0, 0.0), 1e-9);
        assert_close(curve.point_at(100.0), (100.0, 0.0), 1e-9);
        assert_close(curve.point_at(150.0), (100.0, 50.0), 1e-9);
    }

    #[test]
    fn perfect_circle_half_arc_passes_through_middle() {
        let control = [pos(0, 0), pos(50, 50), pos(100, 0)];
        let (curve, fallback) = Curve::new(CurveKind::PerfectCircle, &control, None);

        assert_eq!(fallback, None);
        assert_eq!(curve.kind(), CurveKind::PerfectCircle);
        let half_circumference = std::f64::consts::PI * 50.0;
        assert!((curve.length() - half_circumference).abs() < 0.1);
        assert_close(curve.point_at(half_circumference / 2.0), (50.0, 50.0), 0.5);
    }

    #[test]
    fn collinear_perfect_circle_degrades_to_bezier() {
        let control = [pos(0, 0), pos(50, 0), pos(100, 0)];
        let (curve, fallback) = Curve::new(CurveKind::PerfectCircle, &control, None);

        assert_eq!(fallback, Some(GeometryFallback::CollinearPerfectCircle));
        assert_eq!(curve.kind(), CurveKind::Bezier);
        assert!((curve.length() - 100.0).abs() < 1e-9);
        assert_close(curve.point_at(75.0), (75.0, 0.0), 1e-9);
    }

    #[test]
    fn explicit_length_truncates() {
        let control = [pos(0, 0), pos(100, 0)];
        let (curve, fallback) = Curve::new(CurveKind::Linear, &control, Some(60.0));

        assert_eq!(fallback, None);
        assert!((curve.length() - 60.0).abs() < 1e-9);
        assert_close(curve.end_point(), (60.0, 0.0), 1e-9);
    }

    #[test]
    fn explicit_length_extends_final_segment() {
        let control = [pos(0, 0), pos(50, 0), pos(50, 50)];
        let (curve, fallback) = Curve::new(CurveKind::Linear, &control, Some(130.0));

        assert_eq!(fallback, None);
        assert!((curve.length() - 130.0).abs() < 1e-9);
        assert_close(curve.end_point(), (50.0, 80.0), 1e-9);
    }

    #[test]
    fn single_control_point_is_zero_length() {
        let (curve, fallback) = Curve::new(CurveKind::Linear, &[pos(256, 192)], Some(30.0));

        assert_eq!(fallback, Some(GeometryFallback::ZeroLength));
        assert_eq!(curve.length(), 0.0);
        assert_close(curve.point_at(10.0), (256.0, 192.0), 1e-9);
    }

    #[test]
    fn catmull_interpolates_control_points() {
        let control = [pos(0, 0), pos(100, 0), pos(100, 100)];
        let (curve, fallback) = Curve::new(CurveKind::Catmull, &control, None);

        assert_eq!(fallback, None);
        assert!(
            curve
                .points()
                .iter()
                .any(|p| p.distance(Vec2 { x: 100.0, y: 0.0 }) < 1e-9)
        );
        assert!(curve.length() >= 200.0 - 1e-9);
    }

    #[test]
    fn length_at_is_monotonic() {
        let control = [pos(0, 0), pos(100, 0), pos(100, 0), pos(100, 100)];
        let (curve, _) = Curve::new(CurveKind::Bezier, &control, None);

        assert_eq!(curve.length_at(0.0), 0.0);
        assert!((curve.length_at(1.0) - curve.length()).abs() < 1e-9);
        let mid = curve.length_at(0.5);
        assert!(0.0 < mid && mid < curve.length());
    }
}
