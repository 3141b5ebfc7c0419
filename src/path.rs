// Copyright 2025 the Flexcut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paths made of line and Bézier segments.

use alloc::vec::Vec;
use core::ops::Range;

use arrayvec::ArrayVec;

use crate::{CubicBez, InvalidPathError, Line, ParamCurve, Point, QuadBez};

/// Tolerance for joining consecutive segments, relative to the path extent.
pub const CONTINUITY_TOLERANCE: f64 = 1e-9;

/// A segment of a path.
///
/// Lines carry their two end points; curves carry their start point, one
/// or two control points and their end point.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathSeg {
    /// A line segment.
    Line(Line),
    /// A quadratic Bézier segment.
    Quad(QuadBez),
    /// A cubic Bézier segment.
    Cubic(CubicBez),
}

impl PathSeg {
    /// All points defining the segment, start and end included.
    pub fn control_points(&self) -> ArrayVec<Point, 4> {
        let mut pts = ArrayVec::new();
        match *self {
            PathSeg::Line(Line { p0, p1 }) => {
                pts.push(p0);
                pts.push(p1);
            }
            PathSeg::Quad(QuadBez { p0, p1, p2 }) => {
                pts.push(p0);
                pts.push(p1);
                pts.push(p2);
            }
            PathSeg::Cubic(CubicBez { p0, p1, p2, p3 }) => {
                pts.push(p0);
                pts.push(p1);
                pts.push(p2);
                pts.push(p3);
            }
        }
        pts
    }

    /// Is every point of this segment finite?
    pub fn is_finite(&self) -> bool {
        match self {
            PathSeg::Line(line) => line.is_finite(),
            PathSeg::Quad(quad) => quad.is_finite(),
            PathSeg::Cubic(cubic) => cubic.is_finite(),
        }
    }

    /// Diagonal of the bounding box of the control points.
    ///
    /// This is never smaller than the chord, and stays positive for closed
    /// curves whose chord is zero.
    pub fn control_extent(&self) -> f64 {
        extent(self.control_points())
    }
}

impl ParamCurve for PathSeg {
    fn eval(&self, t: f64) -> Point {
        match self {
            PathSeg::Line(line) => line.eval(t),
            PathSeg::Quad(quad) => quad.eval(t),
            PathSeg::Cubic(cubic) => cubic.eval(t),
        }
    }

    fn subsegment(&self, range: Range<f64>) -> PathSeg {
        match self {
            PathSeg::Line(line) => PathSeg::Line(line.subsegment(range)),
            PathSeg::Quad(quad) => PathSeg::Quad(quad.subsegment(range)),
            PathSeg::Cubic(cubic) => PathSeg::Cubic(cubic.subsegment(range)),
        }
    }

    fn start(&self) -> Point {
        match self {
            PathSeg::Line(line) => line.p0,
            PathSeg::Quad(quad) => quad.p0,
            PathSeg::Cubic(cubic) => cubic.p0,
        }
    }

    fn end(&self) -> Point {
        match self {
            PathSeg::Line(line) => line.p1,
            PathSeg::Quad(quad) => quad.p2,
            PathSeg::Cubic(cubic) => cubic.p3,
        }
    }
}

impl From<Line> for PathSeg {
    fn from(line: Line) -> PathSeg {
        PathSeg::Line(line)
    }
}

impl From<QuadBez> for PathSeg {
    fn from(quad: QuadBez) -> PathSeg {
        PathSeg::Quad(quad)
    }
}

impl From<CubicBez> for PathSeg {
    fn from(cubic: CubicBez) -> PathSeg {
        PathSeg::Cubic(cubic)
    }
}

/// The element of a compound path, in pen-plotter order.
///
/// A valid element stream has `MoveTo` at the beginning of each subpath.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathEl {
    /// Move directly to the point without drawing anything, starting a new
    /// subpath.
    MoveTo(Point),
    /// Draw a line from the current location to the point.
    LineTo(Point),
    /// Draw a quadratic bezier using the current location and the two points.
    QuadTo(Point, Point),
    /// Draw a cubic bezier using the current location and the three points.
    CurveTo(Point, Point, Point),
    /// Close off the path.
    ClosePath,
}

/// An ordered sequence of segments, to be perforated as one run.
///
/// The segments are expected to be contiguous, each starting where the
/// previous one ends. That is not enforced on construction; it is checked
/// by [`Path::validate`], which [`perforate`](crate::perforate) calls.
#[derive(Clone, Default, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path(Vec<PathSeg>);

impl Path {
    /// Create a new, empty path.
    #[inline]
    pub fn new() -> Path {
        Path::default()
    }

    /// Create a path from a vector of segments.
    #[inline]
    pub fn from_vec(segments: Vec<PathSeg>) -> Path {
        Path(segments)
    }

    /// Create a polyline path through the given points.
    ///
    /// A single point yields a zero-length path; no points yield an empty
    /// path.
    pub fn from_points(points: &[Point]) -> Path {
        match points {
            [] => Path::new(),
            [p] => Path(alloc::vec![PathSeg::Line(Line::new(*p, *p))]),
            _ => Path(
                points
                    .windows(2)
                    .map(|w| PathSeg::Line(Line::new(w[0], w[1])))
                    .collect(),
            ),
        }
    }

    /// Split a compound element stream into one path per subpath.
    ///
    /// `ClosePath` adds a line back to the subpath start if the current point
    /// is elsewhere. Subpaths that consist of a lone `MoveTo` are dropped,
    /// as are drawing elements that appear before any `MoveTo`.
    pub fn subpaths_from_elements(elements: impl IntoIterator<Item = PathEl>) -> Vec<Path> {
        let mut subpaths = Vec::new();
        let mut current = Path::new();
        let mut start = None;
        let mut last = Point::ZERO;
        for el in elements {
            let seg = match el {
                PathEl::MoveTo(p) => {
                    if !current.is_empty() {
                        subpaths.push(core::mem::take(&mut current));
                    }
                    start = Some(p);
                    last = p;
                    continue;
                }
                _ if start.is_none() => continue,
                PathEl::LineTo(p) => PathSeg::Line(Line::new(last, p)),
                PathEl::QuadTo(p1, p2) => PathSeg::Quad(QuadBez::new(last, p1, p2)),
                PathEl::CurveTo(p1, p2, p3) => PathSeg::Cubic(CubicBez::new(last, p1, p2, p3)),
                PathEl::ClosePath => match start {
                    Some(p) if p != last => PathSeg::Line(Line::new(last, p)),
                    _ => continue,
                },
            };
            last = seg.end();
            current.push(seg);
        }
        if !current.is_empty() {
            subpaths.push(current);
        }
        subpaths
    }

    /// Push a segment onto the path.
    #[inline]
    pub fn push(&mut self, seg: impl Into<PathSeg>) {
        self.0.push(seg.into());
    }

    /// The segments of the path.
    #[inline]
    pub fn segments(&self) -> &[PathSeg] {
        &self.0
    }

    /// Returns `true` if the path contains no segments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The start point of the first segment.
    pub fn start(&self) -> Option<Point> {
        self.0.first().map(ParamCurve::start)
    }

    /// The end point of the last segment.
    pub fn end(&self) -> Option<Point> {
        self.0.last().map(ParamCurve::end)
    }

    /// Whether the path ends where it starts.
    pub fn is_closed(&self) -> bool {
        matches!((self.start(), self.end()), (Some(a), Some(b)) if a == b)
    }

    /// Diagonal of the bounding box of all control points.
    pub fn extent(&self) -> f64 {
        extent(self.0.iter().flat_map(PathSeg::control_points))
    }

    /// Check that the path can be perforated.
    ///
    /// The path must be non-empty, every coordinate must be finite, the
    /// extent must be finite too, and each segment must start within
    /// [`CONTINUITY_TOLERANCE`] times the path extent of the previous
    /// segment's end.
    pub fn validate(&self) -> Result<(), InvalidPathError> {
        if self.is_empty() {
            return Err(InvalidPathError::Empty);
        }
        if let Some(index) = self.0.iter().position(|seg| !seg.is_finite()) {
            return Err(InvalidPathError::NonFinite { index });
        }
        let extent = self.extent();
        if !extent.is_finite() {
            return Err(InvalidPathError::Overflow);
        }
        let tolerance = CONTINUITY_TOLERANCE * extent;
        for (index, pair) in self.0.windows(2).enumerate() {
            let gap = pair[0].end().distance(pair[1].start());
            if gap > tolerance {
                return Err(InvalidPathError::Discontinuity {
                    index: index + 1,
                    gap,
                });
            }
        }
        Ok(())
    }
}

impl From<Vec<PathSeg>> for Path {
    fn from(segments: Vec<PathSeg>) -> Path {
        Path(segments)
    }
}

impl FromIterator<PathSeg> for Path {
    fn from_iter<T: IntoIterator<Item = PathSeg>>(iter: T) -> Path {
        Path(iter.into_iter().collect())
    }
}

impl Extend<PathSeg> for Path {
    fn extend<I: IntoIterator<Item = PathSeg>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = PathSeg;
    type IntoIter = core::iter::Copied<core::slice::Iter<'a, PathSeg>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

fn extent(points: impl IntoIterator<Item = Point>) -> f64 {
    let mut iter = points.into_iter();
    let Some(first) = iter.next() else {
        return 0.0;
    };
    let (min, max) = iter.fold((first, first), |(min, max), p| {
        (
            Point::new(min.x.min(p.x), min.y.min(p.y)),
            Point::new(max.x.max(p.x), max.y.max(p.y)),
        )
    });
    min.distance(max)
}

#[cfg(test)]
mod tests {
    use crate::{CubicBez, InvalidPathError, Line, Path, PathEl, PathSeg, Point, QuadBez};

    fn square() -> Path {
        Path::from_points(&[
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(0.0, 0.0),
        ])
    }

    #[test]
    fn from_points() {
        let path = square();
        assert_eq!(path.segments().len(), 4);
        assert!(path.is_closed());
        assert_eq!(path.validate(), Ok(()));
        assert!(Path::from_points(&[]).is_empty());
        let dot = Path::from_points(&[Point::new(3.0, 4.0)]);
        assert_eq!(dot.segments(), &[PathSeg::Line(Line::new((3.0, 4.0), (3.0, 4.0)))]);
        assert_eq!(dot.validate(), Ok(()));
    }

    #[test]
    fn empty_path_is_invalid() {
        assert_eq!(Path::new().validate(), Err(InvalidPathError::Empty));
    }

    #[test]
    fn gap_is_invalid() {
        let mut path = Path::new();
        path.push(Line::new((0.0, 0.0), (10.0, 0.0)));
        path.push(Line::new((10.0, 0.5), (20.0, 0.0)));
        assert_eq!(
            path.validate(),
            Err(InvalidPathError::Discontinuity {
                index: 1,
                gap: 0.5
            })
        );
    }

    #[test]
    fn rounding_noise_is_tolerated() {
        let mut path = Path::new();
        path.push(Line::new((0.0, 0.0), (1000.0, 0.0)));
        path.push(QuadBez::new((1000.0, 1e-10), (1500.0, 500.0), (2000.0, 0.0)));
        assert_eq!(path.validate(), Ok(()));
    }

    #[test]
    fn non_finite_is_invalid() {
        let mut path = Path::new();
        path.push(Line::new((0.0, 0.0), (10.0, 0.0)));
        path.push(CubicBez::new(
            (10.0, 0.0),
            (f64::NAN, 0.0),
            (20.0, 5.0),
            (30.0, 0.0),
        ));
        assert_eq!(
            path.validate(),
            Err(InvalidPathError::NonFinite { index: 1 })
        );
    }

    #[test]
    fn overflowing_extent_is_invalid() {
        let mut path = Path::from_points(&[Point::new(-1e308, 0.0), Point::new(1e308, 0.0)]);
        assert_eq!(path.validate(), Err(InvalidPathError::Overflow));
        // A gap would otherwise hide behind an infinite continuity tolerance.
        path.push(Line::new((0.0, 5.0), (1.0, 5.0)));
        assert_eq!(path.validate(), Err(InvalidPathError::Overflow));
    }

    #[test]
    fn extent_covers_control_points() {
        let mut path = Path::new();
        path.push(QuadBez::new((0.0, 0.0), (3.0, 4.0), (0.0, 0.0)));
        assert_eq!(path.extent(), 5.0);
        assert!(path.is_closed());
    }

    #[test]
    fn subpaths() {
        let els = [
            PathEl::MoveTo(Point::new(0.0, 0.0)),
            PathEl::LineTo(Point::new(10.0, 0.0)),
            PathEl::QuadTo(Point::new(15.0, 5.0), Point::new(10.0, 10.0)),
            PathEl::ClosePath,
            PathEl::MoveTo(Point::new(50.0, 50.0)),
            PathEl::MoveTo(Point::new(60.0, 60.0)),
            PathEl::CurveTo(
                Point::new(70.0, 60.0),
                Point::new(70.0, 70.0),
                Point::new(60.0, 70.0),
            ),
        ];
        let subpaths = Path::subpaths_from_elements(els);
        assert_eq!(subpaths.len(), 2);
        let first = subpaths[0].segments();
        assert_eq!(first.len(), 3);
        assert_eq!(first[2], PathSeg::Line(Line::new((10.0, 10.0), (0.0, 0.0))));
        assert!(subpaths[0].is_closed());
        assert_eq!(subpaths[1].start(), Some(Point::new(60.0, 60.0)));
        for path in &subpaths {
            assert_eq!(path.validate(), Ok(()));
        }
    }

    #[test]
    fn close_path_at_start_adds_nothing() {
        let els = [
            PathEl::MoveTo(Point::new(0.0, 0.0)),
            PathEl::LineTo(Point::new(10.0, 0.0)),
            PathEl::LineTo(Point::new(0.0, 0.0)),
            PathEl::ClosePath,
        ];
        let subpaths = Path::subpaths_from_elements(els);
        assert_eq!(subpaths[0].segments().len(), 2);
    }
}
