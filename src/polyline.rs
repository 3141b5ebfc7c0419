// Copyright 2025 the Flexcut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flattened paths with an arc-length table.

use alloc::vec::Vec;

use crate::{ParamCurve, Path, Point};

/// A polyline with the cumulative arc length at each vertex.
///
/// Consecutive vertices are never coincident, so every chord has a
/// positive length and `lengths` is strictly increasing after the first
/// entry, which is always zero.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    points: Vec<Point>,
    lengths: Vec<f64>,
}

impl Polyline {
    /// Flatten a path.
    ///
    /// Each segment is flattened with its own
    /// [`flatten_tolerance`](crate::PathSeg::flatten_tolerance) for the
    /// given relative tolerance. The path is not validated here; gaps
    /// between segments simply become chords.
    ///
    /// Returns `None` for an empty path.
    pub fn from_path(path: &Path, relative_tolerance: f64) -> Option<Polyline> {
        let mut polyline = Polyline::starting_at(path.start()?);
        for seg in path {
            let tolerance = seg.flatten_tolerance(relative_tolerance);
            seg.flatten(tolerance, |p| polyline.push(p));
        }
        Some(polyline)
    }

    /// Build a polyline through the given points.
    ///
    /// Returns `None` if there are no points.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Polyline> {
        let mut iter = points.into_iter();
        let mut polyline = Polyline::starting_at(iter.next()?);
        iter.for_each(|p| polyline.push(p));
        Some(polyline)
    }

    fn starting_at(start: Point) -> Polyline {
        Polyline {
            points: alloc::vec![start],
            lengths: alloc::vec![0.0],
        }
    }

    fn push(&mut self, p: Point) {
        let last = self.points[self.points.len() - 1];
        let len = last.distance(p);
        if len > 0.0 {
            let total = self.length();
            self.points.push(p);
            self.lengths.push(total + len);
        }
    }

    /// The vertices.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The arc length from the start to each vertex.
    #[inline]
    pub fn lengths(&self) -> &[f64] {
        &self.lengths
    }

    /// Total arc length.
    #[inline]
    pub fn length(&self) -> f64 {
        self.lengths[self.lengths.len() - 1]
    }

    /// The point at arc length `s` from the start.
    ///
    /// `s` is clamped to `0..=length`. Within a chord the point is linearly
    /// interpolated.
    pub fn point_at(&self, s: f64) -> Point {
        let s = s.clamp(0.0, self.length());
        // First vertex at or beyond `s`.
        let ix = self.lengths.partition_point(|&l| l < s);
        if ix == 0 {
            return self.points[0];
        }
        let (s0, s1) = (self.lengths[ix - 1], self.lengths[ix]);
        let t = (s - s0) / (s1 - s0);
        self.points[ix - 1].lerp(self.points[ix], t)
    }

    /// The part of the polyline between arc lengths `start` and `end`.
    ///
    /// The result starts at `point_at(start)`, visits every vertex strictly
    /// in between and ends at `point_at(end)`.
    pub fn slice(&self, start: f64, end: f64) -> Polyline {
        let mut sub = Polyline::starting_at(self.point_at(start));
        for &p in &self.points[self.interior(start, end, 0.0)] {
            sub.push(p);
        }
        sub.push(self.point_at(end));
        sub
    }

    /// Index range of the vertices strictly inside `start..end`, shrunk at
    /// both ends by `epsilon`.
    pub(crate) fn interior(&self, start: f64, end: f64, epsilon: f64) -> core::ops::Range<usize> {
        let first = self.lengths.partition_point(|&l| l <= start + epsilon);
        let last = self.lengths.partition_point(|&l| l < end - epsilon);
        first..last.max(first)
    }
}

impl ParamCurve for Polyline {
    /// Evaluate at a fraction `t` of the total arc length.
    fn eval(&self, t: f64) -> Point {
        self.point_at(t * self.length())
    }

    /// The part of the polyline between two fractions of its arc length.
    fn subsegment(&self, range: core::ops::Range<f64>) -> Polyline {
        let total = self.length();
        self.slice(range.start * total, range.end * total)
    }

    fn start(&self) -> Point {
        self.points[0]
    }

    fn end(&self) -> Point {
        self.points[self.points.len() - 1]
    }
}
