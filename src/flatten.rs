// Copyright 2025 the Flexcut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flattening of segments into polylines.
//!
//! Quadratic Béziers are flattened with the parabola-integral subdivision
//! estimate described in [Flattening quadratic Béziers], which places
//! points so that every chord deviates from the curve by about the same
//! amount. Cubics are first approximated by quadratics, spending a tenth of
//! the error budget on that step.
//!
//! [Flattening quadratic Béziers]: https://raphlinus.github.io/graphics/curves/2019/12/23/flatten-quadbez.html

use smallvec::SmallVec;

use crate::quadbez::FlattenParams;
use crate::{CubicBez, ParamCurve, PathSeg, Point, QuadBez};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// Default flattening tolerance, as a fraction of a segment's size.
pub const DEFAULT_TOLERANCE: f64 = 1e-3;

/// Lower bound on the absolute flattening tolerance.
///
/// Keeps tiny curves from being subdivided far below any useful resolution.
pub const MIN_FLATTEN_TOLERANCE: f64 = 1e-6;

/// Share of the cubic error budget spent on the quadratic approximation.
const TO_QUAD_TOL: f64 = 0.1;

/// Fraction of the error budget the subdivision estimate aims for.
///
/// The parabola-integral estimate overshoots its target by up to about 1.6x
/// near curvature peaks.
const ESTIMATE_MARGIN: f64 = 0.5;

impl PathSeg {
    /// The absolute tolerance to flatten this segment with.
    ///
    /// This is `relative` times the segment's [control extent], but never
    /// below [`MIN_FLATTEN_TOLERANCE`].
    ///
    /// [control extent]: PathSeg::control_extent
    pub fn flatten_tolerance(&self, relative: f64) -> f64 {
        (relative * self.control_extent()).max(MIN_FLATTEN_TOLERANCE)
    }

    /// Flatten the segment into line segments.
    ///
    /// The callback receives every polyline vertex after the start point,
    /// ending with the segment's end point. No emitted chord strays from the
    /// curve by more than `tolerance`. Lines emit just their end.
    pub fn flatten(&self, tolerance: f64, mut callback: impl FnMut(Point)) {
        match self {
            PathSeg::Line(line) => callback(line.p1),
            PathSeg::Quad(quad) => flatten_quad(quad, tolerance, &mut callback),
            PathSeg::Cubic(cubic) => flatten_cubic(cubic, tolerance, &mut callback),
        }
    }
}

fn flatten_quad(q: &QuadBez, tolerance: f64, callback: &mut impl FnMut(Point)) {
    let sqrt_tol = (tolerance * ESTIMATE_MARGIN).sqrt();
    let params = q.estimate_subdiv(sqrt_tol);
    let n = subdiv_count(params.val, sqrt_tol);
    let step = 1.0 / (n as f64);
    for i in 1..n {
        let u = (i as f64) * step;
        let t = q.determine_subdiv_t(&params, u);
        callback(q.eval(t));
    }
    callback(q.p2);
}

fn flatten_cubic(c: &CubicBez, tolerance: f64, callback: &mut impl FnMut(Point)) {
    let sqrt_remain_tol = (tolerance * ESTIMATE_MARGIN * (1.0 - TO_QUAD_TOL)).sqrt();
    // Estimate subdivisions for each quadratic and sum them, so points are
    // spread over the whole cubic rather than rounded up per quadratic.
    let mut quads: SmallVec<[(QuadBez, FlattenParams); 8]> = SmallVec::new();
    let mut sum = 0.0;
    for (_, _, q) in c.to_quads(tolerance * TO_QUAD_TOL) {
        let params = q.estimate_subdiv(sqrt_remain_tol);
        sum += params.val;
        quads.push((q, params));
    }
    let n = subdiv_count(sum, sqrt_remain_tol);
    let step = sum / (n as f64);
    let mut i = 1;
    let mut val_sum = 0.0;
    for (q, params) in &quads {
        let mut target = (i as f64) * step;
        let recip_val = params.val.recip();
        while i < n && target < val_sum + params.val {
            let u = (target - val_sum) * recip_val;
            let t = q.determine_subdiv_t(params, u);
            callback(q.eval(t));
            i += 1;
            target = (i as f64) * step;
        }
        val_sum += params.val;
    }
    callback(c.p3);
}

/// Round a subdivision estimate up to a segment count of at least one.
fn subdiv_count(val: f64, sqrt_tol: f64) -> usize {
    let n = (0.5 * val / sqrt_tol).ceil();
    if n.is_finite() && n >= 1.0 {
        // Past this many chords the tolerance is no longer meaningful.
        n.min(1e6) as usize
    } else {
        1
    }
}
