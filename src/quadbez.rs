// Copyright 2025 the Flexcut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadratic Bézier segments.

use core::ops::Range;

use crate::common::{approx_parabola_integral, approx_parabola_inv_integral};
use crate::{ParamCurve, Point};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// A single quadratic Bézier segment.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub struct QuadBez {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
}

impl QuadBez {
    /// Create a new quadratic Bézier segment.
    #[inline(always)]
    pub fn new<V: Into<Point>>(p0: V, p1: V, p2: V) -> QuadBez {
        QuadBez {
            p0: p0.into(),
            p1: p1.into(),
            p2: p2.into(),
        }
    }

    /// Is this quadratic Bézier curve finite?
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.p0.is_finite() && self.p1.is_finite() && self.p2.is_finite()
    }

    /// Estimate the number of subdivisions for flattening.
    ///
    /// The curve is mapped onto a segment of the standard parabola `y = x²`;
    /// the integral of `(1 + 4x²)^-0.25` over that segment, scaled, gives the
    /// number of line segments needed for an error of `sqrt_tol²`.
    pub(crate) fn estimate_subdiv(&self, sqrt_tol: f64) -> FlattenParams {
        let d01 = self.p1 - self.p0;
        let d12 = self.p2 - self.p1;
        let dd = d01 - d12;
        let cross = (self.p2 - self.p0).cross(dd);
        let x0 = d01.dot(dd) * cross.recip();
        let x2 = d12.dot(dd) * cross.recip();
        let scale = (cross / (dd.hypot() * (x2 - x0))).abs();

        let a0 = approx_parabola_integral(x0);
        let a2 = approx_parabola_integral(x2);
        let val = if scale.is_finite() {
            let da = (a2 - a0).abs();
            let sqrt_scale = scale.sqrt();
            if x0.signum() == x2.signum() {
                da * sqrt_scale
            } else {
                // Handle cusp case (segment contains curvature maximum)
                let xmin = sqrt_tol / sqrt_scale;
                sqrt_tol * da / approx_parabola_integral(xmin)
            }
        } else {
            // Collinear control points.
            0.0
        };
        let u0 = approx_parabola_inv_integral(a0);
        let u2 = approx_parabola_inv_integral(a2);
        let uscale = (u2 - u0).recip();
        FlattenParams {
            a0,
            a2,
            u0,
            uscale,
            val,
        }
    }

    /// Map a fraction `x` of the subdivision count back to a curve parameter.
    pub(crate) fn determine_subdiv_t(&self, params: &FlattenParams, x: f64) -> f64 {
        let a = params.a0 + (params.a2 - params.a0) * x;
        let u = approx_parabola_inv_integral(a);
        (u - params.u0) * params.uscale
    }
}

/// Parameters of the subdivision estimate for one quadratic.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FlattenParams {
    a0: f64,
    a2: f64,
    u0: f64,
    uscale: f64,
    /// The number of `sqrt_tol`-sized subdivisions, before rounding.
    pub(crate) val: f64,
}

impl ParamCurve for QuadBez {
    #[inline]
    fn eval(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        (self.p0.to_vec2() * (mt * mt)
            + (self.p1.to_vec2() * (mt * 2.0) + self.p2.to_vec2() * t) * t)
            .to_point()
    }

    fn subsegment(&self, range: Range<f64>) -> QuadBez {
        let (t0, t1) = (range.start, range.end);
        let p0 = self.eval(t0);
        let p2 = self.eval(t1);
        let p1 = p0 + (self.p1 - self.p0).lerp(self.p2 - self.p1, t0) * (t1 - t0);
        QuadBez { p0, p1, p2 }
    }

    /// Subdivide into halves, using de Casteljau.
    #[inline]
    fn subdivide(&self) -> (QuadBez, QuadBez) {
        let pm = self.eval(0.5);
        (
            QuadBez::new(self.p0, self.p0.lerp(self.p1, 0.5), pm),
            QuadBez::new(pm, self.p1.lerp(self.p2, 0.5), self.p2),
        )
    }

    #[inline(always)]
    fn start(&self) -> Point {
        self.p0
    }

    #[inline(always)]
    fn end(&self) -> Point {
        self.p2
    }
}

#[cfg(test)]
mod tests {
    use crate::common::assert_approx_eq;
    use crate::{ParamCurve, Point, QuadBez};

    #[test]
    fn quadbez_eval() {
        let q = QuadBez::new((0.0, 0.0), (1.0, 2.0), (2.0, 0.0));
        assert_eq!(q.eval(0.0), Point::new(0.0, 0.0));
        assert_eq!(q.eval(1.0), Point::new(2.0, 0.0));
        assert_eq!(q.eval(0.5), Point::new(1.0, 1.0));
    }

    #[test]
    fn quadbez_subsegment() {
        let q = QuadBez::new((3.1, 4.1), (5.9, 2.6), (5.3, 5.8));
        let t0 = 0.1;
        let t1 = 0.8;
        let qs = q.subsegment(t0..t1);
        let epsilon = 1e-12;
        let n = 10;
        for i in 0..=n {
            let t = (i as f64) * (n as f64).recip();
            let ts = t0 + t * (t1 - t0);
            assert!(q.eval(ts).distance(qs.eval(t)) < epsilon);
        }
    }

    #[test]
    fn subdiv_estimate_grows_with_precision() {
        // Both ends on the same side of the parabola vertex.
        let q = QuadBez::new((0.0, 0.0), (10.0, 0.0), (100.0, 50.0));
        let coarse = q.estimate_subdiv(1.0f64.sqrt()).val / 1.0f64.sqrt();
        let fine = q.estimate_subdiv(0.01f64.sqrt()).val / 0.01f64.sqrt();
        // Subdivision count scales with 1/sqrt(tolerance).
        assert_approx_eq(fine / coarse, 10.0, 1e-9);
    }

    #[test]
    fn subdiv_estimate_of_straight_quad_is_zero() {
        let q = QuadBez::new((0.0, 0.0), (1.0, 1.0), (2.0, 2.0));
        assert_eq!(q.estimate_subdiv(0.1).val, 0.0);
    }

    #[test]
    fn subdiv_t_spans_unit_interval() {
        let q = QuadBez::new((0.0, 0.0), (20.0, 40.0), (60.0, 10.0));
        let params = q.estimate_subdiv(0.1);
        assert_approx_eq(q.determine_subdiv_t(&params, 0.0), 0.0, 1e-12);
        assert_approx_eq(q.determine_subdiv_t(&params, 1.0), 1.0, 1e-12);
    }
}
