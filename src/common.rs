// Copyright 2025 the Flexcut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Common mathematical operations

/// Defines a trait that chooses between libstd or libm implementations of float methods.
macro_rules! define_float_funcs {
    ($(
        fn $name:ident(self $(,$arg:ident: $arg_ty:ty)*) -> $ret:ty
        => $lname:ident;
    )+) => {
        #[cfg(not(feature = "std"))]
        pub(crate) trait FloatFuncs : Sized {
            /// Special implementation for signum, because libm doesn't have it.
            fn signum(self) -> Self;

            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret;)+
        }

        #[cfg(not(feature = "std"))]
        impl FloatFuncs for f64 {
            #[inline]
            fn signum(self) -> f64 {
                if self.is_nan() {
                    f64::NAN
                } else {
                    1.0_f64.copysign(self)
                }
            }

            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret {
                #[cfg(feature = "libm")]
                return libm::$lname(self $(,$arg as _)*);

                #[cfg(not(feature = "libm"))]
                compile_error!("flexcut requires either the `std` or `libm` feature")
            })+
        }
    }
}

define_float_funcs! {
    fn abs(self) -> Self => fabs;
    fn ceil(self) -> Self => ceil;
    fn hypot(self, other: Self) -> Self => hypot;
    fn powf(self, n: Self) -> Self => pow;
    fn sqrt(self) -> Self => sqrt;
}

/// An approximation to $\int (1 + 4x^2) ^ -0.25 dx$
///
/// This is used for flattening curves.
pub(crate) fn approx_parabola_integral(x: f64) -> f64 {
    const D: f64 = 0.67;
    x / (1.0 - D + (D * D * D * D + 0.25 * x * x).sqrt().sqrt())
}

/// An approximation to the inverse parabola integral.
pub(crate) fn approx_parabola_inv_integral(x: f64) -> f64 {
    const B: f64 = 0.39;
    x * (1.0 - B + (B * B + 0.25 * x * x).sqrt())
}

/// Relative closeness test used by the unit tests.
#[cfg(test)]
pub(crate) fn assert_approx_eq(x: f64, y: f64, max_error: f64) {
    assert!(
        (x - y).abs() <= max_error * f64::max(1.0, f64::max(x.abs(), y.abs())),
        "{x} != {y}"
    );
}

#[cfg(test)]
mod tests {
    use super::{approx_parabola_integral, approx_parabola_inv_integral, assert_approx_eq};

    #[test]
    fn parabola_integral_is_odd() {
        for &x in &[0.1, 0.5, 1.0, 3.0, 20.0] {
            assert_approx_eq(approx_parabola_integral(-x), -approx_parabola_integral(x), 1e-15);
        }
        assert_eq!(approx_parabola_integral(0.0), 0.0);
    }

    #[test]
    fn parabola_inverse_roundtrips_closely() {
        // The two approximations are tuned against each other; they agree to
        // within a few percent, which is all the subdivision estimate needs.
        for &x in &[0.05, 0.3, 1.0, 2.5, 10.0] {
            let y = approx_parabola_inv_integral(approx_parabola_integral(x));
            assert!((y - x).abs() < 0.05 * x.max(1.0), "{x} -> {y}");
        }
    }
}
