// Copyright 2025 the Flexcut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Perforated cutting paths.
//!
//! Flexcut turns a vector path into a sequence of pen (or blade) motions
//! that alternate between *cuts*, traced with the pen down, and *bridges*,
//! traced with the pen up. The result is a perforation line: a cut that
//! leaves the material held together by small bridges at regular
//! intervals along the path.
//!
//! Curved segments are flattened into a [`Polyline`] first, and the run
//! pattern is laid out along its arc length. Runs cross segment and vertex
//! boundaries freely, and the last run is shortened to end exactly at the
//! end of the path.
//!
//! # Examples
//!
//! ```
//! use flexcut::{perforate, CubicBez, MotionCommand, Path, PerforationConfig, Point};
//!
//! let mut path = Path::new();
//! path.push(CubicBez::new((0.0, 0.0), (30.0, 40.0), (70.0, -40.0), (100.0, 0.0)));
//!
//! let config = PerforationConfig::new(5.0, 2.0);
//! let perforation = perforate(&path, &config).unwrap();
//!
//! let mut pen_down = false;
//! for command in &perforation {
//!     match command {
//!         MotionCommand::PenDown => pen_down = true,
//!         MotionCommand::PenUp => pen_down = false,
//!         MotionCommand::MoveTo(p) => {
//!             // Drive the plotter to `p`, cutting if `pen_down`.
//!             let _ = (p, pen_down);
//!         }
//!     }
//! }
//! assert_eq!(
//!     perforation.commands().last(),
//!     Some(MotionCommand::MoveTo(Point::new(100.0, 0.0)))
//! );
//! ```
//!
//! # Features
//!
//! This crate either uses the standard library or the [`libm`] crate for
//! math functionality. The `std` feature is enabled by default, but can be
//! disabled, as long as the `libm` feature is enabled. This is useful for
//! `no_std` environments such as plotter firmware. The `alloc` crate is
//! used regardless.
//!
//! - `serde`: `Serialize` and `Deserialize` for the geometry types, the
//!   config and the motion commands.
//! - `schemars`: JSON schemas for the same types.
//! - `mint`: conversions between [`Point`]/[`Vec2`] and `mint` types.
//!
//! [`libm`]: https://docs.rs/libm

#![forbid(unsafe_code)]
#![deny(missing_docs, clippy::trivially_copy_pass_by_ref)]
#![warn(clippy::doc_markdown, rustdoc::broken_intra_doc_links)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(unused_qualifications)]
#![allow(
    clippy::unreadable_literal,
    clippy::many_single_char_names,
    clippy::excessive_precision
)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("flexcut requires either the `std` or `libm` feature");

// Suppress the unused_crate_dependencies lint when both std and libm are specified.
#[cfg(all(feature = "std", feature = "libm"))]
use libm as _;

extern crate alloc;

mod common;
mod cubicbez;
mod error;
mod flatten;
mod line;
mod param_curve;
mod path;
mod perforation;
mod point;
mod polyline;
mod quadbez;
mod vec2;

pub use crate::cubicbez::*;
pub use crate::error::*;
pub use crate::flatten::*;
pub use crate::line::*;
pub use crate::param_curve::*;
pub use crate::path::*;
pub use crate::perforation::*;
pub use crate::point::*;
pub use crate::polyline::*;
pub use crate::quadbez::*;
pub use crate::vec2::*;
