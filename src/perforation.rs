// Copyright 2025 the Flexcut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Perforation of paths into alternating cut and bridge runs.

use alloc::vec::Vec;

use crate::{
    ConfigError, InvalidPathError, Path, PerforateError, Point, Polyline, DEFAULT_TOLERANCE,
};

/// Epsilon for arc-length comparisons, relative to the total path length.
pub const LENGTH_EPSILON: f64 = 1e-9;

/// Parameters of a perforation.
///
/// All lengths are in the same unit as the path coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PerforationConfig {
    /// Arc length of each pen-down run.
    pub cut_length: f64,
    /// Arc length of each pen-up run.
    pub bridge_length: f64,
    /// Whether the first run is a cut rather than a bridge.
    pub start_with_cut: bool,
    /// Whether to reserve a final bridge so the pattern ends pen-up.
    ///
    /// When the schedule would end on a cut and the path is longer than
    /// `bridge_length`, the last `bridge_length` of the path becomes a
    /// bridge. Runs still cover the whole path.
    pub finish_with_bridge: bool,
    /// Flattening tolerance, relative to the size of each curved segment.
    pub tolerance: f64,
}

impl Default for PerforationConfig {
    fn default() -> Self {
        PerforationConfig {
            cut_length: 5.0,
            bridge_length: 2.0,
            start_with_cut: true,
            finish_with_bridge: false,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl PerforationConfig {
    /// A config with the given run lengths, starting with a cut.
    pub fn new(cut_length: f64, bridge_length: f64) -> Self {
        PerforationConfig {
            cut_length,
            bridge_length,
            ..Default::default()
        }
    }

    /// Set whether the first run is a cut.
    #[must_use]
    pub fn with_start_with_cut(mut self, start_with_cut: bool) -> Self {
        self.start_with_cut = start_with_cut;
        self
    }

    /// Set whether the pattern is forced to end on a bridge.
    #[must_use]
    pub fn with_finish_with_bridge(mut self, finish_with_bridge: bool) -> Self {
        self.finish_with_bridge = finish_with_bridge;
        self
    }

    /// Set the relative flattening tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Check that both lengths and the tolerance are positive and finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn usable(x: f64) -> bool {
            x > 0.0 && x.is_finite()
        }
        if !usable(self.cut_length) {
            return Err(ConfigError::CutLength(self.cut_length));
        }
        if !usable(self.bridge_length) {
            return Err(ConfigError::BridgeLength(self.bridge_length));
        }
        if !usable(self.tolerance) {
            return Err(ConfigError::Tolerance(self.tolerance));
        }
        Ok(())
    }

    /// The kind of the first run.
    pub fn first_kind(&self) -> RunKind {
        if self.start_with_cut {
            RunKind::Cut
        } else {
            RunKind::Bridge
        }
    }

    /// The target length of a run of the given kind.
    pub fn run_length(&self, kind: RunKind) -> f64 {
        match kind {
            RunKind::Cut => self.cut_length,
            RunKind::Bridge => self.bridge_length,
        }
    }
}

/// Whether a run is drawn with the pen down or up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunKind {
    /// Pen down.
    Cut,
    /// Pen up.
    Bridge,
}

impl RunKind {
    /// The other kind.
    #[inline]
    pub fn opposite(self) -> RunKind {
        match self {
            RunKind::Cut => RunKind::Bridge,
            RunKind::Bridge => RunKind::Cut,
        }
    }

    /// The pen-state command that starts a run of this kind.
    #[inline]
    pub fn pen(self) -> MotionCommand {
        match self {
            RunKind::Cut => MotionCommand::PenDown,
            RunKind::Bridge => MotionCommand::PenUp,
        }
    }
}

/// One scheduled run, as an arc-length interval of the flattened path.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Run {
    /// Cut or bridge.
    pub kind: RunKind,
    /// Arc length where the run starts.
    pub start: f64,
    /// Arc length where the run ends.
    pub end: f64,
}

impl Run {
    /// The arc length covered by the run.
    #[inline]
    pub fn length(&self) -> f64 {
        self.end - self.start
    }
}

/// A device motion primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MotionCommand {
    /// Lift the pen (or blade).
    PenUp,
    /// Lower the pen (or blade).
    PenDown,
    /// Move in a straight line to the point, keeping the pen state.
    MoveTo(Point),
}

impl MotionCommand {
    /// The target point of a `MoveTo`.
    #[inline]
    pub fn point(&self) -> Option<Point> {
        match self {
            MotionCommand::MoveTo(p) => Some(*p),
            _ => None,
        }
    }

    /// Is this `PenUp` or `PenDown`?
    #[inline]
    pub fn is_pen_state(&self) -> bool {
        !matches!(self, MotionCommand::MoveTo(_))
    }
}

/// The run schedule of a perforation.
///
/// Runs alternate in kind and tile `0..=length` without gaps; the last
/// run is truncated to end exactly at the path length.
#[derive(Clone, Debug)]
pub struct Runs {
    kind: RunKind,
    pos: f64,
    /// Where regular scheduling stops.
    limit: f64,
    total: f64,
    cut_length: f64,
    bridge_length: f64,
    epsilon: f64,
    /// A final bridge covers `limit..total`.
    reserved_bridge: bool,
}

impl Runs {
    fn new(config: &PerforationConfig, total: f64) -> Runs {
        let mut runs = Runs {
            kind: config.first_kind(),
            pos: 0.0,
            limit: total,
            total,
            cut_length: config.cut_length,
            bridge_length: config.bridge_length,
            epsilon: LENGTH_EPSILON * total,
            reserved_bridge: false,
        };
        if config.finish_with_bridge && total > config.bridge_length + runs.epsilon {
            let last = runs.clone().last();
            if last.map_or(false, |run| run.kind == RunKind::Cut) {
                runs.limit = total - config.bridge_length;
                runs.reserved_bridge = true;
            }
        }
        runs
    }

    fn finish(&mut self) {
        self.pos = self.total;
        self.limit = self.total;
        self.reserved_bridge = false;
    }
}

impl Iterator for Runs {
    type Item = Run;

    fn next(&mut self) -> Option<Run> {
        if self.pos < self.limit - self.epsilon {
            let kind = self.kind;
            let len = match kind {
                RunKind::Cut => self.cut_length,
                RunKind::Bridge => self.bridge_length,
            };
            let mut end = self.pos + len;
            // Clamp a remainder within epsilon of the limit, and runs too
            // short to move `pos` at this magnitude.
            if end >= self.limit - self.epsilon || end <= self.pos {
                end = self.limit;
            }
            let mut run = Run {
                kind,
                start: self.pos,
                end,
            };
            self.pos = end;
            self.kind = kind.opposite();
            if self.reserved_bridge && end == self.limit && kind == RunKind::Bridge {
                // Already ending on a bridge; let it absorb the reserve.
                run.end = self.total;
                self.finish();
            }
            return Some(run);
        }
        if self.reserved_bridge {
            let run = Run {
                kind: RunKind::Bridge,
                start: self.limit,
                end: self.total,
            };
            self.finish();
            return Some(run);
        }
        None
    }
}

impl core::iter::FusedIterator for Runs {}

/// A perforated path.
///
/// This holds the flattened path and the config; the runs and motion
/// commands are generated lazily, and identically, each time they are
/// requested.
#[derive(Clone, Debug)]
pub struct Perforation {
    polyline: Polyline,
    config: PerforationConfig,
}

impl Perforation {
    /// The flattened path.
    #[inline]
    pub fn polyline(&self) -> &Polyline {
        &self.polyline
    }

    /// The config the perforation was made with.
    #[inline]
    pub fn config(&self) -> &PerforationConfig {
        &self.config
    }

    /// Arc length of the flattened path.
    #[inline]
    pub fn length(&self) -> f64 {
        self.polyline.length()
    }

    /// The run schedule.
    ///
    /// Empty for a zero-length path.
    pub fn runs(&self) -> Runs {
        Runs::new(&self.config, self.polyline.length())
    }

    /// The geometry traced by a run.
    pub fn run_geometry(&self, run: &Run) -> Polyline {
        self.polyline.slice(run.start, run.end)
    }

    /// The motion commands.
    ///
    /// Each run yields its pen-state command, a `MoveTo` its start, a
    /// `MoveTo` each polyline vertex strictly inside it, and a `MoveTo` its
    /// end. A zero-length path yields only the pen-state command of the
    /// first run.
    pub fn commands(&self) -> Commands<'_> {
        let state = if self.polyline.length() > 0.0 {
            State::NextRun
        } else {
            State::Degenerate(self.config.first_kind())
        };
        Commands {
            polyline: &self.polyline,
            runs: self.runs(),
            epsilon: LENGTH_EPSILON * self.polyline.length(),
            state,
        }
    }
}

impl<'a> IntoIterator for &'a Perforation {
    type Item = MotionCommand;
    type IntoIter = Commands<'a>;

    fn into_iter(self) -> Commands<'a> {
        self.commands()
    }
}

/// Iterator over the motion commands of a [`Perforation`].
#[derive(Clone, Debug)]
pub struct Commands<'a> {
    polyline: &'a Polyline,
    runs: Runs,
    epsilon: f64,
    state: State,
}

#[derive(Clone, Copy, Debug)]
enum State {
    NextRun,
    RunStart(Run),
    Interior { run: Run, next: usize, end: usize },
    Degenerate(RunKind),
    Done,
}

impl Iterator for Commands<'_> {
    type Item = MotionCommand;

    fn next(&mut self) -> Option<MotionCommand> {
        match self.state {
            State::NextRun => match self.runs.next() {
                Some(run) => {
                    self.state = State::RunStart(run);
                    Some(run.kind.pen())
                }
                None => {
                    self.state = State::Done;
                    None
                }
            },
            State::RunStart(run) => {
                let interior = self.polyline.interior(run.start, run.end, self.epsilon);
                self.state = State::Interior {
                    run,
                    next: interior.start,
                    end: interior.end,
                };
                Some(MotionCommand::MoveTo(self.polyline.point_at(run.start)))
            }
            State::Interior { run, next, end } if next < end => {
                self.state = State::Interior {
                    run,
                    next: next + 1,
                    end,
                };
                Some(MotionCommand::MoveTo(self.polyline.points()[next]))
            }
            State::Interior { run, .. } => {
                self.state = State::NextRun;
                Some(MotionCommand::MoveTo(self.polyline.point_at(run.end)))
            }
            State::Degenerate(kind) => {
                self.state = State::Done;
                Some(kind.pen())
            }
            State::Done => None,
        }
    }
}

impl core::iter::FusedIterator for Commands<'_> {}

/// Perforate a path.
///
/// The config is checked first, then the path (see [`Path::validate`]). On
/// success the returned [`Perforation`] yields the motion commands.
///
/// # Examples
///
/// ```
/// use flexcut::{perforate, MotionCommand, Path, PerforationConfig, Point};
///
/// let path = Path::from_points(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
/// let perforation = perforate(&path, &PerforationConfig::new(4.0, 2.0)).unwrap();
/// let pen_states: Vec<_> = perforation
///     .commands()
///     .filter(MotionCommand::is_pen_state)
///     .collect();
/// assert_eq!(
///     pen_states,
///     [MotionCommand::PenDown, MotionCommand::PenUp, MotionCommand::PenDown]
/// );
/// ```
pub fn perforate(path: &Path, config: &PerforationConfig) -> Result<Perforation, PerforateError> {
    config.validate()?;
    path.validate()?;
    let polyline = Polyline::from_path(path, config.tolerance).ok_or(InvalidPathError::Empty)?;
    if !polyline.length().is_finite() {
        return Err(InvalidPathError::Overflow.into());
    }
    Ok(Perforation {
        polyline,
        config: *config,
    })
}

/// Perforate each of several paths with the same config.
///
/// Stops at the first error.
pub fn perforate_all(
    paths: &[Path],
    config: &PerforationConfig,
) -> Result<Vec<Perforation>, PerforateError> {
    config.validate()?;
    paths.iter().map(|path| perforate(path, config)).collect()
}
