use crate::control::CalConfig1;

/// Compensation flags written to CalConfig1 by [`Pinnacle::calibrate`].
///
/// [`Pinnacle::calibrate`]: crate::Pinnacle::calibrate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
  /// Force a calibration now and block until it finishes.
  pub run: bool,
  pub tap: bool,
  pub track_error: bool,
  /// Palm compensation, called NERD in Cirque's documentation.
  pub nerd: bool,
  pub background: bool,
}

impl Calibration {
  /// Run with every dynamic compensation enabled.
  pub const fn new() -> Self {
    Self { run: true, tap: true, track_error: true, nerd: true, background: true }
  }

  /// Only store the compensation flags.
  pub const fn configure_only(mut self) -> Self {
    self.run = false;
    self
  }

  pub const fn with_tap(mut self, tap: bool) -> Self {
    self.tap = tap;
    self
  }

  pub const fn with_track_error(mut self, track_error: bool) -> Self {
    self.track_error = track_error;
    self
  }

  pub const fn with_nerd(mut self, nerd: bool) -> Self {
    self.nerd = nerd;
    self
  }

  pub const fn with_background(mut self, background: bool) -> Self {
    self.background = background;
    self
  }

  pub(crate) const fn register(self) -> CalConfig1 {
    CalConfig1::new()
      .with_run(self.run)
      .with_background(self.background)
      .with_nerd(self.nerd)
      .with_track_error(self.track_error)
      .with_tap(self.tap)
  }
}

impl Default for Calibration {
  fn default() -> Self {
    Self::new()
  }
}

/// Wide-z-min thresholds near the sensor edges, see
/// [`Pinnacle::tune_edge_sensitivity`].
///
/// [`Pinnacle::tune_edge_sensitivity`]: crate::Pinnacle::tune_edge_sensitivity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeSensitivity {
  pub x_axis_wide_z_min: u8,
  pub y_axis_wide_z_min: u8,
}

impl EdgeSensitivity {
  pub const fn new(x_axis_wide_z_min: u8, y_axis_wide_z_min: u8) -> Self {
    Self { x_axis_wide_z_min, y_axis_wide_z_min }
  }
}

impl Default for EdgeSensitivity {
  fn default() -> Self {
    Self::new(0x04, 0x03)
  }
}
