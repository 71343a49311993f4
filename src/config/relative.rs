/// Relative (mouse) mode settings, see [`Pinnacle::relative_mode_config`].
///
/// Modules with a factory hardware configuration ignore `secondary_tap`,
/// `intellimouse` and `glide_extend`.
///
/// [`Pinnacle::relative_mode_config`]: crate::Pinnacle::relative_mode_config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RelativeConfig {
  /// Report taps as button presses. Turning this off also drops secondary taps.
  pub taps: bool,
  /// Swap the axes before reporting.
  pub rotate90: bool,
  /// Tapping the top-left corner reports the secondary button.
  pub secondary_tap: bool,
  /// Request a fourth (scroll) byte in every packet.
  pub intellimouse: bool,
  /// Keep a gesture alive when the finger glides off the edge.
  pub glide_extend: bool,
}

impl RelativeConfig {
  pub const fn new() -> Self {
    Self { taps: true, rotate90: false, secondary_tap: true, intellimouse: false, glide_extend: false }
  }

  pub const fn with_taps(mut self, taps: bool) -> Self {
    self.taps = taps;
    self
  }

  pub const fn with_rotate90(mut self, rotate: bool) -> Self {
    self.rotate90 = rotate;
    self
  }

  pub const fn with_secondary_tap(mut self, secondary_tap: bool) -> Self {
    self.secondary_tap = secondary_tap;
    self
  }

  pub const fn with_intellimouse(mut self, intellimouse: bool) -> Self {
    self.intellimouse = intellimouse;
    self
  }

  pub const fn with_glide_extend(mut self, glide_extend: bool) -> Self {
    self.glide_extend = glide_extend;
    self
  }
}

impl Default for RelativeConfig {
  fn default() -> Self {
    Self::new()
  }
}
