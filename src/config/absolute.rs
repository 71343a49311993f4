use crate::reg::DEFAULT_Z_IDLE;

/// Absolute (position) mode settings, see [`Pinnacle::absolute_mode_config`].
///
/// [`Pinnacle::absolute_mode_config`]: crate::Pinnacle::absolute_mode_config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AbsoluteConfig {
  /// Empty packets (x, y and z all zero) reported every 10 ms after lift-off.
  pub z_idle_count: u8,
  pub invert_x: bool,
  pub invert_y: bool,
}

impl AbsoluteConfig {
  pub const fn new() -> Self {
    Self { z_idle_count: DEFAULT_Z_IDLE, invert_x: false, invert_y: false }
  }

  /// Counts past 255 saturate.
  pub const fn with_z_idle_count(mut self, count: u32) -> Self {
    self.z_idle_count = if count > u8::MAX as u32 { u8::MAX } else { count as u8 };
    self
  }

  pub const fn with_inverted(mut self, x: bool, y: bool) -> Self {
    self.invert_x = x;
    self.invert_y = y;
    self
  }
}

impl Default for AbsoluteConfig {
  fn default() -> Self {
    Self::new()
  }
}
