/// Bounds for the driver's busy-wait loops.
///
/// ERA commands and ADC measurements are polled without a bound unless
/// `command_limit` is set; an exhausted bound fails with [`Error::Timeout`].
/// Calibration always runs against `calibration_timeout_us` and reports a
/// timeout as `Ok(false)`.
///
/// [`Error::Timeout`]: crate::Error::Timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Polling {
  /// Maximum reads of a busy register before giving up. `None` polls forever.
  pub command_limit: Option<u32>,
  pub calibration_timeout_us: u32,
  /// Sleep between two checks of the calibration bit.
  pub calibration_poll_us: u32,
  /// Maximum stale data-ready flags cleared during bring-up.
  pub drain_limit: u16,
}

impl Polling {
  pub const fn new() -> Self {
    Self { command_limit: None, calibration_timeout_us: 100_000, calibration_poll_us: 1_000, drain_limit: 16 }
  }

  pub const fn with_command_limit(mut self, limit: u32) -> Self {
    self.command_limit = Some(limit);
    self
  }

  pub const fn with_calibration_timeout(mut self, timeout_us: u32, poll_us: u32) -> Self {
    self.calibration_timeout_us = timeout_us;
    self.calibration_poll_us = poll_us;
    self
  }

  pub const fn with_drain_limit(mut self, limit: u16) -> Self {
    self.drain_limit = limit;
    self
  }
}

impl Default for Polling {
  fn default() -> Self {
    Self::new()
  }
}

/// Countdown over [`Polling::command_limit`].
pub(crate) struct Budget(Option<u32>);

impl Budget {
  pub(crate) const fn new(limit: Option<u32>) -> Self {
    Self(limit)
  }

  /// Consume one attempt; `false` once the budget is spent.
  pub(crate) fn spend(&mut self) -> bool {
    match &mut self.0 {
      None => true,
      Some(0) => false,
      Some(n) => {
        *n -= 1;
        true
      }
    }
  }
}
