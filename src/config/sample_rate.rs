/// Reporting rate in samples per second.
///
/// `Hz200` and `Hz300` target a 2 mm stylus tip and switch off palm (NERD)
/// and noise compensation while active. The slower rates suit a finger or a
/// 5.25 mm stylus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleRate {
  Hz10,
  Hz20,
  Hz40,
  Hz60,
  Hz80,
  #[default]
  Hz100,
  Hz200,
  Hz300,
}

impl SampleRate {
  /// Map a rate in Hz; anything unsupported becomes 100.
  pub const fn from_hz(hz: u16) -> Self {
    match hz {
      10 => Self::Hz10,
      20 => Self::Hz20,
      40 => Self::Hz40,
      60 => Self::Hz60,
      80 => Self::Hz80,
      200 => Self::Hz200,
      300 => Self::Hz300,
      _ => Self::Hz100,
    }
  }

  pub const fn hz(self) -> u16 {
    match self {
      Self::Hz10 => 10,
      Self::Hz20 => 20,
      Self::Hz40 => 40,
      Self::Hz60 => 60,
      Self::Hz80 => 80,
      Self::Hz100 => 100,
      Self::Hz200 => 200,
      Self::Hz300 => 300,
    }
  }

  /// Rates above 100 run off the ERA reload timer with compensation disabled.
  pub const fn is_stylus(self) -> bool {
    matches!(self, Self::Hz200 | Self::Hz300)
  }
}

impl From<u16> for SampleRate {
  fn from(hz: u16) -> Self {
    Self::from_hz(hz)
  }
}
