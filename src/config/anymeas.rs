use bitfield_struct::bitfield;

/// AnyMeas ADC gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Gain {
  /// ~100 %
  X100 = 0xC0,
  /// ~133 %
  X133 = 0x80,
  /// ~166 %
  X166 = 0x40,
  /// ~200 %
  #[default]
  X200 = 0x00,
}

/// AnyMeas measurement frequency, quoted for a 500 ns aperture.
///
/// Wider apertures lower the effective frequency and narrower ones raise it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Frequency {
  /// ~500 kHz
  #[default]
  F0 = 0x02,
  /// ~444 kHz
  F1 = 0x03,
  /// ~400 kHz
  F2 = 0x04,
  /// ~363 kHz
  F3 = 0x05,
  /// ~333 kHz
  F4 = 0x06,
  /// ~308 kHz
  F5 = 0x07,
  /// ~267 kHz
  F6 = 0x09,
  /// ~235 kHz
  F7 = 0x0B,
}

/// Sense lines and reference capacitors used by an AnyMeas measurement.
///
/// The reference capacitors also need their bits (28 for `ref0`, 29 for
/// `ref1`) set in both masks passed to [`Pinnacle::measure_adc`].
///
/// [`Pinnacle::measure_adc`]: crate::Pinnacle::measure_adc
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mux {
  pub npn: bool,
  __: bool,
  pub pnp: bool,
  /// Builtin ~0.25 pF capacitor.
  pub ref0: bool,
  /// Builtin ~0.5 pF capacitor.
  pub ref1: bool,
  #[bits(3)]
  ___: u8,
}

/// Number of measurements per trigger and what happens afterwards.
///
/// `count` holds 6 bits; `with_count` panics above 63. Use
/// [`AnyMeasConfig::with_control_bits`] to pass the raw register byte.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MeasureControl {
  #[bits(6)]
  pub count: u8,
  /// Sleep after the measurements (waking takes ~300 ms).
  pub power_idle: bool,
  /// Needed for more than one measurement.
  pub repeat: bool,
}

/// AnyMeas settings, see [`Pinnacle::anymeas_mode_config`].
///
/// [`Pinnacle::anymeas_mode_config`]: crate::Pinnacle::anymeas_mode_config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnyMeasConfig {
  pub gain: Gain,
  pub frequency: Frequency,
  /// Measurement bit length: 128, 256 or 512.
  pub sample_length: u16,
  pub mux: Mux,
  /// Aperture in nanoseconds, a multiple of 125 within 250..=1875.
  pub aperture_width: u16,
  pub control: MeasureControl,
}

impl AnyMeasConfig {
  pub const fn new() -> Self {
    Self {
      gain: Gain::X200,
      frequency: Frequency::F0,
      sample_length: 512,
      mux: Mux::new().with_pnp(true),
      aperture_width: 500,
      control: MeasureControl::new().with_count(1),
    }
  }

  pub const fn with_gain(mut self, gain: Gain) -> Self {
    self.gain = gain;
    self
  }

  pub const fn with_frequency(mut self, frequency: Frequency) -> Self {
    self.frequency = frequency;
    self
  }

  pub const fn with_sample_length(mut self, bits: u16) -> Self {
    self.sample_length = bits;
    self
  }

  pub const fn with_mux(mut self, mux: Mux) -> Self {
    self.mux = mux;
    self
  }

  pub const fn with_aperture_width(mut self, ns: u16) -> Self {
    self.aperture_width = ns;
    self
  }

  pub const fn with_control(mut self, control: MeasureControl) -> Self {
    self.control = control;
    self
  }

  /// Raw measurement control byte: count in bits 0..6, `power_idle` in bit
  /// 6, `repeat` in bit 7. Any value is accepted.
  pub const fn with_control_bits(mut self, bits: u8) -> Self {
    self.control = MeasureControl::from_bits(bits);
    self
  }

  /// Register image for FeedConfig2 onwards (0x05..0x0E).
  ///
  /// Sample length and aperture are clamped to what the ASIC accepts.
  pub(crate) fn block(&self) -> [u8; 10] {
    let length = (self.sample_length / 128).clamp(1, 3) as u8;
    let aperture = (self.aperture_width / 125).clamp(2, 15) as u8;
    [
      self.gain as u8 | self.frequency as u8,
      length,
      self.mux.into_bits(),
      0,
      aperture,
      0,
      crate::reg::Reg::PacketByte1 as u8,
      0,
      0,
      self.control.into_bits(),
    ]
  }
}

impl Default for AnyMeasConfig {
  fn default() -> Self {
    Self::new()
  }
}
