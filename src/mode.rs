use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::control::{FeedConfig1, FeedConfig2};
use crate::{
  AbsoluteConfig, AnyMeasConfig, Calibration, Error, Pinnacle, Reg, RegisterInterface, RelativeConfig, SampleRate,
  DEFAULT_Z_IDLE, INTELLIMOUSE_ID, INTELLIMOUSE_KNOCK, PS2_DEVICE_ID, TRACKING_DRAIN_DELAY_MS,
};

/// Operating mode of the ASIC. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Mode {
  /// Mouse-style deltas, buttons and optional scroll.
  #[default]
  Relative = 0,
  /// Raw ADC measurements with tracking disabled.
  AnyMeas = 1,
  /// Absolute x/y position and z (touch strength).
  Absolute = 2,
}

impl Mode {
  pub const fn into_bits(self) -> u8 {
    self as _
  }

  pub const fn from_bits(bits: u8) -> Option<Self> {
    match bits {
      0 => Some(Self::Relative),
      1 => Some(Self::AnyMeas),
      2 => Some(Self::Absolute),
      _ => None,
    }
  }

  const fn feed(self) -> FeedConfig1 {
    FeedConfig1::new().with_feed_enable(true).with_absolute(matches!(self, Self::Absolute))
  }
}

impl TryFrom<u8> for Mode {
  type Error = u8;

  fn try_from(bits: u8) -> Result<Self, Self::Error> {
    Self::from_bits(bits).ok_or(bits)
  }
}

impl<IF, E, DR, D> Pinnacle<IF, DR, D>
where
  IF: RegisterInterface<Error = E>,
  DR: InputPin,
  D: DelayNs,
{
  pub fn mode(&self) -> Mode {
    self.mode
  }

  /// Switch the operating mode.
  ///
  /// - Relative and Absolute only differ in one FeedConfig1 bit.
  /// - Entering AnyMeas needs a data-ready pin; tracking is stopped, the driver
  ///   waits 10 ms for in-flight computations and then applies the default
  ///   [`AnyMeasConfig`].
  /// - Leaving AnyMeas restores all compensations, 30 z-idle packets and
  ///   100 samples per second. Earlier relative/absolute settings are lost.
  ///
  /// The intellimouse state is forgotten on every switch.
  pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error<E>> {
    match mode {
      Mode::AnyMeas => {
        if self.dr.is_none() {
          return Err(Error::DataReadyRequired);
        }
        self.modify_sys_config(|sys| *sys = sys.tracking().with_anymeas(true))?;
        self.delay.delay_ms(TRACKING_DRAIN_DELAY_MS);
        self.mode = mode;
        self.intellimouse = false;
        self.anymeas_mode_config(AnyMeasConfig::default())?;
      }
      Mode::Relative | Mode::Absolute if self.mode == Mode::AnyMeas => {
        let sys = self.sys_config()?.tracking();
        self.write_reg(Reg::CalConfig1, Calibration::new().configure_only().register().into_bits())?;
        self.write_reg(Reg::ZIdle, DEFAULT_Z_IDLE)?;
        self.write_sample_rate(SampleRate::Hz100)?;
        // Taps stay off until relative_mode_config says otherwise.
        let feed2 = FeedConfig2::new().with_taps_disable(true);
        self.write_regs(Reg::SysConfig, &[sys.into_bits(), mode.feed().into_bits(), feed2.into_bits()])?;
        // Still AnyMeas until tracking is back on.
        self.mode = mode;
        self.intellimouse = false;
      }
      Mode::Relative | Mode::Absolute => {
        self.mode = mode;
        self.intellimouse = false;
        self.write_reg(Reg::FeedConfig1, mode.feed().into_bits())?;
      }
    }
    info!("Pinnacle: mode {:?}", mode);
    Ok(())
  }

  /// [`set_mode`](Self::set_mode) from a raw value (0 relative, 1 AnyMeas,
  /// 2 absolute). Anything else fails before touching the bus.
  pub fn set_mode_bits(&mut self, bits: u8) -> Result<(), Error<E>> {
    let mode = Mode::try_from(bits).map_err(Error::InvalidMode)?;
    self.set_mode(mode)
  }

  /// Whether relative reports carry a scroll byte.
  ///
  /// Only `true` after [`relative_mode_config`](Self::relative_mode_config)
  /// asked for intellimouse and the ASIC confirmed it.
  pub fn intellimouse(&self) -> bool {
    self.intellimouse
  }

  /// Apply relative mode settings. Silently ignored in any other mode.
  pub fn relative_mode_config(&mut self, config: RelativeConfig) -> Result<(), Error<E>> {
    if self.mode != Mode::Relative {
      return Ok(());
    }

    let feed2 = FeedConfig2::new()
      .with_intellimouse(config.intellimouse)
      .with_taps_disable(!config.taps)
      .with_secondary_tap_disable(!config.secondary_tap)
      .with_glide_extend_disable(!config.glide_extend)
      .with_swap_xy(config.rotate90);
    self.write_reg(Reg::FeedConfig2, feed2.into_bits())?;

    self.intellimouse = config.intellimouse && self.knock_intellimouse()?;
    debug!("Pinnacle: intellimouse {}", self.intellimouse);
    Ok(())
  }

  // PS/2 sample-rate knock, then check the reported device id.
  fn knock_intellimouse(&mut self) -> Result<bool, Error<E>> {
    self.iface.write_command(&INTELLIMOUSE_KNOCK).map_err(Error::Bus)?;
    let mut id = [0u8; 3];
    self.iface.read_registers(PS2_DEVICE_ID, &mut id).map_err(Error::Bus)?;
    Ok(id.starts_with(&INTELLIMOUSE_ID))
  }

  /// Apply absolute mode settings. Silently ignored in any other mode.
  pub fn absolute_mode_config(&mut self, config: AbsoluteConfig) -> Result<(), Error<E>> {
    if self.mode != Mode::Absolute {
      return Ok(());
    }

    self.write_reg(Reg::ZIdle, config.z_idle_count)?;
    self.modify_feed_config1(|feed| {
      feed.set_invert_x(config.invert_x);
      feed.set_invert_y(config.invert_y);
    })
  }
}
