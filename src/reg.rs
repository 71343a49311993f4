/******************************************************************************
 * Refer to the Pinnacle 1CA027 datasheet and GT-AN-090620 application note:  *
 * - https://www.cirque.com/gen2gen3-asic-details                             *
 * ========================================================================== *
 *                    Pinnacle ASIC - Registers & Memory Map                  *
*******************************************************************************/

pub(crate) const I2C_ADDR: u8 = 0x2A;

pub(crate) const FIRMWARE_ID: u8 = 0x07;
pub(crate) const FIRMWARE_VERSION: u8 = 0x3A;

// RAP framing
pub(crate) const READ_BITS: u8 = 0xA0;
pub(crate) const WRITE_BITS: u8 = 0x80;
pub(crate) const READ_FILL: u8 = 0xFB;
pub(crate) const READ_CONTINUE: u8 = 0xFC;

#[allow(dead_code)]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Reg {
  // Identity (0x00..0x01)
  FirmwareId = 0x00,
  FirmwareVersion = 0x01,

  // Status & configuration (0x02..0x0D)
  Status = 0x02,
  SysConfig = 0x03,
  FeedConfig1 = 0x04,
  FeedConfig2 = 0x05,
  FeedConfig3 = 0x06,
  CalConfig1 = 0x07,
  Ps2AuxControl = 0x08,
  SampleRate = 0x09,
  ZIdle = 0x0A,
  ZScaler = 0x0B,
  SleepInterval = 0x0C,
  SleepTimer = 0x0D,

  // AnyMeas result overlaps the packet window by one byte (0x11..0x12)
  AnyMeasResult = 0x11,

  // Packet data (0x12..0x17)
  PacketByte0 = 0x12,
  PacketByte1 = 0x13,
  PacketByte2 = 0x14,
  PacketByte3 = 0x15,
  PacketByte4 = 0x16,
  PacketByte5 = 0x17,

  // Extended register access (0x1B..0x1E)
  EraValue = 0x1B,
  EraAddrHigh = 0x1C,
  EraAddrLow = 0x1D,
  EraControl = 0x1E,

  // Hardware configuration (0x1F)
  HcoId = 0x1F,
}

impl From<Reg> for u8 {
  #[inline]
  fn from(r: Reg) -> Self {
    r as u8
  }
}

/// PS/2 passthrough register used to read back the intellimouse device id.
pub(crate) const PS2_DEVICE_ID: u8 = 0xF2;
pub(crate) const INTELLIMOUSE_KNOCK: [u8; 6] = [0xF3, 0xC8, 0xF3, 0x64, 0xF3, 0x50];
pub(crate) const INTELLIMOUSE_ID: [u8; 2] = [0xF3, 0x03];

// ERA control commands
pub(crate) const ERA_READ: u8 = 0x01;
pub(crate) const ERA_WRITE: u8 = 0x02;
pub(crate) const ERA_READ_SEQUENTIAL: u8 = 0x05;
pub(crate) const ERA_WRITE_SEQUENTIAL: u8 = 0x0A;

/// Addresses reachable only through the ERA handshake.
#[allow(dead_code)]
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Era {
  FingerStylus = 0x00EB,
  XAxisWideZMin = 0x0149,
  YAxisWideZMin = 0x0168,
  AdcGain = 0x0187,
  SampleReloadTimer = 0x019E,
  CalibrationMatrix = 0x01DF,
}

impl From<Era> for u16 {
  #[inline]
  fn from(a: Era) -> Self {
    a as u16
  }
}

pub(crate) const CALIBRATION_CELLS: usize = 46;

// Sample-rate reload timer values
pub(crate) const RELOAD_TIMER_DEFAULT: u8 = 0x13;
pub(crate) const RELOAD_TIMER_200: u8 = 0x09;
pub(crate) const RELOAD_TIMER_300: u8 = 0x06;

pub(crate) const DEFAULT_Z_IDLE: u8 = 30;

/// Settle time after clearing status flags, per Cirque's reference code.
pub(crate) const CLEAR_FLAGS_DELAY_US: u32 = 50;
/// Time for in-flight tracking computations to drain before AnyMeas.
pub(crate) const TRACKING_DRAIN_DELAY_MS: u32 = 10;
