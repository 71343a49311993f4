//! Bus transports for the Register Access Protocol.
//!
//! The Pinnacle speaks the same register protocol over SPI and I2C but frames
//! it differently on each bus. [`RegisterInterface`] hides that framing so the
//! driver core only deals in "read N registers from `addr`" and "write N
//! registers from `addr`".
use embedded_hal::i2c::{I2c, SevenBitAddress};
use embedded_hal::spi::SpiDevice;

use crate::reg::{I2C_ADDR, READ_BITS, READ_CONTINUE, READ_FILL, WRITE_BITS};

/// Byte-oriented access to the Pinnacle register file.
pub trait RegisterInterface {
  /// Error produced by the underlying bus.
  type Error;

  /// Read `buf.len()` sequential registers starting at `addr`.
  fn read_registers(&mut self, addr: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

  /// Write `data` to sequential registers starting at `addr`.
  ///
  /// Neither bus writes a multi-byte burst atomically: every register is
  /// addressed on its own, so the device can observe intermediate states.
  fn write_registers(&mut self, addr: u8, data: &[u8]) -> Result<(), Self::Error>;

  /// Send raw, un-framed bytes (used for PS/2 passthrough commands).
  fn write_command(&mut self, cmd: &[u8]) -> Result<(), Self::Error>;
}

// Largest SPI frame clocked per transaction; the first three bytes carry the
// address and latency filler.
const SPI_FRAME: usize = 32;
const SPI_LATENCY: usize = 3;

/// SPI transport (mode 1). Chip select is handled by the [`SpiDevice`].
///
/// Reads use the auto-increment method: the address is sent once, followed by
/// `0xFC` filler and a final `0xFB`; data is valid from byte 3 of the echoed
/// frame. Writes are one `[addr | 0x80, value]` transaction per register as
/// the ASIC does not auto-increment on writes.
pub struct SpiInterface<SPI> {
  spi: SPI,
}

impl<SPI: SpiDevice> SpiInterface<SPI> {
  pub fn new(spi: SPI) -> Self {
    Self { spi }
  }

  /// Give back the underlying SPI device.
  pub fn release(self) -> SPI {
    self.spi
  }
}

impl<SPI: SpiDevice> RegisterInterface for SpiInterface<SPI> {
  type Error = SPI::Error;

  fn read_registers(&mut self, addr: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
    let mut offset = 0u8;
    for chunk in buf.chunks_mut(SPI_FRAME - SPI_LATENCY) {
      let len = chunk.len() + SPI_LATENCY;
      let mut frame = [READ_CONTINUE; SPI_FRAME];
      frame[0] = addr.wrapping_add(offset) | READ_BITS;
      if chunk.len() == 1 {
        frame[1..len].fill(READ_FILL);
      } else {
        frame[len - 1] = READ_FILL;
      }

      self.spi.transfer_in_place(&mut frame[..len])?;
      chunk.copy_from_slice(&frame[SPI_LATENCY..len]);
      offset = offset.wrapping_add(chunk.len() as u8);
    }
    Ok(())
  }

  fn write_registers(&mut self, addr: u8, data: &[u8]) -> Result<(), Self::Error> {
    for (i, value) in data.iter().enumerate() {
      let reg = addr.wrapping_add(i as u8);
      self.spi.write(&[reg | WRITE_BITS, *value])?;
    }
    Ok(())
  }

  fn write_command(&mut self, cmd: &[u8]) -> Result<(), Self::Error> {
    self.spi.write(cmd)
  }
}

// Address/value pairs packed into one I2C write.
const I2C_PAIRS: usize = 16;

/// I2C transport.
///
/// A read sends `[addr | 0xA0]` (terminated by a STOP) and then reads N bytes;
/// the ASIC increments its register pointer per byte read. Writes carry one
/// `[(addr + i) | 0x80, value]` pair per register because the ASIC does not
/// auto-increment on I2C writes.
pub struct I2cInterface<I2C> {
  i2c: I2C,
  address: SevenBitAddress,
}

impl<I2C: I2c<SevenBitAddress>> I2cInterface<I2C> {
  /// Use the factory default slave address `0x2A`.
  pub fn new(i2c: I2C) -> Self {
    Self::with_address(i2c, I2C_ADDR)
  }

  pub fn with_address(i2c: I2C, address: SevenBitAddress) -> Self {
    Self { i2c, address }
  }

  /// Give back the underlying I2C bus.
  pub fn release(self) -> I2C {
    self.i2c
  }
}

impl<I2C: I2c<SevenBitAddress>> RegisterInterface for I2cInterface<I2C> {
  type Error = I2C::Error;

  fn read_registers(&mut self, addr: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
    self.i2c.write(self.address, &[addr | READ_BITS])?;
    self.i2c.read(self.address, buf)
  }

  fn write_registers(&mut self, addr: u8, data: &[u8]) -> Result<(), Self::Error> {
    let mut offset = 0u8;
    for chunk in data.chunks(I2C_PAIRS) {
      let mut frame = [0u8; I2C_PAIRS * 2];
      for (i, value) in chunk.iter().enumerate() {
        frame[i * 2] = addr.wrapping_add(offset).wrapping_add(i as u8) | WRITE_BITS;
        frame[i * 2 + 1] = *value;
      }
      self.i2c.write(self.address, &frame[..chunk.len() * 2])?;
      offset = offset.wrapping_add(chunk.len() as u8);
    }
    Ok(())
  }

  fn write_command(&mut self, cmd: &[u8]) -> Result<(), Self::Error> {
    self.i2c.write(self.address, cmd)
  }
}
