use embedded_hal::digital::{self, OutputPin};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::spi::SpiBus;

use crate::config::Timing;
use crate::error::Error;

/// Inter-byte timing of a frame.
///
/// The lead gap after asserting the strobe is always short. What follows
/// each byte depends on the kind of frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameProfile {
    /// Long gaps between bytes, short gap after the last one.
    Command,
    /// Long gaps after the three sensor probes, short gaps after the
    /// battery probe and the two re-reads.
    SensorPoll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Gap {
    Short,
    Long,
}

impl FrameProfile {
    pub(crate) fn gap_after(self, index: usize, len: usize) -> Gap {
        match self {
            Self::Command if index + 1 == len => Gap::Short,
            Self::Command => Gap::Long,
            Self::SensorPoll if index < 3 => Gap::Long,
            Self::SensorPoll => Gap::Short,
        }
    }
}

/// Framed duplex byte exchange over the board bus.
pub struct Transport<SPI, CS, D> {
    spi: SPI,
    strobe: CS,
    delay: D,
    timing: Timing,
}

impl<SPI, CS, D> Transport<SPI, CS, D>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    D: DelayNs,
{
    pub fn new(spi: SPI, strobe: CS, delay: D, timing: Timing) -> Self {
        Self { spi, strobe, delay, timing }
    }

    /// Give the board its power-up time and park the strobe high.
    pub async fn power_on(&mut self) -> Result<(), Error<SPI::Error>> {
        self.delay.delay_ms(self.timing.power_on_ms).await;
        self.strobe.set_high().map_err(strobe_error)
    }

    /// Clock `tx` out inside one strobe frame and return what came back.
    ///
    /// A bus error aborts the frame; the strobe is still released before the
    /// error is returned.
    pub async fn transact<const N: usize>(
        &mut self,
        profile: FrameProfile,
        tx: [u8; N],
    ) -> Result<[u8; N], Error<SPI::Error>> {
        let mut buf = tx;

        self.delay.delay_us(self.timing.frame_settle_us).await;
        self.strobe.set_low().map_err(strobe_error)?;

        let exchanged = self.exchange(profile, &mut buf).await;
        let released = self.strobe.set_high().map_err(strobe_error);
        exchanged?;
        released?;

        Ok(buf)
    }

    async fn exchange(
        &mut self,
        profile: FrameProfile,
        buf: &mut [u8],
    ) -> Result<(), Error<SPI::Error>> {
        self.delay.delay_us(self.timing.short_gap_us).await;

        let len = buf.len();
        for index in 0..len {
            self.spi
                .transfer_in_place(&mut buf[index..=index])
                .await
                .map_err(Error::Spi)?;
            self.spi.flush().await.map_err(Error::Spi)?;

            let gap_us = match profile.gap_after(index, len) {
                Gap::Short => self.timing.short_gap_us,
                Gap::Long => self.timing.long_gap_us,
            };
            self.delay.delay_us(gap_us).await;
        }
        Ok(())
    }

    pub fn release(self) -> (SPI, CS, D) {
        (self.spi, self.strobe, self.delay)
    }
}

fn strobe_error<E: digital::Error, SpiE>(err: E) -> Error<SpiE> {
    Error::Strobe(err.kind())
}
