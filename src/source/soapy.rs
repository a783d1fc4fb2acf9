use num_complex::Complex;
use soapysdr::Direction;
use tracing::info;

use super::{Fetch, SampleSource};
use crate::error::{Error, Result};
use crate::utils::consts::{BANDWIDTH_HZ, FETCH_TIMEOUT_US, FREQUENCY_HZ};

/// Live capture through SoapySDR (requires the `soapy` feature).
///
/// Device setup follows the clicker channel plan: tune to 917 MHz, set the
/// design bandwidth, enable hardware AGC, and pick the smallest sample
/// rate the device supports above that bandwidth.
pub struct SoapySource {
    stream: soapysdr::RxStream<Complex<f32>>,
    sample_rate: u32,
}

impl SoapySource {
    /// Open a device by SoapySDR args string, e.g. `"driver=rtlsdr"`.
    /// An empty string picks the first available device.
    pub fn open(args: &str) -> Result<Self> {
        let device = soapysdr::Device::new(args)?;

        let mut rate = f64::INFINITY;
        for range in device.get_sample_rate_range(Direction::Rx, 0)? {
            let candidate = range.minimum.max(BANDWIDTH_HZ);
            if candidate <= range.maximum && candidate < rate {
                rate = candidate;
            }
        }
        if !rate.is_finite() {
            return Err(Error::Config(format!(
                "no sample rate above {} Hz supported by the device",
                BANDWIDTH_HZ
            )));
        }

        device.set_sample_rate(Direction::Rx, 0, rate)?;
        device.set_frequency(Direction::Rx, 0, FREQUENCY_HZ, ())?;
        device.set_bandwidth(Direction::Rx, 0, BANDWIDTH_HZ)?;
        device.set_gain_mode(Direction::Rx, 0, true)?;

        let mut stream = device.rx_stream::<Complex<f32>>(&[0])?;
        stream.activate(None)?;

        info!(
            "SoapySDR streaming at {} Hz, tuned to {} MHz",
            rate,
            FREQUENCY_HZ / 1e6
        );

        Ok(Self {
            stream,
            sample_rate: rate as u32,
        })
    }
}

impl SampleSource for SoapySource {
    fn fetch(&mut self, buf: &mut [Complex<f32>]) -> Result<Fetch> {
        match self.stream.read(&mut [buf], FETCH_TIMEOUT_US) {
            Ok(0) => Ok(Fetch::TimedOut),
            Ok(n) => Ok(Fetch::Samples(n)),
            Err(e)
                if e.code == soapysdr::ErrorCode::Timeout
                    || e.code == soapysdr::ErrorCode::Overflow =>
            {
                Ok(Fetch::TimedOut)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl Drop for SoapySource {
    fn drop(&mut self) {
        let _ = self.stream.deactivate(None);
    }
}
