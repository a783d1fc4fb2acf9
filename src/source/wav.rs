use std::path::Path;

use num_complex::Complex;

use super::{Fetch, SampleSource};
use crate::error::{Error, Result};

/// 2-channel WAV recording of baseband I/Q: channel 0 is I, channel 1 is Q.
///
/// Integer formats are normalized to ±1.0. The whole recording is loaded
/// at open time; this source exists for offline decoding, not streaming.
pub struct WavSource {
    samples: Vec<Complex<f32>>,
    pos: usize,
    sample_rate: u32,
}

impl WavSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = hound::WavReader::open(path)?;
        let spec = reader.spec();
        if spec.channels != 2 {
            return Err(Error::Format(format!(
                "expected a 2-channel I/Q WAV, got {} channel(s)",
                spec.channels
            )));
        }

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<std::result::Result<_, _>>()?,
            hound::SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<std::result::Result<_, _>>()?
            }
        };

        let samples = interleaved
            .chunks_exact(2)
            .map(|iq| Complex::new(iq[0], iq[1]))
            .collect();

        Ok(Self {
            samples,
            pos: 0,
            sample_rate: spec.sample_rate,
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl SampleSource for WavSource {
    fn fetch(&mut self, buf: &mut [Complex<f32>]) -> Result<Fetch> {
        if self.pos >= self.samples.len() {
            return Ok(Fetch::End);
        }
        let n = buf.len().min(self.samples.len() - self.pos);
        buf[..n].copy_from_slice(&self.samples[self.pos..self.pos + n]);
        self.pos += n;
        Ok(Fetch::Samples(n))
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
