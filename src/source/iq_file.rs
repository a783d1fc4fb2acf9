use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use num_complex::Complex;

use super::{Fetch, SampleSource};
use crate::error::{Error, Result};

/// Raw I/Q recording: interleaved little-endian f32 pairs, I then Q.
///
/// The format carries no header, so the sample rate of the capture must be
/// supplied by the caller.
pub struct IqFileSource {
    reader: BufReader<File>,
    sample_rate: u32,
}

impl IqFileSource {
    pub fn open<P: AsRef<Path>>(path: P, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::Config("sample rate must be nonzero".into()));
        }
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            sample_rate,
        })
    }
}

impl SampleSource for IqFileSource {
    fn fetch(&mut self, buf: &mut [Complex<f32>]) -> Result<Fetch> {
        let mut n = 0;
        while n < buf.len() {
            let re = match self.reader.read_f32::<LittleEndian>() {
                Ok(v) => v,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e.into()),
            };
            let im = match self.reader.read_f32::<LittleEndian>() {
                Ok(v) => v,
                // a trailing lone I value means a truncated capture
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e.into()),
            };
            buf[n] = Complex::new(re, im);
            n += 1;
        }
        if n == 0 {
            Ok(Fetch::End)
        } else {
            Ok(Fetch::Samples(n))
        }
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;
    use std::io::Write;

    fn write_iq(path: &Path, samples: &[Complex<f32>]) {
        let mut file = File::create(path).unwrap();
        for s in samples {
            file.write_f32::<LittleEndian>(s.re).unwrap();
            file.write_f32::<LittleEndian>(s.im).unwrap();
        }
        file.flush().unwrap();
    }

    #[test]
    fn reads_interleaved_pairs_until_eof() {
        let path = std::env::temp_dir().join("clicker_rx_iq_file_test.iq");
        let samples = vec![
            Complex::new(0.25, -0.5),
            Complex::new(1.0, 0.0),
            Complex::new(-0.125, 0.75),
        ];
        write_iq(&path, &samples);

        let mut source = IqFileSource::open(&path, 1_500_000).unwrap();
        assert_eq!(source.sample_rate(), 1_500_000);

        let mut buf = [Complex::default(); 8];
        assert_eq!(source.fetch(&mut buf).unwrap(), Fetch::Samples(3));
        assert_eq!(&buf[..3], &samples[..]);
        assert_eq!(source.fetch(&mut buf).unwrap(), Fetch::End);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn rejects_zero_sample_rate() {
        let path = std::env::temp_dir().join("clicker_rx_iq_file_rate_test.iq");
        write_iq(&path, &[]);
        assert!(IqFileSource::open(&path, 0).is_err());
        std::fs::remove_file(&path).ok();
    }
}
