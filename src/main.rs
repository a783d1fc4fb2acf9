use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use tracing::info;

use clicker_rx::error::{Error, Result};
use clicker_rx::rx::{CancelToken, Receiver, RxConfig, ThresholdMode};
use clicker_rx::source::{IqFileSource, SampleSource, WavSource};
use clicker_rx::utils::logging::init_logging;

#[cfg(feature = "soapy")]
use clicker_rx::source::SoapySource;

/// Decode clicker button presses from complex baseband samples.
#[derive(Parser, Debug)]
#[command(name = "clicker-rx", version)]
struct Args {
    /// I/Q recording to decode; omit for live capture (needs the `soapy`
    /// feature)
    input: Option<PathBuf>,

    /// Treat the input as a 2-channel WAV recording (I left, Q right)
    #[arg(long)]
    wav: bool,

    /// Sample rate of a raw I/Q recording (Hz); WAV recordings carry
    /// their own
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Burst detection power threshold
    #[arg(long)]
    squelch: Option<f32>,

    /// Skip the sync-window measurement and slice against this fixed
    /// discriminator threshold (radians per sample)
    #[arg(long)]
    fixed_threshold: Option<f32>,

    /// Receiver configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// SoapySDR device arguments, e.g. "driver=rtlsdr"
    #[cfg(feature = "soapy")]
    #[arg(long, default_value = "")]
    device: String,
}

fn main() {
    init_logging();
    let args = Args::parse();
    if let Err(err) = run(args) {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => RxConfig::from_json_file(path)?,
        None => RxConfig::default(),
    };
    if let Some(squelch) = args.squelch {
        config.squelch = squelch;
    }
    if let Some(threshold) = args.fixed_threshold {
        config.threshold = ThresholdMode::Fixed(threshold);
    }

    let cancel: CancelToken = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || {
            info!("caught signal, terminating");
            cancel.store(true, Ordering::SeqCst);
        })
        .map_err(|e| Error::Other(format!("could not set signal handler: {}", e)))?;
    }

    match args.input {
        Some(path) if args.wav => {
            let source = WavSource::open(&path)?;
            info!("decoding {} ({} samples)", path.display(), source.len());
            decode(source, config, cancel)
        }
        Some(path) => {
            let rate = args.sample_rate.ok_or_else(|| {
                Error::Config("raw I/Q input needs --sample-rate".into())
            })?;
            let source = IqFileSource::open(&path, rate)?;
            info!("decoding {}", path.display());
            decode(source, config, cancel)
        }
        None => {
            #[cfg(feature = "soapy")]
            {
                let source = SoapySource::open(&args.device)?;
                decode(source, config, cancel)
            }
            #[cfg(not(feature = "soapy"))]
            Err(Error::Config(
                "no input file given; live capture requires building with the `soapy` feature"
                    .into(),
            ))
        }
    }
}

fn decode<S: SampleSource>(source: S, config: RxConfig, cancel: CancelToken) -> Result<()> {
    info!("sample rate {} Hz", source.sample_rate());
    let mut receiver = Receiver::new(source, config, cancel);
    receiver.run(|report| println!("{}", report))
}
