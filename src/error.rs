use std::fmt;
use std::io;

/// Specialized result type for receiver operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type shared by the sample sources and the decode pipeline
#[derive(Debug)]
pub enum Error {
    /// I/O error while reading a recording
    Io(io::Error),

    /// Malformed recording (wrong channel count, bad sample format, ...)
    Format(String),

    /// Invalid or unusable receiver configuration
    Config(String),

    /// WAV parsing error
    Wav(hound::Error),

    /// SoapySDR device error (requires the `soapy` feature)
    #[cfg(feature = "soapy")]
    Soapy(soapysdr::Error),

    /// Anything else (signal handler registration, ...)
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Format(msg) => write!(f, "format error: {}", msg),
            Error::Config(msg) => write!(f, "config error: {}", msg),
            Error::Wav(err) => write!(f, "WAV error: {}", err),
            #[cfg(feature = "soapy")]
            Error::Soapy(err) => write!(f, "SoapySDR error: {}", err),
            Error::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<hound::Error> for Error {
    fn from(err: hound::Error) -> Self {
        Error::Wav(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(feature = "soapy")]
impl From<soapysdr::Error> for Error {
    fn from(err: soapysdr::Error) -> Self {
        Error::Soapy(err)
    }
}
