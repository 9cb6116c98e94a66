use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, covering all errors this library can return.
///
/// Open-time failures (anything that prevents a binary from being bound to an
/// extractor) are fatal and surfaced through these variants. Per-row anomalies
/// during extraction are absorbed locally and never become an [`Error`] — a
/// malformed table row skips that row, not the file.
#[derive(Error, Debug)]
pub enum Error {
    /// The file is damaged and could not be parsed.
    ///
    /// The error records the source location where the malformation was
    /// detected, for debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing the file.
    #[error("Out of bound read would have occurred!")]
    OutOfBounds,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// The requested operation needs function-level disassembly, which a
    /// file-level extractor does not provide.
    #[error("Operation not supported by a file-level extractor - {0}")]
    Unsupported(&'static str),

    /// An error occurred while interacting with the filesystem.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// PE parsing error from the goblin crate.
    #[error("{0}")]
    GoblinErr(#[from] goblin::error::Error),
}

/// `Result<T, Error>` alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_macro_records_location() {
        let error = malformed_error!("bad value - {}", 42);
        match error {
            Error::Malformed { message, file, .. } => {
                assert_eq!(message, "bad value - 42");
                assert!(file.ends_with("error.rs"));
            }
            _ => panic!("expected Malformed"),
        }
    }

    #[test]
    fn unsupported_display() {
        let error = Error::Unsupported("functions");
        assert!(error.to_string().contains("functions"));
    }
}
