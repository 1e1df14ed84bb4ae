//! Frame codec configuration.

use crate::config::{ConfigResult, Validate};
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};

/// The wire framing strategy used to split a byte stream into discrete
/// JSON-RPC messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FramingMode {
    /// Each message is terminated by a single delimiter byte (commonly `\n`).
    Delimiter,
    /// Each message is preceded by an LSP-style `Content-Length` header block.
    ContentLength,
}

impl Default for FramingMode {
    fn default() -> Self {
        Self::Delimiter
    }
}

/// Configuration for the stream frame codec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FramingConfig {
    /// Which framing strategy to use.
    pub mode: FramingMode,

    /// The delimiter byte used in `FramingMode::Delimiter` mode.
    pub delimiter_byte: u8,

    /// The maximum size, in bytes, of a single frame (header block and body
    /// combined for `ContentLength` mode). Frames larger than this are
    /// rejected with `ProtocolError::MessageTooLarge`.
    pub max_frame_bytes: usize,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            mode: FramingMode::default(),
            delimiter_byte: b'\n',
            max_frame_bytes: 64 * 1024,
        }
    }
}

impl Validate for FramingConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.max_frame_bytes == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "framing.max_frame_bytes".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}
