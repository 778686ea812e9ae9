//! Error types for the SDP negotiation engine
// Copyright 2025 Francisco F. Pinochet
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use thiserror::Error;

use crate::direction::Direction;

/// Result type for engine operations
pub type SdpEngineResult<T> = Result<T, SdpEngineError>;

/// Errors that can occur in the engine
#[derive(Error, Debug)]
pub enum SdpEngineError {
    /// The external parser rejected the session text
    #[error("SDP parse error: {0}")]
    Parse(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A session carries more than one flow of the same media type
    #[error("duplicate media type [{media_type}] in source session - not supported")]
    DuplicateMediaType { media_type: String },

    /// Frame duration not representable by the codec framing
    #[error("invalid frame duration for {codec}: {duration_ms}ms ({reason})")]
    InvalidFrameDuration {
        codec: String,
        duration_ms: u32,
        reason: &'static str,
    },

    /// Codec mode (bitrate) not defined for the codec
    #[error("unsupported mode for {codec}: {mode_kbps} kbit/s")]
    UnsupportedMode { codec: String, mode_kbps: f64 },

    /// Clock rate not defined for the codec
    #[error("unsupported clock rate for {codec}: {clock_rate}Hz")]
    UnsupportedClockRate { codec: String, clock_rate: u32 },

    /// Codec missing from the knowledge base
    #[error("unknown codec information with {0}")]
    UnknownCodec(String),

    /// Session has no flow of the requested type
    #[error("media flow not found: {media_type}")]
    MediaFlowNotFound { media_type: String },

    /// Neither media nor session level carry a usable address
    #[error("no usable address for media flow {media_type}")]
    NoUsableAddress { media_type: String },

    /// Address resolver failure
    #[error("address resolution error: {0}")]
    AddressResolution(String),

    /// Hold/resume requested from a direction that cannot express it
    #[error("cannot {action} from direction {from}")]
    InvalidDirectionTransition {
        from: Direction,
        action: &'static str,
    },

    /// Answer generation could not proceed
    #[error("cannot build answer: {0}")]
    AnswerRejected(String),
}

impl From<std::io::Error> for SdpEngineError {
    fn from(err: std::io::Error) -> Self {
        SdpEngineError::AddressResolution(err.to_string())
    }
}
