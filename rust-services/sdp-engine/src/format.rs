//! Payload format of a media flow (rtpmap, fmtp and rtcp-fb lines)
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


use serde::{Deserialize, Serialize};
use std::fmt;

use crate::codecs::{CodecInfo, COMFORT_NOISE, RFC4733};

/// One payload format; the payload type is unique within its media flow
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Format {
    /// RTP payload type
    pub payload: u8,
    /// Encoding name
    pub name: String,
    /// Clock rate (Hz)
    pub clock_rate: u32,
    /// Channel count; 0 when not given
    pub channels: u16,
    /// rtcp-fb values
    pub feedback: Vec<String>,
    /// fmtp values
    pub params: Vec<String>,
}

impl Format {
    pub fn new(payload: u8, name: impl Into<String>, clock_rate: u32, channels: u16) -> Self {
        Format {
            payload,
            name: name.into(),
            clock_rate,
            channels,
            feedback: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Format carrying the static properties of a known codec
    pub fn from_codec(codec: &CodecInfo) -> Self {
        Format::new(codec.payload_type, codec.name, codec.clock_rate, codec.channels)
    }

    pub fn lower_name(&self) -> String {
        self.name.to_ascii_lowercase()
    }

    /// RFC 4733 telephone-event
    pub fn is_dtmf(&self) -> bool {
        self.name.eq_ignore_ascii_case(RFC4733)
    }

    /// RFC 3389 comfort noise
    pub fn is_comfort_noise(&self) -> bool {
        self.name.eq_ignore_ascii_case(COMFORT_NOISE)
    }

    /// Anything that is neither DTMF nor comfort noise
    pub fn is_audio_format(&self) -> bool {
        !self.is_dtmf() && !self.is_comfort_noise()
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
