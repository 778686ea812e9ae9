//! Codec knowledge base
//!
//! Static RTP payload-type table (RFC 3551 statics plus the conventional
//! dynamic assignments used by this engine). The table is immutable and
//! indexed lazily on first use, so lookups are safe from any thread.
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


use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// RFC 4733 DTMF payload name
pub const RFC4733: &str = "telephone-event";

/// RFC 3389 comfort noise payload name
pub const COMFORT_NOISE: &str = "CN";

pub const PT_PCMU: u8 = 0;
pub const PT_GSM: u8 = 3;
pub const PT_G723: u8 = 4;
pub const PT_DVI4_8000: u8 = 5;
pub const PT_DVI4_16000: u8 = 6;
pub const PT_LPC: u8 = 7;
pub const PT_PCMA: u8 = 8;
pub const PT_G722: u8 = 9;
pub const PT_L16_STEREO: u8 = 10;
pub const PT_L16_MONO: u8 = 11;
pub const PT_QCELP: u8 = 12;
pub const PT_CN: u8 = 13;
pub const PT_MPA: u8 = 14;
pub const PT_G728: u8 = 15;
pub const PT_DVI4_11025: u8 = 16;
pub const PT_DVI4_22050: u8 = 17;
pub const PT_G729: u8 = 18;
pub const PT_CELB: u8 = 25;
pub const PT_JPEG: u8 = 26;
pub const PT_NV: u8 = 28;
pub const PT_H261: u8 = 31;
pub const PT_MPV: u8 = 32;
pub const PT_MP2T: u8 = 33;
pub const PT_H263: u8 = 34;
pub const PT_OPUS: u8 = 96;
pub const PT_AMR: u8 = 97;
pub const PT_ILBC: u8 = 98;
pub const PT_G726_32: u8 = 99;
pub const PT_AMR_WB: u8 = 100;
pub const PT_TELEPHONE_EVENT: u8 = 101;
pub const PT_VP8: u8 = 102;
pub const PT_H264: u8 = 103;
pub const PT_VP9: u8 = 104;
pub const PT_H265: u8 = 105;
pub const PT_AV1: u8 = 106;
pub const PT_AAC: u8 = 107;

/// Default audio offer set, in preference order
pub const SUPPORTED_CODECS: [u8; 5] = [PT_PCMA, PT_PCMU, PT_G722, PT_G729, PT_OPUS];

/// Names of [`SUPPORTED_CODECS`], same order
pub const SUPPORTED_CODEC_NAMES: [&str; 5] = ["PCMA", "PCMU", "G722", "G729", "opus"];

/// Coarse use of a payload format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaUse {
    Audio,
    Video,
    Dtmf,
    ComfortNoise,
}

/// Coding technique, for classification only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CodingFamily {
    /// Sample-domain coding (PCM, ADPCM)
    Waveform,
    /// Code-excited linear prediction
    Celp,
    /// Parametric vocoder
    Vocoder,
    /// Transform/perceptual coding
    Transform,
    /// Mixed linear-prediction and transform coding
    Hybrid,
    /// Video, DTMF, noise and the rest
    Other,
}

/// Static properties of one payload format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CodecInfo {
    /// RTP payload type
    pub payload_type: u8,
    /// Canonical encoding name as used in a=rtpmap
    pub name: &'static str,
    /// RTP clock rate (Hz)
    pub clock_rate: u32,
    /// Audio channels; 0 for video
    pub channels: u16,
    /// Coarse use
    pub media_use: MediaUse,
    /// Coding family
    pub family: CodingFamily,
}

impl CodecInfo {
    const fn new(
        payload_type: u8,
        name: &'static str,
        clock_rate: u32,
        channels: u16,
        media_use: MediaUse,
        family: CodingFamily,
    ) -> Self {
        CodecInfo {
            payload_type,
            name,
            clock_rate,
            channels,
            media_use,
            family,
        }
    }

    /// Whether the payload type is in the RFC 3551 static range
    pub fn is_static(&self) -> bool {
        self.payload_type < 96
    }
}

use CodingFamily::*;
use MediaUse::{Audio as A, ComfortNoise as Cn, Dtmf as D, Video as V};

static CODEC_TABLE: &[CodecInfo] = &[
    CodecInfo::new(PT_PCMU, "PCMU", 8000, 1, A, Waveform),
    CodecInfo::new(PT_GSM, "GSM", 8000, 1, A, Celp),
    CodecInfo::new(PT_G723, "G723", 8000, 1, A, Celp),
    CodecInfo::new(PT_DVI4_8000, "DVI4", 8000, 1, A, Waveform),
    CodecInfo::new(PT_DVI4_16000, "DVI4", 16000, 1, A, Waveform),
    CodecInfo::new(PT_LPC, "LPC", 8000, 1, A, Vocoder),
    CodecInfo::new(PT_PCMA, "PCMA", 8000, 1, A, Waveform),
    CodecInfo::new(PT_G722, "G722", 8000, 1, A, Waveform),
    CodecInfo::new(PT_L16_STEREO, "L16", 44100, 2, A, Waveform),
    CodecInfo::new(PT_L16_MONO, "L16", 44100, 1, A, Waveform),
    CodecInfo::new(PT_QCELP, "QCELP", 8000, 1, A, Celp),
    CodecInfo::new(PT_CN, COMFORT_NOISE, 8000, 1, Cn, Other),
    CodecInfo::new(PT_MPA, "MPA", 90000, 2, A, Transform),
    CodecInfo::new(PT_G728, "G728", 8000, 1, A, Celp),
    CodecInfo::new(PT_DVI4_11025, "DVI4", 11025, 1, A, Waveform),
    CodecInfo::new(PT_DVI4_22050, "DVI4", 22050, 1, A, Waveform),
    CodecInfo::new(PT_G729, "G729", 8000, 1, A, Celp),
    CodecInfo::new(PT_CELB, "CelB", 90000, 0, V, Other),
    CodecInfo::new(PT_JPEG, "JPEG", 90000, 0, V, Other),
    CodecInfo::new(PT_NV, "nv", 90000, 0, V, Other),
    CodecInfo::new(PT_H261, "H261", 90000, 0, V, Other),
    CodecInfo::new(PT_MPV, "MPV", 90000, 0, V, Other),
    CodecInfo::new(PT_MP2T, "MP2T", 90000, 0, V, Other),
    CodecInfo::new(PT_H263, "H263", 90000, 0, V, Other),
    CodecInfo::new(PT_OPUS, "opus", 48000, 2, A, Hybrid),
    CodecInfo::new(PT_AMR, "AMR", 8000, 1, A, Celp),
    CodecInfo::new(PT_ILBC, "iLBC", 8000, 1, A, Celp),
    CodecInfo::new(PT_G726_32, "G726-32", 8000, 1, A, Waveform),
    CodecInfo::new(PT_AMR_WB, "AMR-WB", 16000, 1, A, Celp),
    CodecInfo::new(PT_TELEPHONE_EVENT, RFC4733, 8000, 1, D, Other),
    CodecInfo::new(PT_VP8, "VP8", 90000, 0, V, Other),
    CodecInfo::new(PT_H264, "H264", 90000, 0, V, Other),
    CodecInfo::new(PT_VP9, "VP9", 90000, 0, V, Other),
    CodecInfo::new(PT_H265, "H265", 90000, 0, V, Other),
    CodecInfo::new(PT_AV1, "AV1", 90000, 0, V, Other),
    CodecInfo::new(PT_AAC, "AAC", 48000, 2, A, Transform),
];

static BY_PAYLOAD: Lazy<HashMap<u8, &'static CodecInfo>> =
    Lazy::new(|| CODEC_TABLE.iter().map(|c| (c.payload_type, c)).collect());

// Lowest payload type wins when a name is listed more than once (DVI4, L16).
static BY_NAME: Lazy<HashMap<String, &'static CodecInfo>> = Lazy::new(|| {
    let mut index: HashMap<String, &'static CodecInfo> = HashMap::new();
    for codec in CODEC_TABLE {
        index
            .entry(codec.name.to_ascii_lowercase())
            .and_modify(|existing| {
                if codec.payload_type < existing.payload_type {
                    *existing = codec;
                }
            })
            .or_insert(codec);
    }
    index
});

/// All known codecs, in payload-type order
pub fn known_codecs() -> &'static [CodecInfo] {
    CODEC_TABLE
}

/// Look up a codec by payload type
pub fn describe_codec(payload_type: u8) -> Option<&'static CodecInfo> {
    BY_PAYLOAD.get(&payload_type).copied()
}

/// Look up a codec by encoding name (case-insensitive)
pub fn describe_codec_by_name(name: &str) -> Option<&'static CodecInfo> {
    BY_NAME.get(&name.to_ascii_lowercase()).copied()
}

/// Canonical name of a payload type, or "Unknown"
pub fn codec_name(payload_type: u8) -> &'static str {
    describe_codec(payload_type).map_or("Unknown", |c| c.name)
}

/// Canonical names for a list of payload types
pub fn codec_names(payload_types: &[u8]) -> Vec<&'static str> {
    payload_types.iter().map(|pt| codec_name(*pt)).collect()
}

/// Resolve an encoding name to its payload type and media use
pub fn identify_payload_type_by_name(name: &str) -> Option<(u8, MediaUse)> {
    describe_codec_by_name(name).map(|c| (c.payload_type, c.media_use))
}
