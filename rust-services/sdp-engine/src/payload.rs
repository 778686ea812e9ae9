//! RTP payload sizes for fixed-bitrate codecs
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


use crate::codecs::CodecInfo;
use crate::error::{SdpEngineError, SdpEngineResult};

/// AMR narrowband modes: (centi-kbps, speech bits per 20ms frame)
const AMR_MODES: [(u32, u32); 8] = [
    (475, 95),
    (515, 103),
    (590, 118),
    (670, 134),
    (740, 148),
    (795, 159),
    (1020, 204),
    (1220, 244),
];

/// AMR wideband modes: (centi-kbps, speech bits per 20ms frame)
const AMR_WB_MODES: [(u32, u32); 9] = [
    (660, 132),
    (885, 177),
    (1265, 253),
    (1425, 285),
    (1585, 317),
    (1825, 365),
    (1985, 397),
    (2305, 461),
    (2385, 477),
];

const CN_CLOCK_RATES: [u32; 4] = [8000, 16000, 32000, 48000];

/// Payload bytes produced by one frame of `frame_ms` milliseconds.
///
/// Variable-bitrate and video codecs yield `Ok(0)`: their size depends on
/// the encoder and cannot be derived from the session description.
pub fn compute_payload_size(
    codec: &CodecInfo,
    frame_ms: u32,
    mode_kbps: Option<f64>,
) -> SdpEngineResult<u32> {
    if frame_ms == 0 {
        return Err(invalid_duration(codec, frame_ms, "duration must be positive"));
    }

    let ms = u64::from(frame_ms);
    let channels = u64::from(codec.channels.max(1));

    let bytes: u64 = match codec.name.to_ascii_lowercase().as_str() {
        "pcmu" | "pcma" => whole_samples(codec, frame_ms)? * channels,
        "l16" => whole_samples(codec, frame_ms)? * channels * 2,
        "g722" => 8 * ms * channels,
        // kbit/s divided by 8 gives bytes per ms
        "g726-16" => 2 * ms,
        "g726-24" => 3 * ms,
        "g726-32" => 4 * ms,
        "g726-40" => 5 * ms,
        "dvi4" => {
            let samples = whole_samples(codec, frame_ms)?;
            channels * (4 + samples / 2)
        }
        "g729" => {
            require_multiple(codec, frame_ms, 10)?;
            ms
        }
        "g728" => {
            require_multiple(codec, frame_ms, 5)?;
            2 * ms
        }
        "gsm" => {
            require_multiple(codec, frame_ms, 20)?;
            33 * ms / 20
        }
        "g723" => {
            require_multiple(codec, frame_ms, 30)?;
            let frame_bytes = match mode_centi(mode_kbps) {
                None | Some(630) => 24,
                Some(530) => 20,
                Some(_) => return Err(unsupported_mode(codec, mode_kbps)),
            };
            frame_bytes * ms / 30
        }
        "ilbc" => match mode_centi(mode_kbps) {
            Some(1520) => {
                require_multiple(codec, frame_ms, 20)?;
                38 * ms / 20
            }
            Some(1333) => {
                require_multiple(codec, frame_ms, 30)?;
                50 * ms / 30
            }
            None if frame_ms % 30 == 0 => 50 * ms / 30,
            None if frame_ms % 20 == 0 => 38 * ms / 20,
            None => {
                return Err(invalid_duration(
                    codec,
                    frame_ms,
                    "must be a multiple of 20ms or 30ms",
                ))
            }
            Some(_) => return Err(unsupported_mode(codec, mode_kbps)),
        },
        "amr" => amr_bytes(codec, frame_ms, mode_kbps, &AMR_MODES, 1220)?,
        "amr-wb" => amr_bytes(codec, frame_ms, mode_kbps, &AMR_WB_MODES, 2385)?,
        "cn" => {
            if !CN_CLOCK_RATES.contains(&codec.clock_rate) {
                return Err(SdpEngineError::UnsupportedClockRate {
                    codec: codec.name.to_string(),
                    clock_rate: codec.clock_rate,
                });
            }
            1
        }
        "telephone-event" => 4,
        _ => 0,
    };

    u32::try_from(bytes).map_err(|_| invalid_duration(codec, frame_ms, "payload size overflow"))
}

impl CodecInfo {
    /// See [`compute_payload_size`]
    pub fn payload_size(&self, frame_ms: u32, mode_kbps: Option<f64>) -> SdpEngineResult<u32> {
        compute_payload_size(self, frame_ms, mode_kbps)
    }
}

fn amr_bytes(
    codec: &CodecInfo,
    frame_ms: u32,
    mode_kbps: Option<f64>,
    modes: &[(u32, u32)],
    default_centi: u32,
) -> SdpEngineResult<u64> {
    require_multiple(codec, frame_ms, 20)?;
    let wanted = mode_centi(mode_kbps).unwrap_or(default_centi);
    let bits = modes
        .iter()
        .find(|(centi, _)| *centi == wanted)
        .map(|(_, bits)| *bits)
        .ok_or_else(|| unsupported_mode(codec, mode_kbps))?;
    Ok(u64::from(bits.div_ceil(8)) * u64::from(frame_ms / 20))
}

// Modes compare in hundredths of a kbit/s so 12.2 and 12.20 match.
fn mode_centi(mode_kbps: Option<f64>) -> Option<u32> {
    mode_kbps.map(|kbps| {
        let centi = (kbps * 100.0).round();
        if centi.is_finite() && centi > 0.0 && centi < f64::from(u32::MAX) {
            centi as u32
        } else {
            0
        }
    })
}

/// Samples per channel in one frame; a frame must hold a whole number
fn whole_samples(codec: &CodecInfo, frame_ms: u32) -> SdpEngineResult<u64> {
    let ticks = u64::from(codec.clock_rate) * u64::from(frame_ms);
    if ticks % 1000 != 0 {
        return Err(invalid_duration(
            codec,
            frame_ms,
            "must hold a whole number of samples",
        ));
    }
    Ok(ticks / 1000)
}

fn require_multiple(codec: &CodecInfo, frame_ms: u32, step: u32) -> SdpEngineResult<()> {
    if frame_ms % step == 0 {
        Ok(())
    } else {
        Err(SdpEngineError::InvalidFrameDuration {
            codec: codec.name.to_string(),
            duration_ms: frame_ms,
            reason: match step {
                5 => "must be a multiple of 5ms",
                10 => "must be a multiple of 10ms",
                20 => "must be a multiple of 20ms",
                _ => "must be a multiple of 30ms",
            },
        })
    }
}

fn invalid_duration(codec: &CodecInfo, frame_ms: u32, reason: &'static str) -> SdpEngineError {
    SdpEngineError::InvalidFrameDuration {
        codec: codec.name.to_string(),
        duration_ms: frame_ms,
        reason,
    }
}

fn unsupported_mode(codec: &CodecInfo, mode_kbps: Option<f64>) -> SdpEngineError {
    SdpEngineError::UnsupportedMode {
        codec: codec.name.to_string(),
        mode_kbps: mode_kbps.unwrap_or_default(),
    }
}
