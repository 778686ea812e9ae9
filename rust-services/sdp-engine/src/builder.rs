//! Local session construction
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


use tracing::debug;

use crate::codecs::{describe_codec, describe_codec_by_name, CodecInfo, MediaUse};
use crate::direction::Direction;
use crate::error::{SdpEngineError, SdpEngineResult};
use crate::flows::DEFAULT_PTIME_MS;
use crate::format::Format;
use crate::media::Media;
use crate::session::{proto, Attribute, Connection, MediaType, Origin, Session, Timing};

/// Event range advertised for telephone-event formats
pub const DEFAULT_DTMF_EVENTS: &str = "0-16";

/// Format for a known payload type; telephone-event gets the default
/// event range
pub fn build_format(payload_type: u8) -> SdpEngineResult<Format> {
    let codec = describe_codec(payload_type).ok_or_else(|| {
        SdpEngineError::UnknownCodec(format!("payload {}", payload_type))
    })?;
    Ok(format_for(codec, DEFAULT_DTMF_EVENTS))
}

/// Format for a known encoding name (case-insensitive)
pub fn build_format_by_name(name: &str) -> SdpEngineResult<Format> {
    let codec = describe_codec_by_name(name)
        .ok_or_else(|| SdpEngineError::UnknownCodec(format!("name {}", name)))?;
    Ok(format_for(codec, DEFAULT_DTMF_EVENTS))
}

fn format_for(codec: &CodecInfo, dtmf_events: &str) -> Format {
    let mut format = Format::from_codec(codec);
    if codec.media_use == MediaUse::Dtmf {
        format.params.push(dtmf_events.to_string());
    }
    format
}

/// Builder for a one-audio-flow local session
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    session_id: u64,
    session_version: u64,
    ipv4: String,
    name: String,
    ssrc: Option<String>,
    direction: Direction,
    port: u16,
    codecs: Vec<u8>,
    ptime_ms: u32,
    dtmf_events: String,
}

impl SessionBuilder {
    /// Session answering on `ipv4:port`; no codecs until [`Self::codecs`]
    pub fn new(ipv4: impl Into<String>, port: u16) -> Self {
        SessionBuilder {
            session_id: 0,
            session_version: 0,
            ipv4: ipv4.into(),
            name: "-".to_string(),
            ssrc: None,
            direction: Direction::Unspecified,
            port,
            codecs: Vec::new(),
            ptime_ms: DEFAULT_PTIME_MS,
            dtmf_events: DEFAULT_DTMF_EVENTS.to_string(),
        }
    }

    pub fn session_id(mut self, session_id: u64) -> Self {
        self.session_id = session_id;
        self
    }

    pub fn session_version(mut self, session_version: u64) -> Self {
        self.session_version = session_version;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Value of the a=ssrc attribute
    pub fn ssrc(mut self, ssrc: impl Into<String>) -> Self {
        self.ssrc = Some(ssrc.into());
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Payload types, in preference order
    pub fn codecs(mut self, codecs: &[u8]) -> Self {
        self.codecs = codecs.to_vec();
        self
    }

    pub fn ptime_ms(mut self, ptime_ms: u32) -> Self {
        self.ptime_ms = ptime_ms;
        self
    }

    pub fn dtmf_events(mut self, events: impl Into<String>) -> Self {
        self.dtmf_events = events.into();
        self
    }

    /// Build the session. Fails on a payload type missing from the codec table.
    pub fn build(&self) -> SdpEngineResult<Session> {
        let formats = self
            .codecs
            .iter()
            .map(|pt| {
                describe_codec(*pt)
                    .map(|codec| format_for(codec, &self.dtmf_events))
                    .ok_or_else(|| SdpEngineError::UnknownCodec(format!("payload {}", pt)))
            })
            .collect::<SdpEngineResult<Vec<_>>>()?;

        let mut audio = Media::new(MediaType::Audio, self.port, proto::RTP_AVP);
        if let Some(ssrc) = &self.ssrc {
            audio.attributes.push(Attribute::new("ssrc", ssrc.as_str()));
        }
        audio.mode = self.direction;
        audio.ptime = Some(self.ptime_ms);
        audio.formats = formats;

        debug!(
            session_id = self.session_id,
            address = %self.ipv4,
            port = self.port,
            codecs = ?audio.format_names(),
            "Built local session"
        );

        Ok(Session {
            version: 0,
            origin: Origin {
                username: "-".to_string(),
                session_id: self.session_id,
                session_version: self.session_version,
                network_type: "IN".to_string(),
                address_type: "IP4".to_string(),
                address: self.ipv4.clone(),
            },
            name: self.name.clone(),
            connection: Some(Connection::ipv4(self.ipv4.as_str())),
            timing: Timing::unbounded(),
            media: vec![audio],
            ..Default::default()
        })
    }
}

/// Minimal one-audio-flow session with 20ms packet time
#[allow(clippy::too_many_arguments)]
pub fn new_session(
    session_id: u64,
    session_version: u64,
    ipv4: &str,
    name: &str,
    ssrc: Option<&str>,
    direction: Direction,
    port: u16,
    codecs: &[u8],
) -> SdpEngineResult<Session> {
    let mut builder = SessionBuilder::new(ipv4, port)
        .session_id(session_id)
        .session_version(session_version)
        .name(name)
        .direction(direction)
        .codecs(codecs);
    if let Some(ssrc) = ssrc {
        builder = builder.ssrc(ssrc);
    }
    builder.build()
}
