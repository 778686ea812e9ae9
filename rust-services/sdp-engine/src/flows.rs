//! Session-level flow mutators and effective-value lookups
//!
//! Media-level values override session-level ones: direction, packet time
//! and connection address all fall back to the session when a flow does not
//! carry its own.
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


use std::collections::HashSet;
use tracing::debug;

use crate::codecs::describe_codec;
use crate::direction::{is_holding, next_local_directive, Direction};
use crate::error::{SdpEngineError, SdpEngineResult};
use crate::media::Media;
use crate::session::{is_null_address, Connection, MediaType, Session};

/// Packet time used when neither the audio flow nor the session sets one
pub const DEFAULT_PTIME_MS: u32 = 20;

/// First dynamic RTP payload type
pub const DYNAMIC_PAYLOAD_START: u8 = 96;

impl Session {
    /// Direction of the audio flow, falling back to the session and then
    /// to sendrecv
    pub fn effective_direction(&self) -> Direction {
        self.effective_direction_for(&MediaType::Audio)
    }

    /// Direction of the flow of `media_type`, falling back to the session
    /// and then to sendrecv
    pub fn effective_direction_for(&self, media_type: &MediaType) -> Direction {
        let media_mode = self
            .media_of(media_type)
            .map(|m| m.mode)
            .unwrap_or_default();
        self.direction_of(media_mode)
    }

    /// Media-level direction if specified, otherwise the session's
    pub(crate) fn direction_of(&self, media_mode: Direction) -> Direction {
        if media_mode.is_specified() {
            media_mode
        } else {
            self.mode.effective()
        }
    }

    /// Held when the audio direction pauses reception or the audio address
    /// is missing or 0.0.0.0
    pub fn is_call_held(&self) -> bool {
        if is_holding(self.effective_direction()) {
            return true;
        }
        let address = match self.audio() {
            Some(audio) => self.effective_media_ipv4(audio),
            None => self.connection.as_ref().map(|c| c.address.as_str()),
        };
        address.map_or(true, is_null_address)
    }

    /// Packet time of the audio flow, then the session, then 20ms
    pub fn effective_ptime(&self) -> u32 {
        self.audio()
            .and_then(|a| a.ptime)
            .or(self.ptime)
            .unwrap_or(DEFAULT_PTIME_MS)
    }

    /// First media-level address, otherwise the session-level one
    pub fn effective_media_ipv4<'a>(&'a self, media: &'a Media) -> Option<&'a str> {
        media
            .connections
            .first()
            .or(self.connection.as_ref())
            .map(|c| c.address.as_str())
    }

    /// Effective address of the flow of `media_type`
    pub fn effective_connection_for(&self, media_type: &MediaType) -> Option<&str> {
        self.media_of(media_type)
            .and_then(|media| self.effective_media_ipv4(media))
    }

    /// "ip:port" where the flow receives media.
    ///
    /// Null media-level addresses are skipped in favour of the session
    /// address. `None` when no address is left or the flow is disabled.
    pub fn effective_media_socket(&self, media: &Media) -> Option<String> {
        let address = media
            .connections
            .iter()
            .map(|c| c.address.as_str())
            .find(|addr| !is_null_address(addr))
            .or_else(|| {
                self.connection
                    .as_ref()
                    .map(|c| c.address.as_str())
                    .filter(|addr| !addr.is_empty())
            })?;

        if media.port == 0 {
            return None;
        }
        Some(format!("{}:{}", address, media.port))
    }

    /// Set an IPv4 connection and port for the flow of `media_type`.
    ///
    /// With `set_global` the address goes to the session level, every
    /// media-level connection is cleared and only the port is set on the
    /// flow. Otherwise the flow's connections are replaced; `remove_global`
    /// then strips the session-level connection if the flow exists.
    pub fn set_connection(
        &mut self,
        media_type: &MediaType,
        ipv4: &str,
        port: u16,
        set_global: bool,
        remove_global: bool,
    ) -> &mut Self {
        if media_type.as_str().is_empty() {
            return self;
        }
        let connection = Connection::ipv4(ipv4);

        if set_global {
            self.connection = Some(connection);
            for media in &mut self.media {
                media.connections.clear();
                if &media.media_type == media_type {
                    media.port = port;
                }
            }
            return self;
        }

        let found = match self.media_of_mut(media_type) {
            Some(media) => {
                media.connections = vec![connection];
                media.port = port;
                true
            }
            None => false,
        };

        if !found {
            debug!(media = %media_type, "No flow to set connection on");
        } else if remove_global {
            self.connection = None;
        }
        self
    }

    /// Remove every flow whose type is not listed. Empty list: no change.
    pub fn drop_flows_except(&mut self, media_types: &[MediaType]) -> &mut Self {
        self.retain_flows(media_types, true)
    }

    /// Remove every flow whose type is listed. Empty list: no change.
    pub fn drop_flows(&mut self, media_types: &[MediaType]) -> &mut Self {
        self.retain_flows(media_types, false)
    }

    /// Set port 0 on every flow whose type is not listed. Empty list: no change.
    pub fn disable_flows_except(&mut self, media_types: &[MediaType]) -> &mut Self {
        self.disable_matching(media_types, true)
    }

    /// Set port 0 on every flow whose type is listed. Empty list: no change.
    pub fn disable_flows(&mut self, media_types: &[MediaType]) -> &mut Self {
        self.disable_matching(media_types, false)
    }

    fn retain_flows(&mut self, media_types: &[MediaType], except: bool) -> &mut Self {
        if media_types.is_empty() {
            return self;
        }
        let listed: HashSet<&MediaType> = media_types.iter().collect();
        self.media
            .retain(|m| listed.contains(&m.media_type) == except);
        self
    }

    fn disable_matching(&mut self, media_types: &[MediaType], except: bool) -> &mut Self {
        if media_types.is_empty() {
            return self;
        }
        let listed: HashSet<&MediaType> = media_types.iter().collect();
        for media in &mut self.media {
            if listed.contains(&media.media_type) != except {
                media.port = 0;
            }
        }
        self
    }

    /// No flows at all, or every flow has port 0
    pub fn are_all_flows_dropped_or_disabled(&self) -> bool {
        self.media.iter().all(|m| !m.is_enabled())
    }

    /// Any enabled T.38 image flow
    pub fn is_t38_image(&self) -> bool {
        self.media.iter().any(Media::is_t38_image)
    }

    /// Fill name, clock rate and channels of static payload formats from the
    /// codec table. Returns the formats that could not be resolved.
    pub fn restore_missing_rtpmaps(&mut self) -> Vec<String> {
        let mut missing = Vec::new();
        for media in &mut self.media {
            if !matches!(media.media_type, MediaType::Audio | MediaType::Video) {
                continue;
            }
            for format in &mut media.formats {
                if format.payload >= DYNAMIC_PAYLOAD_START && !format.name.is_empty() {
                    continue;
                }
                match describe_codec(format.payload).filter(|c| c.is_static()) {
                    Some(codec) => {
                        format.name = codec.name.to_string();
                        format.clock_rate = codec.clock_rate;
                        format.channels = codec.channels;
                    }
                    None => missing.push(format!(
                        "media type {}, payload type {}",
                        media.media_type, format.payload
                    )),
                }
            }
        }
        missing
    }

    /// Put the audio flow on hold or resume it.
    ///
    /// Stores the new direction on the audio flow and bumps the session
    /// version. An invalid transition leaves the session unchanged.
    pub fn apply_hold(&mut self, put_on_hold: bool) -> SdpEngineResult<Direction> {
        let current = self.effective_direction();
        let audio = self
            .audio_mut()
            .ok_or_else(|| SdpEngineError::MediaFlowNotFound {
                media_type: MediaType::Audio.to_string(),
            })?;

        let next = next_local_directive(current, put_on_hold).ok_or(
            SdpEngineError::InvalidDirectionTransition {
                from: current,
                action: if put_on_hold { "hold" } else { "resume" },
            },
        )?;

        audio.mode = next;
        let version = self.bump_version();
        debug!(from = %current, to = %next, version, "Audio direction changed");
        Ok(next)
    }
}
