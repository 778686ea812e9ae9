//! Answer generation (RFC 3264)
//!
//! [`build_self_answer`] turns an offer into an answer that mirrors it, as an
//! echo responder does. [`Negotiator`] carries the configured codec
//! preferences and builds offers and answers from a local session.
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


use sdp_config::NegotiationConfig;
use std::collections::HashSet;
use std::mem;
use tracing::{debug, warn};

use crate::builder::SessionBuilder;
use crate::direction::{negotiate_answer_direction, Direction};
use crate::error::{SdpEngineError, SdpEngineResult};
use crate::format::Format;
use crate::media::{Media, WILDCARD};
use crate::session::{is_rtp, MediaType, Session};

/// Build an answer that echoes `offer` back.
///
/// Non-audio flows are rejected, the audio flow is reduced to the first
/// acceptable codec plus telephone-event, and its direction is negotiated
/// from `current_local` against the offer. Returns the answer and whether
/// DTMF survived.
pub fn build_self_answer<S: AsRef<str>>(
    offer: &Session,
    current_local: Direction,
    audio_names: &[S],
) -> SdpEngineResult<(Session, bool)> {
    if audio_names.is_empty() {
        return Err(reject("no audio formats provided"));
    }
    match offer.audio() {
        None => return Err(reject("no audio media flow found")),
        Some(audio) if !audio.is_enabled() => {
            return Err(reject("audio media flow is disabled"))
        }
        Some(_) => {}
    }

    let mut answer = offer.clone();
    answer.mode = Direction::Unspecified;
    answer.origin.session_version = 1;
    answer.disable_flows_except(&[MediaType::Audio]);

    let mode = negotiate_answer_direction(current_local, offer.effective_direction());
    let audio = answer
        .audio_mut()
        .ok_or_else(|| reject("no audio media flow found"))?;

    let (audio_found, dtmf_found) = audio.reduce_to_primary_audio_plus_dtmf(audio_names);
    if !audio_found {
        return Err(reject("no common audio formats found in audio media flow"));
    }
    audio.mode = mode;

    debug!(mode = %mode, dtmf = dtmf_found, "Built self answer");
    Ok((answer, dtmf_found))
}

fn reject(reason: &str) -> SdpEngineError {
    warn!(reason, "Answer rejected");
    SdpEngineError::AnswerRejected(reason.to_string())
}

/// Offer/answer driver configured with codec preferences
#[derive(Debug, Clone)]
pub struct Negotiator {
    config: NegotiationConfig,
}

impl Negotiator {
    pub fn new(config: NegotiationConfig) -> Self {
        Negotiator { config }
    }

    pub fn config(&self) -> &NegotiationConfig {
        &self.config
    }

    /// Audio names without wildcards
    fn acceptable_audio(&self) -> Vec<&str> {
        self.config
            .audio_codecs
            .iter()
            .map(String::as_str)
            .filter(|name| *name != WILDCARD)
            .collect()
    }

    /// Audio preference order; unlisted codecs trail unless a wildcard
    /// places them elsewhere
    fn audio_order(&self) -> Vec<&str> {
        let mut order: Vec<&str> = self.config.audio_codecs.iter().map(String::as_str).collect();
        if !order.contains(&WILDCARD) {
            order.push(WILDCARD);
        }
        order
    }

    /// Local offer with a single sendrecv audio flow built from the
    /// configured codecs
    pub fn build_offer(
        &self,
        session_id: u64,
        ipv4: &str,
        port: u16,
        ssrc: Option<&str>,
    ) -> SdpEngineResult<Session> {
        let mut builder = SessionBuilder::new(ipv4, port)
            .session_id(session_id)
            .session_version(1)
            .name(self.config.session_name.as_str())
            .direction(Direction::SendRecv)
            .codecs(&self.config.offer_codecs)
            .ptime_ms(self.config.ptime_ms)
            .dtmf_events(self.config.dtmf_events.as_str());
        if let Some(ssrc) = ssrc {
            builder = builder.ssrc(ssrc);
        }
        builder.build()
    }

    /// [`build_self_answer`] with the configured audio codecs
    pub fn build_self_answer(
        &self,
        offer: &Session,
        current_local: Direction,
    ) -> SdpEngineResult<(Session, bool)> {
        build_self_answer(offer, current_local, &self.acceptable_audio())
    }

    /// Answer `offer` from the capabilities in `local`.
    ///
    /// Flows are aligned to the offer. Each enabled RTP flow keeps only the
    /// formats the offer also lists, under the offer's payload numbers, audio
    /// ordered by preference; a flow left without media formats, or rejected
    /// in the offer, gets port 0. The session version increases when the
    /// answer differs from `local`.
    pub fn answer(&self, local: &Session, offer: &Session) -> SdpEngineResult<Session> {
        let mut answer = local.clone();
        answer.align_flows(offer)?;

        let local_mode = answer.mode;
        let audio_order = self.audio_order();

        for (flow, offered) in answer.media.iter_mut().zip(&offer.media) {
            if !flow.is_enabled() {
                continue;
            }
            if !offered.is_enabled() {
                debug!(media = %flow.media_type, "Flow rejected in offer");
                flow.port = 0;
                continue;
            }

            if is_rtp(&flow.media_type, &flow.proto) {
                adopt_offered_formats(flow, offered);

                if flow.media_type == MediaType::Audio {
                    flow.order_formats_by_name(&audio_order);
                }
                if !flow.has_any_non_dtmf_format() {
                    debug!(media = %flow.media_type, "No common format, rejecting flow");
                    flow.port = 0;
                    continue;
                }
            }

            let wanted = if flow.mode.is_specified() {
                flow.mode
            } else {
                local_mode
            };
            flow.mode = negotiate_answer_direction(wanted, offer.direction_of(offered.mode));
        }

        if answer != *local {
            answer.bump_version();
        }
        debug!(
            version = answer.origin.session_version,
            flows = answer.media.len(),
            "Built answer"
        );
        Ok(answer)
    }
}

/// Keep the local formats the offer also lists.
///
/// A local format matches an offered one with the same name and clock rate,
/// and the same channel count when both give one. Kept formats take the
/// offered payload type, clock rate and channels; local fmtp values stay.
/// Each offered format is used at most once.
fn adopt_offered_formats(flow: &mut Media, offered: &Media) {
    let mut taken: HashSet<u8> = HashSet::new();
    let local = mem::take(&mut flow.formats);

    flow.formats = local
        .into_iter()
        .filter_map(|mut format| {
            let remote = offered
                .formats
                .iter()
                .find(|o| !taken.contains(&o.payload) && same_codec(&format, o))?;
            taken.insert(remote.payload);
            if format.payload != remote.payload {
                debug!(
                    codec = %format.name,
                    local = format.payload,
                    offered = remote.payload,
                    "Using offered payload type"
                );
            }
            format.payload = remote.payload;
            format.clock_rate = remote.clock_rate;
            format.channels = remote.channels;
            Some(format)
        })
        .collect();
}

fn same_codec(local: &Format, offered: &Format) -> bool {
    local.name.eq_ignore_ascii_case(&offered.name)
        && local.clock_rate == offered.clock_rate
        && (local.channels == 0 || offered.channels == 0 || local.channels == offered.channels)
}
