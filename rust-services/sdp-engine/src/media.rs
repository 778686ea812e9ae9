//! Media flow (m= block) and its format engine
//!
//! Lookups, filters, preference ordering and the "primary audio codec plus
//! DTMF" reduction all work in place on the flow's format list and keep the
//! relative order of the formats they retain.
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
use std::collections::HashSet;
use std::mem;
use tracing::debug;

use crate::direction::Direction;
use crate::format::Format;
use crate::session::{proto, Attributes, Bandwidth, Connection, Key, MediaType};

/// Wildcard token accepted by [`Media::order_formats_by_name`]
pub const WILDCARD: &str = "*";

/// One media description (m= line and the lines that follow it)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Media {
    /// Media type
    pub media_type: MediaType,
    /// Transport port; 0 disables the flow
    pub port: u16,
    /// Number of ports (0 when not given)
    pub port_count: u16,
    /// Transport protocol
    pub proto: String,
    /// Media title (i=)
    pub information: Option<String>,
    /// Media-level connections, overriding the session-level one
    pub connections: Vec<Connection>,
    /// Bandwidth (b=)
    pub bandwidths: Vec<Bandwidth>,
    /// Encryption keys (k=)
    pub keys: Vec<Key>,
    /// Attributes not modelled elsewhere
    pub attributes: Attributes,
    /// Media-level direction
    pub mode: Direction,
    /// Packet time (ms)
    pub ptime: Option<u32>,
    /// Payload formats in preference order
    pub formats: Vec<Format>,
    /// Raw format token for non-RTP flows (e.g. "t38")
    pub format_descr: String,
}

impl Media {
    pub fn new(media_type: MediaType, port: u16, proto: impl Into<String>) -> Self {
        Media {
            media_type,
            port,
            proto: proto.into(),
            ..Default::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.port != 0
    }

    /// Copy of this flow marked as rejected: port 0, no direction
    pub fn disabled_copy(&self) -> Media {
        Media {
            port: 0,
            mode: Direction::Unspecified,
            ..self.clone()
        }
    }

    /// T.38 fax over UDPTL
    pub fn is_t38_image(&self) -> bool {
        self.media_type == MediaType::Image
            && self.port > 0
            && self.proto == proto::UDPTL
            && self.format_descr == "t38"
    }

    pub fn format_by_payload(&self, payload: u8) -> Option<&Format> {
        self.formats.iter().find(|f| f.payload == payload)
    }

    pub fn format_by_payload_mut(&mut self, payload: u8) -> Option<&mut Format> {
        self.formats.iter_mut().find(|f| f.payload == payload)
    }

    /// Case-insensitive lookup by encoding name
    pub fn format_by_name(&self, name: &str) -> Option<&Format> {
        self.formats.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    pub fn payload_types(&self) -> Vec<u8> {
        self.formats.iter().map(|f| f.payload).collect()
    }

    pub fn format_names(&self) -> Vec<&str> {
        self.formats.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn format_lower_names(&self) -> Vec<String> {
        self.formats.iter().map(Format::lower_name).collect()
    }

    pub fn first_audio_format(&self) -> Option<&Format> {
        self.formats.iter().find(|f| f.is_audio_format())
    }

    pub fn first_audio_format_name(&self) -> Option<&str> {
        self.first_audio_format().map(|f| f.name.as_str())
    }

    pub fn first_dtmf_format(&self) -> Option<&Format> {
        self.formats.iter().find(|f| f.is_dtmf())
    }

    pub fn has_dtmf(&self) -> bool {
        self.first_dtmf_format().is_some()
    }

    /// At least one format is neither DTMF nor comfort noise
    pub fn has_any_non_dtmf_format(&self) -> bool {
        self.formats.iter().any(Format::is_audio_format)
    }

    /// Keep only the formats matching `predicate`
    pub fn filter_keeping<F>(&mut self, predicate: F)
    where
        F: FnMut(&Format) -> bool,
    {
        self.formats.retain(predicate);
    }

    /// Remove the formats matching `predicate`
    pub fn filter_dropping<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&Format) -> bool,
    {
        self.formats.retain(|f| !predicate(f));
    }

    /// Keep formats named in `names`. An empty list changes nothing and
    /// returns false; otherwise returns [`Self::has_any_non_dtmf_format`].
    pub fn keep_formats_by_name<S: AsRef<str>>(&mut self, names: &[S]) -> bool {
        self.retain_by_name(names, true)
    }

    /// Drop formats named in `names`; same return rules as
    /// [`Self::keep_formats_by_name`].
    pub fn drop_formats_by_name<S: AsRef<str>>(&mut self, names: &[S]) -> bool {
        self.retain_by_name(names, false)
    }

    pub fn keep_formats_by_payload(&mut self, payloads: &[u8]) -> bool {
        self.retain_by_payload(payloads, true)
    }

    pub fn drop_formats_by_payload(&mut self, payloads: &[u8]) -> bool {
        self.retain_by_payload(payloads, false)
    }

    fn retain_by_name<S: AsRef<str>>(&mut self, names: &[S], keep: bool) -> bool {
        if names.is_empty() {
            return false;
        }
        let names = lowercase_set(names);
        self.formats
            .retain(|f| names.contains(&f.lower_name()) == keep);
        self.has_any_non_dtmf_format()
    }

    fn retain_by_payload(&mut self, payloads: &[u8], keep: bool) -> bool {
        if payloads.is_empty() {
            return false;
        }
        let payloads: HashSet<u8> = payloads.iter().copied().collect();
        self.formats.retain(|f| payloads.contains(&f.payload) == keep);
        self.has_any_non_dtmf_format()
    }

    /// Reorder formats by name preference.
    ///
    /// Formats whose name is not listed are dropped, unless the list holds a
    /// `*`: the first `*` splices in every unlisted format in its original
    /// order. Later wildcards and repeated names are ignored. An empty list or
    /// a lone `*` leaves the formats untouched.
    pub fn order_formats_by_name<S: AsRef<str>>(&mut self, names: &[S]) {
        if names.is_empty() || (names.len() == 1 && names[0].as_ref() == WILDCARD) {
            return;
        }

        let tokens: Vec<String> = names
            .iter()
            .map(|n| n.as_ref().to_ascii_lowercase())
            .collect();
        let listed: HashSet<&str> = tokens
            .iter()
            .map(String::as_str)
            .filter(|t| *t != WILDCARD)
            .collect();

        let mut pending: Vec<Option<Format>> =
            mem::take(&mut self.formats).into_iter().map(Some).collect();
        let mut ordered = Vec::with_capacity(pending.len());
        let mut seen: HashSet<&str> = HashSet::new();
        let mut wildcard_done = false;

        for token in &tokens {
            if token == WILDCARD {
                if wildcard_done {
                    continue;
                }
                wildcard_done = true;
                for slot in pending.iter_mut() {
                    let unlisted = slot
                        .as_ref()
                        .is_some_and(|f| !listed.contains(f.lower_name().as_str()));
                    if unlisted {
                        ordered.extend(slot.take());
                    }
                }
            } else if seen.insert(token.as_str()) {
                for slot in pending.iter_mut() {
                    if slot.as_ref().is_some_and(|f| f.name.eq_ignore_ascii_case(token)) {
                        ordered.extend(slot.take());
                    }
                }
            }
        }

        self.formats = ordered;
    }

    /// Reduce the flow to `[audio, dtmf]`: the first non-DTMF, non-CN format
    /// whose name is acceptable, plus the first telephone-event format.
    ///
    /// Returns `(audio_found, dtmf_found)`. When no acceptable audio format
    /// exists the result is `(false, false)` and the formats are untouched.
    pub fn reduce_to_primary_audio_plus_dtmf<S: AsRef<str>>(
        &mut self,
        acceptable: &[S],
    ) -> (bool, bool) {
        let acceptable = lowercase_set(acceptable);
        let audio_idx = self
            .formats
            .iter()
            .position(|f| f.is_audio_format() && acceptable.contains(&f.lower_name()));

        let Some(audio_idx) = audio_idx else {
            debug!(
                media = %self.media_type,
                offered = ?self.format_names(),
                "No acceptable audio format"
            );
            return (false, false);
        };
        let dtmf_idx = self.formats.iter().position(Format::is_dtmf);

        let mut audio = None;
        let mut dtmf = None;
        for (idx, format) in mem::take(&mut self.formats).into_iter().enumerate() {
            if idx == audio_idx {
                audio = Some(format);
            } else if Some(idx) == dtmf_idx {
                dtmf = Some(format);
            }
        }
        self.formats = audio.into_iter().chain(dtmf).collect();

        debug!(
            media = %self.media_type,
            kept = ?self.format_names(),
            "Reduced to primary audio format"
        );
        (true, dtmf_idx.is_some())
    }

    /// Remove every media-level attribute called `name`
    pub fn delete_attribute(&mut self, name: &str) -> usize {
        self.attributes.delete(name)
    }
}

fn lowercase_set<S: AsRef<str>>(names: &[S]) -> HashSet<String> {
    names
        .iter()
        .map(|n| n.as_ref().to_ascii_lowercase())
        .collect()
}
