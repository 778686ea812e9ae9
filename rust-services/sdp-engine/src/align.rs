//! Media flow alignment
//!
//! Answers must keep the m= lines of the offer: same count, same order,
//! same media type per position. Alignment rearranges a session's flows
//! against a reference session, inserting rejected placeholders where the
//! session has no flow of the reference's type.
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


use std::collections::{HashMap, HashSet};
use std::mem;
use tracing::{debug, warn};

use crate::error::{SdpEngineError, SdpEngineResult};
use crate::media::Media;
use crate::session::{MediaType, Session};

impl Session {
    /// Make this session's flows positionally congruent with `reference`.
    ///
    /// Existing flows keep their content and move to the position of the
    /// reference flow of the same type. Reference types missing here become
    /// copies of the reference flow with port 0 and no direction. Flows whose
    /// type the reference lacks are dropped.
    ///
    /// Fails without touching the session if it holds two flows of one type.
    pub fn align_flows(&mut self, reference: &Session) -> SdpEngineResult<()> {
        let mut seen: HashSet<&MediaType> = HashSet::with_capacity(self.media.len());
        for media in &self.media {
            if !seen.insert(&media.media_type) {
                warn!(media = %media.media_type, "Duplicate media type, cannot align flows");
                return Err(SdpEngineError::DuplicateMediaType {
                    media_type: media.media_type.to_string(),
                });
            }
        }

        let mut by_type: HashMap<MediaType, Media> = mem::take(&mut self.media)
            .into_iter()
            .map(|m| (m.media_type.clone(), m))
            .collect();

        self.media = reference
            .media
            .iter()
            .map(|wanted| {
                by_type.remove(&wanted.media_type).unwrap_or_else(|| {
                    debug!(media = %wanted.media_type, "Inserting rejected placeholder flow");
                    wanted.disabled_copy()
                })
            })
            .collect();

        for leftover in by_type.keys() {
            debug!(media = %leftover, "Dropping flow absent from reference");
        }
        Ok(())
    }
}
