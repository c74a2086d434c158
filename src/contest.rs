// Copyright 2024-2026 RCV Core Contributors.
// This file is part of rcv-core.
// rcv-core is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// rcv-core is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with rcv-core.  If not, see <https://www.gnu.org/licenses/>.

//! Contest configuration consumed from upstream loaders.

use crate::ballot::Ballot;
use crate::candidate::{Candidate, NumberOfCandidates};
use serde::{Deserialize, Serialize};

/// Which ranked-choice rule governs this contest. Deliberately an explicit
/// enum, never inferred from seat count: Cambridge and Scotland are both
/// whole-ballot STV with seats > 1, Portland is fractional STV with seats >
/// 1.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum Variant {
    /// Single-winner Instant-Runoff Voting.
    Irv,
    /// Multi-winner STV with integer ballot piles (Cambridge-style).
    WholeBallotStv,
    /// Multi-winner STV with per-ballot fractional weights (weighted
    /// inclusive Gregory).
    FractionalStv,
}

/// A bundle of candidates, canonical ballots, and contest parameters, as
/// produced by a jurisdiction-specific loader (out of scope for this
/// crate).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContestInput {
    pub candidates: Vec<Candidate>,
    pub ballots: Vec<Ballot>,
    pub seats: NumberOfCandidates,
    pub variant: Variant,
    /// Overrides the default quota basis (total canonical ballot count)
    /// when the source CVR contains ballots belonging to other contests
    /// (the Portland case).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub quota_ballot_count: Option<usize>,
}

impl ContestInput {
    pub fn num_candidates(&self) -> usize { self.candidates.len() }
}
