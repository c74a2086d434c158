// Copyright 2024-2026 RCV Core Contributors.
// This file is part of rcv-core.
// rcv-core is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// rcv-core is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with rcv-core.  If not, see <https://www.gnu.org/licenses/>.

//! The `ContestReport` bundle produced for downstream reporting.

use crate::analytics::pairwise::{AllocateeTable, PairwiseTable};
use crate::analytics::ranking_depth::RankingDistribution;
use crate::candidate::CandidateIndex;
use crate::quota::QuotaInfo;
use crate::transcript::{CandidateSummary, RoundTrace};
use serde::{Deserialize, Serialize};

/// Everything produced by a single contest tabulation: the round trace,
/// per-candidate summaries, winners in election order, the quota used,
/// and the three pairwise tables plus the ranking-depth distribution.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContestReport {
    pub quota: QuotaInfo,
    pub trace: RoundTrace,
    pub winners: Vec<CandidateIndex>,
    pub summaries: Vec<CandidateSummary>,
    pub pairwise_preferences: PairwiseTable,
    pub first_alternate: AllocateeTable,
    pub first_to_final: AllocateeTable,
    pub ranking_distribution: RankingDistribution,
}

impl ContestReport {
    /// Serialize to a `serde_json::Value`, the boundary format this crate
    /// commits to without prescribing any storage policy.
    pub fn to_json_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    pub fn from_json_value(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}
