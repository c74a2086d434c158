// Copyright 2024-2026 RCV Core Contributors.
// This file is part of rcv-core.
// rcv-core is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// rcv-core is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with rcv-core.  If not, see <https://www.gnu.org/licenses/>.

//! Ranking-depth distribution. For each canonical
//! ballot, `k` is the number of distinct candidates ranked; this crate
//! assumes the upstream loader has already dropped duplicate markings, so
//! `k` equals the ranking's sequence length.

use crate::candidate::CandidateIndex;
use crate::ballot::Ballot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Overall and per-candidate distributions of ranking depth across the
/// electorate, plus the totals each is drawn from.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RankingDistribution {
    /// `depth -> ballot count`, over every canonical ballot.
    pub overall: BTreeMap<usize, usize>,
    /// Per first-choice candidate, the same mapping restricted to ballots
    /// whose first rank is that candidate.
    pub per_candidate: Vec<BTreeMap<usize, usize>>,
    /// Per first-choice candidate, the ballot count the restricted
    /// mapping is drawn from (i.e. that candidate's first-preference
    /// total).
    pub total_per_candidate: Vec<usize>,
    pub total_ballots: usize,
}

impl RankingDistribution {
    pub fn for_candidate(&self, c: CandidateIndex) -> &BTreeMap<usize, usize> { &self.per_candidate[c.0] }
}

/// Compute the ranking-depth distribution.
pub fn ranking_depth_distribution(ballots: &[Ballot], num_candidates: usize) -> RankingDistribution {
    let mut overall: BTreeMap<usize, usize> = BTreeMap::new();
    let mut per_candidate: Vec<BTreeMap<usize, usize>> = vec![BTreeMap::new(); num_candidates];
    let mut total_per_candidate = vec![0usize; num_candidates];
    let mut total_ballots = 0usize;

    for ballot in ballots {
        let k = ballot.depth();
        let m = ballot.multiplicity;
        *overall.entry(k).or_insert(0) += m;
        total_ballots += m;
        if let Some(first) = ballot.first_preference() {
            *per_candidate[first.0].entry(k).or_insert(0) += m;
            total_per_candidate[first.0] += m;
        }
    }

    RankingDistribution { overall, per_candidate, total_per_candidate, total_ballots }
}
