// Copyright 2024-2026 RCV Core Contributors.
// This file is part of rcv-core.
// rcv-core is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// rcv-core is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with rcv-core.  If not, see <https://www.gnu.org/licenses/>.

//! The Droop quota: `Q = floor(N / (S+1)) + 1`.

use crate::candidate::NumberOfCandidates;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The quota computed for a contest, and the inputs that produced it, kept
/// together so a trace consumer can display `(papers)/(vacancies+1) ->
/// quota` the way an election report would.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct QuotaInfo {
    pub ballots_for_quota: usize,
    pub seats: NumberOfCandidates,
    pub quota: i64,
}

impl fmt::Display for QuotaInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({} ballots)/({} seats+1) -> quota {}", self.ballots_for_quota, self.seats, self.quota)
    }
}

/// Compute the Droop quota. `ballots_for_quota` is `N`: the number of
/// ballots that count toward quota purposes (for CVRs containing ballots
/// belonging to other contests, this is the number ranking at least one
/// candidate in *this* contest; otherwise it's the total valid-ballot
/// count — see [`crate::contest::ContestInput::quota_ballot_count`]).
pub fn droop_quota(ballots_for_quota: usize, seats: NumberOfCandidates) -> QuotaInfo {
    let quota = (ballots_for_quota / (seats.0 + 1)) as i64 + 1;
    QuotaInfo { ballots_for_quota, seats, quota }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn droop_quota_scenario_s2() {
        // N=10, seats=2 -> Q=4 (whole-ballot surplus-chain case).
        let q = droop_quota(10, NumberOfCandidates(2));
        assert_eq!(4, q.quota);
    }

    #[test]
    fn droop_quota_scenario_s3() {
        // N=12, seats=2 -> Q=5 (simultaneous-election case).
        let q = droop_quota(12, NumberOfCandidates(2));
        assert_eq!(5, q.quota);
    }

    #[test]
    fn droop_quota_scales_with_multiplicity() {
        // Scaling N by k scales the quota by k (approximately; Droop's
        // floor means this holds exactly only when (S+1) divides evenly,
        // but scaling by a common multiple of (S+1) always works).
        let seats = NumberOfCandidates(2);
        let base = droop_quota(9, seats); // N=9, S+1=3 divides evenly -> Q=4
        let scaled = droop_quota(27, seats);
        assert_eq!(base.quota * 3, scaled.quota);
    }
}
