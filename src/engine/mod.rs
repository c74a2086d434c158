// Copyright 2024-2026 RCV Core Contributors.
// This file is part of rcv-core.
// rcv-core is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// rcv-core is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with rcv-core.  If not, see <https://www.gnu.org/licenses/>.

//! The two round engines: whole-ballot (IRV / Cambridge-style STV) and
//! fractional (weighted inclusive Gregory STV). Shared plumbing — status
//! tracking and the name-based deterministic tie-break — lives here.

pub mod whole_ballot;
pub mod fractional;

use crate::candidate::{Candidate, CandidateIndex};

/// A candidate's status transitions monotonically: Active -> Elected or
/// Active -> Eliminated, never reversed.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Status {
    Active,
    Elected,
    Eliminated,
}

/// Safety limit on the number of rounds a tabulation may run.
/// Exceeding this is a theorem-violating bug, not an expected outcome; the
/// limit exists purely so a broken implementation aborts instead of
/// looping forever.
pub fn round_cap(num_candidates: usize) -> usize { 2 * num_candidates }

/// Sort `tied` (candidates with equal tallies) ascending by candidate
/// name, the deterministic tie-break this crate uses throughout (a
/// documented simplification of how real jurisdictions break ties).
pub fn tie_break_by_name(tied: &mut [CandidateIndex], candidates: &[Candidate]) {
    tied.sort_by(|a, b| candidates[a.0].name.cmp(&candidates[b.0].name));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<Candidate> {
        vec![
            Candidate { name: "Carol".into(), is_write_in: false, party_or_type: None },
            Candidate { name: "Alice".into(), is_write_in: false, party_or_type: None },
            Candidate { name: "Bob".into(), is_write_in: false, party_or_type: None },
        ]
    }

    #[test]
    fn tie_break_sorts_alphabetically() {
        let cands = candidates();
        let mut tied = vec![CandidateIndex(0), CandidateIndex(1), CandidateIndex(2)];
        tie_break_by_name(&mut tied, &cands);
        assert_eq!(vec![CandidateIndex(1), CandidateIndex(2), CandidateIndex(0)], tied);
    }

    #[test]
    fn round_cap_is_twice_candidate_count() {
        assert_eq!(10, round_cap(5));
    }
}
