// Copyright 2024-2026 RCV Core Contributors.
// This file is part of rcv-core.
// rcv-core is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// rcv-core is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with rcv-core.  If not, see <https://www.gnu.org/licenses/>.

//! The shared round-trace model (component F): the data structures that
//! bridge the whole-ballot and fractional engines to downstream reporting
//! and Sankey visualization.

use crate::ballot::BallotPaperCount;
use crate::candidate::{Allocatee, CandidateIndex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// A vote count, either an integer ballot count (whole-ballot / IRV) or a
/// fractional vote weight (fractional STV). Kept as a small sum type
/// rather than a generic parameter threaded through every structure in
/// this module, since a round trace only ever holds one kind of tally for
/// its whole lifetime (the engine that produced it picks once).
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum Tally {
    Int(i64),
    Frac(f64),
}

impl Tally {
    pub fn zero_like(&self) -> Tally {
        match self {
            Tally::Int(_) => Tally::Int(0),
            Tally::Frac(_) => Tally::Frac(0.0),
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Tally::Int(v) => *v as f64,
            Tally::Frac(v) => *v,
        }
    }

    /// Round to two decimal places, the wire/storage boundary precision
    /// for fractional tallies. A no-op for integer tallies.
    pub fn rounded_for_wire(&self) -> Tally {
        match self {
            Tally::Int(v) => Tally::Int(*v),
            Tally::Frac(v) => Tally::Frac((*v * 100.0).round() / 100.0),
        }
    }
}

impl PartialEq for Tally {
    fn eq(&self, other: &Self) -> bool { self.as_f64() == other.as_f64() }
}

impl PartialOrd for Tally {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.as_f64().partial_cmp(&other.as_f64())
    }
}

impl Add for Tally {
    type Output = Tally;
    fn add(self, rhs: Tally) -> Tally {
        match (self, rhs) {
            (Tally::Int(a), Tally::Int(b)) => Tally::Int(a + b),
            _ => Tally::Frac(self.as_f64() + rhs.as_f64()),
        }
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, rhs: Tally) { *self = *self + rhs; }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Tally::Int(v) => write!(f, "{}", v),
            Tally::Frac(v) => write!(f, "{:.2}", v),
        }
    }
}

/// Allocation of votes to every candidate (active or already elected) plus
/// Exhausted, as it stands at the start of a round's action. Indexed by
/// [`CandidateIndex`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Allocation {
    pub candidate: Vec<Tally>,
    pub exhausted: Tally,
}

impl Allocation {
    pub fn get(&self, who: Allocatee) -> Tally {
        match who {
            Allocatee::Candidate(c) => self.candidate[c.0],
            Allocatee::Exhausted => self.exhausted,
        }
    }

    /// Conservation check: sum of every allocatee, including Exhausted.
    pub fn total(&self) -> Tally {
        let mut total = self.exhausted.zero_like();
        for t in &self.candidate { total += *t; }
        total += self.exhausted;
        total
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum TransferKind {
    Elimination,
    Surplus,
}

/// One vote transfer produced during a round.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transfer {
    pub from: CandidateIndex,
    pub to: Allocatee,
    pub count: Tally,
    pub kind: TransferKind,
}

/// One round of the round trace: the allocation at the start of the
/// round's action, the transfers produced, and who newly changed status.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Round {
    pub allocation: Allocation,
    pub transfers: Vec<Transfer>,
    pub newly_elected: Vec<CandidateIndex>,
    pub newly_eliminated: Vec<CandidateIndex>,
    pub continuing_ballots: BallotPaperCount,
}

impl Round {
    /// Sort transfers into the canonical ordering: first by
    /// `(from_index ascending, to_index ascending)`, tag preserved.
    pub fn sort_transfers(&mut self) {
        self.transfers.sort_by_key(|t| {
            let to_key = match t.to {
                Allocatee::Candidate(c) => c.0,
                Allocatee::Exhausted => usize::MAX,
            };
            (t.from.0, to_key)
        });
    }
}

/// The ordered sequence of [`Round`] records produced by a tabulation.
pub type RoundTrace = Vec<Round>;

/// Per-candidate summary carried alongside the round trace: first-round
/// votes, cumulative transfers received, when (if ever) the candidate was
/// elected or eliminated, and whether they won a seat.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CandidateSummary {
    pub first_round_votes: Tally,
    pub transfer_votes_received: Tally,
    pub round_elected: Option<usize>,
    pub round_eliminated: Option<usize>,
    pub winner: bool,
}

/// Everything a round engine (whole-ballot or fractional) produces: the
/// trace, the winner list in election order, and per-candidate summaries
/// indexed by [`CandidateIndex`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineOutcome {
    pub trace: RoundTrace,
    pub winners: Vec<CandidateIndex>,
    pub summaries: Vec<CandidateSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_display_matches_wire_precision() {
        assert_eq!("42", format!("{}", Tally::Int(42)));
        assert_eq!("3.14", format!("{}", Tally::Frac(3.14159).rounded_for_wire()));
    }

    #[test]
    fn allocation_total_includes_exhausted() {
        let alloc = Allocation { candidate: vec![Tally::Int(40), Tally::Int(35)], exhausted: Tally::Int(25) };
        assert_eq!(Tally::Int(100), alloc.total());
    }

    #[test]
    fn transfer_sort_orders_by_from_then_to() {
        let mut round = Round {
            allocation: Allocation { candidate: vec![], exhausted: Tally::Int(0) },
            transfers: vec![
                Transfer { from: CandidateIndex(2), to: Allocatee::Candidate(CandidateIndex(0)), count: Tally::Int(1), kind: TransferKind::Elimination },
                Transfer { from: CandidateIndex(1), to: Allocatee::Exhausted, count: Tally::Int(1), kind: TransferKind::Elimination },
                Transfer { from: CandidateIndex(1), to: Allocatee::Candidate(CandidateIndex(0)), count: Tally::Int(1), kind: TransferKind::Elimination },
            ],
            newly_elected: vec![],
            newly_eliminated: vec![],
            continuing_ballots: BallotPaperCount(0),
        };
        round.sort_transfers();
        assert_eq!(CandidateIndex(1), round.transfers[0].from);
        assert_eq!(Allocatee::Candidate(CandidateIndex(0)), round.transfers[0].to);
        assert_eq!(CandidateIndex(1), round.transfers[1].from);
        assert_eq!(Allocatee::Exhausted, round.transfers[1].to);
        assert_eq!(CandidateIndex(2), round.transfers[2].from);
    }
}
