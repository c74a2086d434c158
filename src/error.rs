// Copyright 2024-2026 RCV Core Contributors.
// This file is part of rcv-core.
// rcv-core is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// rcv-core is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with rcv-core.  If not, see <https://www.gnu.org/licenses/>.

//! Error kinds the core must distinguish. Nothing is retried inside
//! the core: tabulation is deterministic given its inputs, so every error
//! here surfaces straight to the caller.

use crate::candidate::CandidateIndex;
use crate::transcript::RoundTrace;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// seats < 1, candidates empty, or a variant/seat-count combination
    /// that can't be run (IRV with seats > 1).
    #[error("invalid contest: {0}")]
    InvalidContest(String),

    /// A ballot references a candidate index outside the candidate table.
    /// Treated as a loader bug, not a recoverable condition.
    #[error("ballot {ballot_index} references candidate {candidate:?}, which is not in the candidate table")]
    InconsistentBallot { ballot_index: usize, candidate: CandidateIndex },

    /// The round-cap safety limit (2 * |candidates| rounds) tripped.
    /// Carries the trace produced so far for debugging.
    #[error("round cap exceeded after {rounds_run} rounds without terminating")]
    RoundCapExceeded { rounds_run: usize, partial_trace: RoundTrace },

    /// Fractional engine only: the end-of-tabulation conservation check
    /// failed beyond the tolerance in [`crate::engine::fractional::CONSERVATION_EPSILON`].
    #[error("numeric inconsistency: allocations summed to {actual}, expected {expected} (tolerance {tolerance})")]
    NumericInconsistency { expected: f64, actual: f64, tolerance: f64 },
}
