// Copyright 2024-2026 RCV Core Contributors.
// This file is part of rcv-core.
// rcv-core is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// rcv-core is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with rcv-core.  If not, see <https://www.gnu.org/licenses/>.

//! Top-level orchestration: validate a [`ContestInput`], run the engine
//! its variant names, then compute the analytics tables over the same
//! canonical ballots and hand back a [`ContestReport`].

use crate::analytics::{pairwise, ranking_depth};
use crate::ballot::total_ballots;
use crate::contest::{ContestInput, Variant};
use crate::engine::fractional::{self, FractionalOptions};
use crate::engine::whole_ballot::{self, WholeBallotOptions};
use crate::error::Error;
use crate::quota::droop_quota;
use crate::report::ContestReport;

/// Validate the contest shape (`InvalidContest`/`InconsistentBallot`),
/// run the engine named by `input.variant`, compute analytics over the
/// same canonical ballots, and assemble the [`ContestReport`].
pub fn tabulate_contest(input: &ContestInput) -> Result<ContestReport, Error> {
    validate(input)?;

    let quota_basis = input.quota_ballot_count.unwrap_or_else(|| total_ballots(&input.ballots));
    let quota = droop_quota(quota_basis, input.seats);

    let outcome = match input.variant {
        Variant::Irv => whole_ballot::tabulate(input, None, &WholeBallotOptions::default())?,
        Variant::WholeBallotStv => whole_ballot::tabulate(input, Some(&quota), &WholeBallotOptions::default())?,
        Variant::FractionalStv => fractional::tabulate(input, &quota, &FractionalOptions::default())?,
    };

    let num_candidates = input.num_candidates();
    let eliminated: Vec<bool> = (0..num_candidates)
        .map(|c| outcome.summaries[c].round_eliminated.is_some())
        .collect();

    let pairwise_preferences = pairwise::pairwise_preferences(&input.ballots, num_candidates);
    let first_alternate = pairwise::first_alternate(&input.ballots, num_candidates);
    let first_to_final = pairwise::first_to_final(&input.ballots, num_candidates, &eliminated);
    let ranking_distribution = ranking_depth::ranking_depth_distribution(&input.ballots, num_candidates);

    Ok(ContestReport {
        quota,
        trace: outcome.trace,
        winners: outcome.winners,
        summaries: outcome.summaries,
        pairwise_preferences,
        first_alternate,
        first_to_final,
        ranking_distribution,
    })
}

fn validate(input: &ContestInput) -> Result<(), Error> {
    if input.seats.0 < 1 {
        return Err(Error::InvalidContest("seats must be at least 1".to_string()));
    }
    if input.candidates.is_empty() {
        return Err(Error::InvalidContest("candidate list is empty".to_string()));
    }
    if matches!(input.variant, Variant::Irv) && input.seats.0 > 1 {
        return Err(Error::InvalidContest("IRV does not support seats > 1; use an STV variant".to_string()));
    }
    // STV with seats == 1 is merely a warning (a caller may choose
    // to log it); the fractional and whole-ballot engines both run fine.
    for (ballot_index, ballot) in input.ballots.iter().enumerate() {
        for &candidate in &ballot.ranking {
            if candidate.0 >= input.candidates.len() {
                return Err(Error::InconsistentBallot { ballot_index, candidate });
            }
        }
    }
    Ok(())
}
