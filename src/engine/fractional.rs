// Copyright 2024-2026 RCV Core Contributors.
// This file is part of rcv-core.
// rcv-core is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// rcv-core is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with rcv-core.  If not, see <https://www.gnu.org/licenses/>.

//! Component C: the fractional round engine (weighted inclusive Gregory
//! STV). Unlike the whole-ballot engine, surplus is spread proportionally
//! across every ballot on the electee's pile, and elected candidates are
//! skipped (alongside eliminated ones) when a ballot's cursor advances, so
//! surplus can flow through several elected candidates in one hop.

use crate::ballot::{expand, total_ballots, BallotPaperCount, RuntimeBallot};
use crate::candidate::{Allocatee, Candidate, CandidateIndex};
use crate::contest::ContestInput;
use crate::engine::{round_cap, tie_break_by_name, Status};
use crate::error::Error;
use crate::quota::QuotaInfo;
use crate::transcript::{Allocation, CandidateSummary, EngineOutcome, Round, Tally, Transfer, TransferKind};
use std::collections::HashMap;

/// Tolerance for the end-of-tabulation conservation check: the sum of
/// all allocations, including Exhausted, must match the ballot count to
/// within `N * CONSERVATION_EPSILON`.
pub const CONSERVATION_EPSILON: f64 = 1e-6;

/// Tolerance used to treat two candidates' vote totals as tied when
/// picking the candidate to elect or eliminate (the tolerance is a
/// design parameter; this crate fixes it once here rather than making it
/// configurable).
const TIE_EPSILON: f64 = 1e-4;

#[derive(Clone, Copy, Debug, Default)]
pub struct FractionalOptions {
    /// Print one line per round (quota, elections, eliminations) to
    /// stdout, mirroring the whole-ballot engine's `emit_progress` and
    /// ConcreteSTV's `print_progress_to_stdout` convention.
    pub emit_progress: bool,
}

struct CandidateState {
    status: Status,
    votes: f64,
    first_round_votes: f64,
    transfer_votes: f64,
    round_elected: Option<usize>,
    round_eliminated: Option<usize>,
}

fn approx_eq(a: f64, b: f64) -> bool { (a - b).abs() < TIE_EPSILON }

/// Find the next rank on `ballot`, searching from `from` (inclusive),
/// whose candidate is still [`Status::Active`]. Both elected and
/// eliminated candidates are skipped uniformly: a ballot's vote should
/// flow past a candidate who no longer needs (or can use) more votes
/// exactly the same way it flows past one who can't use any (elected
/// candidates are skipped during cursor advancement exactly like
/// eliminated ones).
fn next_active(ballot: &RuntimeBallot, state: &[CandidateState], from: usize) -> Option<(usize, CandidateIndex)> {
    for i in from..ballot.ranking.len() {
        let c = ballot.ranking[i];
        if state[c.0].status == Status::Active {
            return Some((i, c));
        }
    }
    None
}

/// Run the fractional engine. `quota` is required for every fractional
/// tabulation (seats = 1 runs, with a caller-level warning, but the
/// quota is still well-defined and used).
pub fn tabulate(
    input: &ContestInput,
    quota: &QuotaInfo,
    options: &FractionalOptions,
) -> Result<EngineOutcome, Error> {
    let num_candidates = input.num_candidates();
    let seats = input.seats.0;
    let candidates: &[Candidate] = &input.candidates;
    let q = quota.quota as f64;

    // See the whole-ballot engine's comment: pile order must depend only
    // on ballot content, not caller-supplied ordering.
    let mut sorted_ballots = input.ballots.clone();
    sorted_ballots.sort_by(|a, b| a.ranking.cmp(&b.ranking));
    let mut ballots: Vec<RuntimeBallot> = expand(&sorted_ballots);
    let mut piles: Vec<Vec<usize>> = vec![Vec::new(); num_candidates];
    let mut exhausted_total: f64 = 0.0;
    let mut state: Vec<CandidateState> = (0..num_candidates)
        .map(|_| CandidateState {
            status: Status::Active,
            votes: 0.0,
            first_round_votes: 0.0,
            transfer_votes: 0.0,
            round_elected: None,
            round_eliminated: None,
        })
        .collect();

    // Initial allocation: every ballot starts at weight 1.0, cursor 0; at
    // round 1 no one is elected or eliminated, so "current choice" is just
    // the ballot's first rank.
    for (i, b) in ballots.iter_mut().enumerate() {
        b.cursor = 0;
        let c = b.ranking[0];
        piles[c.0].push(i);
        state[c.0].votes += 1.0;
        state[c.0].first_round_votes += 1.0;
    }

    if options.emit_progress {
        println!("Quota = {}", quota.quota);
    }

    let mut winners: Vec<CandidateIndex> = Vec::new();
    let mut trace: Vec<Round> = Vec::new();

    loop {
        if trace.len() >= round_cap(num_candidates) {
            return Err(Error::RoundCapExceeded { rounds_run: trace.len(), partial_trace: trace });
        }
        let remaining_seats = seats.saturating_sub(winners.len());
        if remaining_seats == 0 { break; }

        let continuing = ballots.len() as f64 - exhausted_total;
        let allocation = snapshot(&state, exhausted_total);

        let active: Vec<CandidateIndex> = (0..num_candidates)
            .filter(|&c| state[c].status == Status::Active)
            .map(CandidateIndex)
            .collect();
        if active.is_empty() { break; }

        let mut newly_elected: Vec<CandidateIndex> = Vec::new();
        let mut newly_eliminated: Vec<CandidateIndex> = Vec::new();
        let mut transfer_counts: HashMap<(CandidateIndex, Allocatee), (f64, TransferKind)> = HashMap::new();

        let over_quota: Vec<CandidateIndex> = active.iter().copied().filter(|&c| state[c.0].votes >= q).collect();
        if !over_quota.is_empty() {
            let elected = elect_highest(&over_quota, &state, candidates);
            let votes = state[elected.0].votes;
            let surplus = votes - q;
            let transfer_fraction = if votes > 0.0 { surplus / votes } else { 0.0 };
            if options.emit_progress {
                println!("Elected {} with {:.2} votes (quota {}, surplus {:.2})", candidates[elected.0].name, votes, quota.quota, surplus);
            }

            let pile = std::mem::take(&mut piles[elected.0]);
            for idx in pile {
                let ballot = &mut ballots[idx];
                let transferred = ballot.weight * transfer_fraction;
                ballot.weight -= transferred;
                match next_active(ballot, &state, ballot.cursor + 1) {
                    Some((i, next)) => {
                        ballot.cursor = i;
                        piles[next.0].push(idx);
                        state[next.0].votes += transferred;
                        state[next.0].transfer_votes += transferred;
                        record_transfer(&mut transfer_counts, elected, Allocatee::Candidate(next), transferred, TransferKind::Surplus);
                    }
                    None => {
                        ballot.cursor = ballot.ranking.len();
                        exhausted_total += transferred;
                        record_transfer(&mut transfer_counts, elected, Allocatee::Exhausted, transferred, TransferKind::Surplus);
                    }
                }
            }
            state[elected.0].votes = q; // pinned at quota once surplus is transferred.
            state[elected.0].status = Status::Elected;
            state[elected.0].round_elected = Some(trace.len());
            newly_elected.push(elected);
            winners.push(elected);
        } else {
            let elim = eliminate_lowest(&active, &state, candidates);
            state[elim.0].status = Status::Eliminated;
            state[elim.0].round_eliminated = Some(trace.len());
            newly_eliminated.push(elim);
            if options.emit_progress { println!("Eliminated {}", candidates[elim.0].name); }

            let pile = std::mem::take(&mut piles[elim.0]);
            for idx in pile {
                let ballot = &mut ballots[idx];
                let weight = ballot.weight;
                match next_active(ballot, &state, ballot.cursor + 1) {
                    Some((i, next)) => {
                        ballot.cursor = i;
                        piles[next.0].push(idx);
                        state[next.0].votes += weight;
                        state[next.0].transfer_votes += weight;
                        record_transfer(&mut transfer_counts, elim, Allocatee::Candidate(next), weight, TransferKind::Elimination);
                    }
                    None => {
                        ballot.cursor = ballot.ranking.len();
                        exhausted_total += weight;
                        record_transfer(&mut transfer_counts, elim, Allocatee::Exhausted, weight, TransferKind::Elimination);
                    }
                }
            }
            state[elim.0].votes = 0.0;
        }

        let mut round = Round {
            allocation,
            transfers: build_transfers(transfer_counts),
            newly_elected,
            newly_eliminated,
            continuing_ballots: BallotPaperCount(continuing.round() as usize),
        };
        round.sort_transfers();
        trace.push(round);

        // Early termination once remaining active candidates
        // drop to (or below) remaining seats.
        let remaining_seats_after = seats.saturating_sub(winners.len());
        if remaining_seats_after > 0 {
            let mut remaining_active: Vec<CandidateIndex> = (0..num_candidates)
                .filter(|&c| state[c].status == Status::Active)
                .map(CandidateIndex)
                .collect();
            if !remaining_active.is_empty() && remaining_active.len() <= remaining_seats_after {
                remaining_active.sort_by(|&a, &b| {
                    state[b.0].votes.partial_cmp(&state[a.0].votes).unwrap_or(std::cmp::Ordering::Equal)
                        .then_with(|| candidates[a.0].name.cmp(&candidates[b.0].name))
                });
                let final_round_index = trace.len();
                for &c in &remaining_active {
                    state[c.0].status = Status::Elected;
                    state[c.0].round_elected = Some(final_round_index);
                    winners.push(c);
                    if options.emit_progress { println!("Elected {} by default (remaining seats = remaining candidates)", candidates[c.0].name); }
                }
                trace.push(Round {
                    allocation: snapshot(&state, exhausted_total),
                    transfers: vec![],
                    newly_elected: remaining_active,
                    newly_eliminated: vec![],
                    continuing_ballots: BallotPaperCount((ballots.len() as f64 - exhausted_total).round() as usize),
                });
                break;
            }
        }
    }

    let n = total_ballots(&input.ballots) as f64;
    let total: f64 = state.iter().map(|s| s.votes).sum::<f64>() + exhausted_total;
    if n > 0.0 && (total - n).abs() >= CONSERVATION_EPSILON * n {
        return Err(Error::NumericInconsistency { expected: n, actual: total, tolerance: CONSERVATION_EPSILON * n });
    }

    let summaries: Vec<CandidateSummary> = (0..num_candidates)
        .map(|c| CandidateSummary {
            first_round_votes: Tally::Frac(state[c].first_round_votes),
            transfer_votes_received: Tally::Frac(state[c].transfer_votes),
            round_elected: state[c].round_elected,
            round_eliminated: state[c].round_eliminated,
            winner: state[c].status == Status::Elected,
        })
        .collect();

    Ok(EngineOutcome { trace, winners, summaries })
}

fn snapshot(state: &[CandidateState], exhausted_total: f64) -> Allocation {
    Allocation {
        candidate: state.iter().map(|s| Tally::Frac(s.votes)).collect(),
        exhausted: Tally::Frac(exhausted_total),
    }
}

fn elect_highest(over_quota: &[CandidateIndex], state: &[CandidateState], candidates: &[Candidate]) -> CandidateIndex {
    let max_votes = over_quota.iter().map(|c| state[c.0].votes).fold(f64::MIN, f64::max);
    let mut tied: Vec<CandidateIndex> = over_quota.iter().copied().filter(|c| approx_eq(state[c.0].votes, max_votes)).collect();
    tie_break_by_name(&mut tied, candidates);
    tied[0]
}

fn eliminate_lowest(active: &[CandidateIndex], state: &[CandidateState], candidates: &[Candidate]) -> CandidateIndex {
    let min_votes = active.iter().map(|c| state[c.0].votes).fold(f64::MAX, f64::min);
    let mut tied: Vec<CandidateIndex> = active.iter().copied().filter(|c| approx_eq(state[c.0].votes, min_votes)).collect();
    tie_break_by_name(&mut tied, candidates);
    tied[0]
}

fn record_transfer(
    transfer_counts: &mut HashMap<(CandidateIndex, Allocatee), (f64, TransferKind)>,
    from: CandidateIndex,
    to: Allocatee,
    amount: f64,
    kind: TransferKind,
) {
    let entry = transfer_counts.entry((from, to)).or_insert((0.0, kind));
    entry.0 += amount;
}

fn build_transfers(counts: HashMap<(CandidateIndex, Allocatee), (f64, TransferKind)>) -> Vec<Transfer> {
    counts
        .into_iter()
        .map(|((from, to), (count, kind))| Transfer { from, to, count: Tally::Frac(count), kind })
        .collect()
}
