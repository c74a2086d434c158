// Copyright 2024-2026 RCV Core Contributors.
// This file is part of rcv-core.
// rcv-core is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// rcv-core is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with rcv-core.  If not, see <https://www.gnu.org/licenses/>.

//! Component B: the whole-ballot round engine (IRV and Cambridge-style
//! STV). Candidates hold an ordered pile of runtime ballots; surplus
//! transfer moves the top (most-recently-received) `surplus` ballots off
//! an elected candidate's pile at full weight.

use crate::ballot::{expand, BallotPaperCount, RuntimeBallot};
use crate::candidate::{Allocatee, Candidate, CandidateIndex};
use crate::contest::{ContestInput, Variant};
use crate::engine::{round_cap, tie_break_by_name, Status};
use crate::error::Error;
use crate::quota::QuotaInfo;
use crate::transcript::{Allocation, CandidateSummary, EngineOutcome, Round, Tally, Transfer, TransferKind};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, Default)]
pub struct WholeBallotOptions {
    /// Print one line per round (quota, elections, eliminations) to
    /// stdout, mirroring ConcreteSTV's `PreferenceDistributor::print_progress_to_stdout`
    /// convention.
    pub emit_progress: bool,
}

struct CandidateState {
    status: Status,
    votes: usize,
    first_round_votes: usize,
    transfer_votes: usize,
    round_elected: Option<usize>,
    round_eliminated: Option<usize>,
}

/// Run the whole-ballot engine. `quota` must be `Some` for
/// [`Variant::WholeBallotStv`] and is ignored (majority is used instead)
/// for [`Variant::Irv`].
pub fn tabulate(
    input: &ContestInput,
    quota: Option<&QuotaInfo>,
    options: &WholeBallotOptions,
) -> Result<EngineOutcome, Error> {
    let num_candidates = input.num_candidates();
    let seats = input.seats.0;
    let is_irv = matches!(input.variant, Variant::Irv);
    let candidates: &[Candidate] = &input.candidates;

    // Sort by content before expanding: pile order determines which
    // physical ballots count as "top of pile" for Cambridge-convention
    // surplus selection, so that choice must depend only on ballot
    // content, never on the order the caller happened to list canonical
    // ballots in.
    let mut sorted_ballots = input.ballots.clone();
    sorted_ballots.sort_by(|a, b| a.ranking.cmp(&b.ranking));
    let mut ballots: Vec<RuntimeBallot> = expand(&sorted_ballots);
    let mut piles: Vec<Vec<usize>> = vec![Vec::new(); num_candidates];
    let mut exhausted_indices: Vec<usize> = Vec::new();
    let mut state: Vec<CandidateState> = (0..num_candidates)
        .map(|_| CandidateState {
            status: Status::Active,
            votes: 0,
            first_round_votes: 0,
            transfer_votes: 0,
            round_elected: None,
            round_eliminated: None,
        })
        .collect();

    // Initial allocation: at round 1 every candidate is active, so each
    // ballot's first rank is its first active preference.
    for (i, b) in ballots.iter_mut().enumerate() {
        b.cursor = 0;
        let c = b.ranking[0];
        piles[c.0].push(i);
    }
    for c in 0..num_candidates {
        state[c].votes = piles[c].len();
        state[c].first_round_votes = piles[c].len();
    }

    if options.emit_progress {
        if let Some(q) = quota { println!("Quota = {}", q.quota); }
    }

    let mut winners: Vec<CandidateIndex> = Vec::new();
    let mut trace: Vec<Round> = Vec::new();

    loop {
        if trace.len() >= round_cap(num_candidates) {
            return Err(Error::RoundCapExceeded { rounds_run: trace.len(), partial_trace: trace });
        }
        let remaining_seats = seats.saturating_sub(winners.len());
        if remaining_seats == 0 { break; }

        let exhausted_count = exhausted_indices.len();
        let continuing = ballots.len() - exhausted_count;
        let allocation = snapshot(&state, exhausted_count);

        let active: Vec<CandidateIndex> = (0..num_candidates)
            .filter(|&c| state[c].status == Status::Active)
            .map(CandidateIndex)
            .collect();
        if active.is_empty() { break; }

        let mut newly_elected: Vec<CandidateIndex> = Vec::new();
        let mut newly_eliminated: Vec<CandidateIndex> = Vec::new();
        let mut transfer_counts: HashMap<(CandidateIndex, Allocatee), (usize, TransferKind)> = HashMap::new();

        if is_irv {
            let winner = active.iter().copied().find(|&c| state[c.0].votes * 2 > continuing);
            match winner {
                Some(c) => {
                    state[c.0].status = Status::Elected;
                    state[c.0].round_elected = Some(trace.len());
                    newly_elected.push(c);
                    winners.push(c);
                    if options.emit_progress { println!("Elected {}", candidates[c.0].name); }
                }
                None => {
                    let elim = eliminate_one(&active, &mut state, candidates);
                    state[elim.0].round_eliminated = Some(trace.len());
                    newly_eliminated.push(elim);
                    if options.emit_progress { println!("Eliminated {}", candidates[elim.0].name); }
                    redistribute_pile(elim, &mut piles, &mut ballots, &mut state, &mut exhausted_indices, &mut transfer_counts, TransferKind::Elimination);
                }
            }
        } else {
            let q = quota.expect("whole-ballot STV requires a quota").quota as usize;
            let mut over_quota: Vec<CandidateIndex> = active.iter().copied().filter(|&c| state[c.0].votes >= q).collect();
            if !over_quota.is_empty() {
                over_quota.sort_by(|&a, &b| {
                    state[b.0].votes.cmp(&state[a.0].votes).then_with(|| candidates[a.0].name.cmp(&candidates[b.0].name))
                });
                for &c in &over_quota {
                    state[c.0].status = Status::Elected;
                    state[c.0].round_elected = Some(trace.len());
                    newly_elected.push(c);
                    winners.push(c);
                    if options.emit_progress { println!("Elected {} with {} votes (quota {})", candidates[c.0].name, state[c.0].votes, q); }
                }
                for &c in &over_quota {
                    let surplus = state[c.0].votes - q;
                    if surplus > 0 {
                        let take_from = piles[c.0].len() - surplus;
                        let moving: Vec<usize> = piles[c.0].split_off(take_from);
                        for idx in moving {
                            transfer_ballot(idx, c, TransferKind::Surplus, &mut ballots, &mut state, &mut piles, &mut exhausted_indices, &mut transfer_counts);
                        }
                    }
                    state[c.0].votes = q; // pinned at quota from election onward.
                }
            } else {
                let elim = eliminate_one(&active, &mut state, candidates);
                state[elim.0].round_eliminated = Some(trace.len());
                newly_eliminated.push(elim);
                if options.emit_progress { println!("Eliminated {}", candidates[elim.0].name); }
                redistribute_pile(elim, &mut piles, &mut ballots, &mut state, &mut exhausted_indices, &mut transfer_counts, TransferKind::Elimination);
            }
        }

        let mut round = Round {
            allocation,
            transfers: build_transfers(transfer_counts),
            newly_elected,
            newly_eliminated,
            continuing_ballots: BallotPaperCount(continuing),
        };
        round.sort_transfers();
        trace.push(round);

        // Fill remaining seats by default once the number of
        // remaining active candidates drops to (or below) remaining seats.
        let remaining_seats_after = seats.saturating_sub(winners.len());
        if remaining_seats_after > 0 {
            let mut remaining_active: Vec<CandidateIndex> = (0..num_candidates)
                .filter(|&c| state[c].status == Status::Active)
                .map(CandidateIndex)
                .collect();
            if !remaining_active.is_empty() && remaining_active.len() <= remaining_seats_after {
                remaining_active.sort_by(|&a, &b| {
                    state[b.0].votes.cmp(&state[a.0].votes).then_with(|| candidates[a.0].name.cmp(&candidates[b.0].name))
                });
                let final_round_index = trace.len();
                for &c in &remaining_active {
                    state[c.0].status = Status::Elected;
                    state[c.0].round_elected = Some(final_round_index);
                    winners.push(c);
                    if options.emit_progress { println!("Elected {} by default (remaining seats = remaining candidates)", candidates[c.0].name); }
                }
                let exhausted_count = exhausted_indices.len();
                trace.push(Round {
                    allocation: snapshot(&state, exhausted_count),
                    transfers: vec![],
                    newly_elected: remaining_active,
                    newly_eliminated: vec![],
                    continuing_ballots: BallotPaperCount(ballots.len() - exhausted_count),
                });
                break;
            }
        }
    }

    let summaries: Vec<CandidateSummary> = (0..num_candidates)
        .map(|c| CandidateSummary {
            first_round_votes: Tally::Int(state[c].first_round_votes as i64),
            transfer_votes_received: Tally::Int(state[c].transfer_votes as i64),
            round_elected: state[c].round_elected,
            round_eliminated: state[c].round_eliminated,
            winner: state[c].status == Status::Elected,
        })
        .collect();

    Ok(EngineOutcome { trace, winners, summaries })
}

fn snapshot(state: &[CandidateState], exhausted_count: usize) -> Allocation {
    Allocation {
        candidate: state.iter().map(|s| Tally::Int(s.votes as i64)).collect(),
        exhausted: Tally::Int(exhausted_count as i64),
    }
}

fn eliminate_one(active: &[CandidateIndex], state: &mut [CandidateState], candidates: &[Candidate]) -> CandidateIndex {
    let min_votes = active.iter().map(|c| state[c.0].votes).min().expect("active non-empty");
    let mut tied: Vec<CandidateIndex> = active.iter().copied().filter(|c| state[c.0].votes == min_votes).collect();
    tie_break_by_name(&mut tied, candidates);
    let elim = tied[0];
    state[elim.0].status = Status::Eliminated;
    elim
}

fn redistribute_pile(
    elim: CandidateIndex,
    piles: &mut [Vec<usize>],
    ballots: &mut [RuntimeBallot],
    state: &mut [CandidateState],
    exhausted_indices: &mut Vec<usize>,
    transfer_counts: &mut HashMap<(CandidateIndex, Allocatee), (usize, TransferKind)>,
    kind: TransferKind,
) {
    let pile = std::mem::take(&mut piles[elim.0]);
    state[elim.0].votes = 0;
    for idx in pile {
        transfer_ballot(idx, elim, kind, ballots, state, piles, exhausted_indices, transfer_counts);
    }
}

fn transfer_ballot(
    idx: usize,
    from: CandidateIndex,
    kind: TransferKind,
    ballots: &mut [RuntimeBallot],
    state: &mut [CandidateState],
    piles: &mut [Vec<usize>],
    exhausted_indices: &mut Vec<usize>,
    transfer_counts: &mut HashMap<(CandidateIndex, Allocatee), (usize, TransferKind)>,
) {
    let ballot = &mut ballots[idx];
    let mut landed: Option<CandidateIndex> = None;
    for i in (ballot.cursor + 1)..ballot.ranking.len() {
        let c = ballot.ranking[i];
        if state[c.0].status == Status::Active {
            ballot.cursor = i;
            landed = Some(c);
            break;
        }
    }
    let to = match landed {
        Some(c) => {
            piles[c.0].push(idx);
            state[c.0].votes += 1;
            state[c.0].transfer_votes += 1;
            Allocatee::Candidate(c)
        }
        None => {
            ballot.cursor = ballot.ranking.len();
            exhausted_indices.push(idx);
            Allocatee::Exhausted
        }
    };
    let entry = transfer_counts.entry((from, to)).or_insert((0, kind));
    entry.0 += 1;
}

fn build_transfers(counts: HashMap<(CandidateIndex, Allocatee), (usize, TransferKind)>) -> Vec<Transfer> {
    counts
        .into_iter()
        .map(|((from, to), (count, kind))| Transfer { from, to, count: Tally::Int(count as i64), kind })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ballot::Ballot;
    use crate::candidate::NumberOfCandidates;
    use crate::quota::droop_quota;

    fn candidate(name: &str) -> Candidate { Candidate { name: name.into(), is_write_in: false, party_or_type: None } }

    /// IRV, seats=1.
    #[test]
    fn scenario_s1_irv() {
        let input = ContestInput {
            candidates: vec![candidate("Alice"), candidate("Bob"), candidate("Carol")],
            ballots: vec![
                Ballot::new(vec![CandidateIndex(0), CandidateIndex(1)], 40),
                Ballot::new(vec![CandidateIndex(1), CandidateIndex(0)], 35),
                Ballot::new(vec![CandidateIndex(2), CandidateIndex(0), CandidateIndex(1)], 25),
            ],
            seats: NumberOfCandidates(1),
            variant: Variant::Irv,
            quota_ballot_count: None,
        };
        let outcome = tabulate(&input, None, &WholeBallotOptions::default()).unwrap();
        assert_eq!(2, outcome.trace.len());
        let r0 = &outcome.trace[0];
        assert_eq!(Tally::Int(40), r0.allocation.candidate[0]);
        assert_eq!(Tally::Int(35), r0.allocation.candidate[1]);
        assert_eq!(Tally::Int(25), r0.allocation.candidate[2]);
        assert_eq!(vec![CandidateIndex(2)], r0.newly_eliminated);

        let r1 = &outcome.trace[1];
        assert_eq!(Tally::Int(65), r1.allocation.candidate[0]);
        assert_eq!(Tally::Int(35), r1.allocation.candidate[1]);
        assert_eq!(1, r1.transfers.len());
        assert_eq!(Tally::Int(25), r1.transfers[0].count);
        assert_eq!(Allocatee::Candidate(CandidateIndex(0)), r1.transfers[0].to);

        assert_eq!(vec![CandidateIndex(0)], outcome.winners);
    }

    /// Whole-ballot STV, seats=2, all ballots identical A>B>C>D (full surplus chain).
    #[test]
    fn scenario_s2_full_surplus_chain() {
        let input = ContestInput {
            candidates: vec![candidate("A"), candidate("B"), candidate("C"), candidate("D")],
            ballots: vec![Ballot::new(vec![CandidateIndex(0), CandidateIndex(1), CandidateIndex(2), CandidateIndex(3)], 10)],
            seats: NumberOfCandidates(2),
            variant: Variant::WholeBallotStv,
            quota_ballot_count: None,
        };
        let quota = droop_quota(10, input.seats);
        assert_eq!(4, quota.quota);
        let outcome = tabulate(&input, Some(&quota), &WholeBallotOptions::default()).unwrap();
        assert_eq!(vec![CandidateIndex(0), CandidateIndex(1)], outcome.winners);
        assert_eq!(2, outcome.trace.len());
        assert_eq!(Tally::Int(6), outcome.trace[1].allocation.candidate[1]);
    }

    /// Two candidates reach quota in the same round.
    #[test]
    fn scenario_s3_simultaneous_election() {
        let input = ContestInput {
            candidates: vec![candidate("A"), candidate("B"), candidate("C")],
            ballots: vec![
                Ballot::new(vec![CandidateIndex(0), CandidateIndex(1), CandidateIndex(2)], 5),
                Ballot::new(vec![CandidateIndex(1), CandidateIndex(0), CandidateIndex(2)], 5),
                Ballot::new(vec![CandidateIndex(2), CandidateIndex(0), CandidateIndex(1)], 2),
            ],
            seats: NumberOfCandidates(2),
            variant: Variant::WholeBallotStv,
            quota_ballot_count: None,
        };
        let quota = droop_quota(12, input.seats);
        assert_eq!(5, quota.quota);
        let outcome = tabulate(&input, Some(&quota), &WholeBallotOptions::default()).unwrap();
        assert_eq!(1, outcome.trace.len());
        assert_eq!(vec![CandidateIndex(0), CandidateIndex(1)], outcome.winners);
        assert!(outcome.trace[0].transfers.is_empty());
    }

    /// Every ballot bullet-votes a distinct candidate among <= seats
    /// candidates: all seated in one round with no transfers.
    #[test]
    fn boundary_b2_bullet_votes_fill_all_seats() {
        let input = ContestInput {
            candidates: vec![candidate("A"), candidate("B"), candidate("C")],
            ballots: vec![
                Ballot::new(vec![CandidateIndex(0)], 3),
                Ballot::new(vec![CandidateIndex(1)], 3),
                Ballot::new(vec![CandidateIndex(2)], 3),
            ],
            seats: NumberOfCandidates(3),
            variant: Variant::WholeBallotStv,
            quota_ballot_count: None,
        };
        let quota = droop_quota(9, input.seats);
        let outcome = tabulate(&input, Some(&quota), &WholeBallotOptions::default()).unwrap();
        assert_eq!(1, outcome.trace.len());
        assert!(outcome.trace[0].transfers.is_empty());
        let mut winners = outcome.winners.clone();
        winners.sort();
        assert_eq!(vec![CandidateIndex(0), CandidateIndex(1), CandidateIndex(2)], winners);
    }
}
