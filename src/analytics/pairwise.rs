// Copyright 2024-2026 RCV Core Contributors.
// This file is part of rcv-core.
// rcv-core is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// rcv-core is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with rcv-core.  If not, see <https://www.gnu.org/licenses/>.

//! The three pairwise-style analytic tables, all
//! computed from the canonical ballot set rather than the round trace,
//! except first-to-final which also needs the final eliminated set.

use crate::ballot::Ballot;
use crate::candidate::CandidateIndex;
use serde::{Deserialize, Serialize};

/// One cell of an analytic table: a numerator/denominator pair. `fraction`
/// is `numerator/denominator` when `denominator > 0`, else `0` — no
/// smoothing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub numerator: usize,
    pub denominator: usize,
}

impl Cell {
    pub fn fraction(&self) -> f64 {
        if self.denominator > 0 { self.numerator as f64 / self.denominator as f64 } else { 0.0 }
    }
}

/// Pairwise preferences `P`: square, candidate x candidate, diagonal zero.
/// Not symmetric: `P[A][B] + P[B][A]` need not equal
/// `denom[A][B]`, since ballots ranking neither A nor B are excluded from
/// that pair's denominator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PairwiseTable {
    pub rows: Vec<Vec<Cell>>,
}

impl PairwiseTable {
    pub fn get(&self, a: CandidateIndex, b: CandidateIndex) -> Cell { self.rows[a.0][b.0] }
}

/// First-alternate `F` / first-to-final `T`: rows are candidates, columns
/// are candidates plus a distinguished trailing Exhausted column at index
/// `num_candidates`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AllocateeTable {
    pub rows: Vec<Vec<Cell>>,
    pub num_candidates: usize,
}

impl AllocateeTable {
    pub fn candidate_cell(&self, a: CandidateIndex, c: CandidateIndex) -> Cell { self.rows[a.0][c.0] }
    pub fn exhausted_cell(&self, a: CandidateIndex) -> Cell { self.rows[a.0][self.num_candidates] }
}

/// Compute pairwise preferences P. For an ordered pair
/// (A,B), A != B: `denom[A][B]` counts ballots ranking at least one of A,
/// B; `num[A][B]` counts, within that denominator, ballots where A is
/// preferred (A ranked and B isn't, or both ranked and A comes first).
pub fn pairwise_preferences(ballots: &[Ballot], num_candidates: usize) -> PairwiseTable {
    let mut num = vec![vec![0usize; num_candidates]; num_candidates];
    let mut denom = vec![vec![0usize; num_candidates]; num_candidates];

    for ballot in ballots {
        let m = ballot.multiplicity;
        let mut rank_of: Vec<Option<usize>> = vec![None; num_candidates];
        for (i, c) in ballot.ranking.iter().enumerate() {
            rank_of[c.0] = Some(i);
        }
        for a in 0..num_candidates {
            for b in 0..num_candidates {
                if a == b { continue; }
                match (rank_of[a], rank_of[b]) {
                    (Some(ra), Some(rb)) => {
                        denom[a][b] += m;
                        if ra < rb { num[a][b] += m; }
                    }
                    (Some(_), None) => {
                        denom[a][b] += m;
                        num[a][b] += m;
                    }
                    (None, Some(_)) => {
                        denom[a][b] += m;
                    }
                    (None, None) => {}
                }
            }
        }
    }

    let rows = (0..num_candidates)
        .map(|a| (0..num_candidates).map(|b| Cell { numerator: num[a][b], denominator: denom[a][b] }).collect())
        .collect();
    PairwiseTable { rows }
}

/// Compute the first-alternate table F. For
/// first-choice candidate A, `num[A][c]` counts ballots whose second rank
/// is c; `num[A][Exhausted]` counts ballots with no resolvable second
/// rank. Every column's denominator in row A is the first-choice count
/// for A.
pub fn first_alternate(ballots: &[Ballot], num_candidates: usize) -> AllocateeTable {
    build_first_choice_table(ballots, num_candidates, |ballot| ballot.ranking.get(1).copied())
}

/// Compute the first-to-final table T. A ballot's "final" candidate
/// is the earliest ranked candidate not in `eliminated` (indexed by
/// [`CandidateIndex`], derived from the round trace's final
/// `round_eliminated` assignments); if every ranked candidate was
/// eliminated, the ballot is final-exhausted.
pub fn first_to_final(ballots: &[Ballot], num_candidates: usize, eliminated: &[bool]) -> AllocateeTable {
    build_first_choice_table(ballots, num_candidates, |ballot| {
        ballot.ranking.iter().copied().find(|c| !eliminated[c.0])
    })
}

fn build_first_choice_table(
    ballots: &[Ballot],
    num_candidates: usize,
    target_of: impl Fn(&Ballot) -> Option<CandidateIndex>,
) -> AllocateeTable {
    let cols = num_candidates + 1;
    let exhausted_col = num_candidates;
    let mut num = vec![vec![0usize; cols]; num_candidates];
    let mut first_count = vec![0usize; num_candidates];

    for ballot in ballots {
        let Some(first) = ballot.first_preference() else { continue };
        let m = ballot.multiplicity;
        first_count[first.0] += m;
        match target_of(ballot) {
            Some(target) => num[first.0][target.0] += m,
            None => num[first.0][exhausted_col] += m,
        }
    }

    let rows = (0..num_candidates)
        .map(|a| (0..cols).map(|c| Cell { numerator: num[a][c], denominator: first_count[a] }).collect())
        .collect();
    AllocateeTable { rows, num_candidates }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ballot::Ballot;

    fn c(i: usize) -> CandidateIndex { CandidateIndex(i) }

    fn s1_ballots() -> Vec<Ballot> {
        vec![
            Ballot::new(vec![c(0), c(1)], 40),       // Alice > Bob
            Ballot::new(vec![c(1), c(0)], 35),       // Bob > Alice
            Ballot::new(vec![c(2), c(0), c(1)], 25), // Carol > Alice > Bob
        ]
    }

    /// Pairwise fractions for a three-candidate contest with first-rank splits.
    #[test]
    fn scenario_s6_pairwise() {
        let table = pairwise_preferences(&s1_ballots(), 3);
        let ab = table.get(c(0), c(1));
        assert_eq!(100, ab.denominator);
        assert_eq!(65, ab.numerator);
        let ba = table.get(c(1), c(0));
        assert_eq!(100, ba.denominator);
        assert_eq!(35, ba.numerator);
        assert!((ab.fraction() - 0.65).abs() < 1e-12);
    }

    /// First-alternate table for a three-candidate contest with first-rank splits.
    #[test]
    fn scenario_s5_first_alternate() {
        let table = first_alternate(&s1_ballots(), 3);
        let alice = table.candidate_cell(c(0), c(1));
        assert_eq!(40, alice.denominator);
        assert_eq!(40, alice.numerator);
        assert_eq!(0, table.exhausted_cell(c(0)).numerator);

        let bob = table.candidate_cell(c(1), c(0));
        assert_eq!(35, bob.denominator);
        assert_eq!(35, bob.numerator);

        let carol = table.candidate_cell(c(2), c(0));
        assert_eq!(25, carol.denominator);
        assert_eq!(25, carol.numerator);
        assert_eq!(0, table.candidate_cell(c(2), c(1)).numerator);
        assert_eq!(0, table.exhausted_cell(c(2)).numerator);
    }

    /// F.denom[A][.] is identical across every column in row A.
    #[test]
    fn q9_first_alternate_denom_uniform_across_columns() {
        let table = first_alternate(&s1_ballots(), 3);
        for a in 0..3 {
            let denom_at = |col: usize| table.rows[a][col].denominator;
            let expected = denom_at(0);
            for col in 0..=3 {
                assert_eq!(expected, denom_at(col));
            }
        }
    }

    #[test]
    fn first_to_final_routes_through_eliminated_candidates() {
        // Carol > Alice > Bob, Carol eliminated -> final is Alice.
        let ballots = s1_ballots();
        let eliminated = vec![false, false, true]; // Carol (index 2) eliminated
        let table = first_to_final(&ballots, 3, &eliminated);
        let carol_row = table.candidate_cell(c(2), c(0));
        assert_eq!(25, carol_row.denominator);
        assert_eq!(25, carol_row.numerator);
    }

    #[test]
    fn first_to_final_exhausts_when_every_rank_eliminated() {
        let ballots = vec![Ballot::new(vec![c(0), c(1)], 10)];
        let eliminated = vec![true, true];
        let table = first_to_final(&ballots, 2, &eliminated);
        assert_eq!(10, table.exhausted_cell(c(0)).numerator);
    }

    #[test]
    fn pairwise_diagonal_is_zero() {
        let table = pairwise_preferences(&s1_ballots(), 3);
        for i in 0..3 {
            let cell = table.get(c(i), c(i));
            assert_eq!(0, cell.numerator);
            assert_eq!(0, cell.denominator);
        }
    }
}
