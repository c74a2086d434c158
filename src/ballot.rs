// Copyright 2024-2026 RCV Core Contributors.
// This file is part of rcv-core.
// rcv-core is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// rcv-core is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with rcv-core.  If not, see <https://www.gnu.org/licenses/>.

//! Ballot canonicalization: collapse identical rank sequences into a single
//! record with a multiplicity, and (for engines that need per-ballot
//! identity) expand that back into individually mutable runtime ballots.

use crate::candidate::CandidateIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A number representing a count of pieces of paper. Distinct from vote
/// tallies, which may be fractional in the fractional engine.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct BallotPaperCount(pub usize);

impl fmt::Display for BallotPaperCount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.0) }
}
impl fmt::Debug for BallotPaperCount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.0) }
}

/// A canonical ballot: an ordered, duplicate-free sequence of candidate
/// indices plus the number of physically identical ballots it represents.
///
/// Invariant: within one contest's ballot set, no two canonical ballots
/// share a rank sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub ranking: Vec<CandidateIndex>,
    pub multiplicity: usize,
}

impl Ballot {
    pub fn new(ranking: Vec<CandidateIndex>, multiplicity: usize) -> Self {
        Ballot { ranking, multiplicity }
    }

    /// Number of distinct candidates ranked on this ballot. The loader is
    /// assumed to have already dropped duplicate/invalid markings, so this
    /// equals the sequence length.
    pub fn depth(&self) -> usize { self.ranking.len() }

    pub fn first_preference(&self) -> Option<CandidateIndex> { self.ranking.first().copied() }
}

/// Build the canonical ballot set from raw per-ballot rank sequences
/// (already validated and deduplicated per-ballot by the upstream loader).
/// Ballots with an empty sequence are dropped.
///
/// Two physically identical ballots collapse into one [`Ballot`] with a
/// summed multiplicity; the multiset of sequences is preserved.
pub fn canonicalize(raw_sequences: impl IntoIterator<Item = Vec<CandidateIndex>>) -> Vec<Ballot> {
    let mut tally: HashMap<Vec<CandidateIndex>, usize> = HashMap::new();
    for seq in raw_sequences {
        if seq.is_empty() { continue; }
        *tally.entry(seq).or_insert(0) += 1;
    }
    let mut ballots: Vec<Ballot> = tally
        .into_iter()
        .map(|(ranking, multiplicity)| Ballot::new(ranking, multiplicity))
        .collect();
    // Deterministic ordering keeps downstream traces reproducible: the
    // *input* order shouldn't matter, but having a fixed canonical order
    // here means two runs from differently-ordered raw input produce
    // byte-identical output, which is the stronger determinism property
    // a caller diffing two reports actually wants.
    ballots.sort_by(|a, b| a.ranking.iter().map(|c| c.0).cmp(b.ranking.iter().map(|c| c.0)));
    ballots
}

/// A physical ballot being distributed, with mutable state independent of
/// any other physical ballot sharing the same canonical ranking. Used by
/// engines that need per-ballot identity (the fractional engine; the
/// whole-ballot engine instead keeps ballots implicitly identical within a
/// pile and only tracks counts).
#[derive(Clone, Debug)]
pub struct RuntimeBallot<'a> {
    pub ranking: &'a [CandidateIndex],
    /// Current fractional weight in [0, 1]. Fixed at 1.0 for engines that
    /// don't split ballots.
    pub weight: f64,
    /// Index into `ranking` of the first rank not yet consumed.
    pub cursor: usize,
}

impl<'a> RuntimeBallot<'a> {
    pub fn new(ranking: &'a [CandidateIndex]) -> Self {
        RuntimeBallot { ranking, weight: 1.0, cursor: 0 }
    }
}

/// Expand a canonicalized ballot set into one runtime ballot per physical
/// ballot: `(sequence, multiplicity=m)` becomes `m` runtime ballots sharing
/// the sequence but each with independently mutable weight/cursor. This is
/// a one-time allocation at the start of tabulation.
pub fn expand<'a>(ballots: &'a [Ballot]) -> Vec<RuntimeBallot<'a>> {
    let mut out = Vec::new();
    for b in ballots {
        for _ in 0..b.multiplicity {
            out.push(RuntimeBallot::new(&b.ranking));
        }
    }
    out
}

/// Total number of physical ballots represented by a canonical ballot set.
pub fn total_ballots(ballots: &[Ballot]) -> usize {
    ballots.iter().map(|b| b.multiplicity).sum()
}
