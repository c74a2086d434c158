// Copyright 2024-2026 RCV Core Contributors.
// This file is part of rcv-core.
// rcv-core is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// rcv-core is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with rcv-core.  If not, see <https://www.gnu.org/licenses/>.

//! Candidate identity and the allocatee sentinel.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A candidate, referred to by position in the candidate table, 0 being first.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateIndex(pub usize);

// type alias really, don't want long display
impl fmt::Display for CandidateIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.0) }
}
// type alias really, don't want long display
impl fmt::Debug for CandidateIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "#{}", self.0) }
}

/// Represents a number of candidates, e.g. seats or remaining seats.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NumberOfCandidates(pub usize);

impl fmt::Display for NumberOfCandidates {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.0) }
}
impl fmt::Debug for NumberOfCandidates {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "#{}", self.0) }
}

/// Information about a candidate in the contest. The engine only consumes
/// [`CandidateIndex`]; everything here is for reporting.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    #[serde(default)]
    pub is_write_in: bool,
    /// A party or type label, for reporting only.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub party_or_type: Option<String>,
}

/// Every vote at every round belongs to exactly one allocatee: a candidate
/// or the distinguished Exhausted sentinel.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Allocatee {
    Candidate(CandidateIndex),
    Exhausted,
}

impl Allocatee {
    pub fn candidate(self) -> Option<CandidateIndex> {
        match self {
            Allocatee::Candidate(c) => Some(c),
            Allocatee::Exhausted => None,
        }
    }
}

impl fmt::Display for Allocatee {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Allocatee::Candidate(c) => write!(f, "{}", c),
            Allocatee::Exhausted => write!(f, "Exhausted"),
        }
    }
}

impl fmt::Debug for Allocatee {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Allocatee::Candidate(c) => write!(f, "{:?}", c),
            Allocatee::Exhausted => write!(f, "Exhausted"),
        }
    }
}
