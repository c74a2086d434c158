// Copyright 2024-2026 RCV Core Contributors.
// This file is part of rcv-core.
// rcv-core is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// rcv-core is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with rcv-core.  If not, see <https://www.gnu.org/licenses/>.

//! Core tabulation and analytics engine for ranked-choice election reporting.
//!
//! Given canonicalized ranked ballots and a contest configuration, this
//! crate elects winners under Instant-Runoff Voting or Single Transferable
//! Vote (whole-ballot or fractional surplus transfer), produces a fully
//! reconstructible round-by-round trace, and computes the pairwise,
//! first-alternate, first-to-final and ranking-depth analytic tables.
//!
//! Jurisdiction-specific ballot parsing, report storage, and presentation
//! are all handled by callers; this crate only consumes the canonical
//! ballot form and produces [`report::ContestReport`].

pub mod candidate;
pub mod ballot;
pub mod contest;
pub mod quota;
pub mod transcript;
pub mod engine;
pub mod analytics;
pub mod report;
pub mod error;
pub mod tabulate;

pub use crate::error::Error;
pub use crate::tabulate::tabulate_contest;
