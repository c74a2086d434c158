// Copyright 2024-2026 RCV Core Contributors.
// This file is part of rcv-core.
// rcv-core is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// rcv-core is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with rcv-core.  If not, see <https://www.gnu.org/licenses/>.

//! Ballot-level analytics (components D and E): pairwise preferences,
//! first-alternate, first-to-final, and ranking-depth distribution. All
//! computed from the canonical ballot set, honoring multiplicity; see
//! [`pairwise`] and [`ranking_depth`].

pub mod pairwise;
pub mod ranking_depth;
