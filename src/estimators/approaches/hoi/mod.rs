// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

// Higher-order interactions: multiplet enumeration, leave-one-out indexing,
// batched O-information and the engine driving them over a size range.

pub mod combinations;
pub mod engine;
pub mod indexer;
pub mod oinfo;
