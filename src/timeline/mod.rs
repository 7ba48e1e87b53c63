// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Time-to-transform mapping: which zoom block governs a given instant,
//! and what transform it produces.

pub mod resolver;
pub mod transform;
