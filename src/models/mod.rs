// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data models: zoom blocks, their store, field edits and session state.

pub mod edit;
pub mod session;
pub mod store;
pub mod zoom_block;
