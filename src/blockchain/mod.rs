// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chain integration used by signup and screening.
//!
//! This module provides:
//! - EIP-55 checksummed address parsing
//! - The [`BalanceOracle`] capability and its JSON-RPC implementation

pub mod address;
pub mod client;

pub use address::{checksummed, parse_checksummed, AddressError};
pub use client::{format_ether, BalanceOracle, ChainClient, ChainClientError};
