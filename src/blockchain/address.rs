// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EIP-55 checksummed address handling.

use alloy::primitives::Address;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("address must be a 0x-prefixed, 40 hex character string")]
    Malformed,

    #[error("address checksum does not match (EIP-55)")]
    BadChecksum,
}

/// Parse an address, accepting only its exact EIP-55 checksummed spelling.
///
/// All-lowercase or all-uppercase hex is rejected unless it happens to be the
/// checksummed form.
pub fn parse_checksummed(raw: &str) -> Result<Address, AddressError> {
    let raw = raw.trim();
    match Address::parse_checksummed(raw, None) {
        Ok(address) => Ok(address),
        Err(alloy::primitives::AddressError::InvalidChecksum) => Err(AddressError::BadChecksum),
        Err(_) => Err(AddressError::Malformed),
    }
}

/// Canonical string form used as storage and lock key.
pub fn checksummed(address: &Address) -> String {
    address.to_checksum(None)
}
