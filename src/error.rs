// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Errors raised by the ledger core.
//!
//! - [`Validation`] for malformed input, reported before anything changes.
//! - [`NotFound`] for references to unknown accounts, categories or ids.
//! - [`BackendUnavailable`] when the synced store rejects a write or a
//!   subscription. Optimistic cache changes are left in place.
//!
//!  [`Validation`]: LedgerError::Validation
//!  [`NotFound`]: LedgerError::NotFound
//!  [`BackendUnavailable`]: LedgerError::BackendUnavailable
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
    #[error("{entity} \"{id}\" not found")]
    NotFound { entity: &'static str, id: String },
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),
}

impl LedgerError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn backend(err: impl std::fmt::Display) -> Self {
        Self::BackendUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
