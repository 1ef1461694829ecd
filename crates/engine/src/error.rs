//! Engine-boundary error model.

use thiserror::Error;

use rebill_core::DomainError;

use crate::ports::RepositoryError;

/// Everything a billing operation can fail with: a deterministic domain
/// failure or a repository failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BillingError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for BillingError {
    fn from(err: RepositoryError) -> Self {
        // Ledger-update closures surface domain failures through the
        // repository; keep them in the domain arm at this boundary.
        match err {
            RepositoryError::Domain(domain) => Self::Domain(domain),
            other => Self::Repository(other),
        }
    }
}
