use thiserror::Error;

/// Conditions the review workflow reports inline rather than treating as
/// fatal. Every variant leaves store state untouched.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("no record found with reference `{reference}`")]
    ReferenceNotFound { reference: String },
    #[error("no bidding records available")]
    EmptyDataset,
}
