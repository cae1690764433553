//! Breed lookup providers
//!
//! A provider answers one question: which sub-breeds does a breed have?
//! - `dog_api`: remote provider backed by the dog.ceo REST API
//!
//! Every failure a provider can hit surfaces as [`BreedNotFound`]. Callers cannot
//! tell a missing breed apart from a network or parse failure.

pub mod dog_api;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub use dog_api::DogApiBreedProvider;

/// Ordered sub-breed names for one breed, as returned by the provider
pub type SubBreedList = Vec<String>;

/// The single error kind of the provider interface
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("breed not found: {breed} ({reason})")]
pub struct BreedNotFound {
    /// Breed name exactly as it was requested
    pub breed: String,
    /// Human readable cause, for logs only
    pub reason: String,
}

impl BreedNotFound {
    pub fn new(breed: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            breed: breed.into(),
            reason: reason.into(),
        }
    }
}

/// Source of sub-breed data
#[async_trait]
pub trait BreedProvider: Send + Sync {
    /// Fetch the sub-breeds of `breed`.
    ///
    /// Fails with [`BreedNotFound`] if the breed does not exist or if retrieval
    /// fails for any reason.
    async fn lookup(&self, breed: &str) -> Result<SubBreedList, BreedNotFound>;
}

#[async_trait]
impl<P: BreedProvider + ?Sized> BreedProvider for Arc<P> {
    async fn lookup(&self, breed: &str) -> Result<SubBreedList, BreedNotFound> {
        (**self).lookup(breed).await
    }
}

#[async_trait]
impl<'a, P: BreedProvider + ?Sized> BreedProvider for &'a P {
    async fn lookup(&self, breed: &str) -> Result<SubBreedList, BreedNotFound> {
        (**self).lookup(breed).await
    }
}

#[async_trait]
impl<P: BreedProvider + ?Sized> BreedProvider for Box<P> {
    async fn lookup(&self, breed: &str) -> Result<SubBreedList, BreedNotFound> {
        (**self).lookup(breed).await
    }
}
