//! Reference classification catalog: models, storage trait, and the
//! cached resolver.

mod references_model;
mod references_service;
mod references_traits;


pub use references_model::{
    MintOutcome, NewReferenceEntry, ReferenceEntry, ReferenceView, Resolution,
};
pub use references_service::ReferenceResolver;
pub use references_traits::{ReferenceRepositoryTrait, ReferenceResolverTrait};
