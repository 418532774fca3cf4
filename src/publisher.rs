//! Metadata publisher seam.
//!
//! The real publisher uploads breed metadata to a content-addressed store
//! and is an external collaborator; the engine only needs "given a breed,
//! obtain a URI or fail". Any failure means the mint does not complete.

use crate::errors::PublishError;
use crate::selector::Breed;

/// Resolve a metadata URI for a selected breed.
pub trait MetadataPublisher {
    fn publish(&self, breed: Breed) -> Result<String, PublishError>;
}

/// Publisher backed by a fixed table of pre-uploaded URIs, one per breed.
#[derive(Debug, Clone)]
pub struct StaticUriPublisher {
    uris: Vec<String>,
}

/// Pinned metadata CIDs for the three breeds, already on the network.
const DEFAULT_TOKEN_URIS: [&str; 3] = [
    "ipfs://QmTWcebDtejAzUbrgL6PAUgL9bbdeXtqb1XW31vUpWPX5F",
    "ipfs://QmYC9kBHtv7LVyaRLUSjM6iykhF42SkVtuxyYt4FG82psS",
    "ipfs://Qmf2QWbJWTmckeaENjPk3zqZrh7H4AuGdBRjXLiPVPFisK",
];

impl StaticUriPublisher {
    /// Serve URIs from the given table, indexed by breed.
    pub fn new(uris: Vec<String>) -> Self {
        Self { uris }
    }
}

impl Default for StaticUriPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_URIS.iter().map(|s| s.to_string()).collect())
    }
}

impl MetadataPublisher for StaticUriPublisher {
    fn publish(&self, breed: Breed) -> Result<String, PublishError> {
        self.uris
            .get(breed.index())
            .cloned()
            .ok_or(PublishError::MissingUri(breed.index()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serves_a_uri_per_breed() {
        let publisher = StaticUriPublisher::default();
        for breed in [Breed::Pug, Breed::ShibaInu, Breed::StBernard] {
            let uri = publisher.publish(breed).unwrap();
            assert!(uri.starts_with("ipfs://"));
        }
    }

    #[test]
    fn fails_when_table_is_short() {
        let publisher = StaticUriPublisher::new(vec!["ipfs://only-pug".into()]);
        assert_eq!(publisher.publish(Breed::Pug).unwrap(), "ipfs://only-pug");
        assert_eq!(
            publisher.publish(Breed::StBernard),
            Err(PublishError::MissingUri(2))
        );
    }
}
