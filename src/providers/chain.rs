//! Provider chains
//!
//! An ordered list of providers for one capability. Providers are tried in
//! order; unavailable ones are skipped, failures are logged and recorded,
//! and the first success wins.

use std::sync::Arc;

use super::provider::Provider;
use crate::error::{AuraError, Result};

/// Value produced by a chain, with the provider that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct ChainOutcome<T> {
    /// The produced value
    pub value: T,
    /// ID of the provider that succeeded
    pub provider: String,
    /// `"<id>: <reason>"` for every provider that was skipped or failed first
    pub failures: Vec<String>,
}

/// Ordered providers for one capability
pub struct ProviderChain<P: ?Sized> {
    capability: &'static str,
    providers: Vec<Arc<P>>,
}

impl<P: Provider + ?Sized> ProviderChain<P> {
    /// Create an empty chain
    pub fn new(capability: &'static str) -> Self {
        Self {
            capability,
            providers: Vec::new(),
        }
    }

    /// Append a provider to the end of the chain
    pub fn push(&mut self, provider: Arc<P>) {
        self.providers.push(provider);
    }

    /// Builder-style [`push`](Self::push)
    pub fn with(mut self, provider: Arc<P>) -> Self {
        self.push(provider);
        self
    }

    /// Number of providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// True when the chain has no providers
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Provider IDs in the order they are tried
    pub fn ids(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    /// Run `op` against each provider until one succeeds
    ///
    /// # Errors
    /// * `AllProvidersFailed` - If every provider was unavailable or failed
    pub fn run<T>(&self, mut op: impl FnMut(&P) -> Result<T>) -> Result<ChainOutcome<T>> {
        let mut failures = Vec::new();

        for provider in &self.providers {
            let id = provider.id().to_string();
            if !provider.is_available() {
                tracing::debug!(
                    capability = self.capability,
                    provider = %id,
                    "provider unavailable, skipping"
                );
                failures.push(format!("{}: unavailable", id));
                continue;
            }

            match op(provider.as_ref()) {
                Ok(value) => {
                    tracing::info!(
                        capability = self.capability,
                        provider = %id,
                        "provider succeeded"
                    );
                    return Ok(ChainOutcome {
                        value,
                        provider: id,
                        failures,
                    });
                }
                Err(err) => {
                    tracing::warn!(
                        capability = self.capability,
                        provider = %id,
                        error = %err,
                        "provider failed, trying next"
                    );
                    failures.push(format!("{}: {}", id, err));
                }
            }
        }

        Err(AuraError::AllProvidersFailed {
            capability: self.capability.to_string(),
            attempts: failures,
        })
    }
}

impl<P: ?Sized> Clone for ProviderChain<P> {
    fn clone(&self) -> Self {
        Self {
            capability: self.capability,
            providers: self.providers.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock::MockLyrics;
    use crate::providers::LyricsGenerator;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_success_wins() {
        let chain = ProviderChain::<dyn LyricsGenerator>::new("lyrics")
            .with(Arc::new(MockLyrics::failing("broken")))
            .with(Arc::new(MockLyrics::offline("offline")))
            .with(Arc::new(MockLyrics::returning("good", "la la la")))
            .with(Arc::new(MockLyrics::returning("never", "unused")));

        let outcome = chain.run(|p| p.generate_lyrics("sun", "pop")).unwrap();

        assert_eq!(outcome.value, "la la la");
        assert_eq!(outcome.provider, "good");
        assert_eq!(outcome.failures.len(), 2);
        assert!(outcome.failures[0].starts_with("broken: "));
        assert_eq!(outcome.failures[1], "offline: unavailable");
    }

    #[test]
    fn test_exhausted_chain_errors() {
        let chain = ProviderChain::<dyn LyricsGenerator>::new("lyrics")
            .with(Arc::new(MockLyrics::failing("a")))
            .with(Arc::new(MockLyrics::offline("b")));

        match chain.run(|p| p.generate_lyrics("sun", "pop")) {
            Err(AuraError::AllProvidersFailed {
                capability,
                attempts,
            }) => {
                assert_eq!(capability, "lyrics");
                assert_eq!(attempts.len(), 2);
            }
            other => panic!("expected AllProvidersFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_chain_errors() {
        let chain = ProviderChain::<dyn LyricsGenerator>::new("lyrics");
        assert!(chain.is_empty());
        assert!(chain.run(|p| p.generate_lyrics("x", "pop")).is_err());
    }

    #[test]
    fn test_ids_in_order() {
        let chain = ProviderChain::<dyn LyricsGenerator>::new("lyrics")
            .with(Arc::new(MockLyrics::returning("first", "")))
            .with(Arc::new(MockLyrics::returning("second", "")));
        assert_eq!(chain.ids(), vec!["first", "second"]);
        assert_eq!(chain.len(), 2);
    }
}
