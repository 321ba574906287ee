use async_trait::async_trait;

use super::ActivitySource;
use crate::error::Result;
use crate::models::ContributionsResponse;

/// Tries `primary`; a rejected token switches to `fallback`. Every other
/// error is returned as is.
pub struct FallbackSource {
    primary: Box<dyn ActivitySource>,
    fallback: Box<dyn ActivitySource>,
    name: String,
}

impl FallbackSource {
    pub fn new(primary: Box<dyn ActivitySource>, fallback: Box<dyn ActivitySource>) -> Self {
        let name = format!("{}+{}", primary.name(), fallback.name());
        Self {
            primary,
            fallback,
            name,
        }
    }
}

#[async_trait]
impl ActivitySource for FallbackSource {
    async fn fetch_activity(&self, username: &str, year: i32) -> Result<ContributionsResponse> {
        match self.primary.fetch_activity(username, year).await {
            Err(e) if e.is_auth_failure() => {
                tracing::warn!(
                    "{} authentication failed ({}), falling back to {} for public data",
                    self.primary.name(),
                    e,
                    self.fallback.name()
                );
                self.fallback.fetch_activity(username, year).await
            }
            other => other,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Scripted {
        name: &'static str,
        outcome: fn(&str) -> Result<ContributionsResponse>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ActivitySource for Scripted {
        async fn fetch_activity(&self, username: &str, _year: i32) -> Result<ContributionsResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.outcome)(username)
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    fn scripted(
        name: &'static str,
        outcome: fn(&str) -> Result<ContributionsResponse>,
    ) -> (Box<dyn ActivitySource>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = Scripted {
            name,
            outcome,
            calls: calls.clone(),
        };
        (Box::new(source), calls)
    }

    fn empty(_: &str) -> Result<ContributionsResponse> {
        Ok(ContributionsResponse::default())
    }

    #[tokio::test]
    async fn test_auth_failure_switches_to_fallback() {
        let (primary, primary_calls) =
            scripted("graphql", |_| Err(Error::AuthFailed("Bad credentials".to_string())));
        let (fallback, fallback_calls) = scripted("rest", empty);
        let source = FallbackSource::new(primary, fallback);

        assert!(source.fetch_activity("octocat", 2024).await.is_ok());
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
        assert_eq!(source.name(), "graphql+rest");
    }

    #[tokio::test]
    async fn test_other_errors_propagate() {
        let (primary, _) = scripted("graphql", |u| Err(Error::UserNotFound(u.to_string())));
        let (fallback, fallback_calls) = scripted("rest", empty);
        let source = FallbackSource::new(primary, fallback);

        let result = source.fetch_activity("ghost", 2024).await;
        assert!(matches!(result, Err(Error::UserNotFound(u)) if u == "ghost"));
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let (primary, _) = scripted("graphql", empty);
        let (fallback, fallback_calls) = scripted("rest", empty);
        let source = FallbackSource::new(primary, fallback);

        assert!(source.fetch_activity("octocat", 2024).await.is_ok());
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }
}
