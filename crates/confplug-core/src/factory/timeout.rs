//! Bounded resolution for async hosts

use std::sync::Arc;
use std::time::Duration;

use tokio::task;
use tokio::time;

use super::resolver::ProviderFactory;
use crate::error::{ResolutionError, ResolutionResult};
use crate::providers::{ConfigModel, ConfigProvider};

/// Resolve on the blocking pool, giving up after `limit`
///
/// Discovery and provider construction do file IO, so they run off the
/// async worker threads. On timeout the blocking task is left to finish on
/// its own; its result is discarded.
pub async fn resolve_with_timeout<M: ConfigModel>(
    factory: Arc<ProviderFactory>,
    contract_name: Option<String>,
    limit: Duration,
) -> ResolutionResult<Box<dyn ConfigProvider<M>>> {
    let handle = task::spawn_blocking(move || factory.resolve::<M>(contract_name.as_deref()));

    match time::timeout(limit, handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(ResolutionError::with_cause(
            format!("Resolution task for {} failed: {}", M::MODEL_NAME, join_err),
            join_err,
        )),
        Err(elapsed) => Err(ResolutionError::with_cause(
            format!(
                "Timed out resolving configuration provider for {} after {:?}",
                M::MODEL_NAME,
                limit
            ),
            elapsed,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{ProviderDescriptor, ProviderKind};
    use crate::providers::ProviderContext;
    use crate::settings::{keys, MemorySettings};
    use serde::Deserialize;
    use std::fs;
    use tempfile::tempdir;

    #[derive(Debug, Deserialize)]
    struct Settings {
        name: String,
    }

    impl ConfigModel for Settings {
        const MODEL_NAME: &'static str = "Settings";
    }

    fn factory_for(dir: &std::path::Path) -> ProviderFactory {
        let settings = Arc::new(
            MemorySettings::new()
                .with(keys::START_DIRECTORY, dir.to_string_lossy())
                .with(keys::RESOURCE_DIRECTORY, dir.to_string_lossy())
                .with("external-configuration-yaml", "app.yaml"),
        );
        ProviderFactory::new(settings)
    }

    #[tokio::test]
    async fn test_resolves_within_limit() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("app.yaml"), "name: async\n").unwrap();
        let factory = factory_for(dir.path());
        factory.register_descriptor(ProviderDescriptor::new("yaml").with_contract("yaml-cfg"));

        let provider = resolve_with_timeout::<Settings>(
            Arc::new(factory),
            Some("yaml-cfg".to_string()),
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        assert_eq!(provider.configuration().name, "async");
    }

    #[tokio::test]
    async fn test_errors_are_returned() {
        let dir = tempdir().unwrap();
        let factory = factory_for(dir.path());

        let result = resolve_with_timeout::<Settings>(Arc::new(factory), None, Duration::from_secs(5)).await;
        let err = result.err().expect("empty catalog should not resolve");
        assert!(err.message().starts_with("Error resolving configuration provider."));
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let dir = tempdir().unwrap();
        let factory = factory_for(dir.path());
        factory.register_descriptor(ProviderDescriptor::new("slow").with_contract("slow-cfg"));
        factory.register_kind(ProviderKind::<Settings>::new("slow", "unused", |ctx: ProviderContext| {
            std::thread::sleep(Duration::from_millis(500));
            let provider: Box<dyn ConfigProvider<Settings>> =
                Box::new(crate::providers::YamlConfigProvider::<Settings>::new(ctx)?);
            Ok(provider)
        }));

        let result = resolve_with_timeout::<Settings>(
            Arc::new(factory),
            Some("slow-cfg".to_string()),
            Duration::from_millis(20),
        )
        .await;

        let err = result.err().expect("slow provider should time out");
        assert!(err.message().starts_with("Timed out resolving configuration provider for Settings"));
        assert!(err.cause().is_some());
    }

    #[tokio::test]
    async fn test_panicking_provider_keeps_join_error() {
        let dir = tempdir().unwrap();
        let factory = factory_for(dir.path());
        factory.register_descriptor(ProviderDescriptor::new("panics").with_contract("panic-cfg"));
        factory.register_kind(ProviderKind::<Settings>::new("panics", "unused", |_ctx: ProviderContext| {
            panic!("provider constructor blew up")
        }));

        let result = resolve_with_timeout::<Settings>(
            Arc::new(factory),
            Some("panic-cfg".to_string()),
            Duration::from_secs(5),
        )
        .await;

        let err = result.err().expect("panicking provider should fail");
        assert!(err.message().starts_with("Resolution task for Settings failed"));
        let join_err = err.cause().and_then(|c| c.downcast_ref::<task::JoinError>());
        assert!(join_err.map_or(false, |e| e.is_panic()));
    }
}
