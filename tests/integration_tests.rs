//! Integration tests for recourse
//!
//! These tests exercise the combinators together the way a service backend
//! composes them: algebra laws over ServiceResult, fallback chains built
//! from bridged operations, and resilience wrappers stacked on each other.

use recourse::{
    codes, combine, from_future, partition, retry_with_backoff, try_parallel, try_sequential,
    with_timeout, wrap_async, RetryConfig, ServiceError, ServiceResult,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;

fn provider_error(name: &str) -> ServiceError {
    ServiceError::new("PROVIDER_ERROR", format!("{name} unavailable"))
}

/// Route combinator events to stderr when RUST_LOG is set.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

// =============================================================================
// Result algebra laws
// =============================================================================

mod algebra {
    use super::*;

    fn double(n: i32) -> i32 {
        n * 2
    }

    #[test]
    fn predicates_agree_with_construction() {
        let ok: ServiceResult<i32> = Ok(7);
        let err: ServiceResult<i32> = Err(provider_error("openai"));
        assert!(ok.is_ok() && !ok.is_err());
        assert!(err.is_err() && !err.is_ok());
    }

    #[test]
    fn map_transforms_success_and_passes_failure_through() {
        let ok: ServiceResult<i32> = Ok(21);
        assert_eq!(ok.map(double).unwrap(), 42);

        let err: ServiceResult<i32> = Err(provider_error("openai"));
        let mut mapper_ran = false;
        let mapped = err.map(|n| {
            mapper_ran = true;
            double(n)
        });
        assert_eq!(mapped.unwrap_err().code, "PROVIDER_ERROR");
        assert!(!mapper_ran);
    }

    #[test]
    fn chaining_is_associative() {
        fn halve(n: i32) -> ServiceResult<i32> {
            if n % 2 == 0 {
                Ok(n / 2)
            } else {
                Err(ServiceError::new("ODD", "not divisible"))
            }
        }
        fn decrement(n: i32) -> ServiceResult<i32> {
            Ok(n - 1)
        }

        for input in [-4, 3, 0, 8, 13] {
            let start: ServiceResult<i32> = Ok(input);
            let left = start.clone().and_then(halve).and_then(decrement);
            let right = start.and_then(|n| halve(n).and_then(decrement));
            match (left, right) {
                (Ok(a), Ok(b)) => assert_eq!(a, b),
                (Err(a), Err(b)) => assert_eq!(a.code, b.code),
                other => panic!("associativity broken: {other:?}"),
            }
        }
    }

    #[test]
    fn combine_and_partition_compose_with_the_same_batch() {
        let batch = || -> Vec<ServiceResult<i32>> {
            vec![Ok(1), Err(provider_error("groq")), Ok(2)]
        };

        assert_eq!(combine(batch()).unwrap_err().code, "PROVIDER_ERROR");

        let partitioned = partition(batch());
        assert_eq!(partitioned.successes, vec![1, 2]);
        assert_eq!(partitioned.errors.len(), 1);
    }
}

// =============================================================================
// Provider fallback chains
// =============================================================================

mod fallback_chains {
    use super::*;
    use futures::future::BoxFuture;
    use futures::FutureExt;

    /// A provider call shaped like the real ones: bridged from anyhow code.
    async fn call_provider(name: &'static str, healthy: bool) -> ServiceResult<String> {
        wrap_async(|| async move {
            if healthy {
                Ok(format!("{name}: generated"))
            } else {
                anyhow::bail!("{name} returned 503")
            }
        })
        .await
    }

    #[tokio::test]
    async fn sequential_fallback_over_bridged_providers() {
        init_tracing();
        let operations: Vec<_> = [("openai", false), ("groq", false), ("anthropic", true)]
            .into_iter()
            .map(|(name, healthy)| move || call_provider(name, healthy))
            .collect();

        let result = try_sequential(operations).await;
        assert_eq!(result.unwrap(), "anthropic: generated");
    }

    #[tokio::test]
    async fn sequential_fallback_reports_every_provider_failure() {
        let operations: Vec<_> = [("openai", false), ("groq", false)]
            .into_iter()
            .map(|(name, healthy)| move || call_provider(name, healthy))
            .collect();

        let errors = try_sequential(operations).await.unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|err| err.code == codes::ASYNC_FUNCTION_ERROR));
    }

    #[tokio::test]
    async fn parallel_fallback_prefers_array_order() {
        // Heterogeneous closures go through boxed trait objects.
        type Operation = Box<dyn FnOnce() -> BoxFuture<'static, ServiceResult<String>>>;
        let operations: Vec<Operation> = vec![
            Box::new(|| call_provider("openai", true).boxed()),
            Box::new(|| call_provider("groq", true).boxed()),
        ];

        let result = try_parallel(operations).await;
        assert_eq!(result.unwrap(), "openai: generated");
    }
}

// =============================================================================
// Stacked resilience
// =============================================================================

mod resilience_stacks {
    use super::*;

    #[tokio::test]
    async fn retry_wrapping_a_timeout_recovers_from_slow_attempts() {
        init_tracing();
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();

        let result = retry_with_backoff(
            move || {
                let counter = counter.clone();
                async move {
                    let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    with_timeout(
                        async move {
                            // The first attempt stalls past the deadline.
                            if attempt == 1 {
                                sleep(Duration::from_millis(200)).await;
                            }
                            Ok("generated")
                        },
                        Duration::from_millis(40),
                    )
                    .await
                }
            },
            RetryConfig::default().with_base_delay_ms(5),
        )
        .await;

        assert_eq!(result.unwrap(), "generated");
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn exhausted_retry_of_timeouts_reports_the_timeout_as_last_error() {
        let result: ServiceResult<&str> = retry_with_backoff(
            || async {
                with_timeout(
                    async {
                        sleep(Duration::from_millis(100)).await;
                        Ok("never")
                    },
                    Duration::from_millis(10),
                )
                .await
            },
            RetryConfig::default()
                .with_max_attempts(2)
                .with_base_delay_ms(5),
        )
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.code, codes::MAX_RETRIES_EXCEEDED);
        let details = err.details.unwrap();
        assert_eq!(details["max_attempts"], 2);
        assert!(details["last_error"]
            .as_str()
            .unwrap()
            .contains(codes::OPERATION_TIMEOUT));
    }

    #[tokio::test]
    async fn timeout_bounds_a_whole_sequential_chain() {
        let start = Instant::now();
        let result: ServiceResult<u32> = with_timeout(
            async {
                let operations: Vec<_> = ["openai", "groq"]
                    .into_iter()
                    .map(|name| {
                        move || async move {
                            sleep(Duration::from_millis(100)).await;
                            Err::<u32, _>(provider_error(name))
                        }
                    })
                    .collect();
                try_sequential(operations)
                    .await
                    .map_err(|errors| provider_error(&format!("{} providers", errors.len())))
            },
            Duration::from_millis(40),
        )
        .await;

        assert_eq!(result.unwrap_err().code, codes::OPERATION_TIMEOUT);
        assert!(start.elapsed() < Duration::from_millis(200));
    }

    #[tokio::test]
    async fn bridged_future_feeds_retry() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();

        let result = retry_with_backoff(
            move || {
                let counter = counter.clone();
                async move {
                    let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    from_future(async move {
                        if attempt < 2 {
                            anyhow::bail!("transient network glitch")
                        }
                        Ok(attempt)
                    })
                    .await
                }
            },
            RetryConfig::default().with_base_delay_ms(5),
        )
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
