//! Tests for exception handling through a locked manager

mod support;

use faultline_common::{AggregateError, ConvertHandler, ErrorKind, ExceptionHandler, RaisedError};
use faultline_policy::{
    ExceptionManager, FallbackRule, KindMismatchError, ManagerConfig, Policy,
    PolicyGroupBuilder, PolicyMatchingStrategy, PolicyMissingError, PolicyMissingRule,
    PolicyRegistry, PolicySnapshot, RethrowOriginalRule, UnconfiguredRule,
};
use proptest::prelude::*;
use std::sync::Arc;
use support::*;

/// Appends `TAG` to a service error, to observe step order
#[derive(Default)]
struct Stamp<const TAG: char>;

impl<const TAG: char> ExceptionHandler for Stamp<TAG> {
    type Source = ServiceUnavailable;
    type Target = ServiceUnavailable;

    fn handle(&self, source: ServiceUnavailable) -> ServiceUnavailable {
        ServiceUnavailable(format!("{}{}", source.0, TAG))
    }
}

fn manager_with(groups: Vec<faultline_policy::PolicyGroup>) -> ExceptionManager {
    let mut registry = PolicyRegistry::new();
    for group in groups {
        registry.add_policy_group(group).expect("distinct kinds");
    }
    registry.lock_and_create_manager(None, None)
}

fn raised(manager: &ExceptionManager, error: RaisedError, context: Option<&str>) -> RaisedError {
    manager
        .handle(error, context)
        .expect_err("handle always raises")
}

#[test]
fn test_single_step_translation() {
    let manager = manager_with(vec![convert_group::<StorageError, ServiceUnavailable>()]);

    let result = raised(&manager, StorageError("volume".into()).into(), None);
    assert_eq!(
        message_of::<ServiceUnavailable>(&result),
        Some("service unavailable: from storage: volume".to_string())
    );
}

#[test]
fn test_multi_step_chain_runs_in_declared_order() {
    let group = PolicyGroupBuilder::<StorageError, ServiceUnavailable>::create(|chain| {
        chain
            .start::<ConvertHandler<StorageError, ServiceUnavailable>>()
            .then::<Stamp<'b'>>()
            .then::<Stamp<'c'>>()
            .then_complete::<Stamp<'d'>>()
    })
    .expect("valid chain");
    let manager = manager_with(vec![group]);

    let result = raised(&manager, StorageError("x".into()).into(), None);
    assert_eq!(
        result.downcast_ref::<ServiceUnavailable>().map(|e| e.0.as_str()),
        Some("from storage: xbcd")
    );
}

#[test]
fn test_specialized_error_is_generalized_before_the_chain() {
    let manager = manager_with(vec![convert_group::<StorageError, ServiceUnavailable>()]);

    let result = raised(&manager, DiskFull("/var".into()).into(), None);
    assert_eq!(
        result.downcast_ref::<ServiceUnavailable>().map(|e| e.0.as_str()),
        Some("from storage: disk /var")
    );
}

#[test]
fn test_context_selects_the_labeled_chain() {
    let manager = manager_with(vec![labeled_group::<StorageError>(&["audit"])]);

    let labeled = raised(&manager, StorageError("s".into()).into(), Some("audit"));
    assert_eq!(
        labeled.downcast_ref::<UserFacing>().map(|e| e.0.as_str()),
        Some("storage: s")
    );

    let unlabeled = raised(&manager, StorageError("s".into()).into(), Some("other"));
    assert_eq!(
        unlabeled.downcast_ref::<UserFacing>().map(|e| e.0.as_str()),
        Some("plain s")
    );
}

#[test]
fn test_missing_policy_raises_policy_missing_error() {
    let manager = manager_with(vec![convert_group::<StorageError, ServiceUnavailable>()]);

    let result = raised(&manager, Unconfigured.into(), Some("web"));
    let missing = result
        .downcast::<PolicyMissingError>()
        .ok()
        .expect("policy missing");

    assert_eq!(missing.kind(), ErrorKind::of::<Unconfigured>());
    assert_eq!(missing.context(), Some("web"));
    assert_eq!(
        missing.to_string(),
        "no exception policy configured for `Unconfigured` in context \"web\""
    );
    assert!(missing.into_source().is::<Unconfigured>());
}

#[test]
fn test_authoritative_group_without_fallback_raises_policy_missing() {
    let labeled_only = PolicyGroupBuilder::<StorageError, ServiceUnavailable>::create(|chain| {
        chain
            .set_context("web")
            .start_and_complete::<ConvertHandler<StorageError, ServiceUnavailable>>()
    })
    .expect("valid chain");
    let manager = manager_with(vec![
        labeled_only,
        convert_group::<AppError, ServiceUnavailable>(),
    ]);

    let result = raised(&manager, DiskFull("d".into()).into(), None);
    assert!(result
        .downcast_ref::<PolicyMissingError>()
        .is_some_and(|e| e.kind() == ErrorKind::of::<DiskFull>()));
}

#[test]
fn test_single_child_aggregate_is_unwrapped_before_matching() {
    let manager = manager_with(vec![convert_group::<StorageError, ServiceUnavailable>()]);
    let aggregate = AggregateError::new("task failed", [RaisedError::new(StorageError("inner".into()))]);

    let result = raised(&manager, aggregate.into(), None);
    assert!(result.is::<ServiceUnavailable>());
}

#[test]
fn test_unwrapped_error_reaches_the_unconfigured_rule() {
    let manager = manager_with(Vec::new());
    let aggregate = AggregateError::new("task failed", [RaisedError::new(Unconfigured)]);

    let result = raised(&manager, aggregate.into(), None);
    assert!(result
        .downcast_ref::<PolicyMissingError>()
        .is_some_and(|e| e.kind() == ErrorKind::of::<Unconfigured>()));
}

#[test]
fn test_multi_child_aggregate_is_matched_as_aggregate() {
    let manager = manager_with(vec![convert_group::<StorageError, ServiceUnavailable>()]);
    let aggregate = AggregateError::new(
        "tasks failed",
        [
            RaisedError::new(StorageError("a".into())),
            RaisedError::new(StorageError("b".into())),
        ],
    );

    let result = raised(&manager, aggregate.into(), None);
    assert!(result
        .downcast_ref::<PolicyMissingError>()
        .is_some_and(|e| e.kind() == ErrorKind::of::<AggregateError>()));
}

#[test]
fn test_aggregate_unwrapping_can_be_disabled() {
    let mut registry = PolicyRegistry::new();
    registry
        .add_policy_group(convert_group::<StorageError, ServiceUnavailable>())
        .expect("registration");
    let config = ManagerConfig {
        unwrap_aggregates: false,
        ..ManagerConfig::default()
    };
    let manager = registry.lock_and_create_manager_with(config, None, None);
    let aggregate = AggregateError::new("task failed", [RaisedError::new(StorageError("inner".into()))]);

    let result = raised(&manager, aggregate.into(), None);
    assert!(result.is::<PolicyMissingError>());
}

#[test]
fn test_rethrow_original_rule_passes_error_through() {
    let mut registry = PolicyRegistry::new();
    let manager = registry.lock_and_create_manager(Some(Arc::new(RethrowOriginalRule)), None);

    let result = raised(&manager, Timeout(30).into(), Some("poll"));
    assert_eq!(result.downcast_ref::<Timeout>().map(|e| e.0), Some(30));
}

#[test]
fn test_configured_fallback_rule_applies_without_explicit_rule() {
    let mut registry = PolicyRegistry::new();
    let config = ManagerConfig {
        fallback: FallbackRule::RethrowOriginal,
        ..ManagerConfig::default()
    };
    let manager = registry.lock_and_create_manager_with(config, None, None);

    let result = raised(&manager, Unconfigured.into(), None);
    assert!(result.is::<Unconfigured>());
}

/// Wraps every unmatched error in a service error
struct Degrade;

impl UnconfiguredRule for Degrade {
    fn apply(&self, error: RaisedError, context: Option<&str>) -> RaisedError {
        ServiceUnavailable(format!("{error} ({})", context.unwrap_or("-"))).into()
    }
}

#[test]
fn test_custom_rule_receives_error_and_context() {
    let mut registry = PolicyRegistry::new();
    let manager = registry.lock_and_create_manager(Some(Arc::new(Degrade)), None);

    let result = raised(&manager, Unconfigured.into(), Some("job"));
    assert_eq!(
        result.downcast_ref::<ServiceUnavailable>().map(|e| e.0.as_str()),
        Some("nobody handles this (job)")
    );
}

#[test]
fn test_empty_context_is_treated_as_unset() {
    let manager = manager_with(Vec::new());

    let result = raised(&manager, Unconfigured.into(), Some(""));
    assert!(result
        .downcast_ref::<PolicyMissingError>()
        .is_some_and(|e| e.context().is_none()));
}

#[test]
fn test_handle_always_propagates_with_question_mark() {
    fn caller(manager: &ExceptionManager) -> Result<u32, RaisedError> {
        manager.handle_error(StorageError("q".into()), None)?;
        Ok(0)
    }

    let manager = manager_with(vec![convert_group::<StorageError, ServiceUnavailable>()]);
    let result = caller(&manager);
    assert!(result.is_err_and(|e| e.is::<ServiceUnavailable>()));
}

/// Hands every error the policy registered for `AppError`, related or not
struct AlwaysApp;

impl PolicyMatchingStrategy for AlwaysApp {
    fn match_policy<'a>(
        &self,
        snapshot: &'a PolicySnapshot,
        _kind: ErrorKind,
        context: Option<&str>,
    ) -> Option<&'a Policy> {
        snapshot.group(ErrorKind::of::<AppError>())?.select(context)
    }
}

#[test]
fn test_unreachable_kind_raises_kind_mismatch() {
    let manager = ExceptionManager::with_parts(
        [convert_group::<AppError, ServiceUnavailable>()],
        Arc::new(PolicyMissingRule),
        Arc::new(AlwaysApp),
    )
    .expect("distinct kinds");

    let result = raised(&manager, Unconfigured.into(), None);
    let mismatch = result.downcast_ref::<KindMismatchError>();
    assert_eq!(mismatch.map(KindMismatchError::expected), Some(ErrorKind::of::<AppError>()));
    assert_eq!(mismatch.map(KindMismatchError::found), Some(ErrorKind::of::<Unconfigured>()));
}

#[test]
fn test_manager_new_rejects_duplicate_kinds() {
    let result = ExceptionManager::new([
        convert_group::<Timeout, ServiceUnavailable>(),
        convert_group::<Timeout, ServiceUnavailable>(),
    ]);
    assert!(result.is_err());
}

#[test]
fn test_concurrent_handle_on_shared_manager() {
    let manager = manager_with(vec![
        convert_group::<StorageError, ServiceUnavailable>(),
        convert_group::<NetworkError, ServiceUnavailable>(),
    ]);

    std::thread::scope(|scope| {
        for worker in 0..8u64 {
            let manager = &manager;
            scope.spawn(move || {
                for round in 0..100u64 {
                    let storage = raised(manager, StorageError(format!("{worker}")).into(), None);
                    assert!(storage.is::<ServiceUnavailable>());

                    let network = raised(manager, Timeout(round).into(), Some("poll"));
                    assert_eq!(
                        network.downcast_ref::<ServiceUnavailable>().map(|e| e.0.clone()),
                        Some(format!("from network: timed out after {round}ms"))
                    );

                    let missing = raised(manager, Unconfigured.into(), None);
                    assert!(missing.is::<PolicyMissingError>());
                }
            });
        }
    });
}

#[test]
fn test_clones_share_the_snapshot() {
    let manager = manager_with(vec![convert_group::<StorageError, ServiceUnavailable>()]);
    let clone = manager.clone();
    assert!(std::ptr::eq(manager.snapshot(), clone.snapshot()));
}

proptest! {
    #[test]
    fn test_empty_registry_always_reports_missing_policy(context in proptest::option::of(".{0,12}")) {
        let manager = manager_with(Vec::new());

        let result = raised(&manager, Unconfigured.into(), context.as_deref());
        let missing = result.downcast_ref::<PolicyMissingError>();
        prop_assert!(missing.is_some());

        let expected = context.as_deref().filter(|label| !label.is_empty());
        prop_assert_eq!(missing.and_then(PolicyMissingError::context), expected);
    }

    #[test]
    fn test_translation_ignores_unknown_contexts(context in "[a-z]{1,10}") {
        prop_assume!(context != "audit");
        let manager = manager_with(vec![labeled_group::<StorageError>(&["audit"])]);

        let result = raised(&manager, StorageError("p".into()).into(), Some(&context));
        prop_assert_eq!(
            result.downcast_ref::<UserFacing>().map(|e| e.0.clone()),
            Some("plain p".to_string())
        );
    }
}
