//! Setup flow tests

mod common;

use common::{credentials, object, Behavior, Harness, EMAIL, PASSWORD};
use hc_config_entries::ConfigEntries;
use hc_flow::{FlowError, FlowResultType, SchemaError};
use hc_storage::Storage;
use huggingchat_conversation::{translations, DOMAIN, ENTRY_TITLE, ERROR_INVALID_AUTH};
use serde_json::{json, Value};
use std::sync::Arc;

#[tokio::test]
async fn test_form_is_shown() {
    let harness = Harness::new(Behavior::Strict);

    let result = harness.manager.async_init(DOMAIN).await.unwrap();
    assert_eq!(result.result_type, FlowResultType::Form);
    assert_eq!(result.step_id.as_deref(), Some("user"));
    assert_eq!(result.errors, None);

    let schema = serde_json::to_value(&result.data_schema).unwrap();
    assert_eq!(
        schema,
        json!([
            {
                "name": "email",
                "required": true,
                "selector": {"text": {"type": "email", "autocomplete": "email", "multiline": false}}
            },
            {
                "name": "password",
                "required": true,
                "selector": {"text": {"type": "password", "autocomplete": "password", "multiline": false}}
            }
        ])
    );
    assert_eq!(harness.login.attempts(), 0);
}

#[tokio::test]
async fn test_valid_credentials_create_entry() {
    let harness = Harness::new(Behavior::Strict);
    let flow_id = harness.manager.async_init(DOMAIN).await.unwrap().flow_id;

    let result = harness
        .manager
        .async_configure(&flow_id, Some(credentials(EMAIL, PASSWORD)))
        .await
        .unwrap();

    assert_eq!(result.result_type, FlowResultType::CreateEntry);
    assert_eq!(result.title.as_deref(), Some(ENTRY_TITLE));
    assert_eq!(result.errors, None);
    assert_eq!(
        result.data.as_ref().map(|d| Value::Object(d.clone())),
        Some(credentials(EMAIL, PASSWORD))
    );

    let entries = harness.manager.entries().get_by_domain(DOMAIN);
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.title, ENTRY_TITLE);
    assert_eq!(Value::Object(entry.data.clone()), credentials(EMAIL, PASSWORD));
    assert!(entry.options.is_empty());
    assert_eq!(entry.version, 1);

    assert_eq!(harness.login.attempts(), 1);
    assert!(harness.manager.is_empty());
}

#[tokio::test]
async fn test_entry_is_persisted() {
    let harness = Harness::new(Behavior::Strict);
    let flow_id = harness.manager.async_init(DOMAIN).await.unwrap().flow_id;
    harness
        .manager
        .async_configure(&flow_id, Some(credentials(EMAIL, PASSWORD)))
        .await
        .unwrap();

    let reloaded = ConfigEntries::new(Arc::new(Storage::new(harness.config_dir())));
    reloaded.load().await.unwrap();
    let entries = reloaded.get_by_domain(DOMAIN);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].data, object(credentials(EMAIL, PASSWORD)));
}

#[tokio::test]
async fn test_rejected_credentials_show_invalid_auth() {
    let harness = Harness::new(Behavior::Strict);
    let flow_id = harness.manager.async_init(DOMAIN).await.unwrap().flow_id;

    let result = harness
        .manager
        .async_configure(&flow_id, Some(credentials(EMAIL, "wrong")))
        .await
        .unwrap();

    assert_eq!(result.result_type, FlowResultType::Form);
    assert_eq!(result.step_id.as_deref(), Some("user"));
    assert_eq!(result.base_error(), Some(ERROR_INVALID_AUTH));
    assert_eq!(result.errors.as_ref().map(|e| e.len()), Some(1));
    assert!(harness.manager.entries().is_empty());
    assert_eq!(harness.manager.len(), 1);
}

#[tokio::test]
async fn test_form_result_resolves_to_ui_strings() {
    let harness = Harness::new(Behavior::Strict);
    let flow_id = harness.manager.async_init(DOMAIN).await.unwrap().flow_id;
    let result = harness
        .manager
        .async_configure(&flow_id, Some(credentials(EMAIL, "wrong")))
        .await
        .unwrap();

    let step_id = result.step_id.as_deref().unwrap();
    for field in &result.data_schema {
        assert!(
            translations::field_label("config", step_id, &field.name).is_some(),
            "{}",
            field.name
        );
    }
    let code = result.base_error().unwrap();
    assert_eq!(
        translations::config_error(code),
        Some("Invalid authentication")
    );
}

#[tokio::test]
async fn test_every_failure_collapses_to_invalid_auth() {
    for behavior in [Behavior::Unreachable, Behavior::Crash] {
        let harness = Harness::new(behavior);
        let flow_id = harness.manager.async_init(DOMAIN).await.unwrap().flow_id;

        let result = harness
            .manager
            .async_configure(&flow_id, Some(credentials(EMAIL, PASSWORD)))
            .await
            .unwrap();

        assert_eq!(result.base_error(), Some(ERROR_INVALID_AUTH), "{:?}", behavior);
        assert!(harness.manager.entries().is_empty());
        assert_eq!(harness.login.attempts(), 1);
    }
}

#[tokio::test]
async fn test_repeated_failures_are_idempotent() {
    let harness = Harness::new(Behavior::Strict);
    let flow_id = harness.manager.async_init(DOMAIN).await.unwrap().flow_id;

    let mut results = Vec::new();
    for _ in 0..3 {
        let result = harness
            .manager
            .async_configure(&flow_id, Some(credentials("nobody@example.com", "pw")))
            .await
            .unwrap();
        results.push(serde_json::to_value(&result).unwrap());
    }

    assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(results[0]["errors"], json!({"base": "invalid_auth"}));
    assert!(harness.manager.entries().is_empty());
    // Each submission is its own attempt, no retries
    assert_eq!(harness.login.attempts(), 3);
}

#[tokio::test]
async fn test_retry_after_failure_succeeds() {
    let harness = Harness::new(Behavior::Strict);
    let flow_id = harness.manager.async_init(DOMAIN).await.unwrap().flow_id;

    let result = harness
        .manager
        .async_configure(&flow_id, Some(credentials(EMAIL, "typo")))
        .await
        .unwrap();
    assert_eq!(result.base_error(), Some(ERROR_INVALID_AUTH));

    let result = harness
        .manager
        .async_configure(&flow_id, Some(credentials(EMAIL, PASSWORD)))
        .await
        .unwrap();
    assert_eq!(result.result_type, FlowResultType::CreateEntry);
    assert_eq!(harness.manager.entries().len(), 1);
}

#[tokio::test]
async fn test_missing_password_rejected_by_schema() {
    let harness = Harness::new(Behavior::Strict);
    let flow_id = harness.manager.async_init(DOMAIN).await.unwrap().flow_id;

    let err = harness
        .manager
        .async_configure(&flow_id, Some(json!({"email": EMAIL})))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FlowError::InvalidData(SchemaError::Required(key)) if key == "password"
    ));
    assert_eq!(harness.login.attempts(), 0);
    assert!(harness.manager.entries().is_empty());
}

#[tokio::test]
async fn test_abandoned_flow() {
    let harness = Harness::new(Behavior::Strict);
    let flow_id = harness.manager.async_init(DOMAIN).await.unwrap().flow_id;

    harness.manager.async_abort(&flow_id).await.unwrap();
    let err = harness
        .manager
        .async_configure(&flow_id, Some(credentials(EMAIL, PASSWORD)))
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::UnknownFlow(_)));
    assert_eq!(harness.login.attempts(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_setup_flows() {
    let harness = Arc::new(Harness::new(Behavior::Strict));

    let mut handles = Vec::new();
    for password in [PASSWORD, "wrong", PASSWORD] {
        let harness = harness.clone();
        handles.push(tokio::spawn(async move {
            let flow_id = harness.manager.async_init(DOMAIN).await.unwrap().flow_id;
            harness
                .manager
                .async_configure(&flow_id, Some(credentials(EMAIL, password)))
                .await
                .unwrap()
                .result_type
        }));
    }

    let mut created = 0;
    for handle in handles {
        if handle.await.unwrap() == FlowResultType::CreateEntry {
            created += 1;
        }
    }
    assert_eq!(created, 2);
    assert_eq!(harness.manager.entries().len(), 2);
    assert_eq!(harness.manager.len(), 1);
}
