//! Integration tests: the example plugins registered on a host.

use gms_plugin::Host;
use gms_plugin::prelude::*;

async fn host() -> Host {
    let host = Host::new();
    let report = host
        .register_static("plugin-examples", plugin_examples::get_plugins())
        .await;
    assert_eq!(report.loaded, vec!["hello-world", "ui-kit"]);
    host
}

#[tokio::test]
async fn test_catalog_contains_builtin_and_plugin_components() {
    let host = host().await;
    let ids: Vec<String> = host
        .components()
        .list()
        .await
        .into_iter()
        .map(|c| c.id)
        .collect();

    assert_eq!(
        ids,
        vec!["alert", "badge", "button", "card", "container", "counter", "hello-world"]
    );
}

#[tokio::test]
async fn test_counter_round_trip_through_host() {
    let host = host().await;
    let counter = host.components().get("counter").await.unwrap();

    let vm = ComponentViewModel::new(
        "counter-3",
        "counter",
        vec![
            ComponentProperty::new("initialCount", "7", PropertyTier::LayoutOverride),
            ComponentProperty::new("initialCount", "2", PropertyTier::PageOverride),
        ],
        Vec::new(),
        false,
        "/pages/about",
    )
    .with_component_defaults(&counter);
    assert!(host.render(&vm).await.render().contains(">2</span>"));

    let result = host
        .dispatch(
            "counterUpdated",
            &hook_args! { "action" => json!("increment"), "count" => json!(2) },
        )
        .await;
    assert!(result.is_success());
    assert_eq!(result.outputs.len(), 1);
    assert_eq!(result.outputs[0].plugin_id, "hello-world");
    assert_eq!(result.outputs[0].value, json!({ "count": 3 }));
}

#[tokio::test]
async fn test_registering_examples_twice_changes_nothing() {
    let host = host().await;
    let before = host.components().count().await;

    let report = host
        .register_static("again", plugin_examples::get_plugins())
        .await;
    assert!(report.loaded.is_empty());
    assert_eq!(report.duplicates.len(), 2);
    assert_eq!(host.components().count().await, before);
    assert_eq!(host.hooks().handler_count("counterUpdated").await, 1);
}
