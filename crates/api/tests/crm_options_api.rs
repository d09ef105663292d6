//! HTTP-level tests for the CRM option listings.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, FakeCrm, MemoryForms};
use serde_json::json;

#[tokio::test]
async fn lists_activity_types() {
    let app = build_test_app(Arc::new(FakeCrm::default()), Arc::new(MemoryForms::default()));

    let response = get(app, "/api/v1/crm/activity-types").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json["data"],
        json!([
            {"value": 1, "label": "Meeting"},
            {"value": 5, "label": "Event Registration"}
        ])
    );
}

#[tokio::test]
async fn lists_activity_statuses() {
    let app = build_test_app(Arc::new(FakeCrm::default()), Arc::new(MemoryForms::default()));

    let json = body_json(get(app, "/api/v1/crm/activity-statuses").await).await;

    assert_eq!(json["data"], json!([{"value": 2, "label": "Completed"}]));
}

#[tokio::test]
async fn crm_failure_yields_empty_lists() {
    let crm = Arc::new(FakeCrm {
        fail_catalog: true,
        ..Default::default()
    });

    for uri in ["/api/v1/crm/activity-types", "/api/v1/crm/activity-statuses"] {
        let app = build_test_app(crm.clone(), Arc::new(MemoryForms::default()));
        let response = get(app, uri).await;

        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert_eq!(body_json(response).await["data"], json!([]), "{uri}");
    }
}
