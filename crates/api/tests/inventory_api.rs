//! HTTP-level tests for materials, stock movements, the movement log and
//! the dashboard, driven through the full router on the in-process gateway.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use common::{
    body_json, body_text, confirm, create_material, delete, get, get_as, post_json, put_json,
    send, vinyl_roll, ADMIN, STAFF, VIEWER,
};
use serde_json::json;

use printshop_api::state::AppState;
use printshop_core::confirm::ConfirmationGate;
use printshop_core::gateway::memory::MemoryGateway;
use printshop_core::gateway::{GatewayError, InventoryGateway, NewMaterialLog, StockUpdate};
use printshop_core::ledger::Ledger;
use printshop_core::material::{Material, MaterialInput, MaterialLog};
use printshop_core::types::DbId;

const MATERIALS: &str = "/api/v1/inventory/materials";

fn movements(id: i64) -> String {
    format!("{MATERIALS}/{id}/movements")
}

// ---------------------------------------------------------------------------
// Identity and permissions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_without_actor_is_unauthorized() {
    let (app, _) = common::build_test_app();
    let response = send(&app, Method::POST, MATERIALS, None, Some(vinyl_roll())).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn viewer_cannot_create_material() {
    let (app, _) = common::build_test_app();
    let response = post_json(&app, MATERIALS, VIEWER, vinyl_roll()).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("manage_stock"));
}

// ---------------------------------------------------------------------------
// Materials
// ---------------------------------------------------------------------------

#[tokio::test]
async fn created_roll_gets_square_meter_unit_and_opening_log() {
    let (app, state) = common::build_test_app();
    let material = create_material(&app, vinyl_roll()).await;

    assert_eq!(material["unit"], "ตร.ม.");
    assert_eq!(material["remaining_qty"], 10.0);
    assert_eq!(material["is_deleted"], false);

    let snapshot = state.ledger.snapshot().await;
    let opening = snapshot.logs.first().expect("opening log");
    assert_eq!(opening.note, "เพิ่มใหม่");
    assert_eq!(opening.action_by, "Nok");
}

#[tokio::test]
async fn blank_name_is_rejected() {
    let (app, _) = common::build_test_app();
    let mut body = vinyl_roll();
    body["name"] = json!("   ");

    let response = post_json(&app, MATERIALS, STAFF, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn edit_keeps_quantities() {
    let (app, _) = common::build_test_app();
    let material = create_material(&app, vinyl_roll()).await;
    let id = material["id"].as_i64().unwrap();

    let mut body = vinyl_roll();
    body["name"] = json!("Vinyl 1.2m gloss");
    body["remaining_qty"] = json!(999.0);
    let response = put_json(&app, &format!("{MATERIALS}/{id}"), STAFF, body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["name"], "Vinyl 1.2m gloss");
    assert_eq!(updated["remaining_qty"], 10.0);
}

#[tokio::test]
async fn list_puts_out_of_stock_first_and_filters_by_category() {
    let (app, _) = common::build_test_app();
    for (name, category, remaining) in [
        ("Vinyl A", "vinyl", 50.0),
        ("Vinyl B", "vinyl", 0.0),
        ("Vinyl C", "vinyl", 3.0),
        ("Sticker", "sticker", 0.0),
        ("Ink", "ink", 9.0),
    ] {
        create_material(
            &app,
            json!({
                "name": name,
                "category": category,
                "type": "piece",
                "remaining_qty": remaining,
                "min_alert": 5.0,
                "cost_per_unit": 2.0
            }),
        )
        .await;
    }

    let response = get(&app, &format!("{MATERIALS}?category=vinyl")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    let names: Vec<&str> = data["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Vinyl B", "Vinyl C", "Vinyl A"]);
    assert_eq!(data["totals"]["stock_value"], 106.0);
}

// ---------------------------------------------------------------------------
// Stock movements
// ---------------------------------------------------------------------------

#[tokio::test]
async fn roll_receipt_uses_width_times_length() {
    let (app, _) = common::build_test_app();
    let id = create_material(&app, vinyl_roll()).await["id"].as_i64().unwrap();

    let response = post_json(&app, &movements(id), STAFF, json!({"kind": "IN", "length": 5.0})).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let log = body_json(response).await["data"].clone();
    assert_eq!(log["action_type"], "IN");
    assert_eq!(log["qty_change"], 6.0);
    assert_eq!(log["current_qty_snapshot"], 16.0);
    assert_eq!(log["length_used"], 5.0);
    assert!(log["note"].as_str().unwrap().ends_with("(รับ 5ม. x 1.2ม.)"));
}

#[tokio::test]
async fn over_issue_is_rejected_without_writing() {
    let (app, state) = common::build_test_app();
    let id = create_material(&app, vinyl_roll()).await["id"].as_i64().unwrap();

    let response = post_json(&app, &movements(id), STAFF, json!({"kind": "OUT", "length": 20.0})).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "INSUFFICIENT_STOCK");

    let materials = state.ledger.fetch_materials().await.unwrap();
    assert_eq!(materials[0].remaining_qty, 10.0);
    assert_eq!(state.ledger.snapshot().await.logs.len(), 1);
}

#[tokio::test]
async fn zero_length_is_a_validation_error() {
    let (app, _) = common::build_test_app();
    let id = create_material(&app, vinyl_roll()).await["id"].as_i64().unwrap();

    let response = post_json(&app, &movements(id), STAFF, json!({"kind": "OUT", "length": 0})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "specify length");
}

#[tokio::test]
async fn large_movement_waits_for_confirmation() {
    let (app, state) = common::build_test_app();
    let id = create_material(&app, vinyl_roll()).await["id"].as_i64().unwrap();

    // 1.2 x 100 = 120 m², above the 100 threshold.
    let response = post_json(&app, &movements(id), STAFF, json!({"kind": "IN", "length": 100.0})).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let pending = body_json(response).await["data"].clone();
    assert_eq!(pending["requested_by"], "Nok");

    // Nothing written yet.
    let materials = state.ledger.fetch_materials().await.unwrap();
    assert_eq!(materials[0].remaining_qty, 10.0);

    let response = confirm(&app, pending["id"].as_str().unwrap(), STAFF).await;
    assert_eq!(response.status(), StatusCode::OK);
    let outcome = body_json(response).await["data"].clone();
    assert_eq!(outcome["action"], "stock_moved");
    assert_eq!(outcome["result"]["current_qty_snapshot"], 130.0);
}

#[tokio::test]
async fn movement_on_unknown_material_is_not_found() {
    let (app, _) = common::build_test_app();
    let response = post_json(&app, &movements(404), STAFF, json!({"kind": "IN", "qty": 1})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Soft delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_is_confirmed_then_hidden_and_not_repeatable() {
    let (app, state) = common::build_test_app();
    let id = create_material(&app, vinyl_roll()).await["id"].as_i64().unwrap();

    let response = delete(&app, &format!("{MATERIALS}/{id}"), STAFF).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let pending = body_json(response).await["data"].clone();
    assert!(pending["message"].as_str().unwrap().contains("Vinyl 1.2m"));

    let response = confirm(&app, pending["id"].as_str().unwrap(), ADMIN).await;
    assert_eq!(response.status(), StatusCode::OK);
    let outcome = body_json(response).await["data"].clone();
    assert_eq!(outcome["action"], "material_deleted");
    assert_eq!(outcome["result"]["current_qty_snapshot"], 10.0);
    assert_eq!(outcome["result"]["note"], "ลบรายการ");

    let list = body_json(get(&app, MATERIALS).await).await;
    assert!(list["data"]["items"].as_array().unwrap().is_empty());

    let response = delete(&app, &format!("{MATERIALS}/{id}"), STAFF).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(state.ledger.snapshot().await.logs.len(), 2);
}

#[tokio::test]
async fn confirming_twice_is_not_found() {
    let (app, _) = common::build_test_app();
    let id = create_material(&app, vinyl_roll()).await["id"].as_i64().unwrap();

    let pending = body_json(delete(&app, &format!("{MATERIALS}/{id}"), STAFF).await).await;
    let confirmation = pending["data"]["id"].as_str().unwrap().to_string();

    assert_eq!(confirm(&app, &confirmation, STAFF).await.status(), StatusCode::OK);
    assert_eq!(
        confirm(&app, &confirmation, STAFF).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn declined_delete_changes_nothing() {
    let (app, _) = common::build_test_app();
    let id = create_material(&app, vinyl_roll()).await["id"].as_i64().unwrap();

    let pending = body_json(delete(&app, &format!("{MATERIALS}/{id}"), STAFF).await).await;
    let confirmation = pending["data"]["id"].as_str().unwrap().to_string();

    let response = send(
        &app,
        Method::POST,
        &format!("/api/v1/confirmations/{confirmation}/decline"),
        Some(STAFF),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let list = body_json(get(&app, MATERIALS).await).await;
    assert_eq!(list["data"]["items"].as_array().unwrap().len(), 1);
    let pending = body_json(get_as(&app, "/api/v1/confirmations", STAFF).await).await;
    assert!(pending["data"].as_array().unwrap().is_empty());
}

/// In-process gateway whose next soft delete fails once.
struct FlakyDeletes {
    inner: Arc<MemoryGateway>,
    fail_next_delete: AtomicBool,
}

#[async_trait]
impl InventoryGateway for FlakyDeletes {
    async fn list_materials(&self) -> Result<Vec<Material>, GatewayError> {
        self.inner.list_materials().await
    }

    async fn find_material(&self, id: DbId) -> Result<Option<Material>, GatewayError> {
        self.inner.find_material(id).await
    }

    async fn create_material(
        &self,
        input: &MaterialInput,
        opening: &NewMaterialLog,
    ) -> Result<(Material, MaterialLog), GatewayError> {
        self.inner.create_material(input, opening).await
    }

    async fn update_material(
        &self,
        id: DbId,
        input: &MaterialInput,
    ) -> Result<Option<Material>, GatewayError> {
        self.inner.update_material(id, input).await
    }

    async fn apply_movement(
        &self,
        id: DbId,
        stock: &StockUpdate,
        log: &NewMaterialLog,
    ) -> Result<Option<MaterialLog>, GatewayError> {
        self.inner.apply_movement(id, stock, log).await
    }

    async fn soft_delete_material(
        &self,
        id: DbId,
        log: &NewMaterialLog,
    ) -> Result<Option<MaterialLog>, GatewayError> {
        if self.fail_next_delete.swap(false, Ordering::SeqCst) {
            return Err(GatewayError::new("connection reset"));
        }
        self.inner.soft_delete_material(id, log).await
    }

    async fn recent_logs(&self, limit: i64) -> Result<Vec<MaterialLog>, GatewayError> {
        self.inner.recent_logs(limit).await
    }
}

#[tokio::test]
async fn failed_confirmation_stays_parked_for_retry() {
    let memory = Arc::new(MemoryGateway::new());
    let flaky = Arc::new(FlakyDeletes {
        inner: memory.clone(),
        fail_next_delete: AtomicBool::new(true),
    });
    let state = AppState {
        ledger: Arc::new(Ledger::new(flaky)),
        catalog: memory,
        confirmations: Arc::new(ConfirmationGate::new()),
        config: Arc::new(common::test_config()),
        pool: None,
    };
    let app = common::build_app_from(state);
    let id = create_material(&app, vinyl_roll()).await["id"].as_i64().unwrap();

    let pending = body_json(delete(&app, &format!("{MATERIALS}/{id}"), STAFF).await).await;
    let confirmation = pending["data"]["id"].as_str().unwrap().to_string();

    let response = confirm(&app, &confirmation, STAFF).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let listed = body_json(get_as(&app, "/api/v1/confirmations", STAFF).await).await;
    assert_eq!(listed["data"][0]["id"], confirmation.as_str());

    let response = confirm(&app, &confirmation, STAFF).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["action"], "material_deleted");

    let listed = body_json(get_as(&app, "/api/v1/confirmations", STAFF).await).await;
    assert!(listed["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn viewer_cannot_confirm_a_delete() {
    let (app, _) = common::build_test_app();
    let id = create_material(&app, vinyl_roll()).await["id"].as_i64().unwrap();

    let pending = body_json(delete(&app, &format!("{MATERIALS}/{id}"), STAFF).await).await;
    let confirmation = pending["data"]["id"].as_str().unwrap().to_string();

    assert_eq!(confirm(&app, &confirmation, VIEWER).await.status(), StatusCode::FORBIDDEN);

    let list = body_json(get(&app, MATERIALS).await).await;
    assert_eq!(list["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(confirm(&app, &confirmation, STAFF).await.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Movement log and export
// ---------------------------------------------------------------------------

#[tokio::test]
async fn log_page_joins_names_newest_first() {
    let (app, _) = common::build_test_app();
    let id = create_material(&app, vinyl_roll()).await["id"].as_i64().unwrap();
    post_json(&app, &movements(id), STAFF, json!({"kind": "IN", "length": 5.0})).await;

    let response = get(&app, "/api/v1/inventory/logs").await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await["data"].clone();

    assert_eq!(page["total_items"], 2);
    assert_eq!(page["page"], 1);
    assert_eq!(page["total_pages"], 1);
    assert_eq!(page["pages"], json!([1]));
    assert_eq!(page["items"][0]["action_type"], "IN");
    assert_eq!(page["items"][0]["material_name"], "Vinyl 1.2m");

    let response = get(&app, "/api/v1/inventory/logs?search=nothing-matches&page=7").await;
    let page = body_json(response).await["data"].clone();
    assert_eq!(page["total_items"], 0);
    assert_eq!(page["page"], 1);
}

#[tokio::test]
async fn export_is_csv_with_bom() {
    let (app, _) = common::build_test_app();
    create_material(&app, vinyl_roll()).await;

    let response = get(&app, "/api/v1/inventory/logs/export").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert!(response.headers()["content-disposition"]
        .to_str()
        .unwrap()
        .contains("stock_logs.csv"));

    let text = body_text(response).await;
    assert!(text.starts_with('\u{feff}'));
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("\"Vinyl 1.2m\""));
}

#[tokio::test]
async fn export_of_nothing_is_rejected() {
    let (app, _) = common::build_test_app();
    let response = get(&app, "/api/v1/inventory/logs/export").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "no data");
}

// ---------------------------------------------------------------------------
// Dashboard and report
// ---------------------------------------------------------------------------

#[tokio::test]
async fn weekly_dashboard_sums_todays_movements() {
    let (app, _) = common::build_test_app();
    let id = create_material(&app, vinyl_roll()).await["id"].as_i64().unwrap();
    post_json(&app, &movements(id), STAFF, json!({"kind": "OUT", "length": 5.0})).await;

    let response = get(&app, "/api/v1/inventory/dashboard?period=week").await;
    assert_eq!(response.status(), StatusCode::OK);
    let report = body_json(response).await["data"].clone();

    assert_eq!(report["summary"]["total_materials"], 1);
    assert_eq!(report["summary"]["total_out"], 6.0);
    assert_eq!(report["summary"]["low_stock_count"], 1);
    assert_eq!(report["top_movers"][0]["material_name"], "Vinyl 1.2m");
}

#[tokio::test]
async fn inverted_custom_range_is_rejected() {
    let (app, _) = common::build_test_app();
    let response = get(
        &app,
        "/api/v1/inventory/dashboard?period=custom&start=2026-03-10&end=2026-03-01",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn printable_report_names_org_and_issuer() {
    let (app, _) = common::build_test_app();
    create_material(&app, vinyl_roll()).await;

    let response = send(
        &app,
        Method::GET,
        "/api/v1/inventory/dashboard/report?period=month",
        Some(ADMIN),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let html = body_text(response).await;
    assert!(html.contains("ร้านพิมพ์ทดสอบ"));
    assert!(html.contains("Somchai"));
}

#[tokio::test]
async fn stock_report_groups_active_materials() {
    let (app, _) = common::build_test_app();
    create_material(&app, vinyl_roll()).await;
    create_material(
        &app,
        json!({
            "name": "Cyan ink",
            "category": "หมึกพิมพ์",
            "type": "piece",
            "remaining_qty": 0.0,
            "unit": "ขวด"
        }),
    )
    .await;

    let response = send(&app, Method::GET, "/api/v1/inventory/report", Some(STAFF), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("รายงานวัสดุ"));
    let vinyl = html.find("Vinyl 1.2m").unwrap();
    let ink = html.find("Cyan ink").unwrap();
    assert!(vinyl < ink);
    assert!(html.contains("หมดแล้ว"));
    assert!(html.contains("Nok"));
}
