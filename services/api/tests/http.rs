use std::sync::Arc;

use api_lib::web::{router, state::AppState};
use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use nestuity_core::domain::{
    BabyId, BabyProduct, BabyProfile, Frequency, PriceHistoryItem, ProductId, ReminderRange,
    ReminderRecord, ReminderType,
};
use nestuity_core::ports::{BackendService, PortError, PortResult};
use nestuity_core::sizing::SizeTable;
use serde_json::{json, Value};
use tower::util::ServiceExt;

/// Serves fixed data for baby 1 and product 1, and fails for ID 500.
struct FakeBackend;

fn reminder(id: i64, kind: ReminderType, range: ReminderRange) -> ReminderRecord {
    ReminderRecord {
        id,
        baby_id: Some(1),
        kind,
        frequency: Frequency::Once,
        range,
        title: format!("reminder {id}"),
        description: None,
        completed_on: None,
        next_due: None,
        user_created: false,
    }
}

#[async_trait]
impl BackendService for FakeBackend {
    async fn upcoming_reminders(&self, baby_id: BabyId) -> PortResult<Vec<ReminderRecord>> {
        match baby_id {
            1 => Ok(vec![
                reminder(1, ReminderType::Task, ReminderRange::Today),
                reminder(2, ReminderType::Vaccination, ReminderRange::Overdue),
                reminder(3, ReminderType::Task, ReminderRange::Completed),
                reminder(4, ReminderType::Vaccination, ReminderRange::UpcomingWeek),
                reminder(5, ReminderType::Task, ReminderRange::Future),
            ]),
            500 => Err(PortError::Unexpected("connection refused".to_string())),
            _ => Err(PortError::NotFound(format!("Baby {baby_id}"))),
        }
    }

    async fn baby_profile(&self, baby_id: BabyId) -> PortResult<BabyProfile> {
        match baby_id {
            1 => Ok(BabyProfile {
                id: 1,
                name: "Ada".to_string(),
                dob: NaiveDate::from_ymd_opt(2024, 1, 15),
                weight_kg: Some(20.0),
                diaper_size: Some("5".to_string()),
                daily_usage: Some(4),
            }),
            2 => Ok(BabyProfile {
                id: 2,
                name: "Ben".to_string(),
                dob: None,
                weight_kg: None,
                diaper_size: None,
                daily_usage: None,
            }),
            _ => Err(PortError::NotFound(format!("Baby {baby_id}"))),
        }
    }

    async fn baby_product(&self, product_id: ProductId) -> PortResult<BabyProduct> {
        let price = |retailer: &str, price: f64, day: u32| PriceHistoryItem {
            retailer: retailer.to_string(),
            product_url: Some(format!("https://{}.example/diapers", retailer.to_lowercase())),
            price,
            date: NaiveDate::from_ymd_opt(2024, 3, day).and_then(|d| d.and_hms_opt(0, 0, 0)),
        };
        match product_id {
            1 => Ok(BabyProduct {
                id: 1,
                name: "Dry Nights Size 3".to_string(),
                brand: Some("Snug".to_string()),
                currency: Some("USD".to_string()),
                price_history: vec![
                    price("Amazon", 25.0, 1),
                    price("Walmart", 22.0, 1),
                    price("Amazon", 26.0, 2),
                ],
            }),
            500 => Err(PortError::Unexpected("connection refused".to_string())),
            _ => Err(PortError::NotFound(format!("Product {product_id}"))),
        }
    }
}

fn app() -> Router {
    let state = Arc::new(AppState {
        backend: Arc::new(FakeBackend),
        size_table: Arc::new(SizeTable::default_table()),
    });
    router(state)
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.expect("Failed to call the router.");
    let status = response.status();
    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body.");
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn get(uri: &str) -> (StatusCode, Value) {
    send(Request::builder().uri(uri).body(Body::empty()).expect("Failed to build request.")).await
}

async fn post(uri: &str, payload: Value) -> (StatusCode, Value) {
    send(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .expect("Failed to build request."),
    )
    .await
}

fn ids(json: &Value, bucket: &str) -> Vec<i64> {
    json[bucket]
        .as_array()
        .expect("bucket is an array")
        .iter()
        .map(|r| r["id"].as_i64().expect("id is a number"))
        .collect()
}

#[tokio::test]
async fn health_ok() {
    let (status, json) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn classify_daily_scope() {
    let payload = json!({
        "scope": "daily",
        "reminders": [
            { "id": 1, "type": "TASK", "range": "TODAY", "title": "Tummy time" },
            { "id": 2, "type": "VACCINATION", "range": "OVERDUE", "title": "Hep B" },
            { "id": 3, "type": "TASK", "range": "COMPLETED", "title": "Bath",
              "completedOn": "2024-03-01T00:00:00" }
        ]
    });
    let (status, json) = post("/reminders/classify", payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["scope"], "daily");
    assert_eq!(ids(&json, "tasks"), vec![1]);
    assert!(ids(&json, "vaccinations").is_empty());
    assert_eq!(ids(&json, "overdue"), vec![2]);
    assert_eq!(ids(&json, "completed"), vec![3]);
    assert_eq!(json["visible"], json!(["tasks", "vaccinations", "completed", "overdue"]));
}

#[tokio::test]
async fn classify_treats_unknown_type_as_task() {
    let payload = json!({
        "reminders": [ { "id": 7, "type": "CHECKUP", "range": "UPCOMING_MONTH", "title": "Dentist" } ]
    });
    let (status, json) = post("/reminders/classify", payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["scope"], "all");
    assert_eq!(ids(&json, "tasks"), vec![7]);
    assert_eq!(json["tasks"][0]["type"], "UNRECOGNIZED");
}

#[tokio::test]
async fn classify_rejects_unknown_scope() {
    let (status, _) = post("/reminders/classify", json!({ "scope": "yearly", "reminders": [] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn classify_accepts_zulu_and_date_only_timestamps() {
    let payload = json!({
        "scope": "daily",
        "reminders": [
            { "id": 1, "type": "TASK", "range": "TODAY", "nextDue": "2024-03-01T10:00:00.000Z" },
            { "id": 2, "type": "TASK", "range": "TODAY", "completedOn": "2024-03-01",
              "nextDue": "not a date" }
        ]
    });
    let (status, json) = post("/reminders/classify", payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&json, "tasks"), vec![1, 2]);
    assert_eq!(json["tasks"][0]["nextDue"], "2024-03-01T10:00:00");
    assert_eq!(json["tasks"][1]["completedOn"], "2024-03-01T00:00:00");
    assert_eq!(json["tasks"][1]["nextDue"], Value::Null);
}

#[tokio::test]
async fn baby_reminders_are_fetched_and_filtered() {
    let (status, json) = get("/babies/1/reminders?scope=weekly&category=vaccinations").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["visible"], json!(["vaccinations"]));
    assert!(ids(&json, "tasks").is_empty());
    assert_eq!(ids(&json, "vaccinations"), vec![4]);
    assert_eq!(ids(&json, "overdue"), vec![2]);
    assert_eq!(ids(&json, "completed"), vec![3]);
}

#[tokio::test]
async fn baby_reminders_map_backend_errors() {
    let (status, _) = get("/babies/9/reminders").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get("/babies/500/reminders").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn sizes_are_listed_in_table_order() {
    let (status, json) = get("/sizes").await;

    assert_eq!(status, StatusCode::OK);
    let labels: Vec<&str> = json
        .as_array()
        .expect("sizes array")
        .iter()
        .map(|s| s["size"].as_str().expect("size label"))
        .collect();
    assert_eq!(labels, vec!["NB", "1", "2", "3", "4", "5", "6"]);
    assert_eq!(json[6]["weightMax"], Value::Null);
}

#[tokio::test]
async fn recommend_returns_neighbours() {
    let (status, json) = post("/sizes/recommend", json!({ "weightKg": 5.0 })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["previous"]["size"], "NB");
    assert_eq!(json["current"]["size"], "1");
    assert_eq!(json["next"]["size"], "2");
    assert_eq!(json["message"], Value::Null);
}

#[tokio::test]
async fn recommend_uses_age_to_disambiguate() {
    let (status, json) = post("/sizes/recommend", json!({ "weightKg": 14.0, "ageMonths": 40 })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["current"]["size"], "6");
    assert_eq!(json["next"], Value::Null);
}

#[tokio::test]
async fn recommend_without_weight_prompts_for_input() {
    let (status, json) = post("/sizes/recommend", json!({ "ageMonths": 3 })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["current"], Value::Null);
    assert!(json["message"].as_str().is_some_and(|m| m.contains("weight")));
}

#[tokio::test]
async fn baby_recommendation_reads_the_profile() {
    let (status, json) = get("/babies/1/size-recommendation").await;
    assert_eq!(status, StatusCode::OK);
    // 20 kg fits sizes 5 and 6; the age decides, and both remain valid answers
    // depending on today's date.
    let size = json["current"]["size"].as_str().expect("a size was suggested");
    assert!(size == "5" || size == "6", "unexpected size {size}");
    assert!(json["ageMonths"].as_f64().is_some());

    let (status, json) = get("/babies/2/size-recommendation").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["current"], Value::Null);

    let (status, _) = get("/babies/3/size-recommendation").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn usage_projection_recommends_boxes() {
    let payload = json!({
        "weightKg": 6.0,
        "dailyUsage": 8,
        "boxesAtHome": 1.25,
        "diapersPerBox": 40
    });
    let (status, json) = post("/usage/projection", payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["remainingSupply"], 50.0);
    assert_eq!(json["daysLeft"], 6);
    assert_eq!(json["recommendedPurchase"], 2);
}

#[tokio::test]
async fn usage_projection_rejects_negative_boxes() {
    let payload = json!({ "weightKg": 6.0, "dailyUsage": 8, "boxesAtHome": -1, "diapersPerBox": 40 });
    let (status, _) = post("/usage/projection", payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn price_summary_groups_by_retailer() {
    let payload = json!({
        "priceHistory": [
            { "retailer": "Amazon", "price": 30.0, "date": "2024-03-03T00:00:00Z",
              "productUrl": "https://amazon.example/a" },
            { "retailer": "amazon", "price": 24.0, "date": "2024-03-01" },
            { "retailer": "Target", "price": 19.0, "date": "2024-03-01T12:00:00" }
        ]
    });
    let (status, json) = post("/prices/summary", payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["vendors"][0]["key"], "amazon");
    assert_eq!(json["vendors"][0]["name"], "Amazon");
    assert_eq!(json["vendors"][0]["summary"]["current"], 30.0);
    assert_eq!(json["vendors"][0]["summary"]["lowest"], 24.0);
    assert_eq!(json["vendors"][0]["summary"]["average"], 27.0);
    assert_eq!(json["vendors"][0]["summary"]["url"], "https://amazon.example/a");
    assert_eq!(json["vendors"][0]["isGoodDeal"], false);
    assert_eq!(json["vendors"][1]["isGoodDeal"], true);

    assert_eq!(json["timeline"][0]["date"], "2024-03-01");
    assert_eq!(json["timeline"][0]["prices"], json!({ "amazon": 24.0, "target": 19.0 }));
    assert_eq!(json["timeline"][1]["date"], "2024-03-03");
    assert_eq!(json["productId"], Value::Null);
}

#[tokio::test]
async fn price_summary_rejects_negative_prices() {
    let payload = json!({ "priceHistory": [ { "retailer": "Amazon", "price": -1.0 } ] });
    let (status, _) = post("/prices/summary", payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn product_prices_come_from_the_backend() {
    let (status, json) = get("/products/1/prices").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["productId"], 1);
    assert_eq!(json["name"], "Dry Nights Size 3");
    assert_eq!(json["currency"], "USD");
    assert_eq!(json["vendors"][0]["summary"]["current"], 26.0);
    assert_eq!(json["vendors"][0]["isGoodDeal"], true);
    assert_eq!(json["vendorUrls"]["walmart"], "https://walmart.example/diapers");

    let (status, _) = get("/products/9/prices").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get("/products/500/prices").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}
