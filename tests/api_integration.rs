//! Integration tests for the REST API feature: a full trading session
//! driven end-to-end through the router.

#![cfg(feature = "api")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use serde_json::{Value, json};
use tower::util::ServiceExt;

use vet_sim::api::{AppState, router};
use vet_sim::market::clock::FixedClock;
use vet_sim::market::deadline::DeadlineGuard;
use vet_sim::market::engine::Engine;
use vet_sim::market::prices::{DayAheadCurve, PriceProvider, RealTimeCurve};
use vet_sim::store::MemoryStore;

const DELIVERY: &str = "2025-06-15";

/// Build an engine with the submission window open and wrap it as API state.
fn build_api_state() -> Arc<AppState> {
    let now = NaiveDate::from_ymd_opt(2025, 6, 14)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    let engine = Engine::new(
        PriceProvider::new(DayAheadCurve::default(), RealTimeCurve::default()),
        DeadlineGuard::new(11),
        Arc::new(MemoryStore::new()),
        Arc::new(FixedClock(now)),
        10,
        "USD",
    );
    Arc::new(AppState { engine })
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_order(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/orders")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn full_trading_session_over_the_api() {
    let app = router(build_api_state());

    // The DA curve for the date, used below to predict fills.
    let da = body_json(
        app.clone()
            .oneshot(get(&format!("/api/prices/day-ahead?date={DELIVERY}")))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(da["source"], "synthetic");
    let da_at = |hour: usize| da["series"][hour]["price"].as_f64().unwrap();

    // A buy above the clearing price, a buy below it, and a sell below it.
    let submissions = [
        json!({"date": DELIVERY, "hour": 9, "side": "buy", "price": da_at(9) + 10.0, "quantity": 1.5}),
        json!({"date": DELIVERY, "hour": 12, "side": "buy", "price": 0.01, "quantity": 2.0}),
        json!({"date": DELIVERY, "hour": 18, "side": "sell", "price": da_at(18) - 5.0, "quantity": 3.0}),
    ];
    let mut ids = Vec::new();
    for body in &submissions {
        let resp = app.clone().oneshot(post_order(body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        ids.push(body_json(resp).await["id"].as_str().unwrap().to_string());
    }

    // Listing preserves submission order.
    let listed = body_json(
        app.clone()
            .oneshot(get(&format!("/api/orders?date={DELIVERY}")))
            .await
            .unwrap(),
    )
    .await;
    let listed_ids: Vec<&str> = listed["orders"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_str().unwrap())
        .collect();
    assert_eq!(listed_ids, ids.iter().map(String::as_str).collect::<Vec<_>>());

    // Settlement covers every order; fills follow the crossing rule.
    let report = body_json(
        app.clone()
            .oneshot(get(&format!("/api/pnl?date={DELIVERY}")))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(report["currency"], "USD");
    let details = report["details"].as_array().unwrap();
    assert_eq!(details.len(), 3);
    assert_eq!(details[0]["filled"], true);
    assert_eq!(details[1]["filled"], false);
    assert_eq!(details[1]["pnl"], 0.0);
    assert_eq!(details[2]["filled"], true);

    let total: f64 = details.iter().map(|d| d["pnl"].as_f64().unwrap()).sum();
    let reported = report["total_pnl"].as_f64().unwrap();
    assert!((reported - total).abs() < 0.005);

    // Deleting the losing bid shrinks the book and the next report.
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/orders/{}?date={DELIVERY}", ids[1]))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let report = body_json(
        app.oneshot(get(&format!("/api/pnl?date={DELIVERY}")))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(report["details"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn prices_are_stable_across_requests() {
    let app = router(build_api_state());

    for route in ["day-ahead", "real-time"] {
        let uri = format!("/api/prices/{route}?date={DELIVERY}");
        let first = body_json(app.clone().oneshot(get(&uri)).await.unwrap()).await;
        let second = body_json(app.clone().oneshot(get(&uri)).await.unwrap()).await;
        assert_eq!(first, second, "{route} series should be reproducible");
        assert_eq!(first["series"].as_array().map(Vec::len), Some(24));
    }
}
