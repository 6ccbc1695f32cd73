//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint against a scripted
//! model.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use trip_planner::{
    api::create_router,
    cache::{FileStore, KeyValueStore, MemoryStore, ResponseCache},
    compositor::{DocumentCompositor, SoftwareRasterizer},
    planner::PlannerService,
    provider::{GenerativeModel, ProviderError, QUOTA_MESSAGE},
    AppState,
};

// == Helper Functions ==

/// Answers by prompt content and counts calls.
struct FakeModel {
    calls: AtomicUsize,
    fail_with: Option<String>,
}

impl FakeModel {
    fn working() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail_with: None,
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail_with: Some(message.to_string()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn cost(total: f64) -> Value {
    json!({"accommodation": total / 2.0, "food": total / 4.0, "activities": total / 4.0})
}

fn destination_json(name: &str) -> Value {
    json!({
        "name": name,
        "country": name,
        "description": "A wonderful place.",
        "visaInfo": "e-Visa available",
        "averageCost": 1200,
        "costBreakdown": cost(1200.0)
    })
}

fn activity_json(name: &str) -> Value {
    json!({
        "name": name,
        "description": format!("Visit {}.", name),
        "type": "Touristy",
        "link": format!("https://www.tripadvisor.com/{}", name),
        "averageCost": 40,
        "costBreakdown": cost(40.0)
    })
}

fn plan_json() -> Value {
    json!({
        "itinerary": [
            {
                "day": 1,
                "title": "Lima Highlights",
                "activities": [activity_json("Miraflores"), activity_json("Barranco")],
                "keepInMind": "* Do try ceviche\n* Don't drink tap water"
            },
            {
                "day": 2,
                "title": "Sacred Valley",
                "activities": [activity_json("Pisac")],
                "keepInMind": "* Do acclimatize"
            }
        ],
        "optimizationSuggestions": "Fly to Cusco early.",
        "officialLinks": [{"title": "PromPeru", "url": "https://www.peru.travel"}]
    })
}

#[async_trait]
impl GenerativeModel for FakeModel {
    async fn generate(&self, prompt: &str, _schema: &Value) -> Result<Value, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fail_with {
            return Err(ProviderError::Http {
                status: 500,
                message: message.clone(),
            });
        }

        if prompt.contains("packing list") {
            Ok(json!([
                {"categoryName": "Clothing", "items": ["Fleece", "Rain jacket"]},
                {"categoryName": "Documents", "items": ["Passport"]}
            ]))
        } else if prompt.contains("itinerary") {
            Ok(plan_json())
        } else if prompt.contains("suggest 7-8") || prompt.contains("Suggest 7-8") {
            Ok(json!([destination_json("Peru"), destination_json("Chile")]))
        } else {
            Ok(json!({
                "description": "Land of the thunder dragon.",
                "visaInfo": "Permit required",
                "averageCost": 2000,
                "costBreakdown": cost(2000.0)
            }))
        }
    }

    fn name(&self) -> &str {
        "fake"
    }
}

fn create_app_with(model: Arc<FakeModel>, store: Box<dyn KeyValueStore>) -> Router {
    let planner = PlannerService::new(model, ResponseCache::new(store));
    let compositor = DocumentCompositor::new(Arc::new(SoftwareRasterizer));
    create_router(AppState::new(planner, compositor))
}

fn create_test_app(model: Arc<FakeModel>) -> Router {
    create_app_with(model, Box::new(MemoryStore::new()))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX).await.unwrap().to_vec()
}

async fn body_to_json(body: Body) -> Value {
    serde_json::from_slice(&body_bytes(body).await).unwrap()
}

// == Suggestions ==

#[tokio::test]
async fn test_suggestions_cached_across_requests() {
    let model = FakeModel::working();
    let app = create_test_app(model.clone());
    let request = json!({"budget": "Mid-range", "timeOfYear": "Summer", "continent": "Any"});

    let first = app
        .clone()
        .oneshot(post_json("/suggestions", request.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let json = body_to_json(first.into_body()).await;
    assert_eq!(json["suggestions"].as_array().unwrap().len(), 2);
    assert_eq!(json["suggestions"][0]["visaInfo"], "e-Visa available");

    let second = app
        .clone()
        .oneshot(post_json("/suggestions", request))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(model.calls(), 1);

    let stats = body_to_json(app.oneshot(get("/stats")).await.unwrap().into_body()).await;
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["misses"], 1);
    assert_eq!(stats["writes"], 1);
}

#[tokio::test]
async fn test_suggestions_for_named_country() {
    let app = create_test_app(FakeModel::working());

    let response = app
        .oneshot(post_json("/suggestions", json!({"country": "Bhutan"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    let suggestions = json["suggestions"].as_array().unwrap();
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0]["name"], "Bhutan");
    assert_eq!(suggestions[0]["averageCost"], 2000.0);
}

#[tokio::test]
async fn test_named_country_falls_back_on_failure() {
    let app = create_test_app(FakeModel::failing("internal"));

    let response = app
        .oneshot(post_json("/suggestions", json!({"country": "Bhutan"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["suggestions"][0]["averageCost"], 0.0);
    assert!(json["suggestions"][0]["visaInfo"]
        .as_str()
        .unwrap()
        .contains("could not be fetched"));
}

#[tokio::test]
async fn test_suggestions_missing_budget() {
    let app = create_test_app(FakeModel::working());

    let response = app
        .oneshot(post_json("/suggestions", json!({"timeOfYear": "Winter"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("budget"));
}

#[tokio::test]
async fn test_quota_error_returns_429() {
    let app = create_test_app(FakeModel::failing("RESOURCE_EXHAUSTED: quota exceeded"));

    let response = app
        .oneshot(post_json("/suggestions/off-beat", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"], QUOTA_MESSAGE);
}

#[tokio::test]
async fn test_generic_error_hides_details() {
    let app = create_test_app(FakeModel::failing("backend exploded at node-7"));

    let response = app
        .oneshot(post_json(
            "/plans",
            json!({"destination": destination_json("Peru"), "duration": 2}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let json = body_to_json(response.into_body()).await;
    let message = json["error"].as_str().unwrap();
    assert!(message.starts_with("Failed to generate a travel plan."));
    assert!(!message.contains("node-7"));
}

// == Plans ==

#[tokio::test]
async fn test_generate_plan_assigns_ids() {
    let app = create_test_app(FakeModel::working());

    let response = app
        .oneshot(post_json(
            "/plans",
            json!({"destination": destination_json("Peru"), "duration": 2, "style": "Off-beat"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let plan = body_to_json(response.into_body()).await;
    assert_eq!(plan["itinerary"].as_array().unwrap().len(), 2);
    for day in plan["itinerary"].as_array().unwrap() {
        for activity in day["activities"].as_array().unwrap() {
            assert!(!activity["id"].as_str().unwrap().is_empty());
        }
    }
}

#[tokio::test]
async fn test_rebuild_and_packing_list() {
    let app = create_test_app(FakeModel::working());

    let plan = body_to_json(
        app.clone()
            .oneshot(post_json(
                "/plans",
                json!({"destination": destination_json("Peru"), "duration": 2}),
            ))
            .await
            .unwrap()
            .into_body(),
    )
    .await;

    let rebuilt = app
        .clone()
        .oneshot(post_json(
            "/plans/rebuild",
            json!({
                "destination": destination_json("Peru"),
                "plan": plan,
                "notes": "slow pace",
                "refinement": "more food"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(rebuilt.status(), StatusCode::OK);
    let rebuilt = body_to_json(rebuilt.into_body()).await;
    assert_eq!(rebuilt["optimizationSuggestions"], "Fly to Cusco early.");

    let packing = app
        .oneshot(post_json(
            "/plans/packing-list",
            json!({"destination": destination_json("Peru"), "plan": rebuilt}),
        ))
        .await
        .unwrap();
    assert_eq!(packing.status(), StatusCode::OK);
    let packing = body_to_json(packing.into_body()).await;
    assert_eq!(packing["packingList"].as_array().unwrap().len(), 2);
    assert_eq!(packing["packingList"][1]["items"][0], "Passport");
}

#[tokio::test]
async fn test_rebuild_rejects_empty_itinerary() {
    let model = FakeModel::working();
    let app = create_test_app(model.clone());

    let response = app
        .oneshot(post_json(
            "/plans/rebuild",
            json!({
                "destination": destination_json("Peru"),
                "plan": {"itinerary": [], "optimizationSuggestions": ""}
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_edit_plan_without_model_calls() {
    let model = FakeModel::working();
    let app = create_test_app(model.clone());

    let plan = body_to_json(
        app.clone()
            .oneshot(post_json(
                "/plans",
                json!({"destination": destination_json("Peru"), "duration": 2}),
            ))
            .await
            .unwrap()
            .into_body(),
    )
    .await;
    let first = plan["itinerary"][0]["activities"][0]["id"].clone();
    let second = plan["itinerary"][0]["activities"][1]["id"].clone();

    let reordered = app
        .clone()
        .oneshot(post_json(
            "/plans/edit",
            json!({
                "plan": plan,
                "edit": {"op": "reorderActivities", "dayIndex": 0, "order": [second, first.clone()]}
            }),
        ))
        .await
        .unwrap();
    assert_eq!(reordered.status(), StatusCode::OK);
    let reordered = body_to_json(reordered.into_body()).await;
    assert_eq!(reordered["itinerary"][0]["activities"][0]["name"], "Barranco");

    let deleted = app
        .clone()
        .oneshot(post_json(
            "/plans/edit",
            json!({
                "plan": reordered,
                "edit": {"op": "deleteActivity", "dayIndex": 0, "activityId": first.clone()}
            }),
        ))
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::OK);
    let deleted = body_to_json(deleted.into_body()).await;
    assert_eq!(deleted["itinerary"][0]["activities"].as_array().unwrap().len(), 1);

    let rejected = app
        .oneshot(post_json(
            "/plans/edit",
            json!({
                "plan": deleted,
                "edit": {"op": "deleteActivity", "dayIndex": 0, "activityId": first}
            }),
        ))
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
    assert_eq!(model.calls(), 1);
}

// == Save / Load ==

#[tokio::test]
async fn test_save_then_load_round_trip() {
    let app = create_test_app(FakeModel::working());
    let mut plan = plan_json();
    plan["itinerary"][0]["activities"][0]["id"] = json!("keep-me");

    let saved = app
        .clone()
        .oneshot(post_json(
            "/plans/save",
            json!({"name": "Peru Adventure", "plan": plan, "destination": destination_json("Peru")}),
        ))
        .await
        .unwrap();
    assert_eq!(saved.status(), StatusCode::OK);
    assert_eq!(
        saved.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"peru_adventure.json\""
    );
    let file = body_bytes(saved.into_body()).await;
    let file_json: Value = serde_json::from_slice(&file).unwrap();
    assert!(file_json["savedAt"].is_string());
    assert!(file_json["id"].is_string());

    let loaded = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/plans/load")
                .body(Body::from(file))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(loaded.status(), StatusCode::OK);

    let loaded = body_to_json(loaded.into_body()).await;
    assert_eq!(loaded["name"], "Peru Adventure");
    let day_one = loaded["plan"]["itinerary"][0]["activities"].as_array().unwrap();
    assert_eq!(day_one[0]["id"], "keep-me");
    assert_eq!(day_one[0]["name"], "Miraflores");
    assert_eq!(day_one[1]["name"], "Barranco");
    assert!(!day_one[1]["id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_load_rejects_bad_files() {
    let app = create_test_app(FakeModel::working());

    for (body, message) in [
        (
            json!({"plan": plan_json()}).to_string(),
            "Invalid itinerary file format.",
        ),
        ("not json at all".to_string(), "Failed to read or parse the file."),
    ] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/plans/load")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_to_json(response.into_body()).await;
        assert_eq!(json["error"], message);
    }
}

// == Export ==

#[tokio::test]
async fn test_export_returns_pdf() {
    let app = create_test_app(FakeModel::working());

    let response = app
        .oneshot(post_json(
            "/plans/export",
            json!({"plan": plan_json(), "destination": destination_json("Peru")}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"trip-to-Peru.pdf\""
    );

    let bytes = body_bytes(response.into_body()).await;
    let document = lopdf::Document::load_mem(&bytes).unwrap();
    assert!(document.get_pages().len() >= 2);
}

// == Persistence ==

#[tokio::test]
async fn test_file_cache_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    let request = json!({"budget": "Luxury", "timeOfYear": "Autumn", "continent": "Europe"});

    let first_model = FakeModel::working();
    let app = create_app_with(
        first_model.clone(),
        Box::new(FileStore::open(&path, None).unwrap()),
    );
    let response = app
        .oneshot(post_json("/suggestions", request.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(first_model.calls(), 1);

    let second_model = FakeModel::working();
    let app = create_app_with(
        second_model.clone(),
        Box::new(FileStore::open(&path, None).unwrap()),
    );
    let response = app.oneshot(post_json("/suggestions", request)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(second_model.calls(), 0);
}

// == Health ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app(FakeModel::working());

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
