//! HTTP client behaviour against a local axum server.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use api_types::{
    RecordId,
    budget::{BudgetLimitView, BudgetUpdate},
    expense::ExpensePayload,
};
use axum::{
    Json, Router,
    extract::{Multipart, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use sdg_finance_tui::client::{Attachment, ChatUpload, Client, ClientError, FinanceApi};
use serde_json::{Value, json};

const TOKEN: &str = "secret-token";

type Captured = Arc<Mutex<Vec<Value>>>;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: &str) -> Client {
    Client::new(base_url, Duration::from_secs(5)).unwrap()
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Every request gets `status` with `body`.
async fn failing_server(status: StatusCode, body: Option<Value>) -> String {
    let router = Router::new().fallback(move || {
        let body = body.clone();
        async move {
            match body {
                Some(body) => (status, Json(body)).into_response(),
                None => status.into_response(),
            }
        }
    });
    serve(router).await
}

#[tokio::test]
async fn expenses_carry_bearer_and_decode_leniently() {
    let seen: Arc<Mutex<Option<String>>> = Arc::default();
    let seen_in = seen.clone();
    let router = Router::new().route(
        "/api/expenses",
        get(move |headers: HeaderMap| {
            *seen_in.lock().unwrap() = bearer(&headers);
            async {
                Json(json!([
                    {
                        "id": 7,
                        "name": "Bus pass",
                        "date": "2024-05-02",
                        "cost": "45.50",
                        "category": {"name": "Travel & Leisure"},
                        "sustainabilityScore": "8.4"
                    },
                    {
                        "id": "a1",
                        "name": "Snacks",
                        "date": "2024-05-03",
                        "cost": 3.2,
                        "category": null,
                        "sustainabilityScore": null
                    }
                ]))
            }
        }),
    );
    let base = serve(router).await;

    let expenses = client(&base).get_expenses(TOKEN).await.unwrap();

    assert_eq!(seen.lock().unwrap().as_deref(), Some("Bearer secret-token"));
    assert_eq!(expenses.len(), 2);
    assert_eq!(expenses[0].id, RecordId::from("7"));
    assert_eq!(expenses[0].cost, Decimal::new(4550, 2));
    assert_eq!(expenses[0].sustainability_score, Some(8.4));
    assert_eq!(expenses[1].id.as_str(), "a1");
    assert!(expenses[1].category.is_none());
    assert!(expenses[1].sustainability_score.is_none());
}

#[tokio::test]
async fn status_codes_map_to_client_errors() {
    let base = failing_server(StatusCode::UNAUTHORIZED, None).await;
    assert!(matches!(
        client(&base).get_profile(TOKEN).await,
        Err(ClientError::Unauthorized)
    ));

    let base = failing_server(StatusCode::FORBIDDEN, None).await;
    assert!(matches!(
        client(&base).get_rewards(TOKEN).await,
        Err(ClientError::Forbidden)
    ));

    let base = failing_server(StatusCode::NOT_FOUND, None).await;
    assert!(matches!(
        client(&base)
            .delete_expense(TOKEN, &RecordId::from("9"))
            .await,
        Err(ClientError::NotFound)
    ));

    let base = failing_server(StatusCode::CONFLICT, Some(json!({"error": "Already redeemed"}))).await;
    let err = client(&base)
        .redeem_reward(TOKEN, &RecordId::from("1"))
        .await
        .unwrap_err();
    assert!(matches!(&err, ClientError::Conflict(m) if m == "Already redeemed"));
    assert_eq!(err.server_message(), Some("Already redeemed"));

    let base = failing_server(
        StatusCode::UNPROCESSABLE_ENTITY,
        Some(json!({"message": "cost is required"})),
    )
    .await;
    assert!(matches!(
        client(&base).get_total_rewards(TOKEN).await,
        Err(ClientError::Validation(m)) if m == "cost is required"
    ));

    let base = failing_server(StatusCode::INTERNAL_SERVER_ERROR, None).await;
    let err = client(&base).get_expenses(TOKEN).await.unwrap_err();
    assert!(matches!(&err, ClientError::Server(_)));
    assert_eq!(err.server_message(), None);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}"))
        .get_profile(TOKEN)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
    assert_eq!(err.server_message(), None);
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let router = Router::new().route(
        "/sdg/api/rewards/total",
        get(|| async { Json(json!({"total": 4})) }),
    );
    let base = serve(router).await;

    let total = client(&format!("{base}/sdg"))
        .get_total_rewards(TOKEN)
        .await
        .unwrap();
    assert_eq!(total.total, 4);
}

#[tokio::test]
async fn add_expense_posts_payload_and_returns_created_record() {
    let captured: Captured = Arc::default();
    let captured_in = captured.clone();
    let router = Router::new().route(
        "/api/expenses",
        post(move |Json(body): Json<Value>| {
            captured_in.lock().unwrap().push(body.clone());
            async move {
                let mut created = body;
                created["id"] = json!(12);
                created["category"] = json!({"name": "Food & Dining"});
                created["sustainabilityScore"] = json!(6.5);
                (StatusCode::CREATED, Json(created))
            }
        }),
    );
    let base = serve(router).await;

    let payload = ExpensePayload {
        name: "Farmers market".to_string(),
        date: "2024-06-01".parse().unwrap(),
        cost: Decimal::new(1999, 2),
        category: Some("Food & Dining".to_string()),
    };
    let created = client(&base).add_expense(TOKEN, &payload).await.unwrap();

    let sent = captured.lock().unwrap()[0].clone();
    assert_eq!(sent["name"], "Farmers market");
    assert_eq!(sent["date"], "2024-06-01");
    assert_eq!(sent["category"], "Food & Dining");
    assert_eq!(sent["cost"], "19.99");
    assert_eq!(created.id.as_str(), "12");
    assert_eq!(created.sustainability_score, Some(6.5));
}

#[tokio::test]
async fn budgets_use_period_query_and_full_update_body() {
    let queries: Arc<Mutex<Vec<HashMap<String, String>>>> = Arc::default();
    let updates: Captured = Arc::default();
    let (queries_in, updates_in) = (queries.clone(), updates.clone());
    let router = Router::new().route(
        "/api/budgets",
        get(move |Query(query): Query<HashMap<String, String>>| {
            queries_in.lock().unwrap().push(query);
            async { Json(json!([{"category": "Other", "limit": 120}])) }
        })
        .put(move |Json(body): Json<Value>| {
            updates_in.lock().unwrap().push(body);
            async { Json(json!({"message": "Budgets updated"})) }
        }),
    );
    let base = serve(router).await;
    let api = client(&base);

    let limits = api.get_budgets(TOKEN, 3, 2025).await.unwrap();
    assert_eq!(
        limits,
        vec![BudgetLimitView {
            category: "Other".to_string(),
            limit: Decimal::from(120),
        }]
    );
    let query = queries.lock().unwrap()[0].clone();
    assert_eq!(query.get("month").map(String::as_str), Some("3"));
    assert_eq!(query.get("year").map(String::as_str), Some("2025"));

    let update = BudgetUpdate {
        month: 3,
        year: 2025,
        budgets: vec![BudgetLimitView {
            category: "Other".to_string(),
            limit: Decimal::new(5000, 2),
        }],
    };
    api.update_budgets(TOKEN, &update).await.unwrap();
    let sent = updates.lock().unwrap()[0].clone();
    assert_eq!(sent["month"], 3);
    assert_eq!(sent["year"], 2025);
    assert_eq!(sent["budgets"][0]["category"], "Other");
}

#[tokio::test]
async fn profile_decoding_accepts_encoded_goals_but_not_bad_points() {
    let router = Router::new().route(
        "/api/profile",
        get(|| async {
            Json(json!({
                "name": "Ana",
                "email": "ana@example.com",
                "location": "Lisbon",
                "bio": "",
                "avatar": null,
                "createdAt": "2024-01-15T10:00:00Z",
                "points": "forty",
                "goals": "[{\"title\":\"Bike to work\",\"progress\":\"3/5\",\"achieved\":false}]"
            }))
        }),
    );
    let base = serve(router).await;

    // `points` must be numeric; a malformed body surfaces as a decode error.
    let err = client(&base).get_profile(TOKEN).await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));

    let router = Router::new().route(
        "/api/profile",
        get(|| async {
            Json(json!({
                "name": "Ana",
                "points": 40,
                "goals": "[{\"title\":\"Bike to work\",\"progress\":3,\"achieved\":true}]"
            }))
        }),
    );
    let base = serve(router).await;
    let profile = client(&base).get_profile(TOKEN).await.unwrap();
    assert_eq!(profile.points, 40);
    assert_eq!(profile.goals.len(), 1);
    assert_eq!(profile.goals[0].progress, "3");
    assert!(profile.goals[0].achieved);
    assert!(profile.created_at.is_none());
}

#[tokio::test]
async fn chat_sends_multipart_fields() {
    let parts: Arc<Mutex<Vec<(String, Option<String>, Vec<u8>)>>> = Arc::default();
    let parts_in = parts.clone();
    let router = Router::new().route(
        "/api/chatbot",
        post(move |mut multipart: Multipart| {
            let parts_in = parts_in.clone();
            async move {
                while let Some(field) = multipart.next_field().await.unwrap() {
                    let name = field.name().unwrap_or_default().to_string();
                    let file_name = field.file_name().map(str::to_string);
                    let bytes = field.bytes().await.unwrap().to_vec();
                    parts_in.lock().unwrap().push((name, file_name, bytes));
                }
                Json(json!({"reply": "Consider green bonds."}))
            }
        }),
    );
    let base = serve(router).await;

    let upload = ChatUpload {
        message: "How do I invest?".to_string(),
        image: Some(Attachment {
            file_name: "receipt.png".to_string(),
            bytes: vec![0x89, 0x50],
        }),
        file: None,
    };
    let reply = client(&base).send_chat(TOKEN, &upload).await.unwrap();

    assert_eq!(reply.reply, "Consider green bonds.");
    let parts = parts.lock().unwrap();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].0, "message");
    assert_eq!(parts[0].2, b"How do I invest?");
    assert_eq!(parts[1].0, "image");
    assert_eq!(parts[1].1.as_deref(), Some("receipt.png"));
    assert_eq!(parts[1].2, vec![0x89, 0x50]);
}
