//! HTTP-level integration tests for the booking and payment flow:
//! slot booking, conflicts, the simulated gateway (approve and decline),
//! cancellation, and stored cards.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use chrono::Utc;
use common::{body_json, get_auth, post_json, post_json_auth};
use sqlx::PgPool;

use pointpro_api::auth::password::hash_password;
use pointpro_core::payment::PaymentGateway;
use pointpro_core::roles::ROLE_CLIENT;
use pointpro_core::space::SpaceKind;
use pointpro_core::types::DbId;
use pointpro_db::models::space::CreateSpace;
use pointpro_db::models::user::CreateUser;
use pointpro_db::repositories::{SpaceRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const PASSWORD: &str = "test_password_123!";

async fn seed_client(pool: &PgPool, username: &str) {
    let hashed = hash_password(PASSWORD).expect("hashing should succeed");
    UserRepo::create_with_profile(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: hashed,
            first_name: "Test".to_string(),
            last_name: "Client".to_string(),
        },
        ROLE_CLIENT,
    )
    .await
    .expect("user creation should succeed");
}

/// Seed a 20 EUR/h meeting room and return its id.
async fn seed_space(pool: &PgPool) -> DbId {
    let space = SpaceRepo::create(
        pool,
        &CreateSpace {
            name: "Salle Turing".to_string(),
            description: None,
            kind: SpaceKind::Meeting,
            capacity: 8,
            city: "Lyon".to_string(),
            address: None,
            equipment: Some("screen, whiteboard".to_string()),
            price_per_hour: 20.0,
            image_path: None,
        },
    )
    .await
    .expect("space creation should succeed");
    space.id
}

async fn login(app: axum::Router, username: &str) -> String {
    let body = serde_json::json!({
        "email": format!("{username}@test.com"),
        "password": PASSWORD
    });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["access_token"].as_str().unwrap().to_string()
}

fn tomorrow() -> String {
    let today = Utc::now().date_naive();
    today.succ_opt().unwrap_or(today).to_string()
}

fn booking_body(start: &str) -> serde_json::Value {
    serde_json::json!({
        "date": tomorrow(),
        "start_time": start,
        "duration_hours": 2
    })
}

fn new_card_payment(save_card: bool) -> serde_json::Value {
    serde_json::json!({
        "method": "new_card",
        "name": "Alice Martin",
        "number": "4242 4242 4242 4242",
        "expiry": "12/27",
        "cvv": "123",
        "save_card": save_card
    })
}

/// A gateway that always declines, with no artificial latency.
fn declining_gateway() -> PaymentGateway {
    PaymentGateway {
        success_rate: 0.0,
        latency: Duration::ZERO,
    }
}

// ---------------------------------------------------------------------------
// Booking
// ---------------------------------------------------------------------------

/// Booking a free slot returns 201 pending with the derived price.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_booking_creates_pending_reservation(pool: PgPool) {
    seed_client(&pool, "alice").await;
    let space_id = seed_space(&pool).await;

    let app = common::build_test_app(pool.clone());
    let token = login(app, "alice").await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/spaces/{space_id}/reservations"),
        booking_body("10:00:00"),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["status"], "pending");
    assert_eq!(json["paid"], false);
    // 2 hours at 20/h.
    assert_eq!(json["total_price"], 40.0);
}

/// Booking an occupied slot returns 409, whoever holds it.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_booking_taken_slot_conflicts(pool: PgPool) {
    seed_client(&pool, "alice").await;
    seed_client(&pool, "bob").await;
    let space_id = seed_space(&pool).await;

    let app = common::build_test_app(pool.clone());
    let alice = login(app, "alice").await;
    let app = common::build_test_app(pool.clone());
    let bob = login(app, "bob").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/spaces/{space_id}/reservations"),
        booking_body("10:00:00"),
        &alice,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/spaces/{space_id}/reservations"),
        booking_body("10:00:00"),
        &bob,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Booking in the past returns 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_booking_in_the_past_is_rejected(pool: PgPool) {
    seed_client(&pool, "alice").await;
    let space_id = seed_space(&pool).await;

    let app = common::build_test_app(pool.clone());
    let token = login(app, "alice").await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "date": "2020-01-01",
        "start_time": "10:00:00",
        "duration_hours": 2
    });
    let response = post_json_auth(
        app,
        &format!("/api/v1/spaces/{space_id}/reservations"),
        body,
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Booking requires authentication.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_booking_requires_auth(pool: PgPool) {
    let space_id = seed_space(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        &format!("/api/v1/spaces/{space_id}/reservations"),
        booking_body("10:00:00"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Payment
// ---------------------------------------------------------------------------

/// An approved charge confirms the reservation and records the masked
/// descriptor; saving the card stores it for next time.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_payment_confirms_and_saves_card(pool: PgPool) {
    seed_client(&pool, "alice").await;
    let space_id = seed_space(&pool).await;

    let app = common::build_test_app(pool.clone());
    let token = login(app, "alice").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/spaces/{space_id}/reservations"),
        booking_body("10:00:00"),
        &token,
    )
    .await;
    let reservation = body_json(response).await;
    let reservation_id = reservation["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/me/reservations/{reservation_id}/pay"),
        new_card_payment(true),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "confirmed");
    assert_eq!(json["paid"], true);
    assert_eq!(json["payment_method"], "Visa •••• 4242");

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/me/cards", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cards = body_json(response).await;
    assert_eq!(cards.as_array().unwrap().len(), 1);
    assert_eq!(cards[0]["last_four"], "4242");
}

/// A declined charge returns 402 and leaves the reservation pending.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_declined_payment_leaves_reservation_pending(pool: PgPool) {
    seed_client(&pool, "alice").await;
    let space_id = seed_space(&pool).await;

    let app = common::build_test_app(pool.clone());
    let token = login(app, "alice").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/spaces/{space_id}/reservations"),
        booking_body("10:00:00"),
        &token,
    )
    .await;
    let reservation = body_json(response).await;
    let reservation_id = reservation["id"].as_i64().unwrap();

    let app = common::build_test_app_with_gateway(pool.clone(), declining_gateway());
    let response = post_json_auth(
        app,
        &format!("/api/v1/me/reservations/{reservation_id}/pay"),
        new_card_payment(false),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);

    // Still pending; a retry against an approving gateway succeeds.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(
        app,
        &format!("/api/v1/me/reservations/{reservation_id}"),
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["status"], "pending");
    assert_eq!(json["paid"], false);

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/me/reservations/{reservation_id}/pay"),
        new_card_payment(false),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Paying the same reservation twice is a 409.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_paying_twice_conflicts(pool: PgPool) {
    seed_client(&pool, "alice").await;
    let space_id = seed_space(&pool).await;

    let app = common::build_test_app(pool.clone());
    let token = login(app, "alice").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/spaces/{space_id}/reservations"),
        booking_body("10:00:00"),
        &token,
    )
    .await;
    let reservation = body_json(response).await;
    let reservation_id = reservation["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/me/reservations/{reservation_id}/pay"),
        new_card_payment(false),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/me/reservations/{reservation_id}/pay"),
        new_card_payment(false),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Cancellation and listing
// ---------------------------------------------------------------------------

/// Cancelling a pending reservation works once; cancelled is terminal.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_cancel_then_cancel_again(pool: PgPool) {
    seed_client(&pool, "alice").await;
    let space_id = seed_space(&pool).await;

    let app = common::build_test_app(pool.clone());
    let token = login(app, "alice").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/spaces/{space_id}/reservations"),
        booking_body("10:00:00"),
        &token,
    )
    .await;
    let reservation = body_json(response).await;
    let reservation_id = reservation["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/me/reservations/{reservation_id}/cancel"),
        serde_json::json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "cancelled");

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/me/reservations/{reservation_id}/cancel"),
        serde_json::json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// The reservations overview returns per-status counts.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_my_reservations_counts(pool: PgPool) {
    seed_client(&pool, "alice").await;
    let space_id = seed_space(&pool).await;

    let app = common::build_test_app(pool.clone());
    let token = login(app, "alice").await;

    for start in ["08:00:00", "10:00:00"] {
        let app = common::build_test_app(pool.clone());
        let response = post_json_auth(
            app,
            &format!("/api/v1/spaces/{space_id}/reservations"),
            booking_body(start),
            &token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/me/reservations", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["reservations"].as_array().unwrap().len(), 2);
    assert_eq!(json["counts"]["total"], 2);
    assert_eq!(json["counts"]["pending"], 2);
}

/// Another user's reservation is invisible (404, not 403).
#[sqlx::test(migrations = "../db/migrations")]
async fn test_reservation_detail_is_owner_scoped(pool: PgPool) {
    seed_client(&pool, "alice").await;
    seed_client(&pool, "bob").await;
    let space_id = seed_space(&pool).await;

    let app = common::build_test_app(pool.clone());
    let alice = login(app, "alice").await;
    let app = common::build_test_app(pool.clone());
    let bob = login(app, "bob").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/spaces/{space_id}/reservations"),
        booking_body("10:00:00"),
        &alice,
    )
    .await;
    let reservation = body_json(response).await;
    let reservation_id = reservation["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        &format!("/api/v1/me/reservations/{reservation_id}"),
        &bob,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
