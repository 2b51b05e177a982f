//! HTTP-level integration tests for the maintenance surfaces: the
//! technician incident flow and the admin interventions console.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, post_json_auth};
use sqlx::PgPool;

use pointpro_api::auth::password::hash_password;
use pointpro_core::roles::{ROLE_ADMIN, ROLE_TECHNICIAN};
use pointpro_core::space::SpaceKind;
use pointpro_core::types::DbId;
use pointpro_db::models::space::CreateSpace;
use pointpro_db::models::user::CreateUser;
use pointpro_db::repositories::{ProfileRepo, SpaceRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const PASSWORD: &str = "test_password_123!";

/// Create a user with the given role; returns the user id.
async fn seed_user(pool: &PgPool, username: &str, role: &str) -> DbId {
    let hashed = hash_password(PASSWORD).expect("hashing should succeed");
    let (user, _) = UserRepo::create_with_profile(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: hashed,
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
        },
        role,
    )
    .await
    .expect("user creation should succeed");
    user.id
}

async fn seed_space(pool: &PgPool, name: &str) -> DbId {
    let space = SpaceRepo::create(
        pool,
        &CreateSpace {
            name: name.to_string(),
            description: None,
            kind: SpaceKind::Studio,
            capacity: 4,
            city: "Paris".to_string(),
            address: None,
            equipment: None,
            price_per_hour: 15.0,
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

// ---------------------------------------------------------------------------
// Technician flow
// ---------------------------------------------------------------------------

/// Report, start, finish: the incident and the space move together.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_incident_start_finish_flow(pool: PgPool) {
    seed_user(&pool, "fixit", ROLE_TECHNICIAN).await;
    let space_id = seed_space(&pool, "Studio 1").await;

    let app = common::build_test_app(pool.clone());
    let token = login(app, "fixit").await;

    // Report.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "space_id": space_id,
        "description": "Projector flickers",
        "severity": "critical"
    });
    let response = post_json_auth(app, "/api/v1/tech/incidents", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let incident = body_json(response).await;
    let incident_id = incident["id"].as_i64().unwrap();
    assert_eq!(incident["state"], "open");

    // Start: the caller is assigned and the space leaves the catalog.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/tech/incidents/{incident_id}/start"),
        serde_json::json!({ "opening_note": "On my way" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let intervention = body_json(response).await;
    assert_eq!(intervention["status"], "in_progress");

    let space = SpaceRepo::find_by_id(&pool, space_id).await.unwrap().unwrap();
    assert!(!space.available);
    assert!(space.under_maintenance);

    // Finish: incident resolved, space back.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/tech/incidents/{incident_id}/finish"),
        serde_json::json!({ "closing_note": "Replaced the bulb", "material_cost": 12.5 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["incident"]["state"], "resolved");
    assert_eq!(json["intervention"]["status"], "terminated");

    let space = SpaceRepo::find_by_id(&pool, space_id).await.unwrap().unwrap();
    assert!(space.available);
    assert!(!space.under_maintenance);
}

/// Starting an incident that is already being handled is a 409.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_start_twice_conflicts(pool: PgPool) {
    seed_user(&pool, "fixit", ROLE_TECHNICIAN).await;
    seed_user(&pool, "backup", ROLE_TECHNICIAN).await;
    let space_id = seed_space(&pool, "Studio 1").await;

    let app = common::build_test_app(pool.clone());
    let fixit = login(app, "fixit").await;
    let app = common::build_test_app(pool.clone());
    let backup = login(app, "backup").await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "space_id": space_id, "description": "Leaky faucet" });
    let response = post_json_auth(app, "/api/v1/tech/incidents", body, &fixit).await;
    let incident_id = body_json(response).await["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/tech/incidents/{incident_id}/start"),
        serde_json::json!({}),
        &fixit,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/tech/incidents/{incident_id}/start"),
        serde_json::json!({}),
        &backup,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Manual takedown and reactivation; reactivation is refused while an
/// intervention holds the space.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_manual_takedown_and_reactivate(pool: PgPool) {
    seed_user(&pool, "fixit", ROLE_TECHNICIAN).await;
    let manual_space = seed_space(&pool, "Studio 1").await;
    let held_space = seed_space(&pool, "Studio 2").await;

    let app = common::build_test_app(pool.clone());
    let token = login(app, "fixit").await;

    // Manual takedown, then reactivate.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/tech/spaces/{manual_space}/maintenance"),
        serde_json::json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/tech/spaces/{manual_space}/reactivate"),
        serde_json::json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // An intervention-held space cannot be reactivated by hand.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "space_id": held_space, "description": "Broken window" });
    let response = post_json_auth(app, "/api/v1/tech/incidents", body, &token).await;
    let incident_id = body_json(response).await["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        &format!("/api/v1/tech/incidents/{incident_id}/start"),
        serde_json::json!({}),
        &token,
    )
    .await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/tech/spaces/{held_space}/reactivate"),
        serde_json::json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Cancelling withdraws an open report; anything past open is refused.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_cancel_incident(pool: PgPool) {
    seed_user(&pool, "fixit", ROLE_TECHNICIAN).await;
    let space_id = seed_space(&pool, "Studio 1").await;

    let app = common::build_test_app(pool.clone());
    let token = login(app, "fixit").await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "space_id": space_id, "description": "False alarm" });
    let response = post_json_auth(app, "/api/v1/tech/incidents", body, &token).await;
    let incident_id = body_json(response).await["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/tech/incidents/{incident_id}/cancel"),
        serde_json::json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["state"], "cancelled");

    // A cancelled incident can no longer be started.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/tech/incidents/{incident_id}/start"),
        serde_json::json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Nor can an in-progress one be cancelled.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "space_id": space_id, "description": "Real fault" });
    let response = post_json_auth(app, "/api/v1/tech/incidents", body, &token).await;
    let second_id = body_json(response).await["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        &format!("/api/v1/tech/incidents/{second_id}/start"),
        serde_json::json!({}),
        &token,
    )
    .await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/tech/incidents/{second_id}/cancel"),
        serde_json::json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// The technician dashboard counters reflect the current state.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_tech_dashboard_counters(pool: PgPool) {
    seed_user(&pool, "fixit", ROLE_TECHNICIAN).await;
    let space_id = seed_space(&pool, "Studio 1").await;
    seed_space(&pool, "Studio 2").await;

    let app = common::build_test_app(pool.clone());
    let token = login(app, "fixit").await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "space_id": space_id, "description": "Squeaky door" });
    post_json_auth(app, "/api/v1/tech/incidents", body, &token).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/tech/dashboard", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total_spaces"], 2);
    assert_eq!(json["in_maintenance"], 0);
    assert_eq!(json["open_incidents"], 1);
}

// ---------------------------------------------------------------------------
// Admin console
// ---------------------------------------------------------------------------

/// The admin console opens incident + intervention in one step, speaking
/// the priority vocabulary.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_opens_and_closes_intervention(pool: PgPool) {
    seed_user(&pool, "boss", ROLE_ADMIN).await;
    let tech_user = seed_user(&pool, "fixit", ROLE_TECHNICIAN).await;
    let technician_id = ProfileRepo::find_by_user(&pool, tech_user)
        .await
        .unwrap()
        .unwrap()
        .id;
    let space_id = seed_space(&pool, "Studio 1").await;

    let app = common::build_test_app(pool.clone());
    let token = login(app, "boss").await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "space_id": space_id,
        "technician_id": technician_id,
        "description": "Water damage on the ceiling",
        "priority": "high"
    });
    let response = post_json_auth(app, "/api/v1/admin/interventions", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let intervention = body_json(response).await;
    let intervention_id = intervention["id"].as_i64().unwrap();

    let space = SpaceRepo::find_by_id(&pool, space_id).await.unwrap().unwrap();
    assert!(!space.available);

    // The edit-form payload renders severity back as a priority.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(
        app,
        &format!("/api/v1/admin/interventions/{intervention_id}/data"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["priority"], "high");

    // Close succeeds once.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/admin/interventions/{intervention_id}/close"),
        serde_json::json!({ "closing_note": "Patched and repainted", "material_cost": 80.0 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);

    // A second close is a soft failure, not an error page.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/admin/interventions/{intervention_id}/close"),
        serde_json::json!({ "closing_note": "Again" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["error"].is_string());

    let space = SpaceRepo::find_by_id(&pool, space_id).await.unwrap().unwrap();
    assert!(space.available);
}

/// The console list includes headline figures.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_interventions_list_with_stats(pool: PgPool) {
    seed_user(&pool, "boss", ROLE_ADMIN).await;
    let tech_user = seed_user(&pool, "fixit", ROLE_TECHNICIAN).await;
    let technician_id = ProfileRepo::find_by_user(&pool, tech_user)
        .await
        .unwrap()
        .unwrap()
        .id;
    let space_id = seed_space(&pool, "Studio 1").await;

    let app = common::build_test_app(pool.clone());
    let token = login(app, "boss").await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "space_id": space_id,
        "technician_id": technician_id,
        "description": "Flickering lights",
        "priority": "medium"
    });
    post_json_auth(app, "/api/v1/admin/interventions", body, &token).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/admin/interventions", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["interventions"].as_array().unwrap().len(), 1);
    assert_eq!(json["stats"]["in_progress"], 1);
}

/// Dispatching to a non-technician profile is a 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_dispatch_requires_technician_profile(pool: PgPool) {
    seed_user(&pool, "boss", ROLE_ADMIN).await;
    let client_user = seed_user(&pool, "justaclient", pointpro_core::roles::ROLE_CLIENT).await;
    let client_profile = ProfileRepo::find_by_user(&pool, client_user)
        .await
        .unwrap()
        .unwrap()
        .id;
    let space_id = seed_space(&pool, "Studio 1").await;

    let app = common::build_test_app(pool.clone());
    let token = login(app, "boss").await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "space_id": space_id,
        "technician_id": client_profile,
        "description": "Anything",
        "priority": "low"
    });
    let response = post_json_auth(app, "/api/v1/admin/interventions", body, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
