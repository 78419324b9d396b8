mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{create_symptom, register_admin, register_user, send, spawn_app};

#[tokio::test]
async fn reference_reads_are_public() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "GET", "/diseases", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);

    let (status, _) = send(&app, "GET", "/symptoms", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/treatments", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn disease_mutations_require_admin_role() {
    let app = spawn_app().await;
    let (farmer_token, _) = register_user(&app, "Farmer", "farmer@example.com").await;
    let admin_token = register_admin(&app, "admin@example.com").await;

    let payload = json!({
        "disease_name": "Fin Rot",
        "target_species": "FISH",
        "contagious": true,
        "severity_level": "HIGH"
    });

    let (status, body) = send(&app, "POST", "/diseases", Some(&farmer_token), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    // Identical payload succeeds for the admin.
    let (status, body) = send(&app, "POST", "/diseases", Some(&admin_token), Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    let disease_id = body["id"].as_str().unwrap().to_string();

    let uri = format!("/diseases/{}", disease_id);
    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        Some(&farmer_token),
        Some(json!({"severity_level": "LOW"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", &uri, Some(&farmer_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn duplicate_disease_name_is_a_conflict() {
    let app = spawn_app().await;
    let admin_token = register_admin(&app, "admin@example.com").await;

    let payload = json!({"disease_name": "Fin Rot", "target_species": "FISH"});
    let (status, _) = send(&app, "POST", "/diseases", Some(&admin_token), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/diseases", Some(&admin_token), Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn disease_with_linked_symptom_end_to_end() {
    let app = spawn_app().await;
    let admin_token = register_admin(&app, "admin@example.com").await;

    let symptom_id = create_symptom(&app, &admin_token, "Lethargy").await;

    let (status, body) = send(
        &app,
        "POST",
        "/diseases",
        Some(&admin_token),
        Some(json!({
            "disease_name": "Fin Rot",
            "target_species": "FISH",
            "contagious": true,
            "severity_level": "HIGH",
            "symptom_ids": [symptom_id]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let disease_id = body["id"].as_str().unwrap().to_string();

    // Public read shows exactly one associated symptom.
    let uri = format!("/diseases/{}", disease_id);
    let (status, body) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    let symptoms = body["symptoms"].as_array().unwrap();
    assert_eq!(symptoms.len(), 1);
    assert_eq!(symptoms[0]["symptom_name"], "Lethargy");

    let (status, _) = send(&app, "DELETE", &uri, Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn symptom_list_update_replaces_wholesale_and_collapses_duplicates() {
    let app = spawn_app().await;
    let admin_token = register_admin(&app, "admin@example.com").await;

    let a = create_symptom(&app, &admin_token, "Lethargy").await;
    let b = create_symptom(&app, &admin_token, "White Spots").await;

    let (_, body) = send(
        &app,
        "POST",
        "/diseases",
        Some(&admin_token),
        Some(json!({
            "disease_name": "Ich",
            "target_species": "FISH",
            "symptom_ids": [a]
        })),
    )
    .await;
    let disease_id = body["id"].as_str().unwrap().to_string();
    let uri = format!("/diseases/{}", disease_id);

    // Replacement discards the old set entirely; duplicates collapse.
    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&admin_token),
        Some(json!({"symptom_ids": [b, b]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let symptoms = body["symptoms"].as_array().unwrap();
    assert_eq!(symptoms.len(), 1);
    assert_eq!(symptoms[0]["symptom_name"], "White Spots");
}

#[tokio::test]
async fn unknown_symptom_id_fails_the_whole_update() {
    let app = spawn_app().await;
    let admin_token = register_admin(&app, "admin@example.com").await;

    let a = create_symptom(&app, &admin_token, "Lethargy").await;
    let (_, body) = send(
        &app,
        "POST",
        "/diseases",
        Some(&admin_token),
        Some(json!({
            "disease_name": "Ich",
            "target_species": "FISH",
            "symptom_ids": [a]
        })),
    )
    .await;
    let disease_id = body["id"].as_str().unwrap().to_string();
    let uri = format!("/diseases/{}", disease_id);

    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        Some(&admin_token),
        Some(json!({
            "disease_name": "Renamed",
            "symptom_ids": ["00000000-0000-0000-0000-000000000000"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Nothing was applied, including the rename.
    let (_, body) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(body["disease_name"], "Ich");
    assert_eq!(body["symptoms"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn symptom_mutations_require_admin_role() {
    let app = spawn_app().await;
    let (farmer_token, _) = register_user(&app, "Farmer", "farmer@example.com").await;
    let admin_token = register_admin(&app, "admin@example.com").await;

    let (status, _) = send(
        &app,
        "POST",
        "/symptoms",
        Some(&farmer_token),
        Some(json!({"symptom_name": "Lethargy", "target_species": "FISH"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let symptom_id = create_symptom(&app, &admin_token, "Lethargy").await;
    let uri = format!("/symptoms/{}", symptom_id);

    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        Some(&farmer_token),
        Some(json!({"symptom_name": "Renamed"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", &uri, Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn treatments_crud_and_disease_links() {
    let app = spawn_app().await;
    let admin_token = register_admin(&app, "admin@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/treatments",
        Some(&admin_token),
        Some(json!({
            "treatment_name": "Salt Bath",
            "application_method": "BATH",
            "dosage_text": "3g/L for 30 minutes",
            "duration_days": 5
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let treatment_id = body["id"].as_str().unwrap().to_string();

    let (_, body) = send(
        &app,
        "POST",
        "/diseases",
        Some(&admin_token),
        Some(json!({"disease_name": "Ich", "target_species": "FISH"})),
    )
    .await;
    let disease_id = body["id"].as_str().unwrap().to_string();

    let link_uri = format!("/diseases/{}/treatments", disease_id);
    let (status, _) = send(
        &app,
        "POST",
        &link_uri,
        Some(&admin_token),
        Some(json!({
            "treatment_id": treatment_id,
            "is_primary_treatment": true,
            "effectiveness_notes": "first line"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Linking twice conflicts.
    let (status, _) = send(
        &app,
        "POST",
        &link_uri,
        Some(&admin_token),
        Some(json!({"treatment_id": treatment_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Public read of the linked treatments.
    let (status, body) = send(&app, "GET", &link_uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    let links = body.as_array().unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0]["is_primary_treatment"], true);
    assert_eq!(links[0]["treatment"]["treatment_name"], "Salt Bath");

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/diseases/{}/treatments/{}", disease_id, treatment_id),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", &link_uri, None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn treatment_duration_must_be_positive() {
    let app = spawn_app().await;
    let admin_token = register_admin(&app, "admin@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/treatments",
        Some(&admin_token),
        Some(json!({
            "treatment_name": "Bad",
            "application_method": "FEED",
            "duration_days": 0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn pagination_beyond_range_yields_empty_not_error() {
    let app = spawn_app().await;
    let admin_token = register_admin(&app, "admin@example.com").await;
    create_symptom(&app, &admin_token, "Lethargy").await;

    let (status, body) = send(&app, "GET", "/symptoms?skip=500&limit=10", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);
}
