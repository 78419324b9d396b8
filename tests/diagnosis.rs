mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{
    create_farm, create_symptom, multipart_file, parse_timestamp, register_admin, register_user,
    send, send_multipart, spawn_app,
};

#[tokio::test]
async fn duplicate_symptom_ids_collapse_on_create() {
    let app = spawn_app().await;
    let admin_token = register_admin(&app, "admin@example.com").await;
    let (token, _) = register_user(&app, "Farmer", "farmer@example.com").await;

    let a = create_symptom(&app, &admin_token, "Lethargy").await;
    let b = create_symptom(&app, &admin_token, "White Spots").await;
    let farm_id = create_farm(&app, &token, "Green Valley").await;

    let (status, body) = send(
        &app,
        "POST",
        "/detection/analyze",
        Some(&token),
        Some(json!({
            "farm_id": farm_id,
            "target_species": "FISH",
            "symptoms_text": "fish lying at the bottom",
            "symptom_ids": [a, a, b]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "OPEN");
    assert_eq!(body["images"], json!([]));
    assert!(body.get("final_disease").is_none());
    // [A, A, B] produces exactly two associations.
    assert_eq!(body["symptoms"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_symptom_fails_creation_without_partial_rows() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "Farmer", "farmer@example.com").await;
    let farm_id = create_farm(&app, &token, "Green Valley").await;

    let (status, _) = send(
        &app,
        "POST",
        "/detection/analyze",
        Some(&token),
        Some(json!({
            "farm_id": farm_id,
            "target_species": "FISH",
            "symptom_ids": ["00000000-0000-0000-0000-000000000000"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The whole transaction rolled back; nothing in the history.
    let (_, body) = send(&app, "GET", "/detection/history", Some(&token), None).await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn diagnosis_requires_own_farm() {
    let app = spawn_app().await;
    let (token_a, _) = register_user(&app, "A", "a@example.com").await;
    let (token_b, _) = register_user(&app, "B", "b@example.com").await;
    let farm_id = create_farm(&app, &token_a, "Alpha Farm").await;

    let (status, _) = send(
        &app,
        "POST",
        "/detection/analyze",
        Some(&token_b),
        Some(json!({"farm_id": farm_id, "target_species": "FISH"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn history_is_scoped_to_the_caller() {
    let app = spawn_app().await;
    let (token_a, user_a) = register_user(&app, "A", "a@example.com").await;
    let (token_b, _) = register_user(&app, "B", "b@example.com").await;

    let farm_a = create_farm(&app, &token_a, "Alpha Farm").await;
    let farm_b = create_farm(&app, &token_b, "Beta Farm").await;

    for _ in 0..2 {
        let (status, _) = send(
            &app,
            "POST",
            "/detection/analyze",
            Some(&token_a),
            Some(json!({"farm_id": farm_a, "target_species": "FISH"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (status, _) = send(
        &app,
        "POST",
        "/detection/analyze",
        Some(&token_b),
        Some(json!({"farm_id": farm_b, "target_species": "POULTRY"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "GET", "/detection/history", Some(&token_a), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    for d in body["diagnoses"].as_array().unwrap() {
        assert_eq!(d["user_id"], user_a.as_str());
    }

    let (_, body) = send(&app, "GET", "/detection/history", Some(&token_b), None).await;
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn another_users_diagnosis_is_not_found() {
    let app = spawn_app().await;
    let (token_a, _) = register_user(&app, "A", "a@example.com").await;
    let (token_b, _) = register_user(&app, "B", "b@example.com").await;
    let farm_a = create_farm(&app, &token_a, "Alpha Farm").await;

    let (_, body) = send(
        &app,
        "POST",
        "/detection/analyze",
        Some(&token_a),
        Some(json!({"farm_id": farm_a, "target_species": "FISH"})),
    )
    .await;
    let diagnosis_id = body["id"].as_str().unwrap().to_string();

    let uri = format!("/detection/{}", diagnosis_id);
    let (status, _) = send(&app, "GET", &uri, Some(&token_b), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &uri, Some(&token_b), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_refreshes_timestamp_and_allows_any_status_transition() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "Farmer", "farmer@example.com").await;
    let farm_id = create_farm(&app, &token, "Green Valley").await;

    let (_, body) = send(
        &app,
        "POST",
        "/detection/analyze",
        Some(&token),
        Some(json!({"farm_id": farm_id, "target_species": "FISH"})),
    )
    .await;
    let diagnosis_id = body["id"].as_str().unwrap().to_string();
    let created_updated_at = parse_timestamp(body["updated_at"].as_str().unwrap());

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    let uri = format!("/detection/{}", diagnosis_id);
    // No transition graph: RESOLVED may be set directly from OPEN...
    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({"status": "RESOLVED"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "RESOLVED");
    let after_first = parse_timestamp(body["updated_at"].as_str().unwrap());
    assert!(after_first > created_updated_at);

    // ...and back again.
    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({"status": "OPEN"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OPEN");

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    // A no-status update still refreshes the timestamp.
    let (_, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({"symptoms_text": "gills look pale"})),
    )
    .await;
    let after_second = parse_timestamp(body["updated_at"].as_str().unwrap());
    assert!(after_second > after_first);
    assert_eq!(body["symptoms_text"], "gills look pale");
}

#[tokio::test]
async fn symptom_replacement_on_update_collapses_duplicates() {
    let app = spawn_app().await;
    let admin_token = register_admin(&app, "admin@example.com").await;
    let (token, _) = register_user(&app, "Farmer", "farmer@example.com").await;

    let a = create_symptom(&app, &admin_token, "Lethargy").await;
    let b = create_symptom(&app, &admin_token, "White Spots").await;
    let farm_id = create_farm(&app, &token, "Green Valley").await;

    let (_, body) = send(
        &app,
        "POST",
        "/detection/analyze",
        Some(&token),
        Some(json!({
            "farm_id": farm_id,
            "target_species": "FISH",
            "symptom_ids": [a]
        })),
    )
    .await;
    let diagnosis_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/detection/{}", diagnosis_id),
        Some(&token),
        Some(json!({"symptom_ids": [b, b]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let symptoms = body["symptoms"].as_array().unwrap();
    assert_eq!(symptoms.len(), 1);
    assert_eq!(symptoms[0]["symptom_name"], "White Spots");
}

#[tokio::test]
async fn hydration_parameter_controls_included_relations() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "Farmer", "farmer@example.com").await;
    let farm_id = create_farm(&app, &token, "Green Valley").await;

    let (_, body) = send(
        &app,
        "POST",
        "/detection/analyze",
        Some(&token),
        Some(json!({"farm_id": farm_id, "target_species": "FISH"})),
    )
    .await;
    let diagnosis_id = body["id"].as_str().unwrap().to_string();

    // Default: everything resolved.
    let (_, body) = send(
        &app,
        "GET",
        &format!("/detection/{}", diagnosis_id),
        Some(&token),
        None,
    )
    .await;
    assert!(body.get("images").is_some());
    assert!(body.get("symptoms").is_some());

    // Narrowed: only what was asked for.
    let (_, body) = send(
        &app,
        "GET",
        &format!("/detection/{}?include=symptoms", diagnosis_id),
        Some(&token),
        None,
    )
    .await;
    assert!(body.get("images").is_none());
    assert!(body.get("symptoms").is_some());
}

#[tokio::test]
async fn image_upload_end_to_end() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "Farmer", "farmer@example.com").await;
    let farm_id = create_farm(&app, &token, "Green Valley").await;

    let (_, body) = send(
        &app,
        "POST",
        "/detection/analyze",
        Some(&token),
        Some(json!({"farm_id": farm_id, "target_species": "FISH"})),
    )
    .await;
    let diagnosis_id = body["id"].as_str().unwrap().to_string();
    let created_at = parse_timestamp(body["created_at"].as_str().unwrap());

    let (content_type, payload) =
        multipart_file("file", "fin.jpg", "image/jpeg", b"\xff\xd8\xff\xe0 fake jpeg");
    let (status, body) = send_multipart(
        &app,
        &format!("/detection/{}/images", diagnosis_id),
        &token,
        &content_type,
        payload,
    )
    .await;

    assert_eq!(status, StatusCode::OK, "upload failed: {}", body);
    assert_eq!(body["diagnosis_id"], diagnosis_id.as_str());
    let image_url = body["image_url"].as_str().unwrap();
    assert!(image_url.starts_with("/uploads/"));
    assert!(image_url.contains(&diagnosis_id));
    let captured_at = parse_timestamp(body["captured_at"].as_str().unwrap());
    assert!(captured_at >= created_at);

    // The diagnosis now shows exactly one image.
    let (_, body) = send(
        &app,
        "GET",
        &format!("/detection/{}", diagnosis_id),
        Some(&token),
        None,
    )
    .await;
    let images = body["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0]["image_url"], image_url);
}

#[tokio::test]
async fn upload_rejects_disallowed_extension() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "Farmer", "farmer@example.com").await;
    let farm_id = create_farm(&app, &token, "Green Valley").await;

    let (_, body) = send(
        &app,
        "POST",
        "/detection/analyze",
        Some(&token),
        Some(json!({"farm_id": farm_id, "target_species": "FISH"})),
    )
    .await;
    let diagnosis_id = body["id"].as_str().unwrap().to_string();

    let (content_type, payload) =
        multipart_file("file", "malware.exe", "application/octet-stream", b"MZ");
    let (status, body) = send_multipart(
        &app,
        &format!("/detection/{}/images", diagnosis_id),
        &token,
        &content_type,
        payload,
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn upload_to_missing_diagnosis_is_not_found() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "Farmer", "farmer@example.com").await;

    let (content_type, payload) = multipart_file("file", "fin.jpg", "image/jpeg", b"data");
    let (status, _) = send_multipart(
        &app,
        "/detection/00000000-0000-0000-0000-000000000000/images",
        &token,
        &content_type,
        payload,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_diagnosis_removes_it_from_history() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "Farmer", "farmer@example.com").await;
    let farm_id = create_farm(&app, &token, "Green Valley").await;

    let (_, body) = send(
        &app,
        "POST",
        "/detection/analyze",
        Some(&token),
        Some(json!({"farm_id": farm_id, "target_species": "FISH"})),
    )
    .await;
    let diagnosis_id = body["id"].as_str().unwrap().to_string();

    let uri = format!("/detection/{}", diagnosis_id);
    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", "/detection/history", Some(&token), None).await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn final_disease_resolution_hydrates_on_read() {
    let app = spawn_app().await;
    let admin_token = register_admin(&app, "admin@example.com").await;
    let (token, _) = register_user(&app, "Farmer", "farmer@example.com").await;
    let farm_id = create_farm(&app, &token, "Green Valley").await;

    let (_, body) = send(
        &app,
        "POST",
        "/diseases",
        Some(&admin_token),
        Some(json!({"disease_name": "Fin Rot", "target_species": "FISH"})),
    )
    .await;
    let disease_id = body["id"].as_str().unwrap().to_string();

    let (_, body) = send(
        &app,
        "POST",
        "/detection/analyze",
        Some(&token),
        Some(json!({"farm_id": farm_id, "target_species": "FISH"})),
    )
    .await;
    let diagnosis_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/detection/{}", diagnosis_id),
        Some(&token),
        Some(json!({"status": "RESOLVED", "final_disease_id": disease_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["final_disease"]["disease_name"], "Fin Rot");

    // An unknown disease id is rejected outright.
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/detection/{}", diagnosis_id),
        Some(&token),
        Some(json!({"final_disease_id": "00000000-0000-0000-0000-000000000000"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// register -> login -> farm -> diagnosis -> image upload -> read back.
#[tokio::test]
async fn full_workflow_end_to_end() {
    let app = spawn_app().await;

    let (status, _) = common::register(&app, "E2E Farmer", "e2e@example.com", "G00dPassword").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"email": "e2e@example.com", "password": "G00dPassword"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["access_token"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/farms",
        Some(&token),
        Some(json!({"farm_name": "Green Valley", "farm_type": "FISH"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let farm_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/detection/analyze",
        Some(&token),
        Some(json!({"farm_id": farm_id, "target_species": "FISH"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let diagnosis_id = body["id"].as_str().unwrap().to_string();
    let created_at = parse_timestamp(body["created_at"].as_str().unwrap());

    let (content_type, payload) =
        multipart_file("file", "pond.png", "image/png", b"\x89PNG fake png");
    let (status, _) = send_multipart(
        &app,
        &format!("/detection/{}/images", diagnosis_id),
        &token,
        &content_type,
        payload,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/detection/{}", diagnosis_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let images = body["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    assert!(!images[0]["image_url"].as_str().unwrap().is_empty());
    let captured_at = parse_timestamp(images[0]["captured_at"].as_str().unwrap());
    assert!(captured_at >= created_at);
}
