mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use food_order_api::entity::foods::Entity as Foods;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{Value, json};

const BOUNDARY: &str = "food-order-test-boundary";

fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(token: &str, body: Vec<u8>) -> anyhow::Result<Request<Body>> {
    Ok(Request::post("/api/food/add")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))?)
}

const FIELDS: &[(&str, &str)] = &[
    ("name", "Greek salad"),
    ("description", "Feta and olives"),
    ("price", "12"),
    ("category", "Salad"),
];

#[tokio::test]
async fn food_upload_list_serve_and_remove() -> anyhow::Result<()> {
    let app = common::spawn_app().await?;
    let (token, _) = app.register("Asha", "asha@example.com").await?;

    let image: &[u8] = b"\x89PNG fake image bytes";
    let (status, body) = app
        .send(upload_request(
            &token,
            multipart_body(FIELDS, Some(("../greek salad.png", image))),
        )?)
        .await?;
    assert_eq!(status, StatusCode::OK, "{}", String::from_utf8_lossy(&body));

    let (status, body) = app.get("/api/food/list").await?;
    assert_eq!(status, StatusCode::OK);
    let list: Value = serde_json::from_slice(&body)?;
    let foods = list["data"].as_array().expect("foods");
    assert_eq!(foods.len(), 1);
    assert_eq!(foods[0]["name"], "Greek salad");
    assert_eq!(foods[0]["price"], 12);
    let file = foods[0]["image"].as_str().expect("image").to_string();
    assert!(file.ends_with("_greek_salad.png"), "{file}");

    let (status, served) = app.get(&format!("/images/{file}")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&served[..], image);

    let id = foods[0]["id"].as_str().expect("id").to_string();
    let (status, body) = app
        .post("/api/food/remove", Some(&token), json!({ "id": id }))
        .await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Food Removed");
    assert_eq!(Foods::find().count(&app.state.orm).await?, 0);
    assert!(!app.state.upload_dir.join(&file).exists());

    let (status, _) = app
        .post("/api/food/remove", Some(&token), json!({ "id": id }))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn food_upload_validates_fields() -> anyhow::Result<()> {
    let app = common::spawn_app().await?;
    let (token, _) = app.register("Asha", "asha@example.com").await?;

    let (status, _) = app
        .send(upload_request(&token, multipart_body(FIELDS, None))?)
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let bad_price = [
        ("name", "Greek salad"),
        ("description", "Feta and olives"),
        ("price", "twelve"),
        ("category", "Salad"),
    ];
    let (status, _) = app
        .send(upload_request(
            &token,
            multipart_body(&bad_price, Some(("a.png", &b"img"[..]))),
        )?)
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let unauthenticated = Request::post("/api/food/add")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(FIELDS, Some(("a.png", &b"img"[..])))))?;
    let (status, _) = app.send(unauthenticated).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(Foods::find().count(&app.state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn cart_add_remove_and_get() -> anyhow::Result<()> {
    let app = common::spawn_app().await?;
    let (token, _) = app.register("Asha", "asha@example.com").await?;
    let salad = app.seed_food("Greek salad", 12).await?;

    assert_eq!(app.cart(&token).await?, json!({}));

    for _ in 0..2 {
        let (status, body) = app
            .post("/api/cart/add", Some(&token), json!({ "itemId": salad.to_string() }))
            .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Added To Cart");
    }
    assert_eq!(app.cart(&token).await?, common::cart_with(salad, 2));

    let (status, body) = app
        .post("/api/cart/remove", Some(&token), json!({ "itemId": salad.to_string() }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Removed From Cart");
    assert_eq!(app.cart(&token).await?, common::cart_with(salad, 1));

    for _ in 0..2 {
        let (status, _) = app
            .post("/api/cart/remove", Some(&token), json!({ "itemId": salad.to_string() }))
            .await?;
        assert_eq!(status, StatusCode::OK);
    }
    assert_eq!(app.cart(&token).await?, json!({}));
    Ok(())
}

#[tokio::test]
async fn cart_rejects_unknown_or_missing_items() -> anyhow::Result<()> {
    let app = common::spawn_app().await?;
    let (token, _) = app.register("Asha", "asha@example.com").await?;

    let (status, _) = app
        .post(
            "/api/cart/add",
            Some(&token),
            json!({ "itemId": uuid::Uuid::new_v4().to_string() }),
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post("/api/cart/add", Some(&token), json!({ "itemId": "pizza" }))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.post("/api/cart/add", Some(&token), json!({})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(app.cart(&token).await?, json!({}));
    Ok(())
}

#[tokio::test]
async fn cors_allows_configured_frontend_only() -> anyhow::Result<()> {
    let app = common::spawn_app().await?;

    let preflight = |origin: &str| {
        Request::options("/api/user/login")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type,token")
            .body(Body::empty())
    };

    let response = tower::ServiceExt::oneshot(app.router.clone(), preflight(common::ALLOWED_ORIGIN)?).await?;
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some(common::ALLOWED_ORIGIN)
    );

    let response = tower::ServiceExt::oneshot(app.router.clone(), preflight("https://evil.example")?).await?;
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
    Ok(())
}
