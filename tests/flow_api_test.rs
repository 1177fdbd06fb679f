//! End-to-end flows against a real Postgres. Run with
//! `DATABASE_URL=postgres://... cargo test -- --ignored`.

use std::env;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use uuid::Uuid;

use tracker_backend::{
    config::Config,
    database::pool::{create_pool, run_migrations},
    routes, AppState,
};

struct TestApp {
    router: Router,
    state: AppState,
    access: String,
    refresh: String,
}

async fn setup() -> TestApp {
    dotenvy::dotenv().ok();
    let config = Config {
        server_address: "127.0.0.1:0".into(),
        database_url: env::var("DATABASE_URL").expect("DATABASE_URL"),
        database_max_connections: 5,
        jwt_secret: "flow_test_secret".into(),
        access_token_ttl_minutes: 60,
        refresh_token_ttl_days: 7,
        page_size: 10,
        media_root: env::temp_dir()
            .join(format!("tracker-media-{}", Uuid::new_v4()))
            .to_string_lossy()
            .into_owned(),
        media_url: "/media".into(),
        admin_username: None,
        admin_password: None,
    };

    let pool = create_pool(&config).await.expect("pool");
    run_migrations(&pool).await.expect("migrations");

    let state = AppState::new(pool, config);
    let username = format!("user_{}", Uuid::new_v4().simple());
    state
        .auth_service
        .ensure_user(&username, "s3cret-pass")
        .await
        .expect("seed user");

    let router = routes::router(state.clone());
    let (status, tokens) = call(
        &router,
        Method::POST,
        "/api/token/",
        None,
        Some(json!({ "username": username, "password": "s3cret-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{tokens}");

    TestApp {
        router,
        state,
        access: tokens["access"].as_str().unwrap().to_string(),
        refresh: tokens["refresh"].as_str().unwrap().to_string(),
    }
}

async fn call(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null))
}

impl TestApp {
    async fn request(&self, method: Method, uri: &str, body: Option<JsonValue>) -> (StatusCode, JsonValue) {
        call(&self.router, method, uri, Some(&self.access), body).await
    }

    async fn create(&self, uri: &str, body: JsonValue) -> JsonValue {
        let (status, created) = self.request(Method::POST, uri, Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{uri}: {created}");
        created
    }
}

async fn sales_summary(app: &TestApp, query: &str) -> JsonValue {
    let uri = format!("/api/analytics/sales-summary/?{query}");
    let (status, body) = app.request(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body
}

async fn order_count(app: &TestApp, customer: &JsonValue, query: &str) -> JsonValue {
    let uri = format!("/api/orders/?customer={}{query}", customer["id"]);
    let (status, body) = app.request(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["count"].clone()
}

fn unique_email(prefix: &str) -> String {
    format!("{}_{}@Example.com", prefix, Uuid::new_v4().simple())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at Postgres"]
async fn applying_twice_is_rejected() {
    let app = setup().await;
    let applicant = app
        .create(
            "/api/applicants/",
            json!({ "name": "Jane Doe", "email": unique_email("jane"), "phone": "+1 555-0100" }),
        )
        .await;
    assert!(applicant["email"].as_str().unwrap().ends_with("@example.com"));

    let job = app
        .create(
            "/api/jobs/",
            json!({ "title": "Backend Engineer", "description": "Rust services" }),
        )
        .await;

    let payload = json!({ "applicant_id": applicant["id"], "job_id": job["id"] });
    let (status, first) = app.request(Method::POST, "/api/apply/", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED, "{first}");
    assert_eq!(first["message"], json!("Application submitted successfully"));
    assert_eq!(first["application"]["status"], json!("applied"));
    assert_eq!(first["application"]["job_details"]["application_count"], json!(1));

    let (status, second) = app.request(Method::POST, "/api/apply/", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(second["error"], json!("Application failed"));
    assert_eq!(
        second["details"]["non_field_errors"][0],
        json!("Jane Doe has already applied for Backend Engineer. Duplicate applications are not allowed.")
    );

    let (status, duplicate) = app
        .request(
            Method::POST,
            "/api/applications/",
            Some(json!({ "applicant": applicant["id"], "job": job["id"] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        duplicate["error"],
        json!("This applicant has already applied for this job. Duplicate applications are not allowed.")
    );

    let uri = format!("/api/applications/?applicant={}&job={}", applicant["id"], job["id"]);
    let (status, page) = app.request(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], json!(1));

    let (status, missing) = app
        .request(
            Method::POST,
            "/api/apply/",
            Some(json!({ "applicant_id": 0, "job_id": job["id"] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        missing["details"]["applicant_id"][0],
        json!("Applicant with ID 0 does not exist.")
    );
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at Postgres"]
async fn order_totals_follow_items_and_replacement() {
    let app = setup().await;
    let customer = app
        .create(
            "/api/customers/",
            json!({ "name": "Acme", "email": unique_email("acme") }),
        )
        .await;
    let laptop = app
        .create("/api/products/", json!({ "name": "Laptop", "price": "100.00" }))
        .await;
    let mouse = app
        .create("/api/products/", json!({ "name": "Mouse", "price": 25 }))
        .await;
    assert_eq!(mouse["price"], json!("25.00"));

    let order = app
        .create(
            "/api/orders/",
            json!({
                "customer": customer["id"],
                "items": [
                    { "product": laptop["id"], "quantity": 1 },
                    { "product": mouse["id"], "quantity": 2 }
                ]
            }),
        )
        .await;
    assert_eq!(order["total_price"], json!("150.00"));
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
    assert_eq!(order["items"][1]["subtotal"], json!("50.00"));
    assert_eq!(order["customer_details"]["total_spent"], json!("150.00"));

    let uri = format!("/api/orders/{}/", order["id"]);
    let (status, replaced) = app
        .request(
            Method::PUT,
            &uri,
            Some(json!({
                "customer": customer["id"],
                "items": [{ "product": mouse["id"], "quantity": 1 }]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{replaced}");
    assert_eq!(replaced["items"].as_array().unwrap().len(), 1);
    assert_eq!(replaced["total_price"], json!("25.00"));

    let (status, patched) = app
        .request(Method::PATCH, &uri, Some(json!({ "customer": customer["id"] })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["items"].as_array().unwrap().len(), 1);

    let (status, empty) = app
        .request(Method::PATCH, &uri, Some(json!({ "items": [] })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(empty["error"], json!("Order must have at least one item."));

    let (status, unknown) = app
        .request(
            Method::POST,
            "/api/orders/",
            Some(json!({ "customer": customer["id"], "items": [{ "product": 0, "quantity": 1 }] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        unknown["details"]["items"][0],
        json!("Invalid pk \"0\" - object does not exist.")
    );

    let list_uri = format!("/api/orders/?customer={}", customer["id"]);
    let (status, page) = app.request(Method::GET, &list_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], json!(1));
    assert_eq!(page["results"][0]["total_price"], json!("25.00"));
    assert_eq!(page["results"][0]["item_count"], json!(1));

    let customer_uri = format!("/api/customers/{}/", customer["id"]);
    let (status, _) = app.request(Method::DELETE, &customer_uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.request(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at Postgres"]
async fn refresh_tokens_rotate_once() {
    let app = setup().await;

    let (status, rotated) = call(
        &app.router,
        Method::POST,
        "/api/token/refresh/",
        None,
        Some(json!({ "refresh": app.refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(rotated["access"].is_string());
    assert_ne!(rotated["refresh"], json!(app.refresh));

    let (status, reused) = call(
        &app.router,
        Method::POST,
        "/api/token/refresh/",
        None,
        Some(json!({ "refresh": app.refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(reused["error"], json!("invalid_token"));

    let fresh = rotated["access"].as_str().unwrap();
    let (status, _) = call(&app.router, Method::GET, "/api/jobs/", Some(fresh), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at Postgres"]
async fn pages_past_the_end_are_not_found() {
    let app = setup().await;
    app.create(
        "/api/jobs/",
        json!({ "title": "Paging probe", "description": "x" }),
    )
    .await;

    let (status, page) = app.request(Method::GET, "/api/jobs/?page=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["page"], json!(1));
    assert_eq!(page["previous"], json!(null));

    let (status, body) = app.request(Method::GET, "/api/jobs/?page=100000", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Invalid page." }));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at Postgres"]
async fn applicant_phone_can_be_replaced_and_cleared() {
    let app = setup().await;
    let email = unique_email("phone");
    let applicant = app
        .create(
            "/api/applicants/",
            json!({ "name": "Sam Lee", "email": email, "phone": "555-0100" }),
        )
        .await;
    let uri = format!("/api/applicants/{}/", applicant["id"]);

    let (status, replaced) = app
        .request(
            Method::PUT,
            &uri,
            Some(json!({ "name": "Sam Lee", "email": email, "phone": null })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{replaced}");
    assert_eq!(replaced["phone"], json!(null));

    let (status, patched) = app
        .request(Method::PATCH, &uri, Some(json!({ "phone": "555-0199" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["phone"], json!("555-0199"));

    let (status, untouched) = app
        .request(Method::PATCH, &uri, Some(json!({ "name": "Sam K. Lee" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(untouched["phone"], json!("555-0199"));

    let (status, cleared) = app
        .request(Method::PATCH, &uri, Some(json!({ "phone": "" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["phone"], json!(null));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at Postgres"]
async fn concurrent_applications_for_one_pair_create_exactly_one() {
    let app = setup().await;
    let applicant = app
        .create(
            "/api/applicants/",
            json!({ "name": "Rita", "email": unique_email("rita") }),
        )
        .await;
    let job = app
        .create("/api/jobs/", json!({ "title": "Tester", "description": "QA" }))
        .await;
    let payload = json!({ "applicant_id": applicant["id"], "job_id": job["id"] });

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let router = app.router.clone();
            let access = app.access.clone();
            let payload = payload.clone();
            tokio::spawn(async move {
                call(&router, Method::POST, "/api/apply/", Some(access.as_str()), Some(payload)).await
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        let (status, body) = handle.await.unwrap();
        assert!(!status.is_server_error(), "{status}: {body}");
        if status == StatusCode::CREATED {
            created += 1;
            continue;
        }
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(body["error"], json!("Application failed"));
        assert_eq!(
            body["details"]["non_field_errors"][0],
            json!("Rita has already applied for Tester. Duplicate applications are not allowed.")
        );
    }
    assert_eq!(created, 1);

    let uri = format!("/api/applications/?applicant={}&job={}", applicant["id"], job["id"]);
    let (_, page) = app.request(Method::GET, &uri, None).await;
    assert_eq!(page["count"], json!(1));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at Postgres"]
async fn date_bounds_are_inclusive_in_reports_and_order_lists() {
    let app = setup().await;

    // A day far in the past that no other flow writes to.
    let offset = (Uuid::new_v4().as_u128() % 20_000) as i64;
    let day = NaiveDate::from_ymd_opt(1920, 1, 1).unwrap() + Duration::days(offset);
    let next = day + Duration::days(1);
    let late = Utc.from_utc_datetime(&day.and_hms_opt(23, 30, 0).unwrap());
    let midnight = Utc.from_utc_datetime(&next.and_hms_opt(0, 0, 0).unwrap());
    let (d, n) = (day.to_string(), next.to_string());

    let customer = app
        .create(
            "/api/customers/",
            json!({ "name": "Dated", "email": unique_email("dated") }),
        )
        .await;
    let product = app
        .create("/api/products/", json!({ "name": "Gadget", "price": "10.00" }))
        .await;

    for (quantity, at) in [(3, late), (5, midnight)] {
        let order = app
            .create(
                "/api/orders/",
                json!({
                    "customer": customer["id"],
                    "items": [{ "product": product["id"], "quantity": quantity }]
                }),
            )
            .await;
        sqlx::query("UPDATE orders SET order_date = $2 WHERE id = $1")
            .bind(order["id"].as_i64().unwrap())
            .bind(at)
            .execute(&app.state.pool)
            .await
            .unwrap();
    }

    let first = sales_summary(&app, &format!("from={d}&to={d}")).await;
    assert_eq!(first["total_orders"], json!(1));
    assert_eq!(first["total_sales"], json!(30.0));
    assert_eq!(first["date_range"], json!({ "from": d, "to": d }));

    let second = sales_summary(&app, &format!("from={n}&to={n}")).await;
    assert_eq!(second["total_orders"], json!(1));
    assert_eq!(second["total_sales"], json!(50.0));

    let both = sales_summary(&app, &format!("from={d}&to={n}")).await;
    assert_eq!(both["total_orders"], json!(2));
    assert_eq!(both["total_sales"], json!(80.0));
    assert_eq!(both["total_products_sold"], json!(8));

    assert_eq!(order_count(&app, &customer, &format!("&from={d}&to={d}")).await, json!(1));
    assert_eq!(order_count(&app, &customer, &format!("&to={d}")).await, json!(1));
    assert_eq!(order_count(&app, &customer, &format!("&to={n}")).await, json!(2));
    assert_eq!(order_count(&app, &customer, &format!("&from={n}")).await, json!(1));
    assert_eq!(order_count(&app, &customer, "").await, json!(2));

    let uri = format!("/api/products/{}/", product["id"]);
    let (status, _) = app
        .request(Method::PATCH, &uri, Some(json!({ "price": "20.00" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let uri = format!("/api/customers/{}/", customer["id"]);
    let (_, reread) = app.request(Method::GET, &uri, None).await;
    assert_eq!(reread["total_spent"], json!("160.00"));
    assert_eq!(sales_summary(&app, &format!("from={d}&to={n}")).await["total_sales"], json!(160.0));

    let uri = format!("/api/analytics/top-customers/?from={d}&to={n}");
    let (_, top) = app.request(Method::GET, &uri, None).await;
    assert_eq!(top["top_customers"][0]["id"], customer["id"]);
    assert_eq!(top["top_customers"][0]["total_spent"], json!(160.0));
}
