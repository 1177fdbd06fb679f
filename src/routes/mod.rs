pub mod analytics;
pub mod applicants;
pub mod applications;
pub mod auth;
pub mod customers;
pub mod health;
pub mod jobs;
pub mod orders;
pub mod products;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, MethodRouter},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::{auth::require_bearer_auth, cors::api_cors};
use crate::AppState;

pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Registers `path` as given and without its trailing slash, so both
/// `/api/jobs/` and `/api/jobs` resolve.
fn with_and_without_slash(
    router: Router<AppState>,
    (path, method_router): (&str, MethodRouter<AppState>),
) -> Router<AppState> {
    let bare = path.trim_end_matches('/');
    if bare.is_empty() || bare == path {
        return router.route(path, method_router);
    }
    router
        .route(path, method_router.clone())
        .route(bare, method_router)
}

fn public_routes() -> Router<AppState> {
    let routes: Vec<(&str, MethodRouter<AppState>)> = vec![
        ("/health", get(health::health)),
        ("/api/token/", post(auth::obtain_token)),
        ("/api/token/refresh/", post(auth::refresh_token)),
    ];
    routes.into_iter().fold(Router::new(), with_and_without_slash)
}

fn protected_routes() -> Router<AppState> {
    let routes: Vec<(&str, MethodRouter<AppState>)> = vec![
        (
            "/api/applicants/",
            get(applicants::list_applicants).post(applicants::create_applicant),
        ),
        (
            "/api/applicants/:id/",
            get(applicants::get_applicant)
                .put(applicants::replace_applicant)
                .patch(applicants::update_applicant)
                .delete(applicants::delete_applicant),
        ),
        (
            "/api/applicants/:id/resume/",
            post(applicants::upload_resume),
        ),
        ("/api/jobs/", get(jobs::list_jobs).post(jobs::create_job)),
        (
            "/api/jobs/:id/",
            get(jobs::get_job)
                .put(jobs::replace_job)
                .patch(jobs::update_job)
                .delete(jobs::delete_job),
        ),
        (
            "/api/applications/",
            get(applications::list_applications).post(applications::create_application),
        ),
        (
            "/api/applications/:id/",
            get(applications::get_application)
                .put(applications::replace_application)
                .patch(applications::update_application)
                .delete(applications::delete_application),
        ),
        ("/api/apply/", post(applications::apply_for_job)),
        (
            "/api/customers/",
            get(customers::list_customers).post(customers::create_customer),
        ),
        (
            "/api/customers/:id/",
            get(customers::get_customer)
                .put(customers::replace_customer)
                .patch(customers::update_customer)
                .delete(customers::delete_customer),
        ),
        (
            "/api/products/",
            get(products::list_products).post(products::create_product),
        ),
        (
            "/api/products/:id/",
            get(products::get_product)
                .put(products::replace_product)
                .patch(products::update_product)
                .delete(products::delete_product),
        ),
        (
            "/api/orders/",
            get(orders::list_orders).post(orders::create_order),
        ),
        (
            "/api/orders/:id/",
            get(orders::get_order)
                .put(orders::replace_order)
                .patch(orders::update_order)
                .delete(orders::delete_order),
        ),
        (
            "/api/analytics/sales-summary/",
            get(analytics::sales_summary),
        ),
        (
            "/api/analytics/top-customers/",
            get(analytics::top_customers),
        ),
        (
            "/api/analytics/top-products/",
            get(analytics::top_products),
        ),
    ];
    routes.into_iter().fold(Router::new(), with_and_without_slash)
}

/// The full application: public auth and health routes, bearer-protected
/// resource routes, and read-only media files.
pub fn router(state: AppState) -> Router {
    let protected = protected_routes().route_layer(axum::middleware::from_fn_with_state(
        state.clone(),
        require_bearer_auth,
    ));

    Router::new()
        .merge(public_routes())
        .merge(protected)
        .nest_service(
            &state.config.media_url,
            ServeDir::new(&state.config.media_root),
        )
        .with_state(state)
        .layer(api_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
