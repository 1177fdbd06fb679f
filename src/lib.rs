pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::services::{
    analytics_service::AnalyticsService, applicant_service::ApplicantService,
    application_service::ApplicationService, auth_service::AuthService,
    customer_service::CustomerService, job_service::JobService, order_service::OrderService,
    product_service::ProductService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub applicant_service: ApplicantService,
    pub job_service: JobService,
    pub application_service: ApplicationService,
    pub customer_service: CustomerService,
    pub product_service: ProductService,
    pub order_service: OrderService,
    pub analytics_service: AnalyticsService,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        let auth_service = AuthService::new(pool.clone(), &config);
        let applicant_service = ApplicantService::new(pool.clone());
        let job_service = JobService::new(pool.clone());
        let application_service = ApplicationService::new(pool.clone());
        let customer_service = CustomerService::new(pool.clone());
        let product_service = ProductService::new(pool.clone());
        let order_service = OrderService::new(pool.clone());
        let analytics_service = AnalyticsService::new(pool.clone());

        Self {
            pool,
            config: Arc::new(config),
            auth_service,
            applicant_service,
            job_service,
            application_service,
            customer_service,
            product_service,
            order_service,
            analytics_service,
        }
    }
}
