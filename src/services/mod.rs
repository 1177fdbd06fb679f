pub mod analytics_service;
pub mod applicant_service;
pub mod application_service;
pub mod auth_service;
pub mod customer_service;
pub mod job_service;
pub mod order_service;
pub mod product_service;
