pub mod analytics_dto;
pub mod applicant_dto;
pub mod application_dto;
pub mod auth_dto;
pub mod customer_dto;
pub mod job_dto;
pub mod order_dto;
pub mod pagination;
pub mod product_dto;
