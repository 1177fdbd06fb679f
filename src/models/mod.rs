pub mod applicant;
pub mod application;
pub mod customer;
pub mod job;
pub mod order;
pub mod product;
pub mod user;
