pub mod crypto;
pub mod media;
pub mod money;
pub mod time;
pub mod token;
pub mod validation;
