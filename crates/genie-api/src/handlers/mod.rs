pub mod flows;
pub mod health;
pub mod upload;
