pub mod health;
pub mod verification;
