pub mod health;
pub mod me;
pub mod profile;
pub mod root;
