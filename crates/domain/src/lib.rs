pub mod entity;
pub mod field;
pub mod models;
pub mod record;
pub mod route;
