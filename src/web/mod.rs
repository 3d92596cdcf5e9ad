pub mod handlers;
pub mod models;
pub mod recover;
pub mod routes;
