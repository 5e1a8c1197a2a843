#![doc = "The `tasktrack` library crate."]
#![doc = ""]
#![doc = "Contains the domain models, authentication mechanisms, routing configuration,"]
#![doc = "and error handling for the task-tracking API. The binary (`main.rs`) uses it"]
#![doc = "to construct and run the application; the integration tests drive the same"]
#![doc = "route tree through `actix_web::test`."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
