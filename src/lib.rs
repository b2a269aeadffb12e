// Library for tests to access modules

pub mod collector;
pub mod config;
pub mod docker_client;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod version;
