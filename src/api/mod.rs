// JSON API and the router that serves it alongside the page
pub mod handlers;
pub mod models;
pub mod routes;
