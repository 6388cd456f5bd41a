// Server-rendered reader page
pub mod handlers;
