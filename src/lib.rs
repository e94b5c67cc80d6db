pub mod catalog;
pub mod config;
pub mod docx;
pub mod error;
pub mod gemini;
pub mod models;
pub mod render;
pub mod routes;
