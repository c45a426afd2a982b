pub mod access;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod i18n;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;
pub mod validation;

#[cfg(test)]
pub mod test_utils;
