use axum::extract::State;
use std::sync::Arc;

pub mod api;
pub mod app_env;
pub mod db;
pub mod domain;
pub mod dto;
pub mod external_connections;
pub mod logging;
pub mod persistence;
pub mod routes;
pub mod routing_utils;


/// State handed to every route handler
pub struct SharedData {
    pub ext_cxn: persistence::ExternalConnectivity,
}

pub type AppState = State<Arc<SharedData>>;
