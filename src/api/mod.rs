use std::sync::Arc;

use poem::{
    Endpoint, EndpointExt, Route,
    middleware::{Cors, Tracing as PoemTracing},
};
use poem_openapi::OpenApiService;

use crate::config::Config;
use crate::engine::ProgressEngine;

pub mod auth;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::ProgressApi;

/// The API under `/`, RapiDoc under `/ui` and the OpenAPI document under `/spec`.
pub fn build_route(engine: Arc<ProgressEngine>, config: Arc<Config>) -> impl Endpoint {
    let version = env!("CARGO_PKG_VERSION");
    let public_url = config.public_url.clone();
    let api = ProgressApi { engine, config };
    let api_service =
        OpenApiService::new(api, "Yoga Content Progress API", version).server(public_url);
    let ui = api_service.rapidoc();
    let spec = api_service.spec();
    Route::new()
        .nest("/", api_service)
        .nest("/ui", ui)
        .nest("/spec", poem::endpoint::make_sync(move |_| spec.clone()))
        .with(Cors::new())
        .with(PoemTracing)
}
