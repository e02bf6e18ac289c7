pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod validation;

use std::any::Any;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{self, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Build the full application router over `state`.
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(handlers::public::root))
        .route("/health", get(handlers::public::health))
        .route("/login", post(handlers::public::login_post))
        .route("/users", post(handlers::public::register_post))
        // Protected
        .merge(protected_routes(state.clone()))
        .fallback(not_found);
    router = with_global_layers(router, &state);

    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

// Outermost first: CORS wraps the panic catcher so error responses still carry
// the allow-origin headers.
fn with_global_layers(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router.layer(
        ServiceBuilder::new()
            .layer(cors_layer(state))
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes)),
    )
}

fn protected_routes(state: AppState) -> Router<AppState> {
    movie_routes()
        .merge(user_routes())
        .merge(beer_routes())
        .route_layer(from_fn_with_state(state, middleware::jwt_auth_middleware))
}

fn movie_routes() -> Router<AppState> {
    use handlers::protected::movies;

    Router::new()
        .route("/movies", get(movies::list))
        .route("/movies/:title", get(movies::by_title))
        .route("/movies/genres/:genre", get(movies::genre))
        .route("/movies/directors/:director", get(movies::director))
        .route("/movies/actors/:actor", get(movies::by_actor))
}

fn user_routes() -> Router<AppState> {
    use handlers::protected::{lists, users};

    Router::new()
        // POST /users (registration) is public and merged separately
        .route("/users", get(users::list))
        .route(
            "/users/:username",
            get(users::get).put(users::update).delete(users::delete),
        )
        .route(
            "/users/:username/favorites/:movie_id",
            post(lists::add_favorite).delete(lists::remove_favorite),
        )
        .route(
            "/users/:username/ToWatch/:movie_id",
            post(lists::add_to_watch).delete(lists::remove_to_watch),
        )
}

fn beer_routes() -> Router<AppState> {
    use handlers::protected::{beers, breweries};

    Router::new()
        .route("/beers", get(beers::list).post(beers::create))
        .route("/beers/:id", get(beers::get).delete(beers::delete))
        .route("/breweries", get(breweries::list).post(breweries::create))
        .route("/breweries/:id", get(breweries::get))
        .route(
            "/breweries/:id/beers/:beer_id",
            post(breweries::add_beer).delete(breweries::remove_beer),
        )
}

fn cors_layer(state: &AppState) -> CorsLayer {
    if state.config.allows_any_origin() {
        return CorsLayer::new()
            .allow_origin(cors::Any)
            .allow_methods(cors::Any)
            .allow_headers(cors::Any);
    }

    let origins: Vec<HeaderValue> = state
        .config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(cors::Any)
        .allow_headers(cors::Any)
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Handler panicked: {}", detail);

    ApiError::internal_server_error("Something broke!").into_response()
}
