use axum::Router;
use axum::middleware::from_fn;
use axum::routing::{delete, get, post};
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::state::AppState;
use crate::{auth, handlers, middleware};

pub fn build_router<Store>(app_state: AppState, session_layer: SessionManagerLayer<Store>) -> Router
where
    Store: SessionStore + Clone,
{
    let browser_routes = Router::new()
        .route("/", get(auth::index_handler))
        .route("/login", get(auth::login_handler))
        .route(&app_state.redirect_path, get(auth::auth_response_handler))
        .route("/logout", get(auth::logout_handler))
        .route(
            "/call_downstream_api",
            get(auth::call_downstream_api_handler),
        );

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(browser_routes)
        .merge(build_role_routes(app_state.role_api_require_login))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

fn build_role_routes(require_login: bool) -> Router<AppState> {
    let routes = Router::new()
        .route("/roles", get(handlers::roles::list_roles_handler))
        .route(
            "/users_with_roles",
            get(handlers::roles::users_with_roles_handler),
        )
        .route("/user_roles", post(handlers::roles::user_roles_handler))
        .route("/assign_roles", post(handlers::roles::assign_roles_handler))
        .route("/remove_roles", delete(handlers::roles::remove_roles_handler));

    if require_login {
        routes.route_layer(from_fn(middleware::require_auth))
    } else {
        routes
    }
}
