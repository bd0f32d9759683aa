use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use domain::services::{Capturer, SiteDefaults, SuggestionService};
use persistence::{InvitationStore, UserStore};
use shared::jwt::{JwtConfig, JwtError};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, security_headers_middleware,
    trace_id, RateLimiterState,
};
use crate::routes::{admin, auth, editor, health, invitations, profile, public};
use crate::services::{AuthService, SaveGate};
use crate::views::script::CARD_SCRIPT_PATH;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Present when running against PostgreSQL; used by readiness checks.
    pub pool: Option<PgPool>,
    pub invitations: Arc<dyn InvitationStore>,
    pub suggestions: Arc<dyn SuggestionService>,
    pub capturer: Arc<dyn Capturer>,
    pub jwt: Arc<JwtConfig>,
    pub auth: Arc<AuthService>,
    pub save_gate: Arc<SaveGate>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
    pub site: SiteDefaults,
}

impl AppState {
    pub fn new(
        config: Config,
        pool: Option<PgPool>,
        invitations: Arc<dyn InvitationStore>,
        users: Arc<dyn UserStore>,
        suggestions: Arc<dyn SuggestionService>,
        capturer: Arc<dyn Capturer>,
    ) -> Result<Self, JwtError> {
        let jwt = Arc::new(JwtConfig::with_leeway(
            &config.jwt.private_key,
            &config.jwt.public_key,
            config.jwt.access_token_expiry_secs,
            config.jwt.refresh_token_expiry_secs,
            config.jwt.leeway_secs,
        )?);
        let auth = Arc::new(AuthService::new(
            users,
            jwt.clone(),
            &config.admin.bootstrap_email,
        ));
        let rate_limiter = RateLimiterState::new(config.security.rate_limit_per_minute).map(Arc::new);

        Ok(Self {
            site: config.site_defaults(),
            config: Arc::new(config),
            pool,
            invitations,
            suggestions,
            capturer,
            jwt,
            auth,
            save_gate: Arc::new(SaveGate::new()),
            rate_limiter,
        })
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.security.cors_origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    let account_routes = Router::new()
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/admin/login", post(auth::admin_login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route(
            "/api/v1/me/profile",
            get(profile::get_profile).put(profile::update_profile),
        );

    let invitation_routes = Router::new()
        .route(
            "/api/v1/invitations",
            post(invitations::create_invitation).get(invitations::list_invitations),
        )
        .route(
            "/api/v1/invitations/:id",
            get(invitations::get_invitation)
                .put(invitations::save_invitation)
                .delete(invitations::delete_invitation),
        )
        .route("/api/v1/invitations/:id/edits", post(invitations::apply_edits))
        .route(
            "/api/v1/invitations/:id/suggestions",
            post(invitations::suggest),
        )
        .route(
            "/api/v1/invitations/:id/share-text",
            get(invitations::share_text),
        )
        .route("/api/v1/invitations/:id/export", post(invitations::export_card));

    let admin_routes = Router::new()
        .route(
            "/api/v1/admin/invitations",
            get(admin::list_all_invitations),
        )
        .route(
            "/api/v1/admin/invitations/:id/edit-expiry",
            put(admin::set_edit_expiry),
        );

    let public_routes = Router::new()
        .route("/api/v1/editor/options", get(editor::editor_options))
        .route(
            "/api/v1/public/invitations/:id",
            get(public::public_invitation),
        )
        .route("/invitation/:id", get(public::invitation_page))
        .route(CARD_SCRIPT_PATH, get(public::card_script));

    // Health checks and metrics are not rate limited.
    let infra_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    let limited = Router::new()
        .merge(account_routes)
        .merge(invitation_routes)
        .merge(admin_routes)
        .merge(public_routes)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .merge(infra_routes)
        .merge(limited)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors_layer(&config))
        .with_state(state)
}
