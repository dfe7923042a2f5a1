//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, timeouts, body limits, request ID, security headers)
//! - Guard page routes with the edge gate, API routes with CORS and rate limits
//! - Run the rate-limit sweeper alongside the server
//! - Bind server to listener and drain on shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::{self as axum_middleware, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::auth::{Authenticator, CookieSettings};
use crate::config::GateConfig;
use crate::http::edge::edge_gate;
use crate::http::handlers::{auth, chat, health, pages, preflight};
use crate::http::request::request_id;
use crate::observability::metrics;
use crate::security::headers::security_headers;
use crate::security::{cors_middleware, BoundaryGuard, RateLimiter};
use crate::upstream::WebhookClient;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub guard: Arc<BoundaryGuard>,
    pub auth: Arc<Authenticator>,
    pub webhook: Arc<WebhookClient>,
    pub cookies: CookieSettings,
}

/// HTTP server for the chat gate.
pub struct HttpServer {
    router: Router,
    config: GateConfig,
    limiter: Arc<RateLimiter>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GateConfig) -> Self {
        let limiter = Arc::new(RateLimiter::new());
        let guard = Arc::new(BoundaryGuard::new(&config, limiter.clone()));

        let state = AppState {
            guard: guard.clone(),
            auth: Arc::new(Authenticator::new(config.auth.shared_secret.clone())),
            webhook: Arc::new(WebhookClient::new(&config.webhook)),
            cookies: CookieSettings {
                secure: config.environment.is_production(),
            },
        };

        let router = Self::build_router(&config, state, guard);
        Self {
            router,
            config,
            limiter,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GateConfig, state: AppState, guard: Arc<BoundaryGuard>) -> Router {
        let api_routes = Router::new()
            .route("/api/auth", post(auth::login).options(preflight))
            .route("/api/chat", post(chat::chat).options(preflight))
            .route("/api/logout", post(auth::logout).options(preflight))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(axum_middleware::from_fn_with_state(guard, cors_middleware));

        let page_routes = Router::new()
            .route("/", get(pages::login_page))
            .route("/chat", get(pages::chat_page))
            .route("/chat/", get(pages::chat_page))
            .route("/chat/{*rest}", get(pages::chat_page))
            .layer(axum_middleware::from_fn(edge_gate));

        let mut router = Router::new()
            .merge(api_routes)
            .merge(page_routes)
            .route("/health", get(health::get_health))
            .route_layer(axum_middleware::from_fn(track_metrics))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id(request.headers()),
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

        // Outermost, so 404s, timeouts and body-limit rejections carry them too.
        for (name, value) in security_headers() {
            router = router.layer(SetResponseHeaderLayer::overriding(name, value));
        }

        router
    }

    /// The fully layered router, for serving or for in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn rate_limiter(&self) -> Arc<RateLimiter> {
        self.limiter.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires, then stop the sweeper.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            environment = ?self.config.environment,
            "HTTP server starting"
        );

        let sweeper = self.limiter.spawn_sweeper(
            Duration::from_secs(self.config.rate_limit.sweep_interval_secs),
            shutdown.resubscribe(),
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        if let Err(e) = sweeper.await {
            tracing::error!(error = %e, "Rate-limit sweeper ended abnormally");
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Count and time every matched request by its route template.
async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    let response = next.run(request).await;
    metrics::record_request(&route, response.status().as_u16(), start);
    response
}
