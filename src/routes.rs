use crate::{
    api::{attendance, employee, health},
    auth::{handlers, middleware::admin_key_middleware},
    config::Config,
    error::{AppError, json_error_handler, not_found, path_error_handler, query_error_handler},
};
use actix_governor::{
    Governor, GovernorConfigBuilder, KeyExtractor, PeerIpKeyExtractor, SimpleKeyExtractionError,
    governor::{
        NotUntil,
        clock::{Clock, DefaultClock, QuantaInstant},
        middleware::NoOpMiddleware,
    },
};
use actix_web::{
    HttpResponse, HttpResponseBuilder, dev::ServiceRequest, middleware::from_fn, web,
};
use serde_json::json;
use std::{net::IpAddr, sync::Arc};
use tracing::warn;

/// Peer-IP limiter key whose 429 carries the usual error envelope.
#[derive(Clone)]
pub struct PeerIpLimit;

impl KeyExtractor for PeerIpLimit {
    type Key = IpAddr;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        PeerIpKeyExtractor.extract(req)
    }

    fn exceed_rate_limit_response(
        &self,
        negative: &NotUntil<QuantaInstant>,
        mut response: HttpResponseBuilder,
    ) -> HttpResponse {
        let retry_after_secs = negative
            .wait_time_from(DefaultClock::default().now())
            .as_secs();
        warn!(retry_after_secs, "Rate limit exceeded");

        // Builder already holds the 429 status and `x-ratelimit-after`.
        let err = AppError::too_many_requests("Too many requests")
            .with_details(json!({ "retry_after_secs": retry_after_secs }));
        response.json(err.public_body())
    }
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpLimit, NoOpMiddleware> {
        let burst = requests_per_min.max(1);
        let per_ms = 60_000 / burst as u64;
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms.max(1))
            .burst_size(burst)
            .key_extractor(PeerIpLimit)
            .finish()
            .expect("period and burst size are non-zero");
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Extraction failures share the error envelope
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler));

    // Public routes
    cfg.service(health::health).service(
        web::scope(&format!("{}/auth", config.api_prefix)).service(
            web::resource("/enter")
                .wrap(login_limiter)
                .route(web::post().to(handlers::enter)),
        ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(admin_key_middleware)) // superadmin key
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{employee_id}
                    .service(
                        web::resource("/{employee_id}")
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(
                        web::resource("").route(web::post().to(attendance::mark_attendance)),
                    )
                    // /attendance/{employee_id}?date=&month=
                    .service(
                        web::resource("/{employee_id}")
                            .route(web::get().to(attendance::get_attendance)),
                    ),
            ),
    );

    cfg.default_service(web::route().to(not_found));
}

// REQUEST
//  └─ X-Superadmin-Key: <SUPERADMIN_KEY>
//       ├─ missing / wrong  → 401
//       └─ unset on server  → 500
