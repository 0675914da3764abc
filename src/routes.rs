use crate::{
    api::{advance, attendance, dashboard, employee, revenue, statistics},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap()
    }

    let login_limiter = build_limiter(config.rate_login_per_min);
    let register_limiter = build_limiter(config.rate_register_per_min);
    let refresh_limiter = build_limiter(config.rate_refresh_per_min);
    let protected_limiter = build_limiter(config.rate_protected_per_min);

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(Governor::new(&login_limiter))
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(Governor::new(&register_limiter))
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(Governor::new(&refresh_limiter))
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(Governor::new(&login_limiter))
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix).service(
            web::scope("/v1")
                .wrap(from_fn(auth_middleware))
                // authentication
                .wrap(Governor::new(&protected_limiter)) // rate limiting
                .service(
                    web::scope("/employees")
                        // /employees
                        .service(
                            web::resource("")
                                .route(web::post().to(employee::create_employee))
                                .route(web::get().to(employee::list_employees)),
                        )
                        // /employees/{id}
                        .service(
                            web::resource("/{id}")
                                .route(web::get().to(employee::get_employee))
                                .route(web::put().to(employee::update_employee))
                                .route(web::delete().to(employee::delete_employee)),
                        )
                        // /employees/{id}/status
                        .service(
                            web::resource("/{id}/status")
                                .route(web::put().to(employee::change_status)),
                        )
                        // /employees/{id}/history
                        .service(
                            web::resource("/{id}/history")
                                .route(web::get().to(employee::status_history)),
                        )
                        // /employees/{id}/attendance
                        .service(
                            web::resource("/{id}/attendance")
                                .route(web::get().to(employee::employee_attendance)),
                        )
                        // /employees/{id}/current-week
                        .service(
                            web::resource("/{id}/current-week")
                                .route(web::get().to(employee::current_week)),
                        )
                        // /employees/{id}/advances
                        .service(
                            web::resource("/{id}/advances")
                                .route(web::post().to(employee::create_advance))
                                .route(web::get().to(employee::list_advances)),
                        ),
                )
                .service(
                    web::scope("/attendance")
                        .service(
                            web::resource("").route(web::post().to(attendance::save_attendance)),
                        )
                        .service(
                            web::resource("/recent")
                                .route(web::get().to(attendance::recent_attendance)),
                        )
                        .service(
                            web::resource("/weekly")
                                .route(web::get().to(attendance::weekly_attendance)),
                        )
                        .service(
                            web::resource("/mark-paid")
                                .route(web::post().to(attendance::mark_paid)),
                        ),
                )
                .service(
                    web::scope("/advances")
                        .service(
                            web::resource("/{id}/approve")
                                .route(web::put().to(advance::approve_advance)),
                        )
                        .service(
                            web::resource("/{id}/reject")
                                .route(web::put().to(advance::reject_advance)),
                        )
                        .service(
                            web::resource("/{id}/pay").route(web::put().to(advance::pay_advance)),
                        ),
                )
                .service(
                    web::scope("/revenues")
                        .service(web::resource("").route(web::post().to(revenue::create_revenue)))
                        .service(
                            web::resource("/recent")
                                .route(web::get().to(revenue::recent_revenues)),
                        )
                        .service(
                            web::resource("/{id}")
                                .route(web::put().to(revenue::update_revenue))
                                .route(web::delete().to(revenue::delete_revenue)),
                        ),
                )
                .service(
                    web::scope("/statistics")
                        .service(
                            web::resource("/employee-of-week")
                                .route(web::get().to(statistics::employee_of_week)),
                        )
                        .service(
                            web::resource("/employee-of-month")
                                .route(web::get().to(statistics::employee_of_month)),
                        )
                        .service(
                            web::resource("/salary-payments")
                                .route(web::get().to(statistics::salary_payments)),
                        )
                        .service(
                            web::resource("/revenue-analysis")
                                .route(web::get().to(statistics::revenue_analysis)),
                        )
                        .service(
                            web::resource("/employee-payments")
                                .route(web::get().to(statistics::employee_payments)),
                        )
                        .service(
                            web::resource("/employee-payments-table")
                                .route(web::get().to(statistics::employee_payments_table)),
                        ),
                )
                .service(
                    web::scope("/dashboard")
                        .service(web::resource("/stats").route(web::get().to(dashboard::stats)))
                        .service(
                            web::resource("/chart-data")
                                .route(web::get().to(dashboard::chart_data)),
                        ),
                ),
        ),
    );
}

// LOGIN
//  ├─ access_token (15 min)
//  └─ refresh_token (7 days)

// API REQUEST
//  └─ Authorization: Bearer access_token

// ACCESS EXPIRED
//  └─ POST /refresh with refresh_token
//       └─ returns new access_token
