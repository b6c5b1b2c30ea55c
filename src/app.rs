use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/time", get(handlers::get_time))
        .route("/api/hourly", get(handlers::get_hourly))
        .route("/api/forecast", get(handlers::get_forecast))
        .route("/api/forecast/select", post(handlers::select_day))
        .route("/api/forecast/reload", post(handlers::reload_forecast))
        .route("/api/forecast/detail", get(handlers::forecast_detail))
        .route("/api/city/open", post(handlers::city_open))
        .route("/api/city/close", post(handlers::city_close))
        .route("/api/city/search", post(handlers::city_search))
        .route("/api/city/select", post(handlers::city_select))
        .route("/api/cities", get(handlers::city_suggestions))
        .route(
            "/api/settings",
            get(handlers::get_settings).put(handlers::save_settings),
        )
        .route("/api/settings/open", post(handlers::settings_open))
        .route("/api/settings/close", post(handlers::settings_close))
        .route("/api/settings/preview", post(handlers::settings_preview))
        .route("/api/settings/reset", post(handlers::settings_reset))
        .route(
            "/api/settings/reset/confirm",
            post(handlers::settings_reset_confirm),
        )
        .route(
            "/api/settings/reset/cancel",
            post(handlers::settings_reset_cancel),
        )
        .route("/api/ai", get(handlers::get_ai))
        .route("/api/ai/open", post(handlers::ai_open))
        .route("/api/ai/close", post(handlers::ai_close))
        .route("/api/ai/share", post(handlers::ai_share))
        .route("/api/keys", post(handlers::key_press))
        .route("/api/notifications", get(handlers::get_notifications))
        .with_state(state)
}
