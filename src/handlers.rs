use crate::city::{CITY_CATALOG, suggest_cities};
use crate::errors::{AppError, DomainError};
use crate::hourly::{HOURLY_SAMPLES, hourly_bars};
use crate::modal::Dismiss;
use crate::models::{
    CitySearchRequest, CitySelectRequest, DetailQuery, DetailResponse, ForecastResponse,
    HourlyResponse, KeyRequest, PreviewRequest, RegionsResponse, SelectDayRequest,
    SuggestQuery, SuggestResponse, TimeResponse,
};
use crate::settings::{FileSettingsStore, WeatherSettings};
use crate::state::{AppState, Dashboard};
use crate::ui::{Region, render_index, render_regions};
use crate::weekly_view::full_detail;
use axum::{
    Json,
    extract::{Query, State},
    response::Html,
};
use std::time::Duration;
use tracing::debug;

/// How soon the page should ask again while a recommendation is loading
const AI_POLL: Duration = Duration::from_millis(250);

const SETTINGS: [Region; 2] = [Region::SettingsModal, Region::Notifications];
const AI: [Region; 2] = [Region::AiModal, Region::Notifications];
const MODALS: [Region; 4] = [
    Region::CityModal,
    Region::SettingsModal,
    Region::AiModal,
    Region::Notifications,
];

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let dashboard = state.dashboard.lock().await;
    Html(render_index(&dashboard, &state.clock.now()))
}

pub async fn get_time(State(state): State<AppState>) -> Json<TimeResponse> {
    Json(TimeResponse {
        time: state.clock.now(),
    })
}

pub async fn get_hourly() -> Json<HourlyResponse> {
    Json(HourlyResponse {
        bars: hourly_bars(&HOURLY_SAMPLES),
    })
}

pub async fn get_forecast(State(state): State<AppState>) -> Json<ForecastResponse> {
    let dashboard = state.dashboard.lock().await;
    let forecast = dashboard.forecast.lock();
    Json(ForecastResponse {
        selected: forecast.selected_index(),
        days: forecast.days().to_vec(),
    })
}

pub async fn select_day(
    State(state): State<AppState>,
    Json(payload): Json<SelectDayRequest>,
) -> Result<Json<RegionsResponse>, AppError> {
    let dashboard = state.dashboard.lock().await;
    dashboard.forecast.lock().select_day(payload.index)?;
    Ok(Json(respond(&state, &dashboard, &Region::WEEKLY)))
}

pub async fn reload_forecast(State(state): State<AppState>) -> Json<RegionsResponse> {
    let dashboard = state.dashboard.lock().await;
    dashboard.forecast.lock().load();
    Json(respond(&state, &dashboard, &Region::WEEKLY))
}

pub async fn forecast_detail(
    State(state): State<AppState>,
    Query(query): Query<DetailQuery>,
) -> Result<Json<DetailResponse>, AppError> {
    let dashboard = state.dashboard.lock().await;
    let forecast = dashboard.forecast.lock();
    let day = match query.index {
        None => forecast.selected_day(),
        Some(index) => forecast.days().get(index),
    };
    let day = day.ok_or_else(|| DomainError::DayOutOfRange {
        index: query.index.unwrap_or(forecast.selected_index()),
        max: forecast.days().len().saturating_sub(1),
    })?;
    Ok(Json(DetailResponse {
        text: full_detail(day),
    }))
}

pub async fn city_open(State(state): State<AppState>) -> Json<RegionsResponse> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.city.open();
    Json(respond(&state, &dashboard, &[Region::CityModal]))
}

pub async fn city_close(
    State(state): State<AppState>,
    Json(dismiss): Json<Dismiss>,
) -> Json<RegionsResponse> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.city.dismiss(dismiss);
    Json(respond(&state, &dashboard, &[Region::CityModal]))
}

pub async fn city_search(
    State(state): State<AppState>,
    Json(payload): Json<CitySearchRequest>,
) -> Json<RegionsResponse> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.city.search(&payload.query);
    Json(respond(&state, &dashboard, &[Region::SearchResults]))
}

pub async fn city_select(
    State(state): State<AppState>,
    Json(payload): Json<CitySelectRequest>,
) -> Result<Json<RegionsResponse>, AppError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("city name must not be empty"));
    }

    let mut dashboard = state.dashboard.lock().await;
    dashboard.city.select_city(name);
    Ok(Json(respond(
        &state,
        &dashboard,
        &[
            Region::Header,
            Region::CityModal,
            Region::DayStrip,
            Region::TemperatureChart,
            Region::DayDetails,
        ],
    )))
}

pub async fn city_suggestions(Query(query): Query<SuggestQuery>) -> Json<SuggestResponse> {
    let suggestions = suggest_cities(&CITY_CATALOG, &query.q)
        .into_iter()
        .map(str::to_owned)
        .collect();
    Json(SuggestResponse { suggestions })
}

pub async fn get_settings(State(state): State<AppState>) -> Json<WeatherSettings> {
    let dashboard = state.dashboard.lock().await;
    Json(*dashboard.settings.form())
}

pub async fn save_settings(
    State(state): State<AppState>,
    Json(settings): Json<WeatherSettings>,
) -> Result<Json<RegionsResponse>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.settings.save(settings).await?;
    Ok(Json(respond(&state, &dashboard, &SETTINGS)))
}

pub async fn settings_open(State(state): State<AppState>) -> Json<RegionsResponse> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.settings.open().await;
    Json(respond(&state, &dashboard, &SETTINGS))
}

pub async fn settings_close(
    State(state): State<AppState>,
    Json(dismiss): Json<Dismiss>,
) -> Json<RegionsResponse> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.settings.dismiss(dismiss);
    Json(respond(&state, &dashboard, &SETTINGS))
}

pub async fn settings_preview(
    State(state): State<AppState>,
    Json(payload): Json<PreviewRequest>,
) -> Json<RegionsResponse> {
    let mut dashboard = state.dashboard.lock().await;
    debug!(theme = ?payload.theme, "Previewing theme");
    dashboard.settings.preview_theme(payload.theme);
    Json(respond(&state, &dashboard, &SETTINGS))
}

pub async fn settings_reset(State(state): State<AppState>) -> Json<RegionsResponse> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.settings.request_reset();
    Json(respond(&state, &dashboard, &SETTINGS))
}

pub async fn settings_reset_confirm(
    State(state): State<AppState>,
) -> Result<Json<RegionsResponse>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.settings.confirm_reset().await?;
    Ok(Json(respond(&state, &dashboard, &SETTINGS)))
}

pub async fn settings_reset_cancel(State(state): State<AppState>) -> Json<RegionsResponse> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.settings.cancel_reset();
    Json(respond(&state, &dashboard, &SETTINGS))
}

pub async fn get_ai(State(state): State<AppState>) -> Json<RegionsResponse> {
    let dashboard = state.dashboard.lock().await;
    Json(respond(&state, &dashboard, &AI))
}

pub async fn ai_open(State(state): State<AppState>) -> Json<RegionsResponse> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.ai.open();
    Json(respond(&state, &dashboard, &AI))
}

pub async fn ai_close(
    State(state): State<AppState>,
    Json(dismiss): Json<Dismiss>,
) -> Json<RegionsResponse> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.ai.dismiss(dismiss);
    Json(respond(&state, &dashboard, &AI))
}

pub async fn ai_share(State(state): State<AppState>) -> Json<RegionsResponse> {
    let dashboard = state.dashboard.lock().await;
    let share_text = dashboard.ai.share();
    let mut response = respond(&state, &dashboard, &AI);
    response.share_text = share_text;
    Json(response)
}

pub async fn key_press(
    State(state): State<AppState>,
    Json(payload): Json<KeyRequest>,
) -> Result<Json<RegionsResponse>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.handle_key(&payload.key, payload.settings).await?;
    Ok(Json(respond(&state, &dashboard, &MODALS)))
}

pub async fn get_notifications(State(state): State<AppState>) -> Json<RegionsResponse> {
    let dashboard = state.dashboard.lock().await;
    Json(respond(&state, &dashboard, &[Region::Notifications]))
}

fn respond(
    state: &AppState,
    dashboard: &Dashboard<FileSettingsStore>,
    regions: &[Region],
) -> RegionsResponse {
    let poll = dashboard.ai.modal().is_open() && dashboard.ai.is_loading();
    RegionsResponse {
        regions: render_regions(dashboard, &state.clock.now(), regions),
        scroll_locked: dashboard.scroll_locked(),
        theme: dashboard.settings.theme(),
        poll_after_ms: poll.then(|| AI_POLL.as_millis() as u64),
        share_text: None,
    }
}
