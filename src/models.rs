use crate::forecast::DayForecast;
use crate::hourly::HourlyBar;
use crate::modal::KeyPress;
use crate::settings::{Theme, WeatherSettings};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub struct SelectDayRequest {
    pub index: usize,
}

/// Day to describe; the selected day when omitted
#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    pub index: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct CitySearchRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct CitySelectRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub theme: Theme,
}

/// A keystroke from the page. `settings` carries the settings form's current
/// contents so Ctrl/Cmd+S can save what the user sees.
#[derive(Debug, Deserialize)]
pub struct KeyRequest {
    #[serde(flatten)]
    pub key: KeyPress,
    #[serde(default)]
    pub settings: Option<WeatherSettings>,
}

#[derive(Debug, Serialize)]
pub struct TimeResponse {
    pub time: String,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub selected: usize,
    pub days: Vec<DayForecast>,
}

#[derive(Debug, Serialize)]
pub struct HourlyResponse {
    pub bars: Vec<HourlyBar>,
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<String>,
}

/// Rerendered page regions keyed by element id. The page swaps each one in
/// place and then applies the remaining page-level state.
#[derive(Debug, Serialize)]
pub struct RegionsResponse {
    pub regions: BTreeMap<&'static str, String>,
    pub scroll_locked: bool,
    pub theme: Theme,
    /// Ask the page to fetch `/api/ai` again after this many milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_after_ms: Option<u64>,
    /// Text for the page to copy to the clipboard
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_text: Option<String>,
}
