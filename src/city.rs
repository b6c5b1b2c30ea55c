//! City selection: quick picks, a templated search, and propagation of the
//! chosen city to the dashboard's collaborators.

use crate::{
    current::WeatherDisplay,
    forecast::SharedForecast,
    modal::{Dismiss, Modal, modal_shell},
    view::Element,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

/// Something that can regenerate its forecast, e.g. after a city change
pub trait ForecastLoader: Send + Sync {
    fn load_weekly_data(&self);
}

impl ForecastLoader for SharedForecast {
    fn load_weekly_data(&self) {
        self.lock().load();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct QuickCity {
    pub name: &'static str,
    pub country: &'static str,
}

pub const QUICK_CITIES: [QuickCity; 8] = [
    QuickCity { name: "Moscow", country: "Russia" },
    QuickCity { name: "Saint Petersburg", country: "Russia" },
    QuickCity { name: "Novosibirsk", country: "Russia" },
    QuickCity { name: "Yekaterinburg", country: "Russia" },
    QuickCity { name: "Kazan", country: "Russia" },
    QuickCity { name: "Nizhny Novgorod", country: "Russia" },
    QuickCity { name: "Krasnoyarsk", country: "Russia" },
    QuickCity { name: "Vladivostok", country: "Russia" },
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CityResult {
    pub name: String,
    pub country: String,
}

/// Stand-in search: four labels built from the query itself
pub fn templated_search(query: &str) -> Vec<CityResult> {
    [
        format!("{query} (central)"),
        format!("{query} (north)"),
        format!("{query} (south)"),
        format!("New {query}"),
    ]
    .into_iter()
    .map(|name| CityResult {
        name,
        country: "Russia".to_owned(),
    })
    .collect()
}

/// Cities known to the suggestion endpoint
pub const CITY_CATALOG: [&str; 6] = [
    "Vladivostok",
    "Saint Petersburg",
    "Moscow",
    "Blagoveshchensk",
    "Khabarovsk",
    "Artyom",
];

const MIN_SUGGEST_LEN: usize = 2;
const MAX_SUGGESTIONS: usize = 10;

/// Rank catalog cities against a partial name. Prefix matches beat substring
/// matches, which beat cities that only share the query's first 3-4 letters.
/// Ties go to the shorter name.
pub fn suggest_cities<'a>(catalog: &[&'a str], query: &str) -> Vec<&'a str> {
    let query = query.trim().to_lowercase();
    let query_len = query.chars().count();
    if query_len < MIN_SUGGEST_LEN {
        return Vec::new();
    }
    let prefix = |n: usize| query.chars().take(n).collect::<String>();
    let short_prefixes = [prefix(3), prefix(4)];

    let mut ranked: Vec<(u8, &str)> = catalog
        .iter()
        .filter_map(|&city| {
            let lower = city.to_lowercase();
            let priority = if lower.starts_with(&query) {
                1
            } else if lower.contains(&query) {
                2
            } else if query_len > 2 && short_prefixes.iter().any(|p| lower.starts_with(p)) {
                3
            } else {
                return None;
            };
            Some((priority, city))
        })
        .collect();
    ranked.sort_by_key(|&(priority, city)| (priority, city.chars().count()));
    ranked
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, city)| city)
        .collect()
}

pub struct CityModal {
    modal: Modal,
    current_city: String,
    query: String,
    /// `None` until a non-blank search runs
    results: Option<Vec<CityResult>>,
    weather_display: Option<Arc<dyn WeatherDisplay>>,
    forecast: Option<Arc<dyn ForecastLoader>>,
}

impl CityModal {
    pub fn new(current_city: impl Into<String>) -> Self {
        Self {
            modal: Modal::new("city"),
            current_city: current_city.into(),
            query: String::new(),
            results: None,
            weather_display: None,
            forecast: None,
        }
    }

    pub fn with_weather_display(mut self, display: Arc<dyn WeatherDisplay>) -> Self {
        self.weather_display = Some(display);
        self
    }

    pub fn with_forecast(mut self, forecast: Arc<dyn ForecastLoader>) -> Self {
        self.forecast = Some(forecast);
        self
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn current_city(&self) -> &str {
        &self.current_city
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> Option<&[CityResult]> {
        self.results.as_deref()
    }

    pub fn open(&mut self) {
        self.modal.open();
        self.query.clear();
        self.results = None;
    }

    pub fn close(&mut self) {
        self.modal.close();
        self.results = None;
    }

    /// Returns whether the modal closed
    pub fn dismiss(&mut self, dismiss: Dismiss) -> bool {
        let close = self.modal.should_dismiss(dismiss);
        if close {
            self.close();
        }
        close
    }

    pub fn search(&mut self, query: &str) {
        self.query = query.to_owned();
        if query.trim().is_empty() {
            self.results = None;
            return;
        }
        let results = templated_search(query);
        debug!(query, count = results.len(), "City search");
        self.results = Some(results);
    }

    /// Switch cities, close the picker and tell every collaborator
    pub fn select_city(&mut self, name: &str) {
        info!(city = name, "City selected");
        self.current_city = name.to_owned();
        self.close();

        if let Some(display) = &self.weather_display {
            display.change_city(name);
        }
        if let Some(forecast) = &self.forecast {
            forecast.load_weekly_data();
        }
    }
}

fn select_city_action(element: Element, name: &str) -> Element {
    element
        .attr("data-city", name)
        .attr("data-post", "/api/city/select")
        .attr("data-body", json!({ "name": name }).to_string())
}

/// Result list under the search box, swapped on its own while the user types
pub fn render_search_results(city: &CityModal) -> Element {
    let mut results = Element::new("div").id("searchResults").class("search-results");
    match city.results() {
        None => {}
        Some([]) => {
            results = results.child(
                Element::new("div")
                    .class("no-results")
                    .child(Element::new("p").text("City not found. Try another search.")),
            );
        }
        Some(found) => {
            results = results.children(found.iter().map(|result| {
                let item = Element::new("div")
                    .class("result-item")
                    .child(
                        Element::new("div")
                            .child(
                                Element::new("div")
                                    .class("city-name-result")
                                    .text(result.name.as_str()),
                            )
                            .child(
                                Element::new("div")
                                    .class("city-country")
                                    .text(result.country.as_str()),
                            ),
                    );
                select_city_action(item, &result.name)
            }));
        }
    }
    results
}

pub fn render_city_modal(city: &CityModal) -> Element {
    let quick = Element::new("div")
        .id("quickCities")
        .class("quick-cities")
        .children(QUICK_CITIES.iter().map(|quick| {
            let button = Element::new("button")
                .class("city-quick-btn")
                .class_if(quick.name == city.current_city(), "current")
                .attr("type", "button")
                .text(quick.name);
            select_city_action(button, quick.name)
        }));

    modal_shell("cityModal", "city", city.modal().is_open(), "Choose a city")
        .child(
            Element::new("input")
                .id("citySearch")
                .class("city-search")
                .attr("type", "search")
                .attr("placeholder", "Search for a city")
                .attr("value", city.query())
                .attr("data-search", "/api/city/search")
                .attr("data-suggest", "/api/cities")
                .attr("list", "citySuggestions"),
        )
        .child(Element::new("datalist").id("citySuggestions"))
        .child(quick)
        .child(render_search_results(city))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        current::CurrentWeather,
        forecast::{MockForecastSource, WeeklyForecast},
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingLoader(AtomicUsize);

    impl ForecastLoader for CountingLoader {
        fn load_weekly_data(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn templated_results_derive_from_query() {
        let names: Vec<_> = templated_search("Omsk").into_iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            ["Omsk (central)", "Omsk (north)", "Omsk (south)", "New Omsk"]
        );
    }

    #[test]
    fn blank_search_clears_results() {
        let mut city = CityModal::new("Moscow");
        city.open();
        city.search("Tver");
        assert_eq!(city.results().map(<[_]>::len), Some(4));
        city.search("   ");
        assert!(city.results().is_none());
    }

    #[test]
    fn open_resets_search_state() {
        let mut city = CityModal::new("Moscow");
        city.open();
        city.search("Tver");
        city.dismiss(Dismiss::Escape);
        assert!(!city.modal().is_open());

        city.open();
        assert_eq!(city.query(), "");
        assert!(city.results().is_none());
    }

    #[test]
    fn selecting_city_notifies_collaborators() {
        let display = Arc::new(CurrentWeather::new("Moscow"));
        let loader = Arc::new(CountingLoader::default());
        let mut city = CityModal::new("Moscow")
            .with_weather_display(display.clone())
            .with_forecast(loader.clone());

        city.open();
        city.select_city("Kazan");

        assert_eq!(city.current_city(), "Kazan");
        assert!(!city.modal().is_open());
        assert_eq!(display.city(), "Kazan");
        assert_eq!(loader.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn selecting_city_without_collaborators_is_fine() {
        let mut city = CityModal::new("Moscow");
        city.select_city("Kazan");
        assert_eq!(city.current_city(), "Kazan");
    }

    #[test]
    fn shared_forecast_reloads_on_city_change() {
        let forecast = SharedForecast::new(WeeklyForecast::new(MockForecastSource));
        forecast.lock().select_day(3).unwrap();
        let mut city = CityModal::new("Moscow").with_forecast(Arc::new(forecast.clone()));

        city.select_city("Kazan");
        let forecast = forecast.lock();
        assert_eq!(forecast.days().len(), 7);
        assert_eq!(forecast.selected_index(), 3);
    }

    #[test]
    fn render_marks_current_quick_city() {
        let mut city = CityModal::new("Kazan");
        city.open();
        let rendered = render_city_modal(&city);

        assert!(rendered.has_class("active"));
        let current: Vec<_> = rendered
            .find_all("city-quick-btn")
            .into_iter()
            .filter(|b| b.has_class("current"))
            .map(|b| b.text_content())
            .collect();
        assert_eq!(current, vec!["Kazan"]);
    }

    #[test]
    fn render_lists_search_results() {
        let mut city = CityModal::new("Moscow");
        city.open();
        city.search("Omsk");
        let rendered = render_city_modal(&city);
        assert_eq!(rendered.find_all("result-item").len(), 4);
        assert!(rendered.find("no-results").is_none());
    }

    #[test]
    fn suggestions_rank_prefix_first() {
        assert_eq!(suggest_cities(&CITY_CATALOG, "mo"), vec!["Moscow"]);
        assert_eq!(
            suggest_cities(&CITY_CATALOG, " SAINT "),
            vec!["Saint Petersburg"]
        );
        // Substring match only
        assert_eq!(suggest_cities(&CITY_CATALOG, "vost"), vec!["Vladivostok"]);
    }

    #[test]
    fn suggestions_need_two_characters() {
        assert!(suggest_cities(&CITY_CATALOG, "m").is_empty());
        assert!(suggest_cities(&CITY_CATALOG, "  ").is_empty());
    }

    #[test]
    fn suggestions_fall_back_to_shared_prefix() {
        // "vladimir" shares "vlad" with Vladivostok
        assert_eq!(suggest_cities(&CITY_CATALOG, "vladimir"), vec!["Vladivostok"]);
        // Prefix beats substring, then shorter names first
        assert_eq!(
            suggest_cities(&["Akha", "Khabarovsk", "Kha"], "kha"),
            vec!["Kha", "Khabarovsk", "Akha"]
        );
    }
}
