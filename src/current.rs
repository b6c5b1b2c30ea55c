//! Current conditions for the selected city, shown in the page header

use crate::{forecast::Condition, view::Element};
use serde::Serialize;
use std::sync::{PoisonError, RwLock};
use tracing::info;

/// Something that shows weather for a named city
pub trait WeatherDisplay: Send + Sync {
    fn change_city(&self, name: &str);
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conditions {
    pub temp: i32,
    pub feels_like: i32,
    /// m/s
    pub wind: f64,
    pub precipitation: u8,
    pub humidity: u8,
    pub uv_index: u8,
    pub condition: Condition,
}

impl Default for Conditions {
    fn default() -> Self {
        Self {
            temp: 18,
            feels_like: 17,
            wind: 3.5,
            precipitation: 10,
            humidity: 65,
            uv_index: 3,
            condition: Condition::Clear,
        }
    }
}

#[derive(Debug)]
pub struct CurrentWeather {
    city: RwLock<String>,
    conditions: Conditions,
}

impl CurrentWeather {
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            city: RwLock::new(city.into()),
            conditions: Conditions::default(),
        }
    }

    pub fn city(&self) -> String {
        self.city
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }
}

impl WeatherDisplay for CurrentWeather {
    fn change_city(&self, name: &str) {
        info!(city = name, "Showing weather for new city");
        *self.city.write().unwrap_or_else(PoisonError::into_inner) = name.to_owned();
    }
}

pub fn render_header(weather: &CurrentWeather, time: &str) -> Element {
    let conditions = weather.conditions();
    Element::new("header")
        .id("header")
        .class("header")
        .child(
            Element::new("button")
                .id("cityName")
                .class("city-name")
                .attr("type", "button")
                .attr("data-post", "/api/city/open")
                .text(weather.city()),
        )
        .child(Element::new("div").id("currentTime").class("current-time").text(time))
        .child(
            Element::new("div")
                .class("current-conditions")
                .child(
                    Element::new("span")
                        .class("current-icon")
                        .text(conditions.condition.icon()),
                )
                .child(
                    Element::new("span")
                        .class("current-temp")
                        .text(format!("{}°", conditions.temp)),
                )
                .child(Element::new("span").class("current-feels").text(format!(
                    "feels like {}°, {}",
                    conditions.feels_like,
                    conditions.condition.text()
                ))),
        )
        .child(
            Element::new("div")
                .class("header-actions")
                .child(
                    Element::new("button")
                        .id("aiRecommendationBtn")
                        .attr("type", "button")
                        .attr("data-post", "/api/ai/open")
                        .text("What to wear?"),
                )
                .child(
                    Element::new("button")
                        .id("settingsBtn")
                        .attr("type", "button")
                        .attr("data-post", "/api/settings/open")
                        .text("Settings"),
                ),
        )
}
