//! Today's hourly temperature bars. Rendered once per page load from a fixed
//! set of samples.

use crate::{
    chart::{Scale, css_percent},
    view::Element,
};
use serde::Serialize;

/// Bars start at this height so the coldest sample is still visible
const BAR_BASE: f64 = 30.0;
const BAR_SPAN: f64 = 60.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HourlySample {
    pub time: &'static str,
    pub temp: i32,
    pub icon: &'static str,
}

pub const HOURLY_SAMPLES: [HourlySample; 8] = [
    HourlySample { time: "00:00", temp: 15, icon: "🌙" },
    HourlySample { time: "03:00", temp: 14, icon: "🌙" },
    HourlySample { time: "06:00", temp: 15, icon: "⛅" },
    HourlySample { time: "09:00", temp: 17, icon: "☀️" },
    HourlySample { time: "12:00", temp: 20, icon: "☀️" },
    HourlySample { time: "15:00", temp: 22, icon: "☀️" },
    HourlySample { time: "18:00", temp: 19, icon: "🌤️" },
    HourlySample { time: "21:00", temp: 17, icon: "🌙" },
];

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HourlyBar {
    #[serde(flatten)]
    pub sample: HourlySample,
    /// Percentage of the chart height
    pub height: f64,
}

pub fn hourly_bars(samples: &[HourlySample]) -> Vec<HourlyBar> {
    let Some(scale) = Scale::covering(samples.iter().map(|s| f64::from(s.temp))) else {
        return Vec::new();
    };
    samples
        .iter()
        .map(|&sample| HourlyBar {
            sample,
            height: scale.percent(f64::from(sample.temp), BAR_BASE, BAR_SPAN),
        })
        .collect()
}

pub fn render_hourly_chart(samples: &[HourlySample]) -> Element {
    Element::new("div")
        .id("hourlyChart")
        .class("hourly-chart")
        .children(hourly_bars(samples).into_iter().map(|bar| {
            Element::new("div")
                .class("chart-hour")
                .child(
                    Element::new("div")
                        .class("chart-temp")
                        .text(format!("{}°", bar.sample.temp)),
                )
                .child(
                    Element::new("div")
                        .class("chart-bar")
                        .attr("style", format!("height: {}", css_percent(bar.height))),
                )
                .child(Element::new("div").class("chart-time").text(bar.sample.time))
                .child(Element::new("div").class("chart-icon").text(bar.sample.icon))
        }))
}
