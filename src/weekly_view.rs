//! Views over the weekly forecast: the day strip, the min/max temperature chart,
//! and the detail panel for the selected day. Every renderer rebuilds its
//! whole region.

use crate::{
    chart::{Scale, css_percent},
    forecast::DayForecast,
    view::Element,
};
use serde_json::json;

const BAR_BASE: f64 = 20.0;
const BAR_SPAN: f64 = 60.0;
/// Emphasis applied to the selected chart column
const SELECTED_SCALE: f64 = 1.1;

/// Clicking a cell posts a day selection back to the server
fn select_action(element: Element, index: usize) -> Element {
    element
        .attr("data-index", index.to_string())
        .attr("data-post", "/api/forecast/select")
        .attr("data-body", json!({ "index": index }).to_string())
}

pub fn render_day_strip(days: &[DayForecast], selected: usize) -> Element {
    Element::new("div")
        .id("weeklyDays")
        .class("weekly-days")
        .children(days.iter().enumerate().map(|(index, day)| {
            let cell = Element::new("div")
                .class("weekly-day")
                .class_if(day.is_today, "today")
                .class_if(index == selected, "selected")
                .child(
                    Element::new("div")
                        .class("day-header")
                        .child(Element::new("div").class("day-name").text(day.day_abbrev))
                        .child(Element::new("div").class("day-date").text(day.date.as_str())),
                )
                .child(Element::new("div").class("day-icon").text(day.icon))
                .child(
                    Element::new("div")
                        .class("day-temp-range")
                        .child(
                            Element::new("div")
                                .class("temp-max")
                                .text(format!("{}°", day.temp_max)),
                        )
                        .child(
                            Element::new("div")
                                .class("temp-min")
                                .text(format!("{}°", day.temp_min)),
                        ),
                );
            select_action(cell, index)
        }))
}

/// Bar heights `(max, min)` for each day. The scale spans both the highs and
/// the lows of the whole week.
pub fn chart_heights(days: &[DayForecast]) -> Vec<(f64, f64)> {
    let temps = days
        .iter()
        .flat_map(|day| [day.temp_max, day.temp_min])
        .map(f64::from);
    let Some(scale) = Scale::covering(temps) else {
        return Vec::new();
    };
    days.iter()
        .map(|day| {
            (
                scale.percent(f64::from(day.temp_max), BAR_BASE, BAR_SPAN),
                scale.percent(f64::from(day.temp_min), BAR_BASE, BAR_SPAN),
            )
        })
        .collect()
}

pub fn render_temperature_chart(days: &[DayForecast], selected: usize) -> Element {
    let heights = chart_heights(days);
    Element::new("div")
        .id("temperatureChart")
        .class("temperature-chart")
        .children(days.iter().zip(heights).enumerate().map(
            |(index, (day, (max_height, min_height)))| {
                let mut column = Element::new("div")
                    .class("temp-column")
                    .attr(
                        "title",
                        format!("{}: max {}°, min {}°", day.day_full, day.temp_max, day.temp_min),
                    )
                    .child(
                        Element::new("div")
                            .class("temp-bar")
                            .class("temp-bar-max")
                            .attr("style", format!("height: {}", css_percent(max_height))),
                    )
                    .child(
                        Element::new("div")
                            .class("temp-bar")
                            .class("temp-bar-min")
                            .attr("style", format!("height: {}", css_percent(min_height))),
                    )
                    .child(
                        Element::new("div")
                            .class("temp-value")
                            .text(format!("{}°", day.temp_max)),
                    );
                if index == selected {
                    column = column
                        .class("selected")
                        .attr("style", format!("transform: scale({SELECTED_SCALE})"));
                }
                select_action(column, index)
            },
        ))
}

pub fn render_day_details(days: &[DayForecast], selected: usize) -> Element {
    let root = Element::new("div").id("selectedDayDetails");
    let Some(day) = days.get(selected) else {
        return root;
    };

    let rows = [
        ("💨", "Wind", format!("{} m/s", day.wind)),
        ("💧", "Humidity", format!("{}%", day.humidity)),
        ("🌧️", "Precipitation", format!("{}%", day.precipitation)),
        ("📊", "Pressure", format!("{} hPa", day.pressure)),
        ("🌅", "Sunrise", day.sunrise.to_owned()),
        ("🌇", "Sunset", day.sunset.to_owned()),
    ];
    root.attr("data-index", selected.to_string()).child(
        Element::new("div")
            .class("day-details")
            .children(rows.into_iter().map(|(icon, label, value)| {
                Element::new("div")
                    .class("day-detail")
                    .child(Element::new("div").class("detail-icon").text(icon))
                    .child(Element::new("div").class("detail-label").text(label))
                    .child(Element::new("div").class("detail-value").text(value))
            })),
    )
}

/// Text for the "view full detail" dialog
pub fn full_detail(day: &DayForecast) -> String {
    format!(
        "Detailed forecast for {} ({}):\n\n\
         Weather: {} {}\n\
         Temperature: {}° - {}°\n\
         Wind: {} m/s\n\
         Humidity: {}%\n\
         Chance of precipitation: {}%",
        day.day_full,
        day.date,
        day.condition_text,
        day.icon,
        day.temp_min,
        day.temp_max,
        day.wind,
        day.humidity,
        day.precipitation,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::MockForecastSource;
    use chrono::NaiveDate;
    use rand::{SeedableRng, rngs::StdRng};

    fn week() -> Vec<DayForecast> {
        let mut rng = StdRng::seed_from_u64(42);
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        MockForecastSource::generate(&mut rng, today)
    }

    fn with_temps(mut days: Vec<DayForecast>, temps: &[(i32, i32)]) -> Vec<DayForecast> {
        for (day, &(max, min)) in days.iter_mut().zip(temps) {
            day.temp_max = max;
            day.temp_min = min;
        }
        days
    }

    #[test]
    fn chart_scale_spans_highs_and_lows() {
        let days = with_temps(
            week(),
            &[(20, 10), (22, 15), (18, 12), (21, 14), (19, 13), (24, 17), (23, 16)],
        );
        let heights = chart_heights(&days);

        // Global range is 10..=24
        assert_eq!(heights[0].1, 20.0);
        assert_eq!(heights[5].0, 80.0);
        assert_eq!(heights[0].0, 20.0 + 10.0 / 14.0 * 60.0);
    }

    #[test]
    fn flat_chart_does_not_divide_by_zero() {
        let days = with_temps(week(), &[(15, 15); 7]);
        assert!(chart_heights(&days).iter().all(|&h| h == (20.0, 20.0)));
    }

    #[test]
    fn selection_highlights_strip_and_chart() {
        let days = week();
        for selected in 0..days.len() {
            let strip = render_day_strip(&days, selected);
            let cells = strip.find_all("weekly-day");
            assert_eq!(cells.len(), 7);
            let highlighted: Vec<_> = cells
                .iter()
                .filter(|cell| cell.has_class("selected"))
                .map(|cell| cell.get_attr("data-index"))
                .collect();
            assert_eq!(highlighted, vec![Some(selected.to_string().as_str())]);

            let chart = render_temperature_chart(&days, selected);
            let columns = chart.find_all("temp-column");
            assert_eq!(
                columns[selected].get_attr("style"),
                Some("transform: scale(1.1)")
            );
            assert_eq!(
                columns.iter().filter(|c| c.has_class("selected")).count(),
                1
            );
        }
    }

    #[test]
    fn today_cell_is_marked() {
        let strip = render_day_strip(&week(), 3);
        let cells = strip.find_all("weekly-day");
        assert!(cells[0].has_class("today"));
        assert!(cells[1..].iter().all(|cell| !cell.has_class("today")));
    }

    #[test]
    fn details_show_selected_day_fields() {
        let days = week();
        let details = render_day_details(&days, 2);
        let values: Vec<_> = details
            .find_all("detail-value")
            .iter()
            .map(|e| e.text_content())
            .collect();
        let day = &days[2];
        assert_eq!(
            values,
            vec![
                format!("{} m/s", day.wind),
                format!("{}%", day.humidity),
                format!("{}%", day.precipitation),
                format!("{} hPa", day.pressure),
                "06:30".to_owned(),
                "20:45".to_owned(),
            ]
        );
    }

    #[test]
    fn rerender_with_same_selection_is_identical() {
        let days = week();
        assert_eq!(render_day_strip(&days, 4), render_day_strip(&days, 4));
        assert_eq!(
            render_temperature_chart(&days, 4).to_html(),
            render_temperature_chart(&days, 4).to_html()
        );
    }

    #[test]
    fn full_detail_lists_every_field() {
        let mut day = week().remove(0);
        day.temp_max = 14;
        day.temp_min = -2;
        day.wind = 4.5;
        day.humidity = 71;
        day.precipitation = 30;

        let text = full_detail(&day);
        let weather = format!("Weather: {} {}", day.condition_text, day.icon);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "Detailed forecast for Friday (16.10):",
                "",
                weather.as_str(),
                "Temperature: -2° - 14°",
                "Wind: 4.5 m/s",
                "Humidity: 71%",
                "Chance of precipitation: 30%",
            ]
        );
    }
}
