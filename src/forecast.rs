//! The weekly forecast model: seven generated days plus the selected day.

use crate::errors::DomainError;
use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use rand::{Rng, thread_rng};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

pub const DAYS_IN_WEEK: usize = 7;
pub const HOURLY_POINTS: usize = 8;

const SUNRISE: &str = "06:30";
const SUNSET: &str = "20:45";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Clear,
    PartlyCloudy,
    Cloudy,
    Rain,
    Thunderstorm,
    LightRain,
}

impl Condition {
    pub const ALL: [Self; 6] = [
        Self::Clear,
        Self::PartlyCloudy,
        Self::Cloudy,
        Self::Rain,
        Self::Thunderstorm,
        Self::LightRain,
    ];

    pub fn icon(self) -> &'static str {
        match self {
            Self::Clear => "☀️",
            Self::PartlyCloudy => "⛅",
            Self::Cloudy => "☁️",
            Self::Rain => "🌧️",
            Self::Thunderstorm => "⛈️",
            Self::LightRain => "🌦️",
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly cloudy",
            Self::Cloudy => "Cloudy",
            Self::Rain => "Rain",
            Self::Thunderstorm => "Thunderstorm",
            Self::LightRain => "Light rain",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayForecast {
    pub day_abbrev: &'static str,
    pub day_full: &'static str,
    pub date: String,
    pub is_today: bool,
    pub temp_max: i32,
    pub temp_min: i32,
    pub hourly_samples: Vec<f64>,
    pub icon: &'static str,
    pub condition_text: &'static str,
    /// m/s, one decimal
    pub wind: f64,
    /// Percent
    pub humidity: u8,
    /// Chance of precipitation, percent
    pub precipitation: u8,
    /// hPa
    pub pressure: u16,
    pub sunrise: &'static str,
    pub sunset: &'static str,
}

fn weekday_labels(weekday: Weekday) -> (&'static str, &'static str) {
    match weekday {
        Weekday::Mon => ("Mon", "Monday"),
        Weekday::Tue => ("Tue", "Tuesday"),
        Weekday::Wed => ("Wed", "Wednesday"),
        Weekday::Thu => ("Thu", "Thursday"),
        Weekday::Fri => ("Fri", "Friday"),
        Weekday::Sat => ("Sat", "Saturday"),
        Weekday::Sun => ("Sun", "Sunday"),
    }
}

/// Where forecast days come from. The dashboard only ever sees this trait, so
/// a real feed can replace the generator.
pub trait ForecastDataSource: Send + Sync {
    /// Seven days starting at `today`
    fn weekly(&self, today: NaiveDate) -> Vec<DayForecast>;
}

/// Random but well-formed forecast data
#[derive(Clone, Copy, Debug, Default)]
pub struct MockForecastSource;

impl MockForecastSource {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> Vec<DayForecast> {
        (0..DAYS_IN_WEEK)
            .map(|offset| {
                let date = today + Duration::days(offset as i64);
                generate_day(rng, date, offset == 0)
            })
            .collect()
    }
}

impl ForecastDataSource for MockForecastSource {
    fn weekly(&self, today: NaiveDate) -> Vec<DayForecast> {
        Self::generate(&mut thread_rng(), today)
    }
}

fn generate_day<R: Rng + ?Sized>(rng: &mut R, date: NaiveDate, is_today: bool) -> DayForecast {
    let (day_abbrev, day_full) = weekday_labels(date.weekday());

    let temp_max = rng.gen_range(15..25);
    let temp_min = temp_max - 5 - rng.gen_range(0..3);

    // Linear ramp from min to max with up to a degree of noise either way
    let spread = f64::from(temp_max - temp_min);
    let hourly_samples = (0..HOURLY_POINTS)
        .map(|i| {
            let step = i as f64 / (HOURLY_POINTS - 1) as f64;
            f64::from(temp_min) + spread * step + rng.gen_range(-1.0..1.0)
        })
        .collect();

    let condition = Condition::ALL[rng.gen_range(0..Condition::ALL.len())];
    let wind = (rng.gen_range(2.0..7.0_f64) * 10.0).round() / 10.0;

    DayForecast {
        day_abbrev,
        day_full,
        date: date.format("%d.%m").to_string(),
        is_today,
        temp_max,
        temp_min,
        hourly_samples,
        icon: condition.icon(),
        condition_text: condition.text(),
        wind,
        humidity: rng.gen_range(50..90),
        precipitation: rng.gen_range(0..80),
        pressure: rng.gen_range(1000..1030),
        sunrise: SUNRISE,
        sunset: SUNSET,
    }
}

/// Owns the generated week and the selected day index
pub struct WeeklyForecast {
    source: Box<dyn ForecastDataSource>,
    days: Vec<DayForecast>,
    selected: usize,
}

impl WeeklyForecast {
    /// Create the model and run an initial load for today
    pub fn new(source: impl ForecastDataSource + 'static) -> Self {
        let mut forecast = Self {
            source: Box::new(source),
            days: Vec::new(),
            selected: 0,
        };
        forecast.load();
        forecast
    }

    /// Regenerate the whole week from today. The selected index survives.
    pub fn load(&mut self) {
        self.load_from(Local::now().date_naive());
    }

    pub fn load_from(&mut self, today: NaiveDate) {
        self.days = self.source.weekly(today);
        info!(%today, selected = self.selected, "Loaded weekly forecast");
    }

    pub fn select_day(&mut self, index: usize) -> Result<(), DomainError> {
        if index >= self.days.len() {
            return Err(DomainError::DayOutOfRange {
                index,
                max: self.days.len().saturating_sub(1),
            });
        }
        debug!(index, "Selected forecast day");
        self.selected = index;
        Ok(())
    }

    pub fn days(&self) -> &[DayForecast] {
        &self.days
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_day(&self) -> Option<&DayForecast> {
        self.days.get(self.selected)
    }
}

/// Handle to a forecast shared between the dashboard and the city picker
#[derive(Clone)]
pub struct SharedForecast(Arc<Mutex<WeeklyForecast>>);

impl SharedForecast {
    pub fn new(forecast: WeeklyForecast) -> Self {
        Self(Arc::new(Mutex::new(forecast)))
    }

    pub fn lock(&self) -> MutexGuard<'_, WeeklyForecast> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    /// Deterministic source so tests can check exact values
    struct FixedSource(Vec<DayForecast>);

    impl ForecastDataSource for FixedSource {
        fn weekly(&self, _: NaiveDate) -> Vec<DayForecast> {
            self.0.clone()
        }
    }

    fn friday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn generated_week_is_well_formed() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let days = MockForecastSource::generate(&mut rng, friday());

            assert_eq!(days.len(), DAYS_IN_WEEK);
            for day in &days {
                assert!(day.temp_max > day.temp_min, "{day:?}");
                assert!((15..25).contains(&day.temp_max));
                assert!((5..=7).contains(&(day.temp_max - day.temp_min)));
                assert_eq!(day.hourly_samples.len(), HOURLY_POINTS);
                assert!((2.0..=7.0).contains(&day.wind));
                assert!((50..90).contains(&day.humidity));
                assert!(day.precipitation < 80);
                assert!((1000..1030).contains(&day.pressure));
                assert!(Condition::ALL.iter().any(|c| {
                    c.icon() == day.icon && c.text() == day.condition_text
                }));
            }
        }
    }

    #[test]
    fn only_first_day_is_today() {
        let mut rng = StdRng::seed_from_u64(7);
        let days = MockForecastSource::generate(&mut rng, friday());
        let today: Vec<_> = days
            .iter()
            .enumerate()
            .filter(|(_, day)| day.is_today)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(today, vec![0]);
    }

    #[test]
    fn labels_follow_real_weekdays() {
        let mut rng = StdRng::seed_from_u64(1);
        let days = MockForecastSource::generate(&mut rng, friday());
        let abbrevs: Vec<_> = days.iter().map(|day| day.day_abbrev).collect();
        assert_eq!(abbrevs, ["Fri", "Sat", "Sun", "Mon", "Tue", "Wed", "Thu"]);
        assert_eq!(days[0].day_full, "Friday");
        assert_eq!(days[0].date, "16.10");
        assert_eq!(days[6].date, "22.10");
    }

    #[test]
    fn select_day_rejects_out_of_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let days = MockForecastSource::generate(&mut rng, friday());
        let mut forecast = WeeklyForecast::new(FixedSource(days));

        assert_eq!(forecast.selected_index(), 0);
        forecast.select_day(6).unwrap();
        assert_eq!(forecast.selected_index(), 6);
        assert_eq!(
            forecast.select_day(7),
            Err(DomainError::DayOutOfRange { index: 7, max: 6 })
        );
        assert_eq!(forecast.selected_index(), 6);
    }

    #[test]
    fn reload_keeps_selection() {
        let mut forecast = WeeklyForecast::new(MockForecastSource);
        forecast.select_day(4).unwrap();
        forecast.load_from(friday());
        assert_eq!(forecast.selected_index(), 4);
        assert_eq!(forecast.days().len(), DAYS_IN_WEEK);
        assert!(forecast.days()[0].is_today);
    }
}
