use crate::{
    ai::AiModal,
    city::CityModal,
    clock::Clock,
    config::Config,
    current::CurrentWeather,
    errors::StorageError,
    forecast::{ForecastDataSource, MockForecastSource, SharedForecast, WeeklyForecast},
    modal::{Dismiss, KeyPress},
    notify::Notifications,
    settings::{FileSettingsStore, SettingsModal, SettingsStore, WeatherSettings},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Every component on the page. Components reach each other only through the
/// handles wired up in [Dashboard::new].
pub struct Dashboard<S> {
    pub forecast: SharedForecast,
    pub current: Arc<CurrentWeather>,
    pub city: CityModal,
    pub settings: SettingsModal<S>,
    pub ai: AiModal,
    pub notifications: Notifications,
}

impl<S: SettingsStore> Dashboard<S> {
    /// Needs a tokio runtime
    pub async fn new(city: &str, source: impl ForecastDataSource + 'static, store: S) -> Self {
        let notifications = Notifications::new();
        let forecast = SharedForecast::new(WeeklyForecast::new(source));
        let current = Arc::new(CurrentWeather::new(city));
        let city_modal = CityModal::new(city)
            .with_weather_display(current.clone())
            .with_forecast(Arc::new(forecast.clone()));
        let settings = SettingsModal::new(store, notifications.clone()).await;
        let ai = AiModal::new(current.clone(), notifications.clone());

        Self {
            forecast,
            current,
            city: city_modal,
            settings,
            ai,
            notifications,
        }
    }

    /// Page scrolling is blocked while any dialog is up
    pub fn scroll_locked(&self) -> bool {
        self.city.modal().is_open()
            || self.settings.modal().is_open()
            || self.ai.modal().is_open()
    }

    /// Escape dismisses every open dialog. Ctrl/Cmd+S saves the settings
    /// form, if the settings dialog is open.
    pub async fn handle_key(
        &mut self,
        key: &KeyPress,
        form: Option<WeatherSettings>,
    ) -> Result<(), StorageError> {
        if key.is_escape() {
            self.city.dismiss(Dismiss::Escape);
            self.settings.dismiss(Dismiss::Escape);
            self.ai.dismiss(Dismiss::Escape);
        } else if key.is_save_shortcut() && self.settings.modal().is_open() {
            let form = form.unwrap_or(*self.settings.form());
            debug!("Saving settings from keyboard shortcut");
            self.settings.save(form).await?;
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Mutex<Dashboard<FileSettingsStore>>>,
    pub clock: Arc<Clock>,
}

impl AppState {
    /// Needs a tokio runtime
    pub async fn new(config: &Config) -> Self {
        let store = FileSettingsStore::new(&config.settings_path);
        let dashboard = Dashboard::new(&config.city, MockForecastSource, store).await;
        Self {
            dashboard: Arc::new(Mutex::new(dashboard)),
            clock: Arc::new(Clock::start()),
        }
    }
}
