//! User settings: the persisted record, where it lives, and the modal that
//! edits it.

use crate::{
    errors::StorageError,
    modal::{Dismiss, Modal, modal_shell},
    notify::Notifications,
    view::Element,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{
    future::Future,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};
use tokio::fs;
use tracing::{error, info};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Day,
    Night,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TempUnit {
    #[default]
    Celsius,
    Fahrenheit,
    Kelvin,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindUnit {
    #[default]
    Mps,
    Kmh,
    Mph,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PressureUnit {
    #[default]
    Hpa,
    Mmhg,
    Inhg,
}

/// CSS custom properties for a theme
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub bg: &'static str,
    pub block: &'static str,
    pub text: &'static str,
}

impl Theme {
    pub fn palette(self) -> Palette {
        match self {
            Theme::Day => Palette {
                bg: "#3c9dd0",
                block: "#006aa3",
                text: "#d2e9ff",
            },
            Theme::Night => Palette {
                bg: "#0a1a2d",
                block: "#1a3a5f",
                text: "#cce0ff",
            },
        }
    }

    pub fn body_class(self) -> &'static str {
        match self {
            Theme::Day => "day-theme",
            Theme::Night => "night-theme",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSettings {
    pub theme: Theme,
    pub temp_unit: TempUnit,
    pub wind_unit: WindUnit,
    pub pressure_unit: PressureUnit,
    pub auto_update: bool,
    pub notifications: bool,
    pub geolocation: bool,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Day,
            temp_unit: TempUnit::Celsius,
            wind_unit: WindUnit::Mps,
            pressure_unit: PressureUnit::Hpa,
            auto_update: true,
            notifications: false,
            geolocation: false,
        }
    }
}

/// Home for the single persisted settings record. Writes and clears are
/// wholesale.
pub trait SettingsStore: Send + Sync {
    /// `None` when nothing has been saved yet
    fn load(&self) -> impl Future<Output = Result<Option<WeatherSettings>, StorageError>> + Send;

    fn save(
        &self,
        settings: &WeatherSettings,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    fn clear(&self) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Read settings, falling back to defaults if the record is missing,
/// unreadable or corrupted
pub async fn load_or_default<S: SettingsStore>(store: &S) -> WeatherSettings {
    match store.load().await {
        Ok(settings) => settings.unwrap_or_default(),
        Err(err) => {
            error!("failed to load settings, using defaults: {err}");
            WeatherSettings::default()
        }
    }
}

/// Settings stored as a JSON file
#[derive(Clone, Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    async fn load(&self) -> Result<Option<WeatherSettings>, StorageError> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn save(&self, settings: &WeatherSettings) -> Result<(), StorageError> {
        let payload = serde_json::to_vec_pretty(settings)?;
        fs::write(&self.path, payload).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path).await {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

/// In-memory store holding the raw serialized record, for tests and
/// throwaway sessions
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    raw: Mutex<Option<String>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an arbitrary (possibly broken) record
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl SettingsStore for MemorySettingsStore {
    async fn load(&self) -> Result<Option<WeatherSettings>, StorageError> {
        match self.raw() {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, settings: &WeatherSettings) -> Result<(), StorageError> {
        let raw = serde_json::to_string(settings)?;
        *self.raw.lock().unwrap_or_else(PoisonError::into_inner) = Some(raw);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        *self.raw.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// The settings dialog. `form` mirrors what the dialog's inputs show; the
/// applied theme can run ahead of the saved one while previewing.
pub struct SettingsModal<S> {
    modal: Modal,
    store: S,
    form: WeatherSettings,
    theme: Theme,
    reset_pending: bool,
    notifications: Notifications,
}

impl<S: SettingsStore> SettingsModal<S> {
    /// Load whatever is persisted and apply its theme
    pub async fn new(store: S, notifications: Notifications) -> Self {
        let form = load_or_default(&store).await;
        Self {
            modal: Modal::new("settings"),
            store,
            theme: form.theme,
            form,
            reset_pending: false,
            notifications,
        }
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn form(&self) -> &WeatherSettings {
        &self.form
    }

    /// Theme currently applied to the page
    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn reset_pending(&self) -> bool {
        self.reset_pending
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Open with the latest persisted settings in the form
    pub async fn open(&mut self) {
        self.modal.open();
        self.form = load_or_default(&self.store).await;
        self.theme = self.form.theme;
    }

    pub fn close(&mut self) {
        self.modal.close();
        self.reset_pending = false;
    }

    pub fn dismiss(&mut self, dismiss: Dismiss) -> bool {
        let close = self.modal.should_dismiss(dismiss);
        if close {
            self.close();
        }
        close
    }

    /// Apply a theme without saving it
    pub fn preview_theme(&mut self, theme: Theme) {
        self.form.theme = theme;
        self.theme = theme;
    }

    /// Persist the whole record, apply it and close
    pub async fn save(&mut self, settings: WeatherSettings) -> Result<(), StorageError> {
        self.store.save(&settings).await?;
        info!(?settings, "Saved settings");
        self.form = settings;
        self.theme = settings.theme;
        self.notifications.show("Settings saved!");
        self.close();
        Ok(())
    }

    /// Ask for confirmation before wiping settings
    pub fn request_reset(&mut self) {
        if self.modal.is_open() {
            self.reset_pending = true;
        }
    }

    pub fn cancel_reset(&mut self) {
        self.reset_pending = false;
    }

    /// Erase the persisted record and go back to defaults. The modal stays
    /// open.
    pub async fn confirm_reset(&mut self) -> Result<(), StorageError> {
        if !self.reset_pending {
            return Ok(());
        }
        self.store.clear().await?;
        info!("Reset settings to defaults");
        self.form = WeatherSettings::default();
        self.theme = self.form.theme;
        self.reset_pending = false;
        self.notifications.show("Settings reset!");
        Ok(())
    }
}

fn select(id: &str, current: &str, options: &[(&str, &str)]) -> Element {
    Element::new("select")
        .id(id)
        .attr("name", id)
        .children(options.iter().map(|&(value, label)| {
            let option = Element::new("option").attr("value", value).text(label);
            if value == current {
                option.attr("selected", "selected")
            } else {
                option
            }
        }))
}

fn checkbox(id: &str, label: &str, checked: bool) -> Element {
    let input = Element::new("input")
        .id(id)
        .attr("name", id)
        .attr("type", "checkbox");
    let input = if checked {
        input.attr("checked", "checked")
    } else {
        input
    };
    Element::new("label").class("toggle").child(input).text(label)
}

/// Serialized name of a unit enum, as used by the form controls
fn wire_name<T: Serialize>(value: T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(name)) => name,
        _ => String::new(),
    }
}

pub fn render_settings_modal<S>(settings: &SettingsModal<S>) -> Element {
    let form = settings.form;
    let themes = Element::new("div").class("theme-options").children(
        [(Theme::Day, "Day"), (Theme::Night, "Night")].map(|(theme, label)| {
            let value = wire_name(theme);
            let radio = Element::new("input")
                .id(&format!("theme-{value}"))
                .attr("type", "radio")
                .attr("name", "theme")
                .attr("value", value.as_str())
                .attr("data-preview", "/api/settings/preview");
            let radio = if theme == form.theme {
                radio.attr("checked", "checked")
            } else {
                radio
            };
            Element::new("label").child(radio).text(label)
        }),
    );

    let units = Element::new("div")
        .class("unit-options")
        .child(select(
            "tempUnit",
            &wire_name(form.temp_unit),
            &[("celsius", "°C"), ("fahrenheit", "°F"), ("kelvin", "K")],
        ))
        .child(select(
            "windUnit",
            &wire_name(form.wind_unit),
            &[("mps", "m/s"), ("kmh", "km/h"), ("mph", "mph")],
        ))
        .child(select(
            "pressureUnit",
            &wire_name(form.pressure_unit),
            &[("hpa", "hPa"), ("mmhg", "mmHg"), ("inhg", "inHg")],
        ));

    let toggles = Element::new("div")
        .class("toggles")
        .child(checkbox("autoUpdate", "Auto update", form.auto_update))
        .child(checkbox("notifications", "Notifications", form.notifications))
        .child(checkbox("geolocation", "Use my location", form.geolocation));

    let confirm = Element::new("div")
        .id("resetConfirm")
        .class("reset-confirm")
        .class_if(settings.reset_pending, "show")
        .child(Element::new("p").text("Reset all settings to defaults?"))
        .child(
            Element::new("button")
                .id("confirmReset")
                .attr("type", "button")
                .attr("data-post", "/api/settings/reset/confirm")
                .text("Reset"),
        )
        .child(
            Element::new("button")
                .id("cancelReset")
                .attr("type", "button")
                .attr("data-post", "/api/settings/reset/cancel")
                .text("Cancel"),
        );

    let actions = Element::new("div")
        .class("settings-actions")
        .child(
            Element::new("button")
                .id("saveSettings")
                .attr("type", "button")
                .attr("data-save", "/api/settings")
                .text("Save"),
        )
        .child(
            Element::new("button")
                .id("resetSettings")
                .attr("type", "button")
                .attr("data-post", "/api/settings/reset")
                .attr("data-body", json!({}).to_string())
                .text("Reset"),
        );

    modal_shell("settingsModal", "settings", settings.modal.is_open(), "Settings")
        .child(
            Element::new("form")
                .id("settingsForm")
                .child(themes)
                .child(units)
                .child(toggles),
        )
        .child(actions)
        .child(confirm)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn night() -> WeatherSettings {
        WeatherSettings {
            theme: Theme::Night,
            temp_unit: TempUnit::Fahrenheit,
            wind_unit: WindUnit::Mph,
            pressure_unit: PressureUnit::Mmhg,
            auto_update: false,
            notifications: true,
            geolocation: true,
        }
    }

    #[test]
    fn serializes_with_wire_names() {
        let json = serde_json::to_value(night()).unwrap();
        assert_eq!(
            json,
            json!({
                "theme": "night",
                "tempUnit": "fahrenheit",
                "windUnit": "mph",
                "pressureUnit": "mmhg",
                "autoUpdate": false,
                "notifications": true,
                "geolocation": true,
            })
        );
    }

    #[tokio::test]
    async fn corrupted_record_falls_back_to_defaults() {
        let store = MemorySettingsStore::with_raw("{not json");
        assert!(matches!(store.load().await, Err(StorageError::Format(_))));
        assert_eq!(load_or_default(&store).await, WeatherSettings::default());
    }

    #[tokio::test]
    async fn save_then_reopen_shows_saved_values() {
        let mut modal = SettingsModal::new(MemorySettingsStore::new(), Notifications::new()).await;
        assert_eq!(*modal.form(), WeatherSettings::default());

        modal.open().await;
        modal.save(night()).await.unwrap();
        assert!(!modal.modal().is_open());
        assert_eq!(modal.theme(), Theme::Night);

        modal.open().await;
        assert_eq!(*modal.form(), night());

        // A fresh modal over the same record sees the same thing
        let raw = modal.store().raw().unwrap();
        let fresh = SettingsModal::new(MemorySettingsStore::with_raw(raw), Notifications::new()).await;
        assert_eq!(*fresh.form(), night());
        assert_eq!(fresh.theme(), Theme::Night);
    }

    #[tokio::test]
    async fn reset_needs_confirmation() {
        let notifications = Notifications::new();
        let store = MemorySettingsStore::new();
        store.save(&night()).await.unwrap();
        let mut modal = SettingsModal::new(store, notifications.clone()).await;

        modal.open().await;
        modal.confirm_reset().await.unwrap();
        assert_eq!(*modal.form(), night(), "confirm without request is ignored");

        modal.request_reset();
        assert!(modal.reset_pending());
        modal.cancel_reset();
        assert!(!modal.reset_pending());
        assert!(modal.store().raw().is_some());

        modal.request_reset();
        modal.confirm_reset().await.unwrap();
        assert!(!modal.reset_pending());
        assert!(modal.modal().is_open());
        assert_eq!(*modal.form(), WeatherSettings::default());
        assert_eq!(modal.theme(), Theme::Day);
        assert!(modal.store().raw().is_none());
        assert_eq!(notifications.banners()[0].message, "Settings reset!");
    }

    #[tokio::test]
    async fn closing_drops_pending_reset() {
        let mut modal = SettingsModal::new(MemorySettingsStore::new(), Notifications::new()).await;
        modal.open().await;
        modal.request_reset();
        assert!(modal.dismiss(Dismiss::Escape));
        assert!(!modal.reset_pending());
    }

    #[tokio::test]
    async fn preview_is_not_persisted() {
        let mut modal = SettingsModal::new(MemorySettingsStore::new(), Notifications::new()).await;
        modal.open().await;
        modal.preview_theme(Theme::Night);
        assert_eq!(modal.theme(), Theme::Night);
        assert!(modal.store().raw().is_none());

        modal.close();
        modal.open().await;
        assert_eq!(modal.theme(), Theme::Day);
    }

    #[tokio::test]
    async fn file_store_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "weather_settings_{}_{}.json",
            std::process::id(),
            line!()
        ));
        let store = FileSettingsStore::new(&path);
        assert_eq!(store.load().await.unwrap(), None);

        store.save(&night()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(night()));

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
        // Clearing twice is fine
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn form_reflects_settings() {
        let store = MemorySettingsStore::new();
        store.save(&night()).await.unwrap();
        let mut modal = SettingsModal::new(store, Notifications::new()).await;
        modal.open().await;

        let rendered = render_settings_modal(&modal);
        let html = rendered.to_html();
        assert!(html.contains(r#"id="theme-night" type="radio" name="theme" value="night" data-preview="/api/settings/preview" checked="checked""#));
        assert!(html.contains(r#"<option value="fahrenheit" selected="selected">"#));
        assert!(html.contains(r#"id="geolocation" name="geolocation" type="checkbox" checked="checked""#));
        assert!(rendered.find("reset-confirm").is_some_and(|e| !e.has_class("show")));
    }
}
