use std::{env, path::PathBuf};
use tracing::warn;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SETTINGS_PATH: &str = "data/settings.json";
const DEFAULT_CITY: &str = "Moscow";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub settings_path: PathBuf,
    pub city: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            settings_path: PathBuf::from(DEFAULT_SETTINGS_PATH),
            city: DEFAULT_CITY.to_owned(),
        }
    }
}

impl Config {
    /// Read `PORT`, `WEATHER_SETTINGS_PATH` and `WEATHER_CITY`, keeping
    /// defaults for anything unset
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let port = match lookup("PORT") {
            Some(value) => value.parse::<u16>().unwrap_or_else(|_| {
                warn!("ignoring invalid PORT {value:?}");
                defaults.port
            }),
            None => defaults.port,
        };
        Self {
            port,
            settings_path: lookup("WEATHER_SETTINGS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.settings_path),
            city: lookup("WEATHER_CITY")
                .filter(|city| !city.trim().is_empty())
                .unwrap_or(defaults.city),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(config(&[]), Config::default());
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("PORT", "9000"),
            ("WEATHER_SETTINGS_PATH", "/tmp/s.json"),
            ("WEATHER_CITY", "Kazan"),
        ]);
        assert_eq!(config.port, 9000);
        assert_eq!(config.settings_path, PathBuf::from("/tmp/s.json"));
        assert_eq!(config.city, "Kazan");
    }

    #[test]
    fn bad_port_falls_back() {
        assert_eq!(config(&[("PORT", "http")]).port, 8080);
        assert_eq!(config(&[("WEATHER_CITY", " ")]).city, "Moscow");
    }
}
