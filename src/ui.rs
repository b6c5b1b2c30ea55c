use crate::{
    ai::render_ai_modal,
    city::{render_city_modal, render_search_results},
    current::render_header,
    hourly::{HOURLY_SAMPLES, render_hourly_chart},
    notify::render_notifications,
    settings::{SettingsStore, Theme, render_settings_modal},
    state::Dashboard,
    view::Element,
    weekly_view::{render_day_details, render_day_strip, render_temperature_chart},
};
use serde_json::json;
use std::collections::BTreeMap;

/// Independently rerendered part of the page, named by its root element id
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    Header,
    Hourly,
    DayStrip,
    TemperatureChart,
    DayDetails,
    CityModal,
    SearchResults,
    SettingsModal,
    AiModal,
    Notifications,
}

impl Region {
    pub const ALL: [Region; 10] = [
        Region::Header,
        Region::Hourly,
        Region::DayStrip,
        Region::TemperatureChart,
        Region::DayDetails,
        Region::CityModal,
        Region::SearchResults,
        Region::SettingsModal,
        Region::AiModal,
        Region::Notifications,
    ];

    pub const WEEKLY: [Region; 3] = [
        Region::DayStrip,
        Region::TemperatureChart,
        Region::DayDetails,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Region::Header => "header",
            Region::Hourly => "hourlyChart",
            Region::DayStrip => "weeklyDays",
            Region::TemperatureChart => "temperatureChart",
            Region::DayDetails => "selectedDayDetails",
            Region::CityModal => "cityModal",
            Region::SearchResults => "searchResults",
            Region::SettingsModal => "settingsModal",
            Region::AiModal => "aiModal",
            Region::Notifications => "notifications",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|region| region.id() == id)
    }

    pub fn render<S>(self, dashboard: &Dashboard<S>, time: &str) -> Element {
        match self {
            Region::Header => render_header(&dashboard.current, time),
            Region::Hourly => render_hourly_chart(&HOURLY_SAMPLES),
            Region::DayStrip => {
                let forecast = dashboard.forecast.lock();
                render_day_strip(forecast.days(), forecast.selected_index())
            }
            Region::TemperatureChart => {
                let forecast = dashboard.forecast.lock();
                render_temperature_chart(forecast.days(), forecast.selected_index())
            }
            Region::DayDetails => {
                let forecast = dashboard.forecast.lock();
                render_day_details(forecast.days(), forecast.selected_index())
            }
            Region::CityModal => render_city_modal(&dashboard.city),
            Region::SearchResults => render_search_results(&dashboard.city),
            Region::SettingsModal => render_settings_modal(&dashboard.settings),
            Region::AiModal => render_ai_modal(&dashboard.ai),
            Region::Notifications => render_notifications(&dashboard.notifications.banners()),
        }
    }
}

pub fn render_regions<S>(
    dashboard: &Dashboard<S>,
    time: &str,
    regions: &[Region],
) -> BTreeMap<&'static str, String> {
    regions
        .iter()
        .map(|&region| (region.id(), region.render(dashboard, time).to_html()))
        .collect()
}

pub fn body_class(theme: Theme, scroll_locked: bool) -> String {
    if scroll_locked {
        format!("{} no-scroll", theme.body_class())
    } else {
        theme.body_class().to_owned()
    }
}

pub fn render_index<S: SettingsStore>(dashboard: &Dashboard<S>, time: &str) -> String {
    let theme = dashboard.settings.theme();
    let palette = theme.palette();
    let palettes = json!({
        "day": palette_json(Theme::Day),
        "night": palette_json(Theme::Night),
    })
    .to_string();

    fill(INDEX_HTML, |key| match key {
        "BODY_CLASS" => Some(body_class(theme, dashboard.scroll_locked())),
        "BG" => Some(palette.bg.to_owned()),
        "BLOCK" => Some(palette.block.to_owned()),
        "TEXT" => Some(palette.text.to_owned()),
        "PALETTES" => Some(palettes.clone()),
        id => Region::from_id(id).map(|region| region.render(dashboard, time).to_html()),
    })
}

fn palette_json(theme: Theme) -> serde_json::Value {
    let palette = theme.palette();
    json!({ "bg": palette.bg, "block": palette.block, "text": palette.text })
}

/// Substitute `{{KEY}}` placeholders in a single pass, so rendered content
/// is never scanned for placeholders itself. Unknown keys are left as is.
fn fill(template: &str, value: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let key = &after[..end];
        match value(key) {
            Some(replacement) => out.push_str(&replacement),
            None => out.push_str(&rest[start..start + end + 4]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Weather Dashboard</title>
  <style>
    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--text);
      font-family: "Segoe UI", "Trebuchet MS", sans-serif;
      padding: 24px 16px 48px;
      transition: background 300ms ease, color 300ms ease;
    }

    body.no-scroll {
      overflow: hidden;
    }

    .app {
      width: min(980px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 20px;
    }

    .panel,
    .header {
      background: var(--block);
      border-radius: 20px;
      padding: 20px 24px;
      box-shadow: 0 16px 40px rgba(0, 0, 0, 0.18);
    }

    .panel h2 {
      margin: 0 0 14px;
      font-size: 1.2rem;
    }

    .panel-head {
      display: flex;
      justify-content: space-between;
      align-items: center;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 10px 16px;
      font-size: 0.95rem;
      font-weight: 600;
      cursor: pointer;
      color: var(--text);
      background: rgba(255, 255, 255, 0.12);
    }

    button:hover {
      background: rgba(255, 255, 255, 0.22);
    }

    .header {
      display: grid;
      grid-template-columns: 1fr auto;
      gap: 12px;
      align-items: center;
    }

    .city-name {
      font-size: 1.8rem;
      padding: 4px 0;
      background: none;
      justify-self: start;
    }

    .current-time {
      font-size: 1.4rem;
      font-variant-numeric: tabular-nums;
      justify-self: end;
    }

    .current-conditions {
      display: flex;
      gap: 12px;
      align-items: baseline;
    }

    .current-icon {
      font-size: 2rem;
    }

    .current-temp {
      font-size: 2.4rem;
      font-weight: 600;
    }

    .header-actions {
      display: flex;
      gap: 8px;
      justify-self: end;
    }

    .hourly-chart,
    .temperature-chart {
      display: flex;
      gap: 10px;
      align-items: flex-end;
      height: 200px;
    }

    .chart-hour,
    .temp-column {
      flex: 1;
      display: flex;
      flex-direction: column;
      align-items: center;
      justify-content: flex-end;
      height: 100%;
      gap: 4px;
    }

    .chart-bar,
    .temp-bar {
      width: 60%;
      border-radius: 8px 8px 0 0;
      background: linear-gradient(180deg, #ffd166, #ef8354);
    }

    .temp-bar-min {
      background: linear-gradient(180deg, #8ecae6, #219ebc);
    }

    .temp-column {
      transition: transform 200ms ease;
    }

    .temp-column.selected .temp-value {
      font-weight: 700;
    }

    .weekly-days {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 8px;
      margin-bottom: 18px;
    }

    .weekly-day {
      display: grid;
      justify-items: center;
      gap: 4px;
      padding: 10px 4px;
      border-radius: 14px;
      cursor: pointer;
      background: rgba(255, 255, 255, 0.06);
    }

    .weekly-day.today {
      outline: 1px dashed rgba(255, 255, 255, 0.5);
    }

    .weekly-day.selected {
      background: rgba(255, 255, 255, 0.25);
    }

    .day-details {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(140px, 1fr));
      gap: 10px;
      margin-top: 18px;
    }

    .day-detail {
      display: grid;
      gap: 2px;
      padding: 10px 12px;
      border-radius: 12px;
      background: rgba(255, 255, 255, 0.08);
    }

    .modal-overlay {
      position: fixed;
      inset: 0;
      display: none;
      place-items: center;
      background: rgba(0, 0, 0, 0.55);
      z-index: 10;
    }

    .modal-overlay.active {
      display: grid;
    }

    .modal {
      width: min(560px, 92vw);
      max-height: 86vh;
      overflow-y: auto;
      background: var(--block);
      border-radius: 20px;
      padding: 20px 24px;
    }

    .modal-header {
      display: flex;
      justify-content: space-between;
      align-items: center;
    }

    .modal-close {
      font-size: 1.4rem;
      padding: 2px 12px;
    }

    .city-search {
      width: 100%;
      padding: 10px 14px;
      border-radius: 12px;
      border: none;
      font-size: 1rem;
    }

    .quick-cities {
      display: flex;
      flex-wrap: wrap;
      gap: 6px;
      margin: 14px 0;
    }

    .city-quick-btn.current {
      background: rgba(255, 255, 255, 0.35);
    }

    .result-item {
      padding: 10px 12px;
      border-radius: 12px;
      cursor: pointer;
    }

    .result-item:hover {
      background: rgba(255, 255, 255, 0.12);
    }

    .city-country {
      font-size: 0.85rem;
      opacity: 0.7;
    }

    .reset-confirm {
      display: none;
      margin-top: 12px;
    }

    .reset-confirm.show {
      display: block;
    }

    .factors-grid {
      display: grid;
      grid-template-columns: repeat(3, 1fr);
      gap: 8px;
    }

    .factor-item {
      text-align: center;
      padding: 8px;
      border-radius: 12px;
      background: rgba(255, 255, 255, 0.08);
    }

    .ai-context {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
      margin-bottom: 12px;
      opacity: 0.85;
    }

    .notifications {
      position: fixed;
      top: 16px;
      right: 16px;
      display: grid;
      gap: 8px;
      z-index: 20;
    }

    .notification {
      padding: 12px 18px;
      border-radius: 12px;
      background: #2d7a4b;
      color: white;
      animation: slide-in 300ms ease;
    }

    .notification.leaving {
      opacity: 0;
      transform: translateX(40px);
      transition: opacity 300ms ease, transform 300ms ease;
    }

    @keyframes slide-in {
      from {
        opacity: 0;
        transform: translateX(40px);
      }
      to {
        opacity: 1;
        transform: translateX(0);
      }
    }

    @media (max-width: 640px) {
      .weekly-days {
        grid-template-columns: repeat(4, 1fr);
      }
      .header {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body class="{{BODY_CLASS}}" style="--bg: {{BG}}; --block: {{BLOCK}}; --text: {{TEXT}};">
  <main class="app">
    {{header}}

    <section class="panel">
      <h2>Today by the hour</h2>
      {{hourlyChart}}
    </section>

    <section class="panel">
      <div class="panel-head">
        <h2>This week</h2>
        <button type="button" id="viewDetailsBtn" data-detail="/api/forecast/detail">Full details</button>
        <button type="button" data-post="/api/forecast/reload">Refresh</button>
      </div>
      {{weeklyDays}}
      {{temperatureChart}}
      {{selectedDayDetails}}
    </section>
  </main>

  {{cityModal}}
  {{settingsModal}}
  {{aiModal}}
  {{notifications}}

  <script>
    const PALETTES = {{PALETTES}};
    let aiPoll = null;

    const applyTheme = (theme, locked) => {
      const palette = PALETTES[theme];
      if (palette) {
        document.body.style.setProperty('--bg', palette.bg);
        document.body.style.setProperty('--block', palette.block);
        document.body.style.setProperty('--text', palette.text);
      }
      document.body.className = `${theme}-theme${locked ? ' no-scroll' : ''}`;
    };

    const swapRegions = (regions) => {
      const focused = document.activeElement;
      const focusId = focused && focused.id;
      const caret = focused && typeof focused.selectionStart === 'number' ? focused.selectionStart : null;

      Object.entries(regions || {}).forEach(([id, html]) => {
        const el = document.getElementById(id);
        if (el) {
          el.outerHTML = html;
        }
      });

      if (focusId) {
        const again = document.getElementById(focusId);
        if (again && again !== focused) {
          again.focus();
          if (caret !== null && typeof again.setSelectionRange === 'function') {
            again.setSelectionRange(caret, caret);
          }
        }
      }
    };

    const apply = (data) => {
      swapRegions(data.regions);
      applyTheme(data.theme, data.scroll_locked);

      if (aiPoll) {
        clearTimeout(aiPoll);
        aiPoll = null;
      }
      if (typeof data.poll_after_ms === 'number') {
        aiPoll = setTimeout(() => request('GET', '/api/ai'), data.poll_after_ms);
      }
      if (data.share_text && navigator.clipboard) {
        navigator.clipboard.writeText(data.share_text).catch(() => {});
      }
    };

    const request = async (method, url, body) => {
      const options = { method, headers: { 'content-type': 'application/json' } };
      if (method !== 'GET') {
        options.body = JSON.stringify(body || {});
      }
      const res = await fetch(url, options);
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      const data = await res.json();
      if (data.regions) {
        apply(data);
      }
      return data;
    };

    const report = (err) => console.error(err.message);

    const showDetail = async (url) => {
      const res = await fetch(url);
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      const data = await res.json();
      alert(data.text);
    };

    const readSettings = () => {
      const form = document.getElementById('settingsForm');
      if (!form) {
        return null;
      }
      const checked = form.querySelector('input[name="theme"]:checked');
      return {
        theme: checked ? checked.value : 'day',
        tempUnit: form.elements.tempUnit.value,
        windUnit: form.elements.windUnit.value,
        pressureUnit: form.elements.pressureUnit.value,
        autoUpdate: form.elements.autoUpdate.checked,
        notifications: form.elements.notifications.checked,
        geolocation: form.elements.geolocation.checked
      };
    };

    const settingsOpen = () => {
      const modal = document.getElementById('settingsModal');
      return Boolean(modal && modal.classList.contains('active'));
    };

    document.addEventListener('click', (event) => {
      const target = event.target;

      const overlay = target.closest('[data-overlay]');
      if (overlay && target === overlay) {
        request('POST', overlay.dataset.overlay, { via: 'overlay', target_is_overlay: true }).catch(report);
        return;
      }

      const save = target.closest('[data-save]');
      if (save) {
        request('PUT', save.dataset.save, readSettings()).catch(report);
        return;
      }

      const detail = target.closest('[data-detail]');
      if (detail) {
        showDetail(detail.dataset.detail).catch(report);
        return;
      }

      const action = target.closest('[data-post]');
      if (action) {
        const body = action.dataset.body ? JSON.parse(action.dataset.body) : {};
        request('POST', action.dataset.post, body).catch(report);
      }
    });

    document.addEventListener('dblclick', (event) => {
      const day = event.target.closest('.weekly-day');
      if (day) {
        showDetail(`/api/forecast/detail?index=${day.dataset.index}`).catch(report);
      }
    });

    document.addEventListener('change', (event) => {
      const target = event.target;
      if (target.dataset && target.dataset.preview) {
        request('POST', target.dataset.preview, { theme: target.value }).catch(report);
      }
    });

    const fillSuggestions = async (input) => {
      const list = document.getElementById(input.getAttribute('list'));
      if (!list) {
        return;
      }
      const res = await fetch(`${input.dataset.suggest}?q=${encodeURIComponent(input.value)}`);
      if (!res.ok) {
        return;
      }
      const data = await res.json();
      list.replaceChildren(...data.suggestions.map((name) => {
        const option = document.createElement('option');
        option.value = name;
        return option;
      }));
    };

    document.addEventListener('input', (event) => {
      const target = event.target;
      if (target.dataset && target.dataset.search) {
        request('POST', target.dataset.search, { query: target.value })
          .then(() => {
            const input = document.getElementById(target.id);
            if (input && input.dataset.suggest) {
              return fillSuggestions(input);
            }
          })
          .catch(report);
      }
    });

    document.addEventListener('keydown', (event) => {
      const save = (event.ctrlKey || event.metaKey) && event.key.toLowerCase() === 's';
      if (event.key !== 'Escape' && !save) {
        return;
      }
      if (save && settingsOpen()) {
        event.preventDefault();
      }
      const body = { key: event.key, ctrl: event.ctrlKey, meta: event.metaKey };
      if (save && settingsOpen()) {
        body.settings = readSettings();
      }
      request('POST', '/api/keys', body).catch(report);
    });

    const tick = async () => {
      const res = await fetch('/api/time');
      if (res.ok) {
        const data = await res.json();
        const el = document.getElementById('currentTime');
        if (el) {
          el.textContent = data.time;
        }
      }
      const stack = document.getElementById('notifications');
      if (stack && stack.children.length) {
        await request('GET', '/api/notifications');
      }
    };

    setInterval(() => tick().catch(report), 1000);
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{forecast::MockForecastSource, settings::MemorySettingsStore};

    #[test]
    fn fill_is_single_pass() {
        let out = fill("a {{X}} b {{Y}} {{unknown}}", |key| match key {
            "X" => Some("{{Y}}".to_owned()),
            "Y" => Some("y".to_owned()),
            _ => None,
        });
        assert_eq!(out, "a {{Y}} b y {{unknown}}");
        assert_eq!(fill("open {{ end", |_| None), "open {{ end");
    }

    #[test]
    fn region_ids_round_trip() {
        for region in Region::ALL {
            assert_eq!(Region::from_id(region.id()), Some(region));
        }
        assert_eq!(Region::from_id("nope"), None);
    }

    #[tokio::test]
    async fn index_contains_every_region() {
        let dashboard =
            Dashboard::new("Kazan", MockForecastSource, MemorySettingsStore::new()).await;
        let html = render_index(&dashboard, "12:00:00");

        for region in Region::ALL {
            assert!(
                html.contains(&format!("id=\"{}\"", region.id())),
                "missing {}",
                region.id()
            );
        }
        assert!(html.contains("id=\"viewDetailsBtn\" data-detail=\"/api/forecast/detail\""));
        assert!(html.contains("Kazan"));
        assert!(html.contains("12:00:00"));
        assert!(html.contains("class=\"day-theme\""));
        assert!(!html.contains("{{"));
    }

    #[tokio::test]
    async fn regions_render_by_id() {
        let dashboard =
            Dashboard::new("Moscow", MockForecastSource, MemorySettingsStore::new()).await;
        let regions = render_regions(&dashboard, "00:00:00", &Region::WEEKLY);
        assert_eq!(
            regions.keys().copied().collect::<Vec<_>>(),
            ["selectedDayDetails", "temperatureChart", "weeklyDays"]
        );
        assert_eq!(body_class(Theme::Night, true), "night-theme no-scroll");
    }
}
