//! "What to wear" recommendations. Opening the modal starts a short fake
//! thinking phase, after which a random recommendation is shown.

use crate::{
    current::{Conditions, CurrentWeather},
    modal::{Dismiss, Modal, modal_shell},
    notify::Notifications,
    schedule::ScheduledTask,
    view::Element,
};
use rand::{Rng, thread_rng};
use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tracing::debug;

pub const THINKING_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, PartialEq, Eq)]
pub struct Recommendation {
    pub main: &'static str,
    pub clothing: &'static [&'static str],
    pub accessories: &'static [&'static str],
    pub tips: &'static [&'static str],
}

pub static RECOMMENDATIONS: [Recommendation; 5] = [
    Recommendation {
        main: "Wear a light jacket, there's a cool wind today.",
        clothing: &["Long-sleeve T-shirt", "Light windbreaker", "Jeans", "Sneakers"],
        accessories: &["Sunglasses", "Cap"],
        tips: &["Bring a bottle of water", "Use a moisturizer"],
    },
    Recommendation {
        main: "A perfect day for a T-shirt and jeans.",
        clothing: &["T-shirt", "Jeans", "Sneakers", "Light sweater for the evening"],
        accessories: &["Sunglasses", "Backpack"],
        tips: &["Great day for a walk", "Plan something active outdoors"],
    },
    Recommendation {
        main: "Take an umbrella, rain is possible in the afternoon.",
        clothing: &["Water-repellent jacket", "Jeans", "Waterproof shoes"],
        accessories: &["Umbrella", "Raincoat"],
        tips: &["Check the evening forecast", "Plan indoor activities"],
    },
    Recommendation {
        main: "Sunny! Put on sunglasses and a hat.",
        clothing: &["Shorts", "T-shirt", "Flip-flops"],
        accessories: &["Sunglasses", "Bucket hat", "Sunscreen"],
        tips: &["Avoid long exposure to the sun", "Drink more water"],
    },
    Recommendation {
        main: "A cool evening, take a warm sweater.",
        clothing: &["Warm sweater", "Trousers", "Closed shoes"],
        accessories: &["Scarf", "Gloves"],
        tips: &["Plan evening activities indoors", "Hot tea will come in handy"],
    },
];

#[derive(Clone, Debug, PartialEq)]
pub enum AiPhase {
    /// Never opened
    Idle,
    Loading,
    Ready {
        recommendation: &'static Recommendation,
        conditions: Conditions,
    },
}

#[derive(Debug)]
struct Inner {
    phase: AiPhase,
    /// Bumped on every open so a late completion from an older open is ignored
    generation: u64,
}

pub struct AiModal {
    modal: Modal,
    inner: Arc<Mutex<Inner>>,
    pending: Option<ScheduledTask>,
    weather: Arc<CurrentWeather>,
    notifications: Notifications,
    delay: Duration,
}

impl AiModal {
    pub fn new(weather: Arc<CurrentWeather>, notifications: Notifications) -> Self {
        Self {
            modal: Modal::new("ai"),
            inner: Arc::new(Mutex::new(Inner {
                phase: AiPhase::Idle,
                generation: 0,
            })),
            pending: None,
            weather,
            notifications,
            delay: THINKING_DELAY,
        }
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn phase(&self) -> AiPhase {
        lock(&self.inner).phase.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.phase() == AiPhase::Loading
    }

    /// Open (or re-open) and start a fresh loading phase. Any load still in
    /// flight is cancelled. Needs a tokio runtime.
    pub fn open(&mut self) {
        self.modal.open();
        let generation = {
            let mut inner = lock(&self.inner);
            inner.generation += 1;
            inner.phase = AiPhase::Loading;
            inner.generation
        };
        debug!(generation, "Generating recommendation");

        let inner = Arc::clone(&self.inner);
        let conditions = self.weather.conditions().clone();
        // Assigning drops (and so aborts) the previous task
        self.pending = Some(ScheduledTask::after(self.delay, move || {
            let mut inner = lock(&inner);
            if inner.generation == generation {
                inner.phase = AiPhase::Ready {
                    recommendation: pick_recommendation(&mut thread_rng()),
                    conditions,
                };
            }
        }));
    }

    pub fn close(&mut self) {
        self.modal.close();
        if let Some(task) = self.pending.take() {
            task.cancel();
        }
    }

    pub fn dismiss(&mut self, dismiss: Dismiss) -> bool {
        let close = self.modal.should_dismiss(dismiss);
        if close {
            self.close();
        }
        close
    }

    /// Text to put on the clipboard, if a recommendation is showing
    pub fn share(&self) -> Option<String> {
        let AiPhase::Ready { recommendation, .. } = self.phase() else {
            return None;
        };
        self.notifications.show("Recommendation copied to clipboard!");
        Some(share_text(recommendation))
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn pick_recommendation<R: Rng + ?Sized>(rng: &mut R) -> &'static Recommendation {
    &RECOMMENDATIONS[rng.gen_range(0..RECOMMENDATIONS.len())]
}

pub fn share_text(recommendation: &Recommendation) -> String {
    format!("AI recommends: {} #WeatherDashboard", recommendation.main)
}

/// The six factors the recommendation considered
pub fn weather_factors(conditions: &Conditions) -> [(&'static str, &'static str, String); 6] {
    [
        ("🌡️", "Temperature", format!("{}°", conditions.temp)),
        ("💨", "Wind", format!("{} m/s", conditions.wind)),
        ("💧", "Humidity", format!("{}%", conditions.humidity)),
        ("☀️", "UV index", conditions.uv_index.to_string()),
        ("🌧️", "Precipitation", format!("{}%", conditions.precipitation)),
        ("🌤️", "Condition", conditions.condition.text().to_owned()),
    ]
}

fn item_list(id: &str, items: &[&str]) -> Element {
    Element::new("ul").id(id).class("recommendation-list").children(
        items
            .iter()
            .map(|&item| Element::new("li").class("recommendation-item").text(item)),
    )
}

pub fn render_ai_modal(ai: &AiModal) -> Element {
    let shell = modal_shell("aiModal", "ai", ai.modal().is_open(), "What to wear");
    let shell = match ai.phase() {
        AiPhase::Idle => shell,
        AiPhase::Loading => shell.child(
            Element::new("div")
                .id("aiLoading")
                .class("ai-loading")
                .text("Thinking about your outfit..."),
        ),
        AiPhase::Ready {
            recommendation,
            conditions,
        } => {
            let context = Element::new("div")
                .class("ai-context")
                .child(Element::new("span").id("aiContextTemp").text(format!(
                    "{}° (feels like {}°)",
                    conditions.temp, conditions.feels_like
                )))
                .child(
                    Element::new("span")
                        .id("aiContextWind")
                        .text(format!("Wind: {} m/s", conditions.wind)),
                )
                .child(Element::new("span").id("aiContextPrecip").text(format!(
                    "Chance of precipitation: {}%",
                    conditions.precipitation
                )));

            let factors = Element::new("div").id("aiFactors").class("factors-grid").children(
                weather_factors(&conditions).map(|(icon, label, value)| {
                    Element::new("div")
                        .class("factor-item")
                        .child(Element::new("div").class("factor-icon").text(icon))
                        .child(Element::new("div").class("factor-value").text(value))
                        .child(Element::new("div").class("factor-label").text(label))
                }),
            );

            let content = Element::new("div")
                .id("aiContent")
                .class("ai-content")
                .child(
                    Element::new("p")
                        .id("aiMainRecommendation")
                        .class("ai-main")
                        .text(recommendation.main),
                )
                .child(context)
                .child(factors)
                .child(Element::new("h3").text("Clothing"))
                .child(item_list("aiClothing", recommendation.clothing))
                .child(Element::new("h3").text("Accessories"))
                .child(item_list("aiAccessories", recommendation.accessories))
                .child(Element::new("h3").text("Tips"))
                .child(item_list("aiAdditionalTips", recommendation.tips))
                .child(
                    Element::new("div")
                        .class("ai-actions")
                        .child(
                            Element::new("button")
                                .id("aiRefresh")
                                .attr("type", "button")
                                .attr("data-post", "/api/ai/open")
                                .text("New advice"),
                        )
                        .child(
                            Element::new("button")
                                .id("aiShare")
                                .attr("type", "button")
                                .attr("data-post", "/api/ai/share")
                                .text("Share"),
                        ),
                );
            shell.child(content)
        }
    };
    shell.build()
}
