//! Transient notification banners. Each banner stays visible for a few
//! seconds, plays an exit animation, then disappears.

use crate::{schedule::ScheduledTask, view::Element};
use serde::Serialize;
use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};
use tokio::time;
use tracing::debug;

const VISIBLE_FOR: Duration = Duration::from_secs(3);
const EXIT_ANIMATION: Duration = Duration::from_millis(300);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerPhase {
    Visible,
    Leaving,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub id: u64,
    pub message: String,
    pub phase: BannerPhase,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    banners: Vec<Banner>,
    tasks: Vec<ScheduledTask>,
}

/// Cheap to clone; all clones share the same banner stack
#[derive(Clone, Debug, Default)]
pub struct Notifications {
    inner: Arc<Mutex<Inner>>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock(&self.inner)
    }

    /// Push a banner and schedule its removal. Needs a tokio runtime.
    pub fn show(&self, message: impl Into<String>) -> u64 {
        let message = message.into();
        let mut inner = self.lock();
        inner.tasks.retain(|task| !task.is_finished());

        let id = inner.next_id;
        inner.next_id += 1;
        debug!(id, %message, "Showing notification");
        inner.banners.push(Banner {
            id,
            message,
            phase: BannerPhase::Visible,
        });

        // Weak so a forgotten task can't keep the stack alive
        let weak = Arc::downgrade(&self.inner);
        inner
            .tasks
            .push(ScheduledTask::spawn(expire(weak, id)));
        id
    }

    pub fn banners(&self) -> Vec<Banner> {
        self.lock().banners.clone()
    }

    /// Drop every banner and cancel their timers
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.banners.clear();
        inner.tasks.clear();
    }
}

async fn expire(inner: Weak<Mutex<Inner>>, id: u64) {
    time::sleep(VISIBLE_FOR).await;
    let Some(strong) = inner.upgrade() else {
        return;
    };
    if let Some(banner) = lock(&strong).banners.iter_mut().find(|b| b.id == id) {
        banner.phase = BannerPhase::Leaving;
    }
    drop(strong);

    time::sleep(EXIT_ANIMATION).await;
    if let Some(strong) = inner.upgrade() {
        lock(&strong).banners.retain(|b| b.id != id);
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn render_notifications(banners: &[Banner]) -> Element {
    Element::new("div")
        .id("notifications")
        .class("notifications")
        .children(banners.iter().map(|banner| {
            Element::new("div")
                .class("notification")
                .class_if(banner.phase == BannerPhase::Leaving, "leaving")
                .attr("data-id", banner.id.to_string())
                .text(banner.message.as_str())
        }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn banner_lifecycle() {
        let notifications = Notifications::new();
        let id = notifications.show("Settings saved!");

        assert_eq!(notifications.banners()[0].phase, BannerPhase::Visible);

        time::sleep(Duration::from_millis(3100)).await;
        let banners = notifications.banners();
        assert_eq!(banners.len(), 1);
        assert_eq!(banners[0].id, id);
        assert_eq!(banners[0].phase, BannerPhase::Leaving);

        time::sleep(Duration::from_millis(300)).await;
        assert!(notifications.banners().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn banners_expire_independently() {
        let notifications = Notifications::new();
        notifications.show("first");
        time::sleep(Duration::from_secs(2)).await;
        notifications.show("second");

        time::sleep(Duration::from_millis(1500)).await;
        let messages: Vec<_> = notifications
            .banners()
            .into_iter()
            .map(|b| b.message)
            .collect();
        assert_eq!(messages, vec!["second"]);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_cancels_timers() {
        let notifications = Notifications::new();
        notifications.show("gone");
        notifications.clear();
        notifications.show("kept");

        time::sleep(Duration::from_secs(1)).await;
        let rendered = render_notifications(&notifications.banners());
        assert_eq!(rendered.find_all("notification").len(), 1);
        assert_eq!(rendered.text_content(), "kept");
    }
}
