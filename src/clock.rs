use crate::schedule::ScheduledTask;
use chrono::{DateTime, Local, TimeZone};
use std::{fmt::Display, time::Duration};
use tokio::{sync::watch, time};

pub const TICK: Duration = Duration::from_secs(1);

pub fn format_time<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    now.format("%H:%M:%S").to_string()
}

/// Wall clock that re-reads local time once a second for as long as it lives
#[derive(Debug)]
pub struct Clock {
    time: watch::Receiver<String>,
    _ticker: ScheduledTask,
}

impl Clock {
    /// Needs a tokio runtime
    pub fn start() -> Self {
        let (tx, rx) = watch::channel(format_time(&Local::now()));
        let ticker = ScheduledTask::spawn(async move {
            let mut interval = time::interval(TICK);
            loop {
                interval.tick().await;
                if tx.send(format_time(&Local::now())).is_err() {
                    break;
                }
            }
        });
        Self {
            time: rx,
            _ticker: ticker,
        }
    }

    /// Most recently published time string
    pub fn now(&self) -> String {
        self.time.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.time.clone()
    }
}
