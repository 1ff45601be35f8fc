use std::fmt::Display;

use color_eyre::eyre::Result;
use human_repr::HumanCount;
use serde::{Deserialize, Serialize};

use crate::route::Metric;

/// Snapshot of a running shortest-path search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchState {
    pub metric: Metric,
    pub from: String,
    pub to: String,
    pub current: u32,
    pub cost: f32,
    pub n_seen: usize,
    pub queue_size: usize,
    pub msg: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum Event {
    SearchState(SearchState),
    Message(String),
}

impl Display for SearchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self { metric, from, to, current, cost, n_seen, queue_size, msg } =
            self;
        let queued = queue_size.human_count_bare();
        let seen = n_seen.human_count_bare();
        let unit = metric.unit();
        write!(
            f,
            "[{metric} | {from} -> {to}] At: #{current} | Cost: {cost:.02} {unit} | Queue: {queued} | Finalized: {seen}"
        )?;
        if let Some(msg) = msg.as_ref() {
            write!(f, " | {msg}")?;
        };
        Ok(())
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SearchState(state) => {
                write!(f, "{state}")?;
            }
            Self::Message(msg) => {
                write!(f, "{msg}")?;
            }
        }
        Ok(())
    }
}

pub type Callback =
    Box<dyn Fn(&crate::route::Router, &Event) -> Result<()> + Send>;
