use crate::config::StageConfig;
use crate::events::{EventBus, GameEvent};
use anyhow::{bail, Result};

/// Position-driven stage selection. Stages are an ordered list of upper
/// thresholds; the first stage whose `max_position` is not exceeded is
/// selected and the final stage is the fallback beyond the last threshold.
/// This is a parallel consumer of the character position, independent of the
/// zone evaluator.
#[derive(Debug)]
pub struct StageSet {
    stages: Vec<StageConfig>,
}

impl StageSet {
    pub fn from_config(stages: Vec<StageConfig>) -> Result<Self> {
        if stages.is_empty() {
            bail!("Stage list is empty; at least one stage is required");
        }
        Ok(Self { stages })
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StageConfig> {
        self.stages.get(index)
    }

    pub fn select(&self, position: f32) -> usize {
        self.stages
            .iter()
            .position(|stage| position <= stage.max_position)
            .unwrap_or(self.stages.len() - 1)
    }
}

/// Fires `StageChanged` at most once per actual change, including the very
/// first selection after startup.
#[derive(Debug, Default)]
pub struct StageTracker {
    current: Option<usize>,
}

impl StageTracker {
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn observe(&mut self, stages: &StageSet, position: f32, events: &mut EventBus) -> usize {
        let selected = stages.select(position);
        if self.current != Some(selected) {
            self.current = Some(selected);
            if let Some(stage) = stages.get(selected) {
                events.push(GameEvent::StageChanged { name: stage.name.clone() });
            }
        }
        selected
    }
}
