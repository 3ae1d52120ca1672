use crate::animation::Pose;
use crate::input::TouchButton;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// The character entered an interaction zone.
    ZoneEntered { index: usize, focus: bool },
    /// The character left the zone it was standing in.
    ZoneExited { index: usize },
    /// The position-driven stage selection switched to a different stage.
    StageChanged { name: String },
    /// A one-shot animation clip reached its end.
    AnimationFinished { pose: Pose },
    /// The intro sequence advanced to the given phase.
    IntroAdvanced { phase: u8 },
    /// Cosmetic press/release feedback for a virtual touch button.
    TouchButton { button: TouchButton, pressed: bool },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::ZoneEntered { index, focus } => {
                write!(f, "ZoneEntered index={index} focus={focus}")
            }
            GameEvent::ZoneExited { index } => write!(f, "ZoneExited index={index}"),
            GameEvent::StageChanged { name } => write!(f, "StageChanged name={name}"),
            GameEvent::AnimationFinished { pose } => {
                write!(f, "AnimationFinished pose={}", pose.label())
            }
            GameEvent::IntroAdvanced { phase } => write!(f, "IntroAdvanced phase={phase}"),
            GameEvent::TouchButton { button, pressed } => {
                write!(f, "TouchButton button={} pressed={pressed}", button.label())
            }
        }
    }
}

#[derive(Default)]
pub struct EventBus {
    events: Vec<GameEvent>,
}

impl EventBus {
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }
}
