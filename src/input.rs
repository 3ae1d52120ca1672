use crate::events::{EventBus, GameEvent};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};

/// Virtual on-screen hold buttons, fed by the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchButton {
    Left,
    Right,
}

impl TouchButton {
    pub fn label(self) -> &'static str {
        match self {
            TouchButton::Left => "left",
            TouchButton::Right => "right",
        }
    }

    fn action(self) -> InputAction {
        match self {
            TouchButton::Left => InputAction::MoveLeft,
            TouchButton::Right => InputAction::MoveRight,
        }
    }
}

/// Aggregates keyboard and touch-button sources into one signed horizontal
/// axis. All sources add and remove entries in a shared held set; the axis is
/// recomputed on every change, and opposing directions cancel to zero.
pub struct InputAggregator {
    bindings: InputBindings,
    held: HashSet<HeldInput>,
    horizontal: f32,
    touch_left_held: bool,
    touch_right_held: bool,
}

impl InputAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(path: impl AsRef<Path>) -> Self {
        let bindings = InputBindings::load_or_default(path);
        Self::with_bindings(bindings)
    }

    fn with_bindings(bindings: InputBindings) -> Self {
        Self {
            bindings,
            held: HashSet::new(),
            horizontal: 0.0,
            touch_left_held: false,
            touch_right_held: false,
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.horizontal
    }

    pub fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key { key, pressed } => {
                if let Some(binding) = InputKeyBinding::from_event_key(&key) {
                    // Releasing a key that was never recorded is a no-op, and
                    // OS key-repeat cannot double-count because the set insert
                    // is idempotent.
                    if pressed {
                        self.held.insert(HeldInput::Key(binding));
                    } else {
                        self.held.remove(&HeldInput::Key(binding));
                    }
                    self.update_axis();
                }
            }
            InputEvent::Focus { focused } => {
                if !focused {
                    self.cancel_all();
                }
            }
            InputEvent::Other => {}
        }
    }

    /// Touch hold start. The per-button held flag suppresses the duplicate
    /// `mousedown`/`touchstart` pair; the emitted event is cosmetic feedback
    /// only and never feeds back into axis logic.
    pub fn touch_start(&mut self, button: TouchButton, events: &mut EventBus) {
        let held = match button {
            TouchButton::Left => &mut self.touch_left_held,
            TouchButton::Right => &mut self.touch_right_held,
        };
        if *held {
            return;
        }
        *held = true;
        events.push(GameEvent::TouchButton { button, pressed: true });
        self.held.insert(HeldInput::Touch(button));
        self.update_axis();
    }

    pub fn touch_end(&mut self, button: TouchButton, events: &mut EventBus) {
        let held = match button {
            TouchButton::Left => &mut self.touch_left_held,
            TouchButton::Right => &mut self.touch_right_held,
        };
        if !*held {
            return;
        }
        *held = false;
        events.push(GameEvent::TouchButton { button, pressed: false });
        self.held.remove(&HeldInput::Touch(button));
        self.update_axis();
    }

    /// Drops every held input and zeroes the axis. Window blur calls this so
    /// a key-up swallowed by a modifier combination or focus switch cannot
    /// leave the axis stuck.
    pub fn cancel_all(&mut self) {
        self.held.clear();
        self.touch_left_held = false;
        self.touch_right_held = false;
        self.horizontal = 0.0;
    }

    pub fn held_count(&self) -> usize {
        self.held.len()
    }

    fn update_axis(&mut self) {
        let mut left = false;
        let mut right = false;
        for held in &self.held {
            match held {
                HeldInput::Key(binding) => {
                    for action in self.bindings.actions_for_key(binding) {
                        match action {
                            InputAction::MoveLeft => left = true,
                            InputAction::MoveRight => right = true,
                        }
                    }
                }
                HeldInput::Touch(button) => match button.action() {
                    InputAction::MoveLeft => left = true,
                    InputAction::MoveRight => right = true,
                },
            }
        }
        self.horizontal = match (left, right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
    }
}

impl Default for InputAggregator {
    fn default() -> Self {
        Self::with_bindings(InputBindings::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum HeldInput {
    Key(InputKeyBinding),
    Touch(TouchButton),
}

#[derive(Debug, Clone)]
struct InputBindings {
    key_to_actions: HashMap<InputKeyBinding, Vec<InputAction>>,
}

impl InputBindings {
    fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<InputConfigFile>(&contents) {
                Ok(config) => Self::from_config(config, &path.display().to_string()),
                Err(err) => {
                    eprintln!(
                        "[input] Failed to parse {}: {err}. Falling back to default bindings.",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(err) => {
                eprintln!(
                    "[input] Failed to read {}: {err}. Falling back to default bindings.",
                    path.display()
                );
                Self::default()
            }
        }
    }

    fn from_config(config: InputConfigFile, origin: &str) -> Self {
        let overrides = config.into_overrides(origin);
        let mut action_map = Self::default_action_map();
        for (action, keys) in overrides {
            if keys.is_empty() {
                continue;
            }
            action_map.insert(action, keys);
        }
        Self::from_action_map(action_map)
    }

    fn default_action_map() -> HashMap<InputAction, Vec<InputKeyBinding>> {
        let mut map = HashMap::new();
        map.insert(
            InputAction::MoveLeft,
            vec![InputKeyBinding::character("a"), InputKeyBinding::named(NamedKeyCode::ArrowLeft)],
        );
        map.insert(
            InputAction::MoveRight,
            vec![InputKeyBinding::character("d"), InputKeyBinding::named(NamedKeyCode::ArrowRight)],
        );
        map
    }

    fn from_action_map(action_map: HashMap<InputAction, Vec<InputKeyBinding>>) -> Self {
        let mut key_to_actions: HashMap<InputKeyBinding, Vec<InputAction>> = HashMap::new();
        for (action, keys) in action_map {
            for key in keys {
                key_to_actions.entry(key).or_default().push(action);
            }
        }
        Self { key_to_actions }
    }

    fn actions_for_key(&self, key: &InputKeyBinding) -> impl Iterator<Item = InputAction> + '_ {
        self.key_to_actions.get(key).into_iter().flatten().copied()
    }
}

impl Default for InputBindings {
    fn default() -> Self {
        Self::from_action_map(Self::default_action_map())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum InputKeyBinding {
    Character(String),
    Named(NamedKeyCode),
}

impl InputKeyBinding {
    fn character(ch: &str) -> Self {
        Self::Character(ch.to_lowercase())
    }

    fn named(named: NamedKeyCode) -> Self {
        Self::Named(named)
    }

    fn from_event_key(key: &Key) -> Option<Self> {
        match key {
            Key::Character(ch) => {
                let s = ch.to_string();
                if s.is_empty() {
                    None
                } else {
                    Some(Self::Character(s.to_lowercase()))
                }
            }
            Key::Named(named) => NamedKeyCode::from_named_key(named).map(Self::Named),
            _ => None,
        }
    }

    fn from_config_value(raw: &str) -> Result<Self, ()> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(());
        }
        if let Some(named) = NamedKeyCode::from_str(&normalized) {
            return Ok(Self::Named(named));
        }
        if normalized.chars().count() == 1 {
            return Ok(Self::Character(normalized));
        }
        Err(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum NamedKeyCode {
    ArrowLeft,
    ArrowRight,
}

impl NamedKeyCode {
    fn from_named_key(key: &NamedKey) -> Option<Self> {
        match key {
            NamedKey::ArrowLeft => Some(Self::ArrowLeft),
            NamedKey::ArrowRight => Some(Self::ArrowRight),
            _ => None,
        }
    }

    fn from_str(value: &str) -> Option<Self> {
        match value {
            "arrowleft" | "left" => Some(Self::ArrowLeft),
            "arrowright" | "right" => Some(Self::ArrowRight),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum InputAction {
    MoveLeft,
    MoveRight,
}

impl InputAction {
    fn from_str(value: &str) -> Option<Self> {
        match value {
            "move_left" => Some(Self::MoveLeft),
            "move_right" => Some(Self::MoveRight),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct InputConfigFile {
    #[serde(default)]
    bindings: HashMap<String, Vec<String>>,
}

impl InputConfigFile {
    fn into_overrides(self, origin: &str) -> HashMap<InputAction, Vec<InputKeyBinding>> {
        let mut overrides = HashMap::new();
        for (action_name, keys) in self.bindings {
            let action_key = action_name.trim().to_lowercase();
            match InputAction::from_str(&action_key) {
                Some(action) => {
                    let mut parsed = Vec::new();
                    for key in keys {
                        match InputKeyBinding::from_config_value(&key) {
                            Ok(binding) => parsed.push(binding),
                            Err(_) => eprintln!(
                                "[input] {origin}: unknown key '{key}' for action '{action_name}', ignoring."
                            ),
                        }
                    }
                    if parsed.is_empty() {
                        eprintln!(
                            "[input] {origin}: action '{action_name}' has no valid keys, keeping defaults."
                        );
                        continue;
                    }
                    overrides.insert(action, parsed);
                }
                None => eprintln!("[input] {origin}: unknown action '{action_name}', ignoring."),
            }
        }
        overrides
    }
}

pub enum InputEvent {
    Key { key: Key, pressed: bool },
    Focus { focused: bool },
    Other,
}

impl InputEvent {
    pub fn from_window_event(ev: &WindowEvent) -> Self {
        match ev {
            WindowEvent::KeyboardInput { event, .. } => InputEvent::Key {
                key: event.logical_key.clone(),
                pressed: event.state == ElementState::Pressed,
            },
            WindowEvent::Focused(focused) => InputEvent::Focus { focused: *focused },
            _ => InputEvent::Other,
        }
    }
}
