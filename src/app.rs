use crate::camera::FollowCamera;
use crate::cli::CliOverrides;
use crate::config::AppConfig;
use crate::controller::CharacterController;
use crate::events::{EventBus, GameEvent};
use crate::input::{InputAggregator, InputEvent, TouchButton};
use crate::rig::CharacterRig;
use crate::stage::{StageSet, StageTracker};
use crate::time::{FixedTimestep, Time};
use crate::zone::{BlinderSet, ZoneSet, ZoneTracker};
use anyhow::{bail, Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

const DEFAULT_CONFIG_PATH: &str = "config/app.json";

/// One running session: the fixed-step simulation plus its collaborators.
/// The character controller slot stays empty until the rig load completes;
/// simulation steps before that are no-ops.
pub struct App {
    config: AppConfig,
    time: Time,
    timestep: FixedTimestep,
    input: InputAggregator,
    events: EventBus,
    player: Option<CharacterController>,
    zones: ZoneSet,
    blinders: BlinderSet,
    zone_tracker: ZoneTracker,
    stages: StageSet,
    stage_tracker: StageTracker,
    camera: FollowCamera,
    sim_time: f64,
    should_close: bool,
    window: Option<Window>,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let input = match &config.bindings {
            Some(path) => InputAggregator::from_config(path),
            None => InputAggregator::new(),
        };
        let zones = ZoneSet::from_config(&config.zones);
        let blinders =
            BlinderSet::new(config.track.blinder_positions.clone(), config.track.blinder_half_width);
        let stages = StageSet::from_config(config.stages.clone())?;
        let camera = FollowCamera::from_config(&config.camera);
        let timestep = FixedTimestep::new(config.sim.fixed_step, config.sim.max_frame_delta);
        Ok(Self {
            config,
            time: Time::new(),
            timestep,
            input,
            events: EventBus::default(),
            player: None,
            zones,
            blinders,
            zone_tracker: ZoneTracker::default(),
            stages,
            stage_tracker: StageTracker::default(),
            camera,
            sim_time: 0.0,
            should_close: false,
            window: None,
        })
    }

    /// Asset-load completion callback: only now does the controller exist.
    pub fn install_rig(&mut self, rig: CharacterRig) -> Result<()> {
        let controller = CharacterController::new(rig, &self.config.character, &self.config.track)?;
        self.player = Some(controller);
        Ok(())
    }

    pub fn load_rig(&mut self) -> Result<()> {
        let rig = CharacterRig::load(&self.config.character.rig, self.config.character.poses)?;
        self.install_rig(rig)
    }

    pub fn player(&self) -> Option<&CharacterController> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut CharacterController> {
        self.player.as_mut()
    }

    pub fn input_mut(&mut self) -> &mut InputAggregator {
        &mut self.input
    }

    pub fn camera(&self) -> &FollowCamera {
        &self.camera
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    /// "Start" entry points invoked by the loading-screen UI once assets are
    /// ready. Calling them earlier is a programming error, not a no-op.
    pub fn start_idle(&mut self) -> Result<()> {
        match self.player.as_mut() {
            Some(player) => {
                player.start_idle();
                Ok(())
            }
            None => bail!("start_idle called before the rig finished loading"),
        }
    }

    pub fn start_wake_up(&mut self) -> Result<()> {
        match self.player.as_mut() {
            Some(player) => {
                player.start_wake_up();
                Ok(())
            }
            None => bail!("start_wake_up called before the rig finished loading"),
        }
    }

    pub fn touch_start(&mut self, button: TouchButton) {
        self.input.touch_start(button, &mut self.events);
    }

    pub fn touch_end(&mut self, button: TouchButton) {
        self.input.touch_end(button, &mut self.events);
    }

    pub fn push_input(&mut self, event: InputEvent) {
        if let InputEvent::Focus { focused } = &event {
            if let Some(player) = self.player.as_mut() {
                player.set_paused(!focused);
            }
        }
        self.input.push(event);
    }

    /// Feeds one display-frame delta: drains whole fixed steps, then updates
    /// the follow camera once from the latest rendered state.
    pub fn advance(&mut self, frame_delta: f32) {
        let steps = self.timestep.accumulate(frame_delta);
        for _ in 0..steps {
            self.fixed_step();
        }
        if let Some(player) = self.player.as_ref() {
            self.camera.follow(player.rendered_position(), frame_delta);
        }
    }

    fn fixed_step(&mut self) {
        let Some(player) = self.player.as_mut() else { return };
        let step = self.timestep.step;
        self.sim_time += f64::from(step);

        // Loop-wrap collaborator: runs before input sampling, using the input
        // that drove the character onto the bound in the previous step.
        if player.loop_track() {
            let (min_bound, max_bound) = player.bounds();
            if player.position_ref() == min_bound && player.move_input() < 0.0 {
                player.teleport(max_bound);
                self.camera.snap(player.rendered_position());
            } else if player.position_ref() == max_bound && player.move_input() > 0.0 {
                player.teleport(min_bound);
                self.camera.snap(player.rendered_position());
            }
        }

        player.apply_input(self.input.horizontal(), self.sim_time, &self.blinders, &mut self.events);
        player.update(step, &mut self.events);

        let hit = self.zones.evaluate(player.rendered_position().z);
        player.set_interaction_mode(hit.map(|h| h.focus).unwrap_or(false));
        self.zone_tracker.observe(hit, &mut self.events);
        self.stage_tracker.observe(&self.stages, player.position_ref(), &mut self.events);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(self.config.window.width, self.config.window.height));
        match event_loop.create_window(attributes) {
            Ok(window) => self.window = Some(window),
            Err(err) => {
                eprintln!("[window] Creation failed: {err}");
                self.should_close = true;
            }
        }
    }

    fn window_event(&mut self, _el: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.push_input(InputEvent::from_window_event(&event));
        match &event {
            WindowEvent::CloseRequested => self.should_close = true,
            WindowEvent::KeyboardInput { event: KeyEvent { logical_key, state, .. }, .. } => {
                if let Key::Named(NamedKey::Escape) = logical_key {
                    if *state == ElementState::Pressed {
                        self.should_close = true;
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_close {
            event_loop.exit();
            return;
        }
        self.time.tick();
        let delta = self.time.delta_seconds();
        self.advance(delta);
        for event in self.drain_events() {
            println!("[event] {event}");
        }
    }
}

pub fn run(cli: CliOverrides) -> Result<()> {
    let path = cli.config_path().unwrap_or(DEFAULT_CONFIG_PATH).to_string();
    let headless = cli.headless_seconds();
    let overrides = cli.into_config_overrides();
    let mut config = AppConfig::load_or_default(&path);
    config.apply_overrides(&overrides);

    if let Some(seconds) = headless {
        return run_headless(config, seconds);
    }

    let event_loop = EventLoop::new().context("Failed to create winit event loop")?;
    let mut app = App::new(config)?;
    if let Err(err) = app.load_rig() {
        eprintln!("[rig] {err:?}. Using the stub rig.");
        app.install_rig(CharacterRig::stub())?;
    }
    app.start_wake_up()?;
    event_loop.run_app(&mut app).context("Event loop execution failed")?;
    Ok(())
}

/// Deterministic scripted session without a window: wakes the character up,
/// walks right, pauses, walks left, and prints the event trace.
pub fn run_headless(config: AppConfig, seconds: f32) -> Result<()> {
    let step = config.sim.fixed_step;
    let mut app = App::new(config)?;
    if let Err(err) = app.load_rig() {
        eprintln!("[rig] {err:?}. Using the stub rig.");
        app.install_rig(CharacterRig::stub())?;
    }
    app.start_wake_up()?;

    let total_steps = (seconds / step).ceil() as u32;
    let key = |ch: &str, pressed: bool| InputEvent::Key { key: Key::Character(ch.into()), pressed };
    for i in 0..total_steps {
        let t = i as f32 * step;
        match () {
            _ if (t - seconds * 0.25).abs() < step / 2.0 => app.push_input(key("d", true)),
            _ if (t - seconds * 0.55).abs() < step / 2.0 => app.push_input(key("d", false)),
            _ if (t - seconds * 0.70).abs() < step / 2.0 => app.push_input(key("a", true)),
            _ if (t - seconds * 0.95).abs() < step / 2.0 => app.push_input(key("a", false)),
            _ => {}
        }
        app.advance(step);
        for event in app.drain_events() {
            println!("[{:7.3}s] {event}", app.sim_time());
        }
    }
    if let Some(player) = app.player() {
        println!(
            "[session] final position {:.2} (rendered {:.2}), pose {:?}",
            player.position_ref(),
            player.rendered_position().z,
            player.active_pose().map(|p| p.label())
        );
    }
    Ok(())
}
