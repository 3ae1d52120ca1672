use crate::animation::{AnimationMixer, Pose};
use crate::config::{CharacterConfig, FacingSign, TrackConfig};
use crate::events::{EventBus, GameEvent};
use crate::rig::CharacterRig;
use crate::zone::BlinderSet;
use anyhow::{bail, Result};
use glam::Vec3;

fn damp(current: f32, target: f32, rate: f32, delta: f32) -> f32 {
    current + (target - current) * (rate * delta).min(1.0)
}

/// Locomotion and pose controller for one character on a bounded 1D track.
///
/// `position_ref` is the authoritative integrated position, always kept
/// inside `[min_bound, max_bound]`. The rendered transform follows it through
/// frame-rate-independent exponential smoothing. Construction happens only
/// after the rig's clips finish loading; nothing here may run before that.
pub struct CharacterController {
    mixer: AnimationMixer,
    rig: CharacterRig,

    position_ref: f32,
    rendered_position: Vec3,
    rendered_rotation: f32,
    move_input: f32,

    min_bound: f32,
    max_bound: f32,
    loop_track: bool,

    interaction_mode: bool,
    paused: bool,
    take_inputs: bool,

    input_started: bool,
    intro_finished: bool,
    last_input_start: f64,

    run_latch: bool,

    run_speed: f32,
    rotation_lerp: f32,
    position_lerp: f32,
    transition: f32,
    input_persistence: f32,
    facing: FacingSign,
}

impl CharacterController {
    pub fn new(rig: CharacterRig, character: &CharacterConfig, track: &TrackConfig) -> Result<Self> {
        if track.min_bound > track.max_bound {
            bail!(
                "Track bounds are inverted: min {} > max {}",
                track.min_bound,
                track.max_bound
            );
        }
        if character.position_lerp <= 0.0 || character.rotation_lerp <= 0.0 {
            bail!("Smoothing rates must be positive");
        }
        if character.transition < 0.0 || character.input_persistence < 0.0 {
            bail!("Transition and input persistence must not be negative");
        }
        rig.poses.resolve(&rig.clips)?;

        let start = track.start_position.clamp(track.min_bound, track.max_bound);
        let mixer = AnimationMixer::new(rig.clips.clone());
        Ok(Self {
            mixer,
            rig,
            position_ref: start,
            rendered_position: Vec3::new(0.0, 0.0, start),
            rendered_rotation: character.facing.target_angle(0.0),
            move_input: 0.0,
            min_bound: track.min_bound,
            max_bound: track.max_bound,
            loop_track: track.loop_track,
            interaction_mode: false,
            paused: false,
            take_inputs: true,
            input_started: false,
            intro_finished: false,
            last_input_start: 0.0,
            run_latch: false,
            run_speed: character.run_speed,
            rotation_lerp: character.rotation_lerp,
            position_lerp: character.position_lerp,
            transition: character.transition,
            input_persistence: character.input_persistence,
            facing: character.facing,
        })
    }

    pub fn position_ref(&self) -> f32 {
        self.position_ref
    }

    pub fn rendered_position(&self) -> Vec3 {
        self.rendered_position
    }

    pub fn rendered_rotation(&self) -> f32 {
        self.rendered_rotation
    }

    pub fn move_input(&self) -> f32 {
        self.move_input
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.min_bound, self.max_bound)
    }

    pub fn loop_track(&self) -> bool {
        self.loop_track
    }

    pub fn interaction_mode(&self) -> bool {
        self.interaction_mode
    }

    pub fn set_interaction_mode(&mut self, enabled: bool) {
        self.interaction_mode = enabled;
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Pause freezes both position and rotation integration; the animation
    /// mixer keeps running. Focus regain resumes exactly where it stopped.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn takes_inputs(&self) -> bool {
        self.take_inputs
    }

    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    pub fn active_pose(&self) -> Option<Pose> {
        self.mixer.active().and_then(|index| self.rig.poses.pose_of(index))
    }

    /// Begin with the looping idle clip; the entry point for sessions that
    /// skip the wake-up intro.
    pub fn start_idle(&mut self) {
        self.intro_finished = true;
        self.play_pose(Pose::Idle, 0.0);
    }

    /// Plays the non-interruptible wake-up one-shot. Inputs stay disabled
    /// until the clip finishes, at which point the controller fades into the
    /// choice pose and re-enables them.
    pub fn start_wake_up(&mut self) {
        self.take_inputs = false;
        let greet = self.rig.poses.clip_index(Pose::Greet);
        let show = self.rig.poses.clip_index(Pose::Show);
        self.mixer.set_loop_once(greet, true);
        self.mixer.set_loop_once(show, true);
        self.play_pose(Pose::Greet, 0.0);
    }

    fn play_pose(&mut self, pose: Pose, duration: f32) {
        self.mixer.play(self.rig.poses.clip_index(pose), duration);
    }

    /// Accepts the sampled axis for this fixed step. Non-zero input applies
    /// immediately; zero input is held back for the persistence window so a
    /// brief release at a zone boundary cannot flicker the active zone --
    /// unless the character stands inside a blinder, where zero applies at
    /// once so a stage transition cannot stall.
    pub fn apply_input(&mut self, axis: f32, now: f64, blinders: &BlinderSet, events: &mut EventBus) {
        if !self.take_inputs {
            self.move_input = 0.0;
            return;
        }
        if axis != 0.0 {
            if !self.intro_finished {
                self.intro_finished = true;
                events.push(GameEvent::IntroAdvanced { phase: 3 });
            }
            if !self.input_started {
                self.input_started = true;
                self.last_input_start = now;
            }
            self.move_input = axis;
        } else {
            self.input_started = false;
            let persistence_over = now > self.last_input_start + f64::from(self.input_persistence);
            if persistence_over || blinders.contains(self.rendered_position.z) {
                self.move_input = axis;
            }
        }
    }

    /// Advances one fixed step: integrates position and rotation, then drives
    /// the animation layer off the resulting motion state.
    pub fn update(&mut self, delta: f32, events: &mut EventBus) {
        self.movement(delta);
        self.animate(delta, events);
    }

    fn movement(&mut self, delta: f32) {
        if self.paused {
            return;
        }
        self.position_ref += self.run_speed * self.move_input * delta;
        self.position_ref = self.position_ref.clamp(self.min_bound, self.max_bound);
        self.rendered_position.z =
            damp(self.rendered_position.z, self.position_ref, self.position_lerp, delta);

        // While not in interaction mode the character keeps its last facing
        // at zero input instead of turning back through a default angle.
        if self.interaction_mode || self.move_input != 0.0 {
            let target = self.facing.target_angle(self.move_input);
            self.rendered_rotation = damp(self.rendered_rotation, target, self.rotation_lerp, delta);
        }
    }

    fn animate(&mut self, delta: f32, events: &mut EventBus) {
        let finished = self.mixer.update(delta);
        for index in finished {
            let Some(pose) = self.rig.poses.pose_of(index) else { continue };
            events.push(GameEvent::AnimationFinished { pose });
            if pose == Pose::Greet {
                self.play_pose(Pose::Choice, 0.2);
                self.take_inputs = true;
                events.push(GameEvent::IntroAdvanced { phase: 2 });
            }
        }

        // Near the track extremities the run pose is gated off even though
        // position is still clamped, so the character does not appear to run
        // against an invisible wall. Loop tracks have no walls to hit.
        let inside_bounds = self.loop_track
            || (self.position_ref > self.min_bound && self.position_ref < self.max_bound);
        if self.move_input.abs() > 0.0 && inside_bounds {
            if !self.run_latch {
                self.run_latch = true;
                self.play_pose(Pose::Run, self.transition);
            }
        } else if self.run_latch {
            self.run_latch = false;
            self.play_pose(Pose::Idle, self.transition);
        }
    }

    /// Teleport entry point for the external loop-wrap collaborator: both the
    /// authoritative and the rendered position move in the same step so no
    /// frame ever observes an out-of-range value.
    pub fn teleport(&mut self, position: f32) {
        self.position_ref = position.clamp(self.min_bound, self.max_bound);
        self.rendered_position.z = self.position_ref;
    }
}
