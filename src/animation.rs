use smallvec::SmallVec;

/// Logical pose names. The mapping from pose to clip index is per-rig
/// configuration resolved at load time, not hardcoded control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pose {
    Idle,
    Run,
    Greet,
    Choice,
    Show,
}

impl Pose {
    pub fn label(self) -> &'static str {
        match self {
            Pose::Idle => "idle",
            Pose::Run => "run",
            Pose::Greet => "greet",
            Pose::Choice => "choice",
            Pose::Show => "show",
        }
    }
}

/// A loaded animation clip. Only the timing metadata matters to the mixer;
/// the actual keyframe data stays with the rendering collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub name: String,
    pub duration: f32,
}

#[derive(Debug, Clone, Copy)]
struct Fade {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

#[derive(Debug, Clone)]
struct ClipPlayback {
    clip: Clip,
    time: f32,
    weight: f32,
    fade: Option<Fade>,
    playing: bool,
    loop_once: bool,
    clamp_when_finished: bool,
    finished: bool,
}

impl ClipPlayback {
    fn new(clip: Clip) -> Self {
        Self {
            clip,
            time: 0.0,
            weight: 0.0,
            fade: None,
            playing: false,
            loop_once: false,
            clamp_when_finished: false,
            finished: false,
        }
    }

    fn begin_fade(&mut self, from: f32, to: f32, duration: f32) {
        if duration <= 0.0 {
            self.weight = to;
            self.fade = None;
            if to <= 0.0 {
                self.playing = false;
            }
            return;
        }
        self.fade = Some(Fade { from, to, duration, elapsed: 0.0 });
    }
}

/// Cross-fading clip mixer. Exactly one clip is "active" (the one last asked
/// to play); during a transition both it and the fading-out clip advance
/// concurrently while their weights swap over the fade window.
#[derive(Debug)]
pub struct AnimationMixer {
    playbacks: Vec<ClipPlayback>,
    active: Option<usize>,
}

impl AnimationMixer {
    pub fn new(clips: Vec<Clip>) -> Self {
        Self { playbacks: clips.into_iter().map(ClipPlayback::new).collect(), active: None }
    }

    pub fn clip_count(&self) -> usize {
        self.playbacks.len()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn weight(&self, index: usize) -> f32 {
        self.playbacks.get(index).map(|p| p.weight).unwrap_or(0.0)
    }

    pub fn is_playing(&self, index: usize) -> bool {
        self.playbacks.get(index).map(|p| p.playing).unwrap_or(false)
    }

    pub fn clip(&self, index: usize) -> Option<&Clip> {
        self.playbacks.get(index).map(|p| &p.clip)
    }

    /// Marks a clip as one-shot; it stops at its last frame instead of
    /// wrapping, and optionally clamps there until faded out.
    pub fn set_loop_once(&mut self, index: usize, clamp_when_finished: bool) {
        if let Some(playback) = self.playbacks.get_mut(index) {
            playback.loop_once = true;
            playback.clamp_when_finished = clamp_when_finished;
        }
    }

    /// Cross-fades to the clip at `index` over `duration` seconds. Asking for
    /// the already-active clip is a no-op so a redundant request never
    /// restarts the fade.
    pub fn play(&mut self, index: usize, duration: f32) {
        if index >= self.playbacks.len() || self.active == Some(index) {
            return;
        }
        if let Some(previous) = self.active {
            let playback = &mut self.playbacks[previous];
            let from = playback.weight;
            playback.begin_fade(from, 0.0, duration);
        }
        let playback = &mut self.playbacks[index];
        playback.time = 0.0;
        playback.finished = false;
        playback.playing = true;
        playback.begin_fade(0.0, 1.0, duration);
        self.active = Some(index);
    }

    /// Advances all playing clips and returns the indices of one-shots that
    /// reached their end this step.
    pub fn update(&mut self, delta: f32) -> SmallVec<[usize; 2]> {
        let mut finished = SmallVec::new();
        for (index, playback) in self.playbacks.iter_mut().enumerate() {
            if !playback.playing {
                continue;
            }
            if let Some(mut fade) = playback.fade.take() {
                fade.elapsed += delta;
                let t = (fade.elapsed / fade.duration).min(1.0);
                playback.weight = fade.from + (fade.to - fade.from) * t;
                if t < 1.0 {
                    playback.fade = Some(fade);
                } else if fade.to <= 0.0 {
                    playback.playing = false;
                    playback.weight = 0.0;
                    continue;
                }
            }
            let duration = playback.clip.duration;
            if duration <= 0.0 {
                continue;
            }
            playback.time += delta;
            if playback.loop_once {
                if playback.time >= duration {
                    playback.time = duration;
                    if !playback.finished {
                        playback.finished = true;
                        finished.push(index);
                    }
                    if !playback.clamp_when_finished {
                        playback.playing = false;
                        playback.weight = 0.0;
                    }
                }
            } else {
                playback.time = playback.time.rem_euclid(duration);
            }
        }
        finished
    }
}
