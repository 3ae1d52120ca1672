use crate::animation::{Clip, Pose};
use anyhow::{bail, Context, Result};
use gltf::Gltf;
use serde::Deserialize;
use std::path::Path;

/// Per-rig mapping from logical pose names to animation-clip indices.
/// Characters ship with different clip layouts, so the indices are
/// configuration resolved once at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PoseMap {
    #[serde(default = "PoseMap::default_idle")]
    pub idle: usize,
    #[serde(default = "PoseMap::default_run")]
    pub run: usize,
    #[serde(default = "PoseMap::default_greet")]
    pub greet: usize,
    #[serde(default = "PoseMap::default_choice")]
    pub choice: usize,
    #[serde(default = "PoseMap::default_show")]
    pub show: usize,
}

impl PoseMap {
    const fn default_idle() -> usize {
        1
    }
    const fn default_run() -> usize {
        2
    }
    const fn default_greet() -> usize {
        3
    }
    const fn default_choice() -> usize {
        4
    }
    const fn default_show() -> usize {
        5
    }

    pub fn clip_index(&self, pose: Pose) -> usize {
        match pose {
            Pose::Idle => self.idle,
            Pose::Run => self.run,
            Pose::Greet => self.greet,
            Pose::Choice => self.choice,
            Pose::Show => self.show,
        }
    }

    pub fn pose_of(&self, clip_index: usize) -> Option<Pose> {
        [Pose::Idle, Pose::Run, Pose::Greet, Pose::Choice, Pose::Show]
            .into_iter()
            .find(|&pose| self.clip_index(pose) == clip_index)
    }

    /// Validates every mapped index against the loaded clip list. A rig with
    /// fewer clips than the map expects is a fatal asset-contract violation.
    pub fn resolve(&self, clips: &[Clip]) -> Result<()> {
        for pose in [Pose::Idle, Pose::Run, Pose::Greet, Pose::Choice, Pose::Show] {
            let index = self.clip_index(pose);
            if index >= clips.len() {
                bail!(
                    "Rig provides {} animation clips but pose '{}' maps to clip index {}",
                    clips.len(),
                    pose.label(),
                    index
                );
            }
        }
        Ok(())
    }
}

impl Default for PoseMap {
    fn default() -> Self {
        Self {
            idle: Self::default_idle(),
            run: Self::default_run(),
            greet: Self::default_greet(),
            choice: Self::default_choice(),
            show: Self::default_show(),
        }
    }
}

/// A loaded character rig: the clip list plus the resolved pose map. The
/// mesh, materials and keyframe buffers stay with the rendering collaborator;
/// the controller only needs clip timing.
#[derive(Debug, Clone)]
pub struct CharacterRig {
    pub clips: Vec<Clip>,
    pub poses: PoseMap,
}

impl CharacterRig {
    pub fn new(clips: Vec<Clip>, poses: PoseMap) -> Result<Self> {
        poses.resolve(&clips)?;
        Ok(Self { clips, poses })
    }

    /// Reads clip names and durations out of a glTF document. Buffers are not
    /// loaded; durations come from the sampler input accessors' max values.
    pub fn load(path: impl AsRef<Path>, poses: PoseMap) -> Result<Self> {
        let path = path.as_ref();
        let document = Gltf::open(path)
            .with_context(|| format!("Failed to open rig file {}", path.display()))?;
        let mut clips = Vec::new();
        for animation in document.animations() {
            let mut duration = 0.0f32;
            for channel in animation.channels() {
                let input = channel.sampler().input();
                if let Some(max) = input.max() {
                    if let Some(value) = max.as_array().and_then(|v| v.first()).and_then(|v| v.as_f64())
                    {
                        duration = duration.max(value as f32);
                    }
                }
            }
            let name = animation
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("clip_{}", clips.len()));
            clips.push(Clip { name, duration });
        }
        if clips.is_empty() {
            bail!("Rig file {} contains no animation clips", path.display());
        }
        Self::new(clips, poses)
    }

    /// Synthetic rig for headless sessions and tests; clip layout matches the
    /// default pose map (index 0 is an unused T-pose slot).
    pub fn stub() -> Self {
        let names = ["tpose", "idle", "run", "greet", "choice", "show"];
        let clips = names
            .iter()
            .map(|name| Clip { name: name.to_string(), duration: if *name == "greet" { 2.4 } else { 1.0 } })
            .collect();
        Self { clips, poses: PoseMap::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_clip_list_is_rejected() {
        let clips = vec![
            Clip { name: "idle".to_string(), duration: 1.0 },
            Clip { name: "run".to_string(), duration: 1.0 },
        ];
        let err = CharacterRig::new(clips, PoseMap::default()).unwrap_err();
        assert!(err.to_string().contains("clip index"));
    }

    #[test]
    fn pose_map_round_trips_indices() {
        let poses = PoseMap::default();
        assert_eq!(poses.pose_of(poses.clip_index(Pose::Greet)), Some(Pose::Greet));
        assert_eq!(poses.pose_of(99), None);
    }
}
