use crate::config::ZoneConfig;
use crate::events::{EventBus, GameEvent};

/// A registered interval along the walk track. The zone is occupied while the
/// character position lies strictly between the bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionZone {
    pub position: f32,
    pub half_width: f32,
    /// When set, the controller keeps tracking the facing target even at zero
    /// input so the character stays turned toward the interaction.
    pub focus: bool,
}

impl InteractionZone {
    pub fn lower_bound(&self) -> f32 {
        self.position - self.half_width
    }

    pub fn upper_bound(&self) -> f32 {
        self.position + self.half_width
    }

    pub fn contains(&self, position: f32) -> bool {
        position > self.lower_bound() && position < self.upper_bound()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneHit {
    pub index: usize,
    pub focus: bool,
}

/// Ordered zone registry. On overlap the first registered match wins, so
/// registration order is part of the contract.
#[derive(Debug, Default)]
pub struct ZoneSet {
    zones: Vec<InteractionZone>,
}

impl ZoneSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(configs: &[ZoneConfig]) -> Self {
        let mut set = Self::new();
        for cfg in configs {
            set.register(InteractionZone {
                position: cfg.position,
                half_width: cfg.half_width,
                focus: cfg.focus,
            });
        }
        set
    }

    pub fn register(&mut self, zone: InteractionZone) {
        self.zones.push(zone);
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn evaluate(&self, position: f32) -> Option<ZoneHit> {
        self.zones
            .iter()
            .position(|zone| zone.contains(position))
            .map(|index| ZoneHit { index, focus: self.zones[index].focus })
    }
}

/// Emits enter/exit events only when the active zone actually changes, so UI
/// consumers never see repeated firing while the character idles in place.
#[derive(Debug, Default)]
pub struct ZoneTracker {
    current: Option<usize>,
}

impl ZoneTracker {
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn observe(&mut self, hit: Option<ZoneHit>, events: &mut EventBus) {
        let next = hit.map(|h| h.index);
        if next == self.current {
            return;
        }
        if let Some(previous) = self.current {
            events.push(GameEvent::ZoneExited { index: previous });
        }
        if let Some(hit) = hit {
            events.push(GameEvent::ZoneEntered { index: hit.index, focus: hit.focus });
        }
        self.current = next;
    }
}

/// Stage-seam "blinder" intervals. While the character stands inside one, the
/// input-persistence window is skipped and zero input applies immediately, so
/// the character cannot hang mid-transition. The first and last entries are
/// open-ended toward the track extremities.
#[derive(Debug, Clone, Default)]
pub struct BlinderSet {
    positions: Vec<f32>,
    half_width: f32,
}

impl BlinderSet {
    pub fn new(positions: Vec<f32>, half_width: f32) -> Self {
        Self { positions, half_width }
    }

    pub fn contains(&self, position: f32) -> bool {
        let last = self.positions.len().saturating_sub(1);
        for (i, &center) in self.positions.iter().enumerate() {
            let matched = if i == 0 {
                position < center + self.half_width
            } else if i == last {
                position > center - self.half_width
            } else {
                position > center - self.half_width && position < center + self.half_width
            };
            if matched {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(position: f32, half_width: f32) -> InteractionZone {
        InteractionZone { position, half_width, focus: false }
    }

    #[test]
    fn bounds_are_strict() {
        let z = zone(0.0, 20.0);
        assert!(z.contains(19.9));
        assert!(!z.contains(20.0));
        assert!(!z.contains(-20.0));
    }

    #[test]
    fn first_registered_zone_wins_on_overlap() {
        let mut set = ZoneSet::new();
        set.register(zone(0.0, 50.0));
        set.register(zone(20.0, 50.0));
        let hit = set.evaluate(10.0).expect("inside both zones");
        assert_eq!(hit.index, 0);
    }

    #[test]
    fn blinder_ends_are_open() {
        let blinders = BlinderSet::new(vec![-200.0, 0.0, 200.0], 12.0);
        assert!(blinders.contains(-500.0));
        assert!(blinders.contains(500.0));
        assert!(blinders.contains(5.0));
        assert!(!blinders.contains(100.0));
    }
}
