//! Identity-keyed reconciliation of bar visuals across frames.
//!
//! Country name is the stable key. On each new frame plan: keys that
//! disappeared are dropped immediately, new keys appear at their final
//! position, and surviving keys retarget their position/size tweens, which
//! run a fixed 500 ms cubic-in-out transition from wherever the bar
//! currently is. Flags are deliberately not handled here; they are redrawn
//! from target geometry every frame.

use hashbrown::HashMap;

use crate::dataset::Continent;
use crate::frame::FramePlan;

/// Duration of the update transition, in seconds.
pub const TRANSITION_SECS: f32 = 0.5;

fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// A single animated scalar.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    start: f32,
    target: f32,
    elapsed: f32,
}

impl Tween {
    /// Start at the final value with no animation.
    fn snap(v: f32) -> Self {
        Self {
            start: v,
            target: v,
            elapsed: TRANSITION_SECS,
        }
    }

    /// Begin a fresh transition toward `target` from the current value.
    /// Retargeting to the value already in flight is a no-op.
    fn retarget(&mut self, target: f32) {
        if (target - self.target).abs() < f32::EPSILON {
            return;
        }
        self.start = self.value();
        self.target = target;
        self.elapsed = 0.0;
    }

    fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt).min(TRANSITION_SECS);
    }

    pub fn value(&self) -> f32 {
        let t = (self.elapsed / TRANSITION_SECS).clamp(0.0, 1.0);
        self.start + (self.target - self.start) * ease_in_out_cubic(t)
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn in_flight(&self) -> bool {
        self.elapsed < TRANSITION_SECS
    }
}

/// On-screen state of one bar and the labels that ride it.
#[derive(Debug, Clone)]
pub struct BarVisual {
    pub y: Tween,
    pub width: Tween,
    pub height: Tween,
    /// Label text snaps; only geometry is tweened.
    pub population: u64,
    pub continent: Continent,
    pub flag: String,
    pub rank: usize,
}

/// The key -> visual map the renderer draws from.
#[derive(Debug, Default)]
pub struct BarReconciler {
    bars: HashMap<String, BarVisual>,
}

impl BarReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile against a new frame plan: exit, enter, retarget.
    pub fn apply(&mut self, plan: &FramePlan) {
        self.bars
            .retain(|name, _| plan.bars.iter().any(|b| &b.name == name));

        for bar in &plan.bars {
            match self.bars.get_mut(&bar.name) {
                Some(v) => {
                    v.y.retarget(bar.y);
                    v.width.retarget(bar.width);
                    v.height.retarget(bar.height);
                    v.population = bar.population;
                    v.continent = bar.continent;
                    v.rank = bar.rank;
                }
                None => {
                    self.bars.insert(
                        bar.name.clone(),
                        BarVisual {
                            y: Tween::snap(bar.y),
                            width: Tween::snap(bar.width),
                            height: Tween::snap(bar.height),
                            population: bar.population,
                            continent: bar.continent,
                            flag: bar.flag.clone(),
                            rank: bar.rank,
                        },
                    );
                }
            }
        }
    }

    /// Step all running transitions by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        for v in self.bars.values_mut() {
            v.y.advance(dt);
            v.width.advance(dt);
            v.height.advance(dt);
        }
    }

    /// Current visuals in rank order (draw order).
    pub fn visuals(&self) -> Vec<(&str, &BarVisual)> {
        let mut out: Vec<(&str, &BarVisual)> = self
            .bars
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        out.sort_by_key(|(_, v)| v.rank);
        out
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
