use crate::{
    animation::ease::Ease,
    foundation::core::{Rgb8, Vec3},
    foundation::error::{VoxgridError, VoxgridResult},
    scene::graph::{NodeId, SceneGraph},
};

/// Handle for a scheduled tween, minted by a [`TweenScheduler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TweenId(pub u64);

/// Animatable property. Node scale is uniform across all three axes; the
/// background color is a single scene-wide channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TweenTarget {
    /// Uniform scale of one node.
    Scale(NodeId),
    /// z component of one node's position.
    PositionZ(NodeId),
    /// Scene-wide background color.
    Background,
}

/// A value a tween interpolates toward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TweenValue {
    /// Scalar property value.
    Scalar(f64),
    /// Color property value.
    Color(Rgb8),
}

impl TweenValue {
    fn kind_matches(self, other: TweenValue) -> bool {
        matches!(
            (self, other),
            (TweenValue::Scalar(_), TweenValue::Scalar(_))
                | (TweenValue::Color(_), TweenValue::Color(_))
        )
    }
}

/// One scheduled property animation. The start value is not part of the spec:
/// schedulers capture it from the scene when the delay elapses, so a tween
/// always departs from wherever the property currently is.
///
/// `snap_to` is written once on completion, after the final interpolated
/// value. It makes terminal states exact (a parked cell is scale 0 at z =
/// park offset, not an interpolation-rounded approximation) and lets the hide
/// phase animate toward one z and rest at another.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenSpec {
    /// Property being animated.
    pub target: TweenTarget,
    /// Destination value.
    pub to: TweenValue,
    /// Seconds before the tween activates.
    pub delay: f64,
    /// Seconds from activation to completion.
    pub duration: f64,
    /// Easing curve applied to normalized progress.
    pub ease: Ease,
    /// Value written once on completion, after the final interpolated write.
    pub snap_to: Option<TweenValue>,
}

impl TweenSpec {
    /// Check timing bounds and that value kinds match the target.
    pub fn validate(&self) -> VoxgridResult<()> {
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(VoxgridError::validation("tween duration must be > 0"));
        }
        if !(self.delay.is_finite() && self.delay >= 0.0) {
            return Err(VoxgridError::validation("tween delay must be >= 0"));
        }

        let wants_color = matches!(self.target, TweenTarget::Background);
        let is_color = matches!(self.to, TweenValue::Color(_));
        if wants_color != is_color {
            return Err(VoxgridError::validation(
                "tween value kind does not match its target",
            ));
        }
        if let Some(snap) = self.snap_to
            && !snap.kind_matches(self.to)
        {
            return Err(VoxgridError::validation(
                "tween snap_to kind does not match its destination",
            ));
        }
        Ok(())
    }
}

/// Injected animation capability. The transition controller only ever
/// schedules tweens and polls their completion; what drives them (a real
/// engine's timeline, or [`FrameScheduler`] in tests) is the host's choice.
pub trait TweenScheduler {
    /// Accept a tween for execution, or reject it without side effects.
    fn schedule(&mut self, spec: TweenSpec) -> VoxgridResult<TweenId>;

    /// True once the tween has run to completion (or was never known —
    /// finished tweens may be discarded by the scheduler).
    fn is_complete(&self, id: TweenId) -> bool;
}

/// Deterministic single-threaded scheduler stepping on an explicit frame
/// clock. [`advance`](Self::advance) moves the clock by `dt` seconds and
/// writes eased property values straight into the scene.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    clock: f64,
    next_id: u64,
    tweens: Vec<ActiveTween>,
}

#[derive(Debug)]
struct ActiveTween {
    id: TweenId,
    spec: TweenSpec,
    start: f64,
    from: Option<TweenValue>, // captured at activation
    done: bool,
}

impl FrameScheduler {
    /// Empty scheduler with the clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds advanced so far.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// True when no scheduled tween is pending or running.
    pub fn is_idle(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Step the clock by `dt` seconds and write eased values into the scene.
    /// A tween's start value is captured from the scene when its delay
    /// elapses; completed tweens apply their snap and are pruned.
    pub fn advance(&mut self, scene: &mut dyn SceneGraph, dt: f64) {
        self.clock += dt;
        let clock = self.clock;

        for tw in &mut self.tweens {
            if tw.done || clock < tw.start {
                continue;
            }

            let from = match tw.from {
                Some(v) => v,
                None => {
                    let v = read_value(scene, tw.spec.target);
                    tw.from = Some(v);
                    v
                }
            };

            let t = ((clock - tw.start) / tw.spec.duration).clamp(0.0, 1.0);
            let value = lerp_value(from, tw.spec.to, tw.spec.ease.apply(t));
            write_value(scene, tw.spec.target, value);

            if t >= 1.0 {
                if let Some(snap) = tw.spec.snap_to {
                    write_value(scene, tw.spec.target, snap);
                }
                tw.done = true;
            }
        }

        self.tweens.retain(|tw| !tw.done);
    }
}

impl TweenScheduler for FrameScheduler {
    fn schedule(&mut self, spec: TweenSpec) -> VoxgridResult<TweenId> {
        spec.validate()?;
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tweens.push(ActiveTween {
            id,
            spec,
            start: self.clock + spec.delay,
            from: None,
            done: false,
        });
        Ok(id)
    }

    fn is_complete(&self, id: TweenId) -> bool {
        // completed tweens are pruned in advance(); absent means done
        !self.tweens.iter().any(|tw| tw.id == id)
    }
}

fn read_value(scene: &dyn SceneGraph, target: TweenTarget) -> TweenValue {
    match target {
        TweenTarget::Scale(node) => TweenValue::Scalar(scene.scale(node).x),
        TweenTarget::PositionZ(node) => TweenValue::Scalar(scene.position(node).z),
        TweenTarget::Background => TweenValue::Color(scene.background()),
    }
}

fn write_value(scene: &mut dyn SceneGraph, target: TweenTarget, value: TweenValue) {
    match (target, value) {
        (TweenTarget::Scale(node), TweenValue::Scalar(v)) => {
            scene.set_scale(node, Vec3::splat(v));
        }
        (TweenTarget::PositionZ(node), TweenValue::Scalar(v)) => {
            let mut p = scene.position(node);
            p.z = v;
            scene.set_position(node, p);
        }
        (TweenTarget::Background, TweenValue::Color(c)) => scene.set_background(c),
        // kind mismatches are rejected at schedule time
        _ => {}
    }
}

fn lerp_value(from: TweenValue, to: TweenValue, t: f64) -> TweenValue {
    match (from, to) {
        (TweenValue::Scalar(a), TweenValue::Scalar(b)) => TweenValue::Scalar(a + (b - a) * t),
        (TweenValue::Color(a), TweenValue::Color(b)) => TweenValue::Color(Rgb8::lerp(a, b, t)),
        (_, to) => to,
    }
}
