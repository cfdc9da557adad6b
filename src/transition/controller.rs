use crate::{
    animation::ease::Ease,
    animation::tween::{TweenId, TweenScheduler, TweenSpec, TweenTarget, TweenValue},
    config::TransitionParams,
    foundation::core::{Rgb8, Vec3},
    foundation::error::{VoxgridError, VoxgridResult},
    grid::builder::Grid,
    scene::graph::SceneGraph,
};

/// Controller state: at most one transition is in flight at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No transition in flight; selections are accepted.
    Idle,
    /// A reveal/hide pair is running; further selections are rejected.
    Transitioning,
}

/// Result of an accepted [`TransitionController::select`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// A transition was scheduled.
    Started,
    /// The target was already current; nothing was scheduled.
    AlreadyCurrent,
}

/// Owns grid visibility after the build phase. Exactly one grid is current;
/// all others are parked (scale 0, offset out of view along z). A selection
/// swaps them with a staggered reveal/hide pair plus a background color tween,
/// and further selections are rejected until the hide phase lands — there is
/// no queueing and no cancellation.
#[derive(Debug)]
pub struct TransitionController {
    grids: Vec<Grid>,
    params: TransitionParams,
    current: String,
    previous: Option<String>,
    phase: Phase,
    pending_hide: Vec<TweenId>,
}

impl TransitionController {
    /// Mark `initial` current and park every other grid: scale forced to zero
    /// and z moved to the park offset, written directly (no animation).
    /// Rejects invalid transition params and unknown initial ids.
    pub fn new(
        grids: Vec<Grid>,
        initial: &str,
        params: TransitionParams,
        scene: &mut dyn SceneGraph,
    ) -> VoxgridResult<Self> {
        params.validate()?;
        if !grids.iter().any(|g| g.id == initial) {
            return Err(VoxgridError::selection(format!(
                "unknown initial grid id '{initial}'"
            )));
        }

        for grid in &grids {
            if grid.id == initial {
                continue;
            }
            for cell in &grid.cells {
                scene.set_scale(cell.node, Vec3::ZERO);
                let mut p = scene.position(cell.node);
                p.z = params.park_offset;
                scene.set_position(cell.node, p);
            }
        }

        let controller = Self {
            grids,
            params,
            current: initial.to_string(),
            previous: None,
            phase: Phase::Idle,
            pending_hide: Vec::new(),
        };
        scene.set_background(controller.color_for(initial));
        Ok(controller)
    }

    /// Id of the currently visible grid.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Id of the previously visible grid, once a transition has run.
    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    /// Current controller state.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while a transition is in flight.
    pub fn is_animating(&self) -> bool {
        self.phase == Phase::Transitioning
    }

    /// All registered grids, in registration order.
    pub fn grids(&self) -> &[Grid] {
        &self.grids
    }

    /// Look up a grid by id.
    pub fn grid(&self, id: &str) -> Option<&Grid> {
        self.grids.iter().find(|g| g.id == id)
    }

    /// Background color mapped to a grid id, or the fallback color.
    pub fn color_for(&self, id: &str) -> Rgb8 {
        self.params
            .colors
            .get(id)
            .copied()
            .unwrap_or(self.params.fallback_color)
    }

    /// Switch the visible grid. Rejected outright while a transition is in
    /// flight; selecting the current grid is a no-op; unknown ids leave state
    /// unchanged. A scheduling failure also leaves `current`/`previous`/phase
    /// untouched: state commits only after every tween has been accepted.
    pub fn select(
        &mut self,
        target: &str,
        scheduler: &mut dyn TweenScheduler,
    ) -> VoxgridResult<SelectOutcome> {
        if self.phase == Phase::Transitioning {
            tracing::warn!(%target, current = %self.current, "selection rejected: transition in flight");
            return Err(VoxgridError::busy(format!(
                "transition to '{}' still in flight",
                self.current
            )));
        }
        if target == self.current {
            return Ok(SelectOutcome::AlreadyCurrent);
        }
        if self.grid(target).is_none() {
            tracing::warn!(%target, "selection rejected: unknown grid id");
            return Err(VoxgridError::selection(format!(
                "unknown grid id '{target}'"
            )));
        }

        // schedule first, commit after
        let old = self.current.clone();
        self.schedule_background(target, scheduler)?;
        self.schedule_reveal(target, scheduler)?;
        let pending = self.schedule_hide(&old, scheduler)?;

        self.previous = Some(std::mem::replace(&mut self.current, target.to_string()));
        // with no hide phase to wait on, the transition completes immediately
        self.phase = if pending.is_empty() {
            Phase::Idle
        } else {
            Phase::Transitioning
        };
        self.pending_hide = pending;

        tracing::debug!(from = ?self.previous, to = %self.current, "transition started");
        Ok(SelectOutcome::Started)
    }

    /// Completion poll, called once per host frame. The transition ends when
    /// every hide-phase tween reports complete; reveal tweens may still be
    /// settling, matching the original interaction feel where the next
    /// selection unlocks as soon as the old grid is parked.
    pub fn tick(&mut self, scheduler: &dyn TweenScheduler) {
        if self.phase != Phase::Transitioning {
            return;
        }
        if self
            .pending_hide
            .iter()
            .all(|id| scheduler.is_complete(*id))
        {
            self.pending_hide.clear();
            self.phase = Phase::Idle;
            tracing::debug!(current = %self.current, "transition complete");
        }
    }

    fn schedule_background(
        &self,
        target: &str,
        scheduler: &mut dyn TweenScheduler,
    ) -> VoxgridResult<()> {
        scheduler.schedule(TweenSpec {
            target: TweenTarget::Background,
            to: TweenValue::Color(self.color_for(target)),
            delay: 0.0,
            duration: self.params.duration * self.params.background_frac,
            ease: Ease::OutCubic,
            snap_to: None,
        })?;
        Ok(())
    }

    fn schedule_reveal(
        &self,
        target: &str,
        scheduler: &mut dyn TweenScheduler,
    ) -> VoxgridResult<()> {
        let Some(grid) = self.grid(target) else {
            return Ok(()); // checked by select()
        };

        let base_delay = self.params.duration * self.params.reveal_delay_frac;
        for (i, cell) in grid.cells.iter().enumerate() {
            let delay = base_delay + i as f64 * self.params.stagger;
            scheduler.schedule(TweenSpec {
                target: TweenTarget::Scale(cell.node),
                to: TweenValue::Scalar(1.0),
                delay,
                duration: self.params.duration,
                ease: Ease::InOutQuart,
                snap_to: None,
            })?;
            scheduler.schedule(TweenSpec {
                target: TweenTarget::PositionZ(cell.node),
                to: TweenValue::Scalar(0.0),
                delay,
                duration: self.params.duration,
                ease: Ease::OutQuad,
                snap_to: None,
            })?;
        }
        Ok(())
    }

    fn schedule_hide(
        &self,
        old_id: &str,
        scheduler: &mut dyn TweenScheduler,
    ) -> VoxgridResult<Vec<TweenId>> {
        let Some(grid) = self.grid(old_id) else {
            return Ok(Vec::new());
        };

        let mut pending = Vec::with_capacity(grid.cells.len() * 2);
        for (i, cell) in grid.cells.iter().enumerate() {
            let delay = i as f64 * self.params.stagger;
            // terminal snaps park the cell exactly, free of interpolation drift
            pending.push(scheduler.schedule(TweenSpec {
                target: TweenTarget::Scale(cell.node),
                to: TweenValue::Scalar(0.0),
                delay,
                duration: self.params.duration,
                ease: Ease::InOutQuart,
                snap_to: Some(TweenValue::Scalar(0.0)),
            })?);
            pending.push(scheduler.schedule(TweenSpec {
                target: TweenTarget::PositionZ(cell.node),
                to: TweenValue::Scalar(self.params.exit_offset),
                delay,
                duration: self.params.duration,
                ease: Ease::OutQuad,
                snap_to: Some(TweenValue::Scalar(self.params.park_offset)),
            })?);
        }
        Ok(pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assets::source::VideoHandle,
        foundation::core::{GridDims, Transform3D},
        grid::builder::{Cell, Grid},
        scene::graph::{MemoryScene, SceneGraph},
    };
    use kurbo::Rect;
    use std::collections::HashSet;

    /// Records specs without driving them; tweens complete on demand.
    #[derive(Default)]
    struct FakeScheduler {
        specs: Vec<TweenSpec>,
        completed: HashSet<u64>,
        all_complete: bool,
    }

    impl TweenScheduler for FakeScheduler {
        fn schedule(&mut self, spec: TweenSpec) -> VoxgridResult<TweenId> {
            spec.validate()?;
            self.specs.push(spec);
            Ok(TweenId(self.specs.len() as u64 - 1))
        }

        fn is_complete(&self, id: TweenId) -> bool {
            self.all_complete || self.completed.contains(&id.0)
        }
    }

    /// Accepts a fixed number of tweens, then refuses the rest.
    struct SaturatingScheduler {
        capacity: usize,
        accepted: usize,
    }

    impl TweenScheduler for SaturatingScheduler {
        fn schedule(&mut self, _spec: TweenSpec) -> VoxgridResult<TweenId> {
            if self.accepted >= self.capacity {
                return Err(VoxgridError::validation("tween budget exhausted"));
            }
            self.accepted += 1;
            Ok(TweenId(self.accepted as u64))
        }

        fn is_complete(&self, _id: TweenId) -> bool {
            false
        }
    }

    fn tiny_grid(id: &str, scene: &mut MemoryScene, cell_count: usize) -> Grid {
        let cells = (0..cell_count)
            .map(|i| Cell {
                col: i as u32,
                row: 0,
                uv_rect: Rect::new(0.0, 0.0, 1.0, 1.0),
                node: scene.spawn(Transform3D::default()),
            })
            .collect();
        Grid {
            id: id.to_string(),
            dims: GridDims {
                width: cell_count as u32,
                height: 1,
            },
            cells,
            video: VideoHandle {
                source: format!("{id}.mp4"),
            },
        }
    }

    fn setup(ids: &[&str]) -> (MemoryScene, TransitionController) {
        let mut scene = MemoryScene::new();
        let grids = ids.iter().map(|id| tiny_grid(id, &mut scene, 3)).collect();
        let controller = TransitionController::new(
            grids,
            ids[0],
            TransitionParams::default(),
            &mut scene,
        )
        .unwrap();
        (scene, controller)
    }

    #[test]
    fn new_parks_everything_but_the_initial_grid() {
        let (scene, controller) = setup(&["heart", "codrops"]);

        for cell in &controller.grid("heart").unwrap().cells {
            assert_eq!(scene.scale(cell.node), Vec3::splat(1.0));
            assert_eq!(scene.position(cell.node).z, 0.0);
        }
        for cell in &controller.grid("codrops").unwrap().cells {
            assert_eq!(scene.scale(cell.node), Vec3::ZERO);
            assert_eq!(scene.position(cell.node).z, -6.0);
        }
        assert_eq!(scene.background(), Rgb8::new(0xe1, 0x98, 0x00));
    }

    #[test]
    fn new_rejects_unknown_initial_id() {
        let mut scene = MemoryScene::new();
        let grids = vec![tiny_grid("heart", &mut scene, 1)];
        let err = TransitionController::new(grids, "nope", TransitionParams::default(), &mut scene)
            .unwrap_err();
        assert!(matches!(err, VoxgridError::Selection(_)));
    }

    #[test]
    fn new_rejects_invalid_transition_params() {
        let mut scene = MemoryScene::new();
        let grids = vec![tiny_grid("heart", &mut scene, 1)];
        let params = TransitionParams {
            duration: 0.0,
            ..TransitionParams::default()
        };

        let err = TransitionController::new(grids, "heart", params, &mut scene).unwrap_err();
        assert!(matches!(err, VoxgridError::Validation(_)));
    }

    #[test]
    fn selecting_the_current_grid_is_a_no_op() {
        let (_scene, mut controller) = setup(&["heart", "codrops"]);
        let mut sched = FakeScheduler::default();

        let outcome = controller.select("heart", &mut sched).unwrap();
        assert_eq!(outcome, SelectOutcome::AlreadyCurrent);
        assert!(sched.specs.is_empty());
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[test]
    fn unknown_target_is_rejected_without_state_change() {
        let (_scene, mut controller) = setup(&["heart", "codrops"]);
        let mut sched = FakeScheduler::default();

        let err = controller.select("wat", &mut sched).unwrap_err();
        assert!(matches!(err, VoxgridError::Selection(_)));
        assert_eq!(controller.current(), "heart");
        assert!(sched.specs.is_empty());
    }

    #[test]
    fn selection_mid_transition_is_rejected() {
        let (_scene, mut controller) = setup(&["heart", "codrops", "smile"]);
        let mut sched = FakeScheduler::default();

        assert_eq!(
            controller.select("codrops", &mut sched).unwrap(),
            SelectOutcome::Started
        );
        assert!(controller.is_animating());

        let err = controller.select("smile", &mut sched).unwrap_err();
        assert!(matches!(err, VoxgridError::Busy(_)));
        assert_eq!(controller.current(), "codrops");
        assert_eq!(controller.previous(), Some("heart"));
    }

    #[test]
    fn scheduling_failure_leaves_selection_state_unchanged() {
        let (_scene, mut controller) = setup(&["heart", "codrops"]);

        // refuses every tween outright
        let mut refusing = SaturatingScheduler {
            capacity: 0,
            accepted: 0,
        };
        let err = controller.select("codrops", &mut refusing).unwrap_err();
        assert!(matches!(err, VoxgridError::Validation(_)));
        assert_eq!(controller.current(), "heart");
        assert_eq!(controller.previous(), None);
        assert_eq!(controller.phase(), Phase::Idle);

        // fails midway through the hide phase
        let mut partial = SaturatingScheduler {
            capacity: 9,
            accepted: 0,
        };
        let err = controller.select("codrops", &mut partial).unwrap_err();
        assert!(matches!(err, VoxgridError::Validation(_)));
        assert_eq!(controller.current(), "heart");
        assert_eq!(controller.previous(), None);
        assert_eq!(controller.phase(), Phase::Idle);

        // a working scheduler still gets a clean start afterwards
        let mut sched = FakeScheduler::default();
        assert_eq!(
            controller.select("codrops", &mut sched).unwrap(),
            SelectOutcome::Started
        );
        assert_eq!(controller.current(), "codrops");
    }

    #[test]
    fn schedules_reveal_hide_and_background() {
        let (_scene, mut controller) = setup(&["heart", "codrops"]);
        let mut sched = FakeScheduler::default();

        controller.select("codrops", &mut sched).unwrap();

        // 3 cells each: 2 tweens per reveal cell + 2 per hide cell + 1 background
        assert_eq!(sched.specs.len(), 13);
        let background: Vec<&TweenSpec> = sched
            .specs
            .iter()
            .filter(|s| s.target == TweenTarget::Background)
            .collect();
        assert_eq!(background.len(), 1);
        assert_eq!(
            background[0].to,
            TweenValue::Color(Rgb8::new(0x00, 0xa0, 0x0b))
        );
        assert!((background[0].duration - 0.8).abs() < 1e-12);

        // hide tweens start immediately; reveal waits a quarter of the duration
        let hide_delays: Vec<f64> = sched
            .specs
            .iter()
            .filter(|s| s.snap_to.is_some())
            .map(|s| s.delay)
            .collect();
        assert!((hide_delays[0] - 0.0).abs() < 1e-12);

        let reveal_scale: Vec<&TweenSpec> = sched
            .specs
            .iter()
            .filter(|s| s.snap_to.is_none() && s.to == TweenValue::Scalar(1.0))
            .collect();
        assert_eq!(reveal_scale.len(), 3);
        assert!((reveal_scale[0].delay - 0.25).abs() < 1e-12);
        assert!((reveal_scale[1].delay - 0.251).abs() < 1e-12);
    }

    #[test]
    fn tick_returns_to_idle_once_the_hide_phase_lands() {
        let (_scene, mut controller) = setup(&["heart", "codrops"]);
        let mut sched = FakeScheduler::default();

        controller.select("codrops", &mut sched).unwrap();
        controller.tick(&sched);
        assert!(controller.is_animating());

        sched.all_complete = true;
        controller.tick(&sched);
        assert_eq!(controller.phase(), Phase::Idle);

        // a new selection is accepted again
        assert_eq!(
            controller.select("heart", &mut sched).unwrap(),
            SelectOutcome::Started
        );
    }

    #[test]
    fn unmapped_grid_id_falls_back_to_the_default_color() {
        let (_scene, controller) = setup(&["heart", "mystery"]);
        assert_eq!(controller.color_for("mystery"), Rgb8::new(0x1a, 0x1a, 0x1a));
    }
}
