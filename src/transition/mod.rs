//! Transition domain: fade to black, swap the world, fade back in.
//!
//! A transition runs for `duration` seconds. The overlay alpha rises from 0
//! to 1 over the first half and falls back over the second. Its action
//! fires exactly once, at the midpoint, while the screen is fully black.
//! Starting a new transition replaces the running one.

use bevy::prelude::*;

use crate::calendar::Clock;
use crate::engine::EngineSet;
use crate::stamina::StaminaClock;
use crate::shared::*;

/// What happens behind the black screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionAction {
    ChangeMap { to_map: MapId, spawn_tile: (i32, i32) },
    Sleep,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TransitionState {
    #[default]
    Idle,
    Fading {
        start: f64,
        duration: f64,
        midpoint_fired: bool,
        action: TransitionAction,
    },
}

#[derive(Resource, Debug, Clone, Default)]
pub struct SceneTransition {
    pub state: TransitionState,
}

impl SceneTransition {
    pub fn start(&mut self, now: f64, duration: f64, action: TransitionAction) {
        if self.is_active() {
            debug!("[Transition] Replacing running transition with {:?}", action);
        }
        self.state = TransitionState::Fading {
            start: now,
            duration,
            midpoint_fired: false,
            action,
        };
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, TransitionState::Fading { .. })
    }

    /// Advances to `now`. Returns the action on the one call that crosses
    /// the midpoint, and returns to Idle once the duration has passed.
    pub fn update(&mut self, now: f64) -> Option<TransitionAction> {
        let TransitionState::Fading {
            start,
            duration,
            midpoint_fired,
            action,
        } = &mut self.state
        else {
            return None;
        };

        let elapsed = now - *start;
        let mut fired = None;
        if !*midpoint_fired && elapsed >= *duration * 0.5 {
            *midpoint_fired = true;
            fired = Some(*action);
        }
        if elapsed >= *duration {
            self.state = TransitionState::Idle;
        }
        fired
    }

    /// Overlay opacity at `now`: a triangle peaking at the midpoint.
    pub fn alpha(&self, now: f64) -> f32 {
        match self.state {
            TransitionState::Idle => 0.0,
            TransitionState::Fading { start, duration, .. } => {
                if duration <= 0.0 {
                    return 0.0;
                }
                let t = ((now - start) / duration).clamp(0.0, 1.0) as f32;
                if t < 0.5 {
                    t * 2.0
                } else {
                    (1.0 - t) * 2.0
                }
            }
        }
    }
}

/// Run condition: gameplay input is ignored while the screen is fading.
pub fn transition_idle(transition: Res<SceneTransition>) -> bool {
    !transition.is_active()
}

pub struct TransitionPlugin;

impl Plugin for TransitionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneTransition>().add_systems(
            Update,
            advance_transition.in_set(EngineSet::Clock),
        );
    }
}

/// Fires midpoint actions. Map changes go out as MapTransitionEvent for the
/// world domain; sleep is applied right here.
pub fn advance_transition(
    time: Res<Time>,
    mut transition: ResMut<SceneTransition>,
    mut clock: ResMut<Clock>,
    mut stamina: ResMut<StaminaClock>,
    mut map_events: EventWriter<MapTransitionEvent>,
    mut toasts: EventWriter<ToastEvent>,
) {
    let Some(action) = transition.update(time.elapsed_secs_f64()) else {
        return;
    };

    match action {
        TransitionAction::ChangeMap { to_map, spawn_tile } => {
            info!("[Transition] Midpoint: {:?} at tile {:?}", to_map, spawn_tile);
            map_events.send(MapTransitionEvent { to_map, spawn_tile });
        }
        TransitionAction::Sleep => {
            stamina.sleep(&mut clock);
            info!("[Transition] Slept until Day {} {:02}:00", clock.day(), clock.hour());
            toasts.send(ToastEvent::new(format!("Good morning! Day {}", clock.day())));
        }
    }
}
