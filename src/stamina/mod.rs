//! Stamina domain: tiredness derived from hours awake.
//!
//! Stamina is recomputed every frame from the clock as
//! `max - hours_awake * max / 17`, so it never drifts with frame rate and
//! needs no accumulator. Threshold effects (bedtime reminder, zero-stamina
//! penalty plus forced sleep) fire at most once per in-game day and are
//! pushed onto `StaminaEffects` for the engine to apply.

use bevy::prelude::*;

use crate::calendar::{Clock, WAKE_HOUR};
use crate::config::GameConfig;
use crate::engine::EngineSet;
use crate::shared::*;

/// A full bar lasts from 7 AM to midnight.
pub const HOURS_PER_FULL_BAR: f32 = 17.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaminaEffect {
    /// Bedtime reminder for the given day.
    Reminder { day: u32 },
    /// Stamina ran out; coins are docked once for the given day.
    Penalty { day: u32 },
    /// The player passed out and woke at 7 AM on `woke_on_day`. The engine
    /// plays the sleep fade and carries them home to bed.
    AutoSleep { woke_on_day: u32 },
}

/// Effects produced this frame, drained by the engine.
#[derive(Resource, Debug, Default)]
pub struct StaminaEffects(pub Vec<StaminaEffect>);

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct StaminaClock {
    pub current: f32,
    pub max: f32,
    /// Continuous hours since day 1 midnight at which the player last woke.
    pub last_sleep_time: f64,
    pub has_slept_today: bool,
    pub reminder_shown: bool,
    pub last_penalty_day: Option<u32>,
    pub last_reminder_day: Option<u32>,
    pub reminder_hour: u32,
}

impl Default for StaminaClock {
    fn default() -> Self {
        let config = GameConfig::default();
        Self::new(config.stamina_max, config.reminder_hour)
    }
}

impl StaminaClock {
    /// Fresh and rested, as if just woken on day 1 at 7 AM.
    pub fn new(max: f32, reminder_hour: u32) -> Self {
        Self {
            current: max,
            max,
            last_sleep_time: WAKE_HOUR as f64,
            has_slept_today: false,
            reminder_shown: false,
            last_penalty_day: None,
            last_reminder_day: None,
            reminder_hour,
        }
    }

    pub fn depletion_rate(&self) -> f32 {
        self.max / HOURS_PER_FULL_BAR
    }

    /// Day number the player last woke on.
    pub fn wake_day(&self) -> u32 {
        (self.last_sleep_time / 24.0).floor() as u32 + 1
    }

    pub fn stamina_at(&self, continuous_hours: f64) -> f32 {
        let hours_awake = (continuous_hours - self.last_sleep_time).max(0.0) as f32;
        (self.max - hours_awake * self.depletion_rate()).clamp(0.0, self.max)
    }

    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }

    /// Marks the player as heading to bed so reminders stop while the
    /// sleep transition plays.
    pub fn begin_sleep(&mut self) {
        self.has_slept_today = true;
    }

    pub fn update(&mut self, clock: &mut Clock, out: &mut Vec<StaminaEffect>) {
        let day = clock.day();

        if day > self.wake_day() {
            self.has_slept_today = false;
            self.reminder_shown = false;
        }

        self.current = self.stamina_at(clock.continuous_total_hours());

        if clock.hour() == self.reminder_hour
            && !self.has_slept_today
            && self.last_reminder_day != Some(day)
        {
            self.reminder_shown = true;
            self.last_reminder_day = Some(day);
            out.push(StaminaEffect::Reminder { day });
        }

        if self.current <= 0.0 && self.last_penalty_day != Some(day) {
            self.last_penalty_day = Some(day);
            out.push(StaminaEffect::Penalty { day });
            self.sleep(clock);
            // Counts as tonight's sleep, so no reminder later the same day.
            self.has_slept_today = true;
            out.push(StaminaEffect::AutoSleep {
                woke_on_day: clock.day(),
            });
        }
    }

    /// Warps to 7 AM and restores stamina. Sleeping before 7 AM wakes on
    /// the same day; sleeping at or after 7 AM wakes on the next one.
    pub fn sleep(&mut self, clock: &mut Clock) {
        let advance_day = clock.hour() >= WAKE_HOUR as u32;
        clock.set_time_to_hour(WAKE_HOUR, advance_day);
        self.last_sleep_time = clock.continuous_total_hours();
        self.current = self.max;
        self.has_slept_today = false;
        self.reminder_shown = false;
    }
}

pub struct StaminaPlugin;

impl Plugin for StaminaPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StaminaClock>()
            .init_resource::<StaminaEffects>()
            .add_systems(OnExit(GameState::Loading), start_stamina)
            .add_systems(
                Update,
                update_stamina
                    .in_set(EngineSet::Vitals)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

fn start_stamina(mut commands: Commands, config: Res<GameConfig>) {
    commands.insert_resource(StaminaClock::new(config.stamina_max, config.reminder_hour));
}

pub fn update_stamina(
    mut stamina: ResMut<StaminaClock>,
    mut clock: ResMut<Clock>,
    mut effects: ResMut<StaminaEffects>,
) {
    stamina.update(&mut clock, &mut effects.0);
}
