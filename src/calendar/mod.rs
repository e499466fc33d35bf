//! Calendar domain: the heartbeat of Tillfield.
//!
//! Responsible for:
//! - Owning the session `Clock` (day, seconds into day, season, weather)
//! - Advancing it by the frame delta while Playing
//! - Keeping `PlayTime`, the seconds of play that growth timers run on
//! - Announcing new days and seasons (DayStartedEvent, SeasonChangeEvent)
//! - Rolling each new day's weather
//!
//! Rollover sets `seconds_into_day` to zero rather than carrying the
//! remainder into the new day. A long frame therefore loses the overflow.

use bevy::prelude::*;
use rand::Rng;

use crate::config::GameConfig;
use crate::engine::EngineSet;
use crate::shared::*;

/// Hour the player wakes up at, both at session start and after sleeping.
pub const WAKE_HOUR: f32 = 7.0;

/// Snapshot handed to clock listeners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeState {
    pub day: u32,
    pub seconds_into_day: f32,
    pub day_duration_seconds: f32,
    pub season_index: u32,
    pub weather: Weather,
}

impl TimeState {
    pub fn hour(&self) -> u32 {
        (self.fractional_hour().floor() as u32).min(23)
    }

    pub fn fractional_hour(&self) -> f32 {
        self.seconds_into_day * 24.0 / self.day_duration_seconds
    }

    /// Hours since day 1 at midnight.
    pub fn continuous_total_hours(&self) -> f64 {
        (self.day as f64 - 1.0) * 24.0 + self.fractional_hour() as f64
    }
}

pub type ClockListener = Box<dyn FnMut(&TimeState) + Send + Sync>;

/// In-game time. Every mutator notifies the registered listeners with a
/// copy of the new state.
#[derive(Resource)]
pub struct Clock {
    state: TimeState,
    listeners: Vec<ClockListener>,
}

impl std::fmt::Debug for Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clock")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(GameConfig::default().day_duration_seconds)
    }
}

impl Clock {
    /// Day 1 at midnight, clear skies.
    pub fn new(day_duration_seconds: f32) -> Self {
        Self {
            state: TimeState {
                day: 1,
                seconds_into_day: 0.0,
                day_duration_seconds,
                season_index: 0,
                weather: Weather::Clear,
            },
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&TimeState) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn state(&self) -> TimeState {
        self.state
    }

    pub fn day(&self) -> u32 {
        self.state.day
    }

    pub fn seconds_into_day(&self) -> f32 {
        self.state.seconds_into_day
    }

    pub fn season_index(&self) -> u32 {
        self.state.season_index
    }

    pub fn weather(&self) -> Weather {
        self.state.weather
    }

    pub fn hour(&self) -> u32 {
        self.state.hour()
    }

    pub fn continuous_total_hours(&self) -> f64 {
        self.state.continuous_total_hours()
    }

    /// Brightness of the sky, 0.0 at midnight and 1.0 at noon.
    pub fn daylight(&self) -> f32 {
        let h = self.state.fractional_hour();
        (1.0 - ((h - 12.0).abs() / 12.0)).clamp(0.0, 1.0)
    }

    pub fn update_time(&mut self, delta_seconds: f32) {
        self.state.seconds_into_day += delta_seconds;
        if self.state.seconds_into_day >= self.state.day_duration_seconds {
            self.state.day += 1;
            self.state.seconds_into_day = 0.0;
            self.recompute_season();
        }
        self.notify();
    }

    pub fn set_time_to_hour(&mut self, hour: f32, advance_day: bool) {
        if advance_day {
            self.state.day += 1;
            self.recompute_season();
        }
        self.state.seconds_into_day = hour * self.state.day_duration_seconds / 24.0;
        self.notify();
    }

    pub fn set_weather(&mut self, weather: Weather) {
        self.state.weather = weather;
        self.notify();
    }

    /// Test and debug hook: jump straight to a day and time.
    pub fn set_day_and_seconds(&mut self, day: u32, seconds_into_day: f32) {
        self.state.day = day.max(1);
        self.state.seconds_into_day = seconds_into_day;
        self.recompute_season();
        self.notify();
    }

    fn recompute_season(&mut self) {
        self.state.season_index = ((self.state.day - 1) / DAYS_PER_SEASON) % SEASON_COUNT;
    }

    fn notify(&mut self) {
        let snapshot = self.state;
        for listener in self.listeners.iter_mut() {
            listener(&snapshot);
        }
    }
}

/// Seconds of play since the session started. Only advances while Playing,
/// so it stands still with the clock whenever the shop is open.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayTime {
    elapsed: f64,
}

impl PlayTime {
    pub fn advance(&mut self, delta_seconds: f64) {
        self.elapsed += delta_seconds.max(0.0);
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed
    }
}

pub struct CalendarPlugin;

impl Plugin for CalendarPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Clock>()
            .init_resource::<PlayTime>()
            .add_systems(OnExit(GameState::Loading), start_clock)
            .add_systems(
                Update,
                tick_clock
                    .in_set(EngineSet::Clock)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                Update,
                (announce_new_day, roll_daily_weather)
                    .chain()
                    .in_set(EngineSet::Growth),
            );
    }
}

// ─── Session start ────────────────────────────────────────────────────────────

fn start_clock(mut commands: Commands, config: Res<GameConfig>) {
    let mut clock = Clock::new(config.day_duration_seconds);
    clock.set_time_to_hour(WAKE_HOUR, false);

    let mut last_hour = clock.hour();
    clock.subscribe(move |t: &TimeState| {
        let hour = t.hour();
        if hour != last_hour {
            last_hour = hour;
            debug!("[Calendar] {:02}:00 Day {} {}", hour, t.day, season_name(t.season_index));
        }
    });

    info!(
        "[Calendar] Session start: Day {} {} {:02}:00, {}s per day",
        clock.day(),
        season_name(clock.season_index()),
        clock.hour(),
        config.day_duration_seconds
    );
    commands.insert_resource(clock);
    commands.insert_resource(PlayTime::default());
}

// ─── Main time-tick system ────────────────────────────────────────────────────

fn tick_clock(time: Res<Time>, mut clock: ResMut<Clock>, mut play_time: ResMut<PlayTime>) {
    clock.update_time(time.delta_secs());
    play_time.advance(time.delta_secs_f64());
}

/// Emits DayStartedEvent (and SeasonChangeEvent when the season index moved)
/// whenever the day number differs from the last frame, whether it advanced
/// by rollover or by sleeping.
fn announce_new_day(
    clock: Res<Clock>,
    mut last_seen: Local<Option<(u32, u32)>>,
    mut day_writer: EventWriter<DayStartedEvent>,
    mut season_writer: EventWriter<SeasonChangeEvent>,
) {
    let current = (clock.day(), clock.season_index());
    let Some((last_day, last_season)) = *last_seen else {
        *last_seen = Some(current);
        return;
    };
    if current.0 == last_day {
        return;
    }
    *last_seen = Some(current);

    info!("[Calendar] New day: Day {} {}", current.0, season_name(current.1));
    day_writer.send(DayStartedEvent {
        day: current.0,
        season_index: current.1,
    });

    if current.1 != last_season {
        info!(
            "[Calendar] Season changed: {} -> {}",
            season_name(last_season),
            season_name(current.1)
        );
        season_writer.send(SeasonChangeEvent {
            season_index: current.1,
        });
    }
}

fn roll_daily_weather(mut events: EventReader<DayStartedEvent>, mut clock: ResMut<Clock>) {
    let mut rng = rand::thread_rng();
    for event in events.read() {
        let weather = roll_weather(event.season_index, rng.gen());
        clock.set_weather(weather);
        info!("[Calendar] Day {} weather: {}", event.day, weather.label());
    }
}

// ─── Weather rolling ──────────────────────────────────────────────────────────

/// Maps a uniform roll in `0.0..1.0` to weather with per-season weights.
///
/// Spring:  55% Clear, 30% Cloud, 15% Storm
/// Summer:  70% Clear, 20% Cloud, 10% Storm
/// Fall:    45% Clear, 35% Cloud, 20% Storm
/// Winter:  50% Clear, 40% Cloud, 10% Storm
pub fn roll_weather(season_index: u32, roll: f32) -> Weather {
    let (clear, cloud) = match season_index % SEASON_COUNT {
        0 => (0.55, 0.85),
        1 => (0.70, 0.90),
        2 => (0.45, 0.80),
        _ => (0.50, 0.90),
    };
    if roll < clear {
        Weather::Clear
    } else if roll < cloud {
        Weather::Cloud
    } else {
        Weather::Storm
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
