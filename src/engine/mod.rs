//! Engine: wires every domain into one per-frame pipeline.
//!
//! Input is sampled in `PreUpdate`. `Update` then runs the sets below in
//! order, so each frame reads: move, tick time, apply stamina, grow, act on
//! key presses, publish the render snapshot. Movement and key actions are
//! skipped while a scene transition is fading.

use bevy::prelude::*;

use crate::config::{ConfigPlugin, GameConfig};
use crate::shared::*;
use crate::stamina::{StaminaEffect, StaminaEffects};
use crate::transition::{transition_idle, SceneTransition, TransitionAction};

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineSet {
    Movement,
    Clock,
    Vitals,
    Growth,
    Interaction,
    Handoff,
}

pub struct EnginePlugin;

impl Plugin for EnginePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>();

        // Shared resources
        app.init_resource::<CollisionRects>()
            .init_resource::<InteractionZones>()
            .init_resource::<WorldBounds>()
            .init_resource::<ActiveMap>();

        // Events
        app.add_event::<DayStartedEvent>()
            .add_event::<SeasonChangeEvent>()
            .add_event::<GoldChangeEvent>()
            .add_event::<ToastEvent>()
            .add_event::<MapTransitionEvent>()
            .add_event::<CropHarvestedEvent>();

        app.configure_sets(
            Update,
            (
                EngineSet::Movement.run_if(transition_idle),
                EngineSet::Clock,
                EngineSet::Vitals,
                EngineSet::Growth,
                EngineSet::Interaction.run_if(transition_idle),
                EngineSet::Handoff,
            )
                .chain(),
        );

        app.add_plugins((
            ConfigPlugin,
            crate::input::InputPlugin,
            crate::calendar::CalendarPlugin,
            crate::stamina::StaminaPlugin,
            crate::player::PlayerPlugin,
            crate::farming::FarmingPlugin,
            crate::transition::TransitionPlugin,
            crate::world::WorldPlugin,
            crate::interaction::InteractionPlugin,
            crate::economy::EconomyPlugin,
            crate::ui::handoff::RenderHandoffPlugin,
        ));

        app.add_systems(
            Update,
            drain_stamina_effects
                .in_set(EngineSet::Vitals)
                .after(crate::stamina::update_stamina)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Applies what the stamina clock asked for this frame. Passing out plays
/// the sleep fade, and the player wakes beside the bed at home.
pub fn drain_stamina_effects(
    time: Res<Time>,
    config: Res<GameConfig>,
    mut transition: ResMut<SceneTransition>,
    mut effects: ResMut<StaminaEffects>,
    mut inventory: ResMut<InventoryState>,
    mut gold_events: EventWriter<GoldChangeEvent>,
    mut toasts: EventWriter<ToastEvent>,
) {
    for effect in effects.0.drain(..) {
        match effect {
            StaminaEffect::Reminder { day } => {
                info!("[Engine] Bedtime reminder for day {}", day);
                toasts.send(ToastEvent::new("It's getting late. Head home to bed!"));
            }
            StaminaEffect::Penalty { day } => {
                let taken = inventory.apply_penalty(config.penalty_coins);
                warn!(
                    "[Engine] Stamina ran out on day {}; docked {} coins",
                    day, taken
                );
                gold_events.send(GoldChangeEvent {
                    amount: -(taken as i64),
                    kind: GoldChangeKind::Penalty,
                    reason: format!("Passed out on day {}", day),
                });
            }
            StaminaEffect::AutoSleep { woke_on_day } => {
                transition.start(
                    time.elapsed_secs_f64(),
                    config.transition_seconds,
                    TransitionAction::ChangeMap {
                        to_map: MapId::House,
                        spawn_tile: HOUSE_BED_SPAWN_TILE,
                    },
                );
                toasts.send(ToastEvent::new(format!(
                    "You collapsed and woke up on day {}",
                    woke_on_day
                )));
            }
        }
    }
}
