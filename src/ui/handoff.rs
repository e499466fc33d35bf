//! Per-frame render handoff.
//!
//! The simulation never touches sprites or text. At the end of each frame
//! it collapses everything a renderer needs into one `RenderSnapshot`
//! resource, which any frontend (or a headless test) can read.

use bevy::prelude::*;
use std::collections::VecDeque;

use crate::calendar::{Clock, PlayTime};
use crate::economy::gold::{record_gold_changes, EconomyStats};
use crate::economy::shop::ShopState;
use crate::economy::stats::HarvestStats;
use crate::engine::EngineSet;
use crate::farming::GrowthRegistry;
use crate::interaction::resolve;
use crate::shared::*;
use crate::stamina::StaminaClock;
use crate::transition::SceneTransition;

/// Older notifications are dropped once this many are showing.
pub const MAX_NOTIFICATIONS: usize = 3;

// ═══════════════════════════════════════════════════════════════════════
// RESOURCES
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub expires_at: f64,
}

/// Short-lived messages, oldest first.
#[derive(Resource, Debug, Clone, Default)]
pub struct NotificationQueue {
    items: VecDeque<Notification>,
}

impl NotificationQueue {
    pub fn push(&mut self, message: String, now: f64, duration_secs: f32) {
        if self.items.len() >= MAX_NOTIFICATIONS {
            self.items.pop_front();
        }
        self.items.push_back(Notification {
            message,
            expires_at: now + duration_secs as f64,
        });
    }

    pub fn prune(&mut self, now: f64) {
        self.items.retain(|n| n.expires_at > now);
    }

    pub fn messages(&self) -> Vec<String> {
        self.items.iter().map(|n| n.message.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct BagPanel {
    pub open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayerPose {
    pub position: Vec2,
    pub facing: Facing,
    pub frame: usize,
    pub moving: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlantSprite {
    pub position: Vec2,
    pub kind: PlantKind,
    pub watered: bool,
    pub grown: bool,
    pub progress: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HudView {
    pub day: u32,
    pub season: &'static str,
    pub hour: u32,
    pub minute: u32,
    pub weather: Weather,
    pub daylight: f32,
    pub stamina: f32,
    pub max_stamina: f32,
    pub stamina_fraction: f32,
    pub coins: u32,
    pub water: u32,
    pub water_capacity: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BagSlot {
    pub label: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BagView {
    pub slots: Vec<BagSlot>,
    pub total_earned: u64,
    pub total_spent: u64,
    pub lifetime_harvests: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShopView {
    pub rows: Vec<(String, u32)>,
    pub selected: usize,
    pub coins: u32,
}

/// Everything a frontend draws this frame.
#[derive(Resource, Debug, Clone, Default)]
pub struct RenderSnapshot {
    pub map: MapId,
    pub player: PlayerPose,
    pub plants: Vec<PlantSprite>,
    pub fade_alpha: f32,
    pub hud: HudView,
    pub bag: Option<BagView>,
    pub shop: Option<ShopView>,
    pub prompt: Option<&'static str>,
    pub notifications: Vec<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct RenderHandoffPlugin;

impl Plugin for RenderHandoffPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NotificationQueue>()
            .init_resource::<BagPanel>()
            .init_resource::<RenderSnapshot>()
            .add_systems(
                Update,
                toggle_bag_panel
                    .in_set(EngineSet::Interaction)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                Update,
                (collect_notifications, build_render_snapshot)
                    .chain()
                    .in_set(EngineSet::Handoff)
                    .after(record_gold_changes),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

pub fn toggle_bag_panel(input: Res<ActionInput>, mut bag: ResMut<BagPanel>) {
    if input.toggle_bag {
        bag.open = !bag.open;
    }
}

pub fn collect_notifications(
    time: Res<Time>,
    mut events: EventReader<ToastEvent>,
    mut queue: ResMut<NotificationQueue>,
) {
    let now = time.elapsed_secs_f64();
    queue.prune(now);
    for ev in events.read() {
        queue.push(ev.message.clone(), now, ev.duration_secs);
    }
}

fn bag_view(inventory: &InventoryState, economy: &EconomyStats, harvests: &HarvestStats) -> BagView {
    let mut slots = Vec::new();
    for kind in PlantKind::ALL {
        let seeds = inventory.seed_count(kind);
        if seeds > 0 {
            slots.push(BagSlot {
                label: format!("{} seeds", kind.name()),
                count: seeds,
            });
        }
    }
    for kind in PlantKind::ALL {
        let crops = inventory.harvested_count(kind);
        if crops > 0 {
            slots.push(BagSlot {
                label: kind.name().to_string(),
                count: crops,
            });
        }
    }
    BagView {
        slots,
        total_earned: economy.total_earned,
        total_spent: economy.total_spent,
        lifetime_harvests: harvests.total(),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn build_render_snapshot(
    time: Res<Time>,
    state: Res<State<GameState>>,
    clock: Res<Clock>,
    stamina: Res<StaminaClock>,
    registry: Res<GrowthRegistry>,
    player: Res<PlayerCharacter>,
    active: Res<ActiveMap>,
    zones: Res<InteractionZones>,
    inventory: Res<InventoryState>,
    transition: Res<SceneTransition>,
    (bag, shop, economy, harvests, queue, play_time): (
        Res<BagPanel>,
        Res<ShopState>,
        Res<EconomyStats>,
        Res<HarvestStats>,
        Res<NotificationQueue>,
        Res<PlayTime>,
    ),
    mut snapshot: ResMut<RenderSnapshot>,
) {
    let now = time.elapsed_secs_f64();
    let playing = *state.get() == GameState::Playing;

    let plants = if active.0 == MapId::Farm {
        registry
            .plants()
            .iter()
            .map(|p| PlantSprite {
                position: p.position,
                kind: p.kind,
                watered: p.watered,
                grown: p.grown,
                progress: p.progress(play_time.elapsed_secs(), registry.growth_duration),
            })
            .collect()
    } else {
        Vec::new()
    };

    let fractional = clock.state().fractional_hour();
    let hud = HudView {
        day: clock.day(),
        season: season_name(clock.season_index()),
        hour: clock.hour(),
        minute: ((fractional.fract() * 60.0) as u32).min(59),
        weather: clock.weather(),
        daylight: clock.daylight(),
        stamina: stamina.current,
        max_stamina: stamina.max,
        stamina_fraction: stamina.fraction(),
        coins: inventory.coins,
        water: inventory.water,
        water_capacity: inventory.water_capacity,
    };

    let prompt = if playing && !transition.is_active() {
        let feet = FeetHitbox::default().point(player.position);
        resolve(feet, &zones.0).map(|zone| zone.kind.prompt())
    } else {
        None
    };

    let shop_view = (*state.get() == GameState::Shop).then(|| ShopView {
        rows: shop
            .items
            .iter()
            .map(|item| (format!("{} seeds", item.kind.name()), item.price))
            .collect(),
        selected: shop.selected,
        coins: inventory.coins,
    });

    *snapshot = RenderSnapshot {
        map: active.0,
        player: PlayerPose {
            position: player.position,
            facing: player.facing,
            frame: player.frame,
            moving: player.moving,
        },
        plants,
        fade_alpha: transition.alpha(now),
        hud,
        bag: bag.open.then(|| bag_view(&inventory, &economy, &harvests)),
        shop: shop_view,
        prompt,
        notifications: queue.messages(),
    };
}
