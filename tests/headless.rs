//! Headless integration tests for Tillfield.
//!
//! These tests run the full engine pipeline without a window or GPU. They
//! use Bevy's `MinimalPlugins` with a fixed manual time step, press keys
//! through `ButtonInput<KeyCode>`, and read back resources and the render
//! snapshot.
//!
//! Run with: `cargo test --test headless`

use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use tillfield::calendar::{Clock, PlayTime};
use tillfield::config::GameConfig;
use tillfield::economy::gold::EconomyStats;
use tillfield::economy::shop::ShopState;
use tillfield::economy::stats::HarvestStats;
use tillfield::engine::EnginePlugin;
use tillfield::farming::GrowthRegistry;
use tillfield::shared::*;
use tillfield::stamina::StaminaClock;
use tillfield::transition::SceneTransition;
use tillfield::ui::handoff::RenderSnapshot;

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

const STEP: f32 = 1.0 / 60.0;
const COARSE_STEP: f32 = 0.25;

fn test_config() -> GameConfig {
    GameConfig {
        growth_duration_seconds: 4.0,
        ..default()
    }
}

/// Builds the engine with a preset config and a manual clock, then ticks
/// until the Loading state has handed over to Playing.
fn build_test_app(config: GameConfig, step: f32) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    app.init_resource::<ButtonInput<KeyCode>>();
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(step)));
    app.insert_resource(config);
    app.add_plugins(EnginePlugin);

    for _ in 0..5 {
        app.update();
        if state(&app) == GameState::Playing {
            return app;
        }
    }
    panic!("engine never left the Loading state");
}

fn state(app: &App) -> GameState {
    *app.world().resource::<State<GameState>>().get()
}

fn run(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

/// Press on one frame, release on the next.
fn tap(app: &mut App, key: KeyCode) {
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(key);
    app.update();
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .release(key);
    app.update();
}

fn hold(app: &mut App, keys: &[KeyCode], frames: usize) {
    for key in keys {
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(*key);
    }
    run(app, frames);
    for key in keys {
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .release(*key);
    }
}

fn place_player(app: &mut App, tile: (i32, i32)) {
    let mut player = app.world_mut().resource_mut::<PlayerCharacter>();
    player.position = tile_center(tile.0, tile.1);
}

fn player_position(app: &App) -> Vec2 {
    app.world().resource::<PlayerCharacter>().position
}

fn coins(app: &App) -> u32 {
    app.world().resource::<InventoryState>().coins
}

// ─────────────────────────────────────────────────────────────────────────────
// Boot
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_boot_loads_farm_and_session() {
    let app = build_test_app(test_config(), STEP);
    let world = app.world();

    assert_eq!(world.resource::<ActiveMap>().0, MapId::Farm);
    assert_eq!(world.resource::<InteractionZones>().0.len(), 4);
    assert!(!world.resource::<CollisionRects>().0.is_empty());
    assert_eq!(world.resource::<WorldBounds>().width, SCREEN_WIDTH);

    let clock = world.resource::<Clock>();
    assert_eq!(clock.day(), 1);
    assert_eq!(clock.hour(), 7);

    assert_eq!(world.resource::<InventoryState>().coins, STARTING_COINS);
    assert_eq!(world.resource::<GrowthRegistry>().growth_duration, 4.0);
    assert_eq!(
        world.resource::<PlayerCharacter>().position,
        tile_center(FARM_SPAWN_TILE.0, FARM_SPAWN_TILE.1)
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Farming
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_planting_respects_spacing() {
    let mut app = build_test_app(test_config(), STEP);

    place_player(&mut app, (10, 10));
    tap(&mut app, KeyCode::KeyP);
    assert_eq!(app.world().resource::<GrowthRegistry>().len(), 1);

    place_player(&mut app, (11, 10));
    tap(&mut app, KeyCode::KeyP);
    assert_eq!(app.world().resource::<GrowthRegistry>().len(), 2);

    place_player(&mut app, (10, 10));
    tap(&mut app, KeyCode::KeyP);
    assert_eq!(app.world().resource::<GrowthRegistry>().len(), 2);
    assert!(app
        .world()
        .resource::<RenderSnapshot>()
        .notifications
        .iter()
        .any(|n| n.contains("Too close")));
}

#[test]
fn test_plant_water_grow_harvest_and_ship() {
    let mut app = build_test_app(test_config(), COARSE_STEP);
    place_player(&mut app, (10, 10));
    tap(&mut app, KeyCode::KeyP);

    // Never watered: nothing grows however long we wait.
    run(&mut app, 40);
    let registry = app.world().resource::<GrowthRegistry>();
    assert!(!registry.plants()[0].grown);
    assert!(!registry.plants()[0].watered);

    // Watering happens on the press frame; growth needs 4.0 s after it.
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(KeyCode::KeyQ);
    app.update();
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .release(KeyCode::KeyQ);
    assert!(app.world().resource::<GrowthRegistry>().plants()[0].watered);
    assert_eq!(app.world().resource::<InventoryState>().water, WATER_CAPACITY - 1);

    run(&mut app, 15);
    assert!(!app.world().resource::<GrowthRegistry>().plants()[0].grown);
    run(&mut app, 1);
    assert!(app.world().resource::<GrowthRegistry>().plants()[0].grown);

    tap(&mut app, KeyCode::KeyH);
    assert!(app.world().resource::<GrowthRegistry>().is_empty());
    let kind = PlantKind::ALL
        .into_iter()
        .find(|k| app.world().resource::<InventoryState>().harvested_count(*k) == 1)
        .expect("one crop in the bag");
    assert_eq!(app.world().resource::<HarvestStats>().total(), 1);

    // Shipping bin sits at (17, 3); stand just below it.
    place_player(&mut app, (17, 4));
    tap(&mut app, KeyCode::KeyE);
    assert_eq!(coins(&app), STARTING_COINS + kind.sell_price());
    assert_eq!(app.world().resource::<InventoryState>().harvested_count(kind), 0);
    assert_eq!(
        app.world().resource::<EconomyStats>().total_earned,
        kind.sell_price() as u64
    );
}

#[test]
fn test_storm_waters_every_plant() {
    let mut app = build_test_app(test_config(), STEP);
    place_player(&mut app, (10, 10));
    tap(&mut app, KeyCode::KeyP);
    place_player(&mut app, (14, 10));
    tap(&mut app, KeyCode::KeyP);

    app.world_mut().resource_mut::<Clock>().set_weather(Weather::Storm);
    app.update();

    let registry = app.world().resource::<GrowthRegistry>();
    assert_eq!(registry.len(), 2);
    assert!(registry.plants().iter().all(|p| p.watered));
    assert_eq!(app.world().resource::<InventoryState>().water, WATER_CAPACITY);
}

// ─────────────────────────────────────────────────────────────────────────────
// Time and stamina
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_stamina_after_eight_and_a_half_hours_awake() {
    let mut app = build_test_app(test_config(), STEP);
    app.world_mut()
        .resource_mut::<Clock>()
        .set_time_to_hour(15.5, false);
    app.update();

    let stamina = app.world().resource::<StaminaClock>();
    assert!((stamina.current - 50.0).abs() < 0.1, "got {}", stamina.current);

    let hud = &app.world().resource::<RenderSnapshot>().hud;
    assert_eq!(hud.stamina, stamina.current);
    assert_eq!(hud.max_stamina, stamina.max);
    assert!((hud.stamina_fraction - 0.5).abs() < 0.01);
}

#[test]
fn test_exhaustion_penalty_applies_once() {
    let mut app = build_test_app(test_config(), STEP);
    let half_past_midnight = 0.5 * 600.0 / 24.0;
    app.world_mut()
        .resource_mut::<Clock>()
        .set_day_and_seconds(2, half_past_midnight);

    run(&mut app, 30);

    assert_eq!(coins(&app), STARTING_COINS - 20);
    assert_eq!(app.world().resource::<EconomyStats>().total_penalties, 20);
    let clock = app.world().resource::<Clock>();
    assert_eq!(clock.day(), 2);
    assert_eq!(clock.hour(), 7);
    let stamina = app.world().resource::<StaminaClock>();
    assert_eq!(stamina.last_penalty_day, Some(2));
    assert!(stamina.current > 99.0);
}

#[test]
fn test_passing_out_fades_home_to_bed() {
    let mut app = build_test_app(test_config(), STEP);
    place_player(&mut app, (15, 12));
    let half_past_midnight = 0.5 * 600.0 / 24.0;
    app.world_mut()
        .resource_mut::<Clock>()
        .set_day_and_seconds(2, half_past_midnight);

    app.update();
    assert!(app.world().resource::<SceneTransition>().is_active());
    assert_eq!(app.world().resource::<Clock>().hour(), 7);

    let mut max_alpha: f32 = 0.0;
    for _ in 0..40 {
        app.update();
        max_alpha = max_alpha.max(app.world().resource::<RenderSnapshot>().fade_alpha);
    }
    assert!(max_alpha > 0.9, "fade never went dark: {}", max_alpha);
    assert_eq!(app.world().resource::<ActiveMap>().0, MapId::House);
    assert_eq!(
        player_position(&app),
        tile_center(HOUSE_BED_SPAWN_TILE.0, HOUSE_BED_SPAWN_TILE.1)
    );

    run(&mut app, 40);
    assert!(!app.world().resource::<SceneTransition>().is_active());
    assert_eq!(app.world().resource::<StaminaClock>().last_penalty_day, Some(2));
    assert_eq!(coins(&app), STARTING_COINS - 20);
}

#[test]
fn test_day_rollover_truncates() {
    let config = GameConfig {
        day_duration_seconds: 40.0,
        ..test_config()
    };
    let mut app = build_test_app(config, COARSE_STEP);
    app.world_mut().resource_mut::<StaminaClock>().last_sleep_time = 60.0;
    app.world_mut()
        .resource_mut::<Clock>()
        .set_day_and_seconds(3, 39.9);
    app.update();

    let clock = app.world().resource::<Clock>();
    assert_eq!(clock.day(), 4);
    assert_eq!(clock.seconds_into_day(), 0.0);
    assert_eq!(clock.season_index(), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Movement and interaction
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_diagonal_covers_same_distance_as_straight() {
    let mut straight = build_test_app(test_config(), STEP);
    place_player(&mut straight, (15, 12));
    let start = player_position(&straight);
    hold(&mut straight, &[KeyCode::KeyD], 30);
    let straight_dist = player_position(&straight).distance(start);

    let mut diagonal = build_test_app(test_config(), STEP);
    place_player(&mut diagonal, (15, 12));
    hold(&mut diagonal, &[KeyCode::KeyW, KeyCode::KeyD], 30);
    let moved = player_position(&diagonal) - start;

    assert!(straight_dist > 50.0);
    assert!((moved.length() - straight_dist).abs() < 0.01);
    assert!((moved.x + moved.y).abs() < 0.01, "up-right should be symmetric: {:?}", moved);
    assert_eq!(diagonal.world().resource::<PlayerCharacter>().facing, Facing::Up);
}

#[test]
fn test_walk_into_well_then_refill() {
    let mut app = build_test_app(test_config(), STEP);
    app.world_mut().resource_mut::<InventoryState>().water = 2;

    place_player(&mut app, (12, 6));
    hold(&mut app, &[KeyCode::KeyW], 90);
    let feet = FeetHitbox::default().point(player_position(&app));
    assert_eq!(world_to_tile(feet), (12, 4), "the well should stop the player");
    assert_eq!(
        app.world().resource::<RenderSnapshot>().prompt,
        Some(InteractionKind::Well.prompt())
    );

    tap(&mut app, KeyCode::KeyE);
    assert_eq!(app.world().resource::<InventoryState>().water, WATER_CAPACITY);
}

#[test]
fn test_house_door_round_trip() {
    let mut app = build_test_app(test_config(), STEP);
    place_player(&mut app, (24, 5));
    tap(&mut app, KeyCode::KeyE);
    assert!(app.world().resource::<SceneTransition>().is_active());

    // Input is ignored while fading; the swap happens at the midpoint.
    hold(&mut app, &[KeyCode::KeyD], 40);
    assert_eq!(app.world().resource::<ActiveMap>().0, MapId::House);
    assert_eq!(
        player_position(&app),
        tile_center(HOUSE_SPAWN_TILE.0, HOUSE_SPAWN_TILE.1)
    );
    run(&mut app, 60);
    assert!(!app.world().resource::<SceneTransition>().is_active());
    assert_eq!(app.world().resource::<WorldBounds>().width, 10.0 * TILE_SIZE);

    tap(&mut app, KeyCode::KeyE);
    run(&mut app, 70);
    assert_eq!(app.world().resource::<ActiveMap>().0, MapId::Farm);
    assert_eq!(
        player_position(&app),
        tile_center(FARM_DOOR_SPAWN_TILE.0, FARM_DOOR_SPAWN_TILE.1)
    );
}

#[test]
fn test_bed_sleeps_to_next_morning() {
    let mut app = build_test_app(test_config(), STEP);
    app.world_mut().send_event(MapTransitionEvent {
        to_map: MapId::House,
        spawn_tile: (2, 2),
    });
    app.update();
    assert_eq!(app.world().resource::<ActiveMap>().0, MapId::House);

    app.world_mut()
        .resource_mut::<Clock>()
        .set_time_to_hour(21.0, false);
    tap(&mut app, KeyCode::KeyE);
    run(&mut app, 70);

    let clock = app.world().resource::<Clock>();
    assert_eq!(clock.day(), 2);
    assert_eq!(clock.hour(), 7);
    let stamina = app.world().resource::<StaminaClock>();
    assert!(stamina.current > 99.0);
    assert_eq!(stamina.last_penalty_day, None);
}

// ─────────────────────────────────────────────────────────────────────────────
// Shop and UI handoff
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_seed_shop_purchase() {
    let mut app = build_test_app(test_config(), STEP);
    place_player(&mut app, (5, 5));
    tap(&mut app, KeyCode::KeyE);
    assert_eq!(state(&app), GameState::Shop);
    assert!(app.world().resource::<RenderSnapshot>().shop.is_some());

    tap(&mut app, KeyCode::ArrowDown);
    assert_eq!(app.world().resource::<ShopState>().selected, 1);
    let item = app.world().resource::<ShopState>().items[1];

    tap(&mut app, KeyCode::Enter);
    assert_eq!(coins(&app), STARTING_COINS - item.price);
    assert_eq!(app.world().resource::<InventoryState>().seed_count(item.kind), 1);

    tap(&mut app, KeyCode::Escape);
    assert_eq!(state(&app), GameState::Playing);

    // The bought packet is used by the next planting.
    place_player(&mut app, (10, 10));
    tap(&mut app, KeyCode::KeyP);
    let registry = app.world().resource::<GrowthRegistry>();
    assert_eq!(registry.plants()[0].kind, item.kind);
    assert_eq!(app.world().resource::<InventoryState>().seed_count(item.kind), 0);
}

#[test]
fn test_shop_holds_growth_and_clock_still() {
    let mut app = build_test_app(test_config(), COARSE_STEP);
    place_player(&mut app, (10, 10));
    tap(&mut app, KeyCode::KeyP);
    tap(&mut app, KeyCode::KeyQ);
    assert!(app.world().resource::<GrowthRegistry>().plants()[0].watered);

    place_player(&mut app, (5, 5));
    tap(&mut app, KeyCode::KeyE);
    assert_eq!(state(&app), GameState::Shop);
    let seconds = app.world().resource::<Clock>().seconds_into_day();
    let played = app.world().resource::<PlayTime>().elapsed_secs();

    run(&mut app, 40);
    assert_eq!(state(&app), GameState::Shop);
    assert_eq!(app.world().resource::<Clock>().seconds_into_day(), seconds);
    assert_eq!(app.world().resource::<PlayTime>().elapsed_secs(), played);
    assert!(!app.world().resource::<GrowthRegistry>().plants()[0].grown);

    tap(&mut app, KeyCode::Escape);
    assert_eq!(state(&app), GameState::Playing);
    run(&mut app, 20);
    assert!(app.world().resource::<GrowthRegistry>().plants()[0].grown);
}

#[test]
fn test_shop_refuses_when_short_of_coins() {
    let mut app = build_test_app(test_config(), STEP);
    app.world_mut().resource_mut::<InventoryState>().coins = 1;
    place_player(&mut app, (5, 5));
    tap(&mut app, KeyCode::KeyE);
    tap(&mut app, KeyCode::Enter);

    assert_eq!(coins(&app), 1);
    assert!(PlantKind::ALL
        .iter()
        .all(|k| app.world().resource::<InventoryState>().seed_count(*k) == 0));
    assert!(app
        .world()
        .resource::<RenderSnapshot>()
        .notifications
        .iter()
        .any(|n| n == "Not enough coins"));
}

#[test]
fn test_bag_panel_toggles_in_snapshot() {
    let mut app = build_test_app(test_config(), STEP);
    assert!(app.world().resource::<RenderSnapshot>().bag.is_none());
    tap(&mut app, KeyCode::KeyB);
    assert!(app.world().resource::<RenderSnapshot>().bag.is_some());
    tap(&mut app, KeyCode::KeyB);
    assert!(app.world().resource::<RenderSnapshot>().bag.is_none());
}
