//! Placeholder renderer: coloured quads for the world and plain UI text.
//!
//! Reads only `WorldMap` and `RenderSnapshot`. World coordinates are y-down
//! pixels from the map's top-left; Bevy's are y-up, so y is negated here.

use bevy::prelude::*;

use super::handoff::RenderSnapshot;
use crate::shared::*;
use crate::world::maps::Ground;
use crate::world::WorldMap;

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct GroundTile;

#[derive(Component)]
pub struct PlantQuad;

#[derive(Component)]
pub struct PlayerQuad;

#[derive(Component)]
pub struct FadeOverlay;

#[derive(Component)]
pub struct NightOverlay;

#[derive(Component)]
pub struct HudText;

#[derive(Component)]
pub struct PromptText;

#[derive(Component)]
pub struct ToastText;

#[derive(Component)]
pub struct PanelText;

const Z_GROUND: f32 = 0.0;
const Z_PLANT: f32 = 1.0;
const Z_PLAYER: f32 = 2.0;

const SPROUT_DRY: Color = Color::srgb(0.55, 0.60, 0.25);
const SPROUT_WATERED: Color = Color::srgb(0.25, 0.60, 0.25);

// ═══════════════════════════════════════════════════════════════════════
// PURE HELPERS
// ═══════════════════════════════════════════════════════════════════════

pub fn world_to_render(pos: Vec2, z: f32) -> Vec3 {
    Vec3::new(pos.x, -pos.y, z)
}

/// Camera centre in world pixels: follows `focus` but never shows past the
/// map edge. Maps smaller than the viewport are centred.
pub fn camera_focus(focus: Vec2, bounds: WorldBounds, viewport: Vec2) -> Vec2 {
    let axis = |p: f32, size: f32, view: f32| {
        if size <= view {
            size / 2.0
        } else {
            p.clamp(view / 2.0, size - view / 2.0)
        }
    };
    Vec2::new(
        axis(focus.x, bounds.width, viewport.x),
        axis(focus.y, bounds.height, viewport.y),
    )
}

pub fn ground_color(ground: Ground) -> Color {
    match ground {
        Ground::Grass => Color::srgb(0.36, 0.62, 0.30),
        Ground::Soil => Color::srgb(0.45, 0.32, 0.20),
        Ground::Path => Color::srgb(0.70, 0.62, 0.45),
        Ground::Water => Color::srgb(0.25, 0.45, 0.80),
        Ground::Roof => Color::srgb(0.62, 0.22, 0.18),
        Ground::Wall => Color::srgb(0.55, 0.50, 0.45),
        Ground::Door => Color::srgb(0.35, 0.22, 0.12),
        Ground::Floor => Color::srgb(0.72, 0.56, 0.38),
        Ground::Furniture => Color::srgb(0.50, 0.35, 0.55),
    }
}

/// Interiors stay lit.
pub fn night_alpha(map: MapId, daylight: f32) -> f32 {
    match map {
        MapId::House => 0.0,
        MapId::Farm => ((1.0 - daylight) * 0.6 - 0.1).clamp(0.0, 0.5),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_camera, spawn_overlays))
            .add_systems(
                PostUpdate,
                (
                    rebuild_ground,
                    sync_plants,
                    sync_player,
                    follow_camera,
                    update_overlays,
                    update_text,
                )
                    .chain(),
            );
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Transform::from_translation(world_to_render(
            Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0),
            100.0,
        )),
    ));
    commands.spawn((
        PlayerQuad,
        Sprite {
            color: Color::srgb(0.95, 0.85, 0.35),
            custom_size: Some(Vec2::new(SPRITE_WIDTH * 0.6, SPRITE_HEIGHT * 0.9)),
            ..default()
        },
        Transform::default(),
    ));
}

fn text_node(commands: &mut Commands, marker: impl Component, node: Node, size: f32) {
    commands.spawn((
        marker,
        Text::new(""),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(Color::WHITE),
        node,
        PickingBehavior::IGNORE,
    ));
}

fn spawn_overlays(mut commands: Commands) {
    let full_screen = || Node {
        width: Val::Percent(100.0),
        height: Val::Percent(100.0),
        position_type: PositionType::Absolute,
        ..default()
    };
    commands.spawn((
        NightOverlay,
        full_screen(),
        BackgroundColor(Color::srgba(0.05, 0.05, 0.2, 0.0)),
        GlobalZIndex(10),
        PickingBehavior::IGNORE,
    ));
    commands.spawn((
        FadeOverlay,
        full_screen(),
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.0)),
        GlobalZIndex(100),
        PickingBehavior::IGNORE,
    ));

    let absolute = |top: Val, left: Val| Node {
        position_type: PositionType::Absolute,
        top,
        left,
        ..default()
    };
    text_node(&mut commands, HudText, absolute(Val::Px(8.0), Val::Px(10.0)), 16.0);
    text_node(&mut commands, ToastText, absolute(Val::Px(8.0), Val::Percent(55.0)), 14.0);
    text_node(&mut commands, PanelText, absolute(Val::Px(120.0), Val::Px(40.0)), 16.0);
    text_node(&mut commands, PromptText, absolute(Val::Percent(88.0), Val::Percent(42.0)), 16.0);
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

fn rebuild_ground(
    mut commands: Commands,
    world_map: Res<WorldMap>,
    tiles: Query<Entity, With<GroundTile>>,
) {
    if !world_map.is_changed() {
        return;
    }
    for entity in &tiles {
        commands.entity(entity).despawn();
    }
    let layout = &world_map.layout;
    for y in 0..layout.height as i32 {
        for x in 0..layout.width as i32 {
            let Some(ground) = layout.ground_at(x, y) else {
                continue;
            };
            commands.spawn((
                GroundTile,
                Sprite {
                    color: ground_color(ground),
                    custom_size: Some(Vec2::splat(TILE_SIZE)),
                    ..default()
                },
                Transform::from_translation(world_to_render(tile_center(x, y), Z_GROUND)),
            ));
        }
    }
}

/// Reuses plant quads by index, spawning or despawning the difference.
fn sync_plants(
    mut commands: Commands,
    snapshot: Res<RenderSnapshot>,
    mut quads: Query<(Entity, &mut Sprite, &mut Transform), With<PlantQuad>>,
) {
    let mut existing = quads.iter_mut();
    for plant in &snapshot.plants {
        let side = if plant.grown {
            TILE_SIZE * 0.8
        } else {
            TILE_SIZE * (0.25 + 0.45 * plant.progress)
        };
        let color = if plant.grown {
            plant.kind.color()
        } else if plant.watered {
            SPROUT_WATERED
        } else {
            SPROUT_DRY
        };
        let translation = world_to_render(plant.position, Z_PLANT);

        match existing.next() {
            Some((_, mut sprite, mut transform)) => {
                sprite.color = color;
                sprite.custom_size = Some(Vec2::splat(side));
                transform.translation = translation;
            }
            None => {
                commands.spawn((
                    PlantQuad,
                    Sprite {
                        color,
                        custom_size: Some(Vec2::splat(side)),
                        ..default()
                    },
                    Transform::from_translation(translation),
                ));
            }
        }
    }
    for (entity, _, _) in existing {
        commands.entity(entity).despawn();
    }
}

fn sync_player(
    snapshot: Res<RenderSnapshot>,
    mut query: Query<(&mut Transform, &mut Sprite), With<PlayerQuad>>,
) {
    let Ok((mut transform, mut sprite)) = query.get_single_mut() else {
        return;
    };
    let pose = &snapshot.player;
    let bob = if pose.moving && pose.frame % 2 == 1 { 2.0 } else { 0.0 };
    transform.translation = world_to_render(pose.position - Vec2::new(0.0, bob), Z_PLAYER);
    let shade = 0.75 + 0.08 * pose.facing.sheet_row() as f32;
    sprite.color = Color::srgb(0.95 * shade, 0.85 * shade, 0.35);
}

fn follow_camera(
    snapshot: Res<RenderSnapshot>,
    bounds: Res<WorldBounds>,
    mut camera: Query<&mut Transform, (With<Camera2d>, Without<PlayerQuad>)>,
) {
    let Ok(mut transform) = camera.get_single_mut() else {
        return;
    };
    let focus = camera_focus(
        snapshot.player.position,
        *bounds,
        Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
    );
    let target = world_to_render(focus, transform.translation.z);
    transform.translation = target.round();
}

fn update_overlays(
    snapshot: Res<RenderSnapshot>,
    mut fade: Query<&mut BackgroundColor, (With<FadeOverlay>, Without<NightOverlay>)>,
    mut night: Query<&mut BackgroundColor, (With<NightOverlay>, Without<FadeOverlay>)>,
) {
    for mut bg in &mut fade {
        *bg = BackgroundColor(Color::srgba(0.0, 0.0, 0.0, snapshot.fade_alpha));
    }
    let alpha = night_alpha(snapshot.map, snapshot.hud.daylight);
    for mut bg in &mut night {
        *bg = BackgroundColor(Color::srgba(0.05, 0.05, 0.2, alpha));
    }
}

fn hud_line(snapshot: &RenderSnapshot) -> String {
    let hud = &snapshot.hud;
    format!(
        "Day {} {}  {:02}:{:02}  {}\nCoins {}  Water {}/{}  Stamina {:.0}/{:.0}",
        hud.day,
        hud.season,
        hud.hour,
        hud.minute,
        hud.weather.label(),
        hud.coins,
        hud.water,
        hud.water_capacity,
        hud.stamina,
        hud.max_stamina
    )
}

fn panel_text(snapshot: &RenderSnapshot) -> String {
    if let Some(shop) = &snapshot.shop {
        let mut lines = vec![format!("SEED SHOP    {} coins", shop.coins)];
        for (i, (label, price)) in shop.rows.iter().enumerate() {
            let cursor = if i == shop.selected { ">" } else { " " };
            lines.push(format!("{} {:<18} {:>3}c", cursor, label, price));
        }
        lines.push("Up/Down choose  Enter buy  Esc leave".into());
        return lines.join("\n");
    }
    if let Some(bag) = &snapshot.bag {
        let mut lines = vec!["BAG".to_string()];
        if bag.slots.is_empty() {
            lines.push("(empty)".into());
        }
        for slot in &bag.slots {
            lines.push(format!("{:<18} x{}", slot.label, slot.count));
        }
        lines.push(format!(
            "Earned {}c  Spent {}c  Harvested {}",
            bag.total_earned, bag.total_spent, bag.lifetime_harvests
        ));
        return lines.join("\n");
    }
    String::new()
}

fn update_text(
    snapshot: Res<RenderSnapshot>,
    mut texts: ParamSet<(
        Query<&mut Text, With<HudText>>,
        Query<&mut Text, With<PromptText>>,
        Query<&mut Text, With<ToastText>>,
        Query<&mut Text, With<PanelText>>,
    )>,
) {
    if !snapshot.is_changed() {
        return;
    }
    for mut text in &mut texts.p0() {
        text.0 = hud_line(&snapshot);
    }
    for mut text in &mut texts.p1() {
        text.0 = snapshot.prompt.unwrap_or_default().to_string();
    }
    for mut text in &mut texts.p2() {
        text.0 = snapshot.notifications.join("\n");
    }
    for mut text in &mut texts.p3() {
        text.0 = panel_text(&snapshot);
    }
}
