//! Motion controller: input to velocity, integration, collision, bounds.
//!
//! Everything here is a pure function of its arguments so the collision
//! rules can be tested without an app.

use bevy::prelude::*;
use std::time::Duration;

use crate::shared::*;

pub const WALK_FRAMES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionTuning {
    /// Pixels per second.
    pub speed: f32,
    pub hitbox: FeetHitbox,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            speed: 120.0,
            hitbox: FeetHitbox::default(),
        }
    }
}

/// Direction from held keys. Diagonals are scaled by 1/√2 per axis so the
/// speed is the same in every direction. Up is negative y.
pub fn movement_vector(input: &ActionInput) -> Vec2 {
    let mut dir = Vec2::ZERO;
    if input.up {
        dir.y -= 1.0;
    }
    if input.down {
        dir.y += 1.0;
    }
    if input.left {
        dir.x -= 1.0;
    }
    if input.right {
        dir.x += 1.0;
    }
    if dir.x != 0.0 && dir.y != 0.0 {
        dir *= std::f32::consts::FRAC_1_SQRT_2;
    }
    dir
}

/// Facing for a movement direction, `None` when idle. Horizontal only wins
/// when it is strictly larger, so pure diagonals face up or down.
pub fn facing_from(dir: Vec2) -> Option<Facing> {
    if dir == Vec2::ZERO {
        return None;
    }
    let h = (dir.x.abs() * 1000.0).round();
    let v = (dir.y.abs() * 1000.0).round();
    Some(if h > v {
        if dir.x > 0.0 {
            Facing::Right
        } else {
            Facing::Left
        }
    } else if dir.y > 0.0 {
        Facing::Down
    } else {
        Facing::Up
    })
}

/// Pushes the feet box out of each overlapping rectangle in list order.
///
/// `position` is the already-integrated sprite centre and `displacement`
/// the movement applied this frame. Each push happens along the axis that
/// moved further this frame, opposite to the motion. Equal movement on both
/// axes takes the shallower of the two opposing pushes; no movement at all
/// takes the shallowest of the four. The feet box is rebuilt after every
/// push, so later rectangles see the corrected position.
pub fn resolve_collisions(
    position: Vec2,
    displacement: Vec2,
    rects: &[CollisionRect],
    hitbox: &FeetHitbox,
) -> Vec2 {
    let mut pos = position;
    for rect in rects {
        let feet = hitbox.rect_at(pos);
        if !feet.overlaps(rect) {
            continue;
        }

        let push_left = feet.right() - rect.x;
        let push_right = rect.right() - feet.x;
        let push_up = feet.bottom() - rect.y;
        let push_down = rect.bottom() - feet.y;

        let dx = displacement.x.abs();
        let dy = displacement.y.abs();

        let push_x = if displacement.x > 0.0 { -push_left } else { push_right };
        let push_y = if displacement.y > 0.0 { -push_up } else { push_down };

        if dx > dy {
            pos.x += push_x;
        } else if dy > dx {
            pos.y += push_y;
        } else if dx > 0.0 {
            if push_x.abs() <= push_y.abs() {
                pos.x += push_x;
            } else {
                pos.y += push_y;
            }
        } else {
            let smallest = push_left.min(push_right).min(push_up).min(push_down);
            if smallest == push_left {
                pos.x -= push_left;
            } else if smallest == push_right {
                pos.x += push_right;
            } else if smallest == push_up {
                pos.y -= push_up;
            } else {
                pos.y += push_down;
            }
        }
    }
    pos
}

/// Keeps the whole sprite inside the map. Zero-sized bounds skip the clamp.
pub fn clamp_to_bounds(position: Vec2, bounds: WorldBounds) -> Vec2 {
    if bounds.width <= 0.0 || bounds.height <= 0.0 {
        return position;
    }
    let half_w = SPRITE_WIDTH * 0.5;
    let half_h = SPRITE_HEIGHT * 0.5;
    Vec2::new(
        position.x.clamp(half_w, (bounds.width - half_w).max(half_w)),
        position.y.clamp(half_h, (bounds.height - half_h).max(half_h)),
    )
}

pub fn advance_animation(player: &mut PlayerCharacter, dt: f32) {
    if !player.moving {
        player.frame = 0;
        player.frame_timer.reset();
        return;
    }
    player.frame_timer.tick(Duration::from_secs_f32(dt.max(0.0)));
    let steps = player.frame_timer.times_finished_this_tick() as usize;
    player.frame = (player.frame + steps) % WALK_FRAMES;
}

/// One frame of player motion.
pub fn update_movement(
    player: &mut PlayerCharacter,
    input: &ActionInput,
    dt: f32,
    rects: &[CollisionRect],
    bounds: WorldBounds,
    tuning: &MotionTuning,
) {
    let dir = movement_vector(input);
    player.moving = dir != Vec2::ZERO;
    if let Some(facing) = facing_from(dir) {
        player.facing = facing;
    }
    if let Some(facing) = input.face {
        player.facing = facing;
    }

    let displacement = dir * tuning.speed * dt;
    let moved = player.position + displacement;
    let resolved = resolve_collisions(moved, displacement, rects, &tuning.hitbox);
    player.position = clamp_to_bounds(resolved, bounds);

    advance_animation(player, dt);
}
