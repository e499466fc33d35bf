use bevy::prelude::*;
use std::collections::HashMap;

use crate::shared::*;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActionInput>()
            .init_resource::<KeyEdges>()
            .add_systems(PreUpdate, read_action_input);
    }
}

/// Rising-edge detector over a level signal.
///
/// `update` returns true only on the call where the signal goes from up to
/// down; holding the key keeps returning false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeTrigger {
    was_down: bool,
}

impl EdgeTrigger {
    pub fn update(&mut self, is_down: bool) -> bool {
        let rising = is_down && !self.was_down;
        self.was_down = is_down;
        rising
    }

    pub fn is_down(&self) -> bool {
        self.was_down
    }
}

/// One `EdgeTrigger` per key the game treats as a one-shot action.
#[derive(Resource, Debug, Default)]
pub struct KeyEdges {
    triggers: HashMap<KeyCode, EdgeTrigger>,
}

impl KeyEdges {
    pub fn rising(&mut self, key: KeyCode, is_down: bool) -> bool {
        self.triggers.entry(key).or_default().update(is_down)
    }
}

const FACING_KEYS: [(KeyCode, Facing); 4] = [
    (KeyCode::Digit1, Facing::Up),
    (KeyCode::Digit2, Facing::Left),
    (KeyCode::Digit3, Facing::Down),
    (KeyCode::Digit4, Facing::Right),
];

/// The single point where key state becomes game actions.
///
/// Every edge trigger is fed every frame, whatever the game state, so a key
/// held across a state change does not fire when the new state starts.
pub fn read_action_input(
    keys: Res<ButtonInput<KeyCode>>,
    mut edges: ResMut<KeyEdges>,
    mut input: ResMut<ActionInput>,
) {
    let mut edge = |key: KeyCode| edges.rising(key, keys.pressed(key));

    let plant = edge(KeyCode::KeyP);
    let harvest = edge(KeyCode::KeyH);
    let water = edge(KeyCode::KeyQ);
    let interact = edge(KeyCode::KeyE);
    let toggle_bag = edge(KeyCode::KeyB);
    let menu_up = edge(KeyCode::ArrowUp);
    let menu_down = edge(KeyCode::ArrowDown);
    let space = edge(KeyCode::Space);
    let enter = edge(KeyCode::Enter);
    let cancel = edge(KeyCode::Escape);

    let mut face = None;
    for (key, facing) in FACING_KEYS {
        if edge(key) && face.is_none() {
            face = Some(facing);
        }
    }

    *input = ActionInput {
        up: keys.pressed(KeyCode::KeyW) || keys.pressed(KeyCode::ArrowUp),
        down: keys.pressed(KeyCode::KeyS) || keys.pressed(KeyCode::ArrowDown),
        left: keys.pressed(KeyCode::KeyA) || keys.pressed(KeyCode::ArrowLeft),
        right: keys.pressed(KeyCode::KeyD) || keys.pressed(KeyCode::ArrowRight),
        plant,
        harvest,
        water,
        interact,
        toggle_bag,
        face,
        menu_up,
        menu_down,
        confirm: space || enter,
        cancel,
    };
}
