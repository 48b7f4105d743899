//! Pointer and keyboard interactivity.
//!
//! Drains the input queue each update, tracks the pointer, runs the
//! up/over/down state machine for every interactive node, drags the
//! top-most draggable node under the pointer and records key presses.
//! Resulting button and key events are collected for the facade to
//! dispatch to user callbacks.

use std::collections::{HashMap, HashSet};
use glam::Vec2;
use crate::api::types::NodeId;
use crate::components::node::NodeKind;
use crate::core::lifecycle::FrameModule;
use crate::core::scene::Scene;
use crate::input::queue::{InputEvent, InputQueue};
use crate::systems::collision::hit_test_point;

/// Longest press, in seconds, that still counts as a tap.
pub const TAP_TIME: f32 = 0.2;

/// DOM key codes for the keys games usually bind.
pub mod keys {
    pub const ENTER: u32 = 13;
    pub const ESCAPE: u32 = 27;
    pub const SPACE: u32 = 32;
    pub const LEFT: u32 = 37;
    pub const UP: u32 = 38;
    pub const RIGHT: u32 = 39;
    pub const DOWN: u32 = 40;
    pub const A: u32 = 65;
    pub const D: u32 = 68;
    pub const S: u32 = 83;
    pub const W: u32 = 87;
}

/// Pointer state of an interactive node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Up,
    Over,
    Down,
}

/// Something that happened to an interactive node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    Press,
    Release,
    Over,
    Out,
    Tap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    pub node: NodeId,
    pub action: ButtonAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key_code: u32,
    pub pressed: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct ButtonTrack {
    state: ButtonState,
    pressed: bool,
    hover: bool,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    node: NodeId,
    /// Pointer minus the node's global origin when the drag began.
    offset: Vec2,
}

/// Pointer position and press state, in stage coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
    pub is_down: bool,
    /// Set for the evaluation that follows a short press-release.
    pub tapped: bool,
    down_time: f32,
}

impl Pointer {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn is_up(&self) -> bool {
        !self.is_down
    }
}

/// The interactivity frame module.
pub struct Interactive {
    queue: InputQueue,
    scale: f32,
    pointer: Pointer,
    drag: Option<Drag>,
    keys_down: HashSet<u32>,
    tracks: HashMap<NodeId, ButtonTrack>,
    button_events: Vec<ButtonEvent>,
    key_events: Vec<KeyEvent>,
}

impl Interactive {
    pub fn new(scale: f32) -> Self {
        Self {
            queue: InputQueue::new(),
            scale: if scale > 0.0 { scale } else { 1.0 },
            pointer: Pointer::default(),
            drag: None,
            keys_down: HashSet::new(),
            tracks: HashMap::new(),
            button_events: Vec::new(),
            key_events: Vec::new(),
        }
    }

    /// Queue raw input for the next update.
    pub fn push(&mut self, event: InputEvent) {
        self.queue.push(event);
    }

    /// Canvas scale the pointer coordinates are divided by.
    pub fn set_scale(&mut self, scale: f32) {
        if scale > 0.0 {
            self.scale = scale;
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    pub fn is_key_down(&self, key_code: u32) -> bool {
        self.keys_down.contains(&key_code)
    }

    /// Current state of an interactive node.
    pub fn button_state(&self, node: NodeId) -> ButtonState {
        self.tracks.get(&node).map(|t| t.state).unwrap_or_default()
    }

    /// Node being dragged, if any.
    pub fn dragged(&self) -> Option<NodeId> {
        self.drag.map(|d| d.node)
    }

    pub fn drain_button_events(&mut self) -> Vec<ButtonEvent> {
        std::mem::take(&mut self.button_events)
    }

    pub fn drain_key_events(&mut self) -> Vec<KeyEvent> {
        std::mem::take(&mut self.key_events)
    }

    fn handle(&mut self, scene: &mut Scene, event: InputEvent) {
        match event {
            InputEvent::PointerMove { x, y } => {
                self.move_pointer(x, y);
                self.drag_to_pointer(scene);
                self.update_buttons(scene);
            }
            InputEvent::PointerDown { x, y } => {
                self.move_pointer(x, y);
                self.pointer.is_down = true;
                self.pointer.down_time = 0.0;
                self.begin_drag(scene);
                self.update_buttons(scene);
            }
            InputEvent::PointerUp { x, y } => {
                self.move_pointer(x, y);
                self.pointer.tapped = self.pointer.is_down && self.pointer.down_time < TAP_TIME;
                self.pointer.is_down = false;
                self.drag = None;
                self.update_buttons(scene);
                self.pointer.tapped = false;
            }
            InputEvent::KeyDown { key_code } => {
                if self.keys_down.insert(key_code) {
                    self.key_events.push(KeyEvent { key_code, pressed: true });
                }
            }
            InputEvent::KeyUp { key_code } => {
                if self.keys_down.remove(&key_code) {
                    self.key_events.push(KeyEvent { key_code, pressed: false });
                }
            }
        }
    }

    fn move_pointer(&mut self, x: f32, y: f32) {
        self.pointer.x = x / self.scale;
        self.pointer.y = y / self.scale;
    }

    fn begin_drag(&mut self, scene: &mut Scene) {
        let point = self.pointer.position();
        let target = scene
            .draggable_targets()
            .iter()
            .rev()
            .copied()
            .find(|&id| hit_test_point(scene, point, id).unwrap_or(false));
        if let Some(node) = target {
            let offset = point - scene.global_position(node);
            scene.raise_to_top(node);
            self.drag = Some(Drag { node, offset });
        }
    }

    fn drag_to_pointer(&mut self, scene: &mut Scene) {
        let Some(drag) = self.drag else {
            return;
        };
        let parent_origin = scene
            .get(drag.node)
            .and_then(|n| n.parent())
            .map_or(Vec2::ZERO, |p| scene.global_position(p));
        match scene.get_mut(drag.node) {
            Some(node) => node.pos = self.pointer.position() - drag.offset - parent_origin,
            None => self.drag = None,
        }
    }

    fn update_buttons(&mut self, scene: &mut Scene) {
        let point = self.pointer.position();
        let targets: Vec<NodeId> = scene.interactive_targets().to_vec();
        self.tracks.retain(|id, _| targets.contains(id));

        for id in targets {
            let hit = hit_test_point(scene, point, id).unwrap_or(false);
            let track = self.tracks.entry(id).or_default();
            track.state = match (hit, self.pointer.is_down) {
                (false, _) => ButtonState::Up,
                (true, false) => ButtonState::Over,
                (true, true) => ButtonState::Down,
            };

            let mut emit = |action| self.button_events.push(ButtonEvent { node: id, action });
            match track.state {
                ButtonState::Down => {
                    if !track.pressed {
                        track.pressed = true;
                        emit(ButtonAction::Press);
                    }
                }
                ButtonState::Over => {
                    if track.pressed {
                        track.pressed = false;
                        emit(ButtonAction::Release);
                        if self.pointer.tapped {
                            emit(ButtonAction::Tap);
                        }
                    }
                    if !track.hover {
                        track.hover = true;
                        emit(ButtonAction::Over);
                    }
                }
                ButtonState::Up => {
                    if track.pressed {
                        track.pressed = false;
                        emit(ButtonAction::Release);
                    }
                    if track.hover {
                        track.hover = false;
                        emit(ButtonAction::Out);
                    }
                }
            }

            show_button_frame(scene, id, track.state);
        }
    }
}

/// Buttons show frame 0 when up, 1 when over and 2 when down;
/// with only two frames the second one means down.
fn show_button_frame(scene: &mut Scene, id: NodeId, state: ButtonState) {
    let Some(node) = scene.get_mut(id) else {
        return;
    };
    if !matches!(node.kind, NodeKind::Button) {
        return;
    }
    let frames = node.textures.len();
    node.frame = match (state, frames) {
        (_, 0) | (ButtonState::Up, _) => 0,
        (ButtonState::Over, 3..) => 1,
        (ButtonState::Over, _) => 0,
        (ButtonState::Down, 3..) => 2,
        (ButtonState::Down, _) => frames - 1,
    };
}

impl FrameModule for Interactive {
    fn name(&self) -> &str {
        "interactive"
    }

    fn update(&mut self, scene: &mut Scene, dt: f32) {
        let events = self.queue.drain();
        let had_pointer_event = events
            .iter()
            .any(|e| !matches!(e, InputEvent::KeyDown { .. } | InputEvent::KeyUp { .. }));
        for event in events {
            self.handle(scene, event);
        }
        if self.pointer.is_down {
            self.pointer.down_time += dt;
        }
        // Nodes can move under a still pointer
        if !had_pointer_event {
            self.drag_to_pointer(scene);
            self.update_buttons(scene);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::node::DisplayNode;

    fn stage_with_box(pos: Vec2, size: f32) -> (Scene, NodeId) {
        let mut scene = Scene::new(Vec2::new(200.0, 200.0));
        let id = scene.next_id();
        scene.spawn(DisplayNode::new(id, NodeKind::Sprite).with_pos(pos).with_base_size(Vec2::splat(size)));
        scene.add_child(scene.root(), id).unwrap();
        (scene, id)
    }

    fn actions(events: &[ButtonEvent]) -> Vec<ButtonAction> {
        events.iter().map(|e| e.action).collect()
    }

    #[test]
    fn quick_click_is_press_release_tap() {
        let (mut scene, id) = stage_with_box(Vec2::new(10.0, 10.0), 20.0);
        scene.node_mut(id).unwrap().set_interact(true);
        let mut input = Interactive::new(1.0);

        input.push(InputEvent::PointerMove { x: 15.0, y: 15.0 });
        input.push(InputEvent::PointerDown { x: 15.0, y: 15.0 });
        input.push(InputEvent::PointerUp { x: 15.0, y: 15.0 });
        input.update(&mut scene, 1.0 / 60.0);

        assert_eq!(
            actions(&input.drain_button_events()),
            vec![ButtonAction::Over, ButtonAction::Press, ButtonAction::Release, ButtonAction::Tap]
        );
        assert_eq!(input.button_state(id), ButtonState::Over);
    }

    #[test]
    fn long_press_is_not_a_tap() {
        let (mut scene, id) = stage_with_box(Vec2::ZERO, 20.0);
        scene.node_mut(id).unwrap().set_interact(true);
        let mut input = Interactive::new(1.0);

        input.push(InputEvent::PointerDown { x: 5.0, y: 5.0 });
        for _ in 0..20 {
            input.update(&mut scene, 1.0 / 60.0);
        }
        input.push(InputEvent::PointerUp { x: 5.0, y: 5.0 });
        input.update(&mut scene, 1.0 / 60.0);

        let all = actions(&input.drain_button_events());
        assert!(all.contains(&ButtonAction::Release));
        assert!(!all.contains(&ButtonAction::Tap));
    }

    #[test]
    fn leaving_fires_out_once() {
        let (mut scene, id) = stage_with_box(Vec2::ZERO, 20.0);
        scene.node_mut(id).unwrap().set_interact(true);
        let mut input = Interactive::new(1.0);

        input.push(InputEvent::PointerMove { x: 5.0, y: 5.0 });
        input.push(InputEvent::PointerMove { x: 50.0, y: 50.0 });
        input.push(InputEvent::PointerMove { x: 60.0, y: 60.0 });
        input.update(&mut scene, 1.0 / 60.0);
        assert_eq!(actions(&input.drain_button_events()), vec![ButtonAction::Over, ButtonAction::Out]);
    }

    #[test]
    fn pointer_is_divided_by_scale() {
        let (mut scene, _) = stage_with_box(Vec2::ZERO, 1.0);
        let mut input = Interactive::new(2.0);
        input.push(InputEvent::PointerMove { x: 100.0, y: 50.0 });
        input.update(&mut scene, 1.0 / 60.0);
        assert_eq!(input.pointer().position(), Vec2::new(50.0, 25.0));
    }

    #[test]
    fn drag_moves_topmost_and_raises_it() {
        let (mut scene, bottom) = stage_with_box(Vec2::ZERO, 40.0);
        let top = scene.next_id();
        scene.spawn(DisplayNode::new(top, NodeKind::Sprite).with_base_size(Vec2::splat(40.0)));
        scene.add_child(scene.root(), top).unwrap();
        let other = scene.next_id();
        scene.spawn(DisplayNode::new(other, NodeKind::Sprite).with_pos(Vec2::new(150.0, 150.0)));
        scene.add_child(scene.root(), other).unwrap();
        scene.node_mut(bottom).unwrap().set_draggable(true);
        scene.node_mut(top).unwrap().set_draggable(true);

        let mut input = Interactive::new(1.0);
        input.push(InputEvent::PointerDown { x: 10.0, y: 10.0 });
        input.push(InputEvent::PointerMove { x: 30.0, y: 15.0 });
        input.update(&mut scene, 1.0 / 60.0);

        assert_eq!(input.dragged(), Some(top));
        assert_eq!(scene.get(top).unwrap().pos, Vec2::new(20.0, 5.0));
        assert_eq!(scene.get(bottom).unwrap().pos, Vec2::ZERO);
        assert_eq!(scene.get(scene.root()).unwrap().children().last(), Some(&top));

        input.push(InputEvent::PointerUp { x: 30.0, y: 15.0 });
        input.update(&mut scene, 1.0 / 60.0);
        assert_eq!(input.dragged(), None);
    }

    #[test]
    fn keys_report_edges_only() {
        let (mut scene, _) = stage_with_box(Vec2::ZERO, 1.0);
        let mut input = Interactive::new(1.0);
        input.push(InputEvent::KeyDown { key_code: keys::SPACE });
        input.push(InputEvent::KeyDown { key_code: keys::SPACE });
        input.update(&mut scene, 1.0 / 60.0);
        assert!(input.is_key_down(keys::SPACE));
        assert_eq!(input.drain_key_events(), vec![KeyEvent { key_code: keys::SPACE, pressed: true }]);

        input.push(InputEvent::KeyUp { key_code: keys::SPACE });
        input.update(&mut scene, 1.0 / 60.0);
        assert!(!input.is_key_down(keys::SPACE));
        assert_eq!(input.drain_key_events().len(), 1);
    }

    #[test]
    fn button_frames_follow_state() {
        use crate::components::texture::{FrameRect, ScaleMode, Texture, TextureId};
        let mut scene = Scene::new(Vec2::new(100.0, 100.0));
        let id = scene.next_id();
        let textures = (0..3)
            .map(|i| Texture {
                id: TextureId(i),
                name: format!("button{i}"),
                source: "buttons.png".into(),
                frame: FrameRect::new(0.0, 0.0, 30.0, 10.0),
                scale_mode: ScaleMode::Linear,
            })
            .collect();
        scene.spawn(DisplayNode::new(id, NodeKind::Button).with_textures(textures));
        scene.add_child(scene.root(), id).unwrap();
        scene.node_mut(id).unwrap().set_interact(true);

        let mut input = Interactive::new(1.0);
        input.push(InputEvent::PointerMove { x: 5.0, y: 5.0 });
        input.update(&mut scene, 1.0 / 60.0);
        assert_eq!(scene.get(id).unwrap().frame, 1);
        input.push(InputEvent::PointerDown { x: 5.0, y: 5.0 });
        input.update(&mut scene, 1.0 / 60.0);
        assert_eq!(scene.get(id).unwrap().frame, 2);
    }
}
