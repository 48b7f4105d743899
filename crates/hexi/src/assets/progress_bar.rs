use glam::Vec2;
use crate::api::error::Result;
use crate::api::types::NodeId;
use crate::components::node::{DisplayNode, NodeKind, ShapeStyle, TextStyle};
use crate::core::scene::Scene;

pub const BAR_WIDTH: f32 = 256.0;
pub const BAR_HEIGHT: f32 = 8.0;
const BACK_COLOR: u32 = 0x808080;
const FRONT_COLOR: u32 = 0x00FFFF;
const LABEL_FONT: &str = "28px sans-serif";
const LABEL_COLOR: u32 = 0x000000;

/// A centred loading bar with a percentage label underneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressBar {
    back: NodeId,
    front: NodeId,
    label: NodeId,
}

impl ProgressBar {
    /// Add the bar to the stage, centred on the canvas.
    pub fn create(scene: &mut Scene) -> Result<Self> {
        let canvas = scene.canvas_size();
        let origin = Vec2::new(canvas.x / 2.0 - BAR_WIDTH / 2.0, canvas.y / 2.0 - BAR_HEIGHT / 2.0);
        let root = scene.root();

        let back = scene.next_id();
        scene.spawn(
            DisplayNode::new(back, NodeKind::Rectangle(ShapeStyle::filled(BACK_COLOR)))
                .with_tag("loading_bar")
                .with_pos(origin)
                .with_base_size(Vec2::new(BAR_WIDTH, BAR_HEIGHT)),
        );
        scene.add_child(root, back)?;

        let front = scene.next_id();
        scene.spawn(
            DisplayNode::new(front, NodeKind::Rectangle(ShapeStyle::filled(FRONT_COLOR)))
                .with_tag("loading_bar")
                .with_pos(origin)
                .with_base_size(Vec2::new(0.0, BAR_HEIGHT)),
        );
        scene.add_child(root, front)?;

        let style = TextStyle {
            content: "0%".to_string(),
            font: LABEL_FONT.to_string(),
            fill: LABEL_COLOR,
        };
        let label = scene.next_id();
        scene.spawn(
            DisplayNode::new(label, NodeKind::Text(style))
                .with_tag("loading_bar")
                .with_pos(origin + Vec2::new(0.0, BAR_HEIGHT * 3.0)),
        );
        scene.add_child(root, label)?;

        Ok(Self { back, front, label })
    }

    /// Stretch the front bar to `progress` percent and relabel it.
    pub fn update(&self, scene: &mut Scene, progress: f32) {
        let progress = progress.clamp(0.0, 100.0);
        if let Some(front) = scene.get_mut(self.front) {
            front.base_size.x = BAR_WIDTH * progress / 100.0;
        }
        if let Some(label) = scene.get_mut(self.label) {
            if let NodeKind::Text(style) = &mut label.kind {
                style.content = format!("{}%", progress.floor());
                label.base_size = style.estimated_size();
            }
        }
    }

    pub fn remove(self, scene: &mut Scene) {
        for id in [self.back, self.front, self.label] {
            scene.despawn(id);
        }
    }

    pub fn nodes(&self) -> [NodeId; 3] {
        [self.back, self.front, self.label]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn bar_is_centred_and_fills() {
        let mut scene = Scene::new(Vec2::new(512.0, 512.0));
        let bar = ProgressBar::create(&mut scene).unwrap();
        let [back, front, label] = bar.nodes();
        assert_relative_eq!(scene.get(back).unwrap().pos.x, 128.0);
        assert_relative_eq!(scene.get(back).unwrap().pos.y, 252.0);

        bar.update(&mut scene, 50.0);
        assert_relative_eq!(scene.size(front).x, 128.0);
        match &scene.get(label).unwrap().kind {
            NodeKind::Text(style) => assert_eq!(style.content, "50%"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn removal_clears_the_stage() {
        let mut scene = Scene::new(Vec2::new(100.0, 100.0));
        let bar = ProgressBar::create(&mut scene).unwrap();
        assert_eq!(scene.len(), 4);
        bar.remove(&mut scene);
        assert_eq!(scene.len(), 1);
    }
}
