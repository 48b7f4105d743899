use glam::{Affine2, Vec2};
use crate::api::config::InterpolationProperties;
use crate::api::types::NodeId;
use crate::components::node::{DisplayNode, NodeKind};
use crate::core::scene::Scene;
use crate::extensions::easing::{lerp, lerp_vec2};
use crate::renderer::instance::{RenderBuffer, RenderInstance, RenderKind, RenderLabel};

/// How far between the previous and current logic state to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interpolation {
    pub alpha: f32,
    pub properties: InterpolationProperties,
}

/// Node values after optional interpolation.
struct Local {
    pos: Vec2,
    rotation: f32,
    scale: Vec2,
    alpha: f32,
}

fn blended(node: &DisplayNode, interpolation: Option<Interpolation>) -> Local {
    let mut local = Local {
        pos: node.pos,
        rotation: node.rotation,
        scale: node.scale,
        alpha: node.alpha,
    };
    let (Some(lerp_by), Some(prev)) = (interpolation, node.previous()) else {
        return local;
    };
    let t = lerp_by.alpha;
    let props = lerp_by.properties;
    if props.position {
        local.pos = lerp_vec2(prev.pos, node.pos, t);
    }
    if props.rotation {
        local.rotation = lerp(prev.rotation, node.rotation, t);
    }
    if props.size {
        local.scale = lerp_vec2(prev.scale, node.scale, t);
    }
    if props.alpha {
        local.alpha = lerp(prev.alpha, node.alpha, t);
    }
    local
}

/// Rebuild the render buffer from the display tree.
///
/// Walks visible nodes depth-first in child order, so sibling order (and
/// therefore layer order) is draw order. Containers contribute only their
/// transform and alpha.
pub fn build_render_buffer(scene: &Scene, buffer: &mut RenderBuffer, interpolation: Option<Interpolation>) {
    buffer.clear();
    let Some(stage) = scene.get(scene.root()) else {
        return;
    };
    for &child in stage.children() {
        visit(scene, child, Affine2::IDENTITY, 0.0, Vec2::ONE, 1.0, buffer, interpolation);
    }
}

#[allow(clippy::too_many_arguments)]
fn visit(
    scene: &Scene,
    id: NodeId,
    parent_world: Affine2,
    parent_rotation: f32,
    parent_scale: Vec2,
    parent_alpha: f32,
    buffer: &mut RenderBuffer,
    interpolation: Option<Interpolation>,
) {
    let Some(node) = scene.get(id) else {
        return;
    };
    if !node.visible {
        return;
    }

    let local = blended(node, interpolation);
    let world = parent_world * Affine2::from_scale_angle_translation(local.scale, local.rotation, local.pos);
    let origin = parent_world.transform_point2(local.pos);
    let rotation = parent_rotation + local.rotation;
    let scale = parent_scale * local.scale;
    let alpha = parent_alpha * local.alpha;

    if let Some(kind) = render_kind(&node.kind) {
        let size = scene.unscaled_size(id) * scale.abs();
        let anchor = node.anchor.unwrap_or(Vec2::ZERO);
        let mut instance = RenderInstance {
            x: origin.x,
            y: origin.y,
            width: size.x,
            height: size.y,
            anchor_x: anchor.x,
            anchor_y: anchor.y,
            rotation,
            alpha,
            texture: node.texture().map_or(-1.0, |t| t.id.0 as f32),
            fill: 0.0,
            stroke: 0.0,
            line_width: 0.0,
            kind: kind.code(),
            label: -1.0,
            extra_x: 0.0,
            extra_y: 0.0,
        };
        match &node.kind {
            NodeKind::TilingSprite { tile_offset } => {
                instance.extra_x = tile_offset.x;
                instance.extra_y = tile_offset.y;
            }
            NodeKind::Rectangle(style) | NodeKind::Circle(style) => {
                instance.fill = style.fill as f32;
                instance.stroke = style.stroke as f32;
                instance.line_width = style.line_width;
            }
            NodeKind::Line { a, b, stroke, width } => {
                let start = world.transform_point2(*a);
                let end = world.transform_point2(*b);
                instance.x = start.x;
                instance.y = start.y;
                instance.extra_x = end.x;
                instance.extra_y = end.y;
                instance.stroke = *stroke as f32;
                instance.line_width = *width;
            }
            NodeKind::Text(style) => {
                instance.fill = style.fill as f32;
                let index = buffer.push_label(RenderLabel {
                    text: style.content.clone(),
                    font: style.font.clone(),
                });
                instance.label = index as f32;
            }
            _ => {}
        }
        buffer.push(instance);
    }

    for &child in node.children() {
        visit(scene, child, world, rotation, scale, alpha, buffer, interpolation);
    }
}

fn render_kind(kind: &NodeKind) -> Option<RenderKind> {
    match kind {
        NodeKind::Container => None,
        NodeKind::Sprite | NodeKind::Button => Some(RenderKind::Sprite),
        NodeKind::TilingSprite { .. } => Some(RenderKind::TilingSprite),
        NodeKind::Rectangle(_) => Some(RenderKind::Rectangle),
        NodeKind::Circle(_) => Some(RenderKind::Circle),
        NodeKind::Line { .. } => Some(RenderKind::Line),
        NodeKind::Text(_) => Some(RenderKind::Text),
    }
}
