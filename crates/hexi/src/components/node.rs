use glam::Vec2;
use crate::api::types::NodeId;
use crate::components::animation::FramePlayer;
use crate::components::texture::Texture;

/// Fill and outline for rectangles and circles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    /// 0xRRGGBB fill colour.
    pub fill: u32,
    /// 0xRRGGBB outline colour.
    pub stroke: u32,
    /// Outline width in pixels (0 = no outline).
    pub line_width: f32,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: 0xFF3300,
            stroke: 0x0033CC,
            line_width: 0.0,
        }
    }
}

impl ShapeStyle {
    pub fn filled(fill: u32) -> Self {
        Self {
            fill,
            line_width: 0.0,
            ..Default::default()
        }
    }

    pub fn with_stroke(mut self, stroke: u32, line_width: f32) -> Self {
        self.stroke = stroke;
        self.line_width = line_width;
        self
    }
}

/// Text content and style.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub content: String,
    /// CSS-style font shorthand, e.g. "32px Futura".
    pub font: String,
    /// 0xRRGGBB fill colour.
    pub fill: u32,
}

impl TextStyle {
    /// Pixel size parsed from the font shorthand, 16 when absent.
    pub fn font_px(&self) -> f32 {
        self.font
            .split_whitespace()
            .find_map(|part| part.strip_suffix("px").and_then(|n| n.parse::<f32>().ok()))
            .unwrap_or(16.0)
    }

    /// Estimated size until the host reports measured metrics.
    pub fn estimated_size(&self) -> Vec2 {
        let px = self.font_px();
        Vec2::new(self.content.chars().count() as f32 * px * 0.5, px)
    }
}

/// What a node draws.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Groups children; has no visuals or anchor of its own.
    Container,
    /// Textured quad, possibly with several frames.
    Sprite,
    /// Sprite whose frames follow pointer state (up, over, down).
    Button,
    /// Sprite whose texture repeats, scrolled by `tile_offset`.
    TilingSprite { tile_offset: Vec2 },
    Rectangle(ShapeStyle),
    Circle(ShapeStyle),
    /// Line segment from `a` to `b` in local space.
    Line { a: Vec2, b: Vec2, stroke: u32, width: f32 },
    Text(TextStyle),
}

impl NodeKind {
    /// Whether nodes of this kind carry an anchor.
    pub fn has_anchor(&self) -> bool {
        !matches!(self, NodeKind::Container | NodeKind::Line { .. })
    }

    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Container)
    }
}

/// Values captured before a logic update so renders can interpolate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub pos: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
    pub alpha: f32,
}

/// A node of the display tree.
///
/// Intrinsic fields are public. Fields that belong to the augmentation
/// contract (layer, circular, interact, draggable, pivot memory) are only
/// reachable through `NodeRef`/`NodeMut` so their side effects always run.
#[derive(Debug, Clone)]
pub struct DisplayNode {
    pub id: NodeId,
    /// Free-form name for finding nodes.
    pub tag: String,
    pub kind: NodeKind,
    /// Position in the parent's space.
    pub pos: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    pub scale: Vec2,
    pub visible: bool,
    pub alpha: f32,
    /// Normalised origin inside the bounding box; `None` for groups and lines.
    pub anchor: Option<Vec2>,
    /// Unscaled size of the texture or geometry.
    pub base_size: Vec2,
    /// Velocity in pixels per frame. A convention; nothing applies it automatically.
    pub vel: Vec2,
    /// Texture frames; the current one is `textures[frame]`.
    pub textures: Vec<Texture>,
    pub frame: usize,
    pub player: Option<FramePlayer>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) layer: i32,
    pub(crate) circular: bool,
    pub(crate) interact: bool,
    pub(crate) draggable: bool,
    pub(crate) prev_pivot: Vec2,
    pub(crate) augmented: bool,
    pub(crate) is_stage: bool,
    pub(crate) previous: Option<Snapshot>,
}

impl DisplayNode {
    /// Create a detached node of the given kind at the origin.
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        let anchor = kind.has_anchor().then_some(Vec2::ZERO);
        let base_size = match &kind {
            NodeKind::Line { a, b, .. } => (*b - *a).abs(),
            NodeKind::Text(style) => style.estimated_size(),
            _ => Vec2::ZERO,
        };
        Self {
            id,
            tag: String::new(),
            kind,
            pos: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            visible: true,
            alpha: 1.0,
            anchor,
            base_size,
            vel: Vec2::ZERO,
            textures: Vec::new(),
            frame: 0,
            player: None,
            parent: None,
            children: Vec::new(),
            layer: 0,
            circular: false,
            interact: false,
            draggable: false,
            prev_pivot: Vec2::ZERO,
            augmented: false,
            is_stage: false,
            previous: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_base_size(mut self, size: Vec2) -> Self {
        self.base_size = size;
        self
    }

    /// Attach texture frames; the first frame sets the base size.
    pub fn with_textures(mut self, textures: Vec<Texture>) -> Self {
        if let Some(first) = textures.first() {
            self.base_size = first.size();
        }
        self.textures = textures;
        self.frame = 0;
        self
    }

    /// The texture currently shown, if any.
    pub fn texture(&self) -> Option<&Texture> {
        self.textures.get(self.frame)
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_stage(&self) -> bool {
        self.is_stage
    }

    pub fn is_augmented(&self) -> bool {
        self.augmented
    }

    /// Record the current values as the interpolation start point.
    pub fn capture(&mut self) {
        self.previous = Some(Snapshot {
            pos: self.pos,
            rotation: self.rotation,
            scale: self.scale,
            alpha: self.alpha,
        });
    }

    pub fn previous(&self) -> Option<&Snapshot> {
        self.previous.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::texture::{FrameRect, ScaleMode, TextureId};

    fn texture(w: f32, h: f32) -> Texture {
        Texture {
            id: TextureId(0),
            name: "cat.png".into(),
            source: "cat.png".into(),
            frame: FrameRect::new(0.0, 0.0, w, h),
            scale_mode: ScaleMode::Linear,
        }
    }

    #[test]
    fn containers_and_lines_have_no_anchor() {
        assert!(DisplayNode::new(NodeId(1), NodeKind::Container).anchor.is_none());
        let line = NodeKind::Line { a: Vec2::ZERO, b: Vec2::new(10.0, 4.0), stroke: 0, width: 1.0 };
        let node = DisplayNode::new(NodeId(2), line);
        assert!(node.anchor.is_none());
        assert_eq!(node.base_size, Vec2::new(10.0, 4.0));
    }

    #[test]
    fn sprites_start_anchored_top_left() {
        let node = DisplayNode::new(NodeId(1), NodeKind::Sprite);
        assert_eq!(node.anchor, Some(Vec2::ZERO));
    }

    #[test]
    fn textures_set_base_size() {
        let node = DisplayNode::new(NodeId(1), NodeKind::Sprite)
            .with_textures(vec![texture(32.0, 48.0)]);
        assert_eq!(node.base_size, Vec2::new(32.0, 48.0));
        assert_eq!(node.texture().map(|t| t.name.as_str()), Some("cat.png"));
    }

    #[test]
    fn text_size_follows_font_px() {
        let style = TextStyle {
            content: "Hello".into(),
            font: "bold 20px Futura".into(),
            fill: 0,
        };
        assert_eq!(style.font_px(), 20.0);
        assert_eq!(style.estimated_size(), Vec2::new(50.0, 20.0));
    }

    #[test]
    fn capture_records_snapshot() {
        let mut node = DisplayNode::new(NodeId(1), NodeKind::Sprite).with_pos(Vec2::new(3.0, 4.0));
        assert!(node.previous().is_none());
        node.capture();
        assert_eq!(node.previous().map(|s| s.pos), Some(Vec2::new(3.0, 4.0)));
    }
}
