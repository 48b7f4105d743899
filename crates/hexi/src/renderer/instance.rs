use bytemuck::{Pod, Zeroable};
use serde::Serialize;

/// What a render instance draws. Stored in `RenderInstance::kind` as a float code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RenderKind {
    Sprite = 0,
    TilingSprite = 1,
    Rectangle = 2,
    Circle = 3,
    Line = 4,
    Text = 5,
}

impl RenderKind {
    pub fn code(self) -> f32 {
        self as u8 as f32
    }
}

/// Per-node render data read by the host renderer as a flat `f32` buffer.
/// Must match the host protocol: 16 floats = 64 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct RenderInstance {
    /// Global X of the node origin.
    pub x: f32,
    /// Global Y of the node origin.
    pub y: f32,
    /// Rendered width in pixels.
    pub width: f32,
    /// Rendered height in pixels.
    pub height: f32,
    pub anchor_x: f32,
    pub anchor_y: f32,
    /// Accumulated rotation in radians.
    pub rotation: f32,
    /// Accumulated opacity.
    pub alpha: f32,
    /// Texture id, or -1 when untextured.
    pub texture: f32,
    /// 0xRRGGBB fill (exact in f32).
    pub fill: f32,
    /// 0xRRGGBB outline.
    pub stroke: f32,
    pub line_width: f32,
    /// `RenderKind` code.
    pub kind: f32,
    /// Index into `RenderBuffer::labels`, or -1.
    pub label: f32,
    /// Tile offset for tiling sprites; global end point for lines.
    pub extra_x: f32,
    pub extra_y: f32,
}

impl RenderInstance {
    pub const FLOATS: usize = 16;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Text attached to a `Text` instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderLabel {
    pub text: String,
    pub font: String,
}

/// Render buffer containing every visible node in draw order, plus text labels.
pub struct RenderBuffer {
    pub instances: Vec<RenderInstance>,
    pub labels: Vec<RenderLabel>,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self {
            instances: Vec::with_capacity(512),
            labels: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.labels.clear();
    }

    pub fn push(&mut self, instance: RenderInstance) {
        self.instances.push(instance);
    }

    /// Store a label and return its index.
    pub fn push_label(&mut self, label: RenderLabel) -> usize {
        self.labels.push(label);
        self.labels.len() - 1
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Instance data as a flat float slice.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Raw pointer to instance data for direct memory reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_instance_is_16_floats() {
        assert_eq!(std::mem::size_of::<RenderInstance>(), RenderInstance::STRIDE_BYTES);
        assert_eq!(RenderInstance::FLOATS, 16);
    }

    #[test]
    fn render_buffer_push_and_count() {
        let mut buf = RenderBuffer::new();
        buf.push(RenderInstance::default());
        buf.push(RenderInstance { x: 3.0, ..Default::default() });
        assert_eq!(buf.instance_count(), 2);
        assert_eq!(buf.as_floats().len(), 32);
        assert_eq!(buf.as_floats()[16], 3.0);
    }

    #[test]
    fn labels_are_indexed() {
        let mut buf = RenderBuffer::new();
        let label = RenderLabel { text: "Score".into(), font: "16px sans-serif".into() };
        assert_eq!(buf.push_label(label.clone()), 0);
        assert_eq!(buf.push_label(label), 1);
        buf.clear();
        assert!(buf.labels.is_empty());
    }
}
