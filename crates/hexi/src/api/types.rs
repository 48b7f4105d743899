use bytemuck::{Pod, Zeroable};

/// Unique identifier for a node in the display tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Host-side handle for a decoded sound.
/// The browser keeps the decoded buffer; Rust only stores the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub u32);

/// A request for the host to play a decoded sound this frame.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SoundEvent {
    /// Raw value of the `SoundHandle` to play.
    pub handle: u32,
    /// Playback volume, 0.0 to 1.0.
    pub volume: f32,
}

impl SoundEvent {
    pub const FLOATS: usize = 2;
}
