pub mod pointer;
pub mod queue;

pub use pointer::{keys, ButtonAction, ButtonEvent, ButtonState, Interactive, KeyEvent, Pointer};
pub use queue::{InputEvent, InputQueue};
