pub mod augment;
pub mod lifecycle;
pub mod loading;
pub mod scene;
pub mod time;
