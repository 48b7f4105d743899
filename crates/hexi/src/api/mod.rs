pub mod canvas;
pub mod config;
pub mod delegate;
pub mod error;
pub mod factory;
pub mod game;
pub mod hexi;
pub mod types;
