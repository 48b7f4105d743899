use crate::api::config::HexiConfig;

/// A game value driven by a runner.
///
/// The game owns its own state; the facade owns the display tree and the
/// lifecycle. `config` names the surface, the assets and the setup/load
/// callbacks the facade will call back into with `&mut Self`.
pub trait Game: Sized {
    /// Return the facade configuration. Called once, before construction.
    fn config(&self) -> HexiConfig<Self>;
}
