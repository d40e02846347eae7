//=========================================================================
// Scene System
//=========================================================================
//
// Scene lifecycle contract and the director that owns the active scene.
//
// Architecture:
//   SceneDirector
//     ├─ factories: HashMap<K, SceneFactory<K>>
//     └─ active: Option<Box<dyn Scene<K>>>
//
// Flow:
//   tick() → Scene::update() → TransitionQueue → switch at tick boundary
//
//=========================================================================

//=== Internal Dependencies ===============================================

use std::any::Any;
use std::fmt::Debug;
use std::hash::Hash;

use crate::bridge::SceneAction;

//=== Module Declarations =================================================

mod context;
mod director;
mod transition_queue;

//=== Public API ==========================================================

pub use context::StageContext;
pub use director::{SceneDirector, SceneFactory, SceneLifecycle};
pub use transition_queue::{SceneRequest, TransitionQueue};

//=== Scene Key Trait =====================================================

/// Marker trait for scene identifiers.
///
/// Scene keys name registered scene factories. Typically implemented by
/// an application enum; the crate ships [`crate::scenes::SceneId`].
pub trait SceneKey: Clone + Copy + Eq + Hash + Debug + 'static {}

//=== Scene Trait =========================================================

/// One visual effect hosted by the stage.
///
/// Exactly one scene is active at a time, and the stage exclusively owns
/// its lifecycle: constructed by its factory on switch, entered, ticked,
/// and torn down before the next scene enters.
///
/// Setup that depends on a collaborator (texture decode, remote fetch)
/// resolves after `on_enter` returns; a scene must tolerate `update`
/// ticks arriving before that and treat them as no-ops until ready.
///
/// # Minimal Implementation
///
/// Only `update` and `as_any` are required. Lifecycle hooks default to
/// doing nothing.
pub trait Scene<K: SceneKey> {
    /// Called once when the scene becomes active. May kick off
    /// collaborator loads; must not assume they resolve before the
    /// first `update`.
    fn on_enter(&mut self, _ctx: &mut StageContext<K>) {}

    /// Called once when the scene is deactivated. Releases everything
    /// the scene owns: pooled entities, stacks, in-flight transfers,
    /// outstanding tickets. Runs to completion strictly before the next
    /// scene's `on_enter`.
    fn on_exit(&mut self, _ctx: &mut StageContext<K>) {}

    /// Called every tick while active, with the elapsed milliseconds
    /// since the previous tick.
    fn update(&mut self, ctx: &mut StageContext<K>, dt_ms: f64);

    /// Called after a debounced viewport-size change has been applied
    /// to the context's viewport transform.
    fn on_resize(&mut self, _ctx: &mut StageContext<K>) {}

    /// Semantic command from the external UI layer.
    fn on_action(&mut self, _ctx: &mut StageContext<K>, _action: SceneAction) {}

    /// Concrete-type access for the rendering collaborator, which reads
    /// scene-specific visual state (cards, particles, dialogue lines).
    fn as_any(&self) -> &dyn Any;
}
