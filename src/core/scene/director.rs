//=========================================================================
// Scene Director
//=========================================================================
//
// Owns the single active scene and mediates switches.
//
// Scene factories are registered by key; a switch tears the old scene
// down to completion, bumps the context epoch, constructs the new scene
// via its factory, and enters it. Scenes do not persist between
// activations: leaving a scene drops it, and returning rebuilds it
// fresh.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::bridge::SceneAction;
use crate::stage::StageError;
use super::{Scene, SceneKey, SceneRequest, StageContext};

//=== SceneFactory ========================================================

/// Constructor for a scene. Invoked on every switch to the key it is
/// registered under.
pub type SceneFactory<K> = Box<dyn Fn(&mut StageContext<K>) -> Box<dyn Scene<K>>>;

//=== SceneLifecycle ======================================================

/// Lifecycle phase of the director's active slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneLifecycle {
    /// No scene is active.
    Inactive,
    /// The incoming scene's `on_enter` is running.
    Entering,
    /// The scene receives ticks.
    Active,
    /// The outgoing scene's `on_exit` is running.
    Exiting,
}

//=== SceneDirector =======================================================

/// Registry of scene factories plus the one active scene.
pub struct SceneDirector<K: SceneKey> {
    factories: HashMap<K, SceneFactory<K>>,
    active: Option<(K, Box<dyn Scene<K>>)>,
    lifecycle: SceneLifecycle,
}

impl<K: SceneKey> SceneDirector<K> {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            active: None,
            lifecycle: SceneLifecycle::Inactive,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a factory for `key`. Re-registering a key replaces the
    /// previous factory.
    pub fn register(&mut self, key: K, factory: SceneFactory<K>) {
        if self.factories.insert(key, factory).is_some() {
            warn!("Scene factory {:?} was already registered and has been replaced", key);
        }
    }

    pub fn is_registered(&self, key: K) -> bool {
        self.factories.contains_key(&key)
    }

    //--- Switching --------------------------------------------------------

    /// Switches to the scene registered under `key`.
    ///
    /// The outgoing scene's `on_exit` runs to completion and the scene
    /// is dropped strictly before the new scene is constructed, so two
    /// scenes never hold shared rendering resources at once. An
    /// unregistered key is a logged no-op.
    pub fn switch_to(&mut self, key: K, ctx: &mut StageContext<K>) {
        if let Err(err) = self.try_switch_to(key, ctx) {
            warn!("Scene switch skipped: {err}");
        }
    }

    /// Like [`Self::switch_to`], but reports an unregistered key.
    pub fn try_switch_to(&mut self, key: K, ctx: &mut StageContext<K>) -> Result<(), StageError> {
        let Some(factory) = self.factories.get(&key) else {
            return Err(StageError::UnknownScene(format!("{key:?}")));
        };

        // The outgoing scene exits to completion and drops before the
        // successor is even constructed.
        if let Some((old_key, mut old_scene)) = self.active.take() {
            debug!("Exiting scene {:?}", old_key);
            self.lifecycle = SceneLifecycle::Exiting;
            old_scene.on_exit(ctx);
        }

        // New activation: outstanding loads from the old scene are now
        // stale and will never report ready.
        ctx.bump_epoch();

        debug!("Entering scene {:?}", key);
        self.lifecycle = SceneLifecycle::Entering;
        let mut scene = factory(ctx);
        scene.on_enter(ctx);

        self.active = Some((key, scene));
        self.lifecycle = SceneLifecycle::Active;
        Ok(())
    }

    /// Tears down the active scene without activating a successor.
    pub fn shutdown(&mut self, ctx: &mut StageContext<K>) {
        if let Some((key, mut scene)) = self.active.take() {
            debug!("Shutting down active scene {:?}", key);
            self.lifecycle = SceneLifecycle::Exiting;
            scene.on_exit(ctx);
        }
        self.lifecycle = SceneLifecycle::Inactive;
        ctx.bump_epoch();
    }

    //--- Per-Tick Forwarding ----------------------------------------------

    pub fn update(&mut self, ctx: &mut StageContext<K>, dt_ms: f64) {
        if let Some((_, scene)) = self.active.as_mut() {
            scene.update(ctx, dt_ms);
        }
    }

    pub fn resize(&mut self, ctx: &mut StageContext<K>) {
        if let Some((_, scene)) = self.active.as_mut() {
            scene.on_resize(ctx);
        }
    }

    pub fn dispatch(&mut self, ctx: &mut StageContext<K>, action: SceneAction) {
        if let Some((_, scene)) = self.active.as_mut() {
            scene.on_action(ctx, action);
        }
    }

    /// Applies the scene requests queued during this tick.
    pub fn process_transitions(&mut self, ctx: &mut StageContext<K>) {
        for request in ctx.transitions.take() {
            match request {
                SceneRequest::SwitchTo(key) => self.switch_to(key, ctx),
            }
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn active_key(&self) -> Option<K> {
        self.active.as_ref().map(|(key, _)| *key)
    }

    pub fn lifecycle(&self) -> SceneLifecycle {
        self.lifecycle
    }

    pub fn active_scene(&self) -> Option<&dyn Scene<K>> {
        self.active.as_ref().map(|(_, scene)| scene.as_ref())
    }

    pub fn active_scene_mut(&mut self) -> Option<&mut (dyn Scene<K> + 'static)> {
        self.active.as_mut().map(|(_, scene)| scene.as_mut())
    }
}

impl<K: SceneKey> Default for SceneDirector<K> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{NullAssetServer, NullDialogueSource};
    use crate::core::viewport::{FitPolicy, ViewportTransform};
    use std::any::Any;
    use std::cell::RefCell;
    use std::rc::Rc;

    //--- Test Helpers -----------------------------------------------------

    #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
    enum TestKey {
        A,
        B,
    }

    impl SceneKey for TestKey {}

    type Journal = Rc<RefCell<Vec<String>>>;

    /// Scene that journals its lifecycle calls.
    struct ProbeScene {
        name: &'static str,
        journal: Journal,
    }

    impl Scene<TestKey> for ProbeScene {
        fn on_enter(&mut self, _ctx: &mut StageContext<TestKey>) {
            self.journal.borrow_mut().push(format!("enter {}", self.name));
        }

        fn on_exit(&mut self, _ctx: &mut StageContext<TestKey>) {
            self.journal.borrow_mut().push(format!("exit {}", self.name));
        }

        fn update(&mut self, _ctx: &mut StageContext<TestKey>, _dt_ms: f64) {
            self.journal.borrow_mut().push(format!("update {}", self.name));
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn context() -> StageContext<TestKey> {
        StageContext::new(
            ViewportTransform::new(1280.0, 720.0, FitPolicy::Fit),
            Box::new(NullAssetServer),
            Box::new(NullDialogueSource),
            fastrand::Rng::with_seed(1),
        )
    }

    fn probe_factory(name: &'static str, journal: &Journal) -> SceneFactory<TestKey> {
        let journal = Rc::clone(journal);
        Box::new(move |_ctx| {
            Box::new(ProbeScene { name, journal: Rc::clone(&journal) })
        })
    }

    //=====================================================================
    // Switching Tests
    //=====================================================================

    #[test]
    fn switch_activates_registered_scene() {
        let journal: Journal = Rc::default();
        let mut ctx = context();
        let mut director = SceneDirector::new();
        director.register(TestKey::A, probe_factory("a", &journal));

        assert_eq!(director.lifecycle(), SceneLifecycle::Inactive);
        director.switch_to(TestKey::A, &mut ctx);

        assert_eq!(director.active_key(), Some(TestKey::A));
        assert_eq!(director.lifecycle(), SceneLifecycle::Active);
        assert_eq!(*journal.borrow(), vec!["enter a"]);
    }

    #[test]
    fn exit_runs_to_completion_before_successor_enters() {
        let journal: Journal = Rc::default();
        let mut ctx = context();
        let mut director = SceneDirector::new();
        director.register(TestKey::A, probe_factory("a", &journal));
        director.register(TestKey::B, probe_factory("b", &journal));

        director.switch_to(TestKey::A, &mut ctx);
        director.update(&mut ctx, 16.0);
        director.switch_to(TestKey::B, &mut ctx);

        assert_eq!(
            *journal.borrow(),
            vec!["enter a", "update a", "exit a", "enter b"]
        );
    }

    #[test]
    fn unregistered_key_is_a_no_op() {
        let journal: Journal = Rc::default();
        let mut ctx = context();
        let mut director = SceneDirector::new();
        director.register(TestKey::A, probe_factory("a", &journal));

        director.switch_to(TestKey::A, &mut ctx);
        director.switch_to(TestKey::B, &mut ctx);

        // The active scene survives and was not exited.
        assert_eq!(director.active_key(), Some(TestKey::A));
        assert_eq!(*journal.borrow(), vec!["enter a"]);

        assert_eq!(
            director.try_switch_to(TestKey::B, &mut ctx),
            Err(StageError::UnknownScene("B".to_owned()))
        );
    }

    #[test]
    fn switch_bumps_the_epoch() {
        let journal: Journal = Rc::default();
        let mut ctx = context();
        let mut director = SceneDirector::new();
        director.register(TestKey::A, probe_factory("a", &journal));

        let before = ctx.epoch();
        director.switch_to(TestKey::A, &mut ctx);
        assert_eq!(ctx.epoch(), before + 1);
    }

    #[test]
    fn update_without_active_scene_is_harmless() {
        let mut ctx = context();
        let mut director: SceneDirector<TestKey> = SceneDirector::new();
        director.update(&mut ctx, 16.0);
        director.resize(&mut ctx);
        director.dispatch(&mut ctx, SceneAction::Back);
    }

    #[test]
    fn returning_to_a_scene_rebuilds_it() {
        let journal: Journal = Rc::default();
        let mut ctx = context();
        let mut director = SceneDirector::new();
        director.register(TestKey::A, probe_factory("a", &journal));
        director.register(TestKey::B, probe_factory("b", &journal));

        director.switch_to(TestKey::A, &mut ctx);
        director.switch_to(TestKey::B, &mut ctx);
        director.switch_to(TestKey::A, &mut ctx);

        assert_eq!(
            *journal.borrow(),
            vec!["enter a", "exit a", "enter b", "exit b", "enter a"]
        );
    }

    #[test]
    fn shutdown_exits_and_deactivates() {
        let journal: Journal = Rc::default();
        let mut ctx = context();
        let mut director = SceneDirector::new();
        director.register(TestKey::A, probe_factory("a", &journal));

        director.switch_to(TestKey::A, &mut ctx);
        director.shutdown(&mut ctx);

        assert_eq!(director.active_key(), None);
        assert_eq!(director.lifecycle(), SceneLifecycle::Inactive);
        assert_eq!(*journal.borrow(), vec!["enter a", "exit a"]);
    }

    //=====================================================================
    // Transition Queue Tests
    //=====================================================================

    #[test]
    fn queued_requests_apply_at_the_boundary() {
        let journal: Journal = Rc::default();
        let mut ctx = context();
        let mut director = SceneDirector::new();
        director.register(TestKey::A, probe_factory("a", &journal));
        director.register(TestKey::B, probe_factory("b", &journal));

        director.switch_to(TestKey::A, &mut ctx);
        ctx.transitions.push(SceneRequest::SwitchTo(TestKey::B));
        director.process_transitions(&mut ctx);

        assert_eq!(director.active_key(), Some(TestKey::B));
    }
}
