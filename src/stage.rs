//=========================================================================
// Stage
//=========================================================================
//
// Main entry point and coordinator for the presentation host.
//
// Architecture:
// ```text
//     StageBuilder  ──build()──>  Stage  ──tick(dt)──>  active Scene
//         │                        │
//         ├─ with_design_size()    ├─ SceneDirector (factories, active)
//         ├─ with_fit_policy()     ├─ StageContext  (viewport, queue,
//         ├─ with_asset_server()   │                 collaborators, rng)
//         └─ with_dialogue_source()├─ ResizeDebouncer
//                                  └─ FpsMeter
// ```
//
// Single-threaded and cooperative: the external frame clock calls
// `tick`, the viewport collaborator calls `notify_resize`, the UI layer
// calls `command`. All scene mutation happens synchronously inside
// those calls.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::info;
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::bridge::{
    AssetServer, DialogueSource, NullAssetServer, NullDialogueSource, SceneAction,
};
use crate::core::scene::{
    Scene, SceneDirector, SceneKey, SceneLifecycle, StageContext,
};
use crate::core::timing::{FpsMeter, ResizeDebouncer};
use crate::core::viewport::{FitPolicy, ViewportTransform};

//=== StageError ==========================================================

/// Host-level misuse the stage reports instead of panicking.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StageError {
    /// `try_switch_to` named a key with no registered factory.
    #[error("scene {0} is not registered")]
    UnknownScene(String),
}

//=== StageBuilder ========================================================

/// Builder for configuring and constructing a [`Stage`].
///
/// # Default Values
///
/// - **Design size**: 1280 x 720
/// - **Fit policy**: [`FitPolicy::Fit`]
/// - **Resize debounce**: 100 ms
/// - **Collaborators**: null implementations (loads fail, scenes fall
///   back to placeholders)
/// - **RNG**: seeded from entropy; fix with [`StageBuilder::with_seed`]
///
/// # Examples
///
/// ```
/// use lumen_stage::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Key { Menu }
/// impl SceneKey for Key {}
///
/// let stage: Stage<Key> = StageBuilder::new()
///     .with_design_size(1280.0, 720.0)
///     .with_fit_policy(FitPolicy::Fit)
///     .build();
/// ```
pub struct StageBuilder<K: SceneKey> {
    design_w: f32,
    design_h: f32,
    policy: FitPolicy,
    debounce_ms: f64,
    seed: Option<u64>,
    assets: Option<Box<dyn AssetServer>>,
    dialogue: Option<Box<dyn DialogueSource>>,
    _phantom: std::marker::PhantomData<K>,
}

impl<K: SceneKey> StageBuilder<K> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            design_w: 1280.0,
            design_h: 720.0,
            policy: FitPolicy::Fit,
            debounce_ms: ResizeDebouncer::DEFAULT_WINDOW_MS,
            seed: None,
            assets: None,
            dialogue: None,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Sets the design-surface resolution all scenes are authored
    /// against.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is not positive.
    pub fn with_design_size(mut self, width: f32, height: f32) -> Self {
        assert!(
            width > 0.0 && height > 0.0,
            "Design size must be positive, got {}x{}",
            width,
            height
        );
        self.design_w = width;
        self.design_h = height;
        self
    }

    /// Sets the initial fit policy. Scenes may change it later through
    /// the context's viewport.
    pub fn with_fit_policy(mut self, policy: FitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the quiet window for coalescing resize bursts.
    ///
    /// # Panics
    ///
    /// Panics if `window_ms` is negative.
    pub fn with_resize_debounce_ms(mut self, window_ms: f64) -> Self {
        assert!(window_ms >= 0.0, "Debounce window must not be negative");
        self.debounce_ms = window_ms;
        self
    }

    /// Fixes the RNG seed for deterministic runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Installs the asset-loading collaborator.
    pub fn with_asset_server(mut self, assets: impl AssetServer + 'static) -> Self {
        self.assets = Some(Box::new(assets));
        self
    }

    /// Installs the remote-dialogue collaborator.
    pub fn with_dialogue_source(mut self, dialogue: impl DialogueSource + 'static) -> Self {
        self.dialogue = Some(Box::new(dialogue));
        self
    }

    /// Builds the stage instance.
    pub fn build(self) -> Stage<K> {
        info!(
            "Building stage (design {}x{}, policy {:?})",
            self.design_w, self.design_h, self.policy
        );

        let rng = match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };

        let ctx = StageContext::new(
            ViewportTransform::new(self.design_w, self.design_h, self.policy),
            self.assets.unwrap_or_else(|| Box::new(NullAssetServer)),
            self.dialogue.unwrap_or_else(|| Box::new(NullDialogueSource)),
            rng,
        );

        Stage {
            director: SceneDirector::new(),
            ctx,
            debouncer: ResizeDebouncer::new(self.debounce_ms),
            fps: FpsMeter::default(),
        }
    }
}

impl<K: SceneKey> Default for StageBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Stage ===============================================================

/// The presentation host: one active scene, one frame clock input, one
/// viewport transform.
///
/// # Lifecycle
///
/// 1. Register scene factories with [`Stage::register`]
/// 2. Activate the first scene with [`Stage::switch_to`]
/// 3. Forward frame-clock ticks to [`Stage::tick`]
/// 4. Forward viewport changes to [`Stage::notify_resize`]
/// 5. Forward UI commands to [`Stage::command`]
pub struct Stage<K: SceneKey> {
    director: SceneDirector<K>,
    ctx: StageContext<K>,
    debouncer: ResizeDebouncer,
    fps: FpsMeter,
}

impl<K: SceneKey> Stage<K> {
    //--- Registration -----------------------------------------------------

    /// Registers a scene factory under `key`. The factory runs on every
    /// switch to that key.
    pub fn register<F>(&mut self, key: K, factory: F)
    where
        F: Fn(&mut StageContext<K>) -> Box<dyn Scene<K>> + 'static,
    {
        self.director.register(key, Box::new(factory));
    }

    //--- Switching --------------------------------------------------------

    /// Switches scenes immediately: the active scene exits and is
    /// dropped, then the keyed scene is constructed and entered. An
    /// unregistered key is a logged no-op.
    pub fn switch_to(&mut self, key: K) {
        self.director.switch_to(key, &mut self.ctx);
    }

    /// Like [`Stage::switch_to`] but reports an unregistered key.
    pub fn try_switch_to(&mut self, key: K) -> Result<(), StageError> {
        self.director.try_switch_to(key, &mut self.ctx)
    }

    /// Tears down the active scene without a successor.
    pub fn shutdown(&mut self) {
        self.director.shutdown(&mut self.ctx);
    }

    //--- Frame Clock ------------------------------------------------------

    /// Advances one frame.
    ///
    /// Order per tick: apply a debounced resize if one matured, update
    /// the active scene, apply scene-queued switches, account the frame.
    pub fn tick(&mut self, dt_ms: f64) {
        if let Some((width, height)) = self.debouncer.tick(dt_ms) {
            self.ctx.viewport.resize(width, height);
            self.director.resize(&mut self.ctx);
        }

        self.director.update(&mut self.ctx, dt_ms);
        self.director.process_transitions(&mut self.ctx);

        self.fps.tick(dt_ms);
    }

    //--- External Events --------------------------------------------------

    /// Records a viewport size change. Bursts coalesce; the final size
    /// reaches the viewport transform one debounce window after the
    /// last event.
    pub fn notify_resize(&mut self, width: f32, height: f32) {
        self.debouncer.note(width, height);
    }

    /// Forwards a semantic UI command to the active scene.
    pub fn command(&mut self, action: SceneAction) {
        self.director.dispatch(&mut self.ctx, action);
    }

    //--- Queries ----------------------------------------------------------

    pub fn context(&self) -> &StageContext<K> {
        &self.ctx
    }

    pub fn active_key(&self) -> Option<K> {
        self.director.active_key()
    }

    pub fn lifecycle(&self) -> SceneLifecycle {
        self.director.lifecycle()
    }

    /// The active scene, for the rendering collaborator to downcast via
    /// [`Scene::as_any`].
    pub fn scene(&self) -> Option<&dyn Scene<K>> {
        self.director.active_scene()
    }

    pub fn fps(&self) -> &FpsMeter {
        &self.fps
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
