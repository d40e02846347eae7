//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use lumen_stage::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Stage facade
pub use crate::stage::{Stage, StageBuilder, StageError};

// Scene system
pub use crate::core::scene::{
    Scene, SceneDirector, SceneKey, SceneLifecycle, SceneRequest, StageContext,
};

// Viewport
pub use crate::core::viewport::{FitPolicy, Transform2D, ViewportTransform};

// Animation machinery
pub use crate::core::math::Vec2;
pub use crate::core::pool::particle::{flame_tint, Particle, Tint};
pub use crate::core::pool::{ObjectPool, PoolSlot};
pub use crate::core::stack::machine::{
    ease_out_cubic, StackLayout, StackTransferMachine, TransferPhase, TransferTiming,
};
pub use crate::core::stack::{Card, FaceState};

// Collaborator bridge
pub use crate::bridge::{
    AssetServer, AssetTicket, DialogueSource, FetchPoll, FetchTicket, LoadPoll,
    SceneAction, SpriteRef, SpriteSheet, TextureHandle,
};

// Built-in scene set
pub use crate::scenes::{
    CardTransferScene, DialogueScene, FlameScene, MenuScene, SceneId,
};

// Dialogue data model
pub use crate::data::{DialogueDocument, DialogueLine, SpeakerSide};
