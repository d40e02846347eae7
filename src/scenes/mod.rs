//=========================================================================
// Shipped Scenes
//=========================================================================
//
// The presentation's scene set: a menu plus one scene per effect.
//
// Each scene implements the same lifecycle contract and owns its own
// machinery; the stage holds them only through the polymorphic `Scene`
// handle. `SceneId` is the key the shipped scenes are registered under;
// hosts with their own scene set can substitute any `SceneKey` enum.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::scene::SceneKey;

//=== Module Declarations =================================================

mod cards;
mod dialogue;
mod flame;
mod menu;

//=== Public API ==========================================================

pub use cards::CardTransferScene;
pub use dialogue::DialogueScene;
pub use flame::FlameScene;
pub use menu::{MenuEntry, MenuScene};

//=== SceneId =============================================================

/// Keys for the shipped scene set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneId {
    Menu,
    Cards,
    Flame,
    Dialogue,
}

impl SceneKey for SceneId {}
