//=========================================================================
// Lumen Stage — Library Root
//
// This crate defines the public API surface of the Lumen Stage
// presentation host.
//
// Responsibilities:
// - Expose the host facade (`Stage`, `StageBuilder`)
// - Expose the core systems (`core`) for hosts that compose their own
//   scenes
// - Expose the collaborator interfaces (`bridge`) the surrounding
//   application implements: asset loading, remote data, UI commands
// - Ship the built-in scene set (`scenes`) and the dialogue data model
//   (`data`)
//
// Typical usage:
// ```no_run
// use lumen_stage::prelude::*;
// use lumen_stage::scenes::{
//     CardTransferScene, DialogueScene, FlameScene, MenuScene, SceneId,
// };
//
// let mut stage: Stage<SceneId> = StageBuilder::new().build();
//
// stage.register(SceneId::Menu, |_ctx| {
//     Box::new(
//         MenuScene::new("Showcase", "Select a scene")
//             .with_entry("Ace of Shadows", SceneId::Cards)
//             .with_entry("Magic Words", SceneId::Dialogue)
//             .with_entry("Phoenix Flame", SceneId::Flame),
//     )
// });
// stage.register(SceneId::Cards, |_ctx| {
//     Box::new(CardTransferScene::new(SceneId::Menu, "assets/cards.png"))
// });
// stage.register(SceneId::Flame, |_ctx| {
//     Box::new(FlameScene::new(SceneId::Menu, "assets/ember.png"))
// });
// stage.register(SceneId::Dialogue, |_ctx| {
//     Box::new(DialogueScene::new(SceneId::Menu))
// });
//
// stage.switch_to(SceneId::Menu);
//
// // Driven by the external frame clock:
// stage.tick(1000.0 / 60.0);
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the stage's internal systems (viewport, scenes, the
// transfer machine, the particle pool). It is exposed publicly so hosts
// can build their own scenes on the same machinery, but typical
// application code mostly uses the top-level `Stage` facade.
//
// `bridge` is the collaborator boundary: the traits and handle types
// the surrounding application implements.
//
// `data` models the remote dialogue document; `scenes` ships the
// built-in scene set.
//
pub mod bridge;
pub mod core;
pub mod data;
pub mod scenes;

//--- Internal Modules ----------------------------------------------------
//
// `stage` defines the host facade and its builder.
//
mod stage;

pub mod prelude;

//--- Public Exports ------------------------------------------------------
//
// Re-exports the facade types so applications can simply
// `use lumen_stage::{Stage, StageBuilder};`.
//
pub use stage::{Stage, StageBuilder, StageError};
