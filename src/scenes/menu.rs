//=========================================================================
// Menu Scene
//=========================================================================
//
// Entry point scene: a titled list of entries, each targeting another
// scene. The external UI layer draws the entries and maps clicks to
// `SceneAction::Select(index)`; this scene only decides what a
// selection means.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;

use log::info;

//=== Internal Dependencies ===============================================

use crate::bridge::SceneAction;
use crate::core::scene::{Scene, SceneKey, SceneRequest, StageContext};

//=== MenuEntry ===========================================================

/// One selectable menu row.
#[derive(Debug, Clone)]
pub struct MenuEntry<K: SceneKey> {
    pub label: String,
    pub target: K,
}

//=== MenuScene ===========================================================

/// The scene-selection menu.
pub struct MenuScene<K: SceneKey> {
    title: String,
    subtitle: String,
    entries: Vec<MenuEntry<K>>,
}

impl<K: SceneKey> MenuScene<K> {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            entries: Vec::new(),
        }
    }

    /// Appends an entry. Builder-style so hosts can chain the full menu.
    pub fn with_entry(mut self, label: impl Into<String>, target: K) -> Self {
        self.entries.push(MenuEntry { label: label.into(), target });
        self
    }

    //--- Queries (for the rendering collaborator) ------------------------

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    pub fn entries(&self) -> &[MenuEntry<K>] {
        &self.entries
    }
}

impl<K: SceneKey> Scene<K> for MenuScene<K> {
    fn on_enter(&mut self, _ctx: &mut StageContext<K>) {
        info!("Entered menu ({} entries)", self.entries.len());
    }

    fn update(&mut self, _ctx: &mut StageContext<K>, _dt_ms: f64) {
        // Static scene; nothing animates.
    }

    fn on_action(&mut self, ctx: &mut StageContext<K>, action: SceneAction) {
        if let SceneAction::Select(index) = action {
            if let Some(entry) = self.entries.get(index) {
                info!("Menu selected '{}'", entry.label);
                ctx.transitions.push(SceneRequest::SwitchTo(entry.target));
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
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

    #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
    enum TestKey {
        Menu,
        Other,
    }

    impl SceneKey for TestKey {}

    fn context() -> StageContext<TestKey> {
        StageContext::new(
            ViewportTransform::new(1280.0, 720.0, FitPolicy::Fit),
            Box::new(NullAssetServer),
            Box::new(NullDialogueSource),
            fastrand::Rng::with_seed(1),
        )
    }

    fn menu() -> MenuScene<TestKey> {
        MenuScene::new("Showcase", "Select a scene")
            .with_entry("First", TestKey::Other)
            .with_entry("Second", TestKey::Menu)
    }

    #[test]
    fn select_queues_a_switch_to_the_entry_target() {
        let mut ctx = context();
        let mut scene = menu();

        scene.on_action(&mut ctx, SceneAction::Select(0));

        assert_eq!(
            ctx.transitions.take(),
            vec![SceneRequest::SwitchTo(TestKey::Other)]
        );
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let mut ctx = context();
        let mut scene = menu();

        scene.on_action(&mut ctx, SceneAction::Select(99));
        assert!(ctx.transitions.is_empty());
    }

    #[test]
    fn non_select_actions_are_ignored() {
        let mut ctx = context();
        let mut scene = menu();

        scene.on_action(&mut ctx, SceneAction::Next);
        scene.on_action(&mut ctx, SceneAction::Back);
        assert!(ctx.transitions.is_empty());
    }

    #[test]
    fn exposes_entries_for_rendering() {
        let scene = menu();
        assert_eq!(scene.title(), "Showcase");
        assert_eq!(scene.entries().len(), 2);
        assert_eq!(scene.entries()[0].label, "First");
    }
}
