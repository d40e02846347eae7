//=========================================================================
// Card Transfer Scene
//=========================================================================
//
// "Ace of Shadows": a tall stack of cards transfers to a second stack,
// one card per second, each card flying an eased path with a mid-flight
// flip.
//
// Setup is asynchronous: the card sheet texture resolves through the
// asset collaborator. Until it does, updates are no-ops; on failure the
// scene builds its cards over the placeholder texture instead.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;

use log::{info, warn};

//=== Internal Dependencies ===============================================

use crate::bridge::{AssetTicket, LoadPoll, SceneAction, SpriteRef, SpriteSheet, TextureHandle};
use crate::core::math::Vec2;
use crate::core::scene::{Scene, SceneKey, SceneRequest, StageContext};
use crate::core::stack::machine::{StackLayout, StackTransferMachine, TransferTiming};
use crate::core::stack::Card;

//=== CardTransferScene ===================================================

/// Scene running the two-stack card transfer effect.
pub struct CardTransferScene<K: SceneKey> {
    back_target: K,
    sheet_path: String,
    sheet_ticket: Option<AssetTicket>,
    sheet: Option<SpriteSheet>,
    machine: Option<StackTransferMachine>,
}

impl<K: SceneKey> CardTransferScene<K> {
    //--- Deck Geometry ----------------------------------------------------

    const CARD_COUNT: usize = 144;
    const AVAILABLE_FRAMES: usize = 52;
    const SHEET_COLS: u32 = 13;
    const SHEET_ROWS: u32 = 4;
    const FRAME_W: f32 = 46.0;
    const FRAME_H: f32 = 72.0;
    const FRAME_PREFIX: &'static str = "card";
    const STACK_STEP: Vec2 = Vec2 { x: 2.0, y: 2.0 };

    /// `back_target` is the key this scene switches to on
    /// [`SceneAction::Back`]; `sheet_path` names the card sheet for the
    /// asset collaborator.
    pub fn new(back_target: K, sheet_path: impl Into<String>) -> Self {
        Self {
            back_target,
            sheet_path: sheet_path.into(),
            sheet_ticket: None,
            sheet: None,
            machine: None,
        }
    }

    pub fn title(&self) -> &str {
        "Ace of Shadows"
    }

    //--- Setup ------------------------------------------------------------

    fn poll_sheet(&mut self, ctx: &mut StageContext<K>) {
        let Some(ticket) = self.sheet_ticket.as_ref() else {
            return;
        };

        let texture = match ctx.poll_texture(ticket) {
            LoadPoll::Pending => return,
            LoadPoll::Ready(texture) => texture,
            LoadPoll::Failed(reason) => {
                warn!("Card sheet load failed ({reason}); using placeholder");
                TextureHandle::PLACEHOLDER
            }
            LoadPoll::Stale => return,
        };

        self.sheet_ticket = None;
        self.build_deck(ctx, texture);
    }

    fn build_deck(&mut self, ctx: &mut StageContext<K>, texture: TextureHandle) {
        let sheet = SpriteSheet::from_grid(
            texture,
            Self::FRAME_W,
            Self::FRAME_H,
            Self::SHEET_COLS,
            Self::SHEET_ROWS,
            Self::FRAME_PREFIX,
        );

        let cards: Vec<Card> = (0..Self::CARD_COUNT)
            .map(|i| {
                let frame = i % Self::AVAILABLE_FRAMES;
                let row = frame / Self::SHEET_COLS as usize;
                let col = frame % Self::SHEET_COLS as usize;
                let front = SpriteRef {
                    texture,
                    frame: format!("{}_{row}_{col}", Self::FRAME_PREFIX),
                };
                Card::new(front, None)
            })
            .collect();

        let mut machine =
            StackTransferMachine::new(Self::layout(ctx), TransferTiming::default());
        machine.load(cards);

        self.sheet = Some(sheet);
        self.machine = Some(machine);
        info!("Card deck ready ({} cards)", Self::CARD_COUNT);
    }

    fn layout(ctx: &StageContext<K>) -> StackLayout {
        let (design_w, design_h) = ctx.viewport.design_size();
        StackLayout {
            source_base: Vec2::new(design_w * 0.3 - 200.0, design_h * 0.5),
            dest_base: Vec2::new(design_w * 0.7 - 200.0, design_h * 0.5),
            step: Self::STACK_STEP,
        }
    }

    //--- Queries (for the rendering collaborator) ------------------------

    /// The transfer machine, once setup has resolved.
    pub fn machine(&self) -> Option<&StackTransferMachine> {
        self.machine.as_ref()
    }

    pub fn sheet(&self) -> Option<&SpriteSheet> {
        self.sheet.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.machine.is_some()
    }
}

impl<K: SceneKey> Scene<K> for CardTransferScene<K> {
    fn on_enter(&mut self, ctx: &mut StageContext<K>) {
        self.sheet_ticket = Some(ctx.request_texture(&self.sheet_path));
        info!("Card transfer scene entered; sheet requested");
    }

    fn on_exit(&mut self, _ctx: &mut StageContext<K>) {
        // Abandon in place: stacks and any in-flight card drop together.
        self.machine = None;
        self.sheet = None;
        self.sheet_ticket = None;
    }

    fn update(&mut self, ctx: &mut StageContext<K>, dt_ms: f64) {
        if self.machine.is_none() {
            self.poll_sheet(ctx);
            return;
        }

        if let Some(machine) = self.machine.as_mut() {
            machine.tick(dt_ms);
        }
    }

    fn on_action(&mut self, ctx: &mut StageContext<K>, action: SceneAction) {
        if action == SceneAction::Back {
            ctx.transitions.push(SceneRequest::SwitchTo(self.back_target));
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
    use crate::bridge::{AssetServer, NullDialogueSource};
    use crate::core::viewport::{FitPolicy, ViewportTransform};

    //--- Test Helpers -----------------------------------------------------

    #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
    enum TestKey {
        Menu,
    }

    impl SceneKey for TestKey {}

    /// Asset server resolving every request instantly.
    struct InstantAssets;

    impl AssetServer for InstantAssets {
        fn begin(&mut self, _ticket: &AssetTicket, _path: &str) {}

        fn poll(&mut self, _ticket: &AssetTicket) -> LoadPoll {
            LoadPoll::Ready(TextureHandle(5))
        }
    }

    /// Asset server that never resolves.
    struct StalledAssets;

    impl AssetServer for StalledAssets {
        fn begin(&mut self, _ticket: &AssetTicket, _path: &str) {}

        fn poll(&mut self, _ticket: &AssetTicket) -> LoadPoll {
            LoadPoll::Pending
        }
    }

    /// Asset server that always fails.
    struct BrokenAssets;

    impl AssetServer for BrokenAssets {
        fn begin(&mut self, _ticket: &AssetTicket, _path: &str) {}

        fn poll(&mut self, _ticket: &AssetTicket) -> LoadPoll {
            LoadPoll::Failed("decode error".to_owned())
        }
    }

    fn context_with(assets: Box<dyn AssetServer>) -> StageContext<TestKey> {
        StageContext::new(
            ViewportTransform::new(1280.0, 720.0, FitPolicy::Fit),
            assets,
            Box::new(NullDialogueSource),
            fastrand::Rng::with_seed(1),
        )
    }

    fn entered_scene(
        assets: Box<dyn AssetServer>,
    ) -> (CardTransferScene<TestKey>, StageContext<TestKey>) {
        let mut ctx = context_with(assets);
        let mut scene = CardTransferScene::new(TestKey::Menu, "assets/cards.png");
        scene.on_enter(&mut ctx);
        (scene, ctx)
    }

    const FRAME_MS: f64 = 1000.0 / 60.0;

    //=====================================================================
    // Setup Tests
    //=====================================================================

    #[test]
    fn deck_builds_once_sheet_resolves() {
        let (mut scene, mut ctx) = entered_scene(Box::new(InstantAssets));
        assert!(!scene.is_ready());

        scene.update(&mut ctx, FRAME_MS);

        assert!(scene.is_ready());
        let machine = scene.machine().unwrap();
        assert_eq!(machine.total_cards(), 144);
        assert_eq!(machine.source().len(), 144);
    }

    #[test]
    fn updates_are_no_ops_until_setup_resolves() {
        let (mut scene, mut ctx) = entered_scene(Box::new(StalledAssets));

        for _ in 0..100 {
            scene.update(&mut ctx, FRAME_MS);
        }
        assert!(!scene.is_ready(), "stalled load keeps the scene dormant");
    }

    #[test]
    fn failed_sheet_falls_back_to_placeholder() {
        let (mut scene, mut ctx) = entered_scene(Box::new(BrokenAssets));

        scene.update(&mut ctx, FRAME_MS);

        assert!(scene.is_ready(), "failure degrades, it does not stall");
        assert_eq!(
            scene.sheet().unwrap().texture(),
            TextureHandle::PLACEHOLDER
        );
    }

    #[test]
    fn fronts_cycle_through_available_frames() {
        let (mut scene, mut ctx) = entered_scene(Box::new(InstantAssets));
        scene.update(&mut ctx, FRAME_MS);

        let source = scene.machine().unwrap().source();
        // Card 0 and card 52 share a frame; 0 and 1 do not.
        assert_eq!(source[0].front().frame, source[52].front().frame);
        assert_ne!(source[0].front().frame, source[1].front().frame);
    }

    //=====================================================================
    // Running Tests
    //=====================================================================

    #[test]
    fn census_is_conserved_while_running() {
        let (mut scene, mut ctx) = entered_scene(Box::new(InstantAssets));
        scene.update(&mut ctx, FRAME_MS);

        for _ in 0..600 {
            scene.update(&mut ctx, FRAME_MS);
            assert_eq!(scene.machine().unwrap().total_cards(), 144);
        }
    }

    #[test]
    fn back_action_queues_menu_switch() {
        let (mut scene, mut ctx) = entered_scene(Box::new(InstantAssets));

        scene.on_action(&mut ctx, SceneAction::Back);
        assert_eq!(
            ctx.transitions.take(),
            vec![SceneRequest::SwitchTo(TestKey::Menu)]
        );
    }

    #[test]
    fn exit_releases_everything_mid_transfer() {
        let (mut scene, mut ctx) = entered_scene(Box::new(InstantAssets));
        scene.update(&mut ctx, FRAME_MS);

        // Drive into a transfer, then tear down.
        scene.update(&mut ctx, 1100.0);
        assert!(scene.machine().unwrap().in_flight().is_some());

        scene.on_exit(&mut ctx);
        assert!(scene.machine().is_none());
        assert!(scene.sheet().is_none());
    }
}
