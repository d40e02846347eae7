//=========================================================================
// Stage Context
//=========================================================================
//
// Shared data container scenes borrow during lifecycle calls.
//
// Holds the viewport transform, the transition queue, the collaborator
// handles, and the RNG. Scenes never reach an ambient global: the only
// path to stage services is the `&mut StageContext` passed in.
//
// The context also owns the epoch counter behind the stale-load guard:
// every scene switch bumps the epoch, every ticket is stamped with the
// epoch at request time, and the poll helpers refuse to report a stale
// ticket as ready. A load that resolves after its scene was torn down
// is therefore unobservable.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::bridge::{
    AssetServer, AssetTicket, DialogueSource, FetchPoll, FetchTicket, LoadPoll,
};
use crate::core::scene::{SceneKey, TransitionQueue};
use crate::core::viewport::ViewportTransform;

//=== StageContext ========================================================

/// Shared context scenes receive during `on_enter`, `update`,
/// `on_resize`, `on_action`, and `on_exit`.
pub struct StageContext<K: SceneKey> {
    /// The design-to-viewport mapping. Scenes may change its fit policy;
    /// the stage feeds it debounced physical sizes.
    pub viewport: ViewportTransform,

    /// Queue for requesting scene switches. Drained by the stage at the
    /// tick boundary.
    pub transitions: TransitionQueue<K>,

    assets: Box<dyn AssetServer>,
    dialogue: Box<dyn DialogueSource>,
    rng: fastrand::Rng,
    epoch: u64,
    next_ticket_id: u64,
}

impl<K: SceneKey> StageContext<K> {
    pub(crate) fn new(
        viewport: ViewportTransform,
        assets: Box<dyn AssetServer>,
        dialogue: Box<dyn DialogueSource>,
        rng: fastrand::Rng,
    ) -> Self {
        Self {
            viewport,
            transitions: TransitionQueue::new(),
            assets,
            dialogue,
            rng,
            epoch: 0,
            next_ticket_id: 1,
        }
    }

    //--- Epoch ------------------------------------------------------------

    /// The current scene activation epoch. Bumped on every switch.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub(crate) fn bump_epoch(&mut self) {
        self.epoch += 1;
    }

    //--- Asset Loads ------------------------------------------------------

    /// Asks the asset collaborator to resolve `path`. The returned
    /// ticket is stamped with the current epoch.
    pub fn request_texture(&mut self, path: &str) -> AssetTicket {
        let ticket = AssetTicket {
            id: self.take_ticket_id(),
            epoch: self.epoch,
        };
        self.assets.begin(&ticket, path);
        ticket
    }

    /// Polls a texture load. A ticket from a previous epoch reports
    /// `Stale` without consulting the collaborator.
    pub fn poll_texture(&mut self, ticket: &AssetTicket) -> LoadPoll {
        if ticket.epoch != self.epoch {
            return LoadPoll::Stale;
        }
        self.assets.poll(ticket)
    }

    //--- Dialogue Fetch ---------------------------------------------------

    /// Asks the remote-data collaborator for the dialogue document.
    pub fn request_dialogue(&mut self) -> FetchTicket {
        let ticket = FetchTicket {
            id: self.take_ticket_id(),
            epoch: self.epoch,
        };
        self.dialogue.begin(&ticket);
        ticket
    }

    /// Polls a dialogue fetch, with the same stale-epoch guard as
    /// [`Self::poll_texture`].
    pub fn poll_dialogue(&mut self, ticket: &FetchTicket) -> FetchPoll {
        if ticket.epoch != self.epoch {
            return FetchPoll::Stale;
        }
        self.dialogue.poll(ticket)
    }

    //--- Randomness -------------------------------------------------------

    /// The stage RNG. Seeded through the builder for deterministic runs.
    pub fn rng(&mut self) -> &mut fastrand::Rng {
        &mut self.rng
    }

    //--- Internal ---------------------------------------------------------

    fn take_ticket_id(&mut self) -> u64 {
        let id = self.next_ticket_id;
        self.next_ticket_id += 1;
        id
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{NullAssetServer, NullDialogueSource, TextureHandle};
    use crate::core::viewport::FitPolicy;

    #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
    enum TestKey {
        Only,
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

    /// Asset server that resolves everything instantly, for epoch tests.
    struct InstantAssets;

    impl AssetServer for InstantAssets {
        fn begin(&mut self, _ticket: &AssetTicket, _path: &str) {}

        fn poll(&mut self, _ticket: &AssetTicket) -> LoadPoll {
            LoadPoll::Ready(TextureHandle(42))
        }
    }

    #[test]
    fn tickets_get_distinct_ids_and_current_epoch() {
        let mut ctx = context();

        let a = ctx.request_texture("a.png");
        let b = ctx.request_texture("b.png");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.epoch(), 0);

        ctx.bump_epoch();
        let c = ctx.request_texture("c.png");
        assert_eq!(c.epoch(), 1);
    }

    #[test]
    fn stale_ticket_never_reports_ready() {
        let mut ctx = StageContext::<TestKey>::new(
            ViewportTransform::new(1280.0, 720.0, FitPolicy::Fit),
            Box::new(InstantAssets),
            Box::new(NullDialogueSource),
            fastrand::Rng::with_seed(1),
        );

        let ticket = ctx.request_texture("sheet.png");
        assert_eq!(ctx.poll_texture(&ticket), LoadPoll::Ready(TextureHandle(42)));

        // A scene switch happened; the old activation's ticket must not
        // deliver into the new scene.
        ctx.bump_epoch();
        assert_eq!(ctx.poll_texture(&ticket), LoadPoll::Stale);
    }

    #[test]
    fn stale_fetch_guard_matches_texture_guard() {
        let mut ctx = context();

        let ticket = ctx.request_dialogue();
        assert!(matches!(ctx.poll_dialogue(&ticket), FetchPoll::Failed(_)));

        ctx.bump_epoch();
        assert_eq!(ctx.poll_dialogue(&ticket), FetchPoll::Stale);
    }
}
