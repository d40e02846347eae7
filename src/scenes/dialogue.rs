//=========================================================================
// Dialogue Scene
//=========================================================================
//
// "Magic Words": a navigable dialogue reader over a remotely fetched
// document.
//
// Setup: one fetch through the dialogue collaborator, then a texture
// request per avatar and emoji. A failed fetch falls back to the
// built-in sample conversation; a malformed record is dropped upstream
// by the lenient parser. Until the fetch resolves, updates are no-ops
// and there is nothing to render.
//
// The speaking character's avatar fades in over a fixed tick count
// while the others fade out.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::collections::HashMap;

use log::{info, warn};

//=== Internal Dependencies ===============================================

use crate::bridge::{AssetTicket, FetchPoll, FetchTicket, LoadPoll, SceneAction, TextureHandle};
use crate::core::scene::{Scene, SceneKey, SceneRequest, StageContext};
use crate::data::{DialogueDocument, DialogueLine, SpeakerSide};

//=== Fade ================================================================

// Fixed-step alpha fade toward a target over FADE_TICKS updates.
#[derive(Debug)]
struct Fade {
    current: f32,
    target: f32,
    step: f32,
    remaining: u32,
}

const FADE_TICKS: u32 = 30;

impl Fade {
    fn hidden() -> Self {
        Self { current: 0.0, target: 0.0, step: 0.0, remaining: 0 }
    }

    fn set_target(&mut self, target: f32) {
        self.target = target;
        self.step = (target - self.current) / FADE_TICKS as f32;
        self.remaining = FADE_TICKS;
    }

    fn tick(&mut self) {
        if self.remaining > 0 {
            self.current += self.step;
            self.remaining -= 1;
            if self.remaining == 0 {
                self.current = self.target;
            }
        }
    }
}

//=== AvatarSlot ==========================================================

/// One speaker's avatar: its texture (possibly still loading), stage
/// side, and fade state.
struct AvatarSlot {
    ticket: Option<AssetTicket>,
    texture: Option<TextureHandle>,
    side: SpeakerSide,
    fade: Fade,
}

//=== DialogueScene =======================================================

/// Scene running the dialogue reader.
pub struct DialogueScene<K: SceneKey> {
    back_target: K,
    fetch_ticket: Option<FetchTicket>,
    ready: bool,
    lines: Vec<DialogueLine>,
    avatars: HashMap<String, AvatarSlot>,
    emoji: HashMap<String, EmojiSlot>,
    index: usize,
}

struct EmojiSlot {
    ticket: Option<AssetTicket>,
    texture: Option<TextureHandle>,
}

impl<K: SceneKey> DialogueScene<K> {
    pub fn new(back_target: K) -> Self {
        Self {
            back_target,
            fetch_ticket: None,
            ready: false,
            lines: Vec::new(),
            avatars: HashMap::new(),
            emoji: HashMap::new(),
            index: 0,
        }
    }

    pub fn title(&self) -> &str {
        "Magic Words"
    }

    //--- Setup ------------------------------------------------------------

    fn poll_fetch(&mut self, ctx: &mut StageContext<K>) {
        let Some(ticket) = self.fetch_ticket.as_ref() else {
            return;
        };

        match ctx.poll_dialogue(ticket) {
            FetchPoll::Pending | FetchPoll::Stale => {}
            FetchPoll::Ready(raw) => {
                self.fetch_ticket = None;
                match DialogueDocument::from_json(&raw) {
                    Ok(document) => self.apply_document(ctx, document),
                    Err(err) => {
                        warn!("Dialogue document rejected ({err}); using sample set");
                        self.apply_sample();
                    }
                }
                self.finish_setup();
            }
            FetchPoll::Failed(reason) => {
                warn!("Dialogue fetch failed ({reason}); using sample set");
                self.fetch_ticket = None;
                self.apply_sample();
                self.finish_setup();
            }
        }
    }

    fn apply_document(&mut self, ctx: &mut StageContext<K>, document: DialogueDocument) {
        self.lines = document.lines;

        for profile in document.avatars {
            let ticket = ctx.request_texture(&profile.url);
            self.avatars.insert(
                profile.name,
                AvatarSlot {
                    ticket: Some(ticket),
                    texture: None,
                    side: profile.side,
                    fade: Fade::hidden(),
                },
            );
        }

        for asset in document.emoji {
            let ticket = ctx.request_texture(&asset.url);
            self.emoji
                .insert(asset.name, EmojiSlot { ticket: Some(ticket), texture: None });
        }

        info!(
            "Dialogue ready: {} lines, {} avatars, {} emoji",
            self.lines.len(),
            self.avatars.len(),
            self.emoji.len()
        );
    }

    fn apply_sample(&mut self) {
        self.lines = sample_lines();
    }

    fn finish_setup(&mut self) {
        self.ready = true;
        self.show(0);
    }

    fn poll_art(&mut self, ctx: &mut StageContext<K>) {
        for slot in self.avatars.values_mut() {
            poll_texture_slot(ctx, &mut slot.ticket, &mut slot.texture);
        }
        for slot in self.emoji.values_mut() {
            poll_texture_slot(ctx, &mut slot.ticket, &mut slot.texture);
        }
    }

    //--- Navigation -------------------------------------------------------

    fn show(&mut self, index: usize) {
        if index >= self.lines.len() {
            return;
        }
        self.index = index;

        let speaker = self.lines[index].speaker.clone();
        for (name, slot) in &mut self.avatars {
            let target = if *name == speaker { 1.0 } else { 0.0 };
            slot.fade.set_target(target);
        }
    }

    fn next(&mut self) {
        if self.index + 1 < self.lines.len() {
            self.show(self.index + 1);
        }
    }

    fn prev(&mut self) {
        if self.index > 0 {
            self.show(self.index - 1);
        }
    }

    //--- Queries (for the rendering collaborator) ------------------------

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_line(&self) -> Option<&DialogueLine> {
        self.lines.get(self.index)
    }

    /// Stage side of the current speaker. Speakers without an avatar
    /// profile read from the left.
    pub fn speaker_side(&self) -> SpeakerSide {
        self.current_line()
            .and_then(|line| self.avatars.get(&line.speaker))
            .map(|slot| slot.side)
            .unwrap_or(SpeakerSide::Left)
    }

    pub fn at_first_line(&self) -> bool {
        self.index == 0
    }

    pub fn at_last_line(&self) -> bool {
        self.lines.is_empty() || self.index + 1 == self.lines.len()
    }

    pub fn avatar_alpha(&self, name: &str) -> f32 {
        self.avatars.get(name).map_or(0.0, |slot| slot.fade.current)
    }

    pub fn avatar_texture(&self, name: &str) -> Option<TextureHandle> {
        self.avatars.get(name).and_then(|slot| slot.texture)
    }

    pub fn emoji_texture(&self, name: &str) -> Option<TextureHandle> {
        self.emoji.get(name).and_then(|slot| slot.texture)
    }
}

//--- Shared Poll Helper ---------------------------------------------------

fn poll_texture_slot<K: SceneKey>(
    ctx: &mut StageContext<K>,
    ticket: &mut Option<AssetTicket>,
    texture: &mut Option<TextureHandle>,
) {
    let Some(pending) = ticket.as_ref() else {
        return;
    };

    match ctx.poll_texture(pending) {
        LoadPoll::Pending | LoadPoll::Stale => {}
        LoadPoll::Ready(handle) => {
            *texture = Some(handle);
            *ticket = None;
        }
        LoadPoll::Failed(reason) => {
            warn!("Dialogue art load failed ({reason}); using placeholder");
            *texture = Some(TextureHandle::PLACEHOLDER);
            *ticket = None;
        }
    }
}

impl<K: SceneKey> Scene<K> for DialogueScene<K> {
    fn on_enter(&mut self, ctx: &mut StageContext<K>) {
        self.fetch_ticket = Some(ctx.request_dialogue());
        info!("Dialogue scene entered; fetch requested");
    }

    fn on_exit(&mut self, _ctx: &mut StageContext<K>) {
        self.lines.clear();
        self.avatars.clear();
        self.emoji.clear();
        self.fetch_ticket = None;
        self.ready = false;
        self.index = 0;
    }

    fn update(&mut self, ctx: &mut StageContext<K>, _dt_ms: f64) {
        if !self.ready {
            self.poll_fetch(ctx);
            return;
        }

        self.poll_art(ctx);

        for slot in self.avatars.values_mut() {
            slot.fade.tick();
        }
    }

    fn on_action(&mut self, ctx: &mut StageContext<K>, action: SceneAction) {
        match action {
            SceneAction::Next => self.next(),
            SceneAction::Prev => self.prev(),
            SceneAction::Back => {
                ctx.transitions.push(SceneRequest::SwitchTo(self.back_target));
            }
            SceneAction::Select(_) => {}
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

//=== Sample Fallback =====================================================

/// Built-in conversation used when the remote fetch fails.
fn sample_lines() -> Vec<DialogueLine> {
    [
        ("Hero", "lorem\u{1F60A}"),
        ("Villain", "ipsum \u{1F525}\u{1F525}"),
        ("Hero", "dorat \u{2764}\u{FE0F}"),
        ("Villain", "blabla \u{1F622}"),
        ("Hero", "blabla \u{1F430}"),
    ]
    .into_iter()
    .map(|(speaker, text)| DialogueLine {
        speaker: speaker.to_owned(),
        text: text.to_owned(),
    })
    .collect()
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{
        AssetServer, DialogueSource, FetchTicket, NullAssetServer, NullDialogueSource,
    };
    use crate::core::viewport::{FitPolicy, ViewportTransform};

    //--- Test Helpers -----------------------------------------------------

    #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
    enum TestKey {
        Menu,
    }

    impl SceneKey for TestKey {}

    /// Dialogue source serving a canned document on the first poll.
    struct CannedDialogue(&'static str);

    impl DialogueSource for CannedDialogue {
        fn begin(&mut self, _ticket: &FetchTicket) {}

        fn poll(&mut self, _ticket: &FetchTicket) -> FetchPoll {
            FetchPoll::Ready(self.0.to_owned())
        }
    }

    struct InstantAssets;

    impl AssetServer for InstantAssets {
        fn begin(&mut self, _ticket: &AssetTicket, _path: &str) {}

        fn poll(&mut self, _ticket: &AssetTicket) -> LoadPoll {
            LoadPoll::Ready(TextureHandle(11))
        }
    }

    const DOCUMENT: &str = r#"{
        "dialogue": [
            {"name": "Hero", "text": "first"},
            {"name": "X"},
            {"name": "Villain", "text": "second"}
        ],
        "emojies": [{"name": "smile", "url": "https://img/smile.png"}],
        "avatars": [
            {"name": "Hero", "url": "https://img/hero.png", "position": "left"},
            {"name": "Villain", "url": "https://img/v.png", "position": "right"}
        ]
    }"#;

    fn entered_scene(
        assets: Box<dyn AssetServer>,
        dialogue: Box<dyn DialogueSource>,
    ) -> (DialogueScene<TestKey>, StageContext<TestKey>) {
        let mut ctx = StageContext::new(
            ViewportTransform::new(1280.0, 720.0, FitPolicy::Fit),
            assets,
            dialogue,
            fastrand::Rng::with_seed(1),
        );
        let mut scene = DialogueScene::new(TestKey::Menu);
        scene.on_enter(&mut ctx);
        (scene, ctx)
    }

    const FRAME_MS: f64 = 1000.0 / 60.0;

    //=====================================================================
    // Setup Tests
    //=====================================================================

    #[test]
    fn malformed_records_are_dropped_not_fatal() {
        let (mut scene, mut ctx) = entered_scene(
            Box::new(InstantAssets),
            Box::new(CannedDialogue(DOCUMENT)),
        );

        scene.update(&mut ctx, FRAME_MS);

        assert!(scene.is_ready());
        assert_eq!(scene.line_count(), 2, "the record missing text is skipped");
        assert_eq!(scene.current_line().unwrap().text, "first");
    }

    #[test]
    fn failed_fetch_falls_back_to_sample_set() {
        let (mut scene, mut ctx) = entered_scene(
            Box::new(NullAssetServer),
            Box::new(NullDialogueSource),
        );

        scene.update(&mut ctx, FRAME_MS);

        assert!(scene.is_ready());
        assert_eq!(scene.line_count(), 5);
        assert_eq!(scene.current_line().unwrap().speaker, "Hero");
    }

    #[test]
    fn garbage_document_falls_back_to_sample_set() {
        let (mut scene, mut ctx) = entered_scene(
            Box::new(NullAssetServer),
            Box::new(CannedDialogue("not json at all")),
        );

        scene.update(&mut ctx, FRAME_MS);
        assert!(scene.is_ready());
        assert_eq!(scene.line_count(), 5);
    }

    #[test]
    fn nothing_to_read_before_fetch_resolves() {
        struct NeverResolves;

        impl DialogueSource for NeverResolves {
            fn begin(&mut self, _ticket: &FetchTicket) {}

            fn poll(&mut self, _ticket: &FetchTicket) -> FetchPoll {
                FetchPoll::Pending
            }
        }

        let (mut scene, mut ctx) =
            entered_scene(Box::new(NullAssetServer), Box::new(NeverResolves));

        for _ in 0..60 {
            scene.update(&mut ctx, FRAME_MS);
        }
        assert!(!scene.is_ready());
        assert_eq!(scene.current_line(), None);
    }

    #[test]
    fn avatar_and_emoji_art_resolve_after_setup() {
        let (mut scene, mut ctx) = entered_scene(
            Box::new(InstantAssets),
            Box::new(CannedDialogue(DOCUMENT)),
        );

        scene.update(&mut ctx, FRAME_MS); // fetch + parse
        scene.update(&mut ctx, FRAME_MS); // art polls

        assert_eq!(scene.avatar_texture("Hero"), Some(TextureHandle(11)));
        assert_eq!(scene.emoji_texture("smile"), Some(TextureHandle(11)));
        assert_eq!(scene.avatar_texture("Nobody"), None);
    }

    //=====================================================================
    // Navigation Tests
    //=====================================================================

    #[test]
    fn next_and_prev_clamp_at_the_ends() {
        let (mut scene, mut ctx) = entered_scene(
            Box::new(InstantAssets),
            Box::new(CannedDialogue(DOCUMENT)),
        );
        scene.update(&mut ctx, FRAME_MS);

        assert!(scene.at_first_line());
        scene.on_action(&mut ctx, SceneAction::Prev);
        assert_eq!(scene.index(), 0, "prev clamps at the first line");

        scene.on_action(&mut ctx, SceneAction::Next);
        assert_eq!(scene.index(), 1);
        assert!(scene.at_last_line());

        scene.on_action(&mut ctx, SceneAction::Next);
        assert_eq!(scene.index(), 1, "next clamps at the last line");
    }

    #[test]
    fn speaker_side_follows_avatar_profile() {
        let (mut scene, mut ctx) = entered_scene(
            Box::new(InstantAssets),
            Box::new(CannedDialogue(DOCUMENT)),
        );
        scene.update(&mut ctx, FRAME_MS);

        assert_eq!(scene.speaker_side(), SpeakerSide::Left);
        scene.on_action(&mut ctx, SceneAction::Next);
        assert_eq!(scene.speaker_side(), SpeakerSide::Right);
    }

    #[test]
    fn unknown_speaker_defaults_to_left() {
        let (mut scene, mut ctx) = entered_scene(
            Box::new(NullAssetServer),
            Box::new(NullDialogueSource),
        );
        scene.update(&mut ctx, FRAME_MS);

        // Sample speakers have no avatar profiles.
        assert_eq!(scene.speaker_side(), SpeakerSide::Left);
    }

    //=====================================================================
    // Fade Tests
    //=====================================================================

    #[test]
    fn speaking_avatar_fades_in_while_others_fade_out() {
        let (mut scene, mut ctx) = entered_scene(
            Box::new(InstantAssets),
            Box::new(CannedDialogue(DOCUMENT)),
        );
        scene.update(&mut ctx, FRAME_MS);

        // Mid-fade: the speaker is rising, the listener is flat at zero.
        for _ in 0..10 {
            scene.update(&mut ctx, FRAME_MS);
        }
        let hero = scene.avatar_alpha("Hero");
        assert!(hero > 0.0 && hero < 1.0, "hero alpha was {hero}");
        assert_eq!(scene.avatar_alpha("Villain"), 0.0);

        // Fade completes and snaps exactly.
        for _ in 0..30 {
            scene.update(&mut ctx, FRAME_MS);
        }
        assert_eq!(scene.avatar_alpha("Hero"), 1.0);

        // Advancing the line crosses the fades.
        scene.on_action(&mut ctx, SceneAction::Next);
        for _ in 0..40 {
            scene.update(&mut ctx, FRAME_MS);
        }
        assert_eq!(scene.avatar_alpha("Hero"), 0.0);
        assert_eq!(scene.avatar_alpha("Villain"), 1.0);
    }

    //=====================================================================
    // Teardown Tests
    //=====================================================================

    #[test]
    fn exit_clears_all_owned_state() {
        let (mut scene, mut ctx) = entered_scene(
            Box::new(InstantAssets),
            Box::new(CannedDialogue(DOCUMENT)),
        );
        scene.update(&mut ctx, FRAME_MS);
        assert!(scene.is_ready());

        scene.on_exit(&mut ctx);
        assert!(!scene.is_ready());
        assert_eq!(scene.line_count(), 0);
        assert_eq!(scene.avatar_texture("Hero"), None);
    }

    #[test]
    fn back_action_queues_menu_switch() {
        let (mut scene, mut ctx) = entered_scene(
            Box::new(NullAssetServer),
            Box::new(NullDialogueSource),
        );

        scene.on_action(&mut ctx, SceneAction::Back);
        assert_eq!(
            ctx.transitions.take(),
            vec![SceneRequest::SwitchTo(TestKey::Menu)]
        );
    }
}
