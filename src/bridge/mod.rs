//=========================================================================
// Collaborator Bridge
//=========================================================================
//
// Interfaces to the external collaborators surrounding the stage core.
//
// The core never decodes images, fetches over the network, or draws.
// Those concerns live behind the traits in this module:
//
//   AssetServer    - resolves a path/url to an opaque texture handle
//   DialogueSource - fetches the remote dialogue document (raw JSON)
//
// Both are polled, never pushed: a scene requests a load, receives a
// ticket, and polls it once per tick until it resolves. A resolution is
// therefore always pulled by the scene that owns the ticket; nothing can
// deliver into a scene that has been torn down. Tickets also carry the
// stage epoch at request time, so a ticket that outlives its scene's
// activation is recognizably stale.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

//=== Internal Dependencies ===============================================

use crate::core::math::Vec2;

//=== TextureHandle =======================================================

/// Opaque reference to a decoded texture owned by the asset
/// collaborator. The core only stores and compares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

impl TextureHandle {
    /// Built-in fallback handle scenes substitute when a load fails.
    /// The rendering collaborator maps it to its placeholder art.
    pub const PLACEHOLDER: TextureHandle = TextureHandle(0);
}

//=== SpriteRef ===========================================================

/// A named frame within a texture, the unit a renderer draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteRef {
    pub texture: TextureHandle,
    pub frame: String,
}

//=== SpriteSheet =========================================================

/// Rectangle of a single frame inside a sheet texture, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// A grid-sliced frame map over one texture.
///
/// Pure bookkeeping: the sheet records where each frame sits, the
/// rendering collaborator does the actual sampling.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    texture: TextureHandle,
    frames: HashMap<String, FrameRect>,
}

impl SpriteSheet {
    /// Slices `texture` into a `cols` x `rows` grid of `frame_w` x
    /// `frame_h` cells, named `{prefix}_{row}_{col}`.
    pub fn from_grid(
        texture: TextureHandle,
        frame_w: f32,
        frame_h: f32,
        cols: u32,
        rows: u32,
        prefix: &str,
    ) -> Self {
        let mut frames = HashMap::with_capacity((cols * rows) as usize);

        for row in 0..rows {
            for col in 0..cols {
                frames.insert(
                    format!("{prefix}_{row}_{col}"),
                    FrameRect {
                        x: col as f32 * frame_w,
                        y: row as f32 * frame_h,
                        w: frame_w,
                        h: frame_h,
                    },
                );
            }
        }

        Self { texture, frames }
    }

    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    pub fn frame(&self, name: &str) -> Option<&FrameRect> {
        self.frames.get(name)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// A `SpriteRef` for `name`, or `None` if the sheet has no such frame.
    pub fn sprite(&self, name: &str) -> Option<SpriteRef> {
        self.frames.contains_key(name).then(|| SpriteRef {
            texture: self.texture,
            frame: name.to_owned(),
        })
    }
}

//=== Tickets =============================================================

/// Handle for an in-flight texture load. Stamped with the stage epoch at
/// request time; a stale stamp means the requesting scene activation has
/// since been torn down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTicket {
    pub(crate) id: u64,
    pub(crate) epoch: u64,
}

impl AssetTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Handle for an in-flight dialogue fetch. Same stamping rules as
/// [`AssetTicket`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub(crate) id: u64,
    pub(crate) epoch: u64,
}

impl FetchTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

//=== Poll Results ========================================================

/// Outcome of polling a texture load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPoll {
    /// Not resolved yet; poll again next tick.
    Pending,
    /// Decoded and available.
    Ready(TextureHandle),
    /// Load failed; the scene falls back locally.
    Failed(String),
    /// The ticket predates the current scene activation. Reported by the
    /// stage context, never produced by a collaborator.
    Stale,
}

/// Outcome of polling a dialogue fetch. `Ready` carries the raw JSON
/// document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPoll {
    Pending,
    Ready(String),
    Failed(String),
    Stale,
}

//=== AssetServer =========================================================

/// Asset-loading collaborator: resolves a path to a decoded texture.
///
/// `begin` starts (or enqueues) the load identified by `ticket`; `poll`
/// reports its current state. Implementations are free to resolve
/// synchronously inside `begin` and answer `Ready` on the first poll.
pub trait AssetServer {
    fn begin(&mut self, ticket: &AssetTicket, path: &str);

    fn poll(&mut self, ticket: &AssetTicket) -> LoadPoll;
}

//=== DialogueSource ======================================================

/// Remote-data collaborator for the dialogue scene: one fetch returning
/// the raw JSON dialogue document.
pub trait DialogueSource {
    fn begin(&mut self, ticket: &FetchTicket);

    fn poll(&mut self, ticket: &FetchTicket) -> FetchPoll;
}

//=== Null Collaborators ==================================================

/// Asset server used when none is configured: every load fails, which
/// routes scenes onto their placeholder fallbacks.
#[derive(Debug, Default)]
pub struct NullAssetServer;

impl AssetServer for NullAssetServer {
    fn begin(&mut self, _ticket: &AssetTicket, _path: &str) {}

    fn poll(&mut self, _ticket: &AssetTicket) -> LoadPoll {
        LoadPoll::Failed("no asset server configured".to_owned())
    }
}

/// Dialogue source used when none is configured: every fetch fails,
/// which routes the dialogue scene onto its built-in sample set.
#[derive(Debug, Default)]
pub struct NullDialogueSource;

impl DialogueSource for NullDialogueSource {
    fn begin(&mut self, _ticket: &FetchTicket) {}

    fn poll(&mut self, _ticket: &FetchTicket) -> FetchPoll {
        FetchPoll::Failed("no dialogue source configured".to_owned())
    }
}

//=== SceneAction =========================================================

/// Semantic commands the external UI layer feeds into the active scene.
///
/// Pointer wiring, button styling, and hit testing stay outside the
/// core; by the time input reaches the stage it has already been mapped
/// to one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneAction {
    /// Activate the n-th choice the scene offers (menu entries).
    Select(usize),
    /// Advance (dialogue reader).
    Next,
    /// Step back (dialogue reader).
    Prev,
    /// Return to the menu scene.
    Back,
}

//=== Pointer Mapping =====================================================

/// Maps a physical viewport position into design-surface coordinates
/// under the given transform. The inverse of what the renderer applies,
/// for collaborators that hit-test scene content.
pub fn viewport_to_design(
    transform: &crate::core::viewport::Transform2D,
    design_w: f32,
    design_h: f32,
    x: f32,
    y: f32,
) -> Vec2 {
    Vec2 {
        x: (x - transform.origin_x) / transform.scale_x + design_w / 2.0,
        y: (y - transform.origin_y) / transform.scale_y + design_h / 2.0,
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
