//=========================================================================
// Card Stack
//=========================================================================
//
// The card entity and the transfer machine that moves cards between two
// ordered stacks.
//
// A card is owned by exactly one place at a time: the source stack, the
// destination stack, or the machine's single in-flight slot. The
// machine in `machine.rs` is the only thing that moves ownership.
//
//=========================================================================

pub mod machine;

//=== Internal Dependencies ===============================================

use crate::bridge::SpriteRef;
use crate::core::math::Vec2;

//=== FaceState ===========================================================

/// Which face of the card is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceState {
    Front,
    Back,
}

//=== Card ================================================================

/// One playing card.
///
/// Identity is the front-face frame reference plus an optional distinct
/// back-face reference; with no back reference the rendering
/// collaborator draws its default card back. The horizontal scale is
/// the flip cue: the transfer machine pinches it through zero to fake a
/// flip with a 2D affine transform only.
#[derive(Debug, Clone)]
pub struct Card {
    front: SpriteRef,
    back: Option<SpriteRef>,
    face: FaceState,
    position: Vec2,
    scale_x: f32,
}

impl Card {
    /// A new card showing its back, at the origin, unpinched.
    pub fn new(front: SpriteRef, back: Option<SpriteRef>) -> Self {
        Self {
            front,
            back,
            face: FaceState::Back,
            position: Vec2::ZERO,
            scale_x: 1.0,
        }
    }

    //--- Face -------------------------------------------------------------

    pub fn show_front(&mut self) {
        self.face = FaceState::Front;
    }

    pub fn show_back(&mut self) {
        self.face = FaceState::Back;
    }

    pub fn face(&self) -> FaceState {
        self.face
    }

    /// The frame the renderer should draw for the current face, when the
    /// card has a distinct back.
    pub fn visible_sprite(&self) -> Option<&SpriteRef> {
        match self.face {
            FaceState::Front => Some(&self.front),
            FaceState::Back => self.back.as_ref(),
        }
    }

    pub fn front(&self) -> &SpriteRef {
        &self.front
    }

    pub fn back(&self) -> Option<&SpriteRef> {
        self.back.as_ref()
    }

    //--- Placement ----------------------------------------------------------

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn scale_x(&self) -> f32 {
        self.scale_x
    }

    pub fn set_scale_x(&mut self, scale_x: f32) {
        self.scale_x = scale_x;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
