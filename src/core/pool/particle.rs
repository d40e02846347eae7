//=========================================================================
// Flame Particle
//=========================================================================
//
// Per-entity physics and visual decay for the flame effect.
//
// Integration is a fixed Euler step per tick with no delta-time
// scaling; the effect speed follows the tick rate. Every visual attribute
// (scale, opacity, tint) is a pure function of the life ratio taken
// AFTER the per-tick decay, so the update order is fixed:
//
//   integrate position -> decay lifetime -> derive visuals from ratio
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::math::Vec2;
use super::PoolSlot;

//=== Tint ================================================================

/// An RGB tint applied by the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tint {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Tint {
    /// Packs as 0xRRGGBB.
    pub fn to_rgb_u32(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

//=== Fire Palette ========================================================

/// Fire-palette color for a life ratio in [0, 1].
///
/// Red-dominant: red stays at 255 and blue at 0. Green rises with the
/// ratio in two linear segments, 0 to 100 across (0.3, 0.7] and 100 to
/// 200 across (0.7, 1.0], so a particle is born yellow-orange and dies
/// deep red.
pub fn flame_tint(life_ratio: f32) -> Tint {
    let ratio = life_ratio.clamp(0.0, 1.0);

    let green = if ratio <= 0.3 {
        0.0
    } else if ratio <= 0.7 {
        100.0 * (ratio - 0.3) / 0.4
    } else {
        100.0 + 100.0 * (ratio - 0.7) / 0.3
    };

    Tint {
        r: 255,
        g: green.round() as u8,
        b: 0,
    }
}

//=== Particle ============================================================

/// One pooled flame particle.
///
/// Slots start dormant; `ignite` re-arms a slot with freshly randomized
/// motion and lifetime, `advance` steps it one tick and reports whether
/// it is still alive. The caller deactivates dead slots.
#[derive(Debug, Clone)]
pub struct Particle {
    active: bool,
    position: Vec2,
    velocity: Vec2,
    life: f32,
    max_life: f32,
    initial_scale: f32,
    initial_alpha: f32,
    scale: f32,
    alpha: f32,
    tint: Tint,
}

impl Particle {
    //--- Spawn Parameter Ranges ------------------------------------------

    const MIN_LIFE: f32 = 60.0;
    const LIFE_SPREAD: f32 = 60.0;
    const MIN_SCALE: f32 = 0.5;
    const SCALE_SPREAD: f32 = 0.5;
    const MIN_ALPHA: f32 = 0.7;
    const ALPHA_SPREAD: f32 = 0.3;

    /// A dormant slot, ready for the pool.
    pub fn dormant() -> Self {
        Self {
            active: false,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            life: 0.0,
            max_life: Self::MIN_LIFE,
            initial_scale: 1.0,
            initial_alpha: 1.0,
            scale: 0.0,
            alpha: 0.0,
            tint: flame_tint(1.0),
        }
    }

    //--- ignite() ---------------------------------------------------------

    /// Re-arms this slot at `position` with randomized velocity,
    /// lifetime, scale, and opacity, and marks it active.
    ///
    /// Velocity is a light horizontal drift in [-1, 1] and an upward
    /// rise in [-4, -1]; lifetime is 60 to 120 ticks; the tint starts at
    /// the full-life palette color.
    pub fn ignite(&mut self, position: Vec2, rng: &mut fastrand::Rng) {
        self.position = position;
        self.velocity = Vec2::new(rng.f32() * 2.0 - 1.0, -(rng.f32() * 3.0 + 1.0));

        self.max_life = Self::MIN_LIFE + rng.f32() * Self::LIFE_SPREAD;
        self.life = self.max_life;

        self.initial_scale = Self::MIN_SCALE + rng.f32() * Self::SCALE_SPREAD;
        self.scale = self.initial_scale;

        self.initial_alpha = Self::MIN_ALPHA + rng.f32() * Self::ALPHA_SPREAD;
        self.alpha = self.initial_alpha;

        self.tint = flame_tint(1.0);
        self.active = true;
    }

    //--- advance() --------------------------------------------------------

    /// Steps one tick: integrates position, decays the lifetime, then
    /// derives scale, opacity, and tint from the post-decay life ratio.
    ///
    /// Returns `true` while the particle is alive; on `false` the caller
    /// deactivates the slot.
    pub fn advance(&mut self) -> bool {
        self.position += self.velocity;

        self.life -= 1.0;

        let ratio = (self.life / self.max_life).max(0.0);
        self.scale = self.initial_scale * ratio;
        self.alpha = self.initial_alpha * ratio;
        self.tint = flame_tint(ratio);

        self.life > 0.0
    }

    /// Returns the slot to the pool.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    //--- Queries ----------------------------------------------------------

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn tint(&self) -> Tint {
        self.tint
    }

    pub fn life_ratio(&self) -> f32 {
        (self.life / self.max_life).max(0.0)
    }
}

impl PoolSlot for Particle {
    fn is_active(&self) -> bool {
        self.active
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
