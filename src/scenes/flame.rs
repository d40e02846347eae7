//=========================================================================
// Flame Scene
//=========================================================================
//
// "Phoenix Flame": a bounded fire effect over a fixed-capacity particle
// pool. A spawn counter re-arms one dormant slot every few ticks; when
// the pool is saturated the spawn is simply dropped, and the live
// particle count never exceeds the pool capacity.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;

use log::{info, warn};

//=== Internal Dependencies ===============================================

use crate::bridge::{AssetTicket, LoadPoll, SceneAction, TextureHandle};
use crate::core::math::Vec2;
use crate::core::pool::particle::Particle;
use crate::core::pool::ObjectPool;
use crate::core::scene::{Scene, SceneKey, SceneRequest, StageContext};

//=== FlameScene ==========================================================

/// Scene running the pooled flame effect.
pub struct FlameScene<K: SceneKey> {
    back_target: K,
    texture_path: String,
    texture_ticket: Option<AssetTicket>,
    texture: Option<TextureHandle>,
    pool: ObjectPool<Particle>,
    emitter: Vec2,
    spawn_counter: u32,
}

impl<K: SceneKey> FlameScene<K> {
    //--- Effect Tuning ----------------------------------------------------

    const MAX_PARTICLES: usize = 10;
    const SPAWN_INTERVAL_TICKS: u32 = 5;
    /// Horizontal spawn spread around the emitter, total width.
    const JITTER_SPREAD: f32 = 100.0;

    pub fn new(back_target: K, texture_path: impl Into<String>) -> Self {
        Self {
            back_target,
            texture_path: texture_path.into(),
            texture_ticket: None,
            texture: None,
            pool: ObjectPool::with_capacity(Self::MAX_PARTICLES, Particle::dormant),
            emitter: Vec2::ZERO,
            spawn_counter: 0,
        }
    }

    pub fn title(&self) -> &str {
        "Phoenix Flame"
    }

    //--- Setup ------------------------------------------------------------

    fn poll_texture(&mut self, ctx: &mut StageContext<K>) {
        let Some(ticket) = self.texture_ticket.as_ref() else {
            return;
        };

        match ctx.poll_texture(ticket) {
            LoadPoll::Pending | LoadPoll::Stale => {}
            LoadPoll::Ready(texture) => {
                self.texture = Some(texture);
                self.texture_ticket = None;
                info!("Flame texture ready");
            }
            LoadPoll::Failed(reason) => {
                warn!("Flame texture load failed ({reason}); using placeholder");
                self.texture = Some(TextureHandle::PLACEHOLDER);
                self.texture_ticket = None;
            }
        }
    }

    //--- Spawning ---------------------------------------------------------

    fn try_spawn(&mut self, ctx: &mut StageContext<K>) {
        self.spawn_counter += 1;
        if self.spawn_counter < Self::SPAWN_INTERVAL_TICKS {
            return;
        }
        self.spawn_counter = 0;

        // Nothing to draw with yet; skip until setup resolves.
        if self.texture.is_none() {
            return;
        }

        let emitter = self.emitter;
        // Saturated pool: the spawn is dropped, not queued.
        if let Some(slot) = self.pool.acquire() {
            let jitter = (ctx.rng().f32() - 0.5) * Self::JITTER_SPREAD;
            slot.ignite(Vec2::new(emitter.x + jitter, emitter.y), ctx.rng());
        }
    }

    //--- Queries (for the rendering collaborator) ------------------------

    /// Live particles, in slot order.
    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.pool.active()
    }

    pub fn active_count(&self) -> usize {
        self.pool.active_count()
    }

    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    pub fn emitter(&self) -> Vec2 {
        self.emitter
    }
}

impl<K: SceneKey> Scene<K> for FlameScene<K> {
    fn on_enter(&mut self, ctx: &mut StageContext<K>) {
        let (design_w, design_h) = ctx.viewport.design_size();
        self.emitter = Vec2::new(design_w / 2.0, design_h * 0.8);
        self.texture_ticket = Some(ctx.request_texture(&self.texture_path));
        info!("Flame scene entered; pool capacity {}", self.pool.capacity());
    }

    fn on_exit(&mut self, _ctx: &mut StageContext<K>) {
        for particle in self.pool.active_mut() {
            particle.deactivate();
        }
        self.texture = None;
        self.texture_ticket = None;
        self.spawn_counter = 0;
    }

    fn update(&mut self, ctx: &mut StageContext<K>, _dt_ms: f64) {
        if self.texture.is_none() {
            self.poll_texture(ctx);
        }

        self.try_spawn(ctx);

        for particle in self.pool.active_mut() {
            if !particle.advance() {
                particle.deactivate();
            }
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
