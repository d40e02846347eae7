//=========================================================================
// Object Pool
//=========================================================================
//
// Fixed-capacity pool of reusable animated entities.
//
// All slots are allocated once, up front. Spawning re-arms an inactive
// slot instead of allocating; a saturated pool simply declines, which
// bounds worst-case per-frame cost and keeps the hot path free of
// allocation.
//
// Release is implicit: a slot deactivates itself when its simulated
// lifetime runs out, and the next acquire finds it again.
//
//=========================================================================

pub mod particle;

//=== PoolSlot ============================================================

/// Capability a pooled entity exposes to the pool: whether the slot is
/// currently live.
pub trait PoolSlot {
    fn is_active(&self) -> bool;
}

//=== ObjectPool ==========================================================

/// Fixed-capacity collection of reusable slots.
///
/// Capacity never changes after construction; `acquire` hands out the
/// first inactive slot or `None` when every slot is live.
#[derive(Debug)]
pub struct ObjectPool<T> {
    slots: Vec<T>,
}

impl<T: PoolSlot> ObjectPool<T> {
    /// Allocates `capacity` slots up front using `make_slot`.
    pub fn with_capacity(capacity: usize, make_slot: impl FnMut() -> T) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, make_slot);
        Self { slots }
    }

    //--- Spawning ---------------------------------------------------------

    /// Returns the first inactive slot for re-arming, or `None` if the
    /// pool is saturated. Saturation is expected backpressure, not an
    /// error: callers drop the spawn.
    pub fn acquire(&mut self) -> Option<&mut T> {
        self.slots.iter_mut().find(|slot| !slot.is_active())
    }

    //--- Queries ----------------------------------------------------------

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_active()).count()
    }

    pub fn is_saturated(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_active())
    }

    //--- Iteration --------------------------------------------------------

    /// Iterates the live slots.
    pub fn active(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter(|slot| slot.is_active())
    }

    /// Mutably iterates the live slots (the per-frame update path).
    pub fn active_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().filter(|slot| slot.is_active())
    }

    /// Iterates every slot, live or not.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
