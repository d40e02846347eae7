//=========================================================================
// Stack Transfer Machine
//=========================================================================
//
// Finite-state animation process transferring cards from a source stack
// to a destination stack, one at a time.
//
// States:
//   Idle -> (trigger) -> Transferring -> (completion) -> Idle
//
// The trigger pops the top source card into the single in-flight slot;
// per-frame advance moves it along an eased path and drives the 2D flip
// pinch; completion commits it to the destination. Ownership invariant:
// a card is in exactly one of {source, destination, in-flight}, and
// source + destination + in-flight is constant for the machine's life.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::math::Vec2;
use super::Card;

//=== Easing ==============================================================

/// Ease-out-cubic: decelerates toward the endpoint.
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

//=== Configuration =======================================================

/// Where the two stacks sit and how each card fans out from its base.
#[derive(Debug, Clone, Copy)]
pub struct StackLayout {
    pub source_base: Vec2,
    pub dest_base: Vec2,
    /// Per-card offset: a stacked card sits at `base + index * step`.
    pub step: Vec2,
}

/// Transfer pacing.
#[derive(Debug, Clone, Copy)]
pub struct TransferTiming {
    /// Minimum time between transfer triggers.
    pub move_interval_ms: f64,
    /// Duration of one card's flight.
    pub duration_ms: f64,
}

impl Default for TransferTiming {
    fn default() -> Self {
        Self {
            move_interval_ms: 1000.0,
            duration_ms: 2000.0,
        }
    }
}

//=== TransferPhase =======================================================

/// Observable machine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferPhase {
    Idle,
    Transferring,
}

//=== Flight ==============================================================

// The single in-flight card and its animation bookkeeping. While a
// flight exists, the card's position and scale belong to the animation
// alone; restacking never touches it.
#[derive(Debug)]
struct Flight {
    card: Card,
    elapsed_ms: f64,
    start: Vec2,
    end: Vec2,
    flipped: bool,
}

//=== StackTransferMachine ================================================

/// Deterministic per-frame state machine moving cards between stacks.
///
/// Driven by accumulated tick deltas, so identical tick sequences
/// produce identical card states.
#[derive(Debug)]
pub struct StackTransferMachine {
    layout: StackLayout,
    timing: TransferTiming,
    source: Vec<Card>,
    destination: Vec<Card>,
    in_flight: Option<Flight>,
    since_trigger_ms: f64,
}

impl StackTransferMachine {
    pub fn new(layout: StackLayout, timing: TransferTiming) -> Self {
        Self {
            layout,
            timing,
            source: Vec::new(),
            destination: Vec::new(),
            in_flight: None,
            // No trigger has happened yet, so the very first eligible
            // tick starts a transfer.
            since_trigger_ms: f64::INFINITY,
        }
    }

    //--- Loading ----------------------------------------------------------

    /// Replaces the machine's contents with a fresh source stack and an
    /// empty destination, and stacks the cards at their fanned slots.
    pub fn load(&mut self, cards: Vec<Card>) {
        self.source = cards;
        self.destination.clear();
        self.in_flight = None;
        self.since_trigger_ms = f64::INFINITY;

        restack(&mut self.source, self.layout.source_base, self.layout.step);
        debug!("Loaded {} cards into source stack", self.source.len());
    }

    //--- tick() -----------------------------------------------------------

    /// Advances the machine by `dt_ms`.
    ///
    /// Idle: triggers a transfer once the move interval has elapsed and
    /// the source is non-empty. Transferring: advances the in-flight
    /// card's eased path and flip pinch, committing it on completion.
    pub fn tick(&mut self, dt_ms: f64) {
        self.since_trigger_ms += dt_ms;

        if self.in_flight.is_some() {
            self.advance(dt_ms);
        } else if self.since_trigger_ms > self.timing.move_interval_ms {
            self.begin_transfer();
        }
    }

    //--- Trigger ----------------------------------------------------------

    fn begin_transfer(&mut self) {
        // Guarded pop: an empty source is a no-op, never a fault.
        let Some(mut card) = self.source.pop() else {
            return;
        };

        self.since_trigger_ms = 0.0;

        let start = card.position();
        let end = self.layout.dest_base
            + self.layout.step * self.destination.len() as f32;

        card.show_back();
        card.set_scale_x(1.0);

        restack(&mut self.source, self.layout.source_base, self.layout.step);

        self.in_flight = Some(Flight {
            card,
            elapsed_ms: 0.0,
            start,
            end,
            flipped: false,
        });
    }

    //--- Advance ----------------------------------------------------------

    fn advance(&mut self, dt_ms: f64) {
        let Some(flight) = self.in_flight.as_mut() else {
            return;
        };

        flight.elapsed_ms += dt_ms;
        let progress = (flight.elapsed_ms / self.timing.duration_ms).clamp(0.0, 1.0) as f32;

        let eased = ease_out_cubic(progress);
        flight.card.set_position(flight.start.lerp(flight.end, eased));

        // Flip cue: the horizontal scale pinches to zero by the halfway
        // point, the face swaps exactly once at the crossing, then the
        // scale grows back.
        if progress < 0.5 {
            flight.card.set_scale_x(1.0 - progress * 2.0);
        } else {
            if !flight.flipped {
                flight.card.show_front();
                flight.flipped = true;
            }
            flight.card.set_scale_x((progress - 0.5) * 2.0);
        }

        if progress >= 1.0 {
            self.complete_transfer();
        }
    }

    fn complete_transfer(&mut self) {
        let Some(mut flight) = self.in_flight.take() else {
            return;
        };

        flight.card.set_scale_x(1.0);
        flight.card.show_front();
        flight.card.set_position(flight.end);

        self.destination.push(flight.card);
        restack(&mut self.destination, self.layout.dest_base, self.layout.step);
    }

    //--- Queries ----------------------------------------------------------

    pub fn phase(&self) -> TransferPhase {
        if self.in_flight.is_some() {
            TransferPhase::Transferring
        } else {
            TransferPhase::Idle
        }
    }

    pub fn source(&self) -> &[Card] {
        &self.source
    }

    pub fn destination(&self) -> &[Card] {
        &self.destination
    }

    pub fn in_flight(&self) -> Option<&Card> {
        self.in_flight.as_ref().map(|flight| &flight.card)
    }

    /// Total cards across source, destination, and the in-flight slot.
    /// Constant for the machine's lifetime.
    pub fn total_cards(&self) -> usize {
        self.source.len() + self.destination.len() + usize::from(self.in_flight.is_some())
    }

    pub fn layout(&self) -> StackLayout {
        self.layout
    }
}

//=== Restacking ==========================================================

// Re-fans a stack at base + index * step. Called after any push or pop
// that changes membership, never on the in-flight card.
fn restack(cards: &mut [Card], base: Vec2, step: Vec2) {
    for (index, card) in cards.iter_mut().enumerate() {
        card.set_position(base + step * index as f32);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
