//=========================================================================
// Timing Utilities
//=========================================================================
//
// Tick-driven time bookkeeping for the stage.
//
// The stage owns no timers: the external frame clock is the only time
// source, so anything time-based is expressed as accumulated per-tick
// delta milliseconds.
//
// - ResizeDebouncer: coalesces viewport-resize bursts to one trailing
//   notification.
// - FpsMeter: smoothed frame-rate readout for the rendering collaborator.
//
//=========================================================================

//=== ResizeDebouncer =====================================================

/// Trailing-edge debouncer for viewport size changes.
///
/// Each `note` records the latest size and restarts the quiet period.
/// `tick` releases the pending size once a full window has elapsed with
/// no further notes, so a burst of resize events collapses into a single
/// recomputation.
#[derive(Debug)]
pub struct ResizeDebouncer {
    window_ms: f64,
    pending: Option<(f32, f32)>,
    quiet_ms: f64,
}

impl ResizeDebouncer {
    /// Default quiet window between the last resize event and delivery.
    pub const DEFAULT_WINDOW_MS: f64 = 100.0;

    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            pending: None,
            quiet_ms: 0.0,
        }
    }

    /// Records a resize event. Overwrites any pending size and restarts
    /// the quiet period.
    pub fn note(&mut self, width: f32, height: f32) {
        self.pending = Some((width, height));
        self.quiet_ms = 0.0;
    }

    /// Advances the quiet period; returns the coalesced size once the
    /// window has elapsed since the last note.
    pub fn tick(&mut self, dt_ms: f64) -> Option<(f32, f32)> {
        self.pending?;

        self.quiet_ms += dt_ms;
        if self.quiet_ms >= self.window_ms {
            self.quiet_ms = 0.0;
            return self.pending.take();
        }
        None
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for ResizeDebouncer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW_MS)
    }
}

//=== FpsBand =============================================================

/// Coarse frame-rate health band, for the collaborator that colors the
/// readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FpsBand {
    /// 55 fps and above.
    Good,
    /// 30 to 55 fps.
    Fair,
    /// Below 30 fps.
    Poor,
}

//=== FpsMeter ============================================================

/// Smoothed frames-per-second meter.
///
/// Frames and elapsed time accumulate every tick; the displayed value
/// refreshes at most once per refresh interval so the readout does not
/// flicker.
#[derive(Debug)]
pub struct FpsMeter {
    refresh_ms: f64,
    accum_ms: f64,
    frames: u32,
    display: f64,
}

impl FpsMeter {
    pub const DEFAULT_REFRESH_MS: f64 = 500.0;

    const GOOD_THRESHOLD: f64 = 55.0;
    const FAIR_THRESHOLD: f64 = 30.0;

    pub fn new(refresh_ms: f64) -> Self {
        Self {
            refresh_ms,
            accum_ms: 0.0,
            frames: 0,
            display: 0.0,
        }
    }

    /// Accounts one frame of `dt_ms` elapsed time.
    pub fn tick(&mut self, dt_ms: f64) {
        self.frames += 1;
        self.accum_ms += dt_ms;

        if self.accum_ms >= self.refresh_ms {
            self.display = f64::from(self.frames) * 1000.0 / self.accum_ms;
            self.frames = 0;
            self.accum_ms = 0.0;
        }
    }

    /// The most recently published frame rate.
    pub fn fps(&self) -> f64 {
        self.display
    }

    pub fn band(&self) -> FpsBand {
        if self.display >= Self::GOOD_THRESHOLD {
            FpsBand::Good
        } else if self.display >= Self::FAIR_THRESHOLD {
            FpsBand::Fair
        } else {
            FpsBand::Poor
        }
    }
}

impl Default for FpsMeter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_REFRESH_MS)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
