//=========================================================================
// Viewport Transform
//=========================================================================
//
// Maps the fixed design surface onto an arbitrary physical viewport.
//
// All scene content is authored against a fixed logical resolution (the
// design surface). The physical viewport can be any size; a fit policy
// decides how the design surface is scaled into it. Regardless of policy,
// the pivot is the design-surface center and the origin is the viewport
// center, so the content is always centered.
//
// Flow:
//   resize / set_policy -> compute() -> cached Transform2D -> renderer
//
//=========================================================================

//=== FitPolicy ===========================================================

/// Rule mapping the design surface onto the physical viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitPolicy {
    /// Uniform scale by the smaller axis ratio. Content is letterboxed
    /// and fully visible.
    #[default]
    Fit,

    /// Uniform scale by the larger axis ratio. Content may overflow the
    /// viewport; an enclosing collaborator mask clips the overflow.
    Fill,

    /// Independent per-axis scale. Fills the viewport exactly but may
    /// distort the aspect ratio.
    Stretch,

    /// Uniform scale driven by the width ratio only.
    FitWidth,

    /// Uniform scale driven by the height ratio only.
    FitHeight,
}

//=== Transform2D =========================================================

/// The computed design-to-viewport mapping.
///
/// `origin` is where the design-surface center lands in viewport
/// coordinates; it is always the viewport center. Callers apply the
/// transform, the core never paints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    pub scale_x: f32,
    pub scale_y: f32,
    pub origin_x: f32,
    pub origin_y: f32,
}

impl Transform2D {
    /// The identity mapping (scale 1, origin at the design center).
    pub fn identity(design_w: f32, design_h: f32) -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            origin_x: design_w / 2.0,
            origin_y: design_h / 2.0,
        }
    }
}

//=== compute() ===========================================================

/// Computes the transform mapping a `design_w` x `design_h` surface onto
/// a `viewport_w` x `viewport_h` viewport under `policy`.
///
/// Pure function of its inputs: identical inputs always yield identical
/// outputs, and nothing is mutated.
pub fn compute(
    design_w: f32,
    design_h: f32,
    viewport_w: f32,
    viewport_h: f32,
    policy: FitPolicy,
) -> Transform2D {
    let ratio_x = viewport_w / design_w;
    let ratio_y = viewport_h / design_h;

    let (scale_x, scale_y) = match policy {
        FitPolicy::Fill => {
            let s = ratio_x.max(ratio_y);
            (s, s)
        }
        FitPolicy::Stretch => (ratio_x, ratio_y),
        FitPolicy::FitWidth => (ratio_x, ratio_x),
        FitPolicy::FitHeight => (ratio_y, ratio_y),
        // Fit is also the fallback behavior for any policy the caller
        // does not recognize.
        FitPolicy::Fit => {
            let s = ratio_x.min(ratio_y);
            (s, s)
        }
    };

    Transform2D {
        scale_x,
        scale_y,
        origin_x: viewport_w / 2.0,
        origin_y: viewport_h / 2.0,
    }
}

//=== ViewportTransform ===================================================

/// Stateful wrapper owning the design size, current physical size, and
/// fit policy, with the derived transform cached.
///
/// The transform is recomputed whenever the physical size or the policy
/// changes; it is never persisted and is purely a function of
/// (design size, physical size, policy).
#[derive(Debug, Clone)]
pub struct ViewportTransform {
    design_w: f32,
    design_h: f32,
    physical_w: f32,
    physical_h: f32,
    policy: FitPolicy,
    current: Transform2D,
}

impl ViewportTransform {
    /// Creates a transform for the given design surface. The physical
    /// size starts equal to the design size, so the initial transform is
    /// the identity.
    pub fn new(design_w: f32, design_h: f32, policy: FitPolicy) -> Self {
        Self {
            design_w,
            design_h,
            physical_w: design_w,
            physical_h: design_h,
            policy,
            current: compute(design_w, design_h, design_w, design_h, policy),
        }
    }

    //--- Mutation ---------------------------------------------------------

    /// Applies a new physical viewport size and recomputes the transform.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.physical_w = width;
        self.physical_h = height;
        self.recompute();
    }

    /// Changes the fit policy and recomputes immediately.
    pub fn set_policy(&mut self, policy: FitPolicy) {
        self.policy = policy;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.current = compute(
            self.design_w,
            self.design_h,
            self.physical_w,
            self.physical_h,
            self.policy,
        );
    }

    //--- Queries ----------------------------------------------------------

    pub fn transform(&self) -> Transform2D {
        self.current
    }

    pub fn policy(&self) -> FitPolicy {
        self.policy
    }

    pub fn design_size(&self) -> (f32, f32) {
        (self.design_w, self.design_h)
    }

    pub fn physical_size(&self) -> (f32, f32) {
        (self.physical_w, self.physical_h)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
