//=========================================================================
// Core Systems
//=========================================================================
//
// The stage's core machinery, leaves first:
//
//   math     - 2D vector primitives
//   viewport - design-to-viewport fit policies and transform
//   timing   - resize debouncing and frame-rate accounting
//   pool     - fixed-capacity object pool + flame particle simulation
//   stack    - card entity + stack transfer state machine
//   scene    - scene lifecycle contract, director, shared context
//
// Everything here is single-threaded and driven synchronously from
// `Stage::tick`; no module owns a thread or a timer.
//
//=========================================================================

pub mod math;
pub mod pool;
pub mod scene;
pub mod stack;
pub mod timing;
pub mod viewport;
