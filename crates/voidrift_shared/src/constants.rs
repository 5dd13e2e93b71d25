//! # World Constants
//!
//! Production configuration shared by the generator and the simulation.
//!
//! **CRITICAL:** These values are part of the world format. Changing them
//! invalidates every existing seed and snapshot.

/// Side length of one chunk in world units.
///
/// Chunks are fixed-size squares; a chunk coordinate `(cx, cy)` covers the
/// world rectangle `[cx * 1200, (cx + 1) * 1200) x [cy * 1200, (cy + 1) * 1200)`.
pub const CHUNK_SIZE_UNITS: f32 = 1200.0;

/// Default Chebyshev radius (in chunks) kept loaded around the player.
pub const DEFAULT_LOAD_RADIUS: i32 = 2;

/// Default Chebyshev radius (in chunks) beyond which chunks are evicted.
///
/// Must stay strictly above [`DEFAULT_LOAD_RADIUS`] or streaming will
/// thrash: a chunk would be evicted and immediately regenerated.
pub const DEFAULT_UNLOAD_RADIUS: i32 = 4;
