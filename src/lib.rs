#[path = "core/dataset.rs"]
pub mod dataset;

#[path = "core/scale.rs"]
pub mod scale;

#[path = "core/frame.rs"]
pub mod frame;

#[path = "core/reconcile.rs"]
pub mod reconcile;

#[path = "core/playback.rs"]
pub mod playback;

#[path = "core/theme.rs"]
pub mod theme;

#[path = "core/format.rs"]
pub mod format;
