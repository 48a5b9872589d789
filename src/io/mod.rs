pub mod loader;
pub mod npy;

pub use loader::{DEFAULT_TRACKS_DIR, TrackIo, normalize_track_name};
pub use npy::{NpyArray, parse_npy, read_npy, write_npy};
