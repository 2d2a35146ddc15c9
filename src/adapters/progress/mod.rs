//! Progress channel adapters.

mod recording;
mod watch;

pub use recording::RecordingProgressChannel;
pub use watch::WatchProgressChannel;
