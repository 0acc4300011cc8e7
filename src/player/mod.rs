pub mod context;
pub mod output;
pub mod queue;
pub mod registry;
pub mod selection;
pub mod session;
pub mod skip;

pub use context::{Track, TrackContext};
pub use output::{AudioOutput, NullOutput};
pub use registry::PlayerRegistry;
pub use selection::CommittedSelection;
pub use session::GuildSession;
