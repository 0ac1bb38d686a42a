pub mod classifier;
pub mod config;
pub mod invocation;
pub mod marker;
pub mod orchestrator;
pub mod playlist;
pub mod runner;
pub mod testing;

pub use classifier::{OutputPatterns, RunState, StreamClassifier, StreamEvent};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DestinationConfig,
    DownloaderConfig, PolicyFlags, RateLimitConfig, ShortcutOs,
};
pub use invocation::{Invocation, InvocationBuilder, InvocationError};
pub use marker::{MarkerError, MarkerOutcome, MarkerStyle, MarkerWriter};
pub use orchestrator::{Orchestrator, PlaylistOutcome, PlaylistReport, RunSummary, SyncError};
pub use playlist::{DestinationContext, PlaylistDescriptor, PlaylistError, PlaylistKind};
pub use runner::{CommandRunner, ExitReport, ProcessRun, ProcessRunner, RunOutput, RunnerError};
