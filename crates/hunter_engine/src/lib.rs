//! Hunter engine: probing, resolution strategies and the concurrent dispatcher.
mod control;
mod decode;
mod dispatcher;
mod extract;
mod probe;
mod resolve;

pub use control::{Checkpoint, RunControl};
pub use decode::{decode_body, DecodedBody};
pub use dispatcher::{Dispatcher, ReportStream, DEFAULT_CONCURRENCY};
pub use extract::{HtmlTitleExtractor, TitleExtractor};
pub use probe::{
    ProbeSession, ProbeSettings, ProbeSetupError, Prober, ReqwestProber, ReqwestSession,
    DEFAULT_USER_AGENT,
};
pub use resolve::{OverrideMap, Ports, Resolution, ResolutionStrategy};
