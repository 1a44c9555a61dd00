//! Hunter core: input models, the run-state machine and outcome bookkeeping.
mod address;
mod effect;
mod error;
mod msg;
mod search;
mod state;
mod task;
mod update;
mod view_model;

pub use address::{expand, AddressSet, AddressSpec};
pub use effect::Effect;
pub use error::InputError;
pub use msg::Msg;
pub use search::{title_matches, SearchText};
pub use state::RunState;
pub use task::{
    parse_domain_list, NetworkErrorKind, ProbeOutcome, ProbeReport, ProbeTask, Scheme, WorkPlan,
    NO_TITLE,
};
pub use update::update;
pub use view_model::RunSummary;
