//! The wizard application: screens composed from widgets, the step machine that
//! routes messages between them, and the host that runs commands and the
//! terminal loop.

pub mod keys;
pub mod loop_process;
pub mod message;
pub mod runtime;
pub mod screens;
pub mod wizard;

pub use message::{AppMsg, Command, LoopPlan};
pub use runtime::{build_wizard, run, run_scripted, Collaborators, Host, RunSummary};
pub use wizard::{Wizard, WizardOptions, WizardStep};
