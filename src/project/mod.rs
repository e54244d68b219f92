//! Data contracts for the collaborators the wizard consumes: project detection,
//! recent projects, task import and build/test analysis.

pub mod analysis;
pub mod detect;
pub mod recent;
pub mod tasks;

pub use analysis::{MarkerAnalyzer, ProjectAnalysis, ProjectAnalyzer, Readiness};
pub use detect::{MarkerDetector, ProjectDetector, ProjectInfo, PROJECT_MARKERS};
pub use recent::{InMemoryRecents, RecentProject, RecentProjectStore, MAX_RECENT_PROJECTS};
pub use tasks::{PlainListImporter, Task, TaskImporter, TaskStatus};
