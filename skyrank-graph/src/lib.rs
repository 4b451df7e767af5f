//! Second-degree popularity ranking over a follow graph.
//!
//! Given an actor, the pipeline loads the actor's follow-set, then the
//! follow-set of every account in it, and tallies how many of the actor's
//! follows follow each candidate. Two rankings come out of the tally:
//!
//! - absolute: candidates followed by the most of the actor's follows
//! - relative: candidates whose own follower base is most concentrated in
//!   the actor's follow-set (`count / followers_count`)
//!
//! Data flows strictly forward through [`paginate`] → [`aggregate`] →
//! [`enrich`] → [`rank`]; [`pipeline::run`] wires the stages together. The
//! remote graph is abstracted behind [`source::FollowGraphSource`] and
//! progress is reported through an injected [`progress::ProgressObserver`].
pub mod aggregate;
pub mod enrich;
pub mod model;
pub mod options;
pub mod paginate;
pub mod pipeline;
pub mod progress;
pub mod rank;
pub mod source;

pub use model::{AccountRef, Profile, SeedProfile, Tally, TallyEntry};
pub use options::RankOptions;
pub use pipeline::{run, Rankings, RunStats};
pub use progress::{NoProgress, ProgressEvent, ProgressObserver};
pub use source::{FollowGraphSource, Page};
