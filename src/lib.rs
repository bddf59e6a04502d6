//! ParleyLab - a guided negotiation study in the terminal
//!
//! One session walks a participant through consent, a freelancing scenario,
//! a scripted chat with a simulated client, and a short questionnaire, then
//! appends a single CSV row to the results file.
//!
//! ```no_run
//! use parleylab::condition::Condition;
//! use parleylab::session::{Phase, Session};
//!
//! let condition = Condition::draw(Some(42), None, None);
//! let session = Session::new(condition);
//! assert_eq!(session.phase(), Phase::Consent);
//! ```

pub mod app;
pub mod cli;
pub mod components;
pub mod condition;
pub mod config;
pub mod counterpart;
pub mod error;
pub mod input;
pub mod results;
pub mod script;
pub mod session;
pub mod theme;
pub mod ui;

pub use condition::{BatnaStrength, Condition, ReplyTempo};
pub use error::{ParleyLabError, Result};
pub use session::{Phase, Session};
