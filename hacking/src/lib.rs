pub mod action;
pub mod config;
pub mod countdown;
pub mod dice;
pub mod die;
pub mod difficulty;
pub mod driver;
pub mod error;
pub mod logging;
pub mod projection;
pub mod remote_api;
pub mod selection;
pub mod session;
pub mod settings;

pub use action::HackAction;
pub use driver::{ActionReport, SessionDriver, SessionHandle};
pub use projection::{HackPhase, HackSnapshot, Outcome};
pub use session::{HackSession, Modification};
