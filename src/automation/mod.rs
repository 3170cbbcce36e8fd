//! Keyword-triggered automation rule engine.
//!
//! Every inbound WhatsApp message flows through:
//! 1. `matcher::find_matching_flow()` — first active flow whose trigger fires
//! 2. `twiml::build_twiml()` — render the flow's responses (or the fallback)
//! 3. `handoff::find_handoff_target()` — decide whether to ping a human agent
//!
//! All three are pure; the webhook route owns the impure dispatch.

pub mod handoff;
pub mod matcher;
pub mod model;
pub mod twiml;
pub mod validate;

pub use handoff::{find_handoff_target, handoff_summary};
pub use matcher::find_matching_flow;
pub use model::{AutomationConfig, Flow, MatchType, Response};
pub use twiml::build_twiml;
pub use validate::validate;
