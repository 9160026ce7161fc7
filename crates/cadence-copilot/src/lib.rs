//! Natural-language queries over the update store.
//!
//! A query is classified by keyword into one of a handful of kinds
//! ([`classify`]), the matching responder reads the store, and
//! [`answer`] formats a reply with the structured payload and a set of
//! suggested follow-up questions. Session history lives in an explicit
//! bounded [`ChatLog`] owned by whoever is running the conversation.

pub mod answer;
pub mod classify;
pub mod respond;
pub mod session;
pub mod suggest;

#[cfg(test)]
mod testutil;

pub use answer::{answer, answer_at, CopilotReply, ReplyKind};
pub use classify::{classify, QueryKind};
pub use respond::{
    current_blockers, missing_updates, productivity_by_department, team_engagement, BlockerItem,
    DayScore, EngagementRow, MissingMember,
};
pub use session::{ChatLog, Exchange, DEFAULT_CHAT_CAPACITY};
pub use suggest::{StaticSuggestions, SuggestionProvider};
