//! Cloud leaderboard and player accounts
//!
//! The hosted backend is a Supabase project (GoTrue auth + PostgREST tables
//! `profiles` and `scores`). The game core only sees:
//! - `SessionHandle`: authenticated or not, plus a display name
//! - `ScoreReporter`: fire-and-forget submission of a finished round
//!
//! Request construction and response parsing are pure and live in
//! `requests`; the browser transport is in `client` (wasm32 only).

#[cfg(target_arch = "wasm32")]
pub mod client;
pub mod records;
pub mod requests;
pub mod session;
pub mod view;

#[cfg(target_arch = "wasm32")]
pub use client::{CloudClient, CloudReporter};
pub use records::{
    CloudError, Credentials, LeaderboardFilter, NewScore, NullReporter, RoundReport, ScoreRecord,
    ScoreReporter,
};
pub use requests::{CloudConfig, CloudRequest, Method};
pub use session::{AuthSession, Profile, Session, SessionHandle};
pub use view::{LeaderboardRow, LeaderboardView};
