//! `tandem-comms` — the simulated asynchronous network.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`message`] | `TeamMsg`, `PartnerMsg`, `PlanStep`, `Envelope`, `Outgoing`     |
//! | [`mailbox`] | `Mailbox<M>` (pending / actionable queues), `Inbox`             |
//! | [`post`]    | `PostOffice` — latency draws, fan-out, delivery, purging        |
//!
//! # Delivery model
//!
//! ```text
//! send (tick t)      → countdown c ∈ [min_delay, max_delay], filed as pending
//! deliver (each tick)→ c -= 1; c == 0 ⇒ promoted to actionable
//! read               → the owning protocol takes what it reacts to
//! deliver            → lock/unlock pairs annihilate; old entries are purged
//! ```
//!
//! Every recipient gets its own `Envelope` copy, so a countdown is never
//! shared between two mailboxes.

pub mod mailbox;
pub mod message;
pub mod post;


pub use mailbox::{Inbox, Mailbox};
pub use message::{Envelope, Outgoing, PartnerMsg, PlanStep, Recipient, TeamMsg};
pub use post::{DeliveryReport, PostOffice, PostStats};
