//! Auto image generation filter for chat pipelines.
//!
//! Watches incoming user messages for image-generation intent and, when
//! triggered, asks a text-completion service to draft a short image prompt,
//! renders it through an image-generation service, and delivers progress and
//! the finished image over the host's event channel.

pub mod config;
pub mod error;
pub mod events;
pub mod filter;
pub mod interfaces;
pub mod logging;
pub mod message;
pub mod providers;
pub mod retry;
pub mod triggers;

pub use crate::config::FilterConfig;
pub use crate::error::{AutodrawError, Result};
pub use crate::events::{Event, EventEmitter};
pub use crate::filter::{AutoImageFilter, Outcome};
pub use crate::message::{Message, RequestBody};
