//! Outbound emergency calling.
//!
//! [`TwilioClient`] speaks the Twilio REST wire format; the
//! [`EscalationTrigger`] owns the fixed contact/payload and produces one
//! [`EscalationEvent`] per harmful verdict.

pub mod client;
pub mod trigger;

pub use client::{TwilioClient, VoiceCallProvider};
pub use trigger::{CallOutcome, EscalationEvent, EscalationTrigger};
