//! The counter is organized around a single [record::CounterRecord].
//! The basic idea is:
//!  - The record is mutated only through [actions::Actions].
//!  - [actions::rollover_if_needed] must run before any count mutation so that the current
//!    count only reflects today's activity.
//!  - Anything read from the outside goes through [normalize::normalize_record] first.

pub mod actions;
pub mod normalize;
pub mod record;
