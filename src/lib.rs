#![no_std]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod announce;
pub mod config;
pub mod dedup;
pub mod host;
pub mod kernel;
pub mod registry;
pub mod screen;
pub mod sync;

pub use self::{
    announce::Announcement,
    config::{DebounceConfig, Policy},
    dedup::{Deduplicator, Observed},
    host::{Element, Error, HostQuery, Narrator},
    kernel::Kernel,
    registry::MenuStateRegistry,
    screen::{Context, ContextSet, Screen, ScreenSet},
};
pub use time;
