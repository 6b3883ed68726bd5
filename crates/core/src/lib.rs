//! Core of questlog: the experience data model, document parsers, layout
//! derivation and view transforms, plus the UI-agnostic state machines
//! (preferences, tooltips, routing) and decorative effects shared by every
//! front end.

pub mod config;
pub mod fuzzy;
pub mod layout;
pub mod model;
pub mod parsers;
pub mod prefs;
pub mod routes;
pub mod splash;
pub mod svg;
pub mod tooltip;
pub mod views;

pub use config::SiteConfig;
