//! Cargo deck ULD placement planner.
//!
//! The [`domain`] module is the whole planning core: aircraft profiles,
//! pallet/container blocking, the load registry and CPM/LDM export. The
//! rest is plumbing for the command line front end.

pub mod app;
pub mod domain;
pub mod infra;
pub mod util;
