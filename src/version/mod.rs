//! Version resolution layer
//!
//! This module turns a published release list into a concrete binary URL,
//! remembering which versions turned out to have no binary.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Registry   │────▶│   Filter    │────▶│  Resolver   │───▶ binary URL
//! │ (releases)  │     │ (candidates)│     │ (retry loop)│
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            ▲                   │
//!                            │                   ▼
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │    Store    │◀────│   Locator   │
//!                     │(neg. hits)  │     │ (snapshots) │
//!                     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`value`]: Four-component version value
//! - [`entry`]: Release records and candidate entries
//! - [`store`]: Negative-hit store and its file-backed variant
//! - [`filter`]: Release list to candidate list transformation
//! - [`resolver`]: Candidate selection and try-next-version loop
//! - [`registry`]: Traits for the remote sources
//! - [`registries`]: Concrete HTTP implementations
//! - [`error`]: Error types for this layer

pub mod entry;
pub mod error;
pub mod filter;
pub mod registries;
pub mod registry;
pub mod resolver;
pub mod store;
pub mod value;

pub use entry::{MappedEntry, RawRelease, Release};
pub use value::Version;
