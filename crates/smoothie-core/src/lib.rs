//! # smoothie-core - Core Domain Types
//!
//! Foundation crate for the smoothie assistant. Provides domain types, error
//! handling, device classification, the responsive layout tables and the
//! bundled image manifest.
//!
//! This crate has **zero internal dependencies** and no DOM or async runtime
//! dependency, so it compiles for both native and `wasm32` targets.
//!
//! ## Public API
//!
//! ### Device Classification (`device`)
//! - [`ViewportMetrics`] - Raw window dimensions
//! - [`DeviceInfo`] - Derived mobile/landscape flags
//! - [`classify()`] - Pure classifier over [`ViewportMetrics`]
//!
//! ### Layout (`layout`)
//! - [`LayoutTable`] - Per-section style constants
//! - [`resolve_layout()`] - Select the desktop, mobile or very-small table
//! - [`derive_styles()`] - Inline style object for one UI element
//!
//! ### Chat Types (`chat`)
//! - [`ChatMessage`], [`Role`], [`SmoothieData`] - Conversation model
//! - [`ChatReply`], [`Intent`] - Wire response and its closed intent variant
//! - [`ChatFailure`] - Classified request failures
//!
//! ### Images (`images`)
//! - [`resolve_image_source()`] - Image precedence (bundled, absolute, production, dev)
//!
//! ### Error Handling (`error`)
//! - [`Error`], [`Result`], [`ResultExt`]
//!
//! ## Prelude
//!
//! ```rust
//! use smoothie_core::prelude::*;
//! ```

pub mod chat;
pub mod device;
pub mod error;
pub mod images;
pub mod layout;
#[cfg(not(target_arch = "wasm32"))]
pub mod logging;
pub mod types;

/// Prelude for common imports used throughout the smoothie crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

pub use chat::{
    ChatFailure, ChatMessage, ChatReply, ChatRequest, ChatTurn, Intent, Role, SmoothieData,
};
pub use device::{classify, is_ios, DeviceClass, DeviceInfo, ViewportMetrics, BREAKPOINTS};
pub use error::{Error, Result, ResultExt};
pub use images::{bundled_image, resolve_image_source, BUNDLED_IMAGES};
pub use layout::{
    background_styles, derive_styles, resolve_layout, responsive_class_name, BackgroundStyles,
    LayoutSection, LayoutTable, Style, StyledElement,
};
pub use types::{BuildMode, Rect, ViewportSample};
