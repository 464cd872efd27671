//! Wire message types for the handshake and the push channel.
//!
//! Every shape here is bit-exact where the remote service requires it: field
//! names are fixed with `#[serde(rename)]` and the keep-alive frame serializes
//! its fields in the wire order.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `frames` | Outbound keep-alive frames (`ARQ` / `BCN`) |
//! | `messages` | Handshake request and response bodies |

// ============================================================================
// Submodules
// ============================================================================

/// Outbound keep-alive frames.
pub mod frames;

/// Handshake request and response bodies.
pub mod messages;

// ============================================================================
// Re-exports
// ============================================================================

pub use frames::{FrameKind, KeepAliveFrame};
pub use messages::{
    ChannelGrant, ChannelRegistration, FilterDeclaration, InitialLoadResponse, LoginRequest,
    LoginResponse, PushLoginRequest,
};
