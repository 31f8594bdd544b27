//! Interactive sign-in against the identity platform
//!
//! [`NativeIdentityClient`] implements the `IdentityClient` seam with an
//! authorization-code + PKCE flow: the system browser is sent to the
//! authority's authorize endpoint, [`LoopbackServer`] catches the redirect on
//! `127.0.0.1`, and the code is exchanged at the token endpoint. Accounts and
//! tokens live in memory only.

pub mod loopback;
pub mod native;

// Re-export commonly used items
pub use loopback::LoopbackServer;
pub use native::{BrowserLauncher, IdentitySettings, NativeIdentityClient, SystemBrowser};
