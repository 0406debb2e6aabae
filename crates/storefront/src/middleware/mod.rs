//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. Request ID (`x-request-id`, generated if missing, echoed in response)
//! 3. `TraceLayer` (request tracing, span carries the request ID)
//! 4. Session layer (tower-sessions with `PostgreSQL` store; holds the cart)

pub mod session;

pub use session::{SessionLayerError, create_session_layer};
