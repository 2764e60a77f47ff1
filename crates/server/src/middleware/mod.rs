//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. CORS
//! 3. `TraceLayer` (request span with status and latency)
//! 4. Request ID (recorded in the span, echoed in `x-request-id`)
//! 5. Session layer (in-memory store, carries dashboard flash messages)

pub mod cors;
pub mod request_id;
pub mod session;
pub mod trace;

pub use cors::cors_layer;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::create_session_layer;
pub use trace::trace_layer;
