//! Integration test support for Pixel Exchange.
//!
//! The actual tests live in `tests/`; they drive the storefront router
//! in-process with `tower::ServiceExt::oneshot`, carrying the session
//! cookie between requests by hand.

#![cfg_attr(not(test), forbid(unsafe_code))]
