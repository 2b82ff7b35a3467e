pub use turnstile_core::prelude::*;

// vim: ts=4
