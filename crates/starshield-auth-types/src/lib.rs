//! Auth types shared across StarShield services.
//!
//! Provides the `IdentityHeaders` extractor for gateway-authenticated requests.

pub mod identity;
