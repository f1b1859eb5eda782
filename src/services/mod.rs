// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - credential primitives used by the handlers.

pub mod password;
pub mod token;

pub use password::{
    hash_password, hash_password_blocking, verify_password, verify_password_blocking,
    PasswordError, UNKNOWN_USER_DIGEST,
};
pub use token::{generate_token, TokenError};
