// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - sign-in, navigation and detection logic.

pub mod callback;
pub mod detection;
pub mod navigation;

pub use callback::{CallbackHandler, CallbackParams, Navigation};
pub use detection::{CheckRequest, DetectionClient};
pub use navigation::{LinkVariant, NavigationResolver, SmartLink};
