// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Platform scroll surfaces.
//!
//! Both surfaces implement [`crate::ViewportBackend`] and
//! [`crate::ScrollSurface`], so the container, the proxy and the gesture
//! recognizers are shared. They differ where the native toolkits differ:
//!
//! | | [`DesktopBackend`] | [`TouchBackend`] |
//! |---|---|---|
//! | `visible_rect` | document coordinates | scaled bounds |
//! | `content_size` | natural size | scaled size plus centering |
//! | `scroll_to` | centers on the rect's center | minimal reveal |
//! | live magnify | start/end notifications | zooming or bouncing flags |

mod desktop;
mod touch;

pub use desktop::DesktopBackend;
pub use touch::TouchBackend;

/// The surface matching the target platform's native scroll view.
#[cfg(any(target_os = "ios", target_os = "android"))]
pub type NativeBackend = TouchBackend;

/// The surface matching the target platform's native scroll view.
#[cfg(not(any(target_os = "ios", target_os = "android")))]
pub type NativeBackend = DesktopBackend;
