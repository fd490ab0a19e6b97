// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Conditional navigation: links whose target depends on sign-in state.
//!
//! A resolver starts `Unresolved`, pointing at the default (signed-out)
//! destination, and moves to `Resolved` exactly once, after the session
//! check has run. Whatever was rendered before resolution stays the
//! target for clicks that already happened; nothing is intercepted.

/// Resolution state of one mounted link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Unresolved,
    Resolved { authenticated: bool },
}

#[derive(Debug, Clone)]
pub struct NavigationResolver {
    default_destination: String,
    authenticated_destination: String,
    resolution: Resolution,
}

impl NavigationResolver {
    pub fn new(
        default_destination: impl Into<String>,
        authenticated_destination: impl Into<String>,
    ) -> Self {
        Self {
            default_destination: default_destination.into(),
            authenticated_destination: authenticated_destination.into(),
            resolution: Resolution::Unresolved,
        }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.resolution, Resolution::Resolved { .. })
    }

    /// Current destination. Unresolved always maps to the default.
    pub fn destination(&self) -> &str {
        match self.resolution {
            Resolution::Resolved {
                authenticated: true,
            } => &self.authenticated_destination,
            _ => &self.default_destination,
        }
    }

    /// Run the deferred session check and settle the destination.
    ///
    /// The check runs at most once per resolver; later calls return the
    /// settled destination without consulting the session again.
    pub fn resolve(&mut self, is_authenticated: impl FnOnce() -> bool) -> &str {
        if !self.is_resolved() {
            self.resolution = Resolution::Resolved {
                authenticated: is_authenticated(),
            };
        }
        self.destination()
    }
}

/// Visual style of a [`SmartLink`], passed straight through to markup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkVariant {
    #[default]
    Primary,
    Secondary,
    Ghost,
}

impl LinkVariant {
    fn class(&self) -> &'static str {
        match self {
            LinkVariant::Primary => "btn btn-primary",
            LinkVariant::Secondary => "btn btn-secondary",
            LinkVariant::Ghost => "btn btn-ghost",
        }
    }
}

/// An actionable link backed by a [`NavigationResolver`].
#[derive(Debug, Clone)]
pub struct SmartLink {
    label: String,
    variant: LinkVariant,
    resolver: NavigationResolver,
}

impl SmartLink {
    pub fn new(
        label: impl Into<String>,
        default_destination: impl Into<String>,
        authenticated_destination: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            variant: LinkVariant::default(),
            resolver: NavigationResolver::new(default_destination, authenticated_destination),
        }
    }

    pub fn with_variant(mut self, variant: LinkVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn resolver(&self) -> &NavigationResolver {
        &self.resolver
    }

    pub fn resolve(&mut self, is_authenticated: impl FnOnce() -> bool) -> &str {
        self.resolver.resolve(is_authenticated)
    }

    pub fn href(&self) -> &str {
        self.resolver.destination()
    }

    /// Render as an anchor. Never disabled, resolved or not.
    pub fn render(&self) -> String {
        let state = if self.resolver.is_resolved() {
            "resolved"
        } else {
            "pending"
        };
        format!(
            r#"<a class="{}" href="{}" data-session="{}">{}</a>"#,
            self.variant.class(),
            escape_html(self.href()),
            state,
            escape_html(&self.label)
        )
    }
}

pub(crate) fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
