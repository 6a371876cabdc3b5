//! AppleScript templates exposed as MCP tools.
//!
//! Each module builds one [`Category`] of operations. [`catalog`] registers
//! them all, in a fixed order, into a [`RegistryBuilder`] ready to be frozen
//! by the server.
//!
//! Templates interpolate caller input only through
//! [`osa_catalog::applescript`], so every literal is escaped the same way.

mod calendar;
mod clipboard;
mod finder;
mod handlers;
mod iterm;
mod mail;
mod messages;
mod notes;
mod notifications;
mod omnifocus;
mod pages;
mod shortcuts;
mod system;

use osa_catalog::{Category, RegistryBuilder};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

/// Category and operation whose output is an outline payload.
pub const HIERARCHICAL_SOURCE: (&str, &str) = ("omnifocus", "listItems");

/// Returns every category in registration order.
#[must_use]
pub fn categories() -> Vec<Category> {
    vec![
        system::category(),
        calendar::category(),
        finder::category(),
        clipboard::category(),
        notifications::category(),
        iterm::category(),
        mail::category(),
        pages::category(),
        shortcuts::category(),
        messages::category(),
        notes::category(),
        omnifocus::category(),
    ]
}

/// Characters escaped in URL query components: everything outside the
/// RFC 3986 unreserved set.
pub(crate) const URL_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Drops values that are absent or only whitespace.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// Returns a builder holding every category.
#[must_use]
pub fn catalog() -> RegistryBuilder {
    let mut builder = RegistryBuilder::new();
    for category in categories() {
        builder.register(category);
    }
    builder
}

#[cfg(test)]
mod tests;
