//! HTTP request handlers.

pub(crate) mod config;
pub(crate) mod feeds;
pub(crate) mod navigation;
pub(crate) mod pages;
pub(crate) mod search;
