//! Build server API over HTTP

pub mod client;

pub use client::JenkinsClient;
