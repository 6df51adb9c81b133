//! Common test utilities for places-client.
//!
//! This module provides shared utilities for testing the client against a
//! local stand-in for the PLACES API.
#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
pub mod stub_server;
