// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod advice;
pub mod aggregate;
pub mod backend;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod remote;
pub mod session;
pub mod store;
pub mod utils;

pub use error::{LedgerError, Result};
pub use session::Session;
pub use store::LedgerStore;
