// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

pub mod bitbuffer;
pub mod data;

pub type DynResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub use bitbuffer::{BitBuffer, BitRow, ParseError};
pub use data::{Data, Field, Value};
