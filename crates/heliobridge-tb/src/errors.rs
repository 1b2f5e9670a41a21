// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of HelioBridge.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Error types for the platform client

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TbError {
    #[error("platform authentication failed")]
    AuthenticationFailed,

    #[error("platform API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("client configuration error: {0}")]
    Config(String),
}

pub type TbResult<T> = std::result::Result<T, TbError>;
