//! config.rs
//! Codec configuration: algorithm, level, execution mode, retry count and
//! the dummy codec's inverse ratio.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::types::{Result, ZipperError};
use crate::utils::env_parse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Algorithm {
    #[default]
    Deflate,
    Lz4,
    Zstd,
    Dummy,
    Dummy2,
}

impl Algorithm {
    /// Dummy variants ignore levels.
    pub fn honors_level(self) -> bool {
        !matches!(self, Algorithm::Dummy | Algorithm::Dummy2)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Deflate => "DEFLATE",
            Algorithm::Lz4 => "LZ4",
            Algorithm::Zstd => "ZSTD",
            Algorithm::Dummy => "DUMMY",
            Algorithm::Dummy2 => "DUMMY2",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEFLATE" => Ok(Algorithm::Deflate),
            "LZ4" => Ok(Algorithm::Lz4),
            "ZSTD" => Ok(Algorithm::Zstd),
            "DUMMY" => Ok(Algorithm::Dummy),
            "DUMMY2" => Ok(Algorithm::Dummy2),
            other => Err(format!("unknown algorithm {other:?}")),
        }
    }
}

/// `Hardware` fails when no accelerator can be used; `Auto` falls back to software.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    #[default]
    Hardware,
    Auto,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Hardware => "HARDWARE",
            Mode::Auto => "AUTO",
        })
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HARDWARE" | "HW" => Ok(Mode::Hardware),
            "AUTO" => Ok(Mode::Auto),
            other => Err(format!("unknown mode {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub algorithm: Algorithm,
    pub level: u32,
    pub mode: Mode,
    pub retry_count: u32,
    /// Expansion factor of the dummy codec.
    pub inverse_ratio: u32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            level: DEFAULT_COMPRESS_LEVEL,
            mode: Mode::default(),
            retry_count: DEFAULT_RETRY_COUNT,
            inverse_ratio: DEFAULT_INVERSE_RATIO,
        }
    }
}

impl CodecConfig {
    pub fn new(algorithm: Algorithm, level: u32, mode: Mode, retry_count: u32) -> Self {
        Self { algorithm, level, mode, retry_count, ..Self::default() }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    pub fn with_inverse_ratio(mut self, inverse_ratio: u32) -> Self {
        self.inverse_ratio = inverse_ratio;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.algorithm.honors_level()
            && !(MIN_COMPRESS_LEVEL..=MAX_COMPRESS_LEVEL).contains(&self.level)
        {
            return Err(ZipperError::Configuration(format!(
                "level {} outside {MIN_COMPRESS_LEVEL}..={MAX_COMPRESS_LEVEL}",
                self.level
            )));
        }
        if !self.algorithm.honors_level()
            && !(MIN_INVERSE_RATIO..=MAX_INVERSE_RATIO).contains(&self.inverse_ratio)
        {
            return Err(ZipperError::Configuration(format!(
                "inverse ratio {} outside {MIN_INVERSE_RATIO}..={MAX_INVERSE_RATIO}",
                self.inverse_ratio
            )));
        }
        Ok(())
    }

    /// Defaults overridden by `QAT_ZIPPER_*` variables. The result is validated.
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();
        let algorithm = env_parse::<Algorithm>(env_keys::ALGORITHM);
        if let Some(a) = algorithm.map_err(ZipperError::Configuration)? {
            cfg.algorithm = a;
        }
        if let Some(m) = env_parse::<Mode>(env_keys::MODE).map_err(ZipperError::Configuration)? {
            cfg.mode = m;
        }
        if let Some(level) = env_unsigned(env_keys::LEVEL)? {
            cfg.level = level;
        }
        if let Some(retry) = env_unsigned(env_keys::RETRY_COUNT)? {
            cfg.retry_count = retry;
        }
        if let Some(ratio) = env_unsigned(env_keys::INVERSE_RATIO)? {
            cfg.inverse_ratio = ratio;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Signed parse so that negative values get a clear message.
fn env_unsigned(key: &str) -> Result<Option<u32>> {
    match env_parse::<i64>(key).map_err(ZipperError::Configuration)? {
        None => Ok(None),
        Some(v) if v < 0 => Err(ZipperError::Configuration(format!(
            "{key} must not be negative, got {v}"
        ))),
        Some(v) => u32::try_from(v)
            .map(Some)
            .map_err(|_| ZipperError::Configuration(format!("{key}={v} is too large"))),
    }
}
