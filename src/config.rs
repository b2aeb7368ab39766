// src/config.rs
//! Process configuration, read once at startup.

use anyhow::Context;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_PUBLIC_DIR: &str = "public";

pub const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant of IIT Madras who solves any query related to IIT Madras. You are succinct and provide just enough information to be useful";

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub bind_addr: String,
    pub public_dir: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &mask_secret(&self.api_key))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("bind_addr", &self.bind_addr)
            .field("public_dir", &self.public_dir)
            .finish()
    }
}

impl Config {
    /// Reads configuration from environment variables.
    ///
    /// | Variable          | Default                                     |
    /// |-------------------|---------------------------------------------|
    /// | `GEMINI_API_KEY`  | required                                    |
    /// | `GEMINI_MODEL`    | `gemini-1.5-flash`                          |
    /// | `GEMINI_BASE_URL` | `https://generativelanguage.googleapis.com` |
    /// | `BIND_ADDR`       | `0.0.0.0:3000`                              |
    /// | `PUBLIC_DIR`      | `public`                                    |
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let api_key = lookup("GEMINI_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .context("GEMINI_API_KEY must be set")?;

        Ok(Self {
            api_key,
            model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            base_url: lookup("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            public_dir: lookup("PUBLIC_DIR").unwrap_or_else(|| DEFAULT_PUBLIC_DIR.into()),
        })
    }
}

/// Keeps the last four characters of a secret, enough to tell keys apart in logs.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}
