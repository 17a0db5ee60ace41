/// Infrastructure errors.
///
/// Domain operations are total and never return these. `AppError` covers
/// terminal set-up, the advisory runtime and HTTP client construction, and
/// config parsing (which is downgraded to a warning by the loader).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("advisory client error: {0}")]
    Advisory(#[from] reqwest::Error),

    #[error("failed to start advisory runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_source() {
        let e = AppError::Runtime(std::io::Error::other("no threads"));
        assert_eq!(e.to_string(), "failed to start advisory runtime: no threads");

        let parse = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let e: AppError = parse.into();
        assert!(e.to_string().starts_with("config parse error"));
    }
}
