#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("catalog is misconfigured: {0}")]
    Catalog(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("reqwest error: {0:?}")]
    Reqwest(#[from] reqwest::Error),

    #[error("io error: {0:?}")]
    IO(#[from] std::io::Error),

    #[error("unexpected error: {0:?}")]
    Other(#[from] anyhow::Error),
}
