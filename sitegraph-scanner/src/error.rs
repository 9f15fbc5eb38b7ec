use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("XML parse error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("Sitemap error: {0}")]
    SitemapError(String),

    #[error("Redirect limit exceeded for {0}")]
    RedirectLimit(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;
