use shared::domain::ProductId;
use thiserror::Error;

/// Why a single product fetch failed.
///
/// Never leaves the catalog loader: every variant collapses into
/// `CatalogState::Error` there and is only logged.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid catalog url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("catalog request timed out")]
    Timeout,
    #[error("catalog request failed: {0}")]
    Transport(String),
    #[error("catalog server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed catalog payload: {0}")]
    Decode(String),
    #[error("duplicate product id {0} in catalog response")]
    DuplicateId(ProductId),
    #[error("product {id} has invalid price {price}")]
    InvalidPrice { id: ProductId, price: f64 },
    #[error("product source unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            Self::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("product name must not be blank")]
    BlankName,
    #[error("product price must be a positive number")]
    InvalidPrice,
    #[error("no product id left to assign")]
    IdsExhausted,
}
