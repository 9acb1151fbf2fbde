use thiserror::Error;

use crate::domain::reference::ReferenceError;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("http error: {0}")]
    Http(#[from] Box<ureq::Error>),

    #[error("failed to decode catalog response: {0}")]
    Decode(#[from] std::io::Error),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("{0} not found in catalog")]
    NotFound(String),
}

impl From<ureq::Error> for CatalogError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(404, response) => {
                CatalogError::NotFound(response.get_url().to_string())
            }
            other => CatalogError::Http(Box::new(other)),
        }
    }
}

/// Reasons a reference could not be expanded into work items
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl ResolveError {
    pub fn is_unsupported(&self) -> bool {
        matches!(self, ResolveError::Reference(_))
    }
}
