use thiserror::Error;

use crate::catalog::CatalogError;
use crate::model::ProgressError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
}
