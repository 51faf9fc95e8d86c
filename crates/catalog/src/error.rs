//! 目录领域错误

use mesa_errors::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Selling price exceeds original price")]
    NegativeDiscount,

    #[error("Price fields use different currencies")]
    CurrencyMismatch,

    #[error("Coupon must expire after it becomes active")]
    InvalidWindow,

    #[error("Percentage discount must be between 1 and 100")]
    InvalidPercentage,

    #[error("Fixed discount must be positive")]
    NonPositiveDiscount,

    #[error("Coupon code must not be empty")]
    EmptyCode,

    #[error("Categories may be nested at most two levels deep")]
    CategoryTooDeep,

    #[error("Vendor categories cannot be global")]
    VendorGlobalCategory,
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        AppError::validation(err.to_string())
    }
}
