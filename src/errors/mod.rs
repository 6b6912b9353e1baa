mod setup_di_error;
pub use setup_di_error::SetupDiError;
