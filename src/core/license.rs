//! EULA gate
//!
//! AOCC may only be installed once the user has accepted AMD's end user
//! license agreement.

use crate::config::urls;
use crate::error::LicenseError;

/// Fail unless the EULA was accepted; log a reminder when it was
pub fn check_license(agreed: bool) -> Result<(), LicenseError> {
    if !agreed {
        return Err(LicenseError::NotAccepted {
            product: urls::PRODUCT_NAME.to_string(),
            url: urls::EULA_URL.to_string(),
        });
    }

    tracing::info!(
        "Reminder: by accepting the license you are confirming you agree to the terms of the {} EULA (found at {})",
        urls::PRODUCT_NAME,
        urls::EULA_URL
    );
    Ok(())
}
