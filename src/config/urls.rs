//! Vendor URLs

/// Product name used in user-facing messages
pub const PRODUCT_NAME: &str = "aocc";

/// AMD AOCC end user license agreement
pub const EULA_URL: &str = "https://www.amd.com/en/developer/aocc/aocc-compiler/eula.html";
