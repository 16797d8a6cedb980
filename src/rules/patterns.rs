//! Compiled format patterns for statutory and contact fields.

use regex::Regex;

/// The fixed field formats the validators check against, compiled once at
/// engine construction.
#[derive(Debug, Clone)]
pub struct FieldPatterns {
    /// 10-digit Indian mobile number, first digit 6-9.
    pub mobile: Regex,
    /// 6-digit postal pincode, no leading zero.
    pub pincode: Regex,
    /// IFSC bank branch code.
    pub ifsc: Regex,
    /// 12-digit UAN.
    pub uan: Regex,
    /// 17-digit ESI number.
    pub esi: Regex,
}

impl FieldPatterns {
    pub fn compile() -> Self {
        Self {
            mobile: Regex::new(r"^[6-9][0-9]{9}$").unwrap(),
            pincode: Regex::new(r"^[1-9][0-9]{5}$").unwrap(),
            ifsc: Regex::new(r"^[A-Z]{4}0[A-Z0-9]{6}$").unwrap(),
            uan: Regex::new(r"^[0-9]{12}$").unwrap(),
            esi: Regex::new(r"^[0-9]{17}$").unwrap(),
        }
    }
}

impl Default for FieldPatterns {
    fn default() -> Self {
        Self::compile()
    }
}
