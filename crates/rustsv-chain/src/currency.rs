//! Supported currencies and exact native-unit conversion.
//!
//! Native BSV units convert to satoshis with integer decimal-string
//! scaling, so no floating point touches the exact path. Fiat currencies
//! convert through a fetched exchange rate (see `rates`).

use crate::ChainError;

/// A currency a payment amount can be denominated in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Currency {
    /// The base chain unit: 1 satoshi.
    Satoshi,
    /// Microbitcoin: 100 satoshis.
    UBsv,
    /// Millibitcoin: 100 000 satoshis.
    MBsv,
    /// One coin: 100 000 000 satoshis.
    Bsv,
    /// United States Dollar.
    Usd,
    /// Eurozone Euro.
    Eur,
    /// Pound Sterling.
    Gbp,
    /// Japanese Yen.
    Jpy,
    /// Chinese Yuan.
    Cny,
    /// Canadian Dollar.
    Cad,
    /// Australian Dollar.
    Aud,
}

impl Currency {
    /// Parse a lowercase currency code.
    ///
    /// # Arguments
    /// * `code` - A code such as "satoshi", "mbsv", or "usd".
    ///
    /// # Returns
    /// The currency, or `UnsupportedCurrency` for unknown codes.
    pub fn from_code(code: &str) -> Result<Self, ChainError> {
        match code {
            "satoshi" => Ok(Currency::Satoshi),
            "ubsv" => Ok(Currency::UBsv),
            "mbsv" => Ok(Currency::MBsv),
            "bsv" => Ok(Currency::Bsv),
            "usd" => Ok(Currency::Usd),
            "eur" => Ok(Currency::Eur),
            "gbp" => Ok(Currency::Gbp),
            "jpy" => Ok(Currency::Jpy),
            "cny" => Ok(Currency::Cny),
            "cad" => Ok(Currency::Cad),
            "aud" => Ok(Currency::Aud),
            other => Err(ChainError::UnsupportedCurrency(other.to_string())),
        }
    }

    /// The lowercase code for this currency.
    ///
    /// # Returns
    /// The code string.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Satoshi => "satoshi",
            Currency::UBsv => "ubsv",
            Currency::MBsv => "mbsv",
            Currency::Bsv => "bsv",
            Currency::Usd => "usd",
            Currency::Eur => "eur",
            Currency::Gbp => "gbp",
            Currency::Jpy => "jpy",
            Currency::Cny => "cny",
            Currency::Cad => "cad",
            Currency::Aud => "aud",
        }
    }

    /// Decimal places of the native unit, if this is a native unit.
    ///
    /// satoshi = 0, ubsv = 2, mbsv = 5, bsv = 8.
    ///
    /// # Returns
    /// `Some(scale)` for native units, `None` for fiat.
    pub fn native_scale(&self) -> Option<u32> {
        match self {
            Currency::Satoshi => Some(0),
            Currency::UBsv => Some(2),
            Currency::MBsv => Some(5),
            Currency::Bsv => Some(8),
            _ => None,
        }
    }

    /// Whether this currency converts to satoshis without an exchange rate.
    ///
    /// # Returns
    /// `true` for the native chain units.
    pub fn is_native(&self) -> bool {
        self.native_scale().is_some()
    }
}

/// Parse a non-negative decimal string into an integer scaled by 10^scale.
///
/// `"1.5"` at scale 8 yields 150_000_000. Fractional digits beyond the
/// scale are truncated toward zero. Signs, exponents, and non-digit
/// characters are rejected.
///
/// # Arguments
/// * `amount` - The decimal string.
/// * `scale` - The number of decimal places in the target unit.
///
/// # Returns
/// The scaled integer value, or `InvalidAmount`.
pub fn parse_decimal_scaled(amount: &str, scale: u32) -> Result<u64, ChainError> {
    let s = amount.trim();
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(ChainError::InvalidAmount(amount.to_string()));
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ChainError::InvalidAmount(amount.to_string()));
    }

    let int_value: u64 = if int_part.is_empty() {
        0
    } else {
        int_part
            .parse()
            .map_err(|_| ChainError::InvalidAmount(amount.to_string()))?
    };

    let mut value = int_value
        .checked_mul(10u64.pow(scale))
        .ok_or_else(|| ChainError::InvalidAmount(amount.to_string()))?;

    for (i, c) in frac_part.chars().take(scale as usize).enumerate() {
        let digit = c as u64 - '0' as u64;
        value = value
            .checked_add(digit * 10u64.pow(scale - 1 - i as u32))
            .ok_or_else(|| ChainError::InvalidAmount(amount.to_string()))?;
    }

    Ok(value)
}

/// Convert a decimal amount in a native unit to satoshis, exactly.
///
/// # Arguments
/// * `amount` - The decimal amount string.
/// * `currency` - A native unit (satoshi/ubsv/mbsv/bsv).
///
/// # Returns
/// The satoshi value, or an error for fiat currencies or bad amounts.
pub fn native_to_satoshis(amount: &str, currency: Currency) -> Result<u64, ChainError> {
    let scale = currency
        .native_scale()
        .ok_or_else(|| ChainError::UnsupportedCurrency(currency.code().to_string()))?;
    parse_decimal_scaled(amount, scale)
}
