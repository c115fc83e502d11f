//! Currency catalog and selection for exchange rate queries.

/// Currency codes the PrivatBank archive publishes cash rates for.
pub const PRIVATBANK_CURRENCIES: [&str; 26] = [
    "AUD", "AZN", "BYN", "CAD", "CHF", "CNY", "CZK", "DKK", "EUR", "GBP", "GEL", "HUF", "ILS",
    "JPY", "KZT", "MDL", "NOK", "PLN", "SEK", "SGD", "TMT", "TRY", "UAH", "USD", "UZS", "XAU",
];

/// Currencies included in every query regardless of caller input.
pub const BASE_CURRENCIES: [&str; 2] = ["USD", "EUR"];

/// The fixed set of currency codes an upstream source supports, plus the
/// base currencies every selection starts from.
#[derive(Debug, Clone)]
pub struct CurrencyCatalog {
    supported: Vec<String>,
    base: Vec<String>,
}

impl Default for CurrencyCatalog {
    fn default() -> Self {
        Self::privatbank()
    }
}

impl CurrencyCatalog {
    /// Catalog of the PrivatBank public exchange rates API.
    pub fn privatbank() -> Self {
        Self::new(&PRIVATBANK_CURRENCIES, &BASE_CURRENCIES)
    }

    /// Builds a catalog from supported codes and mandatory base codes.
    /// Base codes must themselves be supported.
    pub fn new(supported: &[&str], base: &[&str]) -> Self {
        let supported: Vec<String> = supported.iter().map(|code| code.to_uppercase()).collect();
        let base: Vec<String> = base.iter().map(|code| code.to_uppercase()).collect();
        debug_assert!(base.iter().all(|code| supported.contains(code)));

        CurrencyCatalog { supported, base }
    }

    pub fn supports(&self, code: &str) -> bool {
        self.supported.iter().any(|supported| supported == code)
    }

    /// Validates and normalizes requested currency codes against the catalog.
    ///
    /// The returned selection always starts with the base currencies;
    /// accepted extras follow in request order, without duplicates. Unknown
    /// codes come back separately (uppercased, deduplicated) so callers can
    /// warn about them instead of aborting.
    pub fn select<I, S>(&self, requested: I) -> (CurrencySelection, Vec<String>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut codes = self.base.clone();
        let mut rejected: Vec<String> = Vec::new();

        for raw in requested {
            let code = raw.as_ref().to_uppercase();
            if self.supports(&code) {
                if !codes.contains(&code) {
                    codes.push(code);
                }
            } else if !rejected.contains(&code) {
                rejected.push(code);
            }
        }

        (CurrencySelection { codes }, rejected)
    }
}

/// An ordered, duplicate-free set of catalog currency codes, always led by
/// the base currencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencySelection {
    codes: Vec<String>,
}

impl CurrencySelection {
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|selected| selected == code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
