//! The example dataset served by the handler.

use serde::{Deserialize, Serialize};

/// Cache key the dataset is stored under.
pub const COUNTRIES_KEY: &str = "countries";

/// Number of generated records.
pub const COUNTRY_COUNT: usize = 100;

/// One record of the example dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    pub capital: String,
}

/// Generate `count` deterministic records: `country<i>` / `capital<i>`.
pub fn generate_countries(count: usize) -> Vec<Country> {
    (0..count)
        .map(|i| Country {
            name: format!("country{}", i),
            capital: format!("capital{}", i),
        })
        .collect()
}
