use serde::{Deserialize, Serialize};

/// How often an annual rate is split into compounding periods.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum InterestFrequency {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl InterestFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            InterestFrequency::Daily => 365,
            InterestFrequency::Weekly => 52,
            InterestFrequency::Monthly => 12,
            InterestFrequency::Quarterly => 4,
            InterestFrequency::Yearly => 1,
        }
    }
}

/// Interest accrued on `principal` over one period at annual rate `apr`.
pub fn calc_interest(principal: f64, apr: f64, frequency: InterestFrequency) -> f64 {
    principal * (apr / frequency.periods_per_year() as f64)
}
