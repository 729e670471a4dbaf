use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{
    currency::CurrencyCode,
    errors::{BudgetError, Result},
    ledger::TimeInterval,
    optimizer::FitChoice,
};

const APP_DIR: &str = "budgetter";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

/// Defaults the CLI applies when turning records into schedules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub checking_account: String,
    pub date_format: String,
    pub expense_repeat: String,
    pub income_repeat: String,
    pub debt_repeat: String,
    pub payday_loan_repeat: String,
    pub payday_loan_type: String,
    pub default_fit: FitChoice,
    pub currency: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            checking_account: "checking".into(),
            date_format: "%m/%d/%Y".into(),
            expense_repeat: "monthly".into(),
            income_repeat: "bi-weekly".into(),
            debt_repeat: "monthly".into(),
            payday_loan_repeat: "bi-weekly".into(),
            payday_loan_type: "Payday Loan".into(),
            default_fit: FitChoice::default(),
            currency: "USD".into(),
        }
    }
}

impl Config {
    pub fn currency_code(&self) -> CurrencyCode {
        CurrencyCode::new(self.currency.clone())
    }

    /// Checks that every cadence token parses and the checking account is named.
    pub fn validate(&self) -> Result<()> {
        if self.checking_account.trim().is_empty() {
            return Err(BudgetError::ConfigError(
                "checking_account must not be empty".into(),
            ));
        }
        for (field, token) in [
            ("expense_repeat", &self.expense_repeat),
            ("income_repeat", &self.income_repeat),
            ("debt_repeat", &self.debt_repeat),
            ("payday_loan_repeat", &self.payday_loan_repeat),
        ] {
            TimeInterval::parse(token)
                .map_err(|err| BudgetError::ConfigError(format!("{field}: {err}")))?;
        }
        Ok(())
    }
}

/// Loads and saves [`Config`] as pretty JSON.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Uses `<config dir>/budgetter/config.json`.
    pub fn new() -> Result<Self> {
        let base = dirs::config_dir().ok_or_else(|| {
            BudgetError::ConfigError("could not determine the user config directory".into())
        })?;
        Ok(Self::with_path(base.join(APP_DIR).join(CONFIG_FILE)))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)
            .map_err(|err| BudgetError::ConfigError(format!("{}: {err}", self.path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("absent.json"));
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn save_then_load_keeps_overrides() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("nested").join(CONFIG_FILE));
        let config = Config {
            income_repeat: "weekly".into(),
            default_fit: FitChoice::MostDebts,
            ..Config::default()
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
        assert!(!tmp_path(manager.path()).exists());
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{ "checking_account": "Main" }"#).unwrap();
        let config = ConfigManager::with_path(&path).load().unwrap();
        assert_eq!(config.checking_account, "Main");
        assert_eq!(config.expense_repeat, "monthly");
    }

    #[test]
    fn invalid_cadence_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{ "debt_repeat": "0 weeks" }"#).unwrap();
        let err = ConfigManager::with_path(&path).load().unwrap_err();
        assert!(matches!(err, BudgetError::ConfigError(msg) if msg.starts_with("debt_repeat")));
    }
}
