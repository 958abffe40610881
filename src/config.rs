use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::data::loader::load_member_ids;
use crate::data::model::AccountWithDataSet;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser, Debug, Default)]
#[command(
    name = "group-picker",
    about = "Pick contacts of an account to add to one of its groups"
)]
pub struct Cli {
    /// Contacts file to open at start-up (.parquet, .json or .csv)
    #[arg(long)]
    pub contacts: Option<PathBuf>,

    /// File listing the raw contact ids already in the group (.json or one per line)
    #[arg(long)]
    pub members: Option<PathBuf>,

    /// Raw contact ids already in the group, comma separated
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Account type the group belongs to, e.g. com.google
    #[arg(long, requires = "account_name")]
    pub account_type: Option<String>,

    /// Account name the group belongs to
    #[arg(long, requires = "account_type")]
    pub account_name: Option<String>,

    /// Optional data set within the account
    #[arg(long, requires = "account_type")]
    pub data_set: Option<String>,

    /// Session file; restored at start-up when it exists
    #[arg(long)]
    pub session: Option<PathBuf>,
}

impl Cli {
    /// Resolve the picker arguments. A saved session, when present, takes
    /// precedence over everything given on the command line.
    pub fn into_arguments(self) -> Result<PickerArguments> {
        if let Some(session) = &self.session {
            if session.exists() {
                log::info!("Restoring session from {}", session.display());
                return PickerArguments::load(session);
            }
        }

        let account = match (self.account_type, self.account_name) {
            (Some(account_type), Some(name)) => Some(AccountWithDataSet {
                name,
                account_type,
                data_set: self.data_set,
            }),
            (None, None) => None,
            _ => bail!("--account-type and --account-name must be given together"),
        };

        let mut raw_contact_ids = Vec::new();
        if let Some(path) = &self.members {
            raw_contact_ids.extend(load_member_ids(path)?);
        }
        raw_contact_ids.extend(
            self.exclude
                .into_iter()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
        );

        Ok(PickerArguments::new(account, raw_contact_ids))
    }
}

// ---------------------------------------------------------------------------
// Picker arguments (also the saved session format)
// ---------------------------------------------------------------------------

/// Everything the picker needs to be recreated: the account whose contacts
/// are offered, and the raw contact ids already in the group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerArguments {
    #[serde(default)]
    pub account: Option<AccountWithDataSet>,
    #[serde(default)]
    pub raw_contact_ids: Vec<String>,
}

impl PickerArguments {
    pub fn new(account: Option<AccountWithDataSet>, raw_contact_ids: Vec<String>) -> Self {
        PickerArguments {
            account,
            raw_contact_ids,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading session {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing session {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).context("serializing session")?;
        std::fs::write(path, text)
            .with_context(|| format!("writing session {}", path.display()))?;
        log::info!("Saved session to {}", path.display());
        Ok(())
    }
}
