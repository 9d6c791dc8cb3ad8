pub mod children;
pub mod config;
pub mod login;
pub mod mood;
pub mod routines;

use std::path::PathBuf;

use anyhow::{Context, Result};

use mymind_client::ApiClient;
use mymind_core::{config as core_config, session, Config, Role, Session};

/// Home directory, config and session for one invocation.
pub struct Env {
    pub home: PathBuf,
    pub config: Config,
    pub session: Session,
}

impl Env {
    pub fn load() -> Result<Self> {
        let home: PathBuf = dirs::home_dir().context("could not determine home directory")?;
        let config = core_config::load_at(&home)
            .context("failed to load ~/.mymind/config.yaml")?
            .with_base_url_override(std::env::var(core_config::BASE_URL_ENV).ok());
        let session = session::load_at(&home).context("failed to load ~/.mymind/session.json")?;
        Ok(Self {
            home,
            config,
            session,
        })
    }

    /// Client acting as `role`.
    pub fn client(&self, role: Role) -> ApiClient {
        ApiClient::new(&self.config, self.session.clone()).acting_as(role)
    }

    pub fn save_session(&self) -> Result<()> {
        session::save_at(&self.home, &self.session).context("failed to save session")
    }
}
