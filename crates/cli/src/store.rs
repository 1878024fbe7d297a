//! JSON state file holding the persisted session between invocations.

use anyhow::{Context, Result, bail};
use cpamm_simulation::session::PoolSession;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Default state file, relative to the working directory.
pub const DEFAULT_STATE_FILE: &str = "cpamm-state.json";

/// Loads the session stored at `path`.
pub fn load(path: &Path) -> Result<PoolSession> {
    if !path.exists() {
        bail!(
            "no session at {} (run `cpamm init` first)",
            path.display()
        );
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let session = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid session file", path.display()))?;
    debug!(path = %path.display(), "session loaded");
    Ok(session)
}

/// Writes `session` to `path`, replacing any previous state.
pub fn save(path: &Path, session: &PoolSession) -> Result<()> {
    let raw = serde_json::to_string_pretty(session)?;
    fs::write(path, raw).with_context(|| format!("failed to write {}", path.display()))?;
    debug!(path = %path.display(), "session saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpamm_domain::token::TokenAmount;
    use cpamm_simulation::state::DEMO_WALLET_ADDRESS;
    use tempfile::tempdir;

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut session = PoolSession::demo().unwrap();
        session.connect_wallet(DEMO_WALLET_ADDRESS);
        session.swap("BETA", "25").unwrap();
        save(&path, &session).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.pool(), session.pool());
        assert_eq!(loaded.wallet(), session.wallet());
        assert_eq!(loaded.pool().balance_b(), TokenAmount::from_tokens(1025));
    }

    #[test]
    fn test_missing_file_asks_for_init() {
        let dir = tempdir().unwrap();
        let err = load(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("cpamm init"));
    }

    #[test]
    fn test_corrupt_file_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{\"pool\": 3}").unwrap();
        assert!(load(&path).is_err());
    }

    #[test]
    fn test_tampered_pool_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        save(&path, &PoolSession::demo().unwrap()).unwrap();

        // Drain one reserve while LP tokens stay outstanding.
        let raw = fs::read_to_string(&path).unwrap();
        let mut json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        json["pool"]["balance_a"] = serde_json::Value::String("0".to_string());
        fs::write(&path, json.to_string()).unwrap();

        assert!(load(&path).is_err());
    }
}
