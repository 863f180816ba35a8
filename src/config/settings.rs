use std::env;
use std::time::Duration;

const MINING_DIFFICULTY_KEY: &str = "MINING_DIFFICULTY";
const MINING_REWARD_KEY: &str = "MINING_REWARD";
const MINING_INTERVAL_SECS_KEY: &str = "MINING_INTERVAL_SECS";
const SYNC_INTERVAL_SECS_KEY: &str = "SYNC_INTERVAL_SECS";
const ENFORCE_BALANCE_KEY: &str = "ENFORCE_BALANCE";
const MAX_NONCE_KEY: &str = "MAX_NONCE";

const DEFAULT_MINING_DIFFICULTY: usize = 3;
const DEFAULT_MINING_REWARD: f64 = 1.0;
const DEFAULT_MINING_INTERVAL_SECS: u64 = 20;
const DEFAULT_SYNC_INTERVAL_SECS: u64 = 20;

/// Node behavior knobs. Constructed once and handed to the ledger; there is
/// no global configuration state.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Leading zero hex characters a block digest must carry.
    pub mining_difficulty: usize,
    /// Value credited to the miner per mined block.
    pub mining_reward: f64,
    /// Pause between periodic mining attempts.
    pub mining_interval: Duration,
    /// Pause between periodic consensus rounds.
    pub sync_interval: Duration,
    /// Reject transfers whose sender balance cannot cover the value. Off by
    /// default: the ledger deliberately allows balances to go negative.
    pub enforce_balance: bool,
    /// Largest nonce the proof search will try before giving up.
    pub max_nonce: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            mining_difficulty: DEFAULT_MINING_DIFFICULTY,
            mining_reward: DEFAULT_MINING_REWARD,
            mining_interval: Duration::from_secs(DEFAULT_MINING_INTERVAL_SECS),
            sync_interval: Duration::from_secs(DEFAULT_SYNC_INTERVAL_SECS),
            enforce_balance: false,
            max_nonce: u64::MAX,
        }
    }
}

impl Settings {
    /// Defaults overridden by environment variables where present. Values
    /// that fail to parse are ignored.
    pub fn from_env() -> Settings {
        let mut settings = Settings::default();

        if let Ok(value) = env::var(MINING_DIFFICULTY_KEY) {
            if let Ok(parsed) = value.parse() {
                settings.mining_difficulty = parsed;
            }
        }
        if let Ok(value) = env::var(MINING_REWARD_KEY) {
            if let Ok(parsed) = value.parse() {
                settings.mining_reward = parsed;
            }
        }
        if let Ok(value) = env::var(MINING_INTERVAL_SECS_KEY) {
            if let Ok(parsed) = value.parse() {
                settings.mining_interval = Duration::from_secs(parsed);
            }
        }
        if let Ok(value) = env::var(SYNC_INTERVAL_SECS_KEY) {
            if let Ok(parsed) = value.parse() {
                settings.sync_interval = Duration::from_secs(parsed);
            }
        }
        if let Ok(value) = env::var(ENFORCE_BALANCE_KEY) {
            if let Ok(parsed) = value.parse() {
                settings.enforce_balance = parsed;
            }
        }
        if let Ok(value) = env::var(MAX_NONCE_KEY) {
            if let Ok(parsed) = value.parse() {
                settings.max_nonce = parsed;
            }
        }

        settings
    }
}
