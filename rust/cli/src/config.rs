use ronda_ai::AI_TYPES;
use ronda_engine::rules::{DEFAULT_TARGET_SCORE, RuleSet, ScoringPolicy};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub target_score: u32,
    pub scoring: ScoringPolicy,
    pub ai: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub target_score: ValueSource,
    pub scoring: ValueSource,
    pub ai: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            target_score: ValueSource::Default,
            scoring: ValueSource::Default,
            ai: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            target_score: DEFAULT_TARGET_SCORE,
            scoring: ScoringPolicy::default(),
            ai: "baseline".into(),
        }
    }
}

impl Config {
    /// Rules for a game, with `target` taking precedence over the
    /// configured target score.
    pub fn rules(&self, target: Option<u32>) -> RuleSet {
        RuleSet {
            scoring: self.scoring,
            target_score: target.unwrap_or(self.target_score),
            ..RuleSet::default()
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => write!(f, "{}", msg),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("RONDA_CONFIG")
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.target_score {
            cfg.target_score = v;
            sources.target_score = ValueSource::File;
        }
        if let Some(v) = f.scoring {
            cfg.scoring = v;
            sources.scoring = ValueSource::File;
        }
        if let Some(v) = f.ai {
            cfg.ai = v;
            sources.ai = ValueSource::File;
        }
    }

    if let Ok(seed) = std::env::var("RONDA_SEED")
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid("Invalid seed".into()))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(target) = std::env::var("RONDA_TARGET_SCORE")
        && !target.is_empty()
    {
        cfg.target_score = target
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid target_score".into()))?;
        sources.target_score = ValueSource::Env;
    }
    if let Ok(scoring) = std::env::var("RONDA_SCORING")
        && !scoring.is_empty()
    {
        cfg.scoring = scoring.parse().map_err(ConfigError::Invalid)?;
        sources.scoring = ValueSource::Env;
    }
    if let Ok(ai) = std::env::var("RONDA_AI")
        && !ai.is_empty()
    {
        cfg.ai = ai;
        sources.ai = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    target_score: Option<u32>,
    #[serde(default)]
    scoring: Option<ScoringPolicy>,
    #[serde(default)]
    ai: Option<String>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if !AI_TYPES.contains(&cfg.ai.as_str()) {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: ai must be one of {}",
            AI_TYPES.join(", ")
        )));
    }
    Ok(())
}
