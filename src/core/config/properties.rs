// ─── server.properties ───
// Only the `difficulty` key is managed; every other line is kept as-is.

use std::fmt;
use std::str::FromStr;

use tracing::info;

use crate::core::error::{ServerError, ServerResult};
use crate::core::server::ServerLayout;

const DIFFICULTY_KEY: &str = "difficulty";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Peaceful,
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Peaceful,
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
    ];

    /// Menu numbering: 1 = peaceful ... 4 = hard.
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Difficulty::Peaceful),
            "2" => Some(Difficulty::Easy),
            "3" => Some(Difficulty::Normal),
            "4" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Peaceful => "peaceful",
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str() == s.trim())
            .ok_or_else(|| ServerError::InvalidDifficulty(s.to_string()))
    }
}

/// Set `difficulty=<value>` in `server.properties`, creating the file if
/// needed.
pub async fn write_difficulty(layout: &ServerLayout, difficulty: Difficulty) -> ServerResult<()> {
    let path = layout.properties_path();
    let existing = match tokio::fs::read_to_string(&path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(ServerError::io(&path, e)),
    };

    let updated = upsert_property(&existing, DIFFICULTY_KEY, difficulty.as_str());
    tokio::fs::write(&path, updated)
        .await
        .map_err(|e| ServerError::io(&path, e))?;

    info!("Difficulty set to {}", difficulty);
    Ok(())
}

fn upsert_property(contents: &str, key: &str, value: &str) -> String {
    let mut replaced = false;
    let mut lines: Vec<String> = contents
        .lines()
        .map(|line| {
            let is_key = line
                .split_once('=')
                .is_some_and(|(k, _)| k.trim() == key && !line.trim_start().starts_with('#'));
            if is_key && !replaced {
                replaced = true;
                format!("{key}={value}")
            } else {
                line.to_string()
            }
        })
        .collect();

    if !replaced {
        lines.push(format!("{key}={value}"));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
