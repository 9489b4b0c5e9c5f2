use nicru_error::{NicRuError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "php-api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Client configuration forwarded to the transport on every send.
///
/// None of these are interpreted by the client itself; the transport decides
/// what `user_agent` and `timeout` mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    pub user_agent: String,
    /// Seconds.
    pub timeout: u64,
    /// Options the client carries but does not know about.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
            extra: HashMap::new(),
        }
    }
}

impl ClientOptions {
    /// Deserialise `value` over the defaults; missing keys keep their
    /// default value.
    pub fn from_json(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| NicRuError::Error(e.to_string()))
    }

    /// Overwrite one option. Unknown names land in `extra`.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        match name {
            "user_agent" => {
                let agent = value.as_str().ok_or_else(|| invalid(name, &value))?;
                self.user_agent = agent.to_string();
            }
            "timeout" => {
                let secs = match &value {
                    Value::Number(n) => n.as_u64(),
                    Value::String(s) => s.trim().parse::<u64>().ok(),
                    _ => None,
                };
                self.timeout = secs.ok_or_else(|| invalid(name, &value))?;
            }
            _ => {
                self.extra.insert(name.to_string(), value);
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        match name {
            "user_agent" => Some(Value::String(self.user_agent.clone())),
            "timeout" => Some(Value::from(self.timeout)),
            _ => self.extra.get(name).cloned(),
        }
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

fn invalid(name: &str, value: &Value) -> NicRuError {
    NicRuError::Error(format!("Invalid value for option {}: {}", name, value))
}
