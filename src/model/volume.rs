use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub region: String,
    #[serde(rename = "type")]
    pub volume_type: String,
    // the api is not consistent about the type of this field, so it's parsed on use
    #[serde(default)]
    pub size: Value,
}

impl Volume {
    /// Size in gigabytes. Accepts integers, floats (truncated) and numeric strings.
    pub fn size_gb(&self) -> Result<i64, Box<dyn Error>> {
        match &self.size {
            Value::Number(n) => {
                if let Some(size) = n.as_i64() {
                    Ok(size)
                } else {
                    match n.as_f64() {
                        Some(size) if size.is_finite() => Ok(size.trunc() as i64),
                        _ => Err(Box::<dyn Error>::from(format!("volume size {} is out of range", n))),
                    }
                }
            }
            Value::String(s) => Ok(s.trim().parse::<i64>()?),
            Value::Null => Err(Box::<dyn Error>::from("volume size is missing")),
            other => Err(Box::<dyn Error>::from(format!("volume size {} is not a number", other))),
        }
    }
}
