//! Persisted progress
//!
//! The only state that survives across sessions. Storage is the host's job;
//! this module only defines the record and its JSON form.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Save point reached and deaths so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveData {
    #[serde(rename = "savePoint", default)]
    pub save_point: i64,
    #[serde(default)]
    pub deaths: u64,
}

impl SaveData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_death(&mut self) {
        self.deaths = self.deaths.saturating_add(1);
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse stored progress, starting fresh if it is missing or corrupt
    pub fn restore(stored: Option<&str>) -> Self {
        let Some(json) = stored else {
            log::info!("No saved progress found, starting fresh");
            return Self::new();
        };
        match Self::from_json(json) {
            Ok(save) => {
                log::info!("Loaded progress (save point {}, {} deaths)", save.save_point, save.deaths);
                save
            }
            Err(e) => {
                log::warn!("Discarding corrupt progress: {e}");
                Self::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_stored_format() {
        let save = SaveData::from_json(r#"{"savePoint": 3, "deaths": 41}"#).unwrap();
        assert_eq!(save.save_point, 3);
        assert_eq!(save.deaths, 41);
        assert_eq!(save.to_json().unwrap(), r#"{"savePoint":3,"deaths":41}"#);
    }

    #[test]
    fn test_restore_degrades_to_fresh() {
        assert_eq!(SaveData::restore(None), SaveData::new());
        assert_eq!(SaveData::restore(Some("garbage")), SaveData::new());
        assert_eq!(SaveData::restore(Some(r#"{"deaths": 2}"#)).deaths, 2);
    }

    #[test]
    fn test_record_death() {
        let mut save = SaveData::new();
        save.record_death();
        save.record_death();
        assert_eq!(save.deaths, 2);
    }
}
