use ipreverser_core::IpRecord;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Result of reversing the caller's address.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReversalResponse {
    /// The caller's address as extracted from the request.
    #[serde(rename = "originalIP")]
    pub original_ip: String,
    /// The octet-reversed address.
    #[serde(rename = "reversedIP")]
    pub reversed_ip: String,
    /// When the reversal was recorded.
    pub timestamp: Timestamp,
    /// Human-readable summary.
    pub message: String,
}

impl From<IpRecord> for ReversalResponse {
    fn from(record: IpRecord) -> Self {
        Self {
            message: format!(
                "Your IP {} reversed is {}",
                record.original_ip, record.reversed_ip
            ),
            original_ip: record.original_ip,
            reversed_ip: record.reversed_ip,
            timestamp: record.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_from_record() -> anyhow::Result<()> {
        let record = IpRecord {
            id: 1,
            original_ip: "1.2.3.4".into(),
            reversed_ip: "4.3.2.1".into(),
            created_at: "2024-06-01T12:00:00Z".parse()?,
        };

        let json = serde_json::to_value(ReversalResponse::from(record))?;
        assert_eq!(json["originalIP"], "1.2.3.4");
        assert_eq!(json["reversedIP"], "4.3.2.1");
        assert_eq!(json["timestamp"], "2024-06-01T12:00:00Z");
        assert_eq!(json["message"], "Your IP 1.2.3.4 reversed is 4.3.2.1");
        Ok(())
    }
}
