//! DNS JSON response types

use serde::Deserialize;

use crate::types::DnsRecordType;

#[derive(Debug, Deserialize)]
pub struct DohResponse {
    #[serde(rename = "Status")]
    pub status: u32,
    #[serde(rename = "Answer", default)]
    pub answer: Vec<DohAnswer>,
}

#[derive(Debug, Deserialize)]
pub struct DohAnswer {
    #[serde(rename = "type")]
    pub record_type: u16,
    pub data: String,
}

impl DohResponse {
    /// Answer values of the requested type, without trailing dots.
    ///
    /// A CNAME query for a name behind a CNAME chain also returns the A records
    /// of the final target; those are skipped.
    pub fn values_of(&self, record_type: DnsRecordType) -> Vec<String> {
        self.answer
            .iter()
            .filter(|a| a.record_type == record_type.rr_type())
            .map(|a| a.data.trim_end_matches('.').to_ascii_lowercase())
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn filters_answers_by_type() {
        let response: DohResponse = serde_json::from_str(
            r#"{
                "Status": 0,
                "Answer": [
                    {"name": "go.example.com.", "type": 5, "TTL": 300, "data": "CNAME.Shortlinks.example."},
                    {"name": "cname.shortlinks.example.", "type": 1, "TTL": 60, "data": "76.76.21.21"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(
            response.values_of(DnsRecordType::Cname),
            vec!["cname.shortlinks.example".to_string()]
        );
        assert_eq!(
            response.values_of(DnsRecordType::A),
            vec!["76.76.21.21".to_string()]
        );
    }

    #[test]
    fn missing_answer_section_is_empty() {
        let response: DohResponse = serde_json::from_str(r#"{"Status": 3}"#).unwrap();
        assert!(response.values_of(DnsRecordType::A).is_empty());
    }
}
