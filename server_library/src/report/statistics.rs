use crate::history::history_entry::HistoryEntry;

#[derive(Debug, Clone, PartialEq)]
pub struct ReportStatistics {
    pub total_requests: usize,
    pub total_luggage: usize,
    pub average_luggage: f64,
}

impl ReportStatistics {
    pub fn from_history(history: &[HistoryEntry]) -> Self {
        let total_requests = history.len();
        let total_luggage = history.iter().map(|entry| entry.luggage_count).sum();
        let average_luggage = if total_requests == 0 {
            0.0
        } else {
            total_luggage as f64 / total_requests as f64
        };
        Self {
            total_requests,
            total_luggage,
            average_luggage,
        }
    }

    pub fn formatted_average(&self) -> String {
        format!("{:.2}", self.average_luggage)
    }

    /// Parameter and value rows, in report order.
    pub fn rows(&self) -> [(&'static str, String); 3] {
        [
            ("Total requests", self.total_requests.to_string()),
            ("Total luggage detected", self.total_luggage.to_string()),
            ("Average luggage per request", self.formatted_average()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::history_entry::DetectionRecord;

    fn entry(count: usize) -> HistoryEntry {
        let records = (0..count)
            .map(|_| DetectionRecord { class_label: "suitcase".to_string(), confidence: 0.5, bbox: [0, 0, 1, 1] })
            .collect();
        HistoryEntry::new("a.png".to_string(), records, String::new())
    }

    #[test]
    fn totals_and_average() {
        let statistics = ReportStatistics::from_history(&[entry(1), entry(0), entry(1)]);
        assert_eq!(statistics.total_requests, 3);
        assert_eq!(statistics.total_luggage, 2);
        assert_eq!(statistics.formatted_average(), "0.67");
        assert_eq!(statistics.rows()[2].1, "0.67");
    }

    #[test]
    fn empty_history_has_zero_average() {
        let statistics = ReportStatistics::from_history(&[]);
        assert_eq!(statistics.formatted_average(), "0.00");
    }
}
