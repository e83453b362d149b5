use crate::fields::{CalculatedField, SliderField};
use crate::scenarios::store::{CapturedValue, Scenario, ScenarioValues};

struct DemoRow {
    color: &'static str,
    timestamp: &'static str,
    sliders: [&'static str; 8],
    computed: [&'static str; 15],
}

// Fixed figures, not recomputed. They do not all agree with the engine.
const DEMO_ROWS: [DemoRow; 3] = [
    DemoRow {
        color: "#FF6B6B",
        timestamp: "10/11/2023, 10:00:00 AM",
        sliders: [
            "1,000,000", "10%", "10%", "250,000", "10%", "10 years", "5%", "10 years",
        ],
        computed: [
            "$100,000", "$100,000", "$800,000", "$900,000", "$800,000", "$10,000", "$120,000",
            "$1,200,000", "$1,000", "$12,000", "$120,000", "$132,000", "$1,320,000", "$118,000",
            "4.0",
        ],
    },
    DemoRow {
        color: "#4ECDC4",
        timestamp: "10/11/2023, 11:00:00 AM",
        sliders: [
            "1,500,000", "15%", "5%", "300,000", "8%", "15 years", "6%", "10 years",
        ],
        computed: [
            "$225,000", "$75,000", "$1,200,000", "$1,275,000", "$1,200,000", "$11,000",
            "$132,000", "$1,980,000", "$1,200", "$14,400", "$144,000", "$146,400", "$2,124,000",
            "$153,600", "5.0",
        ],
    },
    DemoRow {
        color: "#45B7D1",
        timestamp: "10/11/2023, 12:00:00 PM",
        sliders: [
            "2,500,000", "20%", "15%", "500,000", "9%", "20 years", "7%", "15 years",
        ],
        computed: [
            "$500,000", "$375,000", "$1,625,000", "$2,125,000", "$1,625,000", "$13,500",
            "$162,000", "$3,240,000", "$2,500", "$30,000", "$450,000", "$192,000", "$3,690,000",
            "$308,000", "5.0",
        ],
    },
];

/// The three demo scenarios, with ids `base_id`, `base_id + 1`, `base_id + 2`
/// (saturating).
pub fn demo_scenarios(base_id: u64) -> Vec<Scenario> {
    DEMO_ROWS
        .iter()
        .zip(0u64..)
        .map(|(row, offset)| {
            let id = base_id.saturating_add(offset);
            let mut values = ScenarioValues::default();
            for (field, text) in SliderField::ALL.iter().zip(row.sliders) {
                values.insert(field.id(), CapturedValue::slider(text));
            }
            for (field, text) in CalculatedField::ALL.iter().zip(row.computed) {
                values.insert(field.id(), CapturedValue::computed(text));
            }
            Scenario {
                id,
                color: row.color.to_string(),
                timestamp: row.timestamp.to_string(),
                values,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_three_demo_scenarios() {
        let demo = demo_scenarios(1000);
        assert_eq!(demo.len(), 3);
        let ids: Vec<u64> = demo.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1000, 1001, 1002]);
        assert!(demo.iter().all(|s| s.values.len() == 23));
    }

    #[test]
    fn test_demo_values_verbatim() {
        let demo = demo_scenarios(0);
        let second = &demo[1];
        assert_eq!(second.timestamp, "10/11/2023, 11:00:00 AM");
        assert_eq!(
            second.values.get("sbaLoanTerm"),
            Some(&CapturedValue::slider("15 years"))
        );
        assert_eq!(
            second.values.get("totalLoanCost"),
            Some(&CapturedValue::computed("$2,124,000"))
        );
        assert_eq!(
            demo[2].values.get("ebitdaMultiple"),
            Some(&CapturedValue::computed("5.0"))
        );
    }
}
