use deal_finance_core::amortization::deal::{compute_deal, DealInputs};
use deal_finance_core::config::CalculatorConfig;
use deal_finance_core::scenarios::export::CSV_FILE_NAME;
use deal_finance_core::scenarios::{CapturedValue, ScenarioStore};
use deal_finance_core::DealFinanceError;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal_macros::dec;

fn save(store: &mut ScenarioStore, inputs: &DealInputs, rng: &mut StdRng) -> u64 {
    let metrics = compute_deal(inputs);
    let scenario = store.capture(inputs, &metrics, rng);
    store.save(scenario).scenario.id
}

// ===========================================================================
// Save / delete / load workflow
// ===========================================================================

#[test]
fn test_compare_two_structures() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut store = ScenarioStore::new();

    let base = DealInputs::default();
    save(&mut store, &base, &mut rng);

    let richer_note = DealInputs {
        seller_note_percent: dec!(20),
        ..DealInputs::default()
    };
    save(&mut store, &richer_note, &mut rng);

    let metrics = compute_deal(&base);
    let rows = store.compare(&base, &metrics);
    let note = rows.iter().find(|r| r.field_id == "sellerNoteValue").unwrap();
    assert_eq!(note.current, "$100,000");
    let saved: Vec<(&str, &str)> = note
        .markers
        .iter()
        .map(|m| (m.color.as_str(), m.value.as_str()))
        .collect();
    assert_eq!(saved, vec![("#FF6B6B", "$100,000"), ("#4ECDC4", "$200,000")]);
}

#[test]
fn test_history_is_fifo_capped_at_ten() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut store = ScenarioStore::new();
    let mut ids = Vec::new();
    for price in 1..=15u32 {
        let inputs = DealInputs {
            purchase_price: dec!(100_000) * rust_decimal::Decimal::from(price),
            ..DealInputs::default()
        };
        ids.push(save(&mut store, &inputs, &mut rng));
        assert!(store.len() <= 10);
    }
    let held: Vec<u64> = store.scenarios().iter().map(|s| s.id).collect();
    assert_eq!(held, ids[5..].to_vec());
}

#[test]
fn test_delete_then_export_nothing() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut store = ScenarioStore::new();
    save(&mut store, &DealInputs::default(), &mut rng);
    assert!(store.delete_last().is_some());
    assert!(store.delete_last().is_none());
    assert!(matches!(store.export_csv(), Err(DealFinanceError::NothingToExport)));
}

#[test]
fn test_configured_capacity() {
    let config = CalculatorConfig {
        max_saved_scenarios: 3,
        ..CalculatorConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(3);
    let mut store = ScenarioStore::with_config(&config);
    for _ in 0..5 {
        save(&mut store, &DealInputs::default(), &mut rng);
    }
    assert_eq!(store.len(), 3);
}

// ===========================================================================
// CSV export
// ===========================================================================

#[test]
fn test_export_saved_and_demo_scenarios() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut store = ScenarioStore::new();
    save(&mut store, &DealInputs::default(), &mut rng);
    store.load_demo();

    let csv = store.export_csv().unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), store.len() + 1);
    let columns = store.scenarios()[0].values.len();
    for line in &lines {
        assert_eq!(line.split(',').count(), columns);
    }

    let saved_row: Vec<&str> = lines[1].split(',').collect();
    assert_eq!(saved_row[0], "$1000000");
    assert_eq!(saved_row[5], "10 years");
    assert_eq!(saved_row[13], "$10572");
    assert_eq!(saved_row[22], "4.0");

    let demo_row: Vec<&str> = lines[2].split(',').collect();
    assert_eq!(demo_row[0], "1000000");
    assert_eq!(demo_row[13], "$10000");
}

#[test]
fn test_export_file_name() {
    assert_eq!(CSV_FILE_NAME, "scenarios.csv");
}

// ===========================================================================
// Store as a value passed across a JSON boundary
// ===========================================================================

#[test]
fn test_store_survives_json_boundary() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut store = ScenarioStore::new();
    save(&mut store, &DealInputs::default(), &mut rng);

    let json = serde_json::to_value(&store).unwrap();
    let first = &json["scenarios"][0]["values"];
    assert_eq!(first["downPayment"]["sliderValue"], "10%");
    assert_eq!(first["needToFinanceValue"]["currentValue"], "$800,000");

    let mut back: ScenarioStore = serde_json::from_value(json).unwrap();
    let before = back.last().unwrap().id;
    let next = save(&mut back, &DealInputs::default(), &mut rng);
    assert!(next > before);
    assert_eq!(back.last().unwrap().color, "#4ECDC4");
    assert_eq!(
        back.scenarios()[0].values.get("ebitda"),
        Some(&CapturedValue::slider("$250,000"))
    );
}
