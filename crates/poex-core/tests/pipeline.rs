//! End-to-end properties of the extraction pipeline.

use poex_core::{
    classify_format, extract_po_data, normalize, validate, DraftProduct, DraftRecord,
    ExtractionConfig, FormatType, RecordStatus, ValidationConfig,
};
use pretty_assertions::assert_eq;

const FORMAT2_SAMPLE: &str = "\
Purchase Order No: PO-2024-001
Bill To: Acme Corp
Item  Qty  Price  Amount
Widget A  10  2.50  25.00
Total: 25.00
";

const FORMAT1_SAMPLE: &str = "\
SHIPPING ORDER
(Buyer's Info): Pacific Trading Co.
P.O. No.: PT-8812
Consignee: Pacific Trading Co.
Port of Loading: Shanghai
Port of Destination: Los Angeles
Payment Terms: T/T 30 days
Shipping Terms: FOB Shanghai

Item  Description  Quantity  Unit  Price  Amount
1  Cotton Yarn 40s  500 KG 3.20 1600.00
2  Polyester Yarn  200 KG 2.10 420.00
Total: USD 2020.00
";

const FORMAT3_SAMPLE: &str = "\
/// ORDER CONFIRMATION ///
CUSTOMER: NIPPON STEEL TRADING
ORDER NO: OC-5531
GRADE: SS400
QUANTITY: 20 MT
UNIT PRICE: USD 650.00
PAYMENT TERMS: L/C AT SIGHT
TERMS: CIF YOKOHAMA
";

#[test]
fn end_to_end_format2() {
    let outcome = extract_po_data(FORMAT2_SAMPLE);
    let result = &outcome.result;

    assert_eq!(outcome.classification.format_type, FormatType::Format2);
    assert_eq!(result.format_type, FormatType::Format2);
    assert_eq!(result.customer_name, "Acme Corp");
    assert_eq!(result.po_number, "PO-2024-001");
    assert_eq!(result.total_amount, "25.00");
    assert_eq!(result.products.len(), 1);

    let line = &result.products[0];
    assert_eq!(line.name, "Widget A");
    assert_eq!(line.quantity, "10");
    assert_eq!(line.unit_price, "2.50");
    assert_eq!(line.subtotal, "25.00");
    assert!(!outcome.diagnostics.fallback_used);
}

#[test]
fn end_to_end_format1() {
    let outcome = extract_po_data(FORMAT1_SAMPLE);
    let result = &outcome.result;

    assert_eq!(result.format_type, FormatType::Format1);
    assert_eq!(result.customer_name, "Pacific Trading Co");
    assert_eq!(result.po_number, "PT-8812");
    assert_eq!(result.destination, "Los Angeles");
    assert_eq!(result.currency, "USD");
    assert_eq!(result.total_amount, "2020.00");
    assert_eq!(result.products.len(), 2);
    assert_eq!(result.products[1].name, "Polyester Yarn");
    assert!(outcome.quality.suggestions.is_empty());
}

#[test]
fn end_to_end_format3_derives_subtotal() {
    let outcome = extract_po_data(FORMAT3_SAMPLE);
    let result = &outcome.result;

    assert_eq!(result.format_type, FormatType::Format3);
    assert_eq!(result.customer_name, "NIPPON STEEL TRADING");
    assert_eq!(result.po_number, "OC-5531");
    assert_eq!(result.currency, "USD");
    assert_eq!(result.products[0].name, "Grade SS400");
    assert_eq!(result.products[0].subtotal, "13000.00");
    assert_eq!(result.total_amount, "13000.00");
}

#[test]
fn extraction_is_deterministic() {
    for text in [FORMAT1_SAMPLE, FORMAT2_SAMPLE, FORMAT3_SAMPLE, "", "garbage"] {
        let first = serde_json::to_string(&extract_po_data(text)).unwrap();
        let second = serde_json::to_string(&extract_po_data(text)).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn extraction_is_total() {
    let long_number = "9".repeat(60);
    let inputs = [
        String::new(),
        "\0\0\0".to_string(),
        "$$$ ,,, ... ::: ///".to_string(),
        "Total: ,.,.,.".to_string(),
        format!("Widget {long_number} {long_number} {long_number}"),
        format!("Item  Qty  Price  Amount\nBolt 79228162514264337593543950335 2\nTotal: {long_number}"),
        "Item: \nQuantity: \nUnit Price: ".to_string(),
        "合計 ¥ 1.234,5 円\n注文書".to_string(),
        "\r\r\n\n\r".to_string(),
    ];

    for text in &inputs {
        let outcome = extract_po_data(text);
        let result = &outcome.result;
        assert_eq!(result.status, RecordStatus::Pending, "input: {text:?}");
        assert!(!result.products.is_empty());
        assert!(!result.customer_name.is_empty());
        assert!(!result.po_number.is_empty());
        assert!(!result.currency.is_empty());
        assert!(!result.total_amount.is_empty());
        assert!((0.0..=1.0).contains(&result.extraction_confidence));
        for line in &result.products {
            assert!(!line.name.is_empty());
            assert!(!line.quantity.is_empty());
            assert!(!line.unit_price.is_empty());
            assert!(!line.subtotal.is_empty());
        }
    }
}

#[test]
fn empty_input_is_generic_with_zero_confidence() {
    let outcome = extract_po_data("");
    assert_eq!(outcome.classification.format_type, FormatType::Generic);
    assert_eq!(outcome.classification.confidence, 0.0);
    assert_eq!(outcome.result.customer_name, "Unknown Customer");
    assert_eq!(outcome.result.po_number, "N/A");
    assert_eq!(outcome.result.products[0].name, "Unknown Product");
}

#[test]
fn validation_is_idempotent() {
    let config = ValidationConfig::default();
    let drafts = [
        DraftRecord::default(),
        DraftRecord {
            customer_name: " Acme ".to_string(),
            total_amount: "1.234,5".to_string(),
            products: vec![
                DraftProduct::new("", "10", "2.5", ""),
                DraftProduct::new("Nut", "", "0.3", "1"),
                DraftProduct::new("Bolt", "abc", "", ",,"),
            ],
            ..Default::default()
        },
    ];

    for draft in &drafts {
        let once = validate(draft, &config);
        let twice = validate(&DraftRecord::from(&once), &config);
        assert_eq!(once, twice);
    }

    for text in [FORMAT1_SAMPLE, FORMAT2_SAMPLE, FORMAT3_SAMPLE] {
        let mut once = extract_po_data(text).result;
        once.extraction_confidence = 0.0;
        let twice = validate(&DraftRecord::from(&once), &config);
        assert_eq!(once, twice);
    }
}

#[test]
fn normalizer_examples() {
    assert_eq!(normalize("1,234.56"), "1234.56");
    assert_eq!(normalize("1.234,56"), "1234.56");
    assert_eq!(normalize("1234,56"), "1234.56");
    assert_eq!(normalize("abc"), "");
}

#[test]
fn derivation_examples() {
    let config = ValidationConfig::default();

    let draft = DraftRecord {
        products: vec![DraftProduct::new("A", "10", "2.5", "")],
        ..Default::default()
    };
    assert_eq!(validate(&draft, &config).products[0].subtotal, "25.0");

    let draft = DraftRecord {
        products: vec![DraftProduct::new("A", "10", "", "25")],
        ..Default::default()
    };
    assert_eq!(validate(&draft, &config).products[0].unit_price, "2.5");
}

#[test]
fn classifier_priority() {
    let c = classify_format("/// ORDER CONFIRMATION ///\nsome text");
    assert_eq!(c.format_type, FormatType::Format3);
    assert!(c.score > 0);

    let c = classify_format("Customer: Acme\nNothing else here");
    assert_eq!(c.format_type, FormatType::Generic);
}

#[test]
fn numbers_serialize_as_strings() {
    let json = serde_json::to_value(extract_po_data(FORMAT2_SAMPLE).result).unwrap();
    assert_eq!(json["total_amount"], serde_json::json!("25.00"));
    assert_eq!(json["products"][0]["unit_price"], serde_json::json!("2.50"));
    assert_eq!(json["format_type"], serde_json::json!("format2"));
    assert_eq!(json["status"], serde_json::json!("pending"));
}

#[test]
fn custom_sentinels_are_used() {
    let mut config = ExtractionConfig::default();
    config.validation.unknown_customer = "UNKNOWN".to_string();
    config.validation.default_currency = "EUR".to_string();

    let outcome = poex_core::PoParser::new().with_config(config).parse("");
    assert_eq!(outcome.result.customer_name, "UNKNOWN");
    assert_eq!(outcome.result.currency, "EUR");
}
