//! Compiled regex tables for purchase-order extraction.
//!
//! Candidate lists are ordered: extraction tries them front to back and the
//! first non-empty capture wins.

use lazy_static::lazy_static;
use regex::Regex;

use super::products::{LabeledProduct, RowPattern, TableSection};

/// Compile an ordered candidate list. Patterns are literals in this module.
fn regex_list(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

lazy_static! {
    // Classification features
    pub static ref FEATURE_BUYERS_INFO: Regex = Regex::new(r"(?i)Buyer'?s?\s*Info").unwrap();
    pub static ref FEATURE_CONSIGNEE: Regex = Regex::new(r"(?i)Consignee|Port\s+of\s+Loading").unwrap();
    pub static ref FEATURE_PURCHASE_ORDER: Regex = Regex::new(r"(?i)Purchase\s+Order").unwrap();
    pub static ref FEATURE_BILL_SHIP_TO: Regex = Regex::new(r"(?i)Bill\s+To|Ship\s+To").unwrap();
    pub static ref FEATURE_CONFIRMATION_BANNER: Regex = Regex::new(
        r"(?i)///\s*ORDER\s*CONFIR?MATION\s*///"
    ).unwrap();
    pub static ref FEATURE_CONFIRMATION: Regex = Regex::new(r"(?i)CONFIR?MATION").unwrap();

    // Currency
    pub static ref CURRENCY_LABEL: Regex = Regex::new(
        r"(?im)Currency[ \t]*:?[ \t]*(USD|EUR|JPY|CNY|RMB|GBP)\b"
    ).unwrap();
    pub static ref CURRENCY_USD: Regex = Regex::new(r"(?i)\bUSD\b|US\$|\$").unwrap();
    pub static ref CURRENCY_EUR: Regex = Regex::new(r"(?i)\bEUR\b|€").unwrap();
    pub static ref CURRENCY_JPY: Regex = Regex::new(r"(?i)\bJPY\b|¥|円").unwrap();
    pub static ref CURRENCY_GBP: Regex = Regex::new(r"(?i)\bGBP\b|£").unwrap();
    pub static ref CURRENCY_CNY: Regex = Regex::new(r"(?i)\b(?:CNY|RMB)\b").unwrap();

    // Shared totals
    pub static ref TOTAL_AMOUNT: Vec<Regex> = regex_list(&[
        r"(?im)Grand[ \t]+Total[ \t]*:?[ \t]*(?:USD|US\$|\$)?[ \t]*(\d[\d,.]*)",
        r"(?im)^[ \t]*Total(?:[ \t]+Amount)?[ \t]*:?[ \t]*(?:USD|US\$|\$)?[ \t]*(\d[\d,.]*)",
        r"(?im)\bTotal[ \t]*:?[ \t]*(?:USD|US\$|\$)?[ \t]*(\d[\d,.]*)",
    ]);

    // Lines that never describe a product
    pub static ref SUMMARY_LINE: Regex = Regex::new(
        r"(?i)\b(?:sub[\- ]?total|total|tax|vat|freight|discount|tel|fax|phone|date|page|p\.?\s?o\.?\s*(?:no|#)|order\s+no)\b"
    ).unwrap();

    // Numeric cell in a whitespace-separated row
    pub static ref NUMERIC_TOKEN: Regex = Regex::new(r"^\$?\d[\d,.]*$").unwrap();

    // Last-resort key/value product labels
    pub static ref KV_PRODUCT_NAME: Vec<Regex> = regex_list(&[
        r"(?im)^[ \t]*(?:Item|Product|Description)[ \t]*:[ \t]*([^\n]+)",
    ]);
    pub static ref KV_QUANTITY: Vec<Regex> = regex_list(&[
        r"(?im)\b(?:Quantity|Qty)[ \t]*:[ \t]*(\d[\d,.]*)",
    ]);
    pub static ref KV_UNIT_PRICE: Vec<Regex> = regex_list(&[
        r"(?im)\b(?:Unit[ \t]+Price|Price)[ \t]*:[ \t]*(?:USD|US\$|\$)?[ \t]*(\d[\d,.]*)",
    ]);

    // Format 1: "Buyer's Info" layout
    pub static ref F1_CUSTOMER: Vec<Regex> = regex_list(&[
        r"(?im)Buyer'?s?\s*Info[^\n]*?:[ \t]*([^\n]+)",
        r"(?im)Buyer'?s?\s*Info[^\n]*\n[ \t]*([^\n]+)",
        r"(?im)^[ \t]*(?:Buyer|Customer)[ \t]*:[ \t]*([^\n]+)",
    ]);
    pub static ref F1_PO_NUMBER: Vec<Regex> = regex_list(&[
        r"(?im)\bP\.?\s?O\.?[ \t]*(?:No\.?|Number|#)[ \t]*[:#]?[ \t]*([A-Za-z0-9][A-Za-z0-9\-/]*)",
        r"(?im)\bOrder[ \t]+(?:No\.?|Number)[ \t]*:?[ \t]*([A-Za-z0-9][A-Za-z0-9\-/]*)",
    ]);
    pub static ref F1_DESTINATION: Vec<Regex> = regex_list(&[
        r"(?im)Port[ \t]+of[ \t]+Destination[ \t]*:[ \t]*([^\n]+)",
        r"(?im)(?:Final[ \t]+)?Destination[ \t]*:[ \t]*([^\n]+)",
        r"(?im)Port[ \t]+of[ \t]+Discharge[ \t]*:[ \t]*([^\n]+)",
    ]);
    pub static ref F1_PAYMENT_TERMS: Vec<Regex> = regex_list(&[
        r"(?im)Payment[ \t]+Terms?[ \t]*:[ \t]*([^\n]+)",
    ]);
    pub static ref F1_SHIPPING_TERMS: Vec<Regex> = regex_list(&[
        r"(?im)Shipping[ \t]+Terms?[ \t]*:[ \t]*([^\n]+)",
        r"(?im)Inco[ \t]*terms?[ \t]*:[ \t]*([^\n]+)",
    ]);
    pub static ref F1_TABLE: TableSection = TableSection {
        header: Regex::new(r"(?i)\bItem\b.*\bQuantity\b.*\bAmount\b").unwrap(),
        end: Regex::new(r"(?i)^\s*(?:Grand\s+)?Total\b").unwrap(),
        rows: vec![RowPattern {
            regex: Regex::new(
                r"^\s*(\d+)[.)]?\s+(.+?)\s+(\d[\d,.]*)\s+([A-Za-z]+)\s+\$?(\d[\d,.]*)(?:\s+\$?(\d[\d,.]*))?\s*$"
            ).unwrap(),
            name: 2,
            quantity: 3,
            unit_price: 5,
            subtotal: Some(6),
        }],
    };

    // Format 2: "Purchase Order" header layout
    pub static ref F2_CUSTOMER: Vec<Regex> = regex_list(&[
        r"(?im)Bill[ \t]+To[ \t]*:?[ \t]*([^\n]*?)(?:[ \t]*Ship[ \t]+To\b[^\n]*)?$",
        r"(?im)Bill[ \t]+To[^\n]*\n[ \t]*([^\n]*?)(?:[ \t]{2,}[^\n]*)?$",
        r"(?im)^[ \t]*(?:Customer|Buyer|Sold[ \t]+To)[ \t]*:[ \t]*([^\n]+)",
    ]);
    pub static ref F2_PO_NUMBER: Vec<Regex> = regex_list(&[
        r"(?im)Purchase[ \t]+Order[ \t]*(?:No\.?|Number|#)[ \t]*[:#]?[ \t]*([A-Za-z0-9][A-Za-z0-9\-/]*)",
        r"(?im)\bP\.?\s?O\.?[ \t]*(?:No\.?|Number|#)[ \t]*[:#]?[ \t]*([A-Za-z0-9][A-Za-z0-9\-/]*)",
        r"(?im)\bP\.?\s?O\.?[ \t]*[:#][ \t]*([A-Za-z0-9][A-Za-z0-9\-/]*)",
    ]);
    pub static ref F2_DESTINATION: Vec<Regex> = regex_list(&[
        r"(?im)Ship[ \t]+To[ \t]*:?[ \t]*([^\n]*)",
        r"(?im)Bill[ \t]+To[^\n]*Ship[ \t]+To[ \t]*:?[ \t]*\n[^\n]*?[ \t]{2,}([^\n]+)",
        r"(?im)Ship[ \t]+To[ \t]*:?[ \t]*\n[ \t]*([^\n]+)",
        r"(?im)(?:Destination|Deliver[ \t]+To)[ \t]*:[ \t]*([^\n]+)",
    ]);
    pub static ref F2_PAYMENT_TERMS: Vec<Regex> = regex_list(&[
        r"(?im)Payment[ \t]+Terms?[ \t]*:?[ \t]*([^\n]+)",
        r"(?im)^[ \t]*Terms[ \t]*:[ \t]*([^\n]+)",
    ]);
    pub static ref F2_SHIPPING_TERMS: Vec<Regex> = regex_list(&[
        r"(?im)Shipping[ \t]+Terms?[ \t]*:?[ \t]*([^\n]+)",
        r"(?im)(?:Ship[ \t]+Via|Incoterms?)[ \t]*:[ \t]*([^\n]+)",
    ]);
    pub static ref F2_TABLE: TableSection = TableSection {
        header: Regex::new(r"(?i)\bItem\b.*\b(?:Qty|Quantity)\b.*\bPrice\b.*\bAmount\b").unwrap(),
        end: Regex::new(r"(?i)^\s*(?:Sub[\- ]?total|(?:Grand\s+)?Total)\b").unwrap(),
        rows: vec![RowPattern {
            regex: Regex::new(
                r"^\s*(?:\d+[.)]?\s+)?(.+?)\s+(\d[\d,.]*)\s+(?:[A-Za-z]{1,5}\s+)?\$?(\d[\d,.]*)\s+\$?(\d[\d,.]*)\s*$"
            ).unwrap(),
            name: 1,
            quantity: 2,
            unit_price: 3,
            subtotal: Some(4),
        }],
    };

    // Format 3: "/// ORDER CONFIRMATION ///" layout
    pub static ref F3_CUSTOMER: Vec<Regex> = regex_list(&[
        r"(?im)^[ \t]*(?:CUSTOMER|BUYER|MESSRS\.?)[ \t]*:?[ \t]*([^\n]+)",
        r"(?im)^[ \t]*(?:CUSTOMER|BUYER|MESSRS\.?)[ \t]*:?[ \t]*\n[ \t]*([^\n]+)",
    ]);
    pub static ref F3_PO_NUMBER: Vec<Regex> = regex_list(&[
        r"(?im)ORDER[ \t]+(?:NO\.?|NUMBER)[ \t]*:?[ \t]*([A-Za-z0-9][A-Za-z0-9\-/]*)",
        r"(?im)\bP\.?\s?O\.?[ \t]*(?:NO\.?|NUMBER|#)[ \t]*[:#]?[ \t]*([A-Za-z0-9][A-Za-z0-9\-/]*)",
        r"(?im)CONTRACT[ \t]+(?:NO\.?|NUMBER)[ \t]*:?[ \t]*([A-Za-z0-9][A-Za-z0-9\-/]*)",
    ]);
    pub static ref F3_DESTINATION: Vec<Regex> = regex_list(&[
        r"(?im)PORT[ \t]+OF[ \t]+DISCHARGE[ \t]*:?[ \t]*([^\n]+)",
        r"(?im)DESTINATION[ \t]*:[ \t]*([^\n]+)",
    ]);
    pub static ref F3_PAYMENT_TERMS: Vec<Regex> = regex_list(&[
        r"(?im)PAYMENT[ \t]+TERMS?[ \t]*:?[ \t]*([^\n]+)",
        r"(?im)^[ \t]*PAYMENT[ \t]*:[ \t]*([^\n]+)",
    ]);
    pub static ref F3_SHIPPING_TERMS: Vec<Regex> = regex_list(&[
        r"(?im)^[ \t]*(?:SHIPPING[ \t]+|DELIVERY[ \t]+|TRADE[ \t]+)?TERMS?[ \t]*:[ \t]*([^\n]+)",
        r"(?im)\b((?:CIF|CFR|CNF|FOB|EXW|FCA|DAP|DDP)\b[^\n]*)",
    ]);
    pub static ref F3_TOTAL_AMOUNT: Vec<Regex> = regex_list(&[
        r"(?im)TOTAL[ \t]+(?:AMOUNT|PRICE|VALUE)[ \t]*:?[ \t]*(?:USD|US\$|\$)?[ \t]*(\d[\d,.]*)",
        r"(?im)^[ \t]*TOTAL[ \t]*:?[ \t]*(?:USD|US\$|\$)?[ \t]*(\d[\d,.]*)",
    ]);
    pub static ref F3_GRADE_SPEC: LabeledProduct = LabeledProduct {
        name: Regex::new(r"(?im)\bGRADE[ \t]*:?[ \t]*([A-Za-z0-9][A-Za-z0-9\-]*)").unwrap(),
        name_prefix: "Grade ",
        quantity: Regex::new(
            r"(?im)\bQUANTITY[ \t]*:?[ \t]*(\d[\d,.]*)[ \t]*(?:MTS?|KGS?|TONS?)\b"
        ).unwrap(),
        unit_price: Regex::new(
            r"(?im)\bUNIT[ \t]+PRICE[ \t]*:?[ \t]*(?:USD|US\$|\$)?[ \t]*(\d[\d,.]*)"
        ).unwrap(),
    };

    // Generic: loose label-based patterns
    pub static ref GENERIC_CUSTOMER: Vec<Regex> = regex_list(&[
        r"(?im)\b(?:Customer|Client|Buyer|Company|Purchaser)[ \t]*:[ \t]*([^\n]+)",
        r"(?im)^[ \t]*(?:Bill[ \t]+To|Sold[ \t]+To|To)[ \t]*:[ \t]*([^\n]+)",
        r"(?im)Bill[ \t]+To[ \t]*:?[ \t]*\n[ \t]*([^\n]+)",
        r"(?im)Contract[ \t]+Party[ \t]*:[ \t]*([^\n]+)",
        r"(?im)B/L[ \t]+CONSIGNEE[ \t]*:[ \t]*([^\n]+)",
        r"(?im)\(Buyer['’]?s[ \t]+Info\)[^\n]*?([A-Za-z0-9 ]+Company)",
    ]);
    pub static ref GENERIC_PO_NUMBER: Vec<Regex> = regex_list(&[
        r"(?im)(?:Purchase[ \t]+Order|\bP\.?\s?O\.?|\bOrder)[ \t]*(?:No\.?|Number|#)[ \t]*[:#]?[ \t]*([A-Za-z0-9\-/]*\d[A-Za-z0-9\-/]*)",
        r"(?im)Buyers?['’]?[ \t]+Order[ \t]+No\.?[ \t]*:?[ \t]*([A-Za-z0-9][A-Za-z0-9\-/]*)",
        r"(?im)\bP\.?\s?O\.?[ \t]*[:#][ \t]*([A-Za-z0-9][A-Za-z0-9\-/]*)",
    ]);
    pub static ref GENERIC_DESTINATION: Vec<Regex> = regex_list(&[
        r"(?im)(?:Destination|Ship[ \t]+To|Delivery[ \t]+Address|Port[ \t]+of[ \t]+Discharge|Discharge[ \t]+Port)[ \t]*:[ \t]*([^\n]+)",
        r"(?im)Deliver[ \t]+To[ \t]*:[ \t]*([^\n]+)",
    ]);
    pub static ref GENERIC_SHIPPING_TERMS: Vec<Regex> = regex_list(&[
        r"(?im)(?:Incoterms?|Inco[ \t]+Terms|Shipping[ \t]+Terms|Delivery[ \t]+Terms|Trade[ \t]+Terms|Term)[ \t]*:[ \t]*([^\n]+)",
        r"(?m)\b((?:CIF|CFR|FOB|EXW|FCA|DAP|DDP)[ \t]+[A-Za-z][A-Za-z \t]*)",
    ]);
    pub static ref GENERIC_PAYMENT_TERMS: Vec<Regex> = regex_list(&[
        r"(?im)(?:Payment[ \t]+Terms?|Terms[ \t]+of[ \t]+Payment|Payment)[ \t]*:[ \t]*([^\n]+)",
        r"(?im)^[ \t]*Terms[ \t]*:[ \t]*([^\n]+)",
        r"(?im)(Net[ \t]+Due[ \t]+within[^\n]*)",
        r"(?im)Payment[ \t]+term[ \t]*\n[ \t]*([^\n]+)",
        r"(?im)\b(Net[ \t]+\d+(?:[ \t]+days)?)\b",
    ]);
    pub static ref GENERIC_TOTAL_AMOUNT: Vec<Regex> = regex_list(&[
        r"(?im)(?:Grand[ \t]+Total|Total)[ \t]*:[ \t]*(?:USD|US\$|\$)?[ \t]*(\d[\d,.]*)",
        r"(?im)Total[ \t]+Amount[ \t]*:?[ \t]*(?:USD|US\$|\$)?[ \t]*(\d[\d,.]*)",
        r"(?im)(?:\$|USD)[ \t]*(\d[\d,.]*)(?:[ \t]+total|[ \t]+USD)",
        r"(?im)TOTAL[ \t]+(?:AMOUNT|PRICE)[ \t]*:?[ \t]*(?:USD)?[ \t]*(\d[\d,.]*)",
        r"(?im)^[ \t]*(?:Grand[ \t]+)?Total[ \t]+(?:USD|US\$|\$)?[ \t]*(\d[\d,.]*)",
    ]);
    pub static ref GENERIC_ROWS: Vec<RowPattern> = vec![
        // code, name, quantity, unit, unit price, amount
        RowPattern {
            regex: Regex::new(
                r"^\s*(\d+)\s+(.+?)\s+(\d[\d,.]*)\s+([A-Za-z]+)\s+\$?(\d[\d,.]*)\s+\$?(\d[\d,.]*)\s*$"
            ).unwrap(),
            name: 2,
            quantity: 3,
            unit_price: 5,
            subtotal: Some(6),
        },
        // name, quantity with unit, unit price, amount
        RowPattern {
            regex: Regex::new(
                r"(?i)^\s*(.+?)\s+(\d[\d,.]*)\s*(?:pcs|units?|kgs?|mts?)\s+\$?(\d[\d,.]*)\s+\$?(\d[\d,.]*)\s*$"
            ).unwrap(),
            name: 1,
            quantity: 2,
            unit_price: 3,
            subtotal: Some(4),
        },
    ];
}
