//! Label patterns for DARF slips and bank receipts.

use lazy_static::lazy_static;
use regex::Regex;

/// Amount capture: digits with embedded `.`/`,`, never ending on a separator.
const AMOUNT: &str = r"(\d(?:[\d.,]*\d)?)";

fn labeled(label: &str) -> Regex {
    Regex::new(&format!("{label}{AMOUNT}")).expect("valid amount pattern")
}

lazy_static! {
    // Names
    pub static ref SLIP_PARTNER_NAME: Regex = Regex::new(
        r"Parceiro\s*:\s*((?:[^\W\d]|\s)+)"
    ).unwrap();

    pub static ref RECEIPT_PAYER_NAME: Regex = Regex::new(
        r"Nome:[ \t]*([\w \t]+)"
    ).unwrap();

    // Slip amounts
    pub static ref AMOUNT_TO_COLLECT: Regex = labeled(r"Vl\.Recolhe\s*:?\s*(?:R\$\s*)?");

    // Shared by slips and receipts
    pub static ref PRINCIPAL_VALUE: Regex = labeled(r"VALOR DO PRINCIPAL\s*R\$\s*");

    pub static ref DOCUMENT_TOTAL_NEXT_LINE: Regex =
        labeled(r"Valor Total do Documento[^\n]*\n[^\d\n]*");

    // Receipt amounts
    pub static ref TOTAL_VALUE: Regex = labeled(r"VALOR TOTAL\s*:?\s*(?:R\$\s*)?");

    /// Amount on the label line, or on the next line when the label line has none.
    pub static ref DOCUMENT_TOTAL: Regex =
        labeled(r"Valor Total do Documento[^\d\n]*(?:\n[^\d\n]*)?");

    pub static ref GENERIC_TOTAL: Regex = labeled(r"(?i)(?:valor|total)[^\d\n]*");

    // CNPJ (Brazilian company registry number), separators optional
    pub static ref CNPJ: Regex = Regex::new(
        r"\b\d{2}[./]?\d{3}[./]?\d{3}[/\-]?\d{4}[/\-]?\d{2}\b"
    ).unwrap();
}
