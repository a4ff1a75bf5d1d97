//! Regex patterns for PEB declaration documents.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Header signature of a declaration page: the form code "BC 3" (with an
    /// optional ".0") followed anywhere later in the page by the document
    /// title. Order-sensitive, not adjacency-sensitive.
    pub static ref DECLARATION_HEADER: Regex = Regex::new(
        r"(?i)\bBC\s*3(?:\.0)?\b(?s:.*?)PEMBERITAHUAN\s+EKSPOR\s+BARANG"
    ).unwrap();

    /// Line label carrying the registration number.
    pub static ref REGISTRATION_LABEL: Regex = Regex::new(
        r"(?i)nomor\s+pendaftaran"
    ).unwrap();

    /// Line label listing the covered invoices.
    pub static ref INVOICE_LABEL: Regex = Regex::new(
        r"(?i)nomor\s*&\s*tgl\.?\s*invoice"
    ).unwrap();

    /// Alternative line label; scans sometimes list invoices under the
    /// packing-list field instead.
    pub static ref PACKING_LIST_LABEL: Regex = Regex::new(
        r"(?i)packing\s+list"
    ).unwrap();
}
