//! Static dataset registry.
//!
//! Each dataset's field list is the destination table's column order; the
//! pipeline relies on that order staying fixed because statement generation
//! downstream is positional.

/// The scalar kind a dataset column is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Int,
    Float,
}

/// One named, typed column of a dataset.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> Field {
    Field { name, kind }
}

/// A dataset's fixed, ordered column schema. `name` doubles as the
/// destination table name.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

/// Daily per-stock quotes from the TWSE and TPEX boards.
pub const TAIWAN_STOCK_PRICE: TableSchema = TableSchema {
    name: "taiwan_stock_price",
    fields: &[
        field("StockID", FieldKind::Text),
        field("TradeVolume", FieldKind::Int),
        field("Transaction", FieldKind::Int),
        field("TradeValue", FieldKind::Int),
        field("Open", FieldKind::Float),
        field("Max", FieldKind::Float),
        field("Min", FieldKind::Float),
        field("Close", FieldKind::Float),
        field("Change", FieldKind::Float),
        field("date", FieldKind::Text),
    ],
};

/// Daily futures settlement data from TAIFEX, both trading sessions.
pub const TAIWAN_FUTURES_DAILY: TableSchema = TableSchema {
    name: "taiwan_futures_daily",
    fields: &[
        field("date", FieldKind::Text),
        field("FuturesID", FieldKind::Text),
        field("ContractDate", FieldKind::Text),
        field("Open", FieldKind::Float),
        field("Max", FieldKind::Float),
        field("Min", FieldKind::Float),
        field("Close", FieldKind::Float),
        field("Change", FieldKind::Float),
        field("ChangePer", FieldKind::Float),
        field("Volume", FieldKind::Float),
        field("SettlementPrice", FieldKind::Float),
        field("OpenInterest", FieldKind::Float),
        field("TradingSession", FieldKind::Text),
    ],
};

/// Look a dataset up by name.
pub fn lookup(dataset: &str) -> Option<&'static TableSchema> {
    match dataset {
        "taiwan_stock_price" => Some(&TAIWAN_STOCK_PRICE),
        "taiwan_futures_daily" => Some(&TAIWAN_FUTURES_DAILY),
        _ => None,
    }
}
