// ==========================================
// Salesbook - domain layer
// ==========================================

pub mod entities;
pub mod import;
pub mod types;

pub use entities::{Customer, Distributor, NewDistributor, NewSaleItem, Payment, Product, Sale};
pub use import::{
    CellValue, CustomerRow, DistributorRow, FileReport, PaymentRow, RawSheet, RowOutcome,
    SalesRow, SheetReport,
};
pub use types::{PaymentMethod, PaymentStatus, SaleType, SheetKind};
