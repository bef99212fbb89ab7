pub mod invoice;

pub use invoice::{InvoiceRecord, LineItem, Ordinal};
