/// Custom actions for Product entities.
///
/// Each action is applied by the product store in a single message, so a
/// debit is a compare-and-decrement rather than a read followed by a write.
#[derive(Debug, Clone)]
pub enum ProductAction {
    /// Checks the current stock level without modifying it.
    CheckStock,
    /// Decrements stock by the given quantity if at least that much is available.
    ///
    /// Refusal leaves the product untouched.
    DebitStock(u32),
    /// Returns previously debited stock.
    RestoreStock(u32),
}

/// Results from ProductActions - variants match 1:1 with ProductAction
#[derive(Debug, Clone, PartialEq)]
pub enum ProductActionResult {
    /// Current stock level
    CheckStock(u32),
    DebitStock(StockDebit),
    /// Stock level after the restore
    RestoreStock(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDebit {
    Debited { remaining: u32 },
    Refused { available: u32 },
}
