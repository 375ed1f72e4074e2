/// Total length of a classification code in digits.
pub const CODE_LEN: usize = 17;

/// Fixed segment widths of the classification code scheme.
pub const CODE_SEGMENTS: [usize; 7] = [1, 2, 2, 3, 3, 3, 3];

/// Deepest hierarchy level expressible by the code scheme.
pub const MAX_LEVEL: i32 = 6;

/// Designated grand-total code of a section (all placeholder digits).
pub const TOTAL_CODE: &str = "00000000000000000";

/// Absolute tolerance when comparing reported and recomputed amounts.
pub const AMOUNT_TOLERANCE: f64 = 0.00001;

/// Decimal places amounts are rounded to at rollup and comparison boundaries.
pub const AMOUNT_DECIMALS: u32 = 5;

/// Indicator name given to synthetic section-total rows minted by the
/// aggregation engine when the reported data carries no total row.
pub const SYNTHETIC_TOTAL_NAME: &str = "TOTAL (computed)";
