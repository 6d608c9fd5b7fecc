//! Numeric safety of a balance change.
//!
//! Balances are floats: the ceiling is the largest representable value, and
//! the floor is zero. A change is refused when the resulting balance would
//! come within one delta of the ceiling, or go below the floor.

use super::{Amount, Value};

/// Why a balance change was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Overflow,
    Underflow,
}

pub const MAX_BALANCE: Value = Value::MAX;

/// Checks whether applying `delta` to `old` keeps the balance in range.
///
/// The same rule applies to a single deposit and to each leg of a transfer.
pub fn check(old: Amount, delta: Amount) -> Result<(), Violation> {
    let (old, delta) = (old.value(), delta.value());

    if delta > 0.0 {
        if MAX_BALANCE - delta <= old {
            return Err(Violation::Overflow);
        }
    } else if old + delta < 0.0 {
        return Err(Violation::Underflow);
    }

    Ok(())
}
