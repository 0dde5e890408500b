//! Code allocation policies
//!
//! - Legacy: next code is the table's entry count as stored, reserved keys
//!   included. The first record of a table holding the registry gets code 1.
//!   If that code is still held by a live record (after out-of-order deletes)
//!   the candidate moves up until it is free; a live record is never replaced.
//! - Monotonic: the table persists the last issued code under `SEQ` and every
//!   allocation increments it. Codes are never reused.

use std::fmt;
use std::str::FromStr;

use super::table::Table;
use crate::record::Code;

/// How new record codes are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AllocationPolicy {
    #[default]
    Legacy,
    Monotonic,
}

impl AllocationPolicy {
    /// Returns a code not held by any record in `table`.
    ///
    /// Monotonic allocation records the issued code in the table, so the
    /// caller must persist the table even if it discards the code. `None`
    /// when no code above the stored ones fits in a `u64`; the table is then
    /// left untouched.
    pub fn allocate(&self, table: &mut Table) -> Option<Code> {
        match self {
            AllocationPolicy::Legacy => {
                let mut code = Code::new(table.entry_count() as u64);
                while table.contains(code) {
                    code = code.checked_next()?;
                }
                Some(code)
            }
            AllocationPolicy::Monotonic => {
                let floor = match table.max_code() {
                    Some(max) => max.checked_next()?.max(Code::new(1)),
                    None => Code::new(1),
                };
                let code = match table.sequence() {
                    Some(last) => last.checked_next()?.max(floor),
                    None => floor,
                };
                table.set_sequence(code);
                Some(code)
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationPolicy::Legacy => "legacy",
            AllocationPolicy::Monotonic => "monotonic",
        }
    }
}

impl fmt::Display for AllocationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AllocationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy" => Ok(AllocationPolicy::Legacy),
            "monotonic" => Ok(AllocationPolicy::Monotonic),
            other => Err(format!(
                "Invalid code allocation policy: '{}'. Must be 'legacy' or 'monotonic'.",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{EntityKind, Record};

    fn record() -> Record {
        Record::new(EntityKind::Course)
    }

    fn allocate_and_insert(policy: AllocationPolicy, table: &mut Table) -> u64 {
        let code = policy.allocate(table).unwrap();
        table.insert(code, record());
        code.value()
    }

    #[test]
    fn test_legacy_first_code_after_registry_is_one() {
        let mut table = Table::new();
        table.ensure_registry();
        assert_eq!(allocate_and_insert(AllocationPolicy::Legacy, &mut table), 1);
        assert_eq!(allocate_and_insert(AllocationPolicy::Legacy, &mut table), 2);
        assert_eq!(allocate_and_insert(AllocationPolicy::Legacy, &mut table), 3);
    }

    #[test]
    fn test_legacy_without_registry_starts_at_zero() {
        let mut table = Table::new();
        assert_eq!(allocate_and_insert(AllocationPolicy::Legacy, &mut table), 0);
    }

    #[test]
    fn test_legacy_reuses_code_after_deleting_last() {
        let mut table = Table::new();
        table.ensure_registry();
        allocate_and_insert(AllocationPolicy::Legacy, &mut table);
        allocate_and_insert(AllocationPolicy::Legacy, &mut table);
        table.remove(Code::new(2));
        assert_eq!(allocate_and_insert(AllocationPolicy::Legacy, &mut table), 2);
    }

    #[test]
    fn test_legacy_skips_live_code_after_out_of_order_delete() {
        let mut table = Table::new();
        table.ensure_registry();
        allocate_and_insert(AllocationPolicy::Legacy, &mut table);
        allocate_and_insert(AllocationPolicy::Legacy, &mut table);
        table.remove(Code::new(1));
        // entry count is 2, but code 2 is live
        assert_eq!(allocate_and_insert(AllocationPolicy::Legacy, &mut table), 3);
        assert_eq!(table.record_count(), 2);
    }

    #[test]
    fn test_monotonic_never_reuses() {
        let mut table = Table::new();
        table.ensure_registry();
        assert_eq!(allocate_and_insert(AllocationPolicy::Monotonic, &mut table), 1);
        assert_eq!(allocate_and_insert(AllocationPolicy::Monotonic, &mut table), 2);
        table.remove(Code::new(2));
        assert_eq!(allocate_and_insert(AllocationPolicy::Monotonic, &mut table), 3);
        assert_eq!(table.sequence(), Some(Code::new(3)));
    }

    #[test]
    fn test_monotonic_seeds_from_existing_codes() {
        let mut table = Table::new();
        table.ensure_registry();
        table.insert(Code::new(7), record());
        assert_eq!(allocate_and_insert(AllocationPolicy::Monotonic, &mut table), 8);
    }

    #[test]
    fn test_monotonic_exhausted_after_max_code() {
        let mut table = Table::new();
        table.ensure_registry();
        table.insert(Code::new(u64::MAX), record());
        assert_eq!(AllocationPolicy::Monotonic.allocate(&mut table), None);
        assert_eq!(table.sequence(), None);
    }

    #[test]
    fn test_monotonic_exhausted_after_max_sequence() {
        let mut table = Table::new();
        table.set_sequence(Code::new(u64::MAX));
        assert_eq!(AllocationPolicy::Monotonic.allocate(&mut table), None);
        assert_eq!(table.sequence(), Some(Code::new(u64::MAX)));
    }

    #[test]
    fn test_parse_policy() {
        assert_eq!("legacy".parse::<AllocationPolicy>(), Ok(AllocationPolicy::Legacy));
        assert_eq!(
            "monotonic".parse::<AllocationPolicy>(),
            Ok(AllocationPolicy::Monotonic)
        );
        assert!("random".parse::<AllocationPolicy>().is_err());
    }
}
