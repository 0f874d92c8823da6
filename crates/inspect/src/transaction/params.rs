//! Parameter tables with tagged value ownership.

use bytes::Bytes;

use crate::table::Table;

/// A request parameter table whose release behavior is part of its type.
///
/// `Owned` tables hold the only handle to each value, so dropping the table
/// releases the values with it. `Reused` tables share their values with
/// another owner (typically the table the URI query parser built): dropping
/// one releases the container and its share of each value, never the backing
/// storage the other owner still holds.
///
/// Values are [`Bytes`], so a "shared" value is a refcounted handle rather
/// than a raw borrow; the variant records which owner is authoritative and
/// keeps the two release behaviors from ever being mixed up.
#[derive(Debug)]
pub enum ParamTable {
    Owned(Table<Bytes>),
    Reused(Table<Bytes>),
}

impl ParamTable {
    /// True when the values are shared with another owner.
    pub fn is_reused(&self) -> bool {
        matches!(self, ParamTable::Reused(_))
    }

    /// The underlying name→value table.
    pub fn table(&self) -> &Table<Bytes> {
        match self {
            ParamTable::Owned(table) | ParamTable::Reused(table) => table,
        }
    }

    /// Returns the first value for `name`, ignoring ASCII case.
    pub fn get(&self, name: &[u8]) -> Option<&Bytes> {
        self.table().get(name)
    }

    pub fn len(&self) -> usize {
        self.table().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reused_table_shares_its_values() {
        let value = Bytes::from(vec![b'1']);

        let mut shared = Table::new();
        shared.add(Bytes::from_static(b"a"), value.clone());
        let params = ParamTable::Reused(shared);

        assert!(params.is_reused());
        assert!(!value.is_unique());

        // dropping the table releases only its share
        drop(params);
        assert!(value.is_unique());
        assert_eq!(&value[..], b"1");
    }

    #[test]
    fn owned_table_releases_its_values() {
        let probe = Bytes::from(vec![b'x', b'y']);

        let mut table = Table::new();
        table.add(Bytes::from_static(b"q"), probe.clone());
        let params = ParamTable::Owned(table);

        assert!(!params.is_reused());
        assert_eq!(params.get(b"Q"), Some(&probe));

        drop(params);
        // the table held the only other handle
        assert!(probe.is_unique());
    }
}
