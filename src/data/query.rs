use std::cmp::Ordering;

use log::debug;

use super::model::{AccountWithDataSet, CellValue, ContactQuery, ContactTable};

// ---------------------------------------------------------------------------
// ContactListFilter: which rows the loader query selects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContactListFilter {
    /// Every contact regardless of account.
    #[default]
    All,
    /// Contacts stored in one account, i.e. the candidates for one of its groups.
    GroupMembers(AccountWithDataSet),
}

impl ContactListFilter {
    pub fn group_members(account: AccountWithDataSet) -> Self {
        ContactListFilter::GroupMembers(account)
    }

    pub fn matches(&self, row: &[CellValue]) -> bool {
        match self {
            ContactListFilter::All => true,
            ContactListFilter::GroupMembers(account) => {
                let text = |col: usize| row.get(col).and_then(CellValue::as_str);
                text(ContactQuery::ACCOUNT_TYPE) == Some(account.account_type.as_str())
                    && text(ContactQuery::ACCOUNT_NAME) == Some(account.name.as_str())
                    && text(ContactQuery::DATA_SET) == account.data_set.as_deref()
            }
        }
    }
}

impl ContactQuery {
    /// Run the contacts query over a loaded table: keep the rows `filter`
    /// accepts, ordered by display name (case-insensitive) then contact id.
    pub fn select(table: &ContactTable, filter: &ContactListFilter) -> ContactTable {
        let mut order: Vec<usize> = table
            .rows()
            .enumerate()
            .filter(|(_, r)| filter.matches(r))
            .map(|(i, _)| i)
            .collect();
        let rows: Vec<&[CellValue]> = table.rows().collect();
        order.sort_by(|&a, &b| compare_rows(rows[a], rows[b]));

        let out = table.reordered(&order);
        debug!("contacts query selected {} of {} rows", out.len(), table.len());
        out
    }
}

fn compare_rows(a: &[CellValue], b: &[CellValue]) -> Ordering {
    let name = |r: &[CellValue]| {
        r.get(ContactQuery::DISPLAY_NAME)
            .and_then(CellValue::as_str)
            .map(str::to_lowercase)
    };
    let id = |r: &[CellValue]| r.get(ContactQuery::CONTACT_ID).and_then(CellValue::as_i64);

    // Nameless contacts sort last.
    match (name(a), name(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| id(a).cmp(&id(b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, name: Option<&str>, account: &str, data_set: Option<&str>) -> Vec<CellValue> {
        let text = |v: Option<&str>| v.map_or(CellValue::Null, |s| CellValue::String(s.into()));
        vec![
            CellValue::Integer(id),
            text(name),
            CellValue::Null,
            CellValue::String(format!("lookup-{id}")),
            CellValue::String("com.example".into()),
            CellValue::String(account.into()),
            text(data_set),
        ]
    }

    fn table() -> ContactTable {
        let mut t = ContactTable::with_projection();
        t.push_row(row(3, Some("bob"), "work", None)).unwrap();
        t.push_row(row(1, Some("Alice"), "work", None)).unwrap();
        t.push_row(row(2, Some("carol"), "home", None)).unwrap();
        t.push_row(row(4, None, "work", None)).unwrap();
        t.push_row(row(5, Some("Bob"), "work", Some("plus"))).unwrap();
        t.push_row(row(6, Some("Bob"), "work", None)).unwrap();
        t
    }

    fn ids(t: &ContactTable) -> Vec<i64> {
        t.rows()
            .filter_map(|r| r[ContactQuery::CONTACT_ID].as_i64())
            .collect()
    }

    #[test]
    fn all_sorts_by_name_then_id() {
        let out = ContactQuery::select(&table(), &ContactListFilter::All);
        assert_eq!(ids(&out), vec![1, 3, 5, 6, 2, 4]);
    }

    #[test]
    fn group_members_filter_matches_account_and_data_set() {
        let account = AccountWithDataSet::new("work", "com.example");
        let out = ContactQuery::select(&table(), &ContactListFilter::group_members(account.clone()));
        assert_eq!(ids(&out), vec![1, 3, 6, 4]);

        let plus = ContactListFilter::group_members(account.with_data_set("plus"));
        assert_eq!(ids(&ContactQuery::select(&table(), &plus)), vec![5]);
    }
}
