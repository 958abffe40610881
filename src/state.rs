use std::sync::Arc;

use crate::color::tile_letter;
use crate::config::PickerArguments;
use crate::data::cursor::{RowSource, TableCursor};
use crate::data::filter::{ExclusionSet, FilteredRowView};
use crate::data::model::{ContactQuery, ContactTable};
use crate::data::query::ContactListFilter;

// ---------------------------------------------------------------------------
// Listener contract
// ---------------------------------------------------------------------------

/// Receives the contacts the user picks.
pub trait GroupMemberListener {
    /// Invoked when a potential group member is selected.
    fn on_group_member_clicked(&mut self, contact_id: i64);
}

/// Collects picked contact ids so the host can act on them after rendering.
#[derive(Debug, Default)]
pub struct PickedMembers(pub Vec<i64>);

impl GroupMemberListener for PickedMembers {
    fn on_group_member_clicked(&mut self, contact_id: i64) {
        self.0.push(contact_id);
    }
}

// ---------------------------------------------------------------------------
// One list row, ready to render
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ContactListItem {
    pub contact_id: Option<i64>,
    pub display_name: Option<String>,
    pub lookup_key: Option<String>,
    pub photo_id: Option<i64>,
    /// Section letter, set only on the first row of each section.
    pub section_header: Option<char>,
}

// ---------------------------------------------------------------------------
// Picker state
// ---------------------------------------------------------------------------

/// The picker screen, independent of rendering.
pub struct PickerState {
    pub arguments: PickerArguments,

    /// Every contact from the last opened file (None until a file is loaded).
    pub contacts: Option<Arc<ContactTable>>,

    /// Candidates: the current load with existing members filtered out.
    pub view: Option<FilteredRowView<TableCursor>>,

    /// Contacts added during this session, in click order.
    pub added: Vec<i64>,

    pub photo_loader_enabled: bool,
    pub section_headers_enabled: bool,
    pub visible_scrollbar_enabled: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl PickerState {
    pub fn new(arguments: PickerArguments) -> Self {
        PickerState {
            arguments,
            contacts: None,
            view: None,
            added: Vec::new(),
            photo_loader_enabled: true,
            section_headers_enabled: true,
            visible_scrollbar_enabled: true,
            status_message: None,
        }
    }

    pub fn list_filter(&self) -> ContactListFilter {
        match &self.arguments.account {
            Some(account) => ContactListFilter::group_members(account.clone()),
            None => ContactListFilter::All,
        }
    }

    /// Ingest a newly loaded contacts table and show its candidates.
    pub fn set_contacts(&mut self, table: ContactTable) {
        self.contacts = Some(Arc::new(table));
        self.status_message = None;
        self.reload();
    }

    /// Replace the exclusion ids (e.g. after opening a members file).
    pub fn set_member_ids(&mut self, raw_contact_ids: Vec<String>) {
        self.arguments.raw_contact_ids = raw_contact_ids;
        self.reload();
    }

    /// Re-run the contacts query and deliver the result as a fresh load.
    pub fn reload(&mut self) {
        let Some(contacts) = &self.contacts else {
            return;
        };
        if contacts.is_empty() {
            log::warn!("the loaded contacts table has no rows");
        }
        let selected = ContactQuery::select(contacts, &self.list_filter());
        self.on_load_finished(TableCursor::new(Arc::new(selected)));
    }

    /// Wrap a freshly loaded cursor; the previous view is discarded.
    pub fn on_load_finished(&mut self, cursor: TableCursor) {
        let exclusions: ExclusionSet = self.arguments.raw_contact_ids.iter().cloned().collect();
        let view = FilteredRowView::new(cursor, &exclusions, ContactQuery::CONTACT_ID);
        log::debug!(
            "{} candidates after excluding {} group members",
            view.count(),
            exclusions.len()
        );
        if let Some(mut old) = self.view.replace(view) {
            old.close();
        }
    }

    /// Number of candidate rows.
    pub fn count(&self) -> usize {
        self.view.as_ref().map_or(0, RowSource::count)
    }

    /// Contact id at a list position, if that position exists.
    pub fn contact_id(&mut self, position: usize) -> Option<i64> {
        let view = self.view.as_mut()?;
        if !view.move_to_position(position) {
            return None;
        }
        view.get_long(ContactQuery::CONTACT_ID).ok().flatten()
    }

    /// The row at `position`, with its section header resolved.
    pub fn item(&mut self, position: usize) -> Option<ContactListItem> {
        let section_headers = self.section_headers_enabled;
        let view = self.view.as_mut()?;

        let previous_name = if section_headers && position > 0 && view.move_to_position(position - 1) {
            view.get_string(ContactQuery::DISPLAY_NAME).ok().flatten()
        } else {
            None
        };

        if !view.move_to_position(position) {
            return None;
        }
        let display_name = view.get_string(ContactQuery::DISPLAY_NAME).ok().flatten();
        let section = tile_letter(display_name.as_deref());
        let section_header = (section_headers
            && (position == 0 || tile_letter(previous_name.as_deref()) != section))
            .then_some(section);

        Some(ContactListItem {
            contact_id: view.get_long(ContactQuery::CONTACT_ID).ok().flatten(),
            display_name,
            lookup_key: view.get_string(ContactQuery::LOOKUP_KEY).ok().flatten(),
            photo_id: view.get_long(ContactQuery::PHOTO_ID).ok().flatten(),
            section_header,
        })
    }

    /// A row was clicked: report its contact to the listener, if it has a
    /// real contact id.
    pub fn on_item_click(&mut self, position: usize, listener: &mut dyn GroupMemberListener) {
        match self.contact_id(position) {
            Some(contact_id) if contact_id > 0 => listener.on_group_member_clicked(contact_id),
            other => log::debug!("ignoring click at {position} (contact id {other:?})"),
        }
    }

    /// Record a contact as a group member; it drops out of the candidates.
    pub fn add_member(&mut self, contact_id: i64) {
        let id = contact_id.to_string();
        if !self.arguments.raw_contact_ids.contains(&id) {
            self.arguments.raw_contact_ids.push(id);
        }
        if !self.added.contains(&contact_id) {
            self.added.push(contact_id);
        }
        log::info!("Added contact {contact_id} to the group");
        self.reload();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{AccountWithDataSet, CellValue};

    fn contact(id: i64, name: &str, account: &str) -> Vec<CellValue> {
        vec![
            CellValue::Integer(id),
            CellValue::String(name.into()),
            CellValue::Null,
            CellValue::String(format!("lookup-{id}")),
            CellValue::String("com.example".into()),
            CellValue::String(account.into()),
            CellValue::Null,
        ]
    }

    fn contacts() -> ContactTable {
        let mut t = ContactTable::with_projection();
        t.push_row(contact(1, "Alice", "work")).unwrap();
        t.push_row(contact(2, "Bob", "work")).unwrap();
        t.push_row(contact(3, "Anna", "work")).unwrap();
        t.push_row(contact(4, "Carol", "home")).unwrap();
        t.push_row(contact(0, "Zed", "work")).unwrap();
        t
    }

    fn picker(excluded: &[&str]) -> PickerState {
        let args = PickerArguments::new(
            Some(AccountWithDataSet::new("work", "com.example")),
            excluded.iter().map(|s| s.to_string()).collect(),
        );
        let mut state = PickerState::new(args);
        state.set_contacts(contacts());
        state
    }

    fn names(state: &mut PickerState) -> Vec<String> {
        (0..state.count())
            .filter_map(|p| state.item(p)?.display_name)
            .collect()
    }

    #[test]
    fn shows_account_contacts_not_in_group() {
        let mut state = picker(&["2"]);
        assert_eq!(state.count(), 3);
        assert_eq!(names(&mut state), vec!["Alice", "Anna", "Zed"]);
    }

    #[test]
    fn section_headers_mark_first_row_of_each_letter() {
        let mut state = picker(&[]);
        let headers: Vec<Option<char>> = (0..state.count())
            .map(|p| state.item(p).unwrap().section_header)
            .collect();
        assert_eq!(headers, vec![Some('A'), None, Some('B'), Some('Z')]);

        state.section_headers_enabled = false;
        assert_eq!(state.item(0).unwrap().section_header, None);
    }

    #[test]
    fn click_reports_contact_id() {
        let mut state = picker(&["1"]);
        let mut picked = PickedMembers::default();
        state.on_item_click(0, &mut picked);
        assert_eq!(picked.0, vec![3]);
    }

    #[test]
    fn click_ignores_non_positive_ids_and_missing_rows() {
        let mut state = picker(&[]);
        let mut picked = PickedMembers::default();
        state.on_item_click(3, &mut picked);
        state.on_item_click(99, &mut picked);
        assert!(picked.0.is_empty());
    }

    #[test]
    fn adding_a_member_removes_it_from_candidates() {
        let mut state = picker(&[]);
        state.add_member(2);
        state.add_member(2);
        assert_eq!(state.added, vec![2]);
        assert_eq!(state.arguments.raw_contact_ids, vec!["2"]);
        assert_eq!(names(&mut state), vec!["Alice", "Anna", "Zed"]);
    }

    #[test]
    fn without_account_every_contact_is_a_candidate() {
        let mut state = PickerState::new(PickerArguments::default());
        state.set_contacts(contacts());
        assert_eq!(state.count(), 5);
        state.set_member_ids(vec!["4".into(), "0".into()]);
        assert_eq!(names(&mut state), vec!["Alice", "Anna", "Bob"]);
    }

    #[test]
    fn empty_contacts_table_gives_empty_list() {
        let mut state = PickerState::new(PickerArguments::default());
        state.set_contacts(ContactTable::with_projection());
        assert!(state.view.is_some());
        assert_eq!(state.count(), 0);
        assert_eq!(state.item(0), None);
    }

    #[test]
    fn nothing_loaded_means_no_rows() {
        let mut state = PickerState::new(PickerArguments::default());
        assert_eq!(state.count(), 0);
        assert_eq!(state.item(0), None);
        assert_eq!(state.contact_id(0), None);
    }
}
