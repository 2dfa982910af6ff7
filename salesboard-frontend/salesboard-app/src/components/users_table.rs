use std::cmp::Ordering;

use salesboard_api_types::{seed::seed_users, User, UserRole, UserStatus};

use crate::{
    components::table::{
        contains_ignore_case, sort_rows, Pagination, RowSelection, SortDirection, Sortable,
        Sorting,
    },
    format::initials,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UserColumn {
    Name,
    Email,
    Role,
    Status,
    RegistrationDate,
}

impl Sortable for User {
    type Column = UserColumn;

    fn compare_by(&self, other: &Self, column: UserColumn) -> Ordering {
        match column {
            UserColumn::Name => self.name.to_lowercase().cmp(&other.name.to_lowercase()),
            UserColumn::Email => self.email.cmp(&other.email),
            UserColumn::Role => self.role.cmp(&other.role),
            UserColumn::Status => self.status.cmp(&other.status),
            UserColumn::RegistrationDate => self.registration_date.cmp(&other.registration_date),
        }
    }
}

/// Read-only listing of the sample accounts.
#[derive(Clone, Debug)]
pub struct UsersTable {
    users: Vec<User>,
    sorting: Sorting<UserColumn>,
    name_filter: String,
    role_filter: Option<UserRole>,
    status_filter: Option<UserStatus>,
    selection: RowSelection,
    pagination: Pagination,
}

impl UsersTable {
    pub fn new(users: Vec<User>, page_size: usize) -> Self {
        Self {
            users,
            sorting: Sorting::new(UserColumn::Name, SortDirection::Ascending),
            name_filter: String::new(),
            role_filter: None,
            status_filter: None,
            selection: RowSelection::default(),
            pagination: Pagination::new(page_size),
        }
    }

    pub fn seeded(page_size: usize) -> Self {
        Self::new(seed_users(), page_size)
    }

    pub fn sorting(&self) -> Sorting<UserColumn> {
        self.sorting
    }

    pub fn toggle_sort(&mut self, column: UserColumn) {
        self.sorting.toggle(column);
    }

    pub fn set_name_filter(&mut self, filter: impl Into<String>) {
        self.name_filter = filter.into();
        self.pagination.reset();
    }

    pub fn set_role_filter(&mut self, role: Option<UserRole>) {
        self.role_filter = role;
        self.pagination.reset();
    }

    pub fn set_status_filter(&mut self, status: Option<UserStatus>) {
        self.status_filter = status;
        self.pagination.reset();
    }

    pub fn rows(&self) -> Vec<User> {
        let mut rows: Vec<User> = self
            .users
            .iter()
            .filter(|user| contains_ignore_case(&user.name, &self.name_filter))
            .filter(|user| self.role_filter.map_or(true, |role| user.role == role))
            .filter(|user| self.status_filter.map_or(true, |status| user.status == status))
            .cloned()
            .collect();
        sort_rows(&mut rows, self.sorting);
        rows
    }

    pub fn page_rows(&self) -> Vec<User> {
        self.pagination.slice(&self.rows()).to_vec()
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn next_page(&mut self) {
        let rows = self.rows().len();
        self.pagination.next(rows);
    }

    pub fn previous_page(&mut self) {
        self.pagination.previous();
    }

    pub fn toggle_row(&mut self, id: &str) {
        self.selection.toggle(id);
    }

    pub fn selection_summary(&self) -> String {
        self.selection.summary(self.rows().len())
    }

    /// Text for the avatar fallback.
    pub fn avatar_initials(user: &User) -> String {
        initials(&user.name)
    }
}
