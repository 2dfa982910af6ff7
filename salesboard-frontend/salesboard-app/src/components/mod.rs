pub mod sale_form;
pub mod sales_table;
pub mod table;
pub mod users_table;
