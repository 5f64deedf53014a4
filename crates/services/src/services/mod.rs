pub mod auth;
pub mod busy;
pub mod config;
pub mod context;
pub mod deletion;
pub mod entity_client;
pub mod entity_table;
pub mod field_mapping;
pub mod form;
pub mod graphql;
pub mod list_screen;
pub mod lookup;
pub mod notification;
pub mod session;
pub mod side_panel;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;
