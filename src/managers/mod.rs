pub mod page_policy;
pub mod tab_session;
