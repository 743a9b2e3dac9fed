// Cover letter form: one draft session per open form.
// Provider calls go through llm_client only; credentials stay in the vault.

pub mod credentials;
pub mod form;
pub mod generator;
pub mod handlers;
pub mod session;
pub mod sweep;
