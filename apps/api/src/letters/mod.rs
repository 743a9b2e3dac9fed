// Dashboard: the owned list of saved cover letters and its card projection.

pub mod card;
pub mod handlers;
pub mod reducers;
pub mod store;
