// Application records: HTTP surface, dashboard view-model, filter/search projection.

pub mod handlers;
pub mod projection;
pub mod view_model;
