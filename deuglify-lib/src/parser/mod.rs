pub mod deuglify_html;
pub mod dom_indices;
pub mod serialize;
